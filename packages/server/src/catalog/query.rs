use std::str::FromStr;

use common::MediaKind;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Select};

use crate::entity::{file_tag, media_file, tag};
use crate::error::AppError;

pub const PAGE_SIZES: &[u64] = &[10, 25, 50];
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Which file kinds a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    Both,
    Only(MediaKind),
}

impl FromStr for TypeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Self::Both),
            other => other.parse::<MediaKind>().map(Self::Only).map_err(|_| {
                AppError::Validation("type must be one of: both, image, video".into())
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Elo,
    Top,
    /// A fresh uniform permutation per request.
    Random,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "elo" => Ok(Self::Elo),
            "top" => Ok(Self::Top),
            "random" => Ok(Self::Random),
            _ => Err(AppError::Validation(
                "sort must be one of: newest, oldest, elo, top, random".into(),
            )),
        }
    }
}

impl SortOrder {
    /// Apply a total order. Ties fall back to `id` so pages never overlap.
    /// `Random` leaves the select unordered; the caller permutes ids itself.
    pub fn apply(self, select: Select<media_file::Entity>) -> Select<media_file::Entity> {
        match self {
            SortOrder::Newest => select
                .order_by(media_file::Column::CreatedAt, Order::Desc)
                .order_by(media_file::Column::Id, Order::Desc),
            SortOrder::Oldest => select
                .order_by(media_file::Column::CreatedAt, Order::Asc)
                .order_by(media_file::Column::Id, Order::Asc),
            SortOrder::Elo => select
                .order_by(media_file::Column::EloRating, Order::Desc)
                .order_by(media_file::Column::Id, Order::Asc),
            SortOrder::Top => select
                .order_by(media_file::Column::LikeCount, Order::Desc)
                .order_by(media_file::Column::Id, Order::Asc),
            SortOrder::Random => select,
        }
    }
}

/// The population a listing or draw is taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub kind: TypeFilter,
    /// Normalized tag name; records must carry it.
    pub tag: Option<String>,
}

impl Filter {
    pub fn new(kind: TypeFilter, tag: Option<&str>) -> Self {
        let tag = tag
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        Self { kind, tag }
    }

    pub fn of_kind(kind: TypeFilter) -> Self {
        Self { kind, tag: None }
    }

    pub fn select(&self) -> Select<media_file::Entity> {
        let mut select = media_file::Entity::find();

        if let TypeFilter::Only(kind) = self.kind {
            select = select.filter(media_file::Column::FileType.eq(kind));
        }

        // An unknown tag matches nothing, which is an empty page rather than an error.
        if let Some(ref name) = self.tag {
            select = select.filter(
                media_file::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(file_tag::Column::FileId)
                        .from(file_tag::Entity)
                        .and_where(
                            file_tag::Column::TagId.in_subquery(
                                SeaQuery::select()
                                    .column(tag::Column::Id)
                                    .from(tag::Entity)
                                    .and_where(tag::Column::Name.eq(name.as_str()))
                                    .to_owned(),
                            ),
                        )
                        .to_owned(),
                ),
            );
        }

        select
    }
}

/// Validated listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub filter: Filter,
    pub sort: SortOrder,
    /// 1-based.
    pub page: u64,
    pub per_page: u64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            sort: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListParams {
    /// Validate raw query values. Absent values take their defaults; invalid ones are rejected.
    pub fn parse(
        kind: Option<&str>,
        sort: Option<&str>,
        tag: Option<&str>,
        page: Option<u64>,
        count: Option<u64>,
    ) -> Result<Self, AppError> {
        let kind = kind.map(TypeFilter::from_str).transpose()?.unwrap_or_default();
        let sort = sort.map(SortOrder::from_str).transpose()?.unwrap_or_default();

        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be >= 1".into()));
        }

        let per_page = count.unwrap_or(DEFAULT_PAGE_SIZE);
        if !PAGE_SIZES.contains(&per_page) {
            return Err(AppError::Validation(
                "count must be one of: 10, 25, 50".into(),
            ));
        }

        Ok(Self {
            filter: Filter::new(kind, tag),
            sort,
            page,
            per_page,
        })
    }

    /// Rows skipped before this page, or `None` when it cannot be represented.
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1).checked_mul(self.per_page)
    }
}
