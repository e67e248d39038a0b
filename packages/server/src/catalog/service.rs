use std::collections::HashMap;

use common::MediaKind;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Select,
};

use super::query::{Filter, ListParams, SortOrder, TypeFilter};
use super::sampling;
use crate::entity::media_file;

/// One page of a listing plus the numbers needed to render pagination.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Read-side queries over `media_file`: listings, samples and comparison draws.
pub struct CatalogService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Filtered, sorted page. Pages past the end are empty, not an error.
    pub async fn list(&self, params: &ListParams) -> Result<Page<media_file::Model>, DbErr> {
        let select = params.filter.select();
        let total = select.clone().count(self.conn).await?;
        let total_pages = total.div_ceil(params.per_page);

        let items = match params.offset() {
            Some(offset) if params.page <= total_pages => {
                self.page_items(params, select, offset).await?
            }
            _ => vec![],
        };

        Ok(Page {
            items,
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        })
    }

    async fn page_items(
        &self,
        params: &ListParams,
        select: Select<media_file::Entity>,
        offset: u64,
    ) -> Result<Vec<media_file::Model>, DbErr> {
        if params.sort == SortOrder::Random {
            let ids = sampling::shuffled(Self::ids_of(self.conn, select).await?);
            let page_ids: Vec<i32> = ids
                .into_iter()
                .skip(offset as usize)
                .take(params.per_page as usize)
                .collect();
            return self.fetch_in_order(&page_ids).await;
        }

        params
            .sort
            .apply(select)
            .offset(Some(offset))
            .limit(Some(params.per_page))
            .all(self.conn)
            .await
    }

    /// Up to `amount` distinct records drawn uniformly from the filtered population.
    pub async fn sample(
        &self,
        filter: &Filter,
        amount: usize,
    ) -> Result<Vec<media_file::Model>, DbErr> {
        self.draw_from(filter.select(), amount).await
    }

    /// One uniformly drawn record, or `None` when nothing matches.
    pub async fn random_one(&self, filter: &Filter) -> Result<Option<media_file::Model>, DbErr> {
        Ok(self.sample(filter, 1).await?.into_iter().next())
    }

    /// Two distinct records for a side-by-side comparison.
    ///
    /// With `matching_types`, the kind is chosen uniformly among kinds that can
    /// supply two records, and both draws come from it.
    pub async fn compare_pair(
        &self,
        matching_types: bool,
    ) -> Result<Option<(media_file::Model, media_file::Model)>, DbErr> {
        let population = if matching_types {
            let mut eligible = Vec::new();
            for &kind in MediaKind::ALL {
                let ids = Self::ids_of(
                    self.conn,
                    Filter::of_kind(TypeFilter::Only(kind)).select(),
                )
                .await?;
                if ids.len() >= 2 {
                    eligible.push(ids);
                }
            }
            let indices: Vec<usize> = (0..eligible.len()).collect();
            match sampling::draw(&indices, 1).first() {
                Some(&index) => eligible.swap_remove(index),
                None => return Ok(None),
            }
        } else {
            Self::ids_of(self.conn, media_file::Entity::find()).await?
        };

        let drawn = sampling::draw(&population, 2);
        let mut pair = self.fetch_in_order(&drawn).await?.into_iter();
        match (pair.next(), pair.next()) {
            (Some(first), Some(second)) => Ok(Some((first, second))),
            _ => Ok(None),
        }
    }

    /// A new opponent for a fixed champion, never the champion itself.
    pub async fn challenger(
        &self,
        champion: &media_file::Model,
        matching_types: bool,
    ) -> Result<Option<media_file::Model>, DbErr> {
        let mut select =
            media_file::Entity::find().filter(media_file::Column::Id.ne(champion.id));
        if matching_types {
            select = select.filter(media_file::Column::FileType.eq(champion.file_type));
        }
        Ok(self.draw_from(select, 1).await?.into_iter().next())
    }

    /// `steps` records with at least `min_likes` likes, or fewer when the population is short.
    pub async fn adventure(
        &self,
        kind: TypeFilter,
        min_likes: i64,
        steps: usize,
    ) -> Result<Vec<media_file::Model>, DbErr> {
        let select = Filter::of_kind(kind)
            .select()
            .filter(media_file::Column::LikeCount.gte(min_likes));
        self.draw_from(select, steps).await
    }

    /// Lowest and highest `like_count` in the collection; `(0, 0)` when empty.
    pub async fn like_range(&self) -> Result<(i64, i64), DbErr> {
        let range: Option<(Option<i64>, Option<i64>)> = media_file::Entity::find()
            .select_only()
            .column_as(media_file::Column::LikeCount.min(), "min_likes")
            .column_as(media_file::Column::LikeCount.max(), "max_likes")
            .into_tuple()
            .one(self.conn)
            .await?;
        let (min, max) = range.unwrap_or_default();
        Ok((min.unwrap_or(0), max.unwrap_or(0)))
    }

    async fn draw_from(
        &self,
        select: Select<media_file::Entity>,
        amount: usize,
    ) -> Result<Vec<media_file::Model>, DbErr> {
        let ids = Self::ids_of(self.conn, select).await?;
        let drawn = sampling::draw(&ids, amount);
        self.fetch_in_order(&drawn).await
    }

    async fn ids_of(conn: &C, select: Select<media_file::Entity>) -> Result<Vec<i32>, DbErr> {
        select
            .select_only()
            .column(media_file::Column::Id)
            .into_tuple()
            .all(conn)
            .await
    }

    /// Load records by id, returned in the order of `ids`.
    async fn fetch_in_order(&self, ids: &[i32]) -> Result<Vec<media_file::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut by_id: HashMap<i32, media_file::Model> = media_file::Entity::find()
            .filter(media_file::Column::Id.is_in(ids.to_vec()))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
