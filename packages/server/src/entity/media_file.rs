use common::MediaKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Storage-assigned relative path, `{shard}/{uuid}{.ext}`.
    #[sea_orm(unique)]
    pub filename: String,
    pub original_filename: String,
    #[sea_orm(indexed)]
    pub file_type: MediaKind,

    #[sea_orm(default_value = 0)]
    pub like_count: i64,
    #[sea_orm(default_value = 1500.0)]
    pub elo_rating: f64,

    pub file_path: String,
    pub file_size: i64,
    /// SHA-256 of the content, hex encoded.
    #[sea_orm(indexed)]
    pub file_hash: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(has_many, via = "file_tag")]
    pub tags: HasMany<super::tag::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
