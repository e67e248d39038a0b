use chrono::{DateTime, Utc};
use common::MediaKind;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option};
use super::tag::TagResponse;
use crate::entity::{media_file, tag};

#[derive(Serialize, Clone, utoipa::ToSchema)]
pub struct MediaResponse {
    #[schema(example = 12)]
    pub id: i32,
    /// Storage name, unique per record.
    #[schema(example = "3f/3f2a9c0d4e5b4c7a9d1e2f3a4b5c6d7e.jpg")]
    pub filename: String,
    #[schema(example = "beach_sunset.jpg")]
    pub original_filename: String,
    pub file_type: MediaKind,
    pub like_count: i64,
    #[schema(example = 1516.0)]
    pub elo_rating: f64,
    pub file_size: i64,
    pub file_hash: String,
    pub description: Option<String>,
    pub tags: Vec<TagResponse>,
    /// Where the bytes can be fetched.
    #[schema(example = "/api/v1/media/12/content")]
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl MediaResponse {
    pub fn new(m: media_file::Model, tags: Vec<tag::Model>) -> Self {
        Self {
            url: format!("/api/v1/media/{}/content", m.id),
            id: m.id,
            filename: m.filename,
            original_filename: m.original_filename,
            file_type: m.file_type,
            like_count: m.like_count,
            elo_rating: m.elo_rating,
            file_size: m.file_size,
            file_hash: m.file_hash,
            description: m.description,
            tags: tags.into_iter().map(TagResponse::from).collect(),
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaListResponse {
    pub data: Vec<MediaResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MediaListQuery {
    /// `both` (default), `image` or `video`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `newest` (default), `oldest`, `elo`, `top` or `random`.
    pub sort: Option<String>,
    /// Only records carrying this tag.
    pub tag: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
    /// Page size: 10, 25 (default) or 50.
    pub count: Option<u64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SampleQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tag: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RandomQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateMediaRequest {
    pub original_filename: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SkippedFile {
    pub filename: String,
    #[schema(example = "Duplicate of existing file #4")]
    pub reason: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub uploaded: Vec<MediaResponse>,
    pub skipped: Vec<SkippedFile>,
    #[schema(example = "Uploaded 2 files, skipped 1")]
    pub message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    pub id: i32,
    pub like_count: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub id: i32,
    pub message: String,
}
