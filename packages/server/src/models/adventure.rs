use serde::{Deserialize, Serialize};

use super::media::MediaResponse;

fn default_steps() -> usize {
    8
}

fn default_file_type() -> String {
    "both".into()
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdventureRequest {
    /// Minimum like count of every step.
    #[serde(default)]
    pub risk_level: i64,
    #[serde(default = "default_steps")]
    #[schema(example = 8)]
    pub steps: usize,
    #[serde(default = "default_file_type")]
    #[schema(example = "both")]
    pub file_type: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdventureResponse {
    pub risk_level: i64,
    pub steps: Vec<MediaResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LikeRangeResponse {
    pub min_likes: i64,
    pub max_likes: i64,
}
