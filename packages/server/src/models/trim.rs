use serde::{Deserialize, Serialize};

use super::media::MediaResponse;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct TrimRequest {
    /// Seconds from the start of the source.
    #[schema(example = 1.5)]
    pub start_time: f64,
    #[schema(example = 12.0)]
    pub end_time: f64,
    /// Delete the source once the trimmed copy exists.
    #[serde(default = "keep_by_default")]
    pub keep_original: bool,
}

fn keep_by_default() -> bool {
    true
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TrimResponse {
    pub media: MediaResponse,
    /// Id of the source when it was deleted.
    pub replaced_id: Option<i32>,
    pub message: String,
}
