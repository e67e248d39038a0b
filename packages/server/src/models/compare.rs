use serde::{Deserialize, Serialize};

use super::media::MediaResponse;
use crate::entity::media_file;

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompareQuery {
    /// Draw both sides from the same file type.
    #[serde(default)]
    pub matching_types: bool,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChallengerQuery {
    pub champion_id: i32,
    #[serde(default)]
    pub matching_types: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ComparePairResponse {
    pub left: MediaResponse,
    pub right: MediaResponse,
}

/// King of the Hill round: the champion stays, only the challenger changes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ChallengerResponse {
    pub champion: MediaResponse,
    /// `null` when nothing is left to challenge the champion.
    pub challenger: Option<MediaResponse>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct VoteRequest {
    pub winner_id: i32,
    pub loser_id: i32,
    /// Keep the winner and draw a new challenger.
    #[serde(default)]
    pub king_of_hill: bool,
    #[serde(default)]
    pub matching_types: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatedMedia {
    pub id: i32,
    pub elo_rating: f64,
    pub like_count: i64,
}

impl From<&media_file::Model> for RatedMedia {
    fn from(m: &media_file::Model) -> Self {
        Self {
            id: m.id,
            elo_rating: m.elo_rating,
            like_count: m.like_count,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteResponse {
    pub winner: RatedMedia,
    pub loser: RatedMedia,
    /// Next round, present only for King of the Hill votes.
    pub next: Option<ChallengerResponse>,
}
