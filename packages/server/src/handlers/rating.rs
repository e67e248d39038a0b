use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::AppPath;
use crate::models::media::LikeResponse;
use crate::scoring::{ScoringService, Vote};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/like",
    tag = "Rating",
    operation_id = "likeMedia",
    summary = "Increment the like counter",
    params(("id" = i32, Path, description = "Media id")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn like_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    cast(&state, id, Vote::Like).await
}

#[utoipa::path(
    post,
    path = "/{id}/dislike",
    tag = "Rating",
    operation_id = "dislikeMedia",
    summary = "Decrement the like counter",
    description = "The counter is not clamped and may become negative.",
    params(("id" = i32, Path, description = "Media id")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn dislike_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    cast(&state, id, Vote::Dislike).await
}

async fn cast(state: &AppState, id: i32, vote: Vote) -> Result<Json<LikeResponse>, AppError> {
    let like_count = ScoringService::new(&state.db, state.config.rating)
        .cast(id, vote)
        .await?;

    info!(id, ?vote, like_count, "Vote cast");
    Ok(Json(LikeResponse { id, like_count }))
}
