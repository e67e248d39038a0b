use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::media_file;
use crate::error::{AppError, ErrorBody};
use crate::models::admin::{EXPORT_FILENAME, EXPORT_HEADER};
use crate::models::shared::AffectedResponse;
use crate::scoring::ScoringService;
use crate::state::AppState;
use crate::tagging::TagService;
use crate::utils::csv;

#[utoipa::path(
    get,
    path = "/export",
    tag = "Admin",
    operation_id = "exportLikes",
    summary = "Export likes and ratings as CSV",
    responses(
        (status = 200, description = "CSV attachment, one row per record ordered by id", content_type = "text/csv"),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn export_likes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = media_file::Entity::find()
        .order_by_asc(media_file::Column::Id)
        .all(&state.db)
        .await?;

    let mut out = String::new();
    csv::write_record(&mut out, EXPORT_HEADER);
    for m in &records {
        csv::write_record(
            &mut out,
            [
                m.id.to_string(),
                m.original_filename.clone(),
                m.filename.clone(),
                m.file_type.to_string(),
                m.like_count.to_string(),
                m.elo_rating.to_string(),
                m.created_at.to_rfc3339(),
            ],
        );
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILENAME}"),
            ),
        ],
        out,
    ))
}

#[utoipa::path(
    post,
    path = "/reset-likes",
    tag = "Admin",
    operation_id = "resetLikes",
    summary = "Set every like count to zero",
    responses(
        (status = 200, description = "Likes reset", body = AffectedResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn reset_likes(State(state): State<AppState>) -> Result<Json<AffectedResponse>, AppError> {
    let affected = ScoringService::new(&state.db, state.config.rating)
        .reset_likes()
        .await?;
    Ok(Json(AffectedResponse {
        affected,
        message: format!("Reset likes for {affected} files"),
    }))
}

#[utoipa::path(
    post,
    path = "/reset-elo",
    tag = "Admin",
    operation_id = "resetElo",
    summary = "Restore every rating to the default",
    responses(
        (status = 200, description = "Ratings reset", body = AffectedResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn reset_elo(State(state): State<AppState>) -> Result<Json<AffectedResponse>, AppError> {
    let affected = ScoringService::new(&state.db, state.config.rating)
        .reset_elo()
        .await?;
    Ok(Json(AffectedResponse {
        affected,
        message: format!(
            "Reset ELO to {} for {affected} files",
            state.config.rating.default_elo
        ),
    }))
}

#[utoipa::path(
    post,
    path = "/tags/cleanup",
    tag = "Admin",
    operation_id = "cleanupTags",
    summary = "Delete tags that no media uses",
    responses(
        (status = 200, description = "Orphaned tags removed", body = AffectedResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn cleanup_tags(State(state): State<AppState>) -> Result<Json<AffectedResponse>, AppError> {
    let txn = state.db.begin().await?;
    let affected = TagService::new(&txn).cleanup_orphans().await?;
    txn.commit().await?;

    Ok(Json(AffectedResponse {
        affected,
        message: format!("Cleaned up {affected} orphaned tags"),
    }))
}
