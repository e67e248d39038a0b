use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use tracing::instrument;

use super::media::with_tags;
use crate::catalog::{CatalogService, TypeFilter};
use crate::error::{AppError, ErrorBody};
use crate::extractors::AppJson;
use crate::models::adventure::*;
use crate::state::AppState;

/// Feature flag guarding every adventure endpoint.
pub const FEATURE: &str = "adventure";

const MAX_STEPS: usize = 100;

fn ensure_enabled(state: &AppState) -> Result<(), AppError> {
    if state.config.features.is_enabled(FEATURE) {
        Ok(())
    } else {
        Err(AppError::NotFound("Feature disabled".into()))
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Adventure",
    operation_id = "startAdventure",
    summary = "Draw a sequence of well-liked records",
    description = "Draws `steps` distinct records uniformly among those with at least \
        `risk_level` likes. Fails when fewer are available.",
    request_body = AdventureRequest,
    responses(
        (status = 200, description = "Adventure steps", body = AdventureResponse),
        (status = 400, description = "Invalid parameters or not enough records (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Feature disabled (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(risk_level = payload.risk_level, steps = payload.steps))]
pub async fn start_adventure(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AdventureRequest>,
) -> Result<Json<AdventureResponse>, AppError> {
    ensure_enabled(&state)?;

    if payload.steps == 0 || payload.steps > MAX_STEPS {
        return Err(AppError::Validation(format!(
            "steps must be between 1 and {MAX_STEPS}"
        )));
    }
    let kind = TypeFilter::from_str(&payload.file_type)?;

    let files = CatalogService::new(&state.db)
        .adventure(kind, payload.risk_level, payload.steps)
        .await?;
    if files.len() < payload.steps {
        return Err(AppError::Validation(format!(
            "Not enough files matching criteria. Found {}, need {}",
            files.len(),
            payload.steps
        )));
    }

    Ok(Json(AdventureResponse {
        risk_level: payload.risk_level,
        steps: with_tags(&state.db, files).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/range",
    tag = "Adventure",
    operation_id = "adventureRange",
    summary = "Like count range for choosing a risk level",
    responses(
        (status = 200, description = "Lowest and highest like counts", body = LikeRangeResponse),
        (status = 404, description = "Feature disabled (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn like_range(State(state): State<AppState>) -> Result<Json<LikeRangeResponse>, AppError> {
    ensure_enabled(&state)?;

    let (min_likes, max_likes) = CatalogService::new(&state.db).like_range().await?;
    Ok(Json(LikeRangeResponse {
        min_likes,
        max_likes,
    }))
}
