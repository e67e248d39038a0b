use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::MediaKind;
use common::storage::StoredFile;
use sea_orm::*;
use tracing::{info, instrument, warn};

use super::media::{find_media, media_response, release_file, remove_media};
use crate::entity::media_file;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath};
use crate::models::trim::*;
use crate::state::AppState;
use crate::tagging::TagService;
use crate::trim::TrimRange;
use crate::utils::filename::{split_extension, trimmed_name};

#[utoipa::path(
    post,
    path = "/{id}/trim",
    tag = "Media",
    operation_id = "trimVideo",
    summary = "Cut a video to a time range",
    description = "Creates a new record holding `[start_time, end_time)` of the source video. \
        The copy inherits the like count and tags. With `keep_original: false` the source is \
        deleted in the same transaction.",
    params(("id" = i32, Path, description = "Media id of a video")),
    request_body = TrimRequest,
    responses(
        (status = 201, description = "Trimmed copy created", body = TrimResponse),
        (status = 400, description = "Not a video or invalid range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Trimmer failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id, start = payload.start_time, end = payload.end_time))]
pub async fn trim_video(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<TrimRequest>,
) -> Result<impl IntoResponse, AppError> {
    let source = find_media(&state.db, id).await?;
    if source.file_type != MediaKind::Video {
        return Err(AppError::Validation("File is not a video".into()));
    }
    let range = validate_range(payload.start_time, payload.end_time)?;

    let (_, extension) = split_extension(&source.filename);
    let source_path = state.store.resolve(&source.filename)?;
    let allocation = state.store.allocate(extension).await?;
    let output = allocation.filename.clone();

    let stored = match state.trimmer.trim(&source_path, range, &allocation.path).await {
        Ok(()) => state.store.finalize(allocation).await,
        Err(e) => {
            discard(&state, &output).await;
            return Err(e.into());
        }
    };
    let stored = match stored {
        Ok(stored) => stored,
        Err(e) => {
            discard(&state, &output).await;
            return Err(e.into());
        }
    };

    let name = trimmed_name(&source.original_filename, range.start, range.end);
    let model = match register_trimmed(&state, &source, &stored, name, payload.keep_original).await
    {
        Ok(model) => model,
        Err(e) => {
            discard(&state, &output).await;
            return Err(e);
        }
    };

    info!(
        source_id = id,
        new_id = model.id,
        kept = payload.keep_original,
        "Trimmed video"
    );

    let message = if payload.keep_original {
        "Video trimmed; original kept"
    } else {
        "Video trimmed; original removed"
    };
    Ok((
        StatusCode::CREATED,
        Json(TrimResponse {
            media: media_response(&state.db, model).await?,
            replaced_id: (!payload.keep_original).then_some(id),
            message: message.into(),
        }),
    ))
}

fn validate_range(start: f64, end: f64) -> Result<TrimRange, AppError> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 {
        return Err(AppError::Validation(
            "start_time and end_time must be finite and non-negative".into(),
        ));
    }
    if start >= end {
        return Err(AppError::Validation(
            "Start time must be less than end time".into(),
        ));
    }
    Ok(TrimRange { start, end })
}

async fn register_trimmed(
    state: &AppState,
    source: &media_file::Model,
    stored: &StoredFile,
    original_filename: String,
    keep_original: bool,
) -> Result<media_file::Model, AppError> {
    let txn = state.db.begin().await?;
    // The source may have been deleted while the trimmer ran.
    let source = find_media(&txn, source.id).await?;

    let model = media_file::ActiveModel {
        filename: Set(stored.filename.clone()),
        original_filename: Set(original_filename),
        file_type: Set(MediaKind::Video),
        like_count: Set(source.like_count),
        elo_rating: Set(state.config.rating.default_elo),
        file_path: Set(stored.path.to_string_lossy().into_owned()),
        file_size: Set(i64::try_from(stored.size).unwrap_or(i64::MAX)),
        file_hash: Set(stored.hash.to_hex()),
        description: Set(source.description.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let tags = TagService::new(&txn);
    let names: Vec<String> = tags
        .tags_of(source.id)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();
    tags.attach_all(model.id, &names).await?;

    if !keep_original {
        remove_media(&txn, &source).await?;
    }

    txn.commit().await?;
    if !keep_original {
        release_file(state.store.as_ref(), &source).await;
    }
    Ok(model)
}

async fn discard(state: &AppState, filename: &str) {
    if let Err(e) = state.store.delete(filename).await {
        warn!(filename, "Failed to remove trim output: {e}");
    }
}
