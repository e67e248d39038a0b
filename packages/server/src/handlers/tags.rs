use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::TransactionTrait;
use tracing::{info, instrument};

use super::media::find_media;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::models::tag::*;
use crate::state::AppState;
use crate::tagging::TagService;
use crate::utils::tags::normalize_tag;

#[utoipa::path(
    get,
    path = "/",
    tag = "Tags",
    operation_id = "listTags",
    summary = "List all tags",
    responses(
        (status = 200, description = "All tags, alphabetically", body = Vec<TagResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = TagService::new(&state.db).all().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Tags",
    operation_id = "searchTags",
    summary = "Autocomplete tag names",
    description = "Up to 10 tags whose name contains `q`, case-insensitively.",
    params(TagSearchQuery),
    responses(
        (status = 200, description = "Matching tags", body = Vec<TagResponse>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_tags(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TagSearchQuery>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = TagService::new(&state.db)
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/tags",
    tag = "Tags",
    operation_id = "addTag",
    summary = "Attach a tag to a media record",
    description = "The name is trimmed and lower-cased; the tag is created if it does not exist.",
    params(("id" = i32, Path, description = "Media id")),
    request_body = AddTagRequest,
    responses(
        (status = 201, description = "Tag attached", body = TagChangeResponse),
        (status = 400, description = "Empty or too long tag name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Tag already attached (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn add_tag(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<AddTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = normalize_tag(&payload.tag_name)
        .ok_or_else(|| AppError::Validation("Tag name must be 1-50 characters".into()))?;

    let txn = state.db.begin().await?;
    find_media(&txn, id).await?;
    let tag = TagService::new(&txn).attach(id, &name).await?;
    txn.commit().await?;

    info!(id, tag_id = tag.id, name = %tag.name, "Tag attached");
    Ok((
        StatusCode::CREATED,
        Json(TagChangeResponse {
            message: format!("Tag \"{}\" added", tag.name),
            tag: tag.into(),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}/tags/{tag_id}",
    tag = "Tags",
    operation_id = "removeTag",
    summary = "Detach a tag from a media record",
    description = "A tag left without any media is deleted.",
    params(
        ("id" = i32, Path, description = "Media id"),
        ("tag_id" = i32, Path, description = "Tag id"),
    ),
    responses(
        (status = 200, description = "Tag detached", body = TagChangeResponse),
        (status = 404, description = "Media, tag or association not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id, tag_id))]
pub async fn remove_tag(
    State(state): State<AppState>,
    AppPath((id, tag_id)): AppPath<(i32, i32)>,
) -> Result<Json<TagChangeResponse>, AppError> {
    let txn = state.db.begin().await?;
    find_media(&txn, id).await?;
    let tag = TagService::new(&txn).detach(id, tag_id).await?;
    txn.commit().await?;

    Ok(Json(TagChangeResponse {
        message: format!("Tag \"{}\" removed", tag.name),
        tag: tag.into(),
    }))
}
