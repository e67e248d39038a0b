use std::str::FromStr;

use axum::Json;
use axum::body::Body;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use common::MediaKind;
use common::storage::{MediaStore, StoredFile};
use sea_orm::*;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{info, instrument, warn};

use crate::catalog::{CatalogService, Filter, ListParams, SAMPLE_SIZE, TypeFilter};
use crate::entity::media_file;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::models::media::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::tagging::TagService;
use crate::utils::filename::{sanitize_original_filename, split_extension};
use crate::utils::tags::tags_from_filename;

/// Uploads are limited per file by `storage.max_upload_size`, not per request.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::disable()
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Media",
    operation_id = "uploadMedia",
    summary = "Upload images and videos",
    description = "Accepts `multipart/form-data` with one or more `file` or `files[]` fields. \
        Each file is stored, hashed and auto-tagged from its filename. Files with unsupported \
        types, duplicate content or excessive size are reported in `skipped` instead of failing \
        the whole request.",
    request_body(content_type = "multipart/form-data", description = "Files to upload"),
    responses(
        (status = 201, description = "Upload processed", body = UploadResponse),
        (status = 400, description = "No file fields or malformed body (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut uploaded = Vec::new();
    let mut skipped = Vec::new();
    let mut received = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if !matches!(field.name(), Some("file" | "files[]")) {
            continue;
        }
        received += 1;
        let raw_name = field.file_name().unwrap_or_default().to_string();

        match ingest(&state, field, &raw_name).await {
            Ok(model) => uploaded.push(model),
            Err(
                err @ (AppError::Validation(_)
                | AppError::Conflict(_)
                | AppError::PayloadTooLarge(_)),
            ) => {
                info!(filename = %raw_name, reason = err.message(), "Skipped upload");
                skipped.push(SkippedFile {
                    filename: raw_name,
                    reason: err.message().to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    if received == 0 {
        return Err(AppError::Validation(
            "No files provided; use `file` or `files[]` fields".into(),
        ));
    }

    let uploaded = with_tags(&state.db, uploaded).await?;
    let message = format!(
        "Uploaded {} file(s), skipped {}",
        uploaded.len(),
        skipped.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            uploaded,
            skipped,
            message,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Media",
    operation_id = "listMedia",
    summary = "List media with pagination, sorting and filters",
    description = "Returns one page of the collection. `type` filters by kind, `tag` by exact \
        tag name, `sort` picks the order (`random` is a fresh permutation per request). A page \
        past the end returns an empty `data` array.",
    params(MediaListQuery),
    responses(
        (status = 200, description = "One page of media", body = MediaListResponse),
        (status = 400, description = "Invalid type, sort, page or count (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_media(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MediaListQuery>,
) -> Result<Json<MediaListResponse>, AppError> {
    let params = ListParams::parse(
        query.kind.as_deref(),
        query.sort.as_deref(),
        query.tag.as_deref(),
        query.page,
        query.count,
    )?;

    let page = CatalogService::new(&state.db).list(&params).await?;
    let pagination = Pagination::from(&page);
    let data = with_tags(&state.db, page.items).await?;

    Ok(Json(MediaListResponse { data, pagination }))
}

#[utoipa::path(
    get,
    path = "/sample",
    tag = "Media",
    operation_id = "sampleMedia",
    summary = "Random sample for the gallery front page",
    description = "Up to 10 distinct records drawn uniformly from the filtered collection.",
    params(SampleQuery),
    responses(
        (status = 200, description = "Sampled media", body = Vec<MediaResponse>),
        (status = 400, description = "Invalid type (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn sample_media(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SampleQuery>,
) -> Result<Json<Vec<MediaResponse>>, AppError> {
    let kind = parse_kind(query.kind.as_deref())?;
    let filter = Filter::new(kind, query.tag.as_deref());

    let sample = CatalogService::new(&state.db)
        .sample(&filter, SAMPLE_SIZE)
        .await?;

    Ok(Json(with_tags(&state.db, sample).await?))
}

#[utoipa::path(
    get,
    path = "/random",
    tag = "Media",
    operation_id = "randomMedia",
    summary = "One random record",
    params(RandomQuery),
    responses(
        (status = 200, description = "A uniformly drawn record", body = MediaResponse),
        (status = 400, description = "Invalid type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Nothing matches (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn random_media(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RandomQuery>,
) -> Result<Json<MediaResponse>, AppError> {
    let kind = parse_kind(query.kind.as_deref())?;

    let model = CatalogService::new(&state.db)
        .random_one(&Filter::of_kind(kind))
        .await?
        .ok_or_else(|| AppError::NotFound("No media files found".into()))?;

    Ok(Json(media_response(&state.db, model).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Media",
    operation_id = "getMedia",
    summary = "Get a media record",
    params(("id" = i32, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media details", body = MediaResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MediaResponse>, AppError> {
    let model = find_media(&state.db, id).await?;
    Ok(Json(media_response(&state.db, model).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Media",
    operation_id = "updateMedia",
    summary = "Edit display name or description",
    description = "Absent fields are left unchanged. `description: null` clears the description.",
    params(("id" = i32, Path, description = "Media id")),
    request_body = UpdateMediaRequest,
    responses(
        (status = 200, description = "Updated media", body = MediaResponse),
        (status = 400, description = "Invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateMediaRequest>,
) -> Result<Json<MediaResponse>, AppError> {
    let txn = state.db.begin().await?;
    let model = find_media(&txn, id).await?;

    let mut active: media_file::ActiveModel = model.into();
    if let Some(name) = payload.original_filename {
        let name =
            sanitize_original_filename(&name).map_err(|e| AppError::Validation(e.message().into()))?;
        active.original_filename = Set(name);
    }
    if let Some(description) = payload.description {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        active.description = Set(description);
    }

    let model = if active.is_changed() {
        active.update(&txn).await?
    } else {
        find_media(&txn, id).await?
    };
    let response = media_response(&txn, model).await?;
    txn.commit().await?;

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Media",
    operation_id = "deleteMedia",
    summary = "Delete a media record and its file",
    params(("id" = i32, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media deleted", body = DeleteResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DeleteResponse>, AppError> {
    let txn = state.db.begin().await?;
    let model = find_media(&txn, id).await?;
    remove_media(&txn, &model).await?;
    txn.commit().await?;
    release_file(state.store.as_ref(), &model).await;

    info!(id, filename = %model.filename, "Deleted media");
    Ok(Json(DeleteResponse {
        id,
        message: format!("File \"{}\" deleted", model.original_filename),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/content",
    tag = "Media",
    operation_id = "getMediaContent",
    summary = "Download the stored bytes",
    description = "Streams the file. The ETag is the content hash; a matching `If-None-Match` \
        returns 304.",
    params(("id" = i32, Path, description = "Media id")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 304, description = "Not modified"),
        (status = 404, description = "Media or content not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(id))]
pub async fn media_content(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let model = find_media(&state.db, id).await?;

    let etag_value = format!("\"{}\"", model.file_hash);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let reader = state.store.get_stream(&model.filename).await?;
    let body = Body::from_stream(ReaderStream::new(reader));
    let content_type = mime_guess::from_path(&model.filename).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, model.file_size.to_string())
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

fn parse_kind(raw: Option<&str>) -> Result<TypeFilter, AppError> {
    Ok(raw
        .map(TypeFilter::from_str)
        .transpose()?
        .unwrap_or_default())
}

pub(crate) async fn find_media<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<media_file::Model, AppError> {
    media_file::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Media file not found".into()))
}

/// Build the response for one record, loading its tags.
pub(crate) async fn media_response<C: ConnectionTrait>(
    db: &C,
    model: media_file::Model,
) -> Result<MediaResponse, AppError> {
    let tags = TagService::new(db).tags_of(model.id).await?;
    Ok(MediaResponse::new(model, tags))
}

/// Build responses for many records with one tag lookup, keeping their order.
pub(crate) async fn with_tags<C: ConnectionTrait>(
    db: &C,
    models: Vec<media_file::Model>,
) -> Result<Vec<MediaResponse>, AppError> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut tags = TagService::new(db).tags_for(&ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let t = tags.remove(&m.id).unwrap_or_default();
            MediaResponse::new(m, t)
        })
        .collect())
}

/// Delete a record's tag associations and row. The stored file stays until
/// the caller has committed and calls [`release_file`].
pub(crate) async fn remove_media<C: ConnectionTrait>(
    db: &C,
    model: &media_file::Model,
) -> Result<(), AppError> {
    TagService::new(db).detach_file(model.id).await?;
    media_file::Entity::delete_by_id(model.id).exec(db).await?;
    Ok(())
}

/// Remove the bytes of a record whose deletion is already committed.
/// Failures leave an orphaned file behind and are only logged.
pub(crate) async fn release_file(store: &dyn MediaStore, model: &media_file::Model) {
    match store.delete(&model.filename).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(id = model.id, filename = %model.filename, "Stored file was already missing");
        }
        Err(e) => {
            warn!(id = model.id, filename = %model.filename, "Failed to remove stored file: {e}");
        }
    }
}

/// Validate, store and register one uploaded file. Stored bytes are removed
/// again if the record cannot be created.
async fn ingest(
    state: &AppState,
    field: Field<'_>,
    raw_name: &str,
) -> Result<media_file::Model, AppError> {
    let original_filename =
        sanitize_original_filename(raw_name).map_err(|e| AppError::Validation(e.message().into()))?;
    let kind = MediaKind::detect(&original_filename)
        .ok_or_else(|| AppError::Validation("Unsupported file type".into()))?;
    let (_, extension) = split_extension(&original_filename);

    let stored = stream_field_to_store(
        field,
        state.store.as_ref(),
        extension,
        state.config.storage.max_upload_size,
    )
    .await?;

    match register(state, &original_filename, kind, &stored).await {
        Ok(model) => Ok(model),
        Err(err) => {
            if let Err(e) = state.store.delete(&stored.filename).await {
                warn!(filename = %stored.filename, "Failed to remove unregistered upload: {e}");
            }
            Err(err)
        }
    }
}

async fn register(
    state: &AppState,
    original_filename: &str,
    kind: MediaKind,
    stored: &StoredFile,
) -> Result<media_file::Model, AppError> {
    let file_hash = stored.hash.to_hex();
    let txn = state.db.begin().await?;

    if let Some(existing) = media_file::Entity::find()
        .filter(media_file::Column::FileHash.eq(&file_hash))
        .one(&txn)
        .await?
    {
        return Err(AppError::Conflict(format!(
            "Duplicate of existing file #{}",
            existing.id
        )));
    }

    let model = media_file::ActiveModel {
        filename: Set(stored.filename.clone()),
        original_filename: Set(original_filename.to_string()),
        file_type: Set(kind),
        like_count: Set(0),
        elo_rating: Set(state.config.rating.default_elo),
        file_path: Set(stored.path.to_string_lossy().into_owned()),
        file_size: Set(i64::try_from(stored.size).unwrap_or(i64::MAX)),
        file_hash: Set(file_hash),
        description: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    TagService::new(&txn)
        .attach_all(model.id, &tags_from_filename(original_filename))
        .await?;
    txn.commit().await?;

    info!(id = model.id, filename = %model.filename, %kind, size = stored.size, "Registered upload");
    Ok(model)
}

/// Stream a multipart field straight into a store allocation.
async fn stream_field_to_store(
    mut field: Field<'_>,
    store: &dyn MediaStore,
    extension: &str,
    max_size: u64,
) -> Result<StoredFile, AppError> {
    let allocation = store.allocate(extension).await?;
    let filename = allocation.filename.clone();

    let written = async {
        let mut file = tokio::fs::File::create(&allocation.path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload file: {e}")))?;

        let mut total_size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Upload write failed: {e}")))?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::Internal(format!("Upload flush failed: {e}")))?;
        Ok(())
    }
    .await;

    let result = match written {
        Ok(()) => store.finalize(allocation).await.map_err(AppError::from),
        Err(e) => Err(e),
    };

    if result.is_err() {
        // Best effort.
        let _ = store.delete(&filename).await;
    }
    result
}
