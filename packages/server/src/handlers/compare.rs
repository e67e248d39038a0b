use axum::Json;
use axum::extract::State;
use tracing::instrument;

use super::media::{find_media, media_response, with_tags};
use crate::catalog::CatalogService;
use crate::entity::media_file;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppQuery};
use crate::models::compare::*;
use crate::scoring::ScoringService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Compare",
    operation_id = "comparePair",
    summary = "Draw two records to compare",
    description = "Two distinct records drawn uniformly. With `matching_types=true` both share a \
        file type, chosen uniformly among types that have at least two records.",
    params(CompareQuery),
    responses(
        (status = 200, description = "A pair to compare", body = ComparePairResponse),
        (status = 404, description = "Fewer than two eligible records (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(matching_types = query.matching_types))]
pub async fn compare_pair(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompareQuery>,
) -> Result<Json<ComparePairResponse>, AppError> {
    let (left, right) = CatalogService::new(&state.db)
        .compare_pair(query.matching_types)
        .await?
        .ok_or_else(|| AppError::NotFound("Need at least 2 files to compare".into()))?;

    let mut pair = with_tags(&state.db, vec![left, right]).await?.into_iter();
    match (pair.next(), pair.next()) {
        (Some(left), Some(right)) => Ok(Json(ComparePairResponse { left, right })),
        _ => Err(AppError::Internal("comparison pair lost a record".into())),
    }
}

#[utoipa::path(
    get,
    path = "/challenger",
    tag = "Compare",
    operation_id = "drawChallenger",
    summary = "Draw a new challenger for a King of the Hill champion",
    params(ChallengerQuery),
    responses(
        (status = 200, description = "Champion and challenger; challenger is null when none is left", body = ChallengerResponse),
        (status = 404, description = "Champion not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(champion_id = query.champion_id))]
pub async fn draw_challenger(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ChallengerQuery>,
) -> Result<Json<ChallengerResponse>, AppError> {
    let champion = find_media(&state.db, query.champion_id).await?;
    Ok(Json(
        next_round(&state, champion, query.matching_types).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/vote",
    tag = "Compare",
    operation_id = "vote",
    summary = "Record the outcome of a comparison",
    description = "Applies one ELO update computed from both pre-vote ratings. With \
        `king_of_hill`, the response carries the next round: the winner as champion and a \
        fresh challenger.",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Updated ratings", body = VoteResponse),
        (status = 400, description = "winner_id equals loser_id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Winner or loser not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(winner_id = payload.winner_id, loser_id = payload.loser_id))]
pub async fn vote(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let result = ScoringService::new(&state.db, state.config.rating)
        .record_comparison(payload.winner_id, payload.loser_id)
        .await?;

    let winner = RatedMedia::from(&result.winner);
    let loser = RatedMedia::from(&result.loser);
    let next = if payload.king_of_hill {
        Some(next_round(&state, result.winner, payload.matching_types).await?)
    } else {
        None
    };

    Ok(Json(VoteResponse {
        winner,
        loser,
        next,
    }))
}

async fn next_round(
    state: &AppState,
    champion: media_file::Model,
    matching_types: bool,
) -> Result<ChallengerResponse, AppError> {
    let challenger = CatalogService::new(&state.db)
        .challenger(&champion, matching_types)
        .await?;

    let challenger = match challenger {
        Some(model) => Some(media_response(&state.db, model).await?),
        None => None,
    };
    let champion = media_response(&state.db, champion).await?;

    Ok(ChallengerResponse {
        champion,
        challenger,
    })
}
