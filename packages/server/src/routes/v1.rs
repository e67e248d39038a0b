use tracing::info;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::AppConfig;
use crate::handlers::{admin, adventure, compare, media, rating, tags, trim};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    if !config.features.is_enabled(adventure::FEATURE) {
        info!("Adventure feature disabled");
    }

    OpenApiRouter::new()
        .nest("/media", media_routes())
        .routes(routes!(media::random_media))
        .nest("/compare", compare_routes())
        .nest("/tags", tag_routes())
        .nest("/admin", admin_routes())
        .nest("/adventure", adventure_routes())
}

fn media_routes() -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(media::list_media, media::upload_media))
        .layer(media::upload_body_limit());

    OpenApiRouter::new()
        .merge(upload)
        .routes(routes!(media::sample_media))
        .routes(routes!(
            media::get_media,
            media::update_media,
            media::delete_media
        ))
        .routes(routes!(media::media_content))
        .routes(routes!(rating::like_media))
        .routes(routes!(rating::dislike_media))
        .routes(routes!(tags::add_tag))
        .routes(routes!(tags::remove_tag))
        .routes(routes!(trim::trim_video))
}

fn compare_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(compare::compare_pair))
        .routes(routes!(compare::draw_challenger))
        .routes(routes!(compare::vote))
}

fn tag_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(tags::list_tags))
        .routes(routes!(tags::search_tags))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admin::export_likes))
        .routes(routes!(admin::reset_likes))
        .routes(routes!(admin::reset_elo))
        .routes(routes!(admin::cleanup_tags))
}

fn adventure_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(adventure::start_adventure))
        .routes(routes!(adventure::like_range))
}
