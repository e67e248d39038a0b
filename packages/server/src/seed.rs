use sea_orm::sea_query::{Index, IndexCreateStatement, SqliteQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{file_tag, media_file};

/// Ensure the indexes backing listing, sorting and tag lookups exist.
///
/// Schema sync only creates single-column indexes declared on entities,
/// so composite and sort indexes are created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Type filter with newest/oldest ordering.
    create(
        db,
        "idx_media_file_type_created",
        Index::create()
            .table(media_file::Entity)
            .col(media_file::Column::FileType)
            .col(media_file::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    create(
        db,
        "idx_media_file_elo",
        Index::create()
            .table(media_file::Entity)
            .col(media_file::Column::EloRating)
            .to_owned(),
    )
    .await;

    create(
        db,
        "idx_media_file_likes",
        Index::create()
            .table(media_file::Entity)
            .col(media_file::Column::LikeCount)
            .to_owned(),
    )
    .await;

    // Tag filter and orphan cleanup look up associations by tag.
    create(
        db,
        "idx_file_tag_tag",
        Index::create()
            .table(file_tag::Entity)
            .col(file_tag::Column::TagId)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn create(db: &DatabaseConnection, name: &str, mut stmt: IndexCreateStatement) {
    let sql = stmt
        .if_not_exists()
        .name(name)
        .to_string(SqliteQueryBuilder);
    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {name} exists"),
        Err(e) => warn!("Failed to create index {name}: {e}"),
    }
}
