use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

use super::elo;
use crate::config::RatingConfig;
use crate::entity::media_file;
use crate::error::AppError;

/// Direction of a single like-counter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    fn step(self) -> i64 {
        match self {
            Vote::Like => 1,
            Vote::Dislike => -1,
        }
    }
}

/// Both participants of a comparison after their ratings were committed.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub winner: media_file::Model,
    pub loser: media_file::Model,
}

/// Mutations of `like_count` and `elo_rating`. Every operation commits in one transaction.
pub struct ScoringService<'a> {
    conn: &'a DatabaseConnection,
    rating: RatingConfig,
}

impl<'a> ScoringService<'a> {
    pub fn new(conn: &'a DatabaseConnection, rating: RatingConfig) -> Self {
        Self { conn, rating }
    }

    /// Move `like_count` by exactly one and return the new value. No clamping.
    pub async fn cast(&self, id: i32, vote: Vote) -> Result<i64, AppError> {
        let txn = self.conn.begin().await?;

        let result = media_file::Entity::update_many()
            .col_expr(
                media_file::Column::LikeCount,
                Expr::col(media_file::Column::LikeCount).add(vote.step()),
            )
            .filter(media_file::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Media file not found".into()));
        }

        let like_count: i64 = media_file::Entity::find_by_id(id)
            .select_only()
            .column(media_file::Column::LikeCount)
            .into_tuple()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Internal("media_file missing after update".into()))?;

        txn.commit().await?;
        Ok(like_count)
    }

    /// Apply one ELO comparison to both records, computed from their pre-update ratings.
    pub async fn record_comparison(
        &self,
        winner_id: i32,
        loser_id: i32,
    ) -> Result<ComparisonResult, AppError> {
        if winner_id == loser_id {
            return Err(AppError::Validation(
                "winner_id and loser_id must differ".into(),
            ));
        }

        let txn = self.conn.begin().await?;

        let winner = media_file::Entity::find_by_id(winner_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media file {winner_id} not found")))?;
        let loser = media_file::Entity::find_by_id(loser_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media file {loser_id} not found")))?;

        let outcome = elo::rate(winner.elo_rating, loser.elo_rating, self.rating.k_factor);

        let mut winner_active: media_file::ActiveModel = winner.into();
        winner_active.elo_rating = Set(outcome.winner);
        let winner = winner_active.update(&txn).await?;

        let mut loser_active: media_file::ActiveModel = loser.into();
        loser_active.elo_rating = Set(outcome.loser);
        let loser = loser_active.update(&txn).await?;

        txn.commit().await?;

        info!(
            winner_id,
            loser_id,
            winner_elo = winner.elo_rating,
            loser_elo = loser.elo_rating,
            "Recorded comparison"
        );

        Ok(ComparisonResult { winner, loser })
    }

    /// Set every `like_count` to 0. Returns the number of affected rows.
    pub async fn reset_likes(&self) -> Result<u64, AppError> {
        let txn = self.conn.begin().await?;
        let result = media_file::Entity::update_many()
            .col_expr(media_file::Column::LikeCount, Expr::value(0i64))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(affected = result.rows_affected, "Reset like counts");
        Ok(result.rows_affected)
    }

    /// Restore every `elo_rating` to the configured default. Returns the number of affected rows.
    pub async fn reset_elo(&self) -> Result<u64, AppError> {
        let txn = self.conn.begin().await?;
        let result = media_file::Entity::update_many()
            .col_expr(
                media_file::Column::EloRating,
                Expr::value(self.rating.default_elo),
            )
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(affected = result.rows_affected, "Reset ELO ratings");
        Ok(result.rows_affected)
    }
}
