use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{LikeExpr, Query as SeaQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::entity::{file_tag, tag};
use crate::error::AppError;
use crate::models::shared::escape_like;

/// Most suggestions returned by a tag search.
pub const SEARCH_LIMIT: u64 = 10;

/// Tag lookup and `file_tag` bookkeeping. Callers own the transaction.
pub struct TagService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> TagService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn all(&self) -> Result<Vec<tag::Model>, AppError> {
        Ok(tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(self.conn)
            .await?)
    }

    /// Tags whose name contains `query`, alphabetically.
    pub async fn search(&self, query: &str) -> Result<Vec<tag::Model>, AppError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let pattern = format!("%{}%", escape_like(&query));
        Ok(tag::Entity::find()
            .filter(tag::Column::Name.like(LikeExpr::new(pattern).escape('\\')))
            .order_by_asc(tag::Column::Name)
            .limit(SEARCH_LIMIT)
            .all(self.conn)
            .await?)
    }

    /// Tags of each file in `file_ids`, sorted by name. Files without tags are absent.
    pub async fn tags_for(
        &self,
        file_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<tag::Model>>, AppError> {
        if file_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = file_tag::Entity::find()
            .filter(file_tag::Column::FileId.is_in(file_ids.to_vec()))
            .all(self.conn)
            .await?;
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let tag_ids: Vec<i32> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<i32, tag::Model> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let mut by_file: HashMap<i32, Vec<tag::Model>> = HashMap::new();
        for link in links {
            if let Some(t) = tags.get(&link.tag_id) {
                by_file.entry(link.file_id).or_default().push(t.clone());
            }
        }
        for list in by_file.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(by_file)
    }

    /// Tags of a single file, sorted by name.
    pub async fn tags_of(&self, file_id: i32) -> Result<Vec<tag::Model>, AppError> {
        Ok(self
            .tags_for(&[file_id])
            .await?
            .remove(&file_id)
            .unwrap_or_default())
    }

    /// Look up a tag by its normalized name, creating it when missing.
    pub async fn find_or_create(&self, name: &str) -> Result<tag::Model, AppError> {
        if let Some(existing) = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.conn)
            .await?
        {
            return Ok(existing);
        }

        let created = tag::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        Ok(created)
    }

    async fn is_attached(&self, file_id: i32, tag_id: i32) -> Result<bool, AppError> {
        Ok(file_tag::Entity::find_by_id((file_id, tag_id))
            .one(self.conn)
            .await?
            .is_some())
    }

    /// Attach a normalized tag name to a file. Conflict if already attached.
    pub async fn attach(&self, file_id: i32, name: &str) -> Result<tag::Model, AppError> {
        let tag = self.find_or_create(name).await?;
        if self.is_attached(file_id, tag.id).await? {
            return Err(AppError::Conflict(format!(
                "Tag \"{name}\" is already attached to this file"
            )));
        }

        file_tag::ActiveModel {
            file_id: Set(file_id),
            tag_id: Set(tag.id),
        }
        .insert(self.conn)
        .await?;
        Ok(tag)
    }

    /// Attach every name that is not attached yet. Used for auto-tagging and copies.
    pub async fn attach_all(&self, file_id: i32, names: &[String]) -> Result<(), AppError> {
        for name in names {
            let tag = self.find_or_create(name).await?;
            if self.is_attached(file_id, tag.id).await? {
                continue;
            }
            file_tag::ActiveModel {
                file_id: Set(file_id),
                tag_id: Set(tag.id),
            }
            .insert(self.conn)
            .await?;
        }
        Ok(())
    }

    /// Remove a tag from a file, deleting the tag if no file uses it anymore.
    pub async fn detach(&self, file_id: i32, tag_id: i32) -> Result<tag::Model, AppError> {
        let tag = tag::Entity::find_by_id(tag_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".into()))?;

        let removed = file_tag::Entity::delete_by_id((file_id, tag_id))
            .exec(self.conn)
            .await?;
        if removed.rows_affected == 0 {
            return Err(AppError::NotFound("Tag not found on this file".into()));
        }

        let still_used = file_tag::Entity::find()
            .filter(file_tag::Column::TagId.eq(tag_id))
            .one(self.conn)
            .await?
            .is_some();
        if !still_used {
            tag::Entity::delete_by_id(tag_id).exec(self.conn).await?;
            info!(tag_id, name = %tag.name, "Deleted orphaned tag");
        }

        Ok(tag)
    }

    /// Drop every association of a file. Must run before the file row is deleted.
    pub async fn detach_file(&self, file_id: i32) -> Result<u64, AppError> {
        let result = file_tag::Entity::delete_many()
            .filter(file_tag::Column::FileId.eq(file_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Delete all tags that no file references. Returns how many were removed.
    pub async fn cleanup_orphans(&self) -> Result<u64, AppError> {
        let result = tag::Entity::delete_many()
            .filter(
                tag::Column::Id.not_in_subquery(
                    SeaQuery::select()
                        .column(file_tag::Column::TagId)
                        .from(file_tag::Entity)
                        .to_owned(),
                ),
            )
            .exec(self.conn)
            .await?;

        info!(removed = result.rows_affected, "Cleaned up orphaned tags");
        Ok(result.rows_affected)
    }
}
