//! Tag repository.

use std::sync::Arc;

use crate::entities::{Tag, WorkshopTag, tag, workshop_tag};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use workshop_common::{AppError, AppResult};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tag by its lowercase name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tag.
    pub async fn create(&self, model: tag::ActiveModel) -> AppResult<tag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tags attached to a workshop, alphabetical.
    pub async fn find_for_workshop(&self, workshop_id: &str) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .join(JoinType::InnerJoin, tag::Relation::WorkshopTag.def())
            .filter(workshop_tag::Column::WorkshopId.eq(workshop_id))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a tag to a workshop; a no-op when the link already exists.
    pub async fn link(&self, workshop_id: &str, tag_id: &str) -> AppResult<()> {
        let existing = WorkshopTag::find_by_id((workshop_id.to_string(), tag_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            return Ok(());
        }

        let model = workshop_tag::ActiveModel {
            workshop_id: Set(workshop_id.to_string()),
            tag_id: Set(tag_id.to_string()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Detach every tag from a workshop.
    pub async fn unlink_all(&self, workshop_id: &str) -> AppResult<u64> {
        let result = WorkshopTag::delete_many()
            .filter(workshop_tag::Column::WorkshopId.eq(workshop_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_tag(id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let tag = create_test_tag("t1", "rust");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag.clone()]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_by_name("rust").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "t1");
    }

    #[tokio::test]
    async fn test_link_skips_existing() {
        let link = workshop_tag::Model {
            workshop_id: "w1".to_string(),
            tag_id: "t1".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        // Existing link found, no insert attempted (no exec result queued).
        repo.link("w1", "t1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unlink_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let removed = repo.unlink_all("w1").await.unwrap();

        assert_eq!(removed, 2);
    }
}
