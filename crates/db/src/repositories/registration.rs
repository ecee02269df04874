//! Registration repository.

use std::sync::Arc;

use crate::entities::{
    Registration, User, Workshop, registration, registration::RegistrationStatus, user, workshop,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use workshop_common::{AppError, AppResult};

/// Registration repository for database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrationRepository {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a registration by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registration::Model>> {
        Registration::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a registration by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<registration::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RegistrationNotFound(id.to_string()))
    }

    /// Find the registration for a `(user, workshop)` pair, if any.
    pub async fn find_by_user_and_workshop(
        &self,
        user_id: &str,
        workshop_id: &str,
    ) -> AppResult<Option<registration::Model>> {
        Registration::find()
            .filter(registration::Column::UserId.eq(user_id))
            .filter(registration::Column::WorkshopId.eq(workshop_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All registrations of a user, joined with their workshop, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<(registration::Model, Option<workshop::Model>)>> {
        Registration::find()
            .filter(registration::Column::UserId.eq(user_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .find_also_related(Workshop)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All registrations for a workshop, joined with the registering user,
    /// newest first.
    pub async fn find_by_workshop(
        &self,
        workshop_id: &str,
    ) -> AppResult<Vec<(registration::Model, Option<user::Model>)>> {
        Registration::find()
            .filter(registration::Column::WorkshopId.eq(workshop_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .find_also_related(User)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Registrations awaiting admin review, oldest first.
    pub async fn list_pending(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        Registration::find()
            .filter(registration::Column::Status.is_in([
                RegistrationStatus::Pending,
                RegistrationStatus::PaymentPending,
            ]))
            .order_by_asc(registration::Column::RegisteredAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count registrations awaiting admin review.
    pub async fn count_pending(&self) -> AppResult<u64> {
        Registration::find()
            .filter(registration::Column::Status.is_in([
                RegistrationStatus::Pending,
                RegistrationStatus::PaymentPending,
            ]))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all registrations.
    pub async fn count_all(&self) -> AppResult<u64> {
        Registration::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count registrations with a given status.
    pub async fn count_by_status(&self, status: RegistrationStatus) -> AppResult<u64> {
        Registration::find()
            .filter(registration::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all registrations for a workshop.
    pub async fn count_by_workshop(&self, workshop_id: &str) -> AppResult<u64> {
        Registration::find()
            .filter(registration::Column::WorkshopId.eq(workshop_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count confirmed registrations for a workshop.
    pub async fn count_confirmed_by_workshop(&self, workshop_id: &str) -> AppResult<u64> {
        Registration::find()
            .filter(registration::Column::WorkshopId.eq(workshop_id))
            .filter(registration::Column::Status.eq(RegistrationStatus::Confirmed))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of workshop prices over confirmed registrations.
    ///
    /// Derived read-only view; the seat ledger stays authoritative for seat
    /// accounting.
    pub async fn sum_confirmed_revenue(&self) -> AppResult<f64> {
        let total: Option<Option<f64>> = Registration::find()
            .filter(registration::Column::Status.eq(RegistrationStatus::Confirmed))
            .join(JoinType::InnerJoin, registration::Relation::Workshop.def())
            .select_only()
            .column_as(workshop::Column::Price.sum(), "revenue")
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(total.flatten().unwrap_or(0.0))
    }

    /// Create a new registration.
    ///
    /// A unique-index violation on `(user_id, workshop_id)` maps to
    /// [`AppError::DuplicateRegistration`] so racing submits surface the same
    /// error as the pre-insert check.
    pub async fn create(&self, model: registration::ActiveModel) -> AppResult<registration::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
                AppError::DuplicateRegistration
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update a registration.
    pub async fn update(&self, model: registration::ActiveModel) -> AppResult<registration::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
