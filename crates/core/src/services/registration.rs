//! Registration workflow service.
//!
//! Governs a registration's lifecycle from submission to confirmed/rejected,
//! including the auto-confirm vs. manual-approval branching and the
//! payment-verification gate. Seat accounting goes through a single
//! conditional UPDATE on the workshop row, always inside the same
//! transaction as the registration mutation, so the ledger invariant
//! `available_seats = max_seats - count(confirmed)` holds under concurrent
//! callers.

use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait, Value, prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;
use workshop_common::{AppError, AppResult};
use workshop_db::entities::{
    Registration, Workshop, registration,
    registration::{PaymentMethod, PaymentStatus, RegistrationStatus},
    user, workshop,
    workshop::{WorkshopMode, WorkshopStatus},
};
use workshop_db::repositories::{RegistrationRepository, WorkshopRepository};

/// Input for submitting a registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRegistrationInput {
    pub workshop_id: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,
    #[validate(length(max = 100))]
    pub upi_id: Option<String>,
    #[validate(length(max = 500))]
    pub payment_screenshot_url: Option<String>,
}

/// Initial registration state from workshop price and mode.
///
/// | price | mode      | status          | payment status |
/// |-------|-----------|-----------------|----------------|
/// | 0     | automated | confirmed       | not required   |
/// | 0     | manual    | pending         | not required   |
/// | >0    | manual    | pending         | pending        |
/// | >0    | automated | payment pending | pending        |
const fn initial_state(paid: bool, mode: WorkshopMode) -> (RegistrationStatus, PaymentStatus) {
    match (paid, mode) {
        (false, WorkshopMode::Automated) => {
            (RegistrationStatus::Confirmed, PaymentStatus::NotRequired)
        }
        (false, WorkshopMode::Manual) => (RegistrationStatus::Pending, PaymentStatus::NotRequired),
        (true, WorkshopMode::Manual) => (RegistrationStatus::Pending, PaymentStatus::Pending),
        (true, WorkshopMode::Automated) => {
            (RegistrationStatus::PaymentPending, PaymentStatus::Pending)
        }
    }
}

const fn is_reviewable(status: RegistrationStatus) -> bool {
    matches!(
        status,
        RegistrationStatus::Pending | RegistrationStatus::PaymentPending
    )
}

/// Service for the registration approval workflow.
#[derive(Clone)]
pub struct RegistrationService {
    db: Arc<DatabaseConnection>,
    registration_repo: RegistrationRepository,
}

impl RegistrationService {
    /// Create a new registration service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            registration_repo: RegistrationRepository::new(db.clone()),
            db,
        }
    }

    /// Submit a registration for a workshop.
    ///
    /// The workshop must be active with seats remaining, and the user must
    /// not already hold a registration for it. Paid workshops require a
    /// transaction ID and a payment screenshot reference up front. On the
    /// free/automated path the registration confirms immediately and the
    /// seat is taken in the same transaction as the insert.
    pub async fn submit(
        &self,
        user_id: &str,
        input: SubmitRegistrationInput,
    ) -> AppResult<registration::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let workshop = Workshop::find_by_id(&input.workshop_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::WorkshopNotFound(input.workshop_id.clone()))?;

        if workshop.status != WorkshopStatus::Active {
            return Err(AppError::Validation(
                "Workshop is not open for registration".to_string(),
            ));
        }

        if workshop.available_seats <= 0 {
            return Err(AppError::SoldOut);
        }

        let existing = Registration::find()
            .filter(registration::Column::UserId.eq(user_id))
            .filter(registration::Column::WorkshopId.eq(workshop.id.as_str()))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::DuplicateRegistration);
        }

        let paid = workshop.price > 0.0;
        if paid {
            if input
                .transaction_id
                .as_deref()
                .is_none_or(|t| t.trim().is_empty())
            {
                return Err(AppError::Validation(
                    "Transaction ID is required for paid workshops".to_string(),
                ));
            }
            if input
                .payment_screenshot_url
                .as_deref()
                .is_none_or(|u| u.trim().is_empty())
            {
                return Err(AppError::Validation(
                    "Payment screenshot is required for paid workshops".to_string(),
                ));
            }
        }

        let (status, payment_status) = initial_state(paid, workshop.mode);
        let auto_confirmed = status == RegistrationStatus::Confirmed;
        let now = chrono::Utc::now();

        let model = registration::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(user_id.to_string()),
            workshop_id: Set(workshop.id.clone()),
            registration_type: Set(workshop.mode),
            status: Set(status),
            payment_status: Set(payment_status),
            payment_verified: Set(false),
            payment_method: Set(if paid { input.payment_method } else { None }),
            transaction_id: Set(if paid { input.transaction_id } else { None }),
            upi_id: Set(if paid { input.upi_id } else { None }),
            payment_screenshot_url: Set(if paid { input.payment_screenshot_url } else { None }),
            notes: Set(input.notes),
            admin_notes: Set(None),
            registered_at: Set(now.into()),
            confirmed_at: Set(if auto_confirmed { Some(now.into()) } else { None }),
        };

        // The unique index on (user_id, workshop_id) backs the pre-insert
        // check against racing submits.
        let created = model.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::DuplicateRegistration
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        if auto_confirmed {
            let taken = WorkshopRepository::decrement_available_seats(&txn, &workshop.id).await?;
            if !taken {
                // Transaction rolls back on drop; no orphaned row remains.
                return Err(AppError::SoldOut);
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            registration = %created.id,
            workshop = %workshop.id,
            status = ?created.status,
            "Registration submitted"
        );

        Ok(created)
    }

    /// Mark the payment evidence of a registration as verified.
    ///
    /// Idempotent: a registration that is already verified is returned
    /// unchanged. Otherwise valid only while the payment is pending on a
    /// paid workshop. Never touches the registration status.
    pub async fn verify_payment(&self, registration_id: &str) -> AppResult<registration::Model> {
        let registration = self.registration_repo.get_by_id(registration_id).await?;

        if registration.payment_verified {
            return Ok(registration);
        }

        let workshop = Workshop::find_by_id(&registration.workshop_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::WorkshopNotFound(registration.workshop_id.clone()))?;

        if workshop.price <= 0.0 {
            return Err(AppError::Validation(
                "No payment is required for this workshop".to_string(),
            ));
        }

        if registration.payment_status != PaymentStatus::Pending {
            return Err(AppError::Validation(
                "Payment is not awaiting verification".to_string(),
            ));
        }

        let mut model: registration::ActiveModel = registration.into();
        model.payment_verified = Set(true);
        model.payment_status = Set(PaymentStatus::Completed);

        let updated = self.registration_repo.update(model).await?;

        tracing::info!(
            registration = %updated.id,
            "Payment verified"
        );

        Ok(updated)
    }

    /// Approve a pending registration, allocating a seat.
    ///
    /// The status flip and the seat decrement run in one transaction: the
    /// flip is a conditional UPDATE guarded by the reviewable statuses (so a
    /// racing approve of the same registration cannot confirm twice), and
    /// the decrement is guarded by `available_seats > 0` (so two approvals
    /// cannot share the last seat). Either guard failing rolls back both.
    pub async fn approve(
        &self,
        registration_id: &str,
        admin_notes: Option<&str>,
    ) -> AppResult<registration::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let registration = Registration::find_by_id(registration_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::RegistrationNotFound(registration_id.to_string()))?;

        if !is_reviewable(registration.status) {
            return Err(AppError::Validation(
                "Registration already reviewed".to_string(),
            ));
        }

        let workshop = Workshop::find_by_id(&registration.workshop_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::WorkshopNotFound(registration.workshop_id.clone()))?;

        if workshop.price > 0.0 && !registration.payment_verified {
            return Err(AppError::PaymentNotVerified);
        }

        let now = chrono::Utc::now();

        // Conditional flip: only one approval can move the row out of a
        // reviewable status.
        let flipped = Registration::update_many()
            .col_expr(
                registration::Column::Status,
                Expr::value(RegistrationStatus::Confirmed.into_value()),
            )
            .col_expr(
                registration::Column::AdminNotes,
                Expr::value(Value::from(admin_notes.map(ToString::to_string))),
            )
            .col_expr(
                registration::Column::ConfirmedAt,
                Expr::value(Value::from(Some(DateTimeWithTimeZone::from(now)))),
            )
            .filter(registration::Column::Id.eq(registration_id))
            .filter(registration::Column::Status.is_in([
                RegistrationStatus::Pending,
                RegistrationStatus::PaymentPending,
            ]))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if flipped.rows_affected == 0 {
            return Err(AppError::Validation(
                "Registration already reviewed".to_string(),
            ));
        }

        let taken = WorkshopRepository::decrement_available_seats(&txn, &workshop.id).await?;
        if !taken {
            // Roll back the flip; the seat count did not move.
            return Err(AppError::SeatsExhausted);
        }

        let confirmed = Registration::find_by_id(registration_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::RegistrationNotFound(registration_id.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            registration = %confirmed.id,
            workshop = %workshop.id,
            "Registration approved"
        );

        Ok(confirmed)
    }

    /// Reject a pending registration.
    ///
    /// Valid only while the registration is awaiting review. The seat ledger
    /// is untouched: a seat is only ever taken at confirmation.
    pub async fn reject(
        &self,
        registration_id: &str,
        admin_notes: Option<&str>,
    ) -> AppResult<registration::Model> {
        let registration = self.registration_repo.get_by_id(registration_id).await?;

        if !is_reviewable(registration.status) {
            return Err(AppError::Validation(
                "Registration already reviewed".to_string(),
            ));
        }

        // Conditional flip, same guard as approve: a racing review cannot
        // overwrite a registration that already left the reviewable states.
        let flipped = Registration::update_many()
            .col_expr(
                registration::Column::Status,
                Expr::value(RegistrationStatus::Rejected.into_value()),
            )
            .col_expr(
                registration::Column::AdminNotes,
                Expr::value(Value::from(admin_notes.map(ToString::to_string))),
            )
            .filter(registration::Column::Id.eq(registration_id))
            .filter(registration::Column::Status.is_in([
                RegistrationStatus::Pending,
                RegistrationStatus::PaymentPending,
            ]))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if flipped.rows_affected == 0 {
            return Err(AppError::Validation(
                "Registration already reviewed".to_string(),
            ));
        }

        let rejected = self.registration_repo.get_by_id(registration_id).await?;

        tracing::info!(registration = %rejected.id, "Registration rejected");

        Ok(rejected)
    }

    /// Get a registration by ID.
    pub async fn get_by_id(&self, registration_id: &str) -> AppResult<registration::Model> {
        self.registration_repo.get_by_id(registration_id).await
    }

    /// Registrations awaiting admin review, oldest first.
    pub async fn list_pending(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        self.registration_repo.list_pending(limit, offset).await
    }

    /// Count registrations awaiting admin review.
    pub async fn count_pending(&self) -> AppResult<u64> {
        self.registration_repo.count_pending().await
    }

    /// All registrations of a user, joined with their workshop.
    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<(registration::Model, Option<workshop::Model>)>> {
        self.registration_repo.find_by_user(user_id).await
    }

    /// All registrations for a workshop, joined with the registering user.
    pub async fn list_for_workshop(
        &self,
        workshop_id: &str,
    ) -> AppResult<Vec<(registration::Model, Option<user::Model>)>> {
        self.registration_repo.find_by_workshop(workshop_id).await
    }
}
