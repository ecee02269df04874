//! Registration entity for the booking approval workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registration lifecycle status.
///
/// `pending` and `payment_pending` may move to `confirmed` or `rejected`;
/// both of those are terminal for the workflow. `cancelled` is reserved for
/// admin bulk operations outside the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[derive(Default)]
pub enum RegistrationStatus {
    /// Waiting for admin review.
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    /// Waiting for payment verification before admin review.
    #[sea_orm(string_value = "payment_pending")]
    PaymentPending,
    /// Seat allocated.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Turned down by an admin.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Withdrawn outside the workflow.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[derive(Default)]
pub enum PaymentStatus {
    /// Free workshop, nothing to pay.
    #[sea_orm(string_value = "not_required")]
    #[default]
    NotRequired,
    /// Evidence submitted, awaiting verification.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Verified by an admin.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Verification failed.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// How the attendee paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentMethod {
    /// UPI transfer.
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Card payment.
    #[sea_orm(string_value = "card")]
    Card,
}

/// A user's request to attend a workshop.
///
/// At most one registration exists per `(user_id, workshop_id)` pair,
/// enforced by a unique index. Rows are never hard-deleted by the workflow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Registering account
    pub user_id: String,

    /// Target workshop
    pub workshop_id: String,

    /// Workshop mode snapshotted at submit time
    pub registration_type: super::workshop::WorkshopMode,

    /// Workflow status
    pub status: RegistrationStatus,

    /// Payment status
    pub payment_status: PaymentStatus,

    /// Whether an admin verified the payment evidence (paid workshops only)
    pub payment_verified: bool,

    /// Payment method (paid workshops only)
    #[sea_orm(nullable)]
    pub payment_method: Option<PaymentMethod>,

    /// Transaction reference supplied by the attendee
    #[sea_orm(nullable)]
    pub transaction_id: Option<String>,

    /// Paying UPI handle, when the method is UPI
    #[sea_orm(nullable)]
    pub upi_id: Option<String>,

    /// Opaque storage reference for the uploaded payment screenshot
    #[sea_orm(nullable)]
    pub payment_screenshot_url: Option<String>,

    /// Free-text note from the attendee
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Note from the reviewing admin
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,

    /// When the registration was submitted
    pub registered_at: DateTimeWithTimeZone,

    /// When the registration was confirmed
    #[sea_orm(nullable)]
    pub confirmed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::workshop::Entity",
        from = "Column::WorkshopId",
        to = "super::workshop::Column::Id"
    )]
    Workshop,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::workshop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workshop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
