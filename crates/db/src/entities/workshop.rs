//! Workshop entity for bookable events.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How registrations for a workshop are confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum WorkshopMode {
    /// Every registration waits for admin approve/reject.
    #[sea_orm(string_value = "manual")]
    #[default]
    Manual,
    /// Eligible registrations confirm without admin review.
    #[sea_orm(string_value = "automated")]
    Automated,
}

/// Workshop lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum WorkshopStatus {
    /// Open for registration.
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    /// Called off by the organizer.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    /// Held and finished.
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// A scheduled bookable event with fixed capacity.
///
/// `available_seats` is the seat ledger: it is decremented exactly once per
/// registration that reaches `confirmed`, only through the registration
/// workflow, and always via a conditional update guarded by the current
/// value. Invariant: `0 <= available_seats <= max_seats`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workshops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Workshop title
    pub title: String,

    /// Long-form description (optional)
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Organizer display name
    pub organizer: String,

    /// Owning account; nullable for legacy/admin-created rows
    #[sea_orm(nullable)]
    pub organizer_user_id: Option<String>,

    /// Instructor display name
    pub instructor: String,

    /// Event date
    pub date: DateTimeWithTimeZone,

    /// Start time, display string (e.g. "10:00 AM")
    pub time: String,

    /// Venue
    pub location: String,

    /// City, used for filtering
    pub city: String,

    /// Category label, used for filtering
    pub category: String,

    /// Difficulty level (Beginner, Intermediate, Advanced)
    pub level: String,

    /// Duration, display string (e.g. "3 hours")
    pub duration: String,

    /// Price in the platform currency; 0 means free
    pub price: f64,

    /// Capacity, fixed at creation
    pub max_seats: i32,

    /// Seat ledger: seats still open for confirmation
    pub available_seats: i32,

    /// Approval mode for new registrations
    pub mode: WorkshopMode,

    /// Lifecycle status
    pub status: WorkshopStatus,

    /// Whether the workshop is featured in listings
    pub featured: bool,

    /// Cover image URL (optional)
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Prerequisite list, JSON array of strings
    #[sea_orm(nullable)]
    pub prerequisites: Option<Json>,

    /// Learning outcomes, JSON array of strings
    #[sea_orm(nullable)]
    pub what_you_learn: Option<Json>,

    /// Agenda items, JSON array of strings
    #[sea_orm(nullable)]
    pub agenda: Option<Json>,

    /// When the workshop was created
    pub created_at: DateTimeWithTimeZone,

    /// When the workshop was last modified
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OrganizerUserId",
        to = "super::user::Column::Id"
    )]
    OrganizerUser,
    #[sea_orm(has_many = "super::registration::Entity")]
    Registration,
    #[sea_orm(has_many = "super::workshop_tag::Entity")]
    WorkshopTag,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrganizerUser.def()
    }
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::workshop_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::workshop_tag::Relation::Workshop.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
