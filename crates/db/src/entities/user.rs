//! User entity for platform accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum UserRole {
    /// Attendee account.
    #[sea_orm(string_value = "user")]
    #[default]
    User,
    /// Organizer account; starts inactive pending admin approval.
    #[sea_orm(string_value = "enterprise")]
    Enterprise,
    /// Platform administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Platform account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Login email, unique across accounts
    #[sea_orm(unique)]
    pub email: String,

    /// Contact phone number (optional)
    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// Argon2 password hash
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Whether the account may act; enterprise accounts start `false`
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTimeWithTimeZone,

    /// When the account was last modified
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration::Entity")]
    Registration,
    #[sea_orm(has_many = "super::workshop::Entity")]
    Workshop,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::workshop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workshop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
