//! Tag entity for workshop labels.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Free-text label attached to workshops, lowercase-normalized.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Tag name, unique, stored lowercase
    #[sea_orm(unique)]
    pub name: String,

    /// When the tag was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workshop_tag::Entity")]
    WorkshopTag,
}

impl Related<super::workshop_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkshopTag.def()
    }
}

impl Related<super::workshop::Entity> for Entity {
    fn to() -> RelationDef {
        super::workshop_tag::Relation::Workshop.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::workshop_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
