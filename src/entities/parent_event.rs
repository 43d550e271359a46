//! Parent event entity - Umbrella grouping for related events (e.g., a fest).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parent event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parent_events")]
pub struct Model {
    /// Unique identifier for the parent event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the umbrella event
    pub name: String,
    /// Opaque reference to a banner image in the media store
    pub image_ref: Option<String>,
}

/// Defines relationships between `ParentEvent` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One parent event groups many events
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
