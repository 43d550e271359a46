//! Event organiser entity - Join rows linking events to owning organisers.
//!
//! User identity lives in the external identity provider; only the numeric
//! user id is stored here. A row means "this user may manage the event and
//! check in its participants".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event organiser database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_organisers")]
pub struct Model {
    /// Unique identifier for the ownership row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owned event
    pub event_id: i64,
    /// Organiser's user id (external identity provider)
    pub user_id: i64,
}

/// Defines relationships between `EventOrganiser` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
