//! Event details entity - Long-form description and venue/time window.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event details database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_details")]
pub struct Model {
    /// Unique identifier for the details row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Described event (one details row per event)
    #[sea_orm(unique)]
    pub event_id: i64,
    /// Long-form description shown on the event page
    pub description: String,
    /// Venue name
    pub venue: String,
    /// Overall start of the event window
    pub start_datetime: DateTimeUtc,
    /// Overall end of the event window
    pub end_datetime: DateTimeUtc,
}

/// Defines relationships between `EventDetails` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each details row belongs to one event
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
