//! Event entity - A bookable event with pricing and ownership.
//!
//! Each event has at most one participation constraint and one details row,
//! any number of slots, and a set of owning organisers (join table
//! `event_organisers`). Price is the per-participant unit price; booking
//! snapshots copy it at commit time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the event
    pub name: String,
    /// Organising committee the event belongs to
    pub parent_committee: String,
    /// Per-participant price; copied into booking snapshots at commit
    pub price: f64,
    /// Whether booking this event excludes booking others
    pub exclusivity: bool,
    /// Optional umbrella grouping
    pub parent_event_id: Option<i64>,
    /// Optional category label
    pub category_id: Option<i64>,
    /// Opaque reference to a poster image in the media store
    pub image_ref: Option<String>,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Optional umbrella parent event
    #[sea_orm(
        belongs_to = "super::parent_event::Entity",
        from = "Column::ParentEventId",
        to = "super::parent_event::Column::Id"
    )]
    ParentEvent,
    /// Optional category label
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One event has many slots
    #[sea_orm(has_many = "super::event_slot::Entity")]
    Slots,
    /// One event has at most one participation constraint
    #[sea_orm(has_one = "super::participation_constraint::Entity")]
    Constraint,
    /// One event has at most one details row
    #[sea_orm(has_one = "super::event_details::Entity")]
    Details,
    /// Organiser ownership rows
    #[sea_orm(has_many = "super::event_organiser::Entity")]
    Organisers,
    /// Cart items staged against this event
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// Booking snapshots referencing this event
    #[sea_orm(has_many = "super::booked_event::Entity")]
    BookedEvents,
}

impl Related<super::parent_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParentEvent.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::event_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slots.def()
    }
}

impl Related<super::participation_constraint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Constraint.def()
    }
}

impl Related<super::event_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl Related<super::event_organiser::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organisers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
