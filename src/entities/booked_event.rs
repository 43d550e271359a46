//! Booked event entity - Snapshot of one cart item at commit time.
//!
//! `unit_price` is the event's price at the moment of commit, not at
//! add-to-cart time. Events and slots referenced here must not be deleted;
//! the core delete paths refuse while snapshot rows exist.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booked event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booked_events")]
pub struct Model {
    /// Unique identifier for the snapshot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Containing booking
    pub booking_id: i64,
    /// Booked event
    pub event_id: i64,
    /// Booked slot
    pub slot_id: i64,
    /// Party size at commit
    pub participants_count: i32,
    /// Event price at commit
    pub unit_price: f64,
    /// `unit_price * participants_count`
    pub line_total: f64,
}

/// Defines relationships between `BookedEvent` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one booking
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    /// Snapshotted event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    /// Snapshotted slot
    #[sea_orm(
        belongs_to = "super::event_slot::Entity",
        from = "Column::SlotId",
        to = "super::event_slot::Column::Id"
    )]
    Slot,
    /// Participants of this booked event
    #[sea_orm(has_many = "super::booked_participant::Entity")]
    Participants,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::event_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl Related<super::booked_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
