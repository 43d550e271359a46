//! Event slot entity - A concrete date/time occurrence of an event with
//! its own capacity.
//!
//! `booked_participants` is the authoritative counter. The
//! `available_participants` / `available` columns are a cached projection of
//! it; every write path must go through
//! [`crate::core::slot::apply_capacity`] so they are recomputed inside the
//! same transaction that changes the counter. Uniqueness of
//! (event, date, start, end) is enforced by an index created in
//! [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event slot database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_slots")]
pub struct Model {
    /// Unique identifier for the slot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent event
    pub event_id: i64,
    /// Calendar date of the occurrence
    pub date: Date,
    /// Start time (must precede `end_time`)
    pub start_time: Time,
    /// End time
    pub end_time: Time,
    /// When true, the slot never runs out of places
    pub unlimited_participants: bool,
    /// Capacity when limited; None for unlimited slots
    pub max_participants: Option<i32>,
    /// Authoritative count of committed participants
    pub booked_participants: i32,
    /// Cached `max_participants - booked_participants` (limited slots only)
    pub available_participants: Option<i32>,
    /// Cached "has at least one free place" flag
    pub available: bool,
}

impl Model {
    /// Places still free on this slot, treating unlimited as `i32::MAX`.
    #[must_use]
    pub fn remaining(&self) -> i32 {
        if self.unlimited_participants {
            i32::MAX
        } else {
            self.available_participants.unwrap_or(0)
        }
    }
}

/// Defines relationships between `EventSlot` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each slot belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    /// Staged cart selections targeting this slot
    #[sea_orm(has_many = "super::temp_timeslot::Entity")]
    TempTimeslots,
    /// Booking snapshots referencing this slot
    #[sea_orm(has_many = "super::booked_event::Entity")]
    BookedEvents,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::temp_timeslot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TempTimeslots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
