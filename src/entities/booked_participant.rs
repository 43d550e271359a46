//! Booked participant entity - One attendee of a booked event.
//!
//! Identity fields are copied from the staging rows at commit and never
//! change afterwards. Only `arrived` / `checkin_time` mutate post-commit,
//! through the check-in subsystem.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booked participant database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booked_participants")]
pub struct Model {
    /// Unique identifier for the participant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Containing booking
    pub booking_id: i64,
    /// The booked event this attendee belongs to
    pub booked_event_id: i64,
    /// Attendee name
    pub name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional contact phone number
    pub phone_number: Option<String>,
    /// Whether the attendee has checked in
    pub arrived: bool,
    /// Last check-in time; refreshed on repeated check-ins
    pub checkin_time: Option<DateTimeUtc>,
}

/// Defines relationships between `BookedParticipant` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each participant belongs to one booking
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    /// Each participant belongs to one booked event
    #[sea_orm(
        belongs_to = "super::booked_event::Entity",
        from = "Column::BookedEventId",
        to = "super::booked_event::Column::Id"
    )]
    BookedEvent,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::booked_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookedEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
