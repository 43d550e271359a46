//! Booking entity - Immutable checkout header.
//!
//! Created only by the commit engine. `total_amount` is the sum of the
//! snapshot line totals. `payment_status` is updated by the payment
//! boundary, never by the commit engine itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking status value: live booking.
pub const STATUS_CONFIRMED: &str = "confirmed";
/// Booking status value: cancelled booking (capacity released).
pub const STATUS_CANCELLED: &str = "cancelled";

/// Payment status value: awaiting payment.
pub const PAYMENT_PENDING: &str = "pending";
/// Payment status value: payment verified.
pub const PAYMENT_PAID: &str = "paid";
/// Payment status value: payment verification failed.
pub const PAYMENT_FAILED: &str = "failed";

/// Booking database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    /// Unique identifier for the booking
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Booking user's id (external identity provider)
    pub user_id: i64,
    /// `"confirmed"` or `"cancelled"`
    pub status: String,
    /// `"pending"`, `"paid"`, `"failed"`, or not yet set
    pub payment_status: Option<String>,
    /// Sum of `line_total` across the booking's snapshots
    pub total_amount: f64,
    /// When the booking was committed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One booking snapshots many events
    #[sea_orm(has_many = "super::booked_event::Entity")]
    BookedEvents,
    /// All participants across the booking
    #[sea_orm(has_many = "super::booked_participant::Entity")]
    Participants,
}

impl Related<super::booked_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookedEvents.def()
    }
}

impl Related<super::booked_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
