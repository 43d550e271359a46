//! Participation constraint entity - Per-event rule for party sizes.
//!
//! `booking_type` is `"single"` or `"multiple"`. Shape invariants:
//! single means no limits at all; multiple+fixed means only `upper_limit`
//! is set (the exact required size); multiple+open means both limits are
//! set with lower <= upper. The shapes are enforced in
//! [`crate::core::constraint`], not by the schema.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking type value: one participant per cart item.
pub const BOOKING_TYPE_SINGLE: &str = "single";
/// Booking type value: a party of participants per cart item.
pub const BOOKING_TYPE_MULTIPLE: &str = "multiple";

/// Participation constraint database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participation_constraints")]
pub struct Model {
    /// Unique identifier for the constraint
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Constrained event (one constraint per event)
    #[sea_orm(unique)]
    pub event_id: i64,
    /// `"single"` or `"multiple"`
    pub booking_type: String,
    /// For multiple: whether the party size is fixed at `upper_limit`
    pub fixed: bool,
    /// Lower bound for open multiple bookings
    pub lower_limit: Option<i32>,
    /// Upper bound (exact size when `fixed`)
    pub upper_limit: Option<i32>,
}

/// Defines relationships between `ParticipationConstraint` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each constraint belongs to one event
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
