//! Cart item entity - One event staged in a cart.
//!
//! `participants_count` is the intended party size and must satisfy the
//! event's participation constraint:
//! - `single`          -> 1
//! - `multiple`+fixed  -> exactly `upper_limit`
//! - `multiple`+open   -> within [`lower_limit`, `upper_limit`]
//!
//! One row per (cart, event); enforced by a unique index.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Containing cart
    pub cart_id: i64,
    /// Staged event
    pub event_id: i64,
    /// Intended party size, validated against the event constraint
    pub participants_count: i32,
    /// When the item was added
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CartItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one cart
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id"
    )]
    Cart,
    /// Each item stages one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    /// Participant detail rows collected for this item
    #[sea_orm(has_many = "super::temp_participant::Entity")]
    TempParticipants,
    /// The chosen time slot (at most one)
    #[sea_orm(has_one = "super::temp_timeslot::Entity")]
    TempTimeslot,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::temp_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TempParticipants.def()
    }
}

impl Related<super::temp_timeslot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TempTimeslot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
