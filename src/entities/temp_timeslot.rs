//! Temp timeslot entity - The slot chosen for a cart item (one per item).
//!
//! The slot must belong to the same event as the cart item, and for
//! limited slots the capacity gate is checked both when the row is created
//! and again under lock at commit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Temp timeslot database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "temp_timeslots")]
pub struct Model {
    /// Unique identifier for the selection
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning cart item (one selection per item)
    #[sea_orm(unique)]
    pub cart_item_id: i64,
    /// Chosen slot
    pub slot_id: i64,
}

/// Defines relationships between `TempTimeslot` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each selection belongs to one cart item
    #[sea_orm(
        belongs_to = "super::cart_item::Entity",
        from = "Column::CartItemId",
        to = "super::cart_item::Column::Id"
    )]
    CartItem,
    /// Each selection targets one slot
    #[sea_orm(
        belongs_to = "super::event_slot::Entity",
        from = "Column::SlotId",
        to = "super::event_slot::Column::Id"
    )]
    Slot,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItem.def()
    }
}

impl Related<super::event_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
