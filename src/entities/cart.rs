//! Cart entity - A user's mutable pre-checkout basket.
//!
//! At most one active cart exists per owner; a partial unique index on
//! (`owner_id`) where `is_active` backs the get-or-create in
//! [`crate::core::cart::active_cart`]. Carts are deactivated, not deleted,
//! when a booking is placed, so past baskets remain as an audit trail.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    /// Unique identifier for the cart
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user's id (external identity provider)
    pub owner_id: i64,
    /// Whether this is the owner's current basket
    pub is_active: bool,
    /// When the cart was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Cart and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One cart has many items
    #[sea_orm(has_many = "super::cart_item::Entity")]
    Items,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
