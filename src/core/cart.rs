//! Cart staging - the mutable basket a checkout is built from.
//!
//! Everything here is pre-commit state: the active cart, its items, the
//! participant details and the chosen slot per item. All of it is
//! re-validated under lock by the commit engine, so these checks exist to
//! fail early, not to guarantee capacity.

use crate::{
    core::{Actor, constraint, ensure_owner, slot::slot_has_capacity},
    entities::{
        Cart, CartItem, EventSlot, TempParticipant, TempTimeslot, cart, cart_item, event_slot,
        temp_participant, temp_timeslot,
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder, SqlErr, TransactionTrait, prelude::*};
use tracing::info;

/// Attendee details collected for a cart item.
#[derive(Debug, Clone)]
pub struct ParticipantInput {
    /// Attendee name
    pub name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional contact phone number
    pub phone_number: Option<String>,
}

/// A cart item with its staged participants and slot selection.
#[derive(Debug, Clone)]
pub struct CartItemView {
    /// The staged item
    pub item: cart_item::Model,
    /// Collected attendee details
    pub participants: Vec<temp_participant::Model>,
    /// Chosen slot selection, if any
    pub timeslot: Option<temp_timeslot::Model>,
}

/// The owner's active cart with all staging rows loaded.
#[derive(Debug, Clone)]
pub struct CartView {
    /// The cart header
    pub cart: cart::Model,
    /// Items in add order
    pub items: Vec<CartItemView>,
}

/// Returns the owner's active cart, creating one if none exists.
///
/// The partial unique index on (owner, active) makes concurrent first
/// requests race safely: the loser's insert fails and it re-selects the
/// winner's row.
pub async fn active_cart<C: ConnectionTrait>(db: &C, owner_id: i64) -> Result<cart::Model> {
    if let Some(existing) = find_active(db, owner_id).await? {
        return Ok(existing);
    }
    create_active(db, owner_id).await
}

/// Insert path of the get-or-create: losing the race to another request
/// surfaces as a unique violation, recovered by re-selecting the winner.
async fn create_active<C: ConnectionTrait>(db: &C, owner_id: i64) -> Result<cart::Model> {
    let insert = cart::ActiveModel {
        owner_id: Set(owner_id),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match insert {
        Ok(created) => Ok(created),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            find_active(db, owner_id)
                .await?
                .ok_or(Error::NoActiveCart { user_id: owner_id })
        }
        Err(e) => Err(e.into()),
    }
}

async fn find_active<C: ConnectionTrait>(db: &C, owner_id: i64) -> Result<Option<cart::Model>> {
    Cart::find()
        .filter(cart::Column::OwnerId.eq(owner_id))
        .filter(cart::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds an event to the actor's active cart, or updates the party size if
/// the event is already staged (one item per event per cart).
pub async fn add_item<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    event_id: i64,
    participants_count: i32,
) -> Result<cart_item::Model> {
    crate::core::event::get_event(db, event_id).await?;
    let event_constraint = constraint::get_constraint(db, event_id).await?;
    constraint::validate_participants_count(event_constraint.as_ref(), participants_count)?;

    let cart = active_cart(db, actor.user_id).await?;

    let existing = CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .filter(cart_item::Column::EventId.eq(event_id))
        .one(db)
        .await?;

    let model = match existing {
        Some(item) => {
            let mut update: cart_item::ActiveModel = item.into();
            update.participants_count = Set(participants_count);
            update.update(db).await?
        }
        None => {
            cart_item::ActiveModel {
                cart_id: Set(cart.id),
                event_id: Set(event_id),
                participants_count: Set(participants_count),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };
    info!(cart_id = cart.id, event_id, participants_count, "staged cart item");
    Ok(model)
}

/// Loads a cart item together with its cart, verifying the actor owns it.
async fn owned_item<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    cart_item_id: i64,
) -> Result<(cart_item::Model, cart::Model)> {
    let item = CartItem::find_by_id(cart_item_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "cart item", id: cart_item_id })?;
    let owning_cart = Cart::find_by_id(item.cart_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "cart", id: item.cart_id })?;
    ensure_owner(actor, &owning_cart)?;
    Ok((item, owning_cart))
}

/// Replaces the participant details collected for a cart item.
///
/// The count is only checked against `participants_count` at commit, so
/// details can be supplied incrementally across requests.
pub async fn set_participants<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    actor: &Actor,
    cart_item_id: i64,
    participants: Vec<ParticipantInput>,
) -> Result<Vec<temp_participant::Model>> {
    let (item, _) = owned_item(db, actor, cart_item_id).await?;

    // Replace is all-or-nothing: a failed insert must not leave the old
    // roster half-deleted
    let txn = db.begin().await?;
    TempParticipant::delete_many()
        .filter(temp_participant::Column::CartItemId.eq(item.id))
        .exec(&txn)
        .await?;

    let mut rows = Vec::with_capacity(participants.len());
    for participant in participants {
        let row = temp_participant::ActiveModel {
            cart_item_id: Set(item.id),
            name: Set(participant.name),
            email: Set(participant.email),
            phone_number: Set(participant.phone_number),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        rows.push(row);
    }
    txn.commit().await?;
    Ok(rows)
}

/// Chooses the slot for a cart item (one selection per item, upserted).
///
/// The slot must belong to the item's event, and for limited slots the
/// capacity gate must pass at selection time. Capacity is re-checked under
/// lock at commit; passing here is not a reservation.
pub async fn choose_timeslot<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    cart_item_id: i64,
    slot_id: i64,
) -> Result<temp_timeslot::Model> {
    let (item, _) = owned_item(db, actor, cart_item_id).await?;

    let slot = EventSlot::find_by_id(slot_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "slot", id: slot_id })?;

    if slot.event_id != item.event_id {
        return Err(Error::SlotEventMismatch { slot_id, event_id: item.event_id });
    }
    if !slot_has_capacity(&slot, item.participants_count) {
        return Err(Error::InsufficientCapacity {
            slot_id,
            requested: item.participants_count,
            available: slot.remaining(),
        });
    }

    let existing = TempTimeslot::find()
        .filter(temp_timeslot::Column::CartItemId.eq(item.id))
        .one(db)
        .await?;

    let model = match existing {
        Some(selection) => {
            let mut update: temp_timeslot::ActiveModel = selection.into();
            update.slot_id = Set(slot_id);
            update.update(db).await?
        }
        None => {
            temp_timeslot::ActiveModel {
                cart_item_id: Set(item.id),
                slot_id: Set(slot_id),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };
    Ok(model)
}

/// Removes a cart item and all staging rows hanging off it.
pub async fn remove_item<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    actor: &Actor,
    cart_item_id: i64,
) -> Result<()> {
    let (item, _) = owned_item(db, actor, cart_item_id).await?;

    let txn = db.begin().await?;
    TempParticipant::delete_many()
        .filter(temp_participant::Column::CartItemId.eq(item.id))
        .exec(&txn)
        .await?;
    TempTimeslot::delete_many()
        .filter(temp_timeslot::Column::CartItemId.eq(item.id))
        .exec(&txn)
        .await?;
    CartItem::delete_by_id(item.id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Loads the owner's active cart with items, participants, and slot
/// selections. Items come back in add order, which is also the commit
/// engine's snapshot order.
pub async fn view_cart<C: ConnectionTrait>(db: &C, owner_id: i64) -> Result<CartView> {
    let cart = find_active(db, owner_id)
        .await?
        .ok_or(Error::NoActiveCart { user_id: owner_id })?;

    let items = CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(items.len());
    for item in items {
        let participants = TempParticipant::find()
            .filter(temp_participant::Column::CartItemId.eq(item.id))
            .order_by_asc(temp_participant::Column::Id)
            .all(db)
            .await?;
        let timeslot = TempTimeslot::find()
            .filter(temp_timeslot::Column::CartItemId.eq(item.id))
            .one(db)
            .await?;
        views.push(CartItemView { item, participants, timeslot });
    }

    Ok(CartView { cart, items: views })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::participation_constraint::BOOKING_TYPE_MULTIPLE;
    use crate::test_utils::{
        create_limited_slot, create_test_event, create_unlimited_slot, participant,
        participant_inputs, setup_test_db,
    };

    #[tokio::test]
    async fn test_active_cart_get_or_create() -> Result<()> {
        let db = setup_test_db().await?;

        let first = active_cart(&db, 1).await?;
        let second = active_cart(&db, 1).await?;
        assert_eq!(first.id, second.id);

        let other = active_cart(&db, 2).await?;
        assert_ne!(first.id, other.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_active_cart_race_loser_recovers_winner() -> Result<()> {
        let db = setup_test_db().await?;
        let winner = active_cart(&db, 7).await?;

        // A second insert attempt simulates losing the get-or-create race:
        // the partial unique index rejects it and the winner's row comes back
        let recovered = create_active(&db, 7).await?;
        assert_eq!(recovered.id, winner.id);

        let all = Cart::find()
            .filter(cart::Column::OwnerId.eq(7))
            .all(&db)
            .await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_validates_constraint() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Solo quiz", 50.0).await?;
        let actor = participant(1);

        // No constraint: single participant only
        assert!(matches!(
            add_item(&db, &actor, event.id, 3).await,
            Err(Error::InvalidParticipantCount { expected: 1, got: 3 })
        ));
        add_item(&db, &actor, event.id, 1).await?;

        let team_event = create_test_event(&db, "Team quiz", 50.0).await?;
        constraint::set_constraint(&db, team_event.id, BOOKING_TYPE_MULTIPLE, true, None, Some(4))
            .await?;
        assert!(matches!(
            add_item(&db, &actor, team_event.id, 3).await,
            Err(Error::InvalidParticipantCount { expected: 4, got: 3 })
        ));
        add_item(&db, &actor, team_event.id, 4).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_upserts_per_event() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Gala", 75.0).await?;
        constraint::set_constraint(&db, event.id, BOOKING_TYPE_MULTIPLE, false, Some(1), Some(6))
            .await?;
        let actor = participant(1);

        let first = add_item(&db, &actor, event.id, 2).await?;
        let second = add_item(&db, &actor, event.id, 5).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.participants_count, 5);

        let view = view_cart(&db, 1).await?;
        assert_eq!(view.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_choose_timeslot_rules() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Laser tag", 120.0).await?;
        let other_event = create_test_event(&db, "Karting", 200.0).await?;
        let slot = create_limited_slot(&db, event.id, 5).await?;
        let foreign_slot = create_unlimited_slot(&db, other_event.id).await?;
        let actor = participant(1);

        let item = add_item(&db, &actor, event.id, 1).await?;

        assert!(matches!(
            choose_timeslot(&db, &actor, item.id, foreign_slot.id).await,
            Err(Error::SlotEventMismatch { .. })
        ));

        let selection = choose_timeslot(&db, &actor, item.id, slot.id).await?;

        // Re-choosing updates the same row
        let again = choose_timeslot(&db, &actor, item.id, slot.id).await?;
        assert_eq!(selection.id, again.id);

        // A stranger cannot touch the item
        assert!(matches!(
            choose_timeslot(&db, &participant(2), item.id, slot.id).await,
            Err(Error::Forbidden { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_choose_timeslot_capacity_gate() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Escape room", 300.0).await?;
        constraint::set_constraint(&db, event.id, BOOKING_TYPE_MULTIPLE, true, None, Some(6))
            .await?;
        let slot = create_limited_slot(&db, event.id, 4).await?;
        let actor = participant(1);

        let item = add_item(&db, &actor, event.id, 6).await?;
        assert!(matches!(
            choose_timeslot(&db, &actor, item.id, slot.id).await,
            Err(Error::InsufficientCapacity { requested: 6, available: 4, .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_participants_replaces() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Duet", 40.0).await?;
        constraint::set_constraint(&db, event.id, BOOKING_TYPE_MULTIPLE, true, None, Some(2))
            .await?;
        let actor = participant(1);
        let item = add_item(&db, &actor, event.id, 2).await?;

        set_participants(&db, &actor, item.id, participant_inputs(&["Ada", "Grace"])).await?;
        let replaced =
            set_participants(&db, &actor, item.id, participant_inputs(&["Ada", "Joan"])).await?;
        assert_eq!(replaced.len(), 2);

        let view = view_cart(&db, 1).await?;
        let names: Vec<_> = view.items[0]
            .participants
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "Joan"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_item_clears_staging() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_test_event(&db, "Trivia", 10.0).await?;
        let slot = create_unlimited_slot(&db, event.id).await?;
        let actor = participant(1);

        let item = add_item(&db, &actor, event.id, 1).await?;
        set_participants(&db, &actor, item.id, participant_inputs(&["Ada"])).await?;
        choose_timeslot(&db, &actor, item.id, slot.id).await?;

        remove_item(&db, &actor, item.id).await?;

        let view = view_cart(&db, 1).await?;
        assert!(view.items.is_empty());
        let orphans = TempParticipant::find()
            .filter(temp_participant::Column::CartItemId.eq(item.id))
            .all(&db)
            .await?;
        assert!(orphans.is_empty());

        Ok(())
    }
}
