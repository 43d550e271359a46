//! Booking commit engine - the atomic transition from staging to snapshot.
//!
//! `place()` is the only concurrency-critical region in the crate. All
//! validation runs first without mutating anything; the referenced slot
//! rows are then locked in ascending id order (consistent ordering avoids
//! deadlock between checkouts sharing slots) and every write happens while
//! the locks are held, inside one all-or-nothing transaction. A capacity
//! shortfall aborts the whole call - partial bookings are never visible.
//!
//! Unit prices are read from the event at commit time, not at add-to-cart
//! time; prices may legitimately drift while an item sits in the cart.

use crate::{
    core::{
        Actor, constraint,
        slot::{apply_capacity, slot_has_capacity},
    },
    entities::{
        BookedEvent, BookedParticipant, Booking, Cart, CartItem, Event, EventSlot,
        TempParticipant, TempTimeslot, booked_event, booked_participant, booking,
        booking::STATUS_CANCELLED, booking::STATUS_CONFIRMED, cart, cart_item, event_slot,
        temp_participant, temp_timeslot,
    },
    errors::{Error, Result},
};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One booked event with its participants, as returned by the engine.
#[derive(Debug, Clone)]
pub struct BookedEventView {
    /// The snapshot row
    pub booked_event: booked_event::Model,
    /// Participants copied from the staging rows
    pub participants: Vec<booked_participant::Model>,
}

/// A booking with all nested snapshots.
#[derive(Debug, Clone)]
pub struct BookingView {
    /// The booking header
    pub booking: booking::Model,
    /// Snapshots in cart-item order
    pub events: Vec<BookedEventView>,
}

/// Lock-wait and serialization failures from the backend; the caller can
/// retry the whole `place()` call.
fn is_contention(e: &DbErr) -> bool {
    let message = e.to_string().to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("deadlock")
        || message.contains("lock wait")
        || message.contains("busy")
}

/// Commits the user's active cart into an immutable booking.
///
/// Pipeline: structural validation -> per-slot demand aggregation -> slot
/// row locks (ascending id) -> capacity re-check -> snapshot writes ->
/// capacity increment -> total -> cart deactivation. Any failure rolls the
/// whole transaction back.
pub async fn place(db: &DatabaseConnection, user_id: i64) -> Result<BookingView> {
    match place_inner(db, user_id).await {
        Err(Error::Database(e)) if is_contention(&e) => {
            warn!(user_id, "checkout hit lock contention");
            Err(Error::CommitContention)
        }
        other => other,
    }
}

struct StagedItem {
    slot_id: i64,
    participants: Vec<temp_participant::Model>,
    unit_price: f64,
    item: cart_item::Model,
}

async fn place_inner(db: &DatabaseConnection, user_id: i64) -> Result<BookingView> {
    let txn = db.begin().await?;

    // Step 1-2: load the staged cart and validate it structurally.
    // Pure validation; nothing is written and no lock is taken yet.
    let active = Cart::find()
        .filter(cart::Column::OwnerId.eq(user_id))
        .filter(cart::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::NoActiveCart { user_id })?;

    let items = CartItem::find()
        .filter(cart_item::Column::CartId.eq(active.id))
        .order_by_asc(cart_item::Column::Id)
        .all(&txn)
        .await?;
    if items.is_empty() {
        return Err(Error::EmptyCart);
    }

    let mut staged = Vec::with_capacity(items.len());
    for item in items {
        let selection = TempTimeslot::find()
            .filter(temp_timeslot::Column::CartItemId.eq(item.id))
            .one(&txn)
            .await?
            .ok_or(Error::MissingSlotSelection { cart_item_id: item.id })?;

        let participants = TempParticipant::find()
            .filter(temp_participant::Column::CartItemId.eq(item.id))
            .order_by_asc(temp_participant::Column::Id)
            .all(&txn)
            .await?;
        let supplied = i32::try_from(participants.len()).unwrap_or(i32::MAX);
        if supplied != item.participants_count {
            return Err(Error::IncompleteParticipants {
                cart_item_id: item.id,
                expected: item.participants_count,
                got: supplied,
            });
        }

        let event = Event::find_by_id(item.event_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound { kind: "event", id: item.event_id })?;

        // Defensive re-validation: the constraint may have changed since
        // the item was staged.
        let event_constraint = constraint::get_constraint(&txn, item.event_id).await?;
        constraint::validate_participants_count(
            event_constraint.as_ref(),
            item.participants_count,
        )?;

        staged.push(StagedItem {
            slot_id: selection.slot_id,
            participants,
            unit_price: event.price,
            item,
        });
    }

    // Step 3: aggregate demand per slot. Two items pointing at the same
    // slot must be admitted together or not at all.
    let mut demand: BTreeMap<i64, i32> = BTreeMap::new();
    for entry in &staged {
        *demand.entry(entry.slot_id).or_insert(0) += entry.item.participants_count;
    }

    // Step 4-5: lock the referenced slots in ascending id order (BTreeMap
    // iterates sorted) and re-check the gate against aggregate demand.
    let mut locked_slots: BTreeMap<i64, event_slot::Model> = BTreeMap::new();
    for (&slot_id, &requested) in &demand {
        let slot = EventSlot::find_by_id(slot_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(Error::NotFound { kind: "slot", id: slot_id })?;

        if !slot_has_capacity(&slot, requested) {
            return Err(Error::InsufficientCapacity {
                slot_id,
                requested,
                available: slot.remaining(),
            });
        }
        locked_slots.insert(slot_id, slot);
    }

    // Step 6: booking header; total filled in after the snapshots.
    let header = booking::ActiveModel {
        user_id: Set(user_id),
        status: Set(STATUS_CONFIRMED.to_string()),
        payment_status: Set(None),
        total_amount: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // Step 7: snapshots in stable cart-item order, bumping each limited
    // slot's counter as its items land.
    let mut views = Vec::with_capacity(staged.len());
    let mut total_amount = 0.0;
    for entry in staged {
        let count = entry.item.participants_count;
        let line_total = entry.unit_price * f64::from(count);
        total_amount += line_total;

        let snapshot = booked_event::ActiveModel {
            booking_id: Set(header.id),
            event_id: Set(entry.item.event_id),
            slot_id: Set(entry.slot_id),
            participants_count: Set(count),
            unit_price: Set(entry.unit_price),
            line_total: Set(line_total),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut copied = Vec::with_capacity(entry.participants.len());
        for person in entry.participants {
            let row = booked_participant::ActiveModel {
                booking_id: Set(header.id),
                booked_event_id: Set(snapshot.id),
                name: Set(person.name),
                email: Set(person.email),
                phone_number: Set(person.phone_number),
                arrived: Set(false),
                checkin_time: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            copied.push(row);
        }

        if let Some(slot) = locked_slots.get_mut(&entry.slot_id) {
            if !slot.unlimited_participants {
                let booked = slot.booked_participants + count;
                let mut update: event_slot::ActiveModel = slot.clone().into();
                apply_capacity(&mut update, false, slot.max_participants, booked);
                *slot = update.update(&txn).await?;
            }
        }

        views.push(BookedEventView { booked_event: snapshot, participants: copied });
    }

    // Step 8-9: persist the total and retire the cart (kept as audit
    // trail; a fresh active cart is created lazily on next access).
    let mut finalize: booking::ActiveModel = header.into();
    finalize.total_amount = Set(total_amount);
    let committed = finalize.update(&txn).await?;

    let mut retire: cart::ActiveModel = active.into();
    retire.is_active = Set(false);
    retire.update(&txn).await?;

    txn.commit().await?;

    info!(
        booking_id = committed.id,
        user_id,
        total_amount,
        events = views.len(),
        "booking committed"
    );
    Ok(BookingView { booking: committed, events: views })
}

/// Cancels a booking and releases the capacity it held.
///
/// Idempotent: cancelling an already-cancelled booking returns it
/// unchanged. Only the booking user or an admin may cancel. Takes the
/// same slot locks as [`place`], so contention maps to the retryable
/// [`Error::CommitContention`] the same way.
pub async fn cancel_booking(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: i64,
) -> Result<booking::Model> {
    match cancel_inner(db, actor, booking_id).await {
        Err(Error::Database(e)) if is_contention(&e) => {
            warn!(booking_id, "cancel hit lock contention");
            Err(Error::CommitContention)
        }
        other => other,
    }
}

async fn cancel_inner(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: i64,
) -> Result<booking::Model> {
    let txn = db.begin().await?;

    let current = Booking::find_by_id(booking_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { kind: "booking", id: booking_id })?;

    if !actor.is_admin() && actor.user_id != current.user_id {
        return Err(Error::Forbidden {
            message: "only the booking user or an admin may cancel".to_string(),
        });
    }
    if current.status == STATUS_CANCELLED {
        return Ok(current);
    }

    let snapshots = BookedEvent::find()
        .filter(booked_event::Column::BookingId.eq(booking_id))
        .all(&txn)
        .await?;

    // Release capacity through the same locked recompute path the commit
    // uses, in the same ascending slot order.
    let mut released: BTreeMap<i64, i32> = BTreeMap::new();
    for snapshot in &snapshots {
        *released.entry(snapshot.slot_id).or_insert(0) += snapshot.participants_count;
    }
    for (&slot_id, &count) in &released {
        let slot = EventSlot::find_by_id(slot_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(Error::NotFound { kind: "slot", id: slot_id })?;
        if !slot.unlimited_participants {
            let booked = (slot.booked_participants - count).max(0);
            let mut update: event_slot::ActiveModel = slot.clone().into();
            apply_capacity(&mut update, false, slot.max_participants, booked);
            update.update(&txn).await?;
        }
    }

    let mut change: booking::ActiveModel = current.into();
    change.status = Set(STATUS_CANCELLED.to_string());
    let cancelled = change.update(&txn).await?;

    txn.commit().await?;
    info!(booking_id, "booking cancelled");
    Ok(cancelled)
}

/// Fetches a booking with all nested snapshots.
pub async fn get_booking<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: i64,
) -> Result<BookingView> {
    let header = Booking::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "booking", id: booking_id })?;

    if !actor.is_admin() && actor.user_id != header.user_id {
        return Err(Error::Forbidden {
            message: "only the booking user or an admin may view it".to_string(),
        });
    }

    let snapshots = BookedEvent::find()
        .filter(booked_event::Column::BookingId.eq(booking_id))
        .order_by_asc(booked_event::Column::Id)
        .all(db)
        .await?;

    let mut events = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let participants = BookedParticipant::find()
            .filter(booked_participant::Column::BookedEventId.eq(snapshot.id))
            .order_by_asc(booked_participant::Column::Id)
            .all(db)
            .await?;
        events.push(BookedEventView { booked_event: snapshot, participants });
    }

    Ok(BookingView { booking: header, events })
}

/// Lists a user's bookings, newest first.
pub async fn list_bookings<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Vec<booking::Model>> {
    Booking::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_desc(booking::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
