//! Slot management and the capacity gate.
//!
//! `booked_participants` is the authoritative counter;
//! `available_participants` / `available` are a cached projection of it.
//! Every write path funnels through [`apply_capacity`] so the projection is
//! recomputed inside the same transaction that touches the counter - the
//! two can never drift apart.

use crate::{
    core::{Actor, event::is_organiser},
    entities::{
        BookedEvent, Event, EventSlot, TempTimeslot, booked_event, event_slot, temp_timeslot,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder, SqlErr, TransactionTrait, prelude::*};
use tracing::info;

/// Sets the derived capacity columns from the authoritative inputs.
///
/// Unlimited slots have no remaining-count and are always available;
/// limited slots cache `max(0, max - booked)` and whether that is positive.
pub fn apply_capacity(
    slot: &mut event_slot::ActiveModel,
    unlimited: bool,
    max_participants: Option<i32>,
    booked_participants: i32,
) {
    slot.unlimited_participants = Set(unlimited);
    slot.max_participants = Set(max_participants);
    slot.booked_participants = Set(booked_participants);

    if unlimited {
        slot.available_participants = Set(None);
        slot.available = Set(true);
    } else {
        let remaining = (max_participants.unwrap_or(0) - booked_participants).max(0);
        slot.available_participants = Set(Some(remaining));
        slot.available = Set(remaining > 0);
    }
}

/// The capacity gate: can this slot absorb `requested` more participants?
#[must_use]
pub fn slot_has_capacity(slot: &event_slot::Model, requested: i32) -> bool {
    slot.unlimited_participants || slot.remaining() >= requested
}

fn validate_slot_shape(
    start_time: NaiveTime,
    end_time: NaiveTime,
    unlimited: bool,
    max_participants: Option<i32>,
) -> Result<()> {
    if end_time <= start_time {
        return Err(Error::SlotTimeOrder);
    }
    if !unlimited && max_participants.is_none_or(|max| max <= 0) {
        return Err(Error::SlotCapacityShape);
    }
    Ok(())
}

async fn ensure_can_manage<C: ConnectionTrait>(db: &C, actor: &Actor, event_id: i64) -> Result<()> {
    if actor.is_admin() || is_organiser(db, event_id, actor.user_id).await? {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: "only admins or the event's organisers may manage slots".to_string(),
        })
    }
}

/// Creates a slot for an event.
///
/// Callers must be an admin or an organiser of the event. The
/// (event, date, start, end) identity is unique; a clash surfaces as
/// [`Error::DuplicateSlot`].
#[allow(clippy::too_many_arguments)]
pub async fn create_slot<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    event_id: i64,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    unlimited_participants: bool,
    max_participants: Option<i32>,
) -> Result<event_slot::Model> {
    ensure_can_manage(db, actor, event_id).await?;
    validate_slot_shape(start_time, end_time, unlimited_participants, max_participants)?;

    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "event", id: event_id })?;

    let mut slot = event_slot::ActiveModel {
        event_id: Set(event_id),
        date: Set(date),
        start_time: Set(start_time),
        end_time: Set(end_time),
        ..Default::default()
    };
    apply_capacity(&mut slot, unlimited_participants, max_participants, 0);

    let model = slot.insert(db).await.map_err(|e| {
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Error::DuplicateSlot
        } else {
            e.into()
        }
    })?;
    info!(slot_id = model.id, event_id, "created event slot");
    Ok(model)
}

/// Updates a slot's times or capacity shape, preserving the booked count.
pub async fn update_slot<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    slot_id: i64,
    start_time: NaiveTime,
    end_time: NaiveTime,
    unlimited_participants: bool,
    max_participants: Option<i32>,
) -> Result<event_slot::Model> {
    let current = get_slot(db, slot_id).await?;
    ensure_can_manage(db, actor, current.event_id).await?;
    validate_slot_shape(start_time, end_time, unlimited_participants, max_participants)?;

    let mut slot: event_slot::ActiveModel = current.clone().into();
    slot.start_time = Set(start_time);
    slot.end_time = Set(end_time);
    apply_capacity(
        &mut slot,
        unlimited_participants,
        max_participants,
        current.booked_participants,
    );
    slot.update(db).await.map_err(Into::into)
}

/// Fetches a slot by id.
pub async fn get_slot<C: ConnectionTrait>(db: &C, slot_id: i64) -> Result<event_slot::Model> {
    EventSlot::find_by_id(slot_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "slot", id: slot_id })
}

/// Lists an event's slots in calendar order.
pub async fn list_slots<C: ConnectionTrait>(
    db: &C,
    event_id: i64,
) -> Result<Vec<event_slot::Model>> {
    EventSlot::find()
        .filter(event_slot::Column::EventId.eq(event_id))
        .order_by_asc(event_slot::Column::Date)
        .order_by_asc(event_slot::Column::StartTime)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a slot unless a booking snapshot still references it.
pub async fn delete_slot<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    actor: &Actor,
    slot_id: i64,
) -> Result<()> {
    let slot = get_slot(db, slot_id).await?;
    ensure_can_manage(db, actor, slot.event_id).await?;

    let txn = db.begin().await?;
    let referenced = BookedEvent::find()
        .filter(booked_event::Column::SlotId.eq(slot_id))
        .count(&txn)
        .await?;
    if referenced > 0 {
        return Err(Error::ReferencedByBooking { kind: "slot", id: slot_id });
    }

    // Staged selections pointing at the slot go with it, atomically
    TempTimeslot::delete_many()
        .filter(temp_timeslot::Column::SlotId.eq(slot_id))
        .exec(&txn)
        .await?;
    EventSlot::delete_by_id(slot_id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}
