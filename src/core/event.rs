//! Event and organiser management.
//!
//! Events are created by admins or organisers; the organiser rows double as
//! the authorization source for slot management and participant check-in.

use crate::{
    core::Actor,
    entities::{
        BookedEvent, CartItem, Event, EventDetails, EventOrganiser, EventSlot,
        ParticipationConstraint, TempParticipant, TempTimeslot, booked_event, cart_item, event,
        event_details, event_organiser, event_slot, participation_constraint, temp_participant,
        temp_timeslot,
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};
use tracing::info;

/// Input for creating an event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Display name
    pub name: String,
    /// Organising committee
    pub parent_committee: String,
    /// Per-participant price
    pub price: f64,
    /// Whether booking this event excludes booking others
    pub exclusivity: bool,
    /// Optional category label
    pub category_id: Option<i64>,
    /// Optional umbrella grouping
    pub parent_event_id: Option<i64>,
    /// Owning organisers' user ids
    pub organisers: Vec<i64>,
}

/// Creates an event with its organiser rows.
///
/// Participants cannot create events; organisers and admins can.
pub async fn create_event<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    actor: &Actor,
    new_event: NewEvent,
) -> Result<event::Model> {
    if matches!(actor.role, crate::core::Role::Participant) {
        return Err(Error::Forbidden {
            message: "participants may not create events".to_string(),
        });
    }

    // The event and its organiser rows land together or not at all
    let txn = db.begin().await?;
    let model = event::ActiveModel {
        name: Set(new_event.name),
        parent_committee: Set(new_event.parent_committee),
        price: Set(new_event.price),
        exclusivity: Set(new_event.exclusivity),
        category_id: Set(new_event.category_id),
        parent_event_id: Set(new_event.parent_event_id),
        image_ref: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for user_id in new_event.organisers {
        event_organiser::ActiveModel {
            event_id: Set(model.id),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    info!(event_id = model.id, "created event");
    Ok(model)
}

/// Fetches an event by id.
pub async fn get_event<C: ConnectionTrait>(db: &C, event_id: i64) -> Result<event::Model> {
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "event", id: event_id })
}

/// Lists all events by name.
pub async fn list_events<C: ConnectionTrait>(db: &C) -> Result<Vec<event::Model>> {
    Event::find()
        .order_by_asc(event::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether the user owns the event through an organiser row.
pub async fn is_organiser<C: ConnectionTrait>(
    db: &C,
    event_id: i64,
    user_id: i64,
) -> Result<bool> {
    let count = EventOrganiser::find()
        .filter(event_organiser::Column::EventId.eq(event_id))
        .filter(event_organiser::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Adds an organiser to an event (admin only).
pub async fn add_organiser<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    event_id: i64,
    user_id: i64,
) -> Result<event_organiser::Model> {
    if !actor.is_admin() {
        return Err(Error::Forbidden {
            message: "only admins may assign organisers".to_string(),
        });
    }
    get_event(db, event_id).await?;

    event_organiser::ActiveModel {
        event_id: Set(event_id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates or replaces the event's details row.
pub async fn set_details<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    event_id: i64,
    description: String,
    venue: String,
    start_datetime: chrono::DateTime<chrono::Utc>,
    end_datetime: chrono::DateTime<chrono::Utc>,
) -> Result<event_details::Model> {
    if !actor.is_admin() && !is_organiser(db, event_id, actor.user_id).await? {
        return Err(Error::Forbidden {
            message: "only admins or the event's organisers may edit details".to_string(),
        });
    }
    get_event(db, event_id).await?;

    let values = event_details::ActiveModel {
        event_id: Set(event_id),
        description: Set(description),
        venue: Set(venue),
        start_datetime: Set(start_datetime),
        end_datetime: Set(end_datetime),
        ..Default::default()
    };

    let existing = EventDetails::find()
        .filter(event_details::Column::EventId.eq(event_id))
        .one(db)
        .await?;

    let model = match existing {
        Some(current) => {
            let mut update = values;
            update.id = Set(current.id);
            update.update(db).await?
        }
        None => values.insert(db).await?,
    };
    Ok(model)
}

/// Deletes an event and its children, unless a booking snapshot still
/// references it.
pub async fn delete_event<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    actor: &Actor,
    event_id: i64,
) -> Result<()> {
    if !actor.is_admin() {
        return Err(Error::Forbidden {
            message: "only admins may delete events".to_string(),
        });
    }
    get_event(db, event_id).await?;

    // Child rows and the event go in one transaction; a failure part-way
    // must not leave a half-gutted event behind
    let txn = db.begin().await?;

    let referenced = BookedEvent::find()
        .filter(booked_event::Column::EventId.eq(event_id))
        .count(&txn)
        .await?;
    if referenced > 0 {
        return Err(Error::ReferencedByBooking { kind: "event", id: event_id });
    }

    // Staged cart rows referencing the event go first
    let slot_ids: Vec<i64> = EventSlot::find()
        .filter(event_slot::Column::EventId.eq(event_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|slot| slot.id)
        .collect();
    if !slot_ids.is_empty() {
        TempTimeslot::delete_many()
            .filter(temp_timeslot::Column::SlotId.is_in(slot_ids))
            .exec(&txn)
            .await?;
    }
    let item_ids: Vec<i64> = CartItem::find()
        .filter(cart_item::Column::EventId.eq(event_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| item.id)
        .collect();
    if !item_ids.is_empty() {
        TempParticipant::delete_many()
            .filter(temp_participant::Column::CartItemId.is_in(item_ids.clone()))
            .exec(&txn)
            .await?;
        TempTimeslot::delete_many()
            .filter(temp_timeslot::Column::CartItemId.is_in(item_ids))
            .exec(&txn)
            .await?;
        CartItem::delete_many()
            .filter(cart_item::Column::EventId.eq(event_id))
            .exec(&txn)
            .await?;
    }

    EventSlot::delete_many()
        .filter(event_slot::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    ParticipationConstraint::delete_many()
        .filter(participation_constraint::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    EventDetails::delete_many()
        .filter(event_details::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    EventOrganiser::delete_many()
        .filter(event_organiser::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    Event::delete_by_id(event_id).exec(&txn).await?;
    txn.commit().await?;

    info!(event_id, "deleted event");
    Ok(())
}
