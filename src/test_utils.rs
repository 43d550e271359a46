//! Shared test utilities for `Slotbook`.
//!
//! This module provides common helper functions for setting up test
//! databases and staging carts ready for checkout.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{Actor, Role, cart, constraint, event, slot},
    entities,
    entities::participation_constraint::BOOKING_TYPE_MULTIPLE,
    errors::Result,
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ConnectOptions, DatabaseConnection};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// In-memory `SQLite` gives every pooled connection its own database, so
/// the pool is capped at one connection.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An admin actor (user id 99).
#[must_use]
pub fn admin() -> Actor {
    Actor::new(99, Role::Admin)
}

/// An organiser actor with the given user id.
#[must_use]
pub fn organiser(user_id: i64) -> Actor {
    Actor::new(user_id, Role::Organiser)
}

/// A participant actor with the given user id.
#[must_use]
pub fn participant(user_id: i64) -> Actor {
    Actor::new(user_id, Role::Participant)
}

/// Creates a test event with sensible defaults and no organisers.
pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::event::Model> {
    event::create_event(
        db,
        &admin(),
        event::NewEvent {
            name: name.to_string(),
            parent_committee: "Cultural".to_string(),
            price,
            exclusivity: false,
            category_id: None,
            parent_event_id: None,
            organisers: vec![],
        },
    )
    .await
}

/// Creates a capacity-limited slot on 2026-03-14, 09:00-10:00.
pub async fn create_limited_slot(
    db: &DatabaseConnection,
    event_id: i64,
    max_participants: i32,
) -> Result<entities::event_slot::Model> {
    slot::create_slot(
        db,
        &admin(),
        event_id,
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        false,
        Some(max_participants),
    )
    .await
}

/// Creates an unlimited slot on 2026-03-15, 18:00-20:00.
pub async fn create_unlimited_slot(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<entities::event_slot::Model> {
    slot::create_slot(
        db,
        &admin(),
        event_id,
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        true,
        None,
    )
    .await
}

/// Builds participant inputs from a list of names.
#[must_use]
pub fn participant_inputs(names: &[&str]) -> Vec<cart::ParticipantInput> {
    names
        .iter()
        .map(|name| cart::ParticipantInput {
            name: (*name).to_string(),
            email: None,
            phone_number: None,
        })
        .collect()
}

/// Stages a complete cart for `user_id`: a fresh event at price 100.0, a
/// limited slot (capacity 10), one item of the given party size with
/// matching participant details and the slot selected. Returns the event
/// and slot so tests can assert against them.
pub async fn staged_cart(
    db: &DatabaseConnection,
    user_id: i64,
    participants_count: i32,
) -> Result<(entities::event::Model, entities::event_slot::Model)> {
    let staged_event =
        create_test_event(db, &format!("Staged event for user {user_id}"), 100.0).await?;
    if participants_count > 1 {
        constraint::set_constraint(
            db,
            staged_event.id,
            BOOKING_TYPE_MULTIPLE,
            true,
            None,
            Some(participants_count),
        )
        .await?;
    }
    let staged_slot = create_limited_slot(db, staged_event.id, 10).await?;

    let actor = participant(user_id);
    let item = cart::add_item(db, &actor, staged_event.id, participants_count).await?;
    cart::choose_timeslot(db, &actor, item.id, staged_slot.id).await?;

    let names: Vec<String> = (1..=participants_count)
        .map(|n| format!("Guest {n}"))
        .collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    cart::set_participants(db, &actor, item.id, participant_inputs(&name_refs)).await?;

    Ok((staged_event, staged_slot))
}

/// Creates a catalog song with sensible defaults.
pub async fn create_test_song(
    db: &DatabaseConnection,
    title: &str,
) -> Result<entities::song::Model> {
    crate::core::song::upload_song(
        db,
        &admin(),
        crate::core::song::NewSong {
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            audio_ref: None,
            cover_ref: None,
            lyrics: None,
        },
    )
    .await
}
