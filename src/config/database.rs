//! Database configuration module for `Slotbook`.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the
//! Rust structs. Composite uniqueness rules the entity macros cannot
//! express (slot identity, one item per event per cart, one active cart
//! per owner) are added here as indexes in the same setup pass.

use crate::entities::{
    BookedEvent, BookedParticipant, Booking, Cart, CartItem, Category, Event, EventDetails,
    EventOrganiser, EventSlot, LyricLine, ParentEvent, ParticipationConstraint, Recording, Song,
    TempParticipant, TempTimeslot,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, Statement};

/// Establishes a connection using the configured database URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, plus the uniqueness
/// indexes the booking pipeline relies on.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(ParentEvent),
        schema.create_table_from_entity(Event),
        schema.create_table_from_entity(EventOrganiser),
        schema.create_table_from_entity(ParticipationConstraint),
        schema.create_table_from_entity(EventDetails),
        schema.create_table_from_entity(EventSlot),
        schema.create_table_from_entity(Cart),
        schema.create_table_from_entity(CartItem),
        schema.create_table_from_entity(TempParticipant),
        schema.create_table_from_entity(TempTimeslot),
        schema.create_table_from_entity(Booking),
        schema.create_table_from_entity(BookedEvent),
        schema.create_table_from_entity(BookedParticipant),
        schema.create_table_from_entity(Song),
        schema.create_table_from_entity(LyricLine),
        schema.create_table_from_entity(Recording),
    ];

    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    // Slot identity: one row per (event, date, start, end).
    // Cart shape: one item per event per cart, one organiser row per user.
    // Active-cart invariant: at most one active cart per owner; the partial
    // index makes the get-or-create race lose cleanly at the storage layer.
    let indexes = [
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_event_slots_identity \
         ON event_slots (event_id, date, start_time, end_time)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_cart_items_cart_event \
         ON cart_items (cart_id, event_id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_event_organisers_event_user \
         ON event_organisers (event_id, user_id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_carts_one_active_per_owner \
         ON carts (owner_id) WHERE is_active",
    ];

    for sql in indexes {
        db.execute(Statement::from_string(builder, sql)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{cart, event, event_slot};
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Query every table once to verify it exists
        let _ = Event::find().limit(1).all(&db).await?;
        let _ = EventSlot::find().limit(1).all(&db).await?;
        let _ = Cart::find().limit(1).all(&db).await?;
        let _ = Booking::find().limit(1).all(&db).await?;
        let _ = BookedParticipant::find().limit(1).all(&db).await?;
        let _ = Song::find().limit(1).all(&db).await?;
        let _ = LyricLine::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_active_cart_index_rejects_duplicates() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let first = cart::ActiveModel {
            owner_id: Set(7),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        first.insert(&db).await?;

        let second = cart::ActiveModel {
            owner_id: Set(7),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        assert!(second.insert(&db).await.is_err());

        // An inactive cart for the same owner is fine
        let inactive = cart::ActiveModel {
            owner_id: Set(7),
            is_active: Set(false),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        inactive.insert(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_slot_identity_index_rejects_duplicates() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let parent = event::ActiveModel {
            name: Set("Quiz night".to_string()),
            parent_committee: Set("Cultural".to_string()),
            price: Set(0.0),
            exclusivity: Set(false),
            category_id: Set(None),
            parent_event_id: Set(None),
            image_ref: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default();
        let start = chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
        let end = chrono::NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default();

        let slot = event_slot::ActiveModel {
            event_id: Set(parent.id),
            date: Set(date),
            start_time: Set(start),
            end_time: Set(end),
            unlimited_participants: Set(true),
            max_participants: Set(None),
            booked_participants: Set(0),
            available_participants: Set(None),
            available: Set(true),
            ..Default::default()
        };
        slot.insert(&db).await?;

        let duplicate = event_slot::ActiveModel {
            event_id: Set(parent.id),
            date: Set(date),
            start_time: Set(start),
            end_time: Set(end),
            unlimited_participants: Set(true),
            max_participants: Set(None),
            booked_participants: Set(0),
            available_participants: Set(None),
            available: Set(true),
            ..Default::default()
        };
        assert!(duplicate.insert(&db).await.is_err());

        Ok(())
    }
}
