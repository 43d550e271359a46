//! Participant check-in.
//!
//! Check-in is idempotent in effect: marking an already-arrived participant
//! simply refreshes the timestamp instead of raising an error, so gate
//! staff can re-scan freely.

use crate::{
    core::{Actor, event::is_organiser},
    entities::{BookedEvent, BookedParticipant, booked_participant},
    errors::{Error, Result},
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, prelude::*};
use tracing::info;

/// Marks a participant as arrived.
///
/// Admins may check in anyone; organisers only participants of their own
/// events. `arrived` is set unconditionally and `checkin_time` is the time
/// of this call, even on repeats.
pub async fn checkin<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    participant_id: i64,
) -> Result<booked_participant::Model> {
    let participant = BookedParticipant::find_by_id(participant_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "participant", id: participant_id })?;

    if !actor.is_admin() {
        let snapshot = BookedEvent::find_by_id(participant.booked_event_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                kind: "booked event",
                id: participant.booked_event_id,
            })?;
        if !is_organiser(db, snapshot.event_id, actor.user_id).await? {
            return Err(Error::Forbidden {
                message: "only admins or the event's organisers may check in participants"
                    .to_string(),
            });
        }
    }

    let mut arrival: booked_participant::ActiveModel = participant.into();
    arrival.arrived = Set(true);
    arrival.checkin_time = Set(Some(chrono::Utc::now()));
    let updated = arrival.update(db).await?;

    info!(participant_id, "participant checked in");
    Ok(updated)
}
