//! Participation constraint logic - shapes and the party-size validator.
//!
//! The validator is a pure predicate used twice per booking: once when a
//! cart item is created or updated, and again defensively inside the
//! commit transaction, because constraints may change between staging and
//! checkout.

use crate::{
    entities::{
        Event, ParticipationConstraint, participation_constraint,
        participation_constraint::{BOOKING_TYPE_MULTIPLE, BOOKING_TYPE_SINGLE},
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, prelude::*};

/// Checks a candidate party size against an event's constraint.
///
/// No constraint is treated as `single`. Rules, in order:
/// 1. single -> exactly one participant
/// 2. multiple + fixed -> exactly `upper_limit`
/// 3. multiple + open -> within [`lower_limit`, `upper_limit`] inclusive
pub fn validate_participants_count(
    constraint: Option<&participation_constraint::Model>,
    count: i32,
) -> Result<()> {
    let Some(constraint) = constraint else {
        return expect_exactly(1, count);
    };

    if constraint.booking_type == BOOKING_TYPE_SINGLE {
        return expect_exactly(1, count);
    }

    if constraint.fixed {
        let upper = constraint.upper_limit.ok_or_else(|| Error::ConstraintShape {
            message: "fixed constraint is missing upper_limit".to_string(),
        })?;
        return expect_exactly(upper, count);
    }

    let (Some(lower), Some(upper)) = (constraint.lower_limit, constraint.upper_limit) else {
        return Err(Error::ConstraintShape {
            message: "open constraint requires both lower and upper limits".to_string(),
        });
    };
    if count < lower || count > upper {
        return Err(Error::ParticipantCountOutOfRange { lower, upper, got: count });
    }
    Ok(())
}

fn expect_exactly(expected: i32, got: i32) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::InvalidParticipantCount { expected, got })
    }
}

/// Creates or replaces an event's participation constraint.
///
/// Switching to `single` resets `fixed` and both limits regardless of the
/// submitted values, so stale `multiple` fields can never linger.
pub async fn set_constraint<C: ConnectionTrait>(
    db: &C,
    event_id: i64,
    booking_type: &str,
    fixed: bool,
    lower_limit: Option<i32>,
    upper_limit: Option<i32>,
) -> Result<participation_constraint::Model> {
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { kind: "event", id: event_id })?;

    let (fixed, lower_limit, upper_limit) = match booking_type {
        BOOKING_TYPE_SINGLE => (false, None, None),
        BOOKING_TYPE_MULTIPLE => {
            validate_multiple_shape(fixed, lower_limit, upper_limit)?;
            (fixed, lower_limit, upper_limit)
        }
        other => {
            return Err(Error::ConstraintShape {
                message: format!("unknown booking_type `{other}`"),
            });
        }
    };

    let values = participation_constraint::ActiveModel {
        event_id: Set(event_id),
        booking_type: Set(booking_type.to_string()),
        fixed: Set(fixed),
        lower_limit: Set(lower_limit),
        upper_limit: Set(upper_limit),
        ..Default::default()
    };

    let existing = ParticipationConstraint::find()
        .filter(participation_constraint::Column::EventId.eq(event_id))
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

fn validate_multiple_shape(
    fixed: bool,
    lower_limit: Option<i32>,
    upper_limit: Option<i32>,
) -> Result<()> {
    if fixed {
        if upper_limit.is_none() {
            return Err(Error::ConstraintShape {
                message: "upper_limit required when fixed".to_string(),
            });
        }
        if lower_limit.is_some() {
            return Err(Error::ConstraintShape {
                message: "lower_limit must be null when fixed".to_string(),
            });
        }
        return Ok(());
    }

    match (lower_limit, upper_limit) {
        (Some(lower), Some(upper)) if lower <= upper => Ok(()),
        (Some(_), Some(_)) => Err(Error::ConstraintShape {
            message: "lower_limit must not exceed upper_limit".to_string(),
        }),
        _ => Err(Error::ConstraintShape {
            message: "lower and upper limits both required".to_string(),
        }),
    }
}

/// Fetches the constraint attached to an event, if any.
pub async fn get_constraint<C: ConnectionTrait>(
    db: &C,
    event_id: i64,
) -> Result<Option<participation_constraint::Model>> {
    ParticipationConstraint::find()
        .filter(participation_constraint::Column::EventId.eq(event_id))
        .one(db)
        .await
        .map_err(Into::into)
}
