//! Unified error type for the booking and karaoke core.
//!
//! Validation failures carry enough context for a caller to render a
//! user-correctable message. `CommitContention` is the one retryable
//! variant: it means a concurrent checkout held the slot locks and the
//! whole `place()` call can simply be retried.

use thiserror::Error;

/// All error conditions surfaced by the crate.
#[derive(Debug, Error)]
#[allow(missing_docs)] // the #[error] messages document each variant
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // --- constraint / cart staging ---
    #[error("This event requires exactly {expected} participants (got {got})")]
    InvalidParticipantCount { expected: i32, got: i32 },

    #[error("Participants must be between {lower} and {upper} (got {got})")]
    ParticipantCountOutOfRange { lower: i32, upper: i32, got: i32 },

    #[error("Invalid participation constraint: {message}")]
    ConstraintShape { message: String },

    #[error("End time must be after start time")]
    SlotTimeOrder,

    #[error("max_participants must be a positive value when the slot is capacity-limited")]
    SlotCapacityShape,

    #[error("A slot with the same event, date and times already exists")]
    DuplicateSlot,

    #[error("Slot #{slot_id} does not belong to event #{event_id}")]
    SlotEventMismatch { slot_id: i64, event_id: i64 },

    // --- checkout pipeline ---
    #[error("No active cart for user #{user_id}")]
    NoActiveCart { user_id: i64 },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart item #{cart_item_id} has no time slot selected")]
    MissingSlotSelection { cart_item_id: i64 },

    #[error("Cart item #{cart_item_id} needs {expected} participant details (got {got})")]
    IncompleteParticipants {
        cart_item_id: i64,
        expected: i32,
        got: i32,
    },

    #[error("Slot #{slot_id} has only {available} places left ({requested} requested)")]
    InsufficientCapacity {
        slot_id: i64,
        requested: i32,
        available: i32,
    },

    #[error("Checkout conflicted with a concurrent booking; retry the request")]
    CommitContention,

    #[error("{kind} #{id} is referenced by a booking and cannot be deleted")]
    ReferencedByBooking { kind: &'static str, id: i64 },

    // --- payment boundary ---
    #[error("Payment provider error: {0}")]
    PaymentProvider(String),

    #[error("Payment signature verification failed")]
    PaymentVerificationFailed,
}

impl Error {
    /// Whether the whole operation can be retried as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::CommitContention)
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
