//! Core business logic - framework-agnostic booking, cart, check-in, and
//! lyric operations.
//!
//! Every operation takes a `&DatabaseConnection` plus, where authorization
//! matters, an [`Actor`] supplied by the external identity provider. The
//! core never inspects credentials; it only consumes the resolved role.

/// Booking commit engine and booking queries
pub mod booking;
/// Cart staging - active cart, items, participants, timeslot selection
pub mod cart;
/// Participant check-in
pub mod checkin;
/// Participation constraint shapes and the party-size validator
pub mod constraint;
/// Event and organiser management
pub mod event;
/// LRC lyric parsing and storage
pub mod lyrics;
/// Payment-provider boundary
pub mod payment;
/// Slot management and the capacity gate
pub mod slot;
/// Karaoke song catalog and recordings
pub mod song;

use crate::errors::{Error, Result};

/// Role resolved by the external identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Platform administrator
    Admin,
    /// Event organiser
    Organiser,
    /// Regular participant
    Participant,
}

/// An authenticated principal as seen by the core.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    /// User id from the identity provider
    pub user_id: i64,
    /// Resolved role
    pub role: Role,
}

impl Actor {
    /// Builds an actor with the given role.
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether this actor is a platform administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Staging entities expose their owner through one method so capability
/// checks stay uniform instead of switching on entity kind.
pub trait Owned {
    /// The owning user's id.
    fn owner_id(&self) -> i64;
}

impl Owned for crate::entities::cart::Model {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

/// Admits admins and the resource owner; rejects everyone else.
pub fn ensure_owner<T: Owned>(actor: &Actor, resource: &T) -> Result<()> {
    if actor.is_admin() || actor.user_id == resource.owner_id() {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: "not the owner of this resource".to_string(),
        })
    }
}
