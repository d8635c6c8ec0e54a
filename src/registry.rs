//! # Player registry contract.
//!
//! The registry discovers, launches and indexes player processes. It lives
//! outside this crate; the supervisor only needs the three queries of
//! [`Registry`].
//!
//! Lookups by id return a tagged [`Lookup`] so the supervisor can tell a player
//! that is gone for good apart from a registry that hiccuped:
//! ```text
//! find_by_id(id)
//!   ├─ Found(state)     → overwrite the slot
//!   ├─ NotFound         → evict
//!   └─ Transient(err)   → keep the slot, try again later
//! ```

use async_trait::async_trait;

use crate::{error::PlayerError, player::PlayerState};

/// Error prefix used by string-typed registry backends for missing players.
pub const NOT_FOUND_PREFIX: &str = "player not found";

/// Outcome of a registry lookup by player id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The player exists; here is its latest state.
    Found(PlayerState),
    /// The registry has no such player.
    NotFound,
    /// The lookup failed for another reason (the player may still be fine).
    Transient(String),
}

impl Lookup {
    /// Classifies a string-typed backend result.
    ///
    /// Errors starting with [`NOT_FOUND_PREFIX`] map to [`Lookup::NotFound`];
    /// every other error is [`Lookup::Transient`].
    ///
    /// # Example
    /// ```
    /// use playervisor::Lookup;
    ///
    /// assert_eq!(Lookup::from_result(Err("player not found: abc".into())), Lookup::NotFound);
    /// assert!(matches!(Lookup::from_result(Err("connection refused".into())), Lookup::Transient(_)));
    /// ```
    pub fn from_result(res: Result<PlayerState, String>) -> Self {
        match res {
            Ok(state) => Lookup::Found(state),
            Err(e) if e.starts_with(NOT_FOUND_PREFIX) => Lookup::NotFound,
            Err(e) => Lookup::Transient(e),
        }
    }
}

impl From<Result<PlayerState, PlayerError>> for Lookup {
    fn from(res: Result<PlayerState, PlayerError>) -> Self {
        match res {
            Ok(state) => Lookup::Found(state),
            Err(PlayerError::NotFound { .. }) => Lookup::NotFound,
            Err(e) => Lookup::Transient(e.to_string()),
        }
    }
}

/// Query interface of the player registry.
///
/// Implementations may block on I/O; the supervisor bounds every call with a timeout.
#[async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Returns a player that is ready to be used, or an error if none is (yet).
    async fn find_available(&self) -> Result<PlayerState, PlayerError>;

    /// Looks up the latest state of a known player.
    async fn find_by_id(&self, id: &str) -> Lookup;

    /// Tops up the pool of spare players.
    async fn fill_pool(&self) -> Result<(), PlayerError>;
}
