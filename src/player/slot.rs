//! # Active-player slot.
//!
//! Holds at most one [`PlayerState`]: the player this supervisor currently
//! talks to. Emptiness is the only source of truth for "no player is usable";
//! nothing else in the crate caches that fact.
//!
//! ## Lifecycle
//! ```text
//!            bind(found player)
//!   Empty ─────────────────────────► Bound(player)
//!     ▲                                 │  refresh(newer state)
//!     │                                 ▼
//!     └──── clear() ◄──── refresh NotFound / ping failure / shutdown
//! ```
//!
//! ## Rules
//! - Every read sees either a complete descriptor or empty.
//! - The lock is held only to copy or swap the value, never across an `.await`.
//! - A descriptor with `port == 0` is stored as empty.

use std::sync::{Mutex, MutexGuard};

use super::PlayerState;

/// Single-valued, mutex-guarded store of the bound player.
#[derive(Debug, Default)]
pub struct PlayerSlot {
    inner: Mutex<Option<PlayerState>>,
}

impl PlayerSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` iff a reachable player is bound.
    pub fn has_player(&self) -> bool {
        self.lock().is_some()
    }

    /// Returns a copy of the bound player, if any.
    pub fn current(&self) -> Option<PlayerState> {
        self.lock().clone()
    }

    /// Replaces the slot contents, returning the previous player.
    pub fn bind(&self, player: PlayerState) -> Option<PlayerState> {
        let next = player.is_reachable().then_some(player);
        std::mem::replace(&mut *self.lock(), next)
    }

    /// Empties the slot, returning the evicted player.
    ///
    /// Clearing an empty slot is a no-op.
    pub fn clear(&self) -> Option<PlayerState> {
        self.lock().take()
    }

    /// Replaces the bound player with a newer state of the *same* player.
    ///
    /// Does nothing if the slot was emptied (or rebound) in the meantime, so a
    /// late registry answer cannot resurrect a player that is shutting down.
    /// Returns `true` if the slot was updated.
    pub fn refresh(&self, player: PlayerState) -> bool {
        let mut guard = self.lock();
        if guard.as_ref().is_some_and(|p| p.id == player.id) {
            *guard = player.is_reachable().then_some(player);
            true
        } else {
            false
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<PlayerState>> {
        // A panic while holding the guard cannot leave a half-written Option behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_empty() {
        let slot = PlayerSlot::new();
        assert!(!slot.has_player());
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn test_bind_then_clear() {
        let slot = PlayerSlot::new();
        assert_eq!(slot.bind(PlayerState::new("p1", 27713)), None);
        assert!(slot.has_player());
        assert_eq!(slot.current(), Some(PlayerState::new("p1", 27713)));

        assert_eq!(slot.clear(), Some(PlayerState::new("p1", 27713)));
        assert!(!slot.has_player());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let slot = PlayerSlot::new();
        slot.bind(PlayerState::new("p1", 27713));

        slot.clear();
        assert!(!slot.has_player());
        assert_eq!(slot.clear(), None);
        assert!(!slot.has_player());
    }

    #[test]
    fn test_zero_port_is_treated_as_empty() {
        let slot = PlayerSlot::new();
        slot.bind(PlayerState::new("p1", 27713));
        slot.bind(PlayerState::new("ghost", 0));
        assert!(!slot.has_player());
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn test_bind_replaces_wholesale() {
        let slot = PlayerSlot::new();
        slot.bind(PlayerState::new("p1", 27713));
        let prev = slot.bind(PlayerState::new("p2", 27714));
        assert_eq!(prev, Some(PlayerState::new("p1", 27713)));
        assert_eq!(slot.current(), Some(PlayerState::new("p2", 27714)));
    }

    #[test]
    fn test_refresh_only_updates_same_player() {
        let slot = PlayerSlot::new();
        assert!(!slot.refresh(PlayerState::new("p1", 27713)));
        assert!(!slot.has_player());

        slot.bind(PlayerState::new("p1", 27713));
        assert!(!slot.refresh(PlayerState::new("p2", 27714)));
        assert!(slot.refresh(PlayerState::new("p1", 27800)));
        assert_eq!(slot.current(), Some(PlayerState::new("p1", 27800)));
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_values() {
        let slot = Arc::new(PlayerSlot::new());
        let writer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for i in 0..1_000u16 {
                    slot.bind(PlayerState::new(format!("p{i}"), 20_000 + i));
                    slot.clear();
                }
            })
        };

        for _ in 0..1_000 {
            if let Some(p) = slot.current() {
                let n: u16 = p.id[1..].parse().unwrap();
                assert_eq!(p.port, 20_000 + n);
            }
        }
        writer.join().unwrap();
    }
}
