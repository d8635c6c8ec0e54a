//! # Runtime events emitted by the supervisor loop.
//!
//! The [`EventKind`] enum classifies what happened during a tick:
//! - **Pool events**: spare pool top-ups
//! - **Binding events**: a player was found, refreshed, or went offline
//! - **Health events**: ping results
//! - **Caller events**: explicit shutdown requests
//! - **Subscriber events**: delivery problems inside the [`SubscriberSet`](crate::SubscriberSet)
//!
//! Every kind maps to a [`Level`] so log-style subscribers can filter.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use playervisor::{Event, EventKind, Level};
//!
//! let ev = Event::new(EventKind::PlayerUnreachable)
//!     .with_player("p1", 27713)
//!     .with_reason("timed out after 5s");
//!
//! assert_eq!(ev.level(), Level::Warn);
//! assert_eq!(ev.player.as_deref(), Some("p1"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::player::PlayerState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Severity attached to each [`EventKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Pool ===
    /// Spare pool topped up.
    PoolFilled,

    /// Pool top-up failed.
    ///
    /// Sets:
    /// - `reason`: error message
    PoolFillFailed,

    // === Binding ===
    /// A player was found and bound.
    ///
    /// Sets:
    /// - `player`, `port`: the new player
    PlayerFound,

    /// No player could be acquired within the discovery timeout.
    ///
    /// Sets:
    /// - `reason`: last error
    NoPlayerAvailable,

    /// The bound player's state was refreshed from the registry.
    ///
    /// Sets:
    /// - `player`, `port`: refreshed state
    PlayerRefreshed,

    /// The registry no longer knows the bound player (or reports it without
    /// a port); it was unbound.
    ///
    /// Sets:
    /// - `player`, `port`: evicted player
    /// - `reason`: set when the registry answered with a zero port
    PlayerOffline,

    /// Refreshing the bound player failed transiently; it stays bound.
    ///
    /// Sets:
    /// - `player`, `port`: bound player
    /// - `reason`: registry error
    RefreshFailed,

    // === Health ===
    /// Ping delivered.
    ///
    /// Sets:
    /// - `player`, `port`: pinged player
    PingSent,

    /// Ping failed or timed out; the player was unbound.
    ///
    /// Sets:
    /// - `player`, `port`: evicted player
    /// - `reason`: error message
    PlayerUnreachable,

    // === Caller ===
    /// Shutdown message sent to the bound player; it was unbound.
    ///
    /// Sets:
    /// - `port`: player that was asked to stop
    ShutdownSent,

    // === Subscribers ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause
    SubscriberOverflow,
}

impl EventKind {
    /// Severity used by log-style subscribers.
    pub fn level(&self) -> Level {
        match self {
            EventKind::PoolFilled | EventKind::PlayerRefreshed | EventKind::PingSent => {
                Level::Debug
            }
            EventKind::PlayerFound | EventKind::ShutdownSent => Level::Info,
            EventKind::PoolFillFailed
            | EventKind::NoPlayerAvailable
            | EventKind::PlayerOffline
            | EventKind::RefreshFailed
            | EventKind::PlayerUnreachable
            | EventKind::SubscriberPanicked
            | EventKind::SubscriberOverflow => Level::Warn,
        }
    }
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Player id, if applicable.
    pub player: Option<Arc<str>>,
    /// Player port, if applicable.
    pub port: Option<u16>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            player: None,
            port: None,
            reason: None,
        }
    }

    /// Attaches a player id and port.
    #[inline]
    pub fn with_player(mut self, id: impl Into<Arc<str>>, port: u16) -> Self {
        self.player = Some(id.into());
        self.port = Some(port);
        self
    }

    /// Attaches the id and port of `state`.
    #[inline]
    pub fn with_state(self, state: &PlayerState) -> Self {
        self.with_player(state.id.as_str(), state.port)
    }

    /// Attaches a port only.
    #[inline]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Severity of this event.
    #[inline]
    pub fn level(&self) -> Level {
        self.kind.level()
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }
}
