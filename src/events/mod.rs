//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Level`]: event classification and payload metadata
//! - [`Bus`]: thin wrapper over `tokio::sync::broadcast`
//! - [`WeakBus`]: publisher that does not keep the bus open
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor::tick` (pool, refresh, acquisition, ping),
//!   `Supervisor::shutdown_player`, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the supervisor's subscriber listener (fans out to
//!   `SubscriberSet`) and any raw receiver from `Supervisor::subscribe`.

mod bus;
mod event;

pub use bus::{Bus, WeakBus};
pub use event::{Event, EventKind, Level};
