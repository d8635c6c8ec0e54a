//! # playervisor
//!
//! **Playervisor** keeps exactly one external player process available to a
//! client at all times, while a small pool of spare players is kept warm for
//! fast failover. Callers ask for "the current player" and never see the churn
//! underneath.
//!
//! ## Architecture
//! ```text
//!            ┌───────────────────────┐        ┌──────────────────────┐
//!            │  Registry (external)  │        │  Transport (external)│
//!            │  find_available       │        │  send(port, Message) │
//!            │  find_by_id → Lookup  │        └──────────▲───────────┘
//!            │  fill_pool            │                   │
//!            └──────────▲────────────┘                   │
//!                       │ bounded waits                  │ Channel (per operation)
//! ┌─────────────────────┴────────────────────────────────┴────────────────┐
//! │  Supervisor                                                           │
//! │  - loop: every tick → fill pool, refresh, acquire, ping               │
//! │  - PlayerSlot (Mutex<Option<PlayerState>>)                            │
//! │  - accessors: has_player / current_channel / with_channel / shutdown  │
//! └───────────────────────────────┬───────────────────────────────────────┘
//!                                 │ publish(Event)
//!                                 ▼
//!                         Bus (broadcast) ──► SubscriberSet ──► Subscribe::on_event
//! ```
//!
//! ### Player lifecycle
//! ```text
//!   Unbound ── acquisition (find_available ok) ──► Bound
//!   Bound   ── refresh NotFound ─────────────────► Unbound
//!   Bound   ── ping failed / timed out ──────────► Unbound
//!   Bound   ── shutdown_player() ────────────────► Unbound
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                 |
//! |-------------------|-----------------------------------------------------------|------------------------------------|
//! | **Supervision**   | Keep one player bound, evict on failure, re-acquire.      | [`Supervisor`], [`Timing`]         |
//! | **Collaborators** | Plug in the registry backend and the wire transport.      | [`Registry`], [`Transport`]        |
//! | **Messaging**     | Talk to the bound player.                                 | [`Channel`], [`Message`]           |
//! | **Subscriber API**| Hook into loop events (logging, metrics, alerts).         | [`Subscribe`], [`Event`]           |
//! | **Errors**        | Typed errors for callers.                                 | [`PlayerError`]                    |
//! | **Configuration** | Timing knobs.                                             | [`Config`]                         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] that prints events to stdout.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use playervisor::{Config, Lookup, Message, PlayerError, PlayerState, Registry, Supervisor, Transport};
//!
//! struct Local;
//!
//! #[async_trait]
//! impl Registry for Local {
//!     async fn find_available(&self) -> Result<PlayerState, PlayerError> {
//!         Ok(PlayerState::new("p1", 27713))
//!     }
//!     async fn find_by_id(&self, id: &str) -> Lookup {
//!         Lookup::Found(PlayerState::new(id, 27713))
//!     }
//!     async fn fill_pool(&self) -> Result<(), PlayerError> {
//!         Ok(())
//!     }
//! }
//!
//! struct Udp;
//!
//! #[async_trait]
//! impl Transport for Udp {
//!     async fn send(&self, _port: u16, _message: Message) -> Result<(), PlayerError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PlayerError> {
//!     let sup = Supervisor::builder(Config::default(), Arc::new(Local), Arc::new(Udp)).build();
//!     sup.spawn();
//!
//!     sup.with_channel(|ch| async move {
//!         ch.send(Message::Custom { address: "/system/play".into(), args: vec![] }).await
//!     })
//!     .await?;
//!
//!     sup.shutdown_player().await
//! }
//! ```

mod channel;
mod core;
mod error;
mod events;
mod player;
mod registry;
mod subscribers;

// ---- Public re-exports ----

pub use channel::{Channel, Message, Transport};
pub use self::core::{Config, Supervisor, SupervisorBuilder, Timing, await_ok, bounded};
pub use error::PlayerError;
pub use events::{Bus, Event, EventKind, Level, WeakBus};
pub use player::{PlayerSlot, PlayerState};
pub use registry::{Lookup, NOT_FOUND_PREFIX, Registry};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
