//! # Event subscribers.
//!
//! ```text
//! Supervisor ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                         ┌─────┴─────┐
//!                                                         ▼           ▼
//!                                                     LogWriter    Custom
//! ```
//!
//! - [`Subscribe`]: trait for custom handlers.
//! - [`SubscriberSet`]: per-subscriber queues and workers.
//! - `LogWriter` (feature `logging`): prints events to stdout.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
