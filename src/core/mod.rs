//! Runtime core: the supervisor loop and its building blocks.
//!
//! Internal modules:
//! - [`wait`]: deadline-bounded single attempts and retry-until-ok waits;
//! - [`config`]: timing knobs;
//! - [`supervisor`]: the reconciliation loop and the caller-facing accessors;
//! - [`builder`]: wiring of bus, subscribers and collaborators.

mod builder;
mod config;
mod supervisor;
mod wait;

pub use builder::SupervisorBuilder;
pub use config::Config;
pub use supervisor::{Supervisor, Timing};
pub use wait::{await_ok, bounded};
