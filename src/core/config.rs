//! # Supervisor configuration.
//!
//! Provides [`Config`], the timing knobs of the supervisor loop and the
//! event bus size.
//!
//! ## Timing overview
//! ```text
//! every `tick`:
//!   ├─ pool_fill_interval elapsed? → fill_pool()        (bounded by registry_timeout)
//!   ├─ bound?                      → find_by_id(id)     (bounded by registry_timeout)
//!   ├─ empty?                      → find_available()   (retried every `poll`, up to find_player_timeout)
//!   └─ ping_interval elapsed?      → ping               (retried every `poll`, up to ping_timeout)
//! ```
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use playervisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.ping_interval = Duration::from_millis(500);
//!
//! assert_eq!(cfg.find_player_timeout, Duration::from_secs(20));
//! ```

use std::time::Duration;

/// Timing and capacity settings for the supervisor.
///
/// All fields are public; [`Default`] gives the production values.
#[derive(Clone, Debug)]
pub struct Config {
    /// How long to wait for an available player (acquisition and `with_channel`).
    pub find_player_timeout: Duration,

    /// Minimum time between two pool top-ups.
    pub pool_fill_interval: Duration,

    /// How long a ping may take before the player is considered unreachable.
    pub ping_timeout: Duration,

    /// Minimum time between two pings of the bound player.
    pub ping_interval: Duration,

    /// Delay between two iterations of the supervisor loop.
    pub tick: Duration,

    /// Retry interval inside bounded waits that poll (`find_available`, ping, `with_channel`).
    pub poll: Duration,

    /// Single-attempt bound for `fill_pool` and `find_by_id`.
    pub registry_timeout: Duration,

    /// Capacity of the event bus ring buffer (min 1; clamped by Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `find_player_timeout = 20s`
    /// - `pool_fill_interval = 15s`
    /// - `ping_timeout = 5s`
    /// - `ping_interval = 1s`
    /// - `tick = 100ms`
    /// - `poll = 100ms`
    /// - `registry_timeout = 5s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            find_player_timeout: Duration::from_secs(20),
            pool_fill_interval: Duration::from_secs(15),
            ping_timeout: Duration::from_secs(5),
            ping_interval: Duration::from_secs(1),
            tick: Duration::from_millis(100),
            poll: Duration::from_millis(100),
            registry_timeout: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}
