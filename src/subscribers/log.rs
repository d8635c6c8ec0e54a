//! # Simple logging subscriber.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format, skipping
//! anything below its minimum [`Level`].
//!
//! ## Output format
//! ```text
//! [debug] pool-filled
//! [info] player-found player=p1 port=27713
//! [warn] player-unreachable player=p1 port=27713 err="timed out after 5s"
//! [warn] no-player-available err="no player process is available"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind, Level};
use crate::subscribers::Subscribe;

/// Stdout logging subscriber with level filtering.
pub struct LogWriter {
    min: Level,
}

impl LogWriter {
    /// Creates a writer that prints events at `min` level or above.
    pub fn new(min: Level) -> Self {
        Self { min }
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        if e.level() < self.min {
            return;
        }
        println!("{}", render(e));
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

fn render(e: &Event) -> String {
    let level = match e.level() {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
    };
    let mut line = format!("[{level}] {}", label(e.kind));
    if let Some(player) = &e.player {
        line.push_str(&format!(" player={player}"));
    }
    if let Some(port) = e.port {
        line.push_str(&format!(" port={port}"));
    }
    if let Some(reason) = &e.reason {
        line.push_str(&format!(" err={reason:?}"));
    }
    line
}

fn label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::PoolFilled => "pool-filled",
        EventKind::PoolFillFailed => "pool-fill-failed",
        EventKind::PlayerFound => "player-found",
        EventKind::NoPlayerAvailable => "no-player-available",
        EventKind::PlayerRefreshed => "player-refreshed",
        EventKind::PlayerOffline => "player-offline",
        EventKind::RefreshFailed => "refresh-failed",
        EventKind::PingSent => "ping-sent",
        EventKind::PlayerUnreachable => "player-unreachable",
        EventKind::ShutdownSent => "shutdown-sent",
        EventKind::SubscriberPanicked => "subscriber-panicked",
        EventKind::SubscriberOverflow => "subscriber-overflow",
    }
}
