//! # Message channel to one player.
//!
//! A [`Channel`] is a short-lived handle bound to a single player's port. It is
//! rebuilt from the active-player slot for every operation, so it always
//! points at whichever player is bound at the time it was created.
//!
//! The wire encoding lives behind [`Transport`]; this module only decides
//! *what* to send and *where*.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PlayerError;

/// Messages a player understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Liveness probe.
    Ping,
    /// Ask the player to exit after `offset` milliseconds.
    Shutdown {
        /// Delay before the player stops, in milliseconds.
        offset: u32,
    },
    /// Application message from the command layer.
    Custom {
        /// Message address (e.g. `/track/1/midi/note`).
        address: String,
        /// Message arguments.
        args: Vec<String>,
    },
}

/// Wire-level sender used to reach players.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Delivers `message` to the player listening on `port`.
    async fn send(&self, port: u16, message: Message) -> Result<(), PlayerError>;
}

/// Handle for sending messages to one player.
#[derive(Clone)]
pub struct Channel {
    port: u16,
    transport: Arc<dyn Transport>,
}

impl Channel {
    /// Creates a channel to the player on `port`.
    pub fn new(port: u16, transport: Arc<dyn Transport>) -> Self {
        Self { port, transport }
    }

    /// Port this channel sends to.
    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Sends a liveness probe.
    pub async fn send_ping(&self) -> Result<(), PlayerError> {
        self.send(Message::Ping).await
    }

    /// Asks the player to shut down.
    pub async fn send_shutdown(&self, offset: u32) -> Result<(), PlayerError> {
        self.send(Message::Shutdown { offset }).await
    }

    /// Sends an arbitrary message.
    pub async fn send(&self, message: Message) -> Result<(), PlayerError> {
        self.transport.send(self.port, message).await
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("port", &self.port).finish()
    }
}
