//! Error types used by the playervisor runtime and its collaborators.
//!
//! [`PlayerError`] covers every failure a caller can observe: no bound player,
//! a bounded wait that ran out, a registry lookup that came back empty, or a
//! transport that could not deliver a message.
//!
//! It provides `as_label` / `as_message` helpers; the supervisor uses
//! `as_message` as the `reason` of the events it publishes.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while managing player processes.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// No player is currently bound (and none showed up within the wait window).
    #[error("no player process is available")]
    NoPlayerAvailable,

    /// A bounded wait exceeded its deadline.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The registry does not know this player (it is gone for good).
    #[error("player not found: {id}")]
    NotFound {
        /// Identifier that was looked up.
        id: String,
    },

    /// The registry failed in a way that may go away on retry.
    #[error("registry error: {error}")]
    Registry {
        /// The underlying error message.
        error: String,
    },

    /// A message could not be delivered to the player.
    #[error("send failed: {error}")]
    Send {
        /// The underlying error message.
        error: String,
    },
}

impl PlayerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use playervisor::PlayerError;
    ///
    /// assert_eq!(PlayerError::NoPlayerAvailable.as_label(), "no_player_available");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PlayerError::NoPlayerAvailable => "no_player_available",
            PlayerError::Timeout { .. } => "timeout",
            PlayerError::NotFound { .. } => "player_not_found",
            PlayerError::Registry { .. } => "registry_error",
            PlayerError::Send { .. } => "send_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PlayerError::NoPlayerAvailable => "no player process is available".to_string(),
            PlayerError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            PlayerError::NotFound { id } => format!("not found: {id}"),
            PlayerError::Registry { error } => format!("registry: {error}"),
            PlayerError::Send { error } => format!("send: {error}"),
        }
    }
}
