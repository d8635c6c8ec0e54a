use std::fmt;

/// Snapshot of one player process as observed in the registry.
///
/// Values are never patched in place: a refresh produces a new `PlayerState`
/// that replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerState {
    /// Opaque identifier assigned by the registry.
    pub id: String,
    /// Port the player listens on (`0` = not reachable).
    pub port: u16,
}

impl PlayerState {
    /// Creates a new descriptor.
    pub fn new(id: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            port,
        }
    }

    /// Returns `true` if the descriptor points at a usable endpoint.
    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.port != 0
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.port)
    }
}
