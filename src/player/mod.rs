//! Player descriptors and the active-player slot.
//!
//! - [`PlayerState`]: identifier + port of one player process, as reported by the registry;
//! - [`PlayerSlot`]: the single "currently bound" player, shared between the
//!   supervisor loop and external callers.

mod slot;
mod state;

pub use slot::PlayerSlot;
pub use state::PlayerState;
