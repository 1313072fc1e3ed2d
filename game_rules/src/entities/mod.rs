//! Entity definitions: the player, monsters and item display data.

mod attributes;
mod item;
mod monster;
mod player;

pub use attributes::*;
pub use item::*;
pub use monster::*;
pub use player::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one playthrough, carried into saves and log spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaythroughId(pub Uuid);

impl PlaythroughId {
    /// Create a new random playthrough ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil playthrough ID (useful for fixtures).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for PlaythroughId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlaythroughId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playthrough_ids_are_unique() {
        assert_ne!(PlaythroughId::new(), PlaythroughId::new());
        assert_eq!(PlaythroughId::nil(), PlaythroughId::nil());
    }
}
