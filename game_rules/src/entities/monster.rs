//! Monster definitions from the monster table.

use serde::{Deserialize, Serialize};

use crate::mechanics::Combatant;

/// A monster as described by the data table.
///
/// Combat works on a clone, so the table entry keeps its full hit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub hp: i32,
    #[serde(default)]
    pub strength: Option<i32>,
    #[serde(default)]
    pub attack: Option<i32>,
    #[serde(default)]
    pub defense: Option<i32>,
    #[serde(default)]
    pub exp: i32,
    #[serde(default)]
    pub drops: Vec<String>,
}

impl Monster {
    /// Check if the monster is still standing.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

impl Combatant for Monster {
    fn strength(&self) -> Option<i32> {
        self.strength
    }

    fn attack(&self) -> Option<i32> {
        self.attack
    }

    fn defense(&self) -> Option<i32> {
        self.defense
    }
}
