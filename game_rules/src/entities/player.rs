//! The player character.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Attribute, Attributes};
use crate::config::CreationRules;
use crate::mechanics::Combatant;

/// Point allocation steps offered by the creation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStep {
    Plus1,
    Minus1,
    Plus10,
    Minus10,
}

impl AllocationStep {
    pub fn delta(&self) -> i32 {
        match self {
            AllocationStep::Plus1 => 1,
            AllocationStep::Minus1 => -1,
            AllocationStep::Plus10 => 10,
            AllocationStep::Minus10 => -10,
        }
    }
}

/// Why an allocation step was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("only {left} points left, {requested} requested")]
    NotEnoughPoints { left: i32, requested: i32 },

    #[error("{attribute} cannot exceed {cap}")]
    AboveCap { attribute: Attribute, cap: i32 },

    #[error("{attribute} cannot go below zero")]
    BelowZero { attribute: Attribute },
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub attributes: Attributes,
    /// Unspent creation points.
    pub points_left: i32,
    pub level: u32,
    pub exp: i32,
    pub next_level_exp: i32,
    pub max_hp: i32,
    pub current_hp: i32,
    pub age: u32,
    pub equipped_weapon: Option<String>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(&CreationRules::default())
    }
}

impl Player {
    /// Create a fresh, unallocated character.
    pub fn new(rules: &CreationRules) -> Self {
        Self {
            attributes: Attributes::default(),
            points_left: rules.points,
            level: 1,
            exp: 0,
            next_level_exp: rules.first_level_exp,
            max_hp: rules.starting_hp,
            current_hp: rules.starting_hp,
            age: rules.starting_age,
            equipped_weapon: None,
        }
    }

    /// Check if the player is alive.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Move creation points into or out of an attribute.
    ///
    /// A refused step leaves the player untouched, so spent plus remaining
    /// points always equals the creation budget.
    pub fn allocate(
        &mut self,
        attribute: Attribute,
        step: AllocationStep,
        cap: i32,
    ) -> Result<(), AllocationError> {
        let delta = step.delta();
        let current = self.attributes.get(attribute);

        if delta > 0 {
            if self.points_left < delta {
                return Err(AllocationError::NotEnoughPoints {
                    left: self.points_left,
                    requested: delta,
                });
            }
            if current + delta > cap {
                return Err(AllocationError::AboveCap { attribute, cap });
            }
        } else if current + delta < 0 {
            return Err(AllocationError::BelowZero { attribute });
        }

        self.attributes.set(attribute, current + delta);
        self.points_left -= delta;
        Ok(())
    }

    /// Whether every creation point has been spent.
    pub fn is_ready(&self) -> bool {
        self.points_left == 0
    }

    /// Change current hit points, never rising above the maximum.
    pub fn adjust_hp(&mut self, delta: i32) {
        self.current_hp = (self.current_hp + delta).min(self.max_hp);
    }

    /// Raise the level once if the experience threshold is met.
    ///
    /// Deliberately a single step: a grant crossing two thresholds still only
    /// yields one level.
    pub fn check_level_up(&mut self, factor: f64) -> bool {
        if self.exp < self.next_level_exp {
            return false;
        }
        self.level += 1;
        self.exp = 0;
        self.next_level_exp = (self.next_level_exp as f64 * factor).floor() as i32;
        true
    }
}

impl Combatant for Player {
    fn strength(&self) -> Option<i32> {
        Some(self.attributes.get(Attribute::Strength))
    }

    fn attack(&self) -> Option<i32> {
        None
    }

    fn defense(&self) -> Option<i32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spent(player: &Player) -> i32 {
        player.attributes.total()
    }

    #[test]
    fn test_new_player() {
        let player = Player::default();
        assert_eq!(player.points_left, 50);
        assert_eq!(player.level, 1);
        assert_eq!(player.next_level_exp, 25);
        assert_eq!(player.current_hp, 50);
        assert_eq!(player.age, 1);
        assert!(player.is_alive());
        assert!(!player.is_ready());
    }

    #[test]
    fn test_allocation_conserves_pool() {
        let mut player = Player::default();
        let steps = [
            (Attribute::Strength, AllocationStep::Plus10),
            (Attribute::Strength, AllocationStep::Plus10),
            (Attribute::Luck, AllocationStep::Plus1),
            (Attribute::Strength, AllocationStep::Minus1),
            (Attribute::Luck, AllocationStep::Minus10),
            (Attribute::Endurance, AllocationStep::Plus10),
            (Attribute::Endurance, AllocationStep::Plus10),
            (Attribute::Endurance, AllocationStep::Plus10),
            (Attribute::Spirit, AllocationStep::Plus10),
        ];

        for (attr, step) in steps {
            let _ = player.allocate(attr, step, 100);
            assert_eq!(spent(&player) + player.points_left, 50);
            for (_, value) in player.attributes.iter() {
                assert!((0..=100).contains(&value));
            }
        }
    }

    #[test]
    fn test_allocation_rejections() {
        let mut player = Player::default();

        assert_eq!(
            player.allocate(Attribute::Luck, AllocationStep::Minus1, 100),
            Err(AllocationError::BelowZero {
                attribute: Attribute::Luck
            })
        );

        player.points_left = 5;
        assert!(matches!(
            player.allocate(Attribute::Luck, AllocationStep::Plus10, 100),
            Err(AllocationError::NotEnoughPoints { left: 5, requested: 10 })
        ));

        player.points_left = 50;
        player.attributes.set(Attribute::Luck, 95);
        assert!(matches!(
            player.allocate(Attribute::Luck, AllocationStep::Plus10, 100),
            Err(AllocationError::AboveCap { cap: 100, .. })
        ));
        assert_eq!(player.attributes.get(Attribute::Luck), 95);
        assert_eq!(player.points_left, 50);
    }

    #[test]
    fn test_ready_when_pool_spent() {
        let mut player = Player::default();
        for _ in 0..5 {
            player
                .allocate(Attribute::Perception, AllocationStep::Plus10, 100)
                .unwrap();
        }
        assert!(player.is_ready());
        assert!(player
            .allocate(Attribute::Perception, AllocationStep::Plus1, 100)
            .is_err());
    }

    #[test]
    fn test_hp_clamped_at_max() {
        let mut player = Player::default();
        player.current_hp = 40;
        player.adjust_hp(25);
        assert_eq!(player.current_hp, 50);

        player.adjust_hp(-60);
        assert_eq!(player.current_hp, -10);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_single_level_up() {
        let mut player = Player::default();
        player.exp = 100;

        assert!(player.check_level_up(1.5));
        assert_eq!(player.level, 2);
        assert_eq!(player.exp, 0);
        assert_eq!(player.next_level_exp, 37);

        assert!(!player.check_level_up(1.5));
        assert_eq!(player.level, 2);
    }

    #[test]
    fn test_strength_drives_offense() {
        let mut player = Player::default();
        player.attributes.set(Attribute::Strength, 7);
        assert_eq!(player.offense(), 7);
        assert_eq!(player.defense_value(), 0);
    }
}
