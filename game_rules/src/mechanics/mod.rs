//! Game mechanics: attribute checks and combat damage.

use rand::Rng;

use crate::entities::Attributes;

/// Size of the uniform bonus added to an attribute check.
pub const CHECK_DIE: f64 = 20.0;

/// Exclusive upper bound of the random bonus added to damage.
pub const DAMAGE_VARIANCE: i32 = 10;

/// Anything that can trade blows.
pub trait Combatant {
    /// Strength-like stat, if the combatant has one.
    fn strength(&self) -> Option<i32>;

    /// Generic attack stat, used when there is no usable strength.
    fn attack(&self) -> Option<i32>;

    fn defense(&self) -> Option<i32>;

    /// Offense used for damage: strength if present and non-zero, else attack, else 0.
    fn offense(&self) -> i32 {
        self.strength()
            .filter(|value| *value != 0)
            .or_else(|| self.attack())
            .unwrap_or(0)
    }

    fn defense_value(&self) -> i32 {
        self.defense().unwrap_or(0)
    }
}

/// Roll an attribute check: `value + U[0, 20) > threshold`.
///
/// Unknown attribute names count as zero.
pub fn perform_check<R: Rng + ?Sized>(
    attributes: &Attributes,
    attribute: &str,
    threshold: i32,
    rng: &mut R,
) -> bool {
    let base = attributes.get_by_name(attribute).unwrap_or(0);
    base as f64 + rng.gen::<f64>() * CHECK_DIE > threshold as f64
}

/// Damage dealt by one blow: `max(0, offense - defense + U[0, 10))`.
pub fn combat_damage<A, D, R>(attacker: &A, defender: &D, rng: &mut R) -> i32
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
    R: Rng + ?Sized,
{
    let roll = rng.gen_range(0..DAMAGE_VARIANCE);
    (attacker.offense() - defender.defense_value() + roll).max(0)
}
