//! Activation rolls.
//!
//! A band's activation pool scales every unit's chance to act: a full pool
//! of eight dice gives each unit its base probability, a smaller pool
//! proportionally less.

use rand::Rng;

use crate::army::{Unit, UnitType, MAX_ACTIVATION_DICE};

/// Chance that a unit of `unit_type` activates with `pool` dice available.
/// Pools above the maximum count as a full pool.
pub fn activation_chance(unit_type: UnitType, pool: u32) -> f64 {
    let pool = pool.min(MAX_ACTIVATION_DICE);
    let chance = unit_type.activation_probability() * (pool as f64 / MAX_ACTIVATION_DICE as f64);
    chance.clamp(0.0, 1.0)
}

impl Unit {
    /// Rolls whether this unit acts this round given the band's pool.
    pub fn activation(&self, pool: u32, rng: &mut impl Rng) -> bool {
        rng.gen_bool(activation_chance(self.unit_type, pool))
    }
}
