//! Opposed-dice attack resolution.
//!
//! Each attacking die is paired with a defense die. A pair scores a hit when
//! the attack roll meets the target's armor and the defense roll meets the
//! defense threshold for the kind of attack.

use rand::Rng;

use crate::army::{Equipment, Unit};

/// Faces on every die rolled by the engine.
pub const DIE_FACES: u8 = 6;

/// Defense roll needed to confirm a ranged hit.
pub const RANGED_DEFENSE_THRESHOLD: u8 = 4;

/// Defense roll needed to confirm a melee hit.
pub const MELEE_DEFENSE_THRESHOLD: u8 = 5;

/// Everything that decides how one unit's attack on another is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackProfile {
    pub dice: u32,
    pub armor: u8,
    pub defense_threshold: u8,
    pub attack_bonus: u8,
}

impl AttackProfile {
    /// Derives the profile for `attacker` striking `target`. Shooters use
    /// their shooting dice against the target's shooting armor; everyone
    /// else fights in melee.
    pub fn new(attacker: &Unit, target: &Unit) -> Self {
        let (aggressivity, armor, defense_threshold) = if attacker.can_shoot {
            (
                attacker.shooting_aggressivity,
                target.shooting_armor,
                RANGED_DEFENSE_THRESHOLD,
            )
        } else {
            (
                attacker.fight_aggressivity,
                target.fight_armor,
                MELEE_DEFENSE_THRESHOLD,
            )
        };
        AttackProfile {
            dice: dice_count(aggressivity),
            armor,
            defense_threshold,
            attack_bonus: attacker.equipment.contains(Equipment::HeavyWeapon.flag()) as u8,
        }
    }

    /// Rolls every die and returns the number of hits.
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        let mut hits = 0;
        for _ in 0..self.dice {
            let attack = roll_d6(rng) + self.attack_bonus;
            let defense = roll_d6(rng);
            if attack >= self.armor && defense >= self.defense_threshold {
                hits += 1;
            }
        }
        hits
    }

    /// Probability that a single die scores a hit.
    pub fn hit_probability(&self) -> f64 {
        let attack_needed = self.armor.saturating_sub(self.attack_bonus);
        chance_at_least(attack_needed) * chance_at_least(self.defense_threshold)
    }

    /// Mean number of hits over all dice.
    pub fn expected_hits(&self) -> f64 {
        self.dice as f64 * self.hit_probability()
    }
}

/// Floors a fractional aggressivity into a dice count. Negative or
/// non-finite values roll nothing.
pub fn dice_count(aggressivity: f64) -> u32 {
    if aggressivity.is_finite() && aggressivity > 0.0 {
        aggressivity.floor() as u32
    } else {
        0
    }
}

/// Rolls one six-sided die.
pub fn roll_d6(rng: &mut impl Rng) -> u8 {
    rng.gen_range(1..=DIE_FACES)
}

/// Chance that a plain d6 shows at least `target`.
pub fn chance_at_least(target: u8) -> f64 {
    let target = target.max(1);
    if target > DIE_FACES {
        return 0.0;
    }
    (DIE_FACES - target + 1) as f64 / DIE_FACES as f64
}

impl Unit {
    /// Simulates one attack on `other` and returns the hits scored.
    /// Neither unit is modified; apply the result with
    /// [`Unit::suffer_hits`].
    pub fn attack(&self, other: &Unit, rng: &mut impl Rng) -> u32 {
        AttackProfile::new(self, other).roll(rng)
    }

    /// Mean hits this unit would score against `other`.
    pub fn expected_hits(&self, other: &Unit) -> f64 {
        AttackProfile::new(self, other).expected_hits()
    }
}
