//! Bands: one side's roster of units.

use super::unit::Unit;

/// Number of faces on the activation dice; also the largest useful pool.
pub const MAX_ACTIVATION_DICE: u32 = 8;

/// One side of a battle.
///
/// Membership is fixed once a battle starts. Destroyed units stay in
/// `units` so indices are stable from round to round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Band {
    pub units: Vec<Unit>,
    pub defender: bool,
}

impl Band {
    /// Creates an attacking band from the given units.
    pub fn new(units: Vec<Unit>) -> Self {
        Band {
            units,
            defender: false,
        }
    }

    /// Marks this band as the defender and mirrors every unit onto the
    /// negative half of the axis. Calling it twice has no further effect.
    pub fn make_defender(&mut self) {
        if self.defender {
            return;
        }
        self.defender = true;
        for unit in &mut self.units {
            unit.position = -unit.position;
        }
    }

    /// Counts the units strong enough to contribute an activation die.
    pub fn get_activation_dice(&self) -> u32 {
        self.units
            .iter()
            .filter(|u| u.amount() >= u.unit_type.min_activation_amount())
            .count() as u32
    }

    /// True when no unit is left standing. An empty band counts as destroyed.
    pub fn band_destroyed(&self) -> bool {
        self.units.iter().all(Unit::is_destroyed)
    }

    /// Total models still alive across the band.
    pub fn surviving_models(&self) -> u32 {
        self.units.iter().map(Unit::amount).sum()
    }

    /// Number of units not yet destroyed.
    pub fn alive_units(&self) -> usize {
        self.units.iter().filter(|u| !u.is_destroyed()).count()
    }
}
