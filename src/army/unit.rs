//! Unit types and per-unit state.
//!
//! A unit is one squad sharing a stat line. Its model count only ever goes
//! down, through [`Unit::suffer_hits`], and the unit is destroyed exactly when
//! the count reaches zero.

use super::band::Band;
use super::equipment::{Equipment, EquipmentSet};

/// Range limit for units that can shoot.
pub const SHOOTING_RANGE: i32 = 2;

/// Range limit for units carrying javelins, shooters included.
pub const JAVELIN_RANGE: i32 = 1;

/// The rank of a unit within its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Lord,
    Guard,
    Warrior,
    Levy,
}

pub const ALL_UNIT_TYPES: [UnitType; 4] = [
    UnitType::Lord,
    UnitType::Guard,
    UnitType::Warrior,
    UnitType::Levy,
];

impl UnitType {
    /// Returns the lowercase name used in roster files and logs.
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Lord => "lord",
            UnitType::Guard => "guard",
            UnitType::Warrior => "warrior",
            UnitType::Levy => "levy",
        }
    }

    /// Parses a unit type from its roster-file name.
    pub fn from_name(s: &str) -> Option<UnitType> {
        match s {
            "lord" => Some(UnitType::Lord),
            "guard" => Some(UnitType::Guard),
            "warrior" => Some(UnitType::Warrior),
            "levy" => Some(UnitType::Levy),
            _ => None,
        }
    }

    /// Multiplier applied to equipment weight when ranking targets.
    pub const fn weight(self) -> f64 {
        match self {
            UnitType::Lord => 1.3,
            UnitType::Guard => 1.5,
            UnitType::Warrior => 1.2,
            UnitType::Levy => 1.0,
        }
    }

    /// Chance to activate when the whole activation pool is available.
    pub const fn activation_probability(self) -> f64 {
        match self {
            UnitType::Levy => 2.0 / 6.0,
            UnitType::Warrior => 3.0 / 6.0,
            UnitType::Lord => 1.0,
            UnitType::Guard => 1.0,
        }
    }

    /// Models a unit needs to still contribute a die to the activation pool.
    pub const fn min_activation_amount(self) -> u32 {
        match self {
            UnitType::Levy => 6,
            UnitType::Warrior => 4,
            UnitType::Lord => 1,
            UnitType::Guard => 1,
        }
    }
}

/// A squad of models fighting as one combat entity.
///
/// Stat fields are public; the model count is not, so that every loss goes
/// through [`Unit::suffer_hits`].
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub unit_type: UnitType,
    amount: u32,
    pub can_shoot: bool,
    /// Dice rolled in melee. Fractional values are floored when rolled.
    pub fight_aggressivity: f64,
    /// Dice rolled when shooting.
    pub shooting_aggressivity: f64,
    pub fight_armor: u8,
    pub shooting_armor: u8,
    /// Zero marks a melee unit; melee attacks draw retaliation.
    pub target_range: u8,
    pub equipment: EquipmentSet,
    pub position: i32,
}

impl Unit {
    /// Creates a melee unit with no dice, no armor and no equipment at
    /// position zero. Use the `with_*` builders to fill in the stat line.
    pub fn new(unit_type: UnitType, amount: u32) -> Self {
        Unit {
            unit_type,
            amount,
            can_shoot: false,
            fight_aggressivity: 0.0,
            shooting_aggressivity: 0.0,
            fight_armor: 0,
            shooting_armor: 0,
            target_range: 0,
            equipment: EquipmentSet::empty(),
            position: 0,
        }
    }

    /// Sets the starting model count. Losses in battle go through
    /// [`Unit::suffer_hits`] instead.
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_fight(mut self, aggressivity: f64, armor: u8) -> Self {
        self.fight_aggressivity = aggressivity;
        self.fight_armor = armor;
        self
    }

    pub fn with_shooting(mut self, aggressivity: f64, armor: u8) -> Self {
        self.shooting_aggressivity = aggressivity;
        self.shooting_armor = armor;
        self
    }

    pub fn shooter(mut self, can_shoot: bool) -> Self {
        self.can_shoot = can_shoot;
        self
    }

    pub fn with_target_range(mut self, target_range: u8) -> Self {
        self.target_range = target_range;
        self
    }

    pub fn with_equipment(mut self, item: Equipment) -> Self {
        self.equipment.insert(item.flag());
        self
    }

    pub fn at(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Current model count.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// True once the model count has reached zero.
    pub fn is_destroyed(&self) -> bool {
        self.amount == 0
    }

    /// Removes up to `hits` models. The count saturates at zero.
    pub fn suffer_hits(&mut self, hits: u32) {
        self.amount = self.amount.saturating_sub(hits);
    }

    /// How far this unit can reach an enemy.
    pub fn effective_range(&self) -> i32 {
        if self.equipment.contains(Equipment::Javelins.flag()) {
            JAVELIN_RANGE
        } else if self.can_shoot {
            SHOOTING_RANGE
        } else {
            0
        }
    }

    /// Returns true if `other` is alive and within this unit's reach.
    pub fn target_in_range(&self, other: &Unit) -> bool {
        if other.is_destroyed() {
            return false;
        }
        (self.position - other.position).abs() <= self.effective_range()
    }

    /// Indices of the units of `band` this unit can reach, in band order.
    pub fn targets_in_range(&self, band: &Band) -> Vec<usize> {
        band.units
            .iter()
            .enumerate()
            .filter(|(_, u)| self.target_in_range(u))
            .map(|(i, _)| i)
            .collect()
    }

    /// Advances one step toward the enemy. Defenders stand on the negative
    /// side of the axis and move up; attackers move down.
    pub fn move_forward(&mut self, is_defender: bool) {
        if is_defender {
            self.position += 1;
        } else {
            self.position -= 1;
        }
    }

    /// Equipment weight scaled by rank, used when ranking targets.
    pub fn target_weight(&self) -> f64 {
        self.equipment.weight() * self.unit_type.weight()
    }
}
