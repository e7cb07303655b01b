//! Roster construction.
//!
//! Provides the four archetype stat lines, the typical band built from them,
//! and a JSON roster format for custom bands. Roster files are validated when
//! loaded: unknown names and impossible stat values are rejected up front
//! rather than surfacing mid-battle.
//!
//! Example roster:
//!
//! ```json
//! {
//!   "defender": true,
//!   "units": [
//!     { "archetype": "lord" },
//!     { "archetype": "warrior", "count": 3, "equipment": ["javelins"] },
//!     { "unit_type": "levy", "amount": 10, "can_shoot": true,
//!       "shooting_aggressivity": 1, "shooting_armor": 3, "fight_armor": 3,
//!       "equipment": ["arcs"], "position": 3 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::band::Band;
use super::equipment::Equipment;
use super::unit::{Unit, UnitType};

/// Largest armor value a roll can still meet (a six plus a heavy weapon).
pub const MAX_ARMOR: u8 = 7;

/// Errors raised while building a band from a roster file.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid roster JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown unit type: '{0}'")]
    UnknownUnitType(String),

    #[error("unknown equipment: '{0}'")]
    UnknownEquipment(String),

    #[error("unit entry {0} needs an archetype or a unit_type")]
    MissingUnitType(usize),

    #[error("unit entry {0} has no models")]
    EmptyUnit(usize),

    #[error("unit entry {index}: {field} must be finite and non-negative, got {value}")]
    InvalidAggressivity {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("unit entry {index}: {field} must be between 1 and {max}, got {value}", max = MAX_ARMOR)]
    InvalidArmor {
        index: usize,
        field: &'static str,
        value: u8,
    },
}

/// Returns the preset stat line for a unit type, at its usual starting
/// position on the attacker's side.
pub fn archetype(unit_type: UnitType) -> Unit {
    match unit_type {
        UnitType::Levy => Unit::new(UnitType::Levy, 12)
            .shooter(true)
            .with_fight(1.0 / 3.0, 3)
            .with_shooting(1.0 / 2.0, 3)
            .with_target_range(2)
            .with_equipment(Equipment::Arcs)
            .at(2),
        UnitType::Warrior => Unit::new(UnitType::Warrior, 8)
            .with_fight(1.0, 4)
            .with_shooting(1.0 / 2.0, 4)
            .at(1),
        UnitType::Guard => Unit::new(UnitType::Guard, 4)
            .with_fight(2.0, 5)
            .with_shooting(1.0, 5)
            .with_equipment(Equipment::Horses)
            .at(4),
        // Armor 6 on a single model stands in for the lord's resilience.
        UnitType::Lord => Unit::new(UnitType::Lord, 1)
            .with_fight(8.0, 6)
            .with_shooting(4.0, 6)
            .with_equipment(Equipment::Horses)
            .at(4),
    }
}

/// Builds the standard band: a lord, a guard, three warriors and two levies.
pub fn typical_band() -> Band {
    let mut units = vec![archetype(UnitType::Lord), archetype(UnitType::Guard)];
    units.extend((0..3).map(|_| archetype(UnitType::Warrior)));
    units.extend((0..2).map(|_| archetype(UnitType::Levy)));
    Band::new(units)
}

/// A roster as read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub defender: bool,
    pub units: Vec<UnitEntry>,
}

/// One line of a roster. Starts from `archetype` when given, otherwise from
/// a bare `unit_type`; any stat present overrides the starting value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitEntry {
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub unit_type: Option<String>,
    #[serde(default)]
    pub amount: Option<u32>,
    #[serde(default)]
    pub can_shoot: Option<bool>,
    #[serde(default)]
    pub fight_aggressivity: Option<f64>,
    #[serde(default)]
    pub shooting_aggressivity: Option<f64>,
    #[serde(default)]
    pub fight_armor: Option<u8>,
    #[serde(default)]
    pub shooting_armor: Option<u8>,
    #[serde(default)]
    pub target_range: Option<u8>,
    #[serde(default)]
    pub equipment: Option<Vec<String>>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

fn parse_unit_type(name: &str) -> Result<UnitType, RosterError> {
    UnitType::from_name(name).ok_or_else(|| RosterError::UnknownUnitType(name.to_string()))
}

impl UnitEntry {
    /// Builds the unit this entry describes, validating every stat.
    pub fn to_unit(&self, index: usize) -> Result<Unit, RosterError> {
        let mut unit = match (&self.archetype, &self.unit_type) {
            (Some(name), _) => {
                let mut unit = archetype(parse_unit_type(name)?);
                if let Some(t) = &self.unit_type {
                    unit.unit_type = parse_unit_type(t)?;
                }
                unit
            }
            (None, Some(t)) => Unit::new(parse_unit_type(t)?, 0),
            (None, None) => return Err(RosterError::MissingUnitType(index)),
        };

        if let Some(amount) = self.amount {
            unit = unit.with_amount(amount);
        }
        if unit.amount() == 0 {
            return Err(RosterError::EmptyUnit(index));
        }
        if let Some(can_shoot) = self.can_shoot {
            unit.can_shoot = can_shoot;
        }
        if let Some(v) = self.fight_aggressivity {
            unit.fight_aggressivity = v;
        }
        if let Some(v) = self.shooting_aggressivity {
            unit.shooting_aggressivity = v;
        }
        if let Some(v) = self.fight_armor {
            unit.fight_armor = v;
        }
        if let Some(v) = self.shooting_armor {
            unit.shooting_armor = v;
        }
        if let Some(v) = self.target_range {
            unit.target_range = v;
        }
        if let Some(names) = &self.equipment {
            for name in names {
                let item = Equipment::from_name(name)
                    .ok_or_else(|| RosterError::UnknownEquipment(name.clone()))?;
                unit.equipment.insert(item.flag());
            }
        }
        if let Some(p) = self.position {
            unit.position = p;
        }

        validate_unit(&unit, index)?;
        Ok(unit)
    }
}

/// Checks the stat line of a unit built from a roster entry.
fn validate_unit(unit: &Unit, index: usize) -> Result<(), RosterError> {
    for (field, value) in [
        ("fight_aggressivity", unit.fight_aggressivity),
        ("shooting_aggressivity", unit.shooting_aggressivity),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(RosterError::InvalidAggressivity {
                index,
                field,
                value,
            });
        }
    }
    for (field, value) in [
        ("fight_armor", unit.fight_armor),
        ("shooting_armor", unit.shooting_armor),
    ] {
        if value == 0 || value > MAX_ARMOR {
            return Err(RosterError::InvalidArmor {
                index,
                field,
                value,
            });
        }
    }
    Ok(())
}

impl RosterFile {
    /// Expands every entry into units and assembles the band. Defender
    /// rosters are mirrored onto the negative axis.
    pub fn into_band(self) -> Result<Band, RosterError> {
        let mut units = Vec::new();
        for (index, entry) in self.units.iter().enumerate() {
            let unit = entry.to_unit(index)?;
            units.extend(std::iter::repeat(unit).take(entry.count));
        }
        let mut band = Band::new(units);
        if self.defender {
            band.make_defender();
        }
        Ok(band)
    }
}

/// Parses a roster from a JSON string.
pub fn band_from_json(json: &str) -> Result<Band, RosterError> {
    let roster: RosterFile = serde_json::from_str(json)?;
    roster.into_band()
}

/// Loads a roster from a JSON file.
pub fn load_band(path: &Path) -> Result<Band, RosterError> {
    let data = fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.display().to_string(),
        source,
    })?;
    band_from_json(&data)
}
