//! Bands and their units.
//!
//! Contains the unit stat line, equipment, the band container and roster
//! construction.

pub mod band;
pub mod equipment;
pub mod roster;
pub mod unit;

pub use band::{Band, MAX_ACTIVATION_DICE};
pub use equipment::{Equipment, EquipmentSet, ALL_EQUIPMENT};
pub use roster::{archetype, band_from_json, load_band, typical_band, RosterError, RosterFile};
pub use unit::{Unit, UnitType, ALL_UNIT_TYPES};
