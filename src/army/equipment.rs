//! Unit equipment.
//!
//! Equipment changes a unit's reach (javelins), its attack rolls (heavy
//! weapons) and how attractive it is as a target.

use bitflags::bitflags;

/// A single piece of equipment a unit can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equipment {
    Arcs,
    Javelins,
    Horses,
    HeavyWeapon,
}

/// All equipment kinds in bit order.
pub const ALL_EQUIPMENT: [Equipment; 4] = [
    Equipment::Arcs,
    Equipment::Javelins,
    Equipment::Horses,
    Equipment::HeavyWeapon,
];

impl Equipment {
    /// Returns the lowercase name used in roster files.
    pub const fn name(self) -> &'static str {
        match self {
            Equipment::Arcs => "arcs",
            Equipment::Javelins => "javelins",
            Equipment::Horses => "horses",
            Equipment::HeavyWeapon => "heavy_weapon",
        }
    }

    /// Parses equipment from its roster-file name.
    pub fn from_name(s: &str) -> Option<Equipment> {
        match s {
            "arcs" => Some(Equipment::Arcs),
            "javelins" => Some(Equipment::Javelins),
            "horses" => Some(Equipment::Horses),
            "heavy_weapon" => Some(Equipment::HeavyWeapon),
            _ => None,
        }
    }

    /// Contribution of this item to a unit's target weight.
    pub const fn weight(self) -> f64 {
        match self {
            Equipment::Arcs => 1.5,
            Equipment::Javelins => 1.2,
            Equipment::Horses => 1.5,
            Equipment::HeavyWeapon => 1.0,
        }
    }

    /// The single-item set for this piece of equipment.
    pub const fn flag(self) -> EquipmentSet {
        match self {
            Equipment::Arcs => EquipmentSet::ARCS,
            Equipment::Javelins => EquipmentSet::JAVELINS,
            Equipment::Horses => EquipmentSet::HORSES,
            Equipment::HeavyWeapon => EquipmentSet::HEAVY_WEAPON,
        }
    }

    /// Maps a single-item set back to its equipment.
    pub fn from_flag(flag: EquipmentSet) -> Option<Equipment> {
        ALL_EQUIPMENT.into_iter().find(|e| e.flag() == flag)
    }
}

bitflags! {
    /// The equipment a unit carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EquipmentSet: u8 {
        const ARCS         = 0x1;
        const JAVELINS     = 0x2;
        const HORSES       = 0x4;
        const HEAVY_WEAPON = 0x8;
    }
}

impl EquipmentSet {
    /// Iterates the items in the set in declaration order.
    pub fn items(self) -> impl Iterator<Item = Equipment> {
        self.iter().filter_map(Equipment::from_flag)
    }

    /// Sum of the item weights. An empty set weighs nothing.
    pub fn weight(self) -> f64 {
        self.items().map(Equipment::weight).sum()
    }
}

impl From<Equipment> for EquipmentSet {
    fn from(item: Equipment) -> Self {
        item.flag()
    }
}

impl FromIterator<Equipment> for EquipmentSet {
    fn from_iter<I: IntoIterator<Item = Equipment>>(iter: I) -> Self {
        iter.into_iter().fold(EquipmentSet::empty(), |set, item| set | item.flag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipment_name_roundtrip() {
        for e in ALL_EQUIPMENT {
            assert_eq!(Equipment::from_name(e.name()), Some(e));
        }
        assert_eq!(Equipment::from_name("catapult"), None);
    }

    #[test]
    fn set_membership() {
        let set = EquipmentSet::JAVELINS | Equipment::HeavyWeapon.flag();
        assert!(set.contains(Equipment::Javelins.flag()));
        assert!(set.contains(EquipmentSet::HEAVY_WEAPON));
        assert!(!set.contains(Equipment::Arcs.flag()));
        assert_eq!(
            set.items().collect::<Vec<_>>(),
            vec![Equipment::Javelins, Equipment::HeavyWeapon]
        );
    }

    #[test]
    fn set_weight_sums_items() {
        assert_eq!(EquipmentSet::empty().weight(), 0.0);
        let set: EquipmentSet = [Equipment::Arcs, Equipment::Horses].into_iter().collect();
        assert!((set.weight() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let mut set = EquipmentSet::empty();
        set.insert(Equipment::Arcs.flag());
        set.insert(Equipment::Arcs.into());
        assert!((set.weight() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn flags_map_back_to_equipment() {
        for e in ALL_EQUIPMENT {
            assert_eq!(Equipment::from_flag(e.flag()), Some(e));
        }
        assert_eq!(Equipment::from_flag(EquipmentSet::empty()), None);
        assert_eq!(Equipment::from_flag(EquipmentSet::ARCS | EquipmentSet::HORSES), None);
    }
}
