//! Turn orchestration.
//!
//! One call to [`Band::turn`] is half a round: every unit of the acting band
//! gets one chance to activate, then either closes in on the enemy or fights
//! the best target in reach.

use rand::Rng;
use tracing::debug;

use crate::army::Band;

use super::targeting::{find_target, TargetScoring};

/// What a single unit did during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// The unit failed its activation roll.
    Idle { unit: usize },
    /// Nothing was in reach, so the unit advanced.
    Moved { unit: usize, position: i32 },
    /// The unit attacked `target`. Melee attacks carry the hits the target
    /// scored back.
    Attacked {
        unit: usize,
        target: usize,
        hits: u32,
        retaliation: Option<u32>,
    },
}

/// Outcome of one band's turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Activation pool the turn was played with.
    pub activation_dice: u32,
    pub events: Vec<TurnEvent>,
}

impl TurnReport {
    /// Units that passed their activation roll.
    pub fn activations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !matches!(e, TurnEvent::Idle { .. }))
            .count()
    }

    /// Hits inflicted on the opposing band.
    pub fn hits_dealt(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                TurnEvent::Attacked { hits, .. } => *hits,
                _ => 0,
            })
            .sum()
    }

    /// Hits the acting band took back from melee retaliation.
    pub fn hits_taken(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                TurnEvent::Attacked { retaliation, .. } => retaliation.unwrap_or(0),
                _ => 0,
            })
            .sum()
    }
}

impl Band {
    /// Plays this band's half of a round against `other`.
    ///
    /// The activation pool is counted once, before anyone acts, so losses
    /// taken during the turn do not shrink it. Destroyed units sit out. All
    /// damage goes through `suffer_hits`. The caller checks
    /// [`Band::band_destroyed`] afterwards.
    pub fn turn(&mut self, other: &mut Band, scoring: TargetScoring, rng: &mut impl Rng) -> TurnReport {
        let activation_dice = self.get_activation_dice();
        let mut events = Vec::with_capacity(self.units.len());

        for i in 0..self.units.len() {
            let unit = &self.units[i];
            if unit.is_destroyed() {
                continue;
            }
            if !unit.activation(activation_dice, rng) {
                debug!(unit = i, kind = unit.unit_type.name(), "failed activation");
                events.push(TurnEvent::Idle { unit: i });
                continue;
            }

            let Some(t) = find_target(unit, other, scoring, rng) else {
                let defender = self.defender;
                let unit = &mut self.units[i];
                unit.move_forward(defender);
                debug!(unit = i, kind = unit.unit_type.name(), position = unit.position, "move");
                events.push(TurnEvent::Moved {
                    unit: i,
                    position: unit.position,
                });
                continue;
            };

            let target = &other.units[t];
            let hits = unit.attack(target, rng);
            let retaliation = if unit.target_range == 0 {
                Some(target.attack(unit, rng))
            } else {
                None
            };

            other.units[t].suffer_hits(hits);
            if let Some(back) = retaliation {
                self.units[i].suffer_hits(back);
            }

            debug!(
                unit = i,
                kind = self.units[i].unit_type.name(),
                target = t,
                target_kind = other.units[t].unit_type.name(),
                hits,
                retaliation = retaliation.unwrap_or(0),
                target_left = other.units[t].amount(),
                unit_left = self.units[i].amount(),
                "attack"
            );
            events.push(TurnEvent::Attacked {
                unit: i,
                target: t,
                hits,
                retaliation,
            });
        }

        TurnReport {
            activation_dice,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::{archetype, Equipment, Unit, UnitType};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn champion(position: i32) -> Unit {
        Unit::new(UnitType::Lord, 10)
            .with_fight(3.0, 5)
            .with_equipment(Equipment::HeavyWeapon)
            .at(position)
    }

    #[test]
    fn empty_pool_means_every_unit_idles() {
        let mut rng = SmallRng::seed_from_u64(1);
        // Warriors below four models add no activation dice.
        let mut band = Band::new(vec![archetype(UnitType::Warrior).with_amount(3)]);
        let mut enemy = Band::new(vec![archetype(UnitType::Warrior).at(1)]);
        let before = (band.clone(), enemy.clone());
        let report = band.turn(&mut enemy, TargetScoring::Expected, &mut rng);
        assert_eq!(report.activation_dice, 0);
        assert_eq!(report.events, vec![TurnEvent::Idle { unit: 0 }]);
        assert_eq!((band, enemy), before);
    }

    #[test]
    fn unit_without_target_advances() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut attackers = Band::new(vec![champion(5)]);
        let mut defenders = Band::new(vec![champion(-5)]);
        defenders.defender = true;

        let mut moved = 0;
        for _ in 0..200 {
            let report = attackers.turn(&mut defenders, TargetScoring::Expected, &mut rng);
            moved += report.activations();
            if attackers.units[0].position <= 0 {
                break;
            }
        }
        assert!(moved > 0);
        assert_eq!(attackers.units[0].position, 5 - moved as i32);

        let report = defenders.turn(&mut attackers, TargetScoring::Expected, &mut rng);
        if report.activations() == 1 {
            assert_eq!(
                report.events,
                vec![TurnEvent::Moved { unit: 0, position: -4 }]
            );
        }
    }

    #[test]
    fn melee_attack_draws_retaliation() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut band = Band::new(vec![champion(0)]);
        let mut enemy = Band::new(vec![champion(0)]);
        let mut saw_attack = false;
        for _ in 0..100 {
            let report = band.turn(&mut enemy, TargetScoring::Sampled, &mut rng);
            for event in &report.events {
                if let TurnEvent::Attacked { retaliation, target, .. } = event {
                    assert!(retaliation.is_some());
                    assert_eq!(*target, 0);
                    saw_attack = true;
                }
            }
            if saw_attack {
                assert_eq!(band.units[0].amount(), 10 - report.hits_taken());
                assert_eq!(enemy.units[0].amount(), 10 - report.hits_dealt());
                break;
            }
        }
        assert!(saw_attack);
    }

    #[test]
    fn ranged_attack_is_one_sided() {
        let mut rng = SmallRng::seed_from_u64(4);
        // A lord guarantees a full pool so the archers always activate.
        let mut band = Band::new(
            std::iter::repeat(archetype(UnitType::Lord).at(50))
                .take(8)
                .chain(std::iter::once(
                    Unit::new(UnitType::Guard, 12)
                        .shooter(true)
                        .with_shooting(4.0, 3)
                        .with_target_range(2)
                        .with_equipment(Equipment::Arcs)
                        .at(0),
                ))
                .collect(),
        );
        let mut enemy = Band::new(vec![archetype(UnitType::Warrior).at(-2)]);
        let report = band.turn(&mut enemy, TargetScoring::Expected, &mut rng);
        assert_eq!(report.activation_dice, 9);
        let attack = report
            .events
            .iter()
            .find(|e| matches!(e, TurnEvent::Attacked { unit: 8, .. }))
            .copied()
            .unwrap();
        let TurnEvent::Attacked { retaliation, hits, .. } = attack else {
            unreachable!()
        };
        assert_eq!(retaliation, None);
        assert_eq!(band.units[8].amount(), 12);
        assert_eq!(enemy.units[0].amount(), 8 - hits);
    }

    #[test]
    fn destroyed_units_sit_out() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut band = Band::new(vec![
            archetype(UnitType::Lord).with_amount(0),
            archetype(UnitType::Guard),
        ]);
        let mut enemy = Band::new(vec![archetype(UnitType::Lord).at(-10)]);
        for _ in 0..50 {
            let report = band.turn(&mut enemy, TargetScoring::Expected, &mut rng);
            assert!(report.events.iter().all(|e| match e {
                TurnEvent::Idle { unit } | TurnEvent::Moved { unit, .. } => *unit == 1,
                TurnEvent::Attacked { unit, .. } => *unit == 1,
            }));
        }
        assert_eq!(band.units[0].position, 4);
    }

    #[test]
    fn pool_is_fixed_for_the_whole_turn() {
        let mut rng = SmallRng::seed_from_u64(6);
        // Eight lords make a full pool, so every lord is certain to act.
        // The first six charge a brute that strikes back hard enough to
        // kill each of them; the last two are out of reach and advance.
        let lord = Unit::new(UnitType::Lord, 1).with_fight(0.0, 1);
        let mut band = Band::new(
            std::iter::repeat(lord.clone().at(0))
                .take(6)
                .chain(std::iter::repeat(lord.at(10)).take(2))
                .collect(),
        );
        let brute = Unit::new(UnitType::Guard, 5)
            .with_fight(60.0, 6)
            .with_equipment(Equipment::HeavyWeapon);
        let mut enemy = Band::new(vec![brute]);

        let report = band.turn(&mut enemy, TargetScoring::Expected, &mut rng);
        assert_eq!(report.activation_dice, 8);
        assert_eq!(report.activations(), 8);
        for i in 0..6 {
            assert!(band.units[i].is_destroyed(), "lord {} survived", i);
        }
        // Had the pool been recounted, the last two would roll against two dice.
        assert_eq!(band.get_activation_dice(), 2);
        assert_eq!(
            &report.events[6..],
            &[
                TurnEvent::Moved { unit: 6, position: 9 },
                TurnEvent::Moved { unit: 7, position: 9 },
            ]
        );
        assert_eq!(enemy.units[0].amount(), 5);
    }
}
