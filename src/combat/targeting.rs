//! Target selection.
//!
//! Candidates in range are ranked by a target factor: an estimate of the
//! hits the attacker would score, scaled by the weight of both units. The
//! estimate is either the exact expectation or one simulated attack, which
//! adds noise to every decision.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::{Band, Unit};

/// How the hit estimate inside the target factor is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetScoring {
    /// Mean hits from the dice odds. Draws no random numbers.
    #[default]
    Expected,
    /// Hits from one simulated attack per candidate.
    Sampled,
}

impl TargetScoring {
    pub const fn name(self) -> &'static str {
        match self {
            TargetScoring::Expected => "expected",
            TargetScoring::Sampled => "sampled",
        }
    }
}

impl fmt::Display for TargetScoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetScoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expected" => Ok(TargetScoring::Expected),
            "sampled" => Ok(TargetScoring::Sampled),
            _ => Err(format!("unknown target scoring '{}', expected 'expected' or 'sampled'", s)),
        }
    }
}

impl Unit {
    /// Desirability of `other` as a target. Higher is better.
    ///
    /// With [`TargetScoring::Sampled`] this rolls dice, so two calls on the
    /// same pair generally disagree.
    pub fn target_factor(&self, other: &Unit, scoring: TargetScoring, rng: &mut impl Rng) -> f64 {
        let hits = match scoring {
            TargetScoring::Expected => self.expected_hits(other),
            TargetScoring::Sampled => self.attack(other, rng) as f64,
        };
        hits * self.target_weight() * other.target_weight()
    }
}

/// Picks the best target for `unit` among the units of `other_band`.
///
/// Returns the index of the chosen unit, or `None` when nothing is in range.
/// Each candidate is scored once; the highest score wins and ties go to the
/// candidate that comes first in band order.
pub fn find_target(
    unit: &Unit,
    other_band: &Band,
    scoring: TargetScoring,
    rng: &mut impl Rng,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for idx in unit.targets_in_range(other_band) {
        let score = unit.target_factor(&other_band.units[idx], scoring, rng);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}
