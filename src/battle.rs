//! Battle driver and batch simulation.
//!
//! Alternates turns between an attacking and a defending band until one side
//! is wiped out or the round cap is hit, and records what happened. Batches
//! of independent battles can be spread over a rayon thread pool; each battle
//! gets its own generator so results do not depend on the thread count.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::army::Band;
use crate::combat::TargetScoring;

/// Errors raised while loading a battle configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for a batch of battles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Number of battles to fight.
    pub num_battles: usize,
    /// Rounds after which a battle is declared a draw.
    pub max_rounds: u32,
    /// How units rank their targets.
    pub scoring: TargetScoring,
    /// Whether the attacking band takes the first turn of each round.
    pub attacker_first: bool,
    /// Worker threads; one or fewer runs battles sequentially.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-battle progress output.
    pub quiet: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            num_battles: 1,
            max_rounds: 100,
            scoring: TargetScoring::Expected,
            attacker_first: true,
            threads: 1,
            seed: 0,
            quiet: false,
        }
    }
}

impl BattleConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Generator for battle `battle_id` of the batch.
    fn rng_for(&self, battle_id: usize) -> SmallRng {
        if self.seed != 0 {
            SmallRng::seed_from_u64(self.seed.wrapping_add(battle_id as u64))
        } else {
            SmallRng::from_entropy()
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AttackerVictory,
    DefenderVictory,
    /// Both bands fell in the same half-round (a last melee exchange).
    MutualDestruction,
    /// The round cap was reached with both bands standing.
    Draw,
}

/// Losses and survivors after one full round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub attacker_models: u32,
    pub defender_models: u32,
}

/// A complete battle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub battle_id: usize,
    pub outcome: Outcome,
    /// Rounds started, including the one in which the battle ended.
    pub rounds: u32,
    pub attacker_models: u32,
    pub defender_models: u32,
    pub attacker_units: usize,
    pub defender_units: usize,
    pub history: Vec<RoundRecord>,
}

/// Returns the outcome if either band has been wiped out.
fn decided(attacker: &Band, defender: &Band) -> Option<Outcome> {
    match (attacker.band_destroyed(), defender.band_destroyed()) {
        (true, true) => Some(Outcome::MutualDestruction),
        (false, true) => Some(Outcome::AttackerVictory),
        (true, false) => Some(Outcome::DefenderVictory),
        (false, false) => None,
    }
}

/// Fights one battle to the end, mutating both bands in place.
///
/// Band destruction is checked after every half-round, so the second band
/// never acts in a round where the first already finished it off.
pub fn play_battle(
    battle_id: usize,
    attacker: &mut Band,
    defender: &mut Band,
    config: &BattleConfig,
    rng: &mut impl Rng,
) -> BattleRecord {
    let mut history = Vec::new();
    let mut outcome = decided(attacker, defender);
    let mut rounds = 0;

    while outcome.is_none() && rounds < config.max_rounds {
        rounds += 1;
        let (attacker_before, defender_before) =
            (attacker.surviving_models(), defender.surviving_models());

        for half in 0..2 {
            let attacker_acts = (half == 0) == config.attacker_first;
            let report = if attacker_acts {
                attacker.turn(defender, config.scoring, rng)
            } else {
                defender.turn(attacker, config.scoring, rng)
            };
            debug!(
                battle = battle_id,
                round = rounds,
                side = if attacker_acts { "attacker" } else { "defender" },
                activations = report.activations(),
                hits_dealt = report.hits_dealt(),
                hits_taken = report.hits_taken(),
                "half-round"
            );
            outcome = decided(attacker, defender);
            if outcome.is_some() {
                break;
            }
        }

        history.push(RoundRecord {
            round: rounds,
            attacker_losses: attacker_before - attacker.surviving_models(),
            defender_losses: defender_before - defender.surviving_models(),
            attacker_models: attacker.surviving_models(),
            defender_models: defender.surviving_models(),
        });
    }

    BattleRecord {
        battle_id,
        outcome: outcome.unwrap_or(Outcome::Draw),
        rounds,
        attacker_models: attacker.surviving_models(),
        defender_models: defender.surviving_models(),
        attacker_units: attacker.alive_units(),
        defender_units: defender.alive_units(),
        history,
    }
}

/// Fights one battle on fresh copies of the template bands.
fn play_from_templates(
    battle_id: usize,
    attacker: &Band,
    defender: &Band,
    config: &BattleConfig,
) -> BattleRecord {
    let mut rng = config.rng_for(battle_id);
    let (mut a, mut d) = (attacker.clone(), defender.clone());
    let record = play_battle(battle_id, &mut a, &mut d, config, &mut rng);
    if !config.quiet {
        info!(
            battle = battle_id + 1,
            of = config.num_battles,
            outcome = ?record.outcome,
            rounds = record.rounds,
            attacker_models = record.attacker_models,
            defender_models = record.defender_models,
            "battle finished"
        );
    }
    record
}

/// Runs the configured number of battles and collects their records in
/// battle order.
pub fn run_battles(
    config: &BattleConfig,
    attacker: &Band,
    defender: &Band,
) -> Result<Vec<BattleRecord>, ConfigError> {
    let mut records = Vec::with_capacity(config.num_battles);
    run_battles_with_callback(config, attacker, defender, |record| records.push(record))?;
    records.sort_by_key(|r| r.battle_id);
    Ok(records)
}

/// Runs battles, handing each record to `on_battle` as soon as it is done.
/// Parallel runs deliver records in completion order.
pub fn run_battles_with_callback<F>(
    config: &BattleConfig,
    attacker: &Band,
    defender: &Band,
    mut on_battle: F,
) -> Result<(), ConfigError>
where
    F: FnMut(BattleRecord) + Send,
{
    if config.threads <= 1 {
        for i in 0..config.num_battles {
            on_battle(play_from_templates(i, attacker, defender, config));
        }
        return Ok(());
    }

    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let (tx, rx) = mpsc::channel::<BattleRecord>();

    std::thread::scope(|scope| {
        scope.spawn(move || {
            pool.install(|| {
                (0..config.num_battles)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let _ = tx.send(play_from_templates(i, attacker, defender, config));
                    });
            });
        });

        for record in rx {
            on_battle(record);
        }
    });

    Ok(())
}

/// Aggregate results over a batch of battles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BattleSummary {
    pub battles: usize,
    pub attacker_wins: usize,
    pub defender_wins: usize,
    pub mutual_destructions: usize,
    pub draws: usize,
    pub avg_rounds: f64,
}

impl BattleSummary {
    pub fn from_records(records: &[BattleRecord]) -> Self {
        let mut summary = BattleSummary {
            battles: records.len(),
            ..Default::default()
        };
        let mut total_rounds = 0u64;
        for record in records {
            total_rounds += record.rounds as u64;
            match record.outcome {
                Outcome::AttackerVictory => summary.attacker_wins += 1,
                Outcome::DefenderVictory => summary.defender_wins += 1,
                Outcome::MutualDestruction => summary.mutual_destructions += 1,
                Outcome::Draw => summary.draws += 1,
            }
        }
        summary.avg_rounds = total_rounds as f64 / records.len().max(1) as f64;
        summary
    }

    /// Logs the summary at info level.
    pub fn log(&self) {
        let pct = |n: usize| 100.0 * n as f64 / self.battles.max(1) as f64;
        info!("=== Battle Summary ===");
        info!("Battles: {}", self.battles);
        info!("Avg rounds/battle: {:.1}", self.avg_rounds);
        info!("Attacker wins: {} ({:.1}%)", self.attacker_wins, pct(self.attacker_wins));
        info!("Defender wins: {} ({:.1}%)", self.defender_wins, pct(self.defender_wins));
        info!("Mutual destructions: {}", self.mutual_destructions);
        info!("Draws: {}", self.draws);
    }
}

/// Writes battle records as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(records: &[BattleRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}
