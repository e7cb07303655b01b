//! Warband -- fights skirmish battles between two bands.
//!
//! Runs one or more battles and writes each battle record as a JSON line to
//! stdout (or `--output`). Progress and the summary go to stderr through
//! `tracing`; set `RUST_LOG=warband=debug` to see every activation, move and
//! attack.
//!
//! Without roster files both sides field the typical band, with the
//! defender mirrored onto the negative half of the field.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warband::army::{load_band, typical_band, Band};
use warband::battle::{self, BattleConfig, BattleSummary};
use warband::combat::TargetScoring;

#[derive(Parser, Debug)]
#[command(name = "warband", version)]
#[command(about = "Simulate skirmish battles between two warbands")]
struct Args {
    /// Attacker roster (JSON); defaults to the typical band
    #[arg(long)]
    attacker: Option<PathBuf>,

    /// Defender roster (JSON); defaults to the typical band
    #[arg(long)]
    defender: Option<PathBuf>,

    /// Battle configuration (JSON); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of battles to fight
    #[arg(short = 'n', long)]
    battles: Option<usize>,

    /// Round cap per battle
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Random seed, 0 for entropy
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads for batches
    #[arg(short, long)]
    threads: Option<usize>,

    /// Target scoring: expected or sampled
    #[arg(long)]
    scoring: Option<TargetScoring>,

    /// Let the defender act first each round
    #[arg(long)]
    defender_first: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if let Some(n) = args.battles {
        config.num_battles = n;
    }
    if let Some(r) = args.rounds {
        config.max_rounds = r;
    }
    if let Some(s) = args.seed {
        config.seed = s;
    }
    if let Some(t) = args.threads {
        config.threads = t;
    }
    if let Some(scoring) = args.scoring {
        config.scoring = scoring;
    }
    if args.defender_first {
        config.attacker_first = false;
    }
    config.quiet |= args.quiet;

    let attacker = match &args.attacker {
        Some(path) => load_band(path)?,
        None => typical_band(),
    };
    if attacker.defender {
        return Err("the attacker roster cannot set \"defender\": true".into());
    }
    let defender = match &args.defender {
        Some(path) => load_band(path)?,
        None => typical_band(),
    };
    let defender = mirrored(defender);

    if !config.quiet {
        info!(
            battles = config.num_battles,
            rounds = config.max_rounds,
            scoring = %config.scoring,
            threads = config.threads,
            attacker_units = attacker.units.len(),
            defender_units = defender.units.len(),
            "starting"
        );
    }

    let start = Instant::now();
    let records = battle::run_battles(&config, &attacker, &defender)?;

    if !config.quiet {
        info!(
            "Completed {} battles in {:.2}s",
            records.len(),
            start.elapsed().as_secs_f64()
        );
        BattleSummary::from_records(&records).log();
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            battle::write_jsonl(&records, &mut writer)?;
            if !config.quiet {
                info!("Wrote {} battles to {}", records.len(), path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            battle::write_jsonl(&records, &mut writer)?;
        }
    }
    Ok(())
}

/// Puts the defending band on the negative half of the field unless its
/// roster already did.
fn mirrored(mut band: Band) -> Band {
    band.make_defender();
    band
}
