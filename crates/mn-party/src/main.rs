//! m-of-n Party CLI
//!
//! Runs the whole key exchange locally for `parties` participants and prints
//! the participants' keys, the aggregated spend key and the key restored from
//! every `threshold`-sized subset.

use anyhow::Result;
use clap::Parser;
use mn_core::{Parallelism, ProtocolRun, RunReport, ThresholdConfig};
use rand::rngs::OsRng;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// m-of-n Party - multisig key exchange simulator
#[derive(Parser)]
#[command(name = "mn-party")]
#[command(about = "Simulate an m-of-n multisig key exchange and verify every m-subset")]
#[command(version)]
struct Cli {
    /// Participants needed to restore the spend key (m)
    threshold: usize,

    /// Total number of participants (n)
    parties: usize,

    /// Seed the key generator for a reproducible run
    #[arg(long, env = "MN_SEED")]
    seed: Option<u64>,

    /// Print the run as JSON
    #[arg(long, env = "MN_JSON")]
    json: bool,

    /// Restore subsets on a single thread
    #[arg(long)]
    sequential: bool,

    /// Log filter, e.g. "info" or "mn_core=debug"
    #[arg(long, env = "MN_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let config = ThresholdConfig::new(cli.threshold, cli.parties)?;
    let parallelism = if cli.sequential {
        Parallelism::Sequential
    } else {
        Parallelism::Auto
    };

    info!(
        version = mn_core::VERSION,
        threshold = config.threshold(),
        n_parties = config.parties(),
        seeded = cli.seed.is_some(),
        "Starting run"
    );

    let run = execute(&config, cli.seed, parallelism)?;
    let report = run.report();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    run.ensure_verified()?;
    Ok(())
}

fn execute(
    config: &ThresholdConfig,
    seed: Option<u64>,
    parallelism: Parallelism,
) -> Result<ProtocolRun> {
    let run = match seed {
        Some(seed) => {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            mn_core::run(config, &mut rng, parallelism)?
        }
        None => mn_core::run(config, &mut OsRng, parallelism)?,
    };
    Ok(run)
}

fn print_report(report: &RunReport) {
    for participant in &report.participants {
        println!(
            "b{id}: {}, B{id}: {}",
            participant.secret,
            participant.public,
            id = participant.id
        );
    }

    // one line per key entering the unique set
    for contributor in &report.contributors {
        for _ in 0..contributor.unique_keys {
            println!("{} had uniq key", contributor.id);
        }
    }

    println!("spend key: {}", report.spend_key.display_secret);

    for restoration in &report.restorations {
        let indices: String = restoration.indices.iter().map(|i| i.to_string()).collect();
        println!(
            "restored from {}: {}",
            indices, restoration.spend_key.display_secret
        );
    }
}
