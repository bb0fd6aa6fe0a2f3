// Referral Engine Benchmark Runner
// Seeded random referral forests, timing and invariant checks, snapshot runs
//
// Usage:
//   cargo run --release --bin bench -- scaling                   # 30 runs per size
//   cargo run --release --bin bench -- scaling --runs 5          # Quick mode
//   cargo run --release --bin bench -- scaling --seed 42         # Custom base seed
//   cargo run --release --bin bench -- snapshot wallets.json     # Run a saved network

mod report;
mod scaling;
mod snapshot;
mod topology;

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use referral_engine::adapter::{from_decimal, to_decimal};
use referral_engine::SimulationConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report::BenchReport;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "bench")]
#[command(about = "Referral engine benchmark and snapshot runner")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time the engine over growing random networks
    Scaling {
        /// Seeded runs per network size
        #[arg(long, default_value = "30")]
        runs: usize,

        /// Base seed; run i uses seed + i
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Largest network size to include
        #[arg(long, default_value = "500")]
        max_wallets: usize,

        /// Cycles per run
        #[arg(long, default_value = "12")]
        cycles: u32,

        /// Yield per cycle in percent
        #[arg(long, default_value = "24")]
        rate_pct: f64,
    },

    /// Run a saved wallet snapshot and print its summary
    Snapshot {
        /// Snapshot JSON file
        path: PathBuf,

        /// Override the snapshot's cycle count
        #[arg(long)]
        cycles: Option<u32>,
    },
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Scaling { runs, seed, max_wallets, cycles, rate_pct } => {
            run_scaling(runs, seed, max_wallets, cycles, rate_pct)
        }
        Commands::Snapshot { path, cycles } => {
            let report = snapshot::run(&path, cycles)?;
            snapshot::print_summary(&report);
            Ok(())
        }
    }
}

fn run_scaling(runs: usize, seed: u64, max_wallets: usize, cycles: u32, rate_pct: f64) -> Result<()> {
    let config = SimulationConfig::default()
        .with_cycles(cycles)
        .with_rate_pct(to_decimal("rate_pct", rate_pct)?);
    let sizes: Vec<usize> = scaling::SIZES.iter().copied().filter(|&s| s <= max_wallets).collect();
    if sizes.is_empty() {
        bail!("no network size fits under --max-wallets {max_wallets}");
    }

    println!("\n  Referral Engine Benchmark Runner");
    println!("  PRNG: ChaCha8Rng | Runs/size: {} | Base seed: {} | Cycles: {} | Rate: {}%",
        runs, seed, cycles, config.rate_pct);
    println!("  {:<10} {:>6} {:>16} {:>10} {:>16}", "Wallets", "Pass%", "Time (us)", "Edges", "Commission");
    println!("  {}", "-".repeat(64));

    let suite_start = Instant::now();
    let mut sizes_out = Vec::with_capacity(sizes.len());
    for size in sizes {
        let report = scaling::run_size(&config, size, runs, seed);
        println!("  {:<10} {:>5}% {:>9.0}±{:<6.0} {:>10.1} {:>16.2}",
            report.wallets,
            (report.pass_rate * 100.0) as u32,
            report.elapsed_us.mean,
            report.elapsed_us.ci95,
            report.edges.mean,
            report.total_commission.mean,
        );
        sizes_out.push(report);
    }
    println!("  {}", "-".repeat(64));
    println!("  Suite time: {:.2}s\n", suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let report = BenchReport {
        timestamp: ts.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        base_seed: seed,
        n_runs_per_size: runs,
        cycles,
        rate_pct: from_decimal(config.rate_pct),
        sizes: sizes_out,
    };

    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir).context("creating benchmark-results/")?;
    let path = dir.join(format!("scaling-{ts}.json"));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("  Results saved to: {}\n", path.display());

    if !report.all_pass() {
        bail!("engine invariants failed in at least one run");
    }
    Ok(())
}
