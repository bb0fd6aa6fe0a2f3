// Snapshot Runner: load a saved wallet network, run it, print the summary

use std::path::Path;

use anyhow::{Context, Result};
use referral_engine::*;

pub fn run(path: &Path, cycles: Option<u32>) -> Result<SimulationReport> {
    let repo = JsonFileRepository::new(path);
    let mut snapshot = repo
        .load()
        .with_context(|| format!("loading snapshot {}", path.display()))?;
    if let Some(cycles) = cycles {
        snapshot.config.cycles = cycles;
    }
    if snapshot.wallets.is_empty() {
        tracing::warn!(path = %path.display(), "snapshot has no wallets");
    }

    let mut sim = ReferralSimulator::from_snapshot(snapshot);
    let report = sim.run_core().context("running snapshot")?.clone();
    Ok(report)
}

pub fn print_summary(report: &SimulationReport) {
    println!("\n  {:<6} {:<20} {:>14} {:>14} {:>12} {:>12}",
        "Id", "Wallet", "Initial", "Final", "Tier 1", "Tier 2");
    println!("  {}", "-".repeat(84));
    for w in &report.wallets {
        println!("  {:<6} {:<20} {:>14} {:>14} {:>12} {:>12}",
            w.wallet_id.to_string(),
            w.name,
            w.initial_value.to_string(),
            w.final_balance.to_string(),
            w.total_tier1.to_string(),
            w.total_tier2.to_string(),
        );
    }
    println!("  {}", "-".repeat(84));
    let t = &report.totals;
    println!("  {} wallets over {} cycles | capital {} -> {} | base profit {} | commission {}\n",
        t.wallets, report.cycles, t.initial_capital, t.final_capital, t.base_profit, t.commission);
}
