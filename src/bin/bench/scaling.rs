// Scaling Runs: N seeded networks per size, timed and checked
// Seeds are base_seed + run index so every run is reproducible on its own.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use referral_engine::adapter::from_decimal;
use referral_engine::*;

use crate::report::{RunResult, SizeReport};
use crate::topology::TopologyGenerator;

/// Network sizes walked by `scaling`, capped at `--max-wallets`.
pub const SIZES: [usize; 6] = [10, 50, 100, 250, 500, 1000];

pub fn run_single(config: &SimulationConfig, size: usize, seed: u64) -> RunResult {
    let net = TopologyGenerator::new(ChaCha8Rng::seed_from_u64(seed)).generate(size, config.cycles);
    let engine = CycleEngine::new(config);

    let start = Instant::now();
    let first = engine.run(&net.wallets, &net.schedule);
    let elapsed_us = start.elapsed().as_micros();

    let second = engine.run(&net.wallets, &net.schedule);
    let idempotent = first == second;
    let non_negative = first
        .iter()
        .all(|r| r.series.balance.iter().all(|b| !b.is_negative()));

    let report = SimulationReport::new(config.cycles, first);
    if !idempotent || !non_negative {
        tracing::warn!(seed, size, idempotent, non_negative, "invariant violated");
    }

    RunResult {
        seed,
        wallets: size,
        edges: net.edges,
        movements: net.schedule.len(),
        cycles: config.cycles,
        elapsed_us,
        idempotent,
        non_negative,
        final_capital: from_decimal(report.totals.final_capital.0),
        total_commission: from_decimal(report.totals.commission.0),
    }
}

pub fn run_size(config: &SimulationConfig, size: usize, runs: usize, base_seed: u64) -> SizeReport {
    let results = (0..runs as u64)
        .map(|i| run_single(config, size, base_seed.wrapping_add(i)))
        .collect();
    SizeReport::from_runs(size, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_runs_pass_invariants() {
        let config = SimulationConfig::default().with_cycles(6);
        let report = run_size(&config, 20, 3, 11);
        assert_eq!(report.n_runs, 3);
        assert_eq!(report.pass_rate, 1.0);
    }
}
