// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Cycle Engine

//! Cycle-by-cycle yield and commission simulation.
//!
//! Per cycle, for every wallet at once:
//!
//! ```text
//! balance      = max(balance + deposits - withdrawals, 0)
//! base_profit  = balance * rate
//! tier1[p]    += base_profit[c] * 0.20   for every c in p.sources
//! tier2[g]    += base_profit[c] * 0.10   for every c in p.sources, p in g.sources
//! balance      = max(balance + base_profit, 0)
//! ```
//!
//! Commission is reporting-only unless the config asks for it to compound.
//! The engine never fails; inputs are trusted (see `validation`).

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::config::{CommissionMode, SimulationConfig};
use crate::graph::ReferralGraph;
use crate::movements::MovementSchedule;
use crate::types::{Amount, Movement, SimulationResult, Wallet, WalletId, WalletSeries};

/// Run the engine with the default commission shares and reporting mode.
///
/// `rate_pct` is a percentage (24 means 24% per cycle). Every returned
/// series has `cycles + 1` points; index 0 is the initial state.
pub fn simulate(
    wallets: &[Wallet],
    rate_pct: Decimal,
    cycles: u32,
    withdrawals: &HashMap<WalletId, Vec<Movement>>,
    deposits: &HashMap<WalletId, Vec<Movement>>,
) -> Vec<SimulationResult> {
    let config = SimulationConfig::default()
        .with_rate_pct(rate_pct)
        .with_cycles(cycles);
    let schedule = MovementSchedule::from_maps(withdrawals, deposits);
    CycleEngine::new(&config).run(wallets, &schedule)
}

// ---------------------------------------------------------------------------
// CycleEngine
// ---------------------------------------------------------------------------

/// Stateless runner holding the numeric parameters of one configuration.
#[derive(Debug, Clone, Copy)]
pub struct CycleEngine {
    rate: Decimal,
    cycles: u32,
    tier1_share: Decimal,
    tier2_share: Decimal,
    mode: CommissionMode,
}

impl CycleEngine {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            rate: config.rate(),
            cycles: config.cycles,
            tier1_share: config.tier1_share,
            tier2_share: config.tier2_share,
            mode: config.commission_mode,
        }
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn run(&self, wallets: &[Wallet], schedule: &MovementSchedule) -> Vec<SimulationResult> {
        let graph = ReferralGraph::build(wallets);
        let n = wallets.len();
        let points = self.cycles as usize + 1;

        tracing::debug!(
            wallets = n,
            edges = graph.edge_count(),
            cycles = self.cycles,
            movements = schedule.len(),
            "running referral simulation"
        );

        let mut balances: Vec<Amount> = wallets.iter().map(|w| w.initial_value).collect();
        let mut series: Vec<WalletSeries> = wallets
            .iter()
            .map(|w| WalletSeries::seeded(w.initial_value, points))
            .collect();

        let mut profit = vec![Amount::zero(); n];
        let mut tier1 = vec![Amount::zero(); n];
        let mut tier2 = vec![Amount::zero(); n];

        for cycle in 1..=self.cycles {
            // a. scheduled movements; the floor applies even without movements
            for (i, w) in wallets.iter().enumerate() {
                let totals = schedule.totals(w.id, cycle);
                balances[i] = (balances[i] + totals.deposits - totals.withdrawals).floor_zero();
            }

            // b. base profit on the post-movement balance
            for i in 0..n {
                profit[i] = balances[i] * self.rate;
            }

            // c/d. commissions flow up at most two levels
            tier1.fill(Amount::zero());
            tier2.fill(Amount::zero());
            for child in 0..n {
                if profit[child].is_zero() {
                    continue;
                }
                let t1 = profit[child] * self.tier1_share;
                let t2 = profit[child] * self.tier2_share;
                for &parent in graph.parents(child) {
                    tier1[parent] += t1;
                    for &grandparent in graph.parents(parent) {
                        tier2[grandparent] += t2;
                    }
                }
            }

            // e/f. advance and record
            for i in 0..n {
                let mut next = balances[i] + profit[i];
                if self.mode == CommissionMode::Compound {
                    next += tier1[i] + tier2[i];
                }
                balances[i] = next.floor_zero();
                series[i].push(balances[i], profit[i], tier1[i], tier2[i]);
            }
        }

        wallets
            .iter()
            .cloned()
            .zip(series)
            .map(|(wallet, series)| SimulationResult { wallet, series })
            .collect()
    }
}
