// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Run Summary

use serde::{Deserialize, Serialize};

use crate::types::{Amount, SimulationResult, WalletId};

/// Totals over one wallet's series (cycle 0 contributes nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub wallet_id: WalletId,
    pub name: String,
    pub initial_value: Amount,
    pub final_balance: Amount,
    pub total_base_profit: Amount,
    pub total_tier1: Amount,
    pub total_tier2: Amount,
    pub total_commission: Amount,
}

impl WalletSummary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let s = &result.series;
        let total_tier1: Amount = s.tier1_commission.iter().sum();
        let total_tier2: Amount = s.tier2_commission.iter().sum();
        Self {
            wallet_id: result.wallet.id,
            name: result.wallet.name.clone(),
            initial_value: result.wallet.initial_value,
            final_balance: s.final_balance(),
            total_base_profit: s.base_profit.iter().sum(),
            total_tier1,
            total_tier2,
            total_commission: total_tier1 + total_tier2,
        }
    }
}

/// Network-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTotals {
    pub wallets: usize,
    pub initial_capital: Amount,
    pub final_capital: Amount,
    pub base_profit: Amount,
    pub commission: Amount,
}

/// Everything a presentation layer needs after one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub cycles: u32,
    pub results: Vec<SimulationResult>,
    pub wallets: Vec<WalletSummary>,
    pub totals: NetworkTotals,
}

impl SimulationReport {
    pub fn new(cycles: u32, results: Vec<SimulationResult>) -> Self {
        let wallets: Vec<WalletSummary> = results.iter().map(WalletSummary::from_result).collect();
        let totals = NetworkTotals {
            wallets: wallets.len(),
            initial_capital: wallets.iter().map(|w| w.initial_value).sum(),
            final_capital: wallets.iter().map(|w| w.final_balance).sum(),
            base_profit: wallets.iter().map(|w| w.total_base_profit).sum(),
            commission: wallets.iter().map(|w| w.total_commission).sum(),
        };
        Self { cycles, results, wallets, totals }
    }

    pub fn result_for(&self, id: WalletId) -> Option<&SimulationResult> {
        self.results.iter().find(|r| r.wallet.id == id)
    }

    pub fn summary_for(&self, id: WalletId) -> Option<&WalletSummary> {
        self.wallets.iter().find(|w| w.wallet_id == id)
    }

    /// Wallets ordered by total commission, highest first.
    pub fn top_earners(&self) -> Vec<&WalletSummary> {
        let mut ranked: Vec<&WalletSummary> = self.wallets.iter().collect();
        ranked.sort_by(|a, b| b.total_commission.cmp(&a.total_commission));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulate;
    use crate::types::Wallet;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn report() -> SimulationReport {
        let wallets = vec![
            Wallet::new(1, "a", dec!(1000)),
            Wallet::new(2, "b", dec!(500)).with_sources([1u64]),
        ];
        let results = simulate(&wallets, dec!(24), 2, &HashMap::new(), &HashMap::new());
        SimulationReport::new(2, results)
    }

    #[test]
    fn wallet_totals_sum_the_series() {
        let r = report();
        let a = r.summary_for(WalletId(1)).expect("test: wallet a");
        assert_eq!(a.final_balance, Amount(dec!(1537.6)));
        assert_eq!(a.total_base_profit, Amount(dec!(537.6)));
        assert_eq!(a.total_commission, Amount::zero());

        let b = r.summary_for(WalletId(2)).expect("test: wallet b");
        assert_eq!(b.total_tier1, Amount(dec!(107.52)));
        assert_eq!(b.total_commission, Amount(dec!(107.52)));
    }

    #[test]
    fn network_totals_cover_all_wallets() {
        let r = report();
        assert_eq!(r.totals.wallets, 2);
        assert_eq!(r.totals.initial_capital, Amount(dec!(1500)));
        // 1537.6 + 768.8
        assert_eq!(r.totals.final_capital, Amount(dec!(2306.4)));
        assert_eq!(r.totals.commission, Amount(dec!(107.52)));
    }

    #[test]
    fn top_earners_ranks_by_commission() {
        let r = report();
        let ids: Vec<_> = r.top_earners().iter().map(|w| w.wallet_id).collect();
        assert_eq!(ids, vec![WalletId(2), WalletId(1)]);
    }
}
