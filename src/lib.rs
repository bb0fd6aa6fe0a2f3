// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite

pub mod types;
pub mod config;
pub mod graph;
pub mod movements;
pub mod engine;
pub mod wallets;
pub mod validation;
pub mod summary;
pub mod repository;
pub mod simulator;
pub mod adapter;

pub use types::*;
pub use config::{CommissionMode, CyclePolicy, SimulationConfig, SimulationLimits};
pub use engine::{simulate, CycleEngine};
pub use movements::{MovementError, MovementSchedule};
pub use repository::{InMemoryRepository, JsonFileRepository, RepositoryError, WalletRepository, WalletSnapshot};
pub use simulator::{ReferralSimulator, SessionError};
pub use summary::{NetworkTotals, SimulationReport, WalletSummary};
pub use validation::{validate_input, GraphAnomaly, InputError};
pub use wallets::{WalletBook, WalletError};

use wasm_bindgen::prelude::*;

use crate::adapter::{to_decimal, ReportView, WalletSeriesView};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Log a rejected call to the browser console and hand the message back as a JS error.
fn reject(op: &str, err: impl std::fmt::Display) -> JsValue {
    let msg = format!("{op}: {err}");
    #[cfg(target_arch = "wasm32")]
    log(&msg);
    tracing::warn!(op, error = %err, "call rejected");
    JsValue::from_str(&msg)
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ReferralSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::default()
    }

    pub fn add_wallet(&mut self, name: &str, initial_value: f64) -> Result<u64, JsValue> {
        let value = to_decimal("initial_value", initial_value).map_err(|e| reject("add_wallet", e))?;
        self.add_wallet_core(name, value)
            .map(|id| id.0)
            .map_err(|e| reject("add_wallet", e))
    }

    pub fn remove_wallet(&mut self, id: u64) -> Result<(), JsValue> {
        self.remove_wallet_core(WalletId(id)).map_err(|e| reject("remove_wallet", e))
    }

    /// `source` refers `target`: commission flows from target's profit to source.
    pub fn link_wallets(&mut self, source: u64, target: u64) -> Result<(), JsValue> {
        self.book
            .link(WalletId(source), WalletId(target))
            .map_err(|e| reject("link_wallets", e))
    }

    pub fn unlink_wallets(&mut self, source: u64, target: u64) -> Result<bool, JsValue> {
        self.book
            .unlink(WalletId(source), WalletId(target))
            .map_err(|e| reject("unlink_wallets", e))
    }

    pub fn schedule_deposit(&mut self, wallet: u64, cycle: u32, amount: f64) -> Result<(), JsValue> {
        let amount = to_decimal("amount", amount).map_err(|e| reject("schedule_deposit", e))?;
        self.schedule_core(WalletId(wallet), MovementKind::Deposit, cycle, amount)
            .map_err(|e| reject("schedule_deposit", e))
    }

    pub fn schedule_withdrawal(&mut self, wallet: u64, cycle: u32, amount: f64) -> Result<(), JsValue> {
        let amount = to_decimal("amount", amount).map_err(|e| reject("schedule_withdrawal", e))?;
        self.schedule_core(WalletId(wallet), MovementKind::Withdrawal, cycle, amount)
            .map_err(|e| reject("schedule_withdrawal", e))
    }

    pub fn set_rate_pct(&mut self, rate_pct: f64) -> Result<(), JsValue> {
        self.config.rate_pct = to_decimal("rate_pct", rate_pct).map_err(|e| reject("set_rate_pct", e))?;
        Ok(())
    }

    pub fn set_cycles(&mut self, cycles: u32) {
        self.config.cycles = cycles;
    }

    pub fn set_compound_commissions(&mut self, enabled: bool) {
        self.set_commission_mode(if enabled { CommissionMode::Compound } else { CommissionMode::Reporting });
    }

    pub fn set_allow_referral_loops(&mut self, allowed: bool) {
        let policy = if allowed { CyclePolicy::Allow } else { CyclePolicy::Reject };
        self.config.cycle_policy = policy;
        self.book.set_policy(policy);
    }

    pub fn simulate(&mut self) -> Result<JsValue, JsValue> {
        let report = self.run_core().map_err(|e| reject("simulate", e))?;
        serde_wasm_bindgen::to_value(&ReportView::from(&*report)).map_err(|e| reject("simulate", e))
    }

    pub fn get_wallets(&self) -> JsValue {
        let wallets: Vec<WalletSeriesView> = self
            .book
            .wallets()
            .iter()
            .map(|w| WalletSeriesView::from(&SimulationResult {
                wallet: w.clone(),
                series: WalletSeries::seeded(w.initial_value, 1),
            }))
            .collect();
        serde_wasm_bindgen::to_value(&wallets).unwrap_or(JsValue::NULL)
    }

    pub fn export_snapshot(&self) -> Result<String, JsValue> {
        self.snapshot().to_json().map_err(|e| reject("export_snapshot", e))
    }

    pub fn import_snapshot(&mut self, json: &str) -> Result<(), JsValue> {
        let snapshot = WalletSnapshot::from_json(json).map_err(|e| reject("import_snapshot", e))?;
        self.import_core(snapshot);
        Ok(())
    }

    /// Drop all wallets, movements and the last report; run parameters stay.
    pub fn reset(&mut self) {
        self.reset_core();
    }
}
