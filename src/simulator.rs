// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Simulator Session

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use crate::config::{CommissionMode, SimulationConfig, SimulationLimits};
use crate::engine::CycleEngine;
use crate::movements::{MovementError, MovementSchedule};
use crate::repository::{RepositoryError, WalletSnapshot};
use crate::summary::SimulationReport;
use crate::types::{Movement, MovementKind, WalletId};
use crate::validation::{validate_input, InputError};
use crate::wallets::{WalletBook, WalletError};

// ─── ReferralSimulator struct ───────────────────────────────────────────────

/// Editable session state behind the browser UI: the wallet book, the
/// movement schedule and the run parameters, plus the last report.
#[wasm_bindgen]
pub struct ReferralSimulator {
    pub(crate) book: WalletBook,
    pub(crate) schedule: MovementSchedule,
    pub(crate) config: SimulationConfig,
    pub(crate) last_report: Option<SimulationReport>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Movement(#[from] MovementError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// ─── Internal Logic (Testable, pure Rust) ───────────────────────────────────

impl Default for ReferralSimulator {
    fn default() -> Self {
        Self::with_config(SimulationConfig::default())
    }
}

impl ReferralSimulator {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            book: WalletBook::new(config.cycle_policy),
            schedule: MovementSchedule::new(),
            config,
            last_report: None,
        }
    }

    /// Session from a stored snapshot. The snapshot's own limits are
    /// discarded in favour of the defaults.
    pub fn from_snapshot(snapshot: WalletSnapshot) -> Self {
        Self::from_snapshot_with_limits(snapshot, SimulationLimits::default())
    }

    fn from_snapshot_with_limits(snapshot: WalletSnapshot, limits: SimulationLimits) -> Self {
        let (book, schedule, mut config) = snapshot.restore();
        if config.limits != limits {
            tracing::warn!(?limits, imported = ?config.limits, "ignoring snapshot limits");
        }
        config.limits = limits;
        Self { book, schedule, config, last_report: None }
    }

    /// Replace the session with `snapshot`, keeping this session's limits.
    pub fn import_core(&mut self, snapshot: WalletSnapshot) {
        *self = Self::from_snapshot_with_limits(snapshot, self.config.limits);
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot::capture(&self.book, &self.schedule, &self.config)
    }

    pub fn book(&self) -> &WalletBook {
        &self.book
    }

    pub fn schedule(&self) -> &MovementSchedule {
        &self.schedule
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn last_report(&self) -> Option<&SimulationReport> {
        self.last_report.as_ref()
    }

    pub fn add_wallet_core(&mut self, name: &str, initial_value: Decimal) -> Result<WalletId, SessionError> {
        Ok(self.book.add_wallet(name, initial_value)?)
    }

    pub fn remove_wallet_core(&mut self, id: WalletId) -> Result<(), SessionError> {
        self.book.remove_wallet(id)?;
        self.schedule.remove_wallet(id);
        Ok(())
    }

    pub fn schedule_core(
        &mut self,
        id: WalletId,
        kind: MovementKind,
        cycle: u32,
        amount: Decimal,
    ) -> Result<(), SessionError> {
        if !self.book.contains(id) {
            return Err(MovementError::UnknownWallet(id).into());
        }
        self.schedule.schedule(id, kind, Movement::new(cycle, amount))?;
        Ok(())
    }

    pub fn set_commission_mode(&mut self, mode: CommissionMode) {
        self.config.commission_mode = mode;
    }

    /// Validate the current session and run the engine over it.
    pub fn run_core(&mut self) -> Result<&SimulationReport, SessionError> {
        validate_input(self.book.wallets(), &self.schedule, &self.config)?;
        let results = CycleEngine::new(&self.config).run(self.book.wallets(), &self.schedule);
        let report = SimulationReport::new(self.config.cycles, results);
        tracing::info!(
            wallets = report.totals.wallets,
            cycles = report.cycles,
            commission = %report.totals.commission,
            "simulation finished"
        );
        Ok(self.last_report.insert(report))
    }

    pub fn reset_core(&mut self) {
        *self = Self::with_config(self.config.clone());
    }
}
