// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Scheduled Movements

//! Deposits and withdrawals keyed by `(wallet, cycle)`.
//!
//! Amounts scheduled for the same wallet and cycle accumulate into one
//! total per direction, so the engine does a single lookup per wallet per
//! cycle no matter how many movements were entered.

use std::collections::HashMap;

use crate::types::{Amount, Movement, MovementKind, ScheduledMovement, WalletId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    #[error("movement amount must be positive, got {0}")]
    NonPositiveAmount(Amount),

    #[error("movement cycle must be at least 1, got {0}")]
    CycleOutOfRange(u32),

    #[error("unknown wallet {0}")]
    UnknownWallet(WalletId),
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Accumulated deposit and withdrawal totals for one wallet in one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementTotals {
    pub deposits: Amount,
    pub withdrawals: Amount,
}

impl MovementTotals {
    pub fn net(&self) -> Amount {
        self.deposits - self.withdrawals
    }
}

// ---------------------------------------------------------------------------
// MovementSchedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MovementSchedule {
    totals: HashMap<(WalletId, u32), MovementTotals>,
    entries: Vec<ScheduledMovement>,
}

impl MovementSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the per-wallet lists a host keeps, without validation.
    ///
    /// Entries for cycle 0 are kept but can never be applied, since the
    /// engine starts at cycle 1.
    pub fn from_maps(
        withdrawals: &HashMap<WalletId, Vec<Movement>>,
        deposits: &HashMap<WalletId, Vec<Movement>>,
    ) -> Self {
        let mut schedule = Self::new();
        for (kind, map) in [(MovementKind::Withdrawal, withdrawals), (MovementKind::Deposit, deposits)] {
            for (&wallet_id, list) in map {
                for m in list {
                    schedule.insert(ScheduledMovement {
                        wallet_id,
                        kind,
                        cycle: m.cycle,
                        amount: m.amount,
                    });
                }
            }
        }
        schedule
    }

    /// Rebuild from stored entries, skipping nothing.
    pub fn from_entries<I: IntoIterator<Item = ScheduledMovement>>(entries: I) -> Self {
        let mut schedule = Self::new();
        for entry in entries {
            schedule.insert(entry);
        }
        schedule
    }

    /// Validated insert used by interactive callers.
    pub fn schedule(
        &mut self,
        wallet_id: WalletId,
        kind: MovementKind,
        movement: Movement,
    ) -> Result<(), MovementError> {
        check_movement(&movement)?;
        self.insert(ScheduledMovement {
            wallet_id,
            kind,
            cycle: movement.cycle,
            amount: movement.amount,
        });
        Ok(())
    }

    pub fn schedule_deposit(&mut self, wallet_id: WalletId, movement: Movement) -> Result<(), MovementError> {
        self.schedule(wallet_id, MovementKind::Deposit, movement)
    }

    pub fn schedule_withdrawal(&mut self, wallet_id: WalletId, movement: Movement) -> Result<(), MovementError> {
        self.schedule(wallet_id, MovementKind::Withdrawal, movement)
    }

    fn insert(&mut self, entry: ScheduledMovement) {
        let totals = self.totals.entry((entry.wallet_id, entry.cycle)).or_default();
        match entry.kind {
            MovementKind::Deposit => totals.deposits += entry.amount,
            MovementKind::Withdrawal => totals.withdrawals += entry.amount,
        }
        self.entries.push(entry);
    }

    /// Totals for `wallet_id` in `cycle`; zero when nothing is scheduled.
    pub fn totals(&self, wallet_id: WalletId, cycle: u32) -> MovementTotals {
        self.totals.get(&(wallet_id, cycle)).copied().unwrap_or_default()
    }

    /// Drop every movement of one wallet (used when the wallet is removed).
    pub fn remove_wallet(&mut self, wallet_id: WalletId) {
        self.totals.retain(|(w, _), _| *w != wallet_id);
        self.entries.retain(|e| e.wallet_id != wallet_id);
    }

    /// Movements in insertion order.
    pub fn entries(&self) -> &[ScheduledMovement] {
        &self.entries
    }

    pub fn for_wallet(&self, wallet_id: WalletId) -> impl Iterator<Item = &ScheduledMovement> {
        self.entries.iter().filter(move |e| e.wallet_id == wallet_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest cycle any movement targets.
    pub fn last_cycle(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.cycle).max()
    }
}

/// Reject non-positive amounts and cycle 0.
pub fn check_movement(movement: &Movement) -> Result<(), MovementError> {
    if movement.cycle == 0 {
        return Err(MovementError::CycleOutOfRange(movement.cycle));
    }
    if movement.amount.is_negative() || movement.amount.is_zero() {
        return Err(MovementError::NonPositiveAmount(movement.amount));
    }
    Ok(())
}
