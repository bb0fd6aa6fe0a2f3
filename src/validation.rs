// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Input Validation

//! Pre-flight checks for one engine run.
//!
//! The engine trusts its input; anything reaching it from a form, a file or
//! JavaScript goes through [`validate_input`] first.

use std::collections::HashSet;

use crate::config::{CyclePolicy, SimulationConfig};
use crate::graph::ReferralGraph;
use crate::movements::{check_movement, MovementError, MovementSchedule};
use crate::types::{Amount, Movement, Wallet, WalletId};

/// Referral graph shapes the engine would pay through but a caller may
/// want to refuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphAnomaly {
    #[error("wallet {0} lists itself as a source")]
    SelfReferral(WalletId),

    #[error("wallet {wallet} lists unknown source {missing}")]
    UnknownSource { wallet: WalletId, missing: WalletId },

    #[error("referral loop through {}", format_path(.0))]
    Cycle(Vec<WalletId>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("{requested} cycles exceeds the limit of {max}")]
    TooManyCycles { requested: u32, max: u32 },

    #[error("{count} wallets exceeds the limit of {max}")]
    TooManyWallets { count: usize, max: usize },

    #[error("wallet id {0} is used more than once")]
    DuplicateWalletId(WalletId),

    #[error("wallet {wallet} has a negative initial value {value}")]
    NegativeInitialValue { wallet: WalletId, value: Amount },

    #[error("invalid movement for wallet {wallet}: {reason}")]
    InvalidMovement { wallet: WalletId, reason: MovementError },

    #[error("referral graph: {0}")]
    Graph(#[from] GraphAnomaly),
}

fn format_path(path: &[WalletId]) -> String {
    path.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> ")
}

/// Check wallets, parameters and movements against `config`.
///
/// Any decimal rate is accepted, negative ones included; the engine floors
/// balances at zero.
pub fn validate_input(
    wallets: &[Wallet],
    schedule: &MovementSchedule,
    config: &SimulationConfig,
) -> Result<(), InputError> {
    if config.cycles > config.limits.max_cycles {
        return Err(InputError::TooManyCycles {
            requested: config.cycles,
            max: config.limits.max_cycles,
        });
    }
    if wallets.len() > config.limits.max_wallets {
        return Err(InputError::TooManyWallets {
            count: wallets.len(),
            max: config.limits.max_wallets,
        });
    }

    let mut seen = HashSet::with_capacity(wallets.len());
    for w in wallets {
        if !seen.insert(w.id) {
            return Err(InputError::DuplicateWalletId(w.id));
        }
        if w.initial_value.is_negative() {
            return Err(InputError::NegativeInitialValue { wallet: w.id, value: w.initial_value });
        }
    }

    for w in wallets {
        for &source in &w.sources {
            if source == w.id {
                return Err(GraphAnomaly::SelfReferral(w.id).into());
            }
            if !seen.contains(&source) {
                return Err(GraphAnomaly::UnknownSource { wallet: w.id, missing: source }.into());
            }
        }
    }

    for entry in schedule.entries() {
        if !seen.contains(&entry.wallet_id) {
            return Err(InputError::InvalidMovement {
                wallet: entry.wallet_id,
                reason: MovementError::UnknownWallet(entry.wallet_id),
            });
        }
        check_movement(&Movement { cycle: entry.cycle, amount: entry.amount }).map_err(|reason| {
            InputError::InvalidMovement { wallet: entry.wallet_id, reason }
        })?;
    }

    if config.cycle_policy == CyclePolicy::Reject {
        let graph = ReferralGraph::build(wallets);
        if let Some(path) = graph.find_cycle() {
            let ids = path.into_iter().map(|i| wallets[i].id).collect();
            return Err(GraphAnomaly::Cycle(ids).into());
        }
    }

    Ok(())
}

/// Reject NaN and infinities coming from a float boundary.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field })
    }
}
