// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Simulation Parameters

//! Run parameters for the cycle engine.
//!
//! Every field has a default, so a partial JSON document only overrides what
//! it names.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Share of a direct referral's base profit paid to its referrer.
pub const TIER1_SHARE: Decimal = dec!(0.20);
/// Share of a second-level referral's base profit paid to the referrer's referrer.
pub const TIER2_SHARE: Decimal = dec!(0.10);

pub const DEFAULT_RATE_PCT: Decimal = dec!(24);
pub const DEFAULT_CYCLES: u32 = 12;

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What happens to commission once it is earned.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommissionMode {
    /// Recorded in the commission series only; balances never see it.
    #[default]
    Reporting,
    /// Added to the earner's balance at the end of the cycle it was earned in.
    Compound,
}

/// How referral cycles (A refers B ... refers A) are treated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Links that close a loop are refused and validation fails on loops.
    #[default]
    Reject,
    /// Loops are kept; commission is paid along every matching pattern.
    Allow,
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Upper bounds checked by validation before a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationLimits {
    pub max_cycles: u32,
    pub max_wallets: usize,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_cycles: 600,
            max_wallets: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Yield per cycle in percent (24 means 24%).
    pub rate_pct: Decimal,
    pub cycles: u32,
    pub tier1_share: Decimal,
    pub tier2_share: Decimal,
    pub commission_mode: CommissionMode,
    pub cycle_policy: CyclePolicy,
    pub limits: SimulationLimits,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rate_pct: DEFAULT_RATE_PCT,
            cycles: DEFAULT_CYCLES,
            tier1_share: TIER1_SHARE,
            tier2_share: TIER2_SHARE,
            commission_mode: CommissionMode::default(),
            cycle_policy: CyclePolicy::default(),
            limits: SimulationLimits::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_rate_pct(mut self, rate_pct: Decimal) -> Self {
        self.rate_pct = rate_pct;
        self
    }

    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_commission_mode(mut self, mode: CommissionMode) -> Self {
        self.commission_mode = mode;
        self
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    /// Per-cycle yield as a fraction (`rate_pct / 100`).
    pub fn rate(&self) -> Decimal {
        self.rate_pct / dec!(100)
    }
}
