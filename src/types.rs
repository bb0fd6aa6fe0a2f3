// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Type Definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// ---------------------------------------------------------------------------
// WalletId
// ---------------------------------------------------------------------------

/// Unique wallet identifier within one referral network
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct WalletId(pub u64);

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for WalletId {
    fn from(v: u64) -> Self { WalletId(v) }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Monetary amount backed by `rust_decimal::Decimal`.
///
/// Profit on a negative rate is negative, so the type itself is signed; the
/// engine is what keeps balances on a zero floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(pub Decimal);

impl Amount {
    /// Zero value
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create from a `Decimal` value
    pub fn from_decimal(d: Decimal) -> Self {
        Self(d)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Clamp to the non-negative range.
    pub fn floor_zero(self) -> Self {
        if self.is_negative() { Self::zero() } else { self }
    }

    /// Multiply by a plain ratio, saturating at `Decimal::MAX` instead of
    /// panicking on overflow.
    pub fn scale(self, ratio: Decimal) -> Self {
        Self(self.0.saturating_mul(ratio))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<Decimal> for Amount {
    type Output = Self;
    fn mul(self, rhs: Decimal) -> Self::Output {
        self.scale(rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.round_dp(2))
    }
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// A node in the referral graph.
///
/// `sources` lists the wallets this wallet referred (its direct downline).
/// The profit of each of them pays tier-1 commission to this wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
    pub initial_value: Amount,
    #[serde(default)]
    pub sources: Vec<WalletId>,
}

impl Wallet {
    pub fn new(id: u64, name: impl Into<String>, initial_value: Decimal) -> Self {
        Self {
            id: WalletId(id),
            name: name.into(),
            initial_value: Amount(initial_value),
            sources: Vec::new(),
        }
    }

    /// Builder-style referral list. Self references are dropped and
    /// duplicates collapse onto their first occurrence.
    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<WalletId>,
    {
        for source in sources {
            self.add_source(source.into());
        }
        self
    }

    /// Add one referral. Returns `false` if the id was ignored.
    pub fn add_source(&mut self, source: WalletId) -> bool {
        if source == self.id || self.sources.contains(&source) {
            return false;
        }
        self.sources.push(source);
        true
    }

    pub fn remove_source(&mut self, source: WalletId) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| *s != source);
        before != self.sources.len()
    }

    pub fn refers(&self, other: WalletId) -> bool {
        self.sources.contains(&other)
    }
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// Direction of a scheduled movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

/// A deposit or withdrawal applied at the start of `cycle` (1-based).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movement {
    pub cycle: u32,
    pub amount: Amount,
}

impl Movement {
    pub fn new(cycle: u32, amount: Decimal) -> Self {
        Self { cycle, amount: Amount(amount) }
    }
}

/// A movement bound to its wallet, as stored in snapshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledMovement {
    pub wallet_id: WalletId,
    pub kind: MovementKind,
    pub cycle: u32,
    pub amount: Amount,
}

// ---------------------------------------------------------------------------
// Simulation output
// ---------------------------------------------------------------------------

/// Parallel per-cycle series for one wallet, indexed `0..=cycles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSeries {
    pub balance: Vec<Amount>,
    pub base_profit: Vec<Amount>,
    pub tier1_commission: Vec<Amount>,
    pub tier2_commission: Vec<Amount>,
}

impl WalletSeries {
    /// Series holding only the pre-simulation state.
    pub fn seeded(initial_value: Amount, capacity: usize) -> Self {
        let mut series = Self {
            balance: Vec::with_capacity(capacity),
            base_profit: Vec::with_capacity(capacity),
            tier1_commission: Vec::with_capacity(capacity),
            tier2_commission: Vec::with_capacity(capacity),
        };
        series.push(initial_value, Amount::zero(), Amount::zero(), Amount::zero());
        series
    }

    pub fn push(&mut self, balance: Amount, base_profit: Amount, tier1: Amount, tier2: Amount) {
        self.balance.push(balance);
        self.base_profit.push(base_profit);
        self.tier1_commission.push(tier1);
        self.tier2_commission.push(tier2);
    }

    /// Number of recorded points (`cycles + 1`).
    pub fn len(&self) -> usize {
        self.balance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balance.is_empty()
    }

    pub fn final_balance(&self) -> Amount {
        self.balance.last().copied().unwrap_or_default()
    }

    /// Tier-1 plus tier-2 commission earned in `cycle`.
    pub fn commission_at(&self, cycle: usize) -> Amount {
        let t1 = self.tier1_commission.get(cycle).copied().unwrap_or_default();
        let t2 = self.tier2_commission.get(cycle).copied().unwrap_or_default();
        t1 + t2
    }
}

/// A wallet together with its simulated series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub series: WalletSeries,
}
