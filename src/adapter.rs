//! Adapter layer: converts between the JavaScript f64 world and the engine's Decimal types.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::summary::{NetworkTotals, SimulationReport, WalletSummary};
use crate::types::{Amount, SimulationResult};
use crate::validation::{ensure_finite, InputError};

/// Convert a finite f64 to Decimal, rejecting NaN, infinities and values
/// outside Decimal's range.
pub fn to_decimal(field: &'static str, v: f64) -> Result<Decimal, InputError> {
    let v = ensure_finite(field, v)?;
    Decimal::from_f64(v).ok_or(InputError::NonFinite { field })
}

/// Convert Decimal to f64 (lossy, for charts and tables only).
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn amounts_to_f64(values: &[Amount]) -> Vec<f64> {
    values.iter().map(|a| from_decimal(a.0)).collect()
}

// ---------------------------------------------------------------------------
// Chart views
// ---------------------------------------------------------------------------

/// One wallet's series as plain numbers.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSeriesView {
    pub id: u64,
    pub name: String,
    pub sources: Vec<u64>,
    pub balance: Vec<f64>,
    pub base_profit: Vec<f64>,
    pub tier1_commission: Vec<f64>,
    pub tier2_commission: Vec<f64>,
}

impl From<&SimulationResult> for WalletSeriesView {
    fn from(r: &SimulationResult) -> Self {
        Self {
            id: r.wallet.id.0,
            name: r.wallet.name.clone(),
            sources: r.wallet.sources.iter().map(|s| s.0).collect(),
            balance: amounts_to_f64(&r.series.balance),
            base_profit: amounts_to_f64(&r.series.base_profit),
            tier1_commission: amounts_to_f64(&r.series.tier1_commission),
            tier2_commission: amounts_to_f64(&r.series.tier2_commission),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletSummaryView {
    pub id: u64,
    pub name: String,
    pub final_balance: f64,
    pub total_base_profit: f64,
    pub total_tier1: f64,
    pub total_tier2: f64,
    pub total_commission: f64,
}

impl From<&WalletSummary> for WalletSummaryView {
    fn from(s: &WalletSummary) -> Self {
        Self {
            id: s.wallet_id.0,
            name: s.name.clone(),
            final_balance: from_decimal(s.final_balance.0),
            total_base_profit: from_decimal(s.total_base_profit.0),
            total_tier1: from_decimal(s.total_tier1.0),
            total_tier2: from_decimal(s.total_tier2.0),
            total_commission: from_decimal(s.total_commission.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub wallets: usize,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub base_profit: f64,
    pub commission: f64,
}

impl From<&NetworkTotals> for TotalsView {
    fn from(t: &NetworkTotals) -> Self {
        Self {
            wallets: t.wallets,
            initial_capital: from_decimal(t.initial_capital.0),
            final_capital: from_decimal(t.final_capital.0),
            base_profit: from_decimal(t.base_profit.0),
            commission: from_decimal(t.commission.0),
        }
    }
}

/// What `ReferralSimulator::simulate` hands to JavaScript.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub cycles: u32,
    pub series: Vec<WalletSeriesView>,
    pub summary: Vec<WalletSummaryView>,
    pub totals: TotalsView,
}

impl From<&SimulationReport> for ReportView {
    fn from(r: &SimulationReport) -> Self {
        Self {
            cycles: r.cycles,
            series: r.results.iter().map(WalletSeriesView::from).collect(),
            summary: r.wallets.iter().map(WalletSummaryView::from).collect(),
            totals: TotalsView::from(&r.totals),
        }
    }
}
