// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Wallet Registry

//! Editable wallet list with referral links.
//!
//! The book owns id assignment and keeps the referral edges consistent:
//! no self links, no duplicates, no dangling ids after a removal, and no
//! loops unless the cycle policy allows them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CyclePolicy;
use crate::graph::ReferralGraph;
use crate::types::{Amount, Wallet, WalletId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("unknown wallet {0}")]
    UnknownWallet(WalletId),

    #[error("wallet {0} cannot refer itself")]
    SelfReferral(WalletId),

    #[error("linking {referrer} -> {referred} would close a referral loop")]
    ReferralCycle { referrer: WalletId, referred: WalletId },

    #[error("wallet name must not be empty")]
    EmptyName,

    #[error("a wallet named {0:?} already exists")]
    DuplicateName(String),

    #[error("initial value must not be negative, got {0}")]
    NegativeInitialValue(Amount),
}

// ---------------------------------------------------------------------------
// WalletBook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletBook {
    wallets: Vec<Wallet>,
    next_id: u64,
    #[serde(default)]
    policy: CyclePolicy,
}

impl WalletBook {
    pub fn new(policy: CyclePolicy) -> Self {
        Self { wallets: Vec::new(), next_id: 1, policy }
    }

    /// Adopt an existing wallet list (e.g. from a snapshot). Ids are kept;
    /// new wallets get ids above the highest one seen.
    pub fn from_wallets(wallets: Vec<Wallet>, policy: CyclePolicy) -> Self {
        let next_id = wallets.iter().map(|w| w.id.0).max().map_or(1, |m| m + 1);
        Self { wallets, next_id, policy }
    }

    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CyclePolicy) {
        self.policy = policy;
    }

    pub fn add_wallet(&mut self, name: &str, initial_value: Decimal) -> Result<WalletId, WalletError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WalletError::EmptyName);
        }
        let initial = Amount(initial_value);
        if initial.is_negative() {
            return Err(WalletError::NegativeInitialValue(initial));
        }
        if self.wallets.iter().any(|w| w.name == name) {
            tracing::warn!(name, "rejected duplicate wallet name");
            return Err(WalletError::DuplicateName(name.to_string()));
        }

        let id = WalletId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.wallets.push(Wallet::new(id.0, name, initial_value));
        tracing::debug!(%id, name, %initial, "wallet added");
        Ok(id)
    }

    /// Remove a wallet and every referral edge pointing at it.
    pub fn remove_wallet(&mut self, id: WalletId) -> Result<Wallet, WalletError> {
        let pos = self.position(id)?;
        let removed = self.wallets.remove(pos);
        for w in &mut self.wallets {
            w.remove_source(id);
        }
        tracing::debug!(%id, "wallet removed");
        Ok(removed)
    }

    /// Record that `source` referred `target`. Linking twice is a no-op.
    pub fn link(&mut self, source: WalletId, target: WalletId) -> Result<(), WalletError> {
        if source == target {
            return Err(WalletError::SelfReferral(source));
        }
        let src = self.position(source)?;
        let dst = self.position(target)?;
        if self.wallets[src].refers(target) {
            return Ok(());
        }
        if self.policy == CyclePolicy::Reject {
            // the new edge closes a loop iff target already reaches source
            let graph = ReferralGraph::build(&self.wallets);
            if graph.reaches(dst, src) {
                tracing::warn!(%source, %target, "rejected referral link closing a loop");
                return Err(WalletError::ReferralCycle { referrer: source, referred: target });
            }
        }
        self.wallets[src].add_source(target);
        Ok(())
    }

    pub fn unlink(&mut self, source: WalletId, target: WalletId) -> Result<bool, WalletError> {
        let src = self.position(source)?;
        Ok(self.wallets[src].remove_source(target))
    }

    pub fn get(&self, id: WalletId) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    /// Wallets that list `id` among their sources.
    pub fn referrers_of(&self, id: WalletId) -> impl Iterator<Item = &Wallet> {
        self.wallets.iter().filter(move |w| w.refers(id))
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn contains(&self, id: WalletId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn clear(&mut self) {
        self.wallets.clear();
        self.next_id = 1;
    }

    fn position(&self, id: WalletId) -> Result<usize, WalletError> {
        self.wallets
            .iter()
            .position(|w| w.id == id)
            .ok_or(WalletError::UnknownWallet(id))
    }
}
