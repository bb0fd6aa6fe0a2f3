// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Referral Graph

//! Index-based view of the referral edges of a wallet list.
//!
//! Built once per run so the per-cycle commission pass walks adjacency
//! lists instead of rescanning every wallet's `sources` for every pair.

use std::collections::HashMap;

use crate::types::{Wallet, WalletId};

/// Adjacency over wallet indices (positions in the input slice).
///
/// `children[p]` are the wallets `p` referred; `parents[c]` are the wallets
/// that list `c` among their sources. Self references and ids that resolve
/// to no wallet are dropped. When an id appears twice in the input, the
/// first wallet carrying it owns the id.
#[derive(Debug, Clone, Default)]
pub struct ReferralGraph {
    index: HashMap<WalletId, usize>,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
}

impl ReferralGraph {
    pub fn build(wallets: &[Wallet]) -> Self {
        let mut index = HashMap::with_capacity(wallets.len());
        for (i, w) in wallets.iter().enumerate() {
            index.entry(w.id).or_insert(i);
        }

        let mut children = vec![Vec::new(); wallets.len()];
        let mut parents = vec![Vec::new(); wallets.len()];
        for (p, w) in wallets.iter().enumerate() {
            for source in &w.sources {
                let Some(&c) = index.get(source) else { continue };
                if c == p || children[p].contains(&c) {
                    continue;
                }
                children[p].push(c);
                parents[c].push(p);
            }
        }

        Self { index, children, parents }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn index_of(&self, id: WalletId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        self.children.get(idx).map_or(&[], Vec::as_slice)
    }

    pub fn parents(&self, idx: usize) -> &[usize] {
        self.parents.get(idx).map_or(&[], Vec::as_slice)
    }

    pub fn edge_count(&self) -> usize {
        self.children.iter().map(Vec::len).sum()
    }

    /// Whether `to` can be reached from `from` by following referral edges.
    pub fn reaches(&self, from: usize, to: usize) -> bool {
        let mut seen = vec![false; self.len()];
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if std::mem::replace(&mut seen[node], true) {
                continue;
            }
            stack.extend(self.children(node).iter().copied().filter(|&c| !seen[c]));
        }
        false
    }

    /// First referral loop found, as wallet indices in edge order.
    ///
    /// Iterative three-colour DFS; the returned path starts and ends on the
    /// same index.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark { White, Grey, Black }

        let n = self.len();
        let mut mark = vec![Mark::White; n];
        let mut via = vec![usize::MAX; n];

        for root in 0..n {
            if mark[root] != Mark::White {
                continue;
            }
            // (node, next child position)
            let mut stack = vec![(root, 0usize)];
            mark[root] = Mark::Grey;
            while let Some(top) = stack.last_mut() {
                let node = top.0;
                if let Some(&child) = self.children[node].get(top.1) {
                    top.1 += 1;
                    match mark[child] {
                        Mark::White => {
                            mark[child] = Mark::Grey;
                            via[child] = node;
                            stack.push((child, 0));
                        }
                        Mark::Grey => {
                            let mut path = vec![child, node];
                            let mut cur = node;
                            while cur != child {
                                cur = via[cur];
                                path.push(cur);
                            }
                            path.reverse();
                            return Some(path);
                        }
                        Mark::Black => {}
                    }
                } else {
                    mark[node] = Mark::Black;
                    stack.pop();
                }
            }
        }
        None
    }
}
