// Random Referral Forests: seedable wallet networks for the scaling runs
// Each wallet either starts a new tree or is referred by an earlier wallet,
// so generated networks never contain referral loops.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use referral_engine::*;
use rust_decimal::Decimal;

/// Chance that a new wallet joins an existing tree instead of starting one.
const REFERRED_PROB: f64 = 0.85;

/// Chance that a wallet gets a scheduled movement in a given cycle.
const MOVEMENT_PROB: f64 = 0.05;

/// Initial capital range in cents.
const INITIAL_CENTS: (i64, i64) = (10_000, 500_000);

pub struct Network {
    pub wallets: Vec<Wallet>,
    pub schedule: MovementSchedule,
    pub edges: usize,
}

pub struct TopologyGenerator {
    rng: ChaCha8Rng,
}

impl TopologyGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    fn cents(&mut self, range: (i64, i64)) -> Decimal {
        Decimal::new(self.rng.gen_range(range.0..range.1), 2)
    }

    /// Build `size` wallets and scatter deposits/withdrawals over `cycles`.
    pub fn generate(&mut self, size: usize, cycles: u32) -> Network {
        let mut wallets: Vec<Wallet> = Vec::with_capacity(size);
        let mut edges = 0;

        for i in 0..size {
            let id = i as u64 + 1;
            let initial = self.cents(INITIAL_CENTS);
            wallets.push(Wallet::new(id, format!("w{id}"), initial));
            if i > 0 && self.rng.gen::<f64>() < REFERRED_PROB {
                let referrer = self.rng.gen_range(0..i);
                if wallets[referrer].add_source(WalletId(id)) {
                    edges += 1;
                }
            }
        }

        let mut schedule = MovementSchedule::new();
        for w in &wallets {
            for cycle in 1..=cycles {
                if self.rng.gen::<f64>() >= MOVEMENT_PROB {
                    continue;
                }
                let amount = self.cents(INITIAL_CENTS);
                let kind = if self.rng.gen_bool(0.5) { MovementKind::Deposit } else { MovementKind::Withdrawal };
                // amounts are positive and cycles in range, so this cannot fail
                if schedule.schedule(w.id, kind, Movement::new(cycle, amount)).is_err() {
                    tracing::warn!(wallet = %w.id, cycle, "generated movement rejected");
                }
            }
        }

        Network { wallets, schedule, edges }
    }
}
