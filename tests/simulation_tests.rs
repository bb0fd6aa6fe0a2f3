#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;
    use referral_engine::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn no_moves() -> HashMap<WalletId, Vec<Movement>> {
        HashMap::new()
    }

    fn amounts(values: &[Decimal]) -> Vec<Amount> {
        values.iter().copied().map(Amount).collect()
    }

    fn series_of(results: &[SimulationResult], id: u64) -> &WalletSeries {
        &results
            .iter()
            .find(|r| r.wallet.id == WalletId(id))
            .expect("test: wallet in results")
            .series
    }

    // ========== Reference Scenarios ==========

    #[test]
    fn test_zero_cycles_is_initial_state_only() {
        let wallets = vec![
            Wallet::new(1, "a", dec!(1000)),
            Wallet::new(2, "b", dec!(500)).with_sources([1u64]),
        ];
        let results = simulate(&wallets, dec!(24), 0, &no_moves(), &no_moves());
        for r in &results {
            assert_eq!(r.series.balance, vec![r.wallet.initial_value]);
            assert_eq!(r.series.base_profit, vec![Amount::zero()]);
            assert_eq!(r.series.tier1_commission, vec![Amount::zero()]);
            assert_eq!(r.series.tier2_commission, vec![Amount::zero()]);
        }
    }

    #[test]
    fn test_isolated_wallet_compounds_yield() {
        let wallets = vec![Wallet::new(1, "a", dec!(1000))];
        let results = simulate(&wallets, dec!(24), 2, &no_moves(), &no_moves());
        let s = series_of(&results, 1);
        assert_eq!(s.balance, amounts(&[dec!(1000), dec!(1240), dec!(1537.6)]));
        assert_eq!(s.base_profit, amounts(&[dec!(0), dec!(240), dec!(297.6)]));
        assert!(s.tier1_commission.iter().all(Amount::is_zero));
        assert!(s.tier2_commission.iter().all(Amount::is_zero));
    }

    #[test]
    fn test_referrer_collects_tier1_only() {
        let wallets = vec![
            Wallet::new(1, "a", dec!(1000)),
            Wallet::new(2, "b", dec!(500)).with_sources([1u64]),
        ];
        let results = simulate(&wallets, dec!(24), 2, &no_moves(), &no_moves());
        let b = series_of(&results, 2);
        assert_eq!(b.tier1_commission, amounts(&[dec!(0), dec!(48), dec!(59.52)]));
        assert!(b.tier2_commission.iter().all(Amount::is_zero));
        // commission never reaches the balance in reporting mode
        assert_eq!(b.balance, amounts(&[dec!(500), dec!(620), dec!(768.8)]));
    }

    #[test]
    fn test_chain_pays_two_tiers_and_stops() {
        // 1 refers 2, 2 refers 3, 3 refers 4
        let wallets = vec![
            Wallet::new(1, "gp", dec!(100)).with_sources([2u64]),
            Wallet::new(2, "p", dec!(100)).with_sources([3u64]),
            Wallet::new(3, "c", dec!(1000)).with_sources([4u64]),
            Wallet::new(4, "gc", dec!(0)),
        ];
        let results = simulate(&wallets, dec!(10), 1, &no_moves(), &no_moves());
        let gp = series_of(&results, 1);
        let p = series_of(&results, 2);
        let c = series_of(&results, 3);

        // c earns 100, p earns 10 and gp earns 10
        assert_eq!(p.tier1_commission[1], Amount(dec!(20)));
        assert_eq!(gp.tier1_commission[1], Amount(dec!(2)));
        assert_eq!(gp.tier2_commission[1], Amount(dec!(10)));
        assert_eq!(p.tier2_commission[1], Amount::zero());
        // gc has no balance, so c collects nothing
        assert_eq!(c.tier1_commission[1], Amount::zero());
    }

    #[test]
    fn test_movement_only_affects_its_cycle_onward() {
        let wallets = vec![Wallet::new(1, "a", dec!(1000))];
        let plain = simulate(&wallets, dec!(24), 3, &no_moves(), &no_moves());
        let mut deposits = HashMap::new();
        deposits.insert(WalletId(1), vec![Movement::new(2, dec!(100))]);
        let moved = simulate(&wallets, dec!(24), 3, &no_moves(), &deposits);

        let before = series_of(&plain, 1);
        let after = series_of(&moved, 1);
        assert_eq!(before.base_profit[..2], after.base_profit[..2]);
        assert_eq!(after.base_profit[2], Amount(dec!(321.6))); // (1240 + 100) * 0.24
    }

    #[test]
    fn test_oversized_withdrawal_clamps_to_zero() {
        let wallets = vec![Wallet::new(1, "a", dec!(100))];
        let mut withdrawals = HashMap::new();
        withdrawals.insert(WalletId(1), vec![Movement::new(1, dec!(5000))]);
        let results = simulate(&wallets, dec!(24), 2, &withdrawals, &no_moves());
        let s = series_of(&results, 1);
        assert_eq!(s.balance, amounts(&[dec!(100), dec!(0), dec!(0)]));
        assert_eq!(s.base_profit[1], Amount::zero());
    }

    #[test]
    fn test_movements_outside_horizon_are_ignored() {
        let wallets = vec![Wallet::new(1, "a", dec!(100))];
        let mut deposits = HashMap::new();
        deposits.insert(WalletId(1), vec![Movement::new(0, dec!(50)), Movement::new(9, dec!(50))]);
        let with = simulate(&wallets, dec!(24), 2, &no_moves(), &deposits);
        let without = simulate(&wallets, dec!(24), 2, &no_moves(), &no_moves());
        assert_eq!(with, without);
    }

    #[test]
    fn test_negative_rate_shrinks_balance() {
        let wallets = vec![Wallet::new(1, "a", dec!(1000))];
        let results = simulate(&wallets, dec!(-10), 2, &no_moves(), &no_moves());
        let s = series_of(&results, 1);
        assert_eq!(s.balance, amounts(&[dec!(1000), dec!(900), dec!(810)]));
        assert_eq!(s.base_profit[1], Amount(dec!(-100)));
    }

    // ========== Registry -> Validation -> Engine ==========

    #[test]
    fn test_book_validate_run_flow() {
        let mut book = WalletBook::new(CyclePolicy::Reject);
        let a = book.add_wallet("alice", dec!(1000)).expect("test: add alice");
        let b = book.add_wallet("bob", dec!(500)).expect("test: add bob");
        let c = book.add_wallet("carol", dec!(250)).expect("test: add carol");
        book.link(b, a).expect("test: bob refers alice");
        book.link(c, b).expect("test: carol refers bob");
        assert!(matches!(book.link(a, c), Err(WalletError::ReferralCycle { .. })));

        let mut schedule = MovementSchedule::new();
        schedule.schedule_withdrawal(a, Movement::new(2, dec!(240))).expect("test: withdrawal");

        let config = SimulationConfig::default().with_cycles(2);
        validate_input(book.wallets(), &schedule, &config).expect("test: valid input");
        let results = CycleEngine::new(&config).run(book.wallets(), &schedule);
        let report = SimulationReport::new(config.cycles, results);

        // alice: 1000 -> 1240, then (1240 - 240) * 1.24
        let alice = report.summary_for(a).expect("test: alice");
        assert_eq!(alice.final_balance, Amount(dec!(1240)));
        // carol gets tier 2 on alice: 240 * 0.1 + 240 * 0.1
        let carol = report.summary_for(c).expect("test: carol");
        assert_eq!(carol.total_tier2, Amount(dec!(48)));
    }

    #[test]
    fn test_validation_flags_loops_only_under_reject() {
        let wallets = vec![
            Wallet::new(1, "a", dec!(10)).with_sources([2u64]),
            Wallet::new(2, "b", dec!(10)).with_sources([1u64]),
        ];
        let schedule = MovementSchedule::new();
        let reject = SimulationConfig::default();
        assert!(matches!(
            validate_input(&wallets, &schedule, &reject),
            Err(InputError::Graph(GraphAnomaly::Cycle(_)))
        ));
        let allow = SimulationConfig::default().with_cycle_policy(CyclePolicy::Allow);
        assert!(validate_input(&wallets, &schedule, &allow).is_ok());

        // the engine itself still runs on the loop
        let results = CycleEngine::new(&allow.with_cycles(1)).run(&wallets, &schedule);
        assert_eq!(series_of(&results, 1).tier1_commission[1], Amount(dec!(0.48)));
        assert_eq!(series_of(&results, 1).tier2_commission[1], Amount(dec!(0.24)));
    }

    #[test]
    fn test_compound_mode_feeds_commission_back() {
        let wallets = vec![
            Wallet::new(1, "a", dec!(1000)),
            Wallet::new(2, "b", dec!(500)).with_sources([1u64]),
        ];
        let config = SimulationConfig::default()
            .with_cycles(1)
            .with_commission_mode(CommissionMode::Compound);
        let results = CycleEngine::new(&config).run(&wallets, &MovementSchedule::new());
        // 500 + 120 profit + 48 commission
        assert_eq!(series_of(&results, 2).balance[1], Amount(dec!(668)));
    }

    // ========== Simulator session + repository ==========

    #[test]
    fn test_session_survives_repository_roundtrip() {
        let mut sim = ReferralSimulator::with_config(SimulationConfig::default().with_cycles(2));
        let a = sim.add_wallet_core("alice", dec!(1000)).expect("test: add");
        let b = sim.add_wallet_core("bob", dec!(500)).expect("test: add");
        assert!(sim.book().contains(a));
        sim.schedule_core(b, MovementKind::Deposit, 1, dec!(100)).expect("test: deposit");
        let before = sim.run_core().expect("test: run").clone();

        let repo = InMemoryRepository::new();
        repo.save(&sim.snapshot()).expect("test: save");
        let mut restored = ReferralSimulator::from_snapshot(repo.load().expect("test: load"));
        let after = restored.run_core().expect("test: rerun").clone();
        assert_eq!(before, after);
    }

    #[test]
    fn test_snapshot_json_is_stable() {
        let mut sim = ReferralSimulator::default();
        let a = sim.add_wallet_core("alice", dec!(12.5)).expect("test: add");
        sim.schedule_core(a, MovementKind::Withdrawal, 3, dec!(2)).expect("test: withdrawal");
        let json = sim.snapshot().to_json().expect("test: to_json");
        let back = WalletSnapshot::from_json(&json).expect("test: from_json");
        assert_eq!(back, sim.snapshot());
    }

    // ========== Invariants ==========

    /// Literal triple scan over every (grandparent, parent, child) pattern.
    fn naive(
        wallets: &[Wallet],
        rate_pct: Decimal,
        cycles: u32,
        withdrawals: &HashMap<WalletId, Vec<Movement>>,
        deposits: &HashMap<WalletId, Vec<Movement>>,
    ) -> Vec<(Vec<Decimal>, Vec<Decimal>, Vec<Decimal>, Vec<Decimal>)> {
        let rate = rate_pct / dec!(100);
        let moved = |map: &HashMap<WalletId, Vec<Movement>>, id: WalletId, cycle: u32| -> Decimal {
            map.get(&id)
                .map(|ms| ms.iter().filter(|m| m.cycle == cycle).map(|m| m.amount.0).sum())
                .unwrap_or_default()
        };
        let mut balance: Vec<Decimal> = wallets.iter().map(|w| w.initial_value.0).collect();
        let mut out: Vec<_> = balance
            .iter()
            .map(|b| (vec![*b], vec![Decimal::ZERO], vec![Decimal::ZERO], vec![Decimal::ZERO]))
            .collect();

        for cycle in 1..=cycles {
            for (i, w) in wallets.iter().enumerate() {
                let b = balance[i] + moved(deposits, w.id, cycle) - moved(withdrawals, w.id, cycle);
                balance[i] = b.max(Decimal::ZERO);
            }
            let profit: Vec<Decimal> = balance.iter().map(|b| b * rate).collect();
            let mut t1 = vec![Decimal::ZERO; wallets.len()];
            let mut t2 = vec![Decimal::ZERO; wallets.len()];
            for (gi, g) in wallets.iter().enumerate() {
                for (pi, p) in wallets.iter().enumerate() {
                    if g.sources.contains(&p.id) {
                        t1[gi] += profit[pi] * dec!(0.20);
                    }
                    for (ci, c) in wallets.iter().enumerate() {
                        if g.sources.contains(&p.id) && p.sources.contains(&c.id) {
                            t2[gi] += profit[ci] * dec!(0.10);
                        }
                    }
                }
            }
            for i in 0..wallets.len() {
                balance[i] = (balance[i] + profit[i]).max(Decimal::ZERO);
                out[i].0.push(balance[i]);
                out[i].1.push(profit[i]);
                out[i].2.push(t1[i]);
                out[i].3.push(t2[i]);
            }
        }
        out
    }

    type Moves = HashMap<WalletId, Vec<Movement>>;

    fn network() -> impl Strategy<Value = (Vec<Wallet>, i64, u32, Moves, Moves)> {
        (1usize..7).prop_flat_map(|n| {
            (
                prop::collection::vec(-50_000i64..200_000, n),
                prop::collection::vec(prop::collection::vec(0..n, 0..3), n),
                -50i64..=50,
                0u32..6,
                prop::collection::vec((0..n, 1u32..6, 1i64..100_000, any::<bool>()), 0..6),
            )
                .prop_map(|(cents, sources, rate, cycles, moves)| {
                    let wallets: Vec<Wallet> = cents
                        .iter()
                        .enumerate()
                        .map(|(i, c)| {
                            let id = i as u64 + 1;
                            Wallet::new(id, format!("w{id}"), Decimal::new(*c, 2))
                                .with_sources(sources[i].iter().map(|s| *s as u64 + 1))
                        })
                        .collect();
                    let mut withdrawals = Moves::new();
                    let mut deposits = Moves::new();
                    for (w, cycle, amount, is_deposit) in moves {
                        let target = if is_deposit { &mut deposits } else { &mut withdrawals };
                        target
                            .entry(WalletId(w as u64 + 1))
                            .or_default()
                            .push(Movement::new(cycle, Decimal::new(amount, 2)));
                    }
                    (wallets, rate, cycles, withdrawals, deposits)
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_engine_matches_naive_scan((wallets, rate, cycles, wd, dp) in network()) {
            let rate = Decimal::from(rate);
            let fast = simulate(&wallets, rate, cycles, &wd, &dp);
            let slow = naive(&wallets, rate, cycles, &wd, &dp);
            prop_assert_eq!(fast.len(), slow.len());
            for (r, (bal, bp, t1, t2)) in fast.iter().zip(slow) {
                let plain = |v: &[Amount]| v.iter().map(|a| a.0).collect::<Vec<Decimal>>();
                prop_assert_eq!(plain(&r.series.balance), bal);
                prop_assert_eq!(plain(&r.series.base_profit), bp);
                prop_assert_eq!(plain(&r.series.tier1_commission), t1);
                prop_assert_eq!(plain(&r.series.tier2_commission), t2);
            }
        }

        #[test]
        fn test_balances_never_negative((wallets, rate, cycles, wd, dp) in network()) {
            let results = simulate(&wallets, Decimal::from(rate), cycles, &wd, &dp);
            for r in &results {
                prop_assert!(r.series.balance.iter().skip(1).all(|b| !b.is_negative()));
            }
        }

        #[test]
        fn test_runs_are_idempotent((wallets, rate, cycles, wd, dp) in network()) {
            let first = simulate(&wallets, Decimal::from(rate), cycles, &wd, &dp);
            let second = simulate(&wallets, Decimal::from(rate), cycles, &wd, &dp);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_series_have_cycles_plus_one_points((wallets, rate, cycles, wd, dp) in network()) {
            let results = simulate(&wallets, Decimal::from(rate), cycles, &wd, &dp);
            prop_assert_eq!(results.len(), wallets.len());
            for r in &results {
                prop_assert_eq!(r.series.len(), cycles as usize + 1);
                prop_assert_eq!(r.series.tier2_commission.len(), cycles as usize + 1);
            }
        }
    }
}
