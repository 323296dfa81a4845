//! Property tests for the settlement engine (pure domain, no store).
//!
//! Contract:
//! - Balanced input always yields a plan that zeroes every player within epsilon
//! - Plan length never exceeds non-zero players minus one
//! - Each payer pays exactly its deficit and each creditor receives its surplus
//! - Identical input yields an identical plan
//! - Any imbalance beyond epsilon is reported, never corrected

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::settlement::{
    apply_plan, compute_plan, NetPosition, SettlementError, SETTLEMENT_EPSILON,
};
use crate::domain::{test_gens, test_prelude};

fn non_zero(positions: &[NetPosition]) -> usize {
    positions
        .iter()
        .filter(|p| p.amount != 0.0)
        .count()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: applying the plan drives every position to zero
    #[test]
    fn prop_plan_zeroes_every_position(positions in test_gens::balanced_positions(12)) {
        let plan = compute_plan(&positions).expect("balanced input must settle");
        for (name, residual) in apply_plan(&positions, &plan) {
            prop_assert!(residual.abs() <= SETTLEMENT_EPSILON,
                "{} left with {} after plan {:?}", name, residual, plan);
        }
    }

    /// Property: transaction count is bounded by non-zero parties minus one
    #[test]
    fn prop_plan_length_bound(positions in test_gens::balanced_positions(12)) {
        let plan = compute_plan(&positions).expect("balanced input must settle");
        let bound = non_zero(&positions).saturating_sub(1);
        prop_assert!(plan.len() <= bound,
            "plan has {} payments, bound is {}", plan.len(), bound);
    }

    /// Property: payers only pay, creditors only receive, in the right totals
    #[test]
    fn prop_flows_match_positions(positions in test_gens::balanced_positions(12)) {
        let plan = compute_plan(&positions).expect("balanced input must settle");
        let mut outgoing: BTreeMap<&str, f64> = BTreeMap::new();
        let mut incoming: BTreeMap<&str, f64> = BTreeMap::new();
        for p in &plan.payments {
            prop_assert!(p.amount > 0.0);
            prop_assert_ne!(&p.payer, &p.receiver);
            *outgoing.entry(p.payer.as_str()).or_default() += p.amount;
            *incoming.entry(p.receiver.as_str()).or_default() += p.amount;
        }
        for pos in &positions {
            let out = outgoing.get(pos.username.as_str()).copied().unwrap_or(0.0);
            let inc = incoming.get(pos.username.as_str()).copied().unwrap_or(0.0);
            if pos.amount < 0.0 {
                prop_assert!(inc == 0.0, "debtor {} received {}", pos.username, inc);
                prop_assert!((out + pos.amount).abs() <= SETTLEMENT_EPSILON);
            } else {
                prop_assert!(out == 0.0, "creditor {} paid {}", pos.username, out);
                prop_assert!((inc - pos.amount).abs() <= SETTLEMENT_EPSILON);
            }
        }
    }

    /// Property: determinism
    #[test]
    fn prop_plan_is_deterministic(positions in test_gens::balanced_positions(10)) {
        let first = compute_plan(&positions);
        let second = compute_plan(&positions);
        prop_assert_eq!(first, second);
    }

    /// Property: ties between equal balances resolve the same way every time
    #[test]
    fn prop_ties_are_stable(positions in test_gens::tied_positions()) {
        let plan = compute_plan(&positions).expect("tied input is balanced");
        let again = compute_plan(&positions).expect("tied input is balanced");
        prop_assert_eq!(&plan, &again);
        for w in plan.payments.windows(2) {
            prop_assert!((w[0].payer.as_str(), w[0].receiver.as_str())
                <= (w[1].payer.as_str(), w[1].receiver.as_str()));
        }
    }

    /// Property: imbalance beyond epsilon is rejected with the exact sum
    #[test]
    fn prop_imbalance_is_reported(
        positions in test_gens::balanced_positions(8),
        skew_cents in prop_oneof![-100_000i64..=-2, 2i64..=100_000],
    ) {
        let mut skewed = positions.clone();
        skewed[0].amount += skew_cents as f64 / 100.0;
        let expected: f64 = skewed.iter().map(|p| p.amount).sum();
        match compute_plan(&skewed) {
            Err(SettlementError::ZeroSumViolation { discrepancy }) => {
                prop_assert!((discrepancy - expected).abs() < 1e-6);
            }
            other => prop_assert!(false, "expected ZeroSumViolation, got {:?}", other),
        }
    }
}
