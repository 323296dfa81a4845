//! Settlement engine: zero-sum validation and minimal payment plans.
//!
//! Pure and synchronous. The greedy matcher pairs the largest remaining
//! debtor with the largest remaining creditor. Every transfer zeroes at
//! least one party, so a plan never has more than `non_zero_parties - 1`
//! payments. Matching stops once one side is exhausted or everything left
//! on both sides is within [`SETTLEMENT_EPSILON`] of zero.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::currency::Currency;
use crate::domain::session::GameSession;
use crate::errors::domain::{ConflictKind, DomainError, StateKind, ValidationKind};

/// Tolerance, in currency units, for treating a balance as zero.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// Float noise left behind by subtraction; balances at or below this are spent.
const BALANCE_NOISE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPosition {
    pub username: String,
    pub amount: f64,
}

impl NetPosition {
    pub fn new(username: impl Into<String>, amount: f64) -> Self {
        Self {
            username: username.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payer: String,
    pub receiver: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub payments: Vec<Payment>,
}

impl SettlementPlan {
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    #[error("no players to settle")]
    NoOpPlan,
    #[error("net positions do not sum to zero (off by {discrepancy:.2})")]
    ZeroSumViolation { discrepancy: f64 },
    #[error("invalid amount for {username}: {value}")]
    InvalidInput { username: String, value: f64 },
    #[error("plan leaves {username} with {residual:.2} unsettled")]
    PlanMismatch { username: String, residual: f64 },
}

impl From<SettlementError> for DomainError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::NoOpPlan => {
                DomainError::validation(ValidationKind::NoOpPlan, err.to_string())
            }
            SettlementError::ZeroSumViolation { discrepancy } => {
                DomainError::ZeroSumViolation(discrepancy)
            }
            SettlementError::InvalidInput { .. } | SettlementError::PlanMismatch { .. } => {
                DomainError::validation(ValidationKind::InvalidAmount, err.to_string())
            }
        }
    }
}

/// Net positions in join order. Fails if any participant lacks a final stack.
pub fn net_positions(session: &GameSession) -> Result<Vec<NetPosition>, DomainError> {
    session
        .ledgers_in_join_order()
        .map(|(username, ledger)| {
            ledger
                .net_position()
                .map(|amount| NetPosition::new(username, amount))
                .ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::MissingFinalStack,
                        format!("Final stack missing for player {username}"),
                    )
                })
        })
        .collect()
}

/// Signed sum of all positions; zero (within epsilon) when the ledger balances.
pub fn discrepancy(positions: &[NetPosition]) -> f64 {
    positions.iter().map(|p| p.amount).sum()
}

struct Party<'a> {
    username: &'a str,
    balance: f64,
}

/// Index of the party with the largest balance; ties go to the
/// lexicographically smallest username.
fn largest(parties: &[Party<'_>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, party) in parties.iter().enumerate() {
        best = match best {
            None => Some(idx),
            Some(b) => {
                let current = &parties[b];
                if party.balance > current.balance
                    || (party.balance == current.balance && party.username < current.username)
                {
                    Some(idx)
                } else {
                    Some(b)
                }
            }
        };
    }
    best
}

/// Computes a minimal payment plan that zeroes every net position.
///
/// Payments are returned ordered by payer, then receiver.
pub fn compute_plan(positions: &[NetPosition]) -> Result<SettlementPlan, SettlementError> {
    if positions.is_empty() {
        return Err(SettlementError::NoOpPlan);
    }
    if let Some(bad) = positions.iter().find(|p| !p.amount.is_finite()) {
        return Err(SettlementError::InvalidInput {
            username: bad.username.clone(),
            value: bad.amount,
        });
    }

    let discrepancy = discrepancy(positions);
    if discrepancy.abs() > SETTLEMENT_EPSILON {
        return Err(SettlementError::ZeroSumViolation { discrepancy });
    }

    let mut creditors: Vec<Party<'_>> = positions
        .iter()
        .filter(|p| p.amount > BALANCE_NOISE)
        .map(|p| Party {
            username: &p.username,
            balance: p.amount,
        })
        .collect();
    let mut debtors: Vec<Party<'_>> = positions
        .iter()
        .filter(|p| p.amount < -BALANCE_NOISE)
        .map(|p| Party {
            username: &p.username,
            balance: -p.amount,
        })
        .collect();

    let mut payments = Vec::with_capacity(creditors.len() + debtors.len());
    while let (Some(d), Some(c)) = (largest(&debtors), largest(&creditors)) {
        if debtors[d].balance <= SETTLEMENT_EPSILON && creditors[c].balance <= SETTLEMENT_EPSILON {
            break;
        }
        let amount = debtors[d].balance.min(creditors[c].balance);
        payments.push(Payment {
            payer: debtors[d].username.to_string(),
            receiver: creditors[c].username.to_string(),
            amount,
        });

        debtors[d].balance -= amount;
        creditors[c].balance -= amount;
        if debtors[d].balance <= BALANCE_NOISE {
            debtors.remove(d);
        }
        if creditors[c].balance <= BALANCE_NOISE {
            creditors.remove(c);
        }
    }

    payments.sort_by(|a, b| {
        a.payer
            .cmp(&b.payer)
            .then_with(|| a.receiver.cmp(&b.receiver))
    });

    Ok(SettlementPlan { payments })
}

/// Balances left after applying `plan`: payers move up, receivers move down.
pub fn apply_plan(positions: &[NetPosition], plan: &SettlementPlan) -> BTreeMap<String, f64> {
    let mut residuals: BTreeMap<String, f64> = BTreeMap::new();
    for p in positions {
        *residuals.entry(p.username.clone()).or_insert(0.0) += p.amount;
    }
    for payment in &plan.payments {
        *residuals.entry(payment.payer.clone()).or_insert(0.0) += payment.amount;
        *residuals.entry(payment.receiver.clone()).or_insert(0.0) -= payment.amount;
    }
    residuals
}

/// Checks that `plan` (from the engine or elsewhere) settles `positions`.
pub fn verify_plan(positions: &[NetPosition], plan: &SettlementPlan) -> Result<(), SettlementError> {
    for payment in &plan.payments {
        if !payment.amount.is_finite() || payment.amount <= 0.0 {
            return Err(SettlementError::InvalidInput {
                username: payment.payer.clone(),
                value: payment.amount,
            });
        }
    }
    for (username, residual) in apply_plan(positions, plan) {
        if residual.abs() > SETTLEMENT_EPSILON {
            return Err(SettlementError::PlanMismatch { username, residual });
        }
    }
    Ok(())
}

/// Completes `session` with a plan computed from an earlier read of it.
///
/// Runs inside the completing write, so the ledger checked here is the one
/// that gets frozen. Fails without touching the session if it is no longer
/// active, no longer sums to zero, or no longer settles under `plan`.
pub fn close_with_plan(
    session: &mut GameSession,
    plan: &SettlementPlan,
    duration_minutes: u32,
    settlement: Option<String>,
) -> Result<(), DomainError> {
    if !session.is_active() {
        return Err(DomainError::state(
            StateKind::SessionAlreadyComplete,
            format!("Game '{}' has already been settled", session.name),
        ));
    }

    let positions = net_positions(session)?;
    let imbalance = discrepancy(&positions);
    if imbalance.abs() > SETTLEMENT_EPSILON {
        return Err(DomainError::ZeroSumViolation(imbalance));
    }
    verify_plan(&positions, plan).map_err(|err| {
        DomainError::conflict(
            ConflictKind::LedgerChanged,
            format!("Ledger changed during settlement: {err}"),
        )
    })?;

    session.complete(duration_minutes, settlement)
}

/// Renders one `"<payer> -> <receiver> <symbol><amount>"` line per payment.
pub fn format_plan(plan: &SettlementPlan, currency: Currency) -> String {
    if plan.is_empty() {
        return "No payments required".to_string();
    }
    let mut out = String::new();
    for (i, p) in plan.payments.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{} -> {} {}{:.2}",
            p.payer,
            p.receiver,
            currency.symbol(),
            p.amount
        );
    }
    out
}
