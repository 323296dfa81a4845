//! Per-player money movements within a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Ledger row for one participant. All amounts are in session currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLedger {
    pub buy_in_initial: f64,
    pub add_buy_ins: f64,
    pub cash_outs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_stack: Option<f64>,
}

impl PlayerLedger {
    pub fn with_buy_in(buy_in: f64) -> Self {
        Self {
            buy_in_initial: buy_in,
            add_buy_ins: 0.0,
            cash_outs: 0.0,
            final_stack: None,
        }
    }

    /// Initial buy-in plus additional buy-ins minus mid-session cash-outs.
    pub fn out_of_pocket(&self) -> f64 {
        self.buy_in_initial + self.add_buy_ins - self.cash_outs
    }

    /// Final stack minus out-of-pocket; `None` until the final stack is recorded.
    pub fn net_position(&self) -> Option<f64> {
        self.final_stack.map(|stack| stack - self.out_of_pocket())
    }

    pub fn get(&self, field: LedgerField) -> f64 {
        match field {
            LedgerField::AddBuyIns => self.add_buy_ins,
            LedgerField::CashOuts => self.cash_outs,
        }
    }

    /// Overwrites `field` with an absolute value (not an increment).
    pub fn set(&mut self, field: LedgerField, value: f64) {
        match field {
            LedgerField::AddBuyIns => self.add_buy_ins = value,
            LedgerField::CashOuts => self.cash_outs = value,
        }
    }
}

/// Ledger fields participants may overwrite while a session is active.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LedgerField {
    AddBuyIns,
    CashOuts,
}

impl LedgerField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LedgerField::AddBuyIns => "addBuyIns",
            LedgerField::CashOuts => "cashOuts",
        }
    }
}

impl fmt::Display for LedgerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addBuyIns" => Ok(LedgerField::AddBuyIns),
            "cashOuts" => Ok(LedgerField::CashOuts),
            other => Err(DomainError::validation(
                ValidationKind::InvalidFieldPath,
                format!("Unknown ledger field '{other}'"),
            )),
        }
    }
}

/// Rejects negative and non-finite amounts.
pub fn ensure_amount(value: f64, what: &str) -> Result<f64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidAmount,
            format!("Invalid {what}: {value}"),
        ));
    }
    Ok(value)
}

/// Buy-ins must additionally be strictly positive.
pub fn ensure_buy_in(value: f64, username: &str) -> Result<f64, DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidAmount,
            format!("Invalid buy-in amount for player {username}: {value}"),
        ));
    }
    Ok(value)
}
