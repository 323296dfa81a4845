//! Supported session currencies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cad,
    Eur,
    Gbp,
    Inr,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Cad,
        Currency::Eur,
        Currency::Gbp,
        Currency::Inr,
    ];

    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cad => "CAD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
        }
    }

    /// Display symbol used when rendering settlement lines.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd | Currency::Cad => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| {
                let supported: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
                DomainError::validation(
                    ValidationKind::InvalidCurrency,
                    format!(
                        "Invalid currency '{s}'. Supported currencies: {}",
                        supported.join(", ")
                    ),
                )
            })
    }
}
