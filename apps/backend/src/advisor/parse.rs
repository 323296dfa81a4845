//! Reads advisor text back into a payment plan.

use std::sync::LazyLock;

use regex::Regex;

use crate::advisor::trait_def::AdvisorError;
use crate::domain::{Payment, SettlementPlan};

fn payment_line() -> &'static Regex {
    static PAYMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^\s*(?:[-*]\s*|\d+[.)]\s*)?(\S+)\s*(?:->|→)\s*(\S+)\s+\D{0,3}?([0-9][0-9,]*(?:\.[0-9]+)?)\s*$")
            .unwrap()
    });
    &PAYMENT_LINE
}

/// Parses lines of the form `"<payer> -> <receiver> $<amount>"`.
///
/// Blank lines are skipped, list bullets are tolerated, and any other line
/// makes the whole suggestion malformed. Payer and receiver names are
/// lowercased to match stored usernames.
pub fn parse_suggestion(text: &str) -> Result<SettlementPlan, AdvisorError> {
    let mut payments = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.eq_ignore_ascii_case("no payments required") {
            continue;
        }
        let caps = payment_line()
            .captures(line)
            .ok_or_else(|| AdvisorError::Malformed(format!("unexpected line '{line}'")))?;
        let amount: f64 = caps[3]
            .replace(',', "")
            .parse()
            .map_err(|_| AdvisorError::Malformed(format!("bad amount in '{line}'")))?;
        payments.push(Payment {
            payer: caps[1].to_lowercase(),
            receiver: caps[2].to_lowercase(),
            amount,
        });
    }
    Ok(SettlementPlan { payments })
}
