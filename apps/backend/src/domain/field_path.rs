//! Dotted field paths addressing ledger values, e.g. `players.alice.cashOuts`.

use std::fmt;
use std::str::FromStr;

use crate::domain::ledger::LedgerField;
use crate::domain::session::GameSession;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Ledger { username: String, field: LedgerField },
    FinalStack { username: String },
}

impl FieldPath {
    pub fn ledger(username: impl Into<String>, field: LedgerField) -> Self {
        Self::Ledger {
            username: username.into(),
            field,
        }
    }

    pub fn final_stack(username: impl Into<String>) -> Self {
        Self::FinalStack {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        match self {
            FieldPath::Ledger { username, .. } | FieldPath::FinalStack { username } => username,
        }
    }

    /// Writes `value` into a local copy without any validation. Paths naming
    /// an unknown player are ignored: the authoritative store decides.
    pub fn apply(&self, session: &mut GameSession, value: f64) {
        let Some(ledger) = session.players.get_mut(self.username()) else {
            return;
        };
        match self {
            FieldPath::Ledger { field, .. } => ledger.set(*field, value),
            FieldPath::FinalStack { .. } => ledger.final_stack = Some(value),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Ledger { username, field } => write!(f, "players.{username}.{field}"),
            FieldPath::FinalStack { username } => write!(f, "players.{username}.finalStack"),
        }
    }
}

impl FromStr for FieldPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            DomainError::validation(
                ValidationKind::InvalidFieldPath,
                format!("Unsupported field path '{s}'"),
            )
        };
        let mut parts = s.split('.');
        let (Some("players"), Some(username), Some(field), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if username.is_empty() {
            return Err(invalid());
        }
        match field {
            "finalStack" => Ok(FieldPath::final_stack(username)),
            other => Ok(FieldPath::ledger(username, other.parse()?)),
        }
    }
}
