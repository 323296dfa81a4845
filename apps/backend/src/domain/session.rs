//! Game session document and its pure state transitions.
//!
//! Every mutating method validates first and only then writes, so a
//! returned error always leaves the session untouched. The store runs these
//! methods on a scratch copy inside a per-document read-modify-write.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::currency::Currency;
use crate::domain::ids::SessionId;
use crate::domain::ledger::{ensure_amount, ensure_buy_in, LedgerField, PlayerLedger};
use crate::errors::domain::{
    ConflictKind, DomainError, NotFoundKind, StateKind, ValidationKind,
};

pub const SESSION_NAME_MAX_LEN: usize = 40;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Complete,
}

/// Host input for opening a session. Players keep their listed order as
/// join order.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub name: String,
    pub currency: String,
    pub host_username: String,
    pub players: Vec<(String, f64)>,
}

/// Persisted session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub name: String,
    pub currency: Currency,
    pub status: SessionStatus,
    pub host_username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub player_usernames: Vec<String>,
    pub players: BTreeMap<String, PlayerLedger>,
    #[serde(
        rename = "gameDuration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub game_duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<String>,
}

impl GameSession {
    /// Validates a host request and builds the initial active session.
    pub fn open(req: CreateSession, created_at: OffsetDateTime) -> Result<Self, DomainError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidSessionName,
                "Game name is required",
            ));
        }
        if name.chars().count() > SESSION_NAME_MAX_LEN {
            return Err(DomainError::validation(
                ValidationKind::InvalidSessionName,
                format!("Game name must be {SESSION_NAME_MAX_LEN} characters or less"),
            ));
        }

        let currency: Currency = req.currency.parse()?;

        let host = req.host_username.trim();
        if host.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidHost,
                "Host username is required",
            ));
        }

        if req.players.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::NoPlayers,
                "At least one player is required",
            ));
        }

        let mut seen = HashSet::with_capacity(req.players.len());
        let mut player_usernames = Vec::with_capacity(req.players.len());
        let mut players = BTreeMap::new();
        for (username, buy_in) in req.players {
            ensure_username_present(&username)?;
            ensure_buy_in(buy_in, &username)?;
            if !seen.insert(username.clone()) {
                return Err(DomainError::conflict(
                    ConflictKind::DuplicatePlayer,
                    format!("Player {username} listed more than once"),
                ));
            }
            players.insert(username.clone(), PlayerLedger::with_buy_in(buy_in));
            player_usernames.push(username);
        }

        Ok(Self {
            name: name.to_string(),
            currency,
            status: SessionStatus::Active,
            host_username: host.to_string(),
            created_at,
            player_usernames,
            players,
            game_duration_minutes: None,
            settlement: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::state(
                StateKind::SessionNotActive,
                format!("Game '{}' is already complete", self.name),
            ));
        }
        Ok(())
    }

    pub fn ledger(&self, username: &str) -> Option<&PlayerLedger> {
        self.players.get(username)
    }

    /// Host or seated player.
    pub fn involves(&self, username: &str) -> bool {
        self.host_username == username || self.players.contains_key(username)
    }

    /// Everything that went into the pot: initial plus additional buy-ins.
    pub fn pot_size(&self) -> f64 {
        self.players
            .values()
            .map(|l| l.buy_in_initial + l.add_buy_ins)
            .sum()
    }

    /// Ledgers in join order.
    pub fn ledgers_in_join_order(&self) -> impl Iterator<Item = (&str, &PlayerLedger)> {
        self.player_usernames
            .iter()
            .filter_map(|u| self.players.get(u).map(|l| (u.as_str(), l)))
    }

    pub fn add_player(&mut self, username: &str, buy_in: f64) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.players.contains_key(username) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicatePlayer,
                format!("Player {username} already in game"),
            ));
        }
        ensure_username_present(username)?;
        ensure_buy_in(buy_in, username)?;

        self.players
            .insert(username.to_string(), PlayerLedger::with_buy_in(buy_in));
        self.player_usernames.push(username.to_string());
        Ok(())
    }

    pub fn set_ledger_field(
        &mut self,
        username: &str,
        field: LedgerField,
        value: f64,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        ensure_amount(value, field.as_str())?;
        let ledger = self
            .players
            .get_mut(username)
            .ok_or_else(|| player_not_found(username))?;
        ledger.set(field, value);
        Ok(())
    }

    /// Records (or re-records) final stacks. Usernames not listed keep
    /// whatever they had.
    pub fn record_final_stacks(&mut self, stacks: &[(String, f64)]) -> Result<(), DomainError> {
        self.ensure_active()?;
        for (username, stack) in stacks {
            if !self.players.contains_key(username) {
                return Err(player_not_found(username));
            }
            ensure_amount(*stack, "final stack")?;
        }
        for (username, stack) in stacks {
            if let Some(ledger) = self.players.get_mut(username) {
                ledger.final_stack = Some(*stack);
            }
        }
        Ok(())
    }

    /// Marks the session complete and stores the duration and settlement
    /// text. Not guarded: calling it again overwrites both.
    pub fn complete(
        &mut self,
        duration_minutes: u32,
        settlement: Option<String>,
    ) -> Result<(), DomainError> {
        self.status = SessionStatus::Complete;
        self.game_duration_minutes = Some(duration_minutes);
        self.settlement = settlement;
        Ok(())
    }
}

fn ensure_username_present(username: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "Player username is required",
        ));
    }
    Ok(())
}

fn player_not_found(username: &str) -> DomainError {
    DomainError::not_found(NotFoundKind::Player, format!("Player {username} not in game"))
}

/// A committed session as seen by readers: document plus store metadata.
///
/// `version` starts at 1 on creation and increases by one on every
/// committed write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub version: u64,
    #[serde(flatten)]
    pub session: GameSession,
}
