//! Read-side queries over completed and active sessions.
//!
//! `async` to match the session store it reads from.

use serde::Serialize;
use tracing::debug;

use crate::domain::{GameSummary, PerformanceSummary, SessionId, SessionSnapshot};
use crate::services::sessions::GameSessionStore;

/// Session a user is currently part of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub id: SessionId,
    pub name: String,
}

#[derive(Clone)]
pub struct HistoryService {
    store: GameSessionStore,
}

impl HistoryService {
    pub fn new(store: GameSessionStore) -> Self {
        Self { store }
    }

    /// Completed sessions `username` played in, newest first.
    pub async fn games_for_user(&self, username: &str) -> Vec<GameSummary> {
        let mut games: Vec<GameSummary> = self
            .completed_for(username)
            .await
            .iter()
            .map(|snap| GameSummary::for_player(snap, username))
            .collect();
        games.reverse();
        debug!(username, games = games.len(), "loaded game history");
        games
    }

    /// Lifetime figures across every completed session.
    pub async fn performance_for_user(&self, username: &str) -> PerformanceSummary {
        let games: Vec<GameSummary> = self
            .completed_for(username)
            .await
            .iter()
            .map(|snap| GameSummary::for_player(snap, username))
            .collect();
        PerformanceSummary::from_games(username, &games)
    }

    /// An active session hosting or seating `username`, if any. Advisory:
    /// nothing stops a user from joining several sessions at once. When more
    /// than one matches, the most recently created wins.
    pub async fn active_session_for(&self, username: &str) -> Option<ActiveSession> {
        self.store
            .list_where(|s| s.is_active() && s.involves(username))
            .await
            .pop()
            .map(|snap| ActiveSession {
                id: snap.id,
                name: snap.session.name,
            })
    }

    async fn completed_for(&self, username: &str) -> Vec<SessionSnapshot> {
        self.store
            .list_where(|s| !s.is_active() && s.players.contains_key(username))
            .await
    }
}
