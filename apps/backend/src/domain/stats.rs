//! Per-game summaries and lifetime performance figures for one player.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::currency::Currency;
use crate::domain::ids::SessionId;
use crate::domain::session::SessionSnapshot;
use crate::domain::settlement::SETTLEMENT_EPSILON;

/// Net position as a percentage of what the player put in.
pub fn roi(winnings: f64, funding: f64) -> f64 {
    if funding.abs() < SETTLEMENT_EPSILON {
        return 0.0;
    }
    winnings / funding * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub username: String,
    pub net_funding: f64,
    pub winnings: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: SessionId,
    pub name: String,
    pub currency: Currency,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub duration_hours: u32,
    pub duration_minutes: u32,
    pub pot_size: f64,
    pub players: usize,
    pub current_user_winnings: f64,
    pub roi: f64,
    pub player_details: Vec<PlayerDetail>,
}

impl GameSummary {
    /// Summarises `snapshot` from `username`'s point of view. Players
    /// without a final stack count as breaking even.
    pub fn for_player(snapshot: &SessionSnapshot, username: &str) -> Self {
        let session = &snapshot.session;
        let player_details: Vec<PlayerDetail> = session
            .ledgers_in_join_order()
            .map(|(name, ledger)| {
                let net_funding = ledger.out_of_pocket();
                let winnings = ledger.net_position().unwrap_or(0.0);
                PlayerDetail {
                    username: name.to_string(),
                    net_funding,
                    winnings,
                    roi: roi(winnings, net_funding),
                }
            })
            .collect();

        let (current_user_winnings, user_roi) = player_details
            .iter()
            .find(|d| d.username == username)
            .map(|d| (d.winnings, d.roi))
            .unwrap_or((0.0, 0.0));

        let total_minutes = session.game_duration_minutes.unwrap_or(0);

        Self {
            id: snapshot.id.clone(),
            name: session.name.clone(),
            currency: session.currency,
            created_at: session.created_at,
            duration_hours: total_minutes / 60,
            duration_minutes: total_minutes % 60,
            pot_size: session.pot_size(),
            players: session.player_usernames.len(),
            current_user_winnings,
            roi: user_roi,
            player_details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub games_played: usize,
    pub total_winnings: f64,
    pub total_invested: f64,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub roi: f64,
    pub best_game: Option<f64>,
    pub worst_game: Option<f64>,
    /// Running total of winnings, oldest game first.
    pub cumulative_winnings: Vec<f64>,
}

impl PerformanceSummary {
    /// Aggregates summaries in any order; the cumulative series is built
    /// oldest-first.
    pub fn from_games(username: &str, games: &[GameSummary]) -> Self {
        let mut ordered: Vec<&GameSummary> = games.iter().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut summary = PerformanceSummary {
            games_played: ordered.len(),
            ..Default::default()
        };
        let mut running = 0.0;
        for game in ordered {
            let winnings = game.current_user_winnings;
            let invested = game
                .player_details
                .iter()
                .find(|d| d.username == username)
                .map(|d| d.net_funding)
                .unwrap_or(0.0);

            running += winnings;
            summary.cumulative_winnings.push(running);
            summary.total_winnings += winnings;
            summary.total_invested += invested;
            if winnings > SETTLEMENT_EPSILON {
                summary.wins += 1;
            } else if winnings < -SETTLEMENT_EPSILON {
                summary.losses += 1;
            }
            summary.best_game = Some(summary.best_game.map_or(winnings, |b| b.max(winnings)));
            summary.worst_game = Some(summary.worst_game.map_or(winnings, |w| w.min(winnings)));
        }

        if summary.games_played > 0 {
            summary.win_rate = summary.wins as f64 / summary.games_played as f64 * 100.0;
        }
        summary.roi = roi(summary.total_winnings, summary.total_invested);
        summary
    }
}
