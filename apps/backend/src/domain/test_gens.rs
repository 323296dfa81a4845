// Proptest generators for settlement inputs.
// Amounts are generated in whole cents so every vector balances exactly
// before float conversion.

use proptest::prelude::*;

use crate::domain::settlement::NetPosition;

/// Generate a lowercase username from a small alphabet so ties and shared
/// prefixes show up often.
pub fn username() -> impl Strategy<Value = String> {
    "[a-e]{1,3}"
}

/// Generate 1..=max_players net positions (in cents) that sum to exactly zero.
pub fn balanced_cents(max_players: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50_000i64..=50_000i64, 0..max_players).prop_map(|mut cents| {
        let sum: i64 = cents.iter().sum();
        cents.push(-sum);
        cents
    })
}

/// Generate balanced positions with unique usernames `p00`, `p01`, ...
pub fn balanced_positions(max_players: usize) -> impl Strategy<Value = Vec<NetPosition>> {
    balanced_cents(max_players).prop_map(|cents| {
        cents
            .into_iter()
            .enumerate()
            .map(|(i, c)| NetPosition::new(format!("p{i:02}"), c as f64 / 100.0))
            .collect()
    })
}

/// Generate balanced positions that may repeat magnitudes, to exercise the
/// username tie-break.
pub fn tied_positions() -> impl Strategy<Value = Vec<NetPosition>> {
    (1usize..=4, 1i64..=500, prop::collection::vec(username(), 8)).prop_map(
        |(creditors, unit, names)| {
            let mut names = names;
            names.sort();
            names.dedup();
            let mut positions = Vec::new();
            let take = creditors.min(names.len().saturating_sub(1));
            for name in names.iter().take(take) {
                positions.push(NetPosition::new(name.clone(), unit as f64));
            }
            if let Some(last) = names.get(take) {
                positions.push(NetPosition::new(
                    last.clone(),
                    -(unit as f64) * take as f64,
                ));
            }
            positions
        },
    )
}
