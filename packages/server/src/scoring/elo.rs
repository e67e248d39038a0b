//! Logistic expected-score ELO update for a single pairwise comparison.

/// Post-comparison ratings of both participants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EloOutcome {
    pub winner: f64,
    pub loser: f64,
}

/// Probability that a player rated `rating` beats one rated `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Compute both new ratings from the pre-comparison ratings.
///
/// The loser's expectation is derived as `1 - expected_winner`, so the points
/// gained by the winner equal the points lost by the loser.
pub fn rate(winner: f64, loser: f64, k_factor: f64) -> EloOutcome {
    let expected_winner = expected_score(winner, loser);
    let expected_loser = 1.0 - expected_winner;

    EloOutcome {
        winner: winner + k_factor * (1.0 - expected_winner),
        loser: loser + k_factor * (0.0 - expected_loser),
    }
}
