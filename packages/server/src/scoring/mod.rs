pub mod elo;
mod service;

pub use elo::EloOutcome;
pub use service::{ComparisonResult, ScoringService, Vote};
