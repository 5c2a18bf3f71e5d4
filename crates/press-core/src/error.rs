use crate::game::HoleNumber;
use crate::player::PlayerId;

/// Errors raised by validation in the scoring core.
///
/// None of these are transient: each one means the caller handed over
/// malformed data, so they are reported rather than retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Strokes ≤ 0, a hole outside the game's range, or a score filed
    /// under the wrong player.
    InvalidScore {
        player_id: PlayerId,
        hole: HoleNumber,
        reason: String,
    },
    /// `end_hole < start_hole`, a hole outside 1..=18, or a participant
    /// list that does not fit the game type.
    InvalidGameRange(String),
    /// Auto-press trigger, cap, or multiplier out of bounds.
    InvalidPressConfig(String),
    /// Zero/negative amount, self-payment, or a party outside the event.
    InvalidSettlement(String),
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScore {
                player_id,
                hole,
                reason,
            } => write!(f, "invalid score for {player_id} on hole {hole}: {reason}"),
            Self::InvalidGameRange(m) => write!(f, "invalid game range: {m}"),
            Self::InvalidPressConfig(m) => write!(f, "invalid press config: {m}"),
            Self::InvalidSettlement(m) => write!(f, "invalid settlement: {m}"),
        }
    }
}

impl std::error::Error for ScoringError {}
