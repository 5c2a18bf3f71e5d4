use press_core::error::ScoringError;
use press_core::game::{Game, GameType};
use press_core::score::Scorecard;
use press_core::settlement::Settlement;

use crate::high_low_total::HighLowTotalScorer;
use crate::match_play::MatchPlayScorer;
use crate::nassau::NassauScorer;
use crate::skins::SkinsScorer;

/// Per-game-type money rules.
///
/// Implementations only say who owes whom once a game is complete;
/// deciding *whether* it is complete is left to the settlement layer.
pub trait GameScorer: Send + Sync {
    fn game_type(&self) -> GameType;

    /// Transfers owed for a completed `game`.
    fn settle(&self, game: &Game, card: &Scorecard) -> Result<Vec<Settlement>, ScoringError>;
}

/// Look up the scorer for a game type.
pub fn scorer_for(game_type: GameType) -> &'static dyn GameScorer {
    match game_type {
        GameType::MatchPlay => &MatchPlayScorer,
        GameType::Nassau => &NassauScorer,
        GameType::Skins => &SkinsScorer,
        GameType::HighLowTotal => &HighLowTotalScorer,
    }
}
