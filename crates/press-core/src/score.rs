use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::game::{FIRST_HOLE, Game, HoleNumber, LAST_HOLE};
use crate::player::PlayerId;

/// Gross strokes for one player on one hole.
///
/// Strokes are signed so that malformed input (zero or negative) can be
/// carried far enough to be rejected with a proper error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleScore {
    pub player_id: PlayerId,
    pub hole: HoleNumber,
    pub strokes: i32,
}

impl HoleScore {
    pub fn new(player_id: impl Into<PlayerId>, hole: HoleNumber, strokes: i32) -> Self {
        Self {
            player_id: player_id.into(),
            hole,
            strokes,
        }
    }

    /// Reject strokes ≤ 0 and holes outside 1..=18.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.strokes <= 0 {
            return Err(self.invalid(format!("strokes must be positive, got {}", self.strokes)));
        }
        if !(FIRST_HOLE..=LAST_HOLE).contains(&self.hole) {
            return Err(self.invalid(format!("hole must be {FIRST_HOLE}-{LAST_HOLE}")));
        }
        Ok(())
    }

    /// Build an `InvalidScore` error pointing at this score.
    pub fn invalid(&self, reason: String) -> ScoringError {
        ScoringError::InvalidScore {
            player_id: self.player_id.clone(),
            hole: self.hole,
            reason,
        }
    }
}

/// Every recorded score of an event, keyed by player then hole.
///
/// A later write for the same `(player, hole)` replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    scores: BTreeMap<PlayerId, BTreeMap<HoleNumber, i32>>,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a card from a list of scores; later entries win.
    pub fn from_scores<I>(scores: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = HoleScore>,
    {
        let mut card = Self::new();
        for score in scores {
            card.record(score)?;
        }
        Ok(card)
    }

    /// Record a score, returning the strokes it replaced (if any).
    pub fn record(&mut self, score: HoleScore) -> Result<Option<i32>, ScoringError> {
        score.validate()?;
        Ok(self
            .scores
            .entry(score.player_id)
            .or_default()
            .insert(score.hole, score.strokes))
    }

    pub fn strokes(&self, player_id: &str, hole: HoleNumber) -> Option<i32> {
        self.scores.get(player_id)?.get(&hole).copied()
    }

    /// All scores for a player, ascending by hole.
    pub fn scores_for(&self, player_id: &str) -> Vec<HoleScore> {
        self.scores
            .get(player_id)
            .map(|holes| {
                holes
                    .iter()
                    .map(|(&hole, &strokes)| HoleScore::new(player_id, hole, strokes))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A player's scores restricted to a game's hole range.
    pub fn scores_in_game(&self, player_id: &str, game: &Game) -> Vec<HoleScore> {
        self.scores_for(player_id)
            .into_iter()
            .filter(|s| game.contains_hole(s.hole))
            .collect()
    }

    /// Whether every listed player has a score on `hole`.
    pub fn hole_complete(&self, players: &[PlayerId], hole: HoleNumber) -> bool {
        players.iter().all(|p| self.strokes(p, hole).is_some())
    }

    /// Whether any listed player has a score on `hole`.
    pub fn hole_started(&self, players: &[PlayerId], hole: HoleNumber) -> bool {
        players.iter().any(|p| self.strokes(p, hole).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.scores.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;

    #[test]
    fn last_write_wins() {
        let mut card = Scorecard::new();
        assert_eq!(card.record(HoleScore::new("a", 1, 5)).unwrap(), None);
        assert_eq!(card.record(HoleScore::new("a", 1, 4)).unwrap(), Some(5));
        assert_eq!(card.strokes("a", 1), Some(4));
        assert_eq!(card.scores_for("a").len(), 1);
    }

    #[test]
    fn rejects_non_positive_strokes() {
        let mut card = Scorecard::new();
        assert!(matches!(
            card.record(HoleScore::new("a", 1, 0)),
            Err(ScoringError::InvalidScore { hole: 1, .. })
        ));
        assert!(card.record(HoleScore::new("a", 1, -3)).is_err());
        assert!(card.is_empty());
    }

    #[test]
    fn rejects_hole_out_of_card() {
        let mut card = Scorecard::new();
        assert!(card.record(HoleScore::new("a", 0, 4)).is_err());
        assert!(card.record(HoleScore::new("a", 19, 4)).is_err());
    }

    #[test]
    fn scores_in_game_filters_range() {
        let card = Scorecard::from_scores((1..=18).map(|h| HoleScore::new("a", h, 4))).unwrap();
        let game = Game::new("g", "e", GameType::MatchPlay, vec!["a".into(), "b".into()])
            .with_holes(10, 18);
        let back = card.scores_in_game("a", &game);
        assert_eq!(back.len(), 9);
        assert_eq!(back[0].hole, 10);
    }

    #[test]
    fn hole_completion_tracks_all_players() {
        let mut card = Scorecard::new();
        card.record(HoleScore::new("a", 3, 4)).unwrap();
        let players = vec!["a".to_string(), "b".to_string()];
        assert!(card.hole_started(&players, 3));
        assert!(!card.hole_complete(&players, 3));
        card.record(HoleScore::new("b", 3, 5)).unwrap();
        assert!(card.hole_complete(&players, 3));
    }

    #[test]
    fn json_roundtrip_keeps_hole_keys() {
        let card = Scorecard::from_scores([HoleScore::new("a", 7, 3)]).unwrap();
        let json = serde_json::to_string(&card).unwrap();
        let back: Scorecard = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strokes("a", 7), Some(3));
    }
}
