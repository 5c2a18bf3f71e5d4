use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use press_core::error::ScoringError;
use press_core::game::{Game, HoleNumber};
use press_core::score::HoleScore;

/// Outcome of a single hole between player A and player B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleWinner {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "tie")]
    Tie,
}

impl HoleWinner {
    /// The same outcome seen with A and B relabeled.
    pub fn flipped(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
            Self::Tie => Self::Tie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleResult {
    pub hole: HoleNumber,
    pub winner: HoleWinner,
}

/// Lower strokes wins the hole.
pub fn compare_strokes(a: i32, b: i32) -> HoleWinner {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => HoleWinner::A,
        std::cmp::Ordering::Greater => HoleWinner::B,
        std::cmp::Ordering::Equal => HoleWinner::Tie,
    }
}

/// Compare two players hole by hole over the game's range.
///
/// Only holes where both players have a score appear in the output, in
/// ascending hole order. Unscored holes are neither ties nor losses.
pub fn evaluate_hole_results(
    game: &Game,
    player_a: &str,
    player_b: &str,
    a_scores: &[HoleScore],
    b_scores: &[HoleScore],
) -> Result<Vec<HoleResult>, ScoringError> {
    game.validate_range()?;
    if player_a == player_b {
        return Err(ScoringError::InvalidGameRange(format!(
            "player {player_a} cannot play against themselves"
        )));
    }

    let a = strokes_by_hole(game, player_a, a_scores)?;
    let b = strokes_by_hole(game, player_b, b_scores)?;

    Ok(game
        .holes()
        .filter_map(|hole| {
            let (sa, sb) = (a.get(&hole)?, b.get(&hole)?);
            Some(HoleResult {
                hole,
                winner: compare_strokes(*sa, *sb),
            })
        })
        .collect())
}

/// Validate one player's scores and index them by hole (later entries win).
fn strokes_by_hole(
    game: &Game,
    player_id: &str,
    scores: &[HoleScore],
) -> Result<BTreeMap<HoleNumber, i32>, ScoringError> {
    let mut by_hole = BTreeMap::new();
    for score in scores {
        if score.player_id != player_id {
            return Err(score.invalid(format!("score belongs to {}, not {player_id}", score.player_id)));
        }
        score.validate()?;
        if !game.contains_hole(score.hole) {
            return Err(score.invalid(format!(
                "hole outside game range {}-{}",
                game.start_hole, game.end_hole
            )));
        }
        by_hole.insert(score.hole, score.strokes);
    }
    Ok(by_hole)
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_core::game::GameType;
    use press_core::test_helpers::{make_game, scores};

    #[test]
    fn lower_strokes_wins() {
        assert_eq!(compare_strokes(3, 4), HoleWinner::A);
        assert_eq!(compare_strokes(6, 4), HoleWinner::B);
        assert_eq!(compare_strokes(4, 4), HoleWinner::Tie);
    }

    #[test]
    fn three_hole_scenario() {
        let game = make_game(GameType::MatchPlay, 2);
        let results = evaluate_hole_results(
            &game,
            "p1",
            "p2",
            &scores("p1", 1, &[4, 3, 5]),
            &scores("p2", 1, &[5, 4, 5]),
        )
        .unwrap();
        assert_eq!(
            results,
            vec![
                HoleResult { hole: 1, winner: HoleWinner::A },
                HoleResult { hole: 2, winner: HoleWinner::A },
                HoleResult { hole: 3, winner: HoleWinner::Tie },
            ]
        );
    }

    #[test]
    fn holes_missing_either_score_are_omitted() {
        let game = make_game(GameType::MatchPlay, 2);
        let mut a = scores("p1", 1, &[4, 4, 4]);
        a.push(HoleScore::new("p1", 7, 3));
        let b = scores("p2", 2, &[5, 5]);
        let results = evaluate_hole_results(&game, "p1", "p2", &a, &b).unwrap();
        let holes: Vec<_> = results.iter().map(|r| r.hole).collect();
        assert_eq!(holes, vec![2, 3]);
    }

    #[test]
    fn output_is_ascending_regardless_of_input_order() {
        let game = make_game(GameType::MatchPlay, 2);
        let mut a = scores("p1", 1, &[4, 5, 3]);
        a.reverse();
        let b = scores("p2", 1, &[4, 4, 4]);
        let results = evaluate_hole_results(&game, "p1", "p2", &a, &b).unwrap();
        assert!(results.windows(2).all(|w| w[0].hole < w[1].hole));
    }

    #[test]
    fn later_duplicate_supersedes_earlier() {
        let game = make_game(GameType::MatchPlay, 2);
        let a = vec![HoleScore::new("p1", 1, 6), HoleScore::new("p1", 1, 3)];
        let b = scores("p2", 1, &[4]);
        let results = evaluate_hole_results(&game, "p1", "p2", &a, &b).unwrap();
        assert_eq!(results[0].winner, HoleWinner::A);
    }

    #[test]
    fn negative_or_zero_strokes_rejected() {
        let game = make_game(GameType::MatchPlay, 2);
        let err = evaluate_hole_results(
            &game,
            "p1",
            "p2",
            &scores("p1", 1, &[-1]),
            &scores("p2", 1, &[4]),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidScore { hole: 1, .. }));

        let err = evaluate_hole_results(
            &game,
            "p1",
            "p2",
            &scores("p1", 1, &[4]),
            &scores("p2", 1, &[0]),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidScore { .. }));
    }

    #[test]
    fn hole_outside_range_rejected() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 9);
        let err = evaluate_hole_results(
            &game,
            "p1",
            "p2",
            &scores("p1", 10, &[4]),
            &scores("p2", 10, &[4]),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidScore { hole: 10, .. }));
    }

    #[test]
    fn score_filed_under_other_player_rejected() {
        let game = make_game(GameType::MatchPlay, 2);
        let err = evaluate_hole_results(
            &game,
            "p1",
            "p2",
            &scores("p2", 1, &[4]),
            &scores("p2", 1, &[4]),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidScore { .. }));
    }

    #[test]
    fn invalid_range_rejected() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(12, 4);
        let err = evaluate_hole_results(&game, "p1", "p2", &[], &[]).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidGameRange(_)));
    }

    #[test]
    fn winner_serializes_as_letters() {
        let json = serde_json::to_string(&HoleResult {
            hole: 4,
            winner: HoleWinner::Tie,
        })
        .unwrap();
        assert_eq!(json, r#"{"hole":4,"winner":"tie"}"#);
    }
}
