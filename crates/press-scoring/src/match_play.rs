use serde::{Deserialize, Serialize};

use press_core::error::ScoringError;
use press_core::game::{Amount, Game, GameType};
use press_core::player::PlayerId;
use press_core::score::Scorecard;
use press_core::settlement::Settlement;

use crate::hole_result::{HoleResult, HoleWinner, evaluate_hole_results};
use crate::scorer::GameScorer;

/// Match standing after folding the evaluated holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlayResult {
    /// `None` when the match is all square.
    pub winner_id: Option<PlayerId>,
    pub loser_id: Option<PlayerId>,
    pub holes_up: u32,
    /// Holes in range that have not been evaluated yet.
    pub holes_remaining: u32,
}

impl MatchPlayResult {
    pub fn is_all_square(&self) -> bool {
        self.holes_up == 0
    }

    /// The leader cannot be caught in the holes left.
    pub fn is_closed_out(&self) -> bool {
        self.holes_up > self.holes_remaining
    }

    /// Scoreboard label: `AS`, `2 UP`, or `3&2` once the match is closed out.
    pub fn status_label(&self) -> String {
        if self.is_all_square() {
            "AS".to_string()
        } else if self.is_closed_out() && self.holes_remaining > 0 {
            format!("{}&{}", self.holes_up, self.holes_remaining)
        } else {
            format!("{} UP", self.holes_up)
        }
    }

    /// Transfer from loser to winner for `stake`, if anyone is ahead.
    pub fn settlement(&self, stake: Amount) -> Option<Settlement> {
        if stake == 0 {
            return None;
        }
        match (&self.winner_id, &self.loser_id) {
            (Some(winner), Some(loser)) => Some(Settlement::new(loser, winner, stake)),
            _ => None,
        }
    }
}

/// Running A-minus-B differential after each evaluated hole.
pub fn running_differential(hole_results: &[HoleResult]) -> Vec<i32> {
    hole_results
        .iter()
        .scan(0i32, |diff, r| {
            *diff += match r.winner {
                HoleWinner::A => 1,
                HoleWinner::B => -1,
                HoleWinner::Tie => 0,
            };
            Some(*diff)
        })
        .collect()
}

/// Fold ordered hole results into the match standing.
///
/// `holes_remaining` counts every hole in the game's range that has no
/// result, so unscored holes stay "remaining" rather than becoming ties.
/// Early finishes are not special-cased here.
pub fn compute_match_play_result(
    game: &Game,
    player_a: &str,
    player_b: &str,
    hole_results: &[HoleResult],
) -> Result<MatchPlayResult, ScoringError> {
    game.validate_range()?;
    let mut last = None;
    for r in hole_results {
        if !game.contains_hole(r.hole) {
            return Err(ScoringError::InvalidGameRange(format!(
                "hole result for hole {} outside game range {}-{}",
                r.hole, game.start_hole, game.end_hole
            )));
        }
        if last.is_some_and(|prev| r.hole <= prev) {
            return Err(ScoringError::InvalidGameRange(format!(
                "hole results must be strictly ascending, hole {} out of order",
                r.hole
            )));
        }
        last = Some(r.hole);
    }

    let diff = running_differential(hole_results)
        .last()
        .copied()
        .unwrap_or(0);
    let (winner_id, loser_id) = match diff.signum() {
        1 => (Some(player_a.to_string()), Some(player_b.to_string())),
        -1 => (Some(player_b.to_string()), Some(player_a.to_string())),
        _ => (None, None),
    };

    // Validated above: every result is a distinct hole inside the range.
    let evaluated = hole_results.len() as u32;
    Ok(MatchPlayResult {
        winner_id,
        loser_id,
        holes_up: diff.unsigned_abs(),
        holes_remaining: u32::from(game.hole_count()) - evaluated,
    })
}

/// Hole results and standing for a two-player game straight from the card.
pub fn score_match(
    game: &Game,
    card: &Scorecard,
) -> Result<(Vec<HoleResult>, MatchPlayResult), ScoringError> {
    game.validate()?;
    let (a, b) = (&game.participants[0], &game.participants[1]);
    let results = evaluate_hole_results(
        game,
        a,
        b,
        &card.scores_in_game(a, game),
        &card.scores_in_game(b, game),
    )?;
    let standing = compute_match_play_result(game, a, b, &results)?;
    Ok((results, standing))
}

pub struct MatchPlayScorer;

impl GameScorer for MatchPlayScorer {
    fn game_type(&self) -> GameType {
        GameType::MatchPlay
    }

    fn settle(&self, game: &Game, card: &Scorecard) -> Result<Vec<Settlement>, ScoringError> {
        let (_, standing) = score_match(game, card)?;
        Ok(standing.settlement(game.stake).into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hole_result::evaluate_hole_results;
    use press_core::game::GameType;
    use press_core::test_helpers::{make_game, scores};

    fn result(hole: u8, winner: HoleWinner) -> HoleResult {
        HoleResult { hole, winner }
    }

    #[test]
    fn two_up_after_three() {
        let game = make_game(GameType::MatchPlay, 2);
        let results = evaluate_hole_results(
            &game,
            "p1",
            "p2",
            &scores("p1", 1, &[4, 3, 5]),
            &scores("p2", 1, &[5, 4, 5]),
        )
        .unwrap();
        let mp = compute_match_play_result(&game, "p1", "p2", &results).unwrap();
        assert_eq!(mp.winner_id.as_deref(), Some("p1"));
        assert_eq!(mp.loser_id.as_deref(), Some("p2"));
        assert_eq!(mp.holes_up, 2);
        assert_eq!(mp.holes_remaining, 15);
        assert_eq!(mp.status_label(), "2 UP");
    }

    #[test]
    fn all_square_has_no_winner() {
        let game = make_game(GameType::MatchPlay, 2);
        let results = vec![result(1, HoleWinner::A), result(2, HoleWinner::B)];
        let mp = compute_match_play_result(&game, "p1", "p2", &results).unwrap();
        assert!(mp.winner_id.is_none());
        assert!(mp.loser_id.is_none());
        assert!(mp.is_all_square());
        assert_eq!(mp.status_label(), "AS");
        assert!(mp.settlement(10).is_none());
    }

    #[test]
    fn empty_results_leave_full_range_remaining() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(10, 18);
        let mp = compute_match_play_result(&game, "p1", "p2", &[]).unwrap();
        assert_eq!(mp.holes_remaining, 9);
        assert_eq!(mp.holes_up, 0);
    }

    #[test]
    fn unscored_gaps_count_as_remaining() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 9);
        let results = vec![result(1, HoleWinner::B), result(5, HoleWinner::B)];
        let mp = compute_match_play_result(&game, "p1", "p2", &results).unwrap();
        assert_eq!(mp.winner_id.as_deref(), Some("p2"));
        assert_eq!(mp.holes_remaining, 7);
    }

    #[test]
    fn closed_out_match_reports_without_shortcut() {
        // Three up with one to play: caller may render "3&1", the
        // aggregator just reports the numbers.
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 4);
        let results = vec![
            result(1, HoleWinner::A),
            result(2, HoleWinner::A),
            result(3, HoleWinner::A),
        ];
        let mp = compute_match_play_result(&game, "p1", "p2", &results).unwrap();
        assert_eq!(mp.holes_up, 3);
        assert_eq!(mp.holes_remaining, 1);
        assert!(mp.is_closed_out());
        assert_eq!(mp.status_label(), "3&1");
    }

    #[test]
    fn finished_match_label_is_up() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 2);
        let results = vec![result(1, HoleWinner::A), result(2, HoleWinner::A)];
        let mp = compute_match_play_result(&game, "p1", "p2", &results).unwrap();
        assert_eq!(mp.holes_remaining, 0);
        assert_eq!(mp.status_label(), "2 UP");
    }

    #[test]
    fn out_of_order_results_rejected() {
        let game = make_game(GameType::MatchPlay, 2);
        let results = vec![result(3, HoleWinner::A), result(2, HoleWinner::A)];
        assert!(matches!(
            compute_match_play_result(&game, "p1", "p2", &results),
            Err(ScoringError::InvalidGameRange(_))
        ));
        let dupes = vec![result(2, HoleWinner::A), result(2, HoleWinner::A)];
        assert!(compute_match_play_result(&game, "p1", "p2", &dupes).is_err());
    }

    #[test]
    fn result_outside_range_rejected() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 9);
        let results = vec![result(12, HoleWinner::A)];
        assert!(compute_match_play_result(&game, "p1", "p2", &results).is_err());
    }

    #[test]
    fn settlement_goes_loser_to_winner() {
        let game = make_game(GameType::MatchPlay, 2);
        let results = vec![result(1, HoleWinner::B)];
        let mp = compute_match_play_result(&game, "p1", "p2", &results).unwrap();
        assert_eq!(mp.settlement(5), Some(Settlement::new("p1", "p2", 5)));
        assert!(mp.settlement(0).is_none());
    }

    #[test]
    fn scorer_settles_from_card() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 3).with_stake(10);
        let card = press_core::test_helpers::card(&[("p1", &[5, 5, 5]), ("p2", &[4, 5, 5])]);
        let (results, standing) = score_match(&game, &card).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(standing.winner_id.as_deref(), Some("p2"));
        assert_eq!(
            MatchPlayScorer.settle(&game, &card).unwrap(),
            vec![Settlement::new("p1", "p2", 10)]
        );
    }

    #[test]
    fn running_differential_tracks_each_hole() {
        let results = vec![
            result(1, HoleWinner::A),
            result(2, HoleWinner::Tie),
            result(3, HoleWinner::B),
            result(4, HoleWinner::B),
        ];
        assert_eq!(running_differential(&results), vec![1, 1, 0, -1]);
    }

    // ================================================================
    // Property-based tests (proptest)
    // ================================================================

    mod proptests {
        use super::*;
        use press_core::score::HoleScore;
        use proptest::prelude::*;

        fn card_for(player: &str, strokes: &[Option<i32>]) -> Vec<HoleScore> {
            (1u8..)
                .zip(strokes.iter())
                .filter_map(|(hole, s)| s.map(|s| HoleScore::new(player, hole, s)))
                .collect()
        }

        proptest! {
            #[test]
            fn relabeling_flips_winner_keeps_margin(
                a in proptest::collection::vec(proptest::option::of(1i32..10), 18),
                b in proptest::collection::vec(proptest::option::of(1i32..10), 18),
            ) {
                let game = make_game(GameType::MatchPlay, 2);
                let (sa, sb) = (card_for("p1", &a), card_for("p2", &b));

                let forward = evaluate_hole_results(&game, "p1", "p2", &sa, &sb).unwrap();
                let swapped = evaluate_hole_results(&game, "p2", "p1", &sb, &sa).unwrap();
                prop_assert_eq!(forward.len(), swapped.len());
                for (f, s) in forward.iter().zip(swapped.iter()) {
                    prop_assert_eq!(f.hole, s.hole);
                    prop_assert_eq!(f.winner.flipped(), s.winner);
                }

                let mf = compute_match_play_result(&game, "p1", "p2", &forward).unwrap();
                let ms = compute_match_play_result(&game, "p2", "p1", &swapped).unwrap();
                prop_assert_eq!(mf.holes_up, ms.holes_up);
                prop_assert_eq!(mf.holes_remaining, ms.holes_remaining);
                prop_assert_eq!(mf.winner_id, ms.winner_id);
                prop_assert_eq!(mf.loser_id, ms.loser_id);
            }

            #[test]
            fn evaluation_is_idempotent(
                a in proptest::collection::vec(proptest::option::of(1i32..10), 18),
                b in proptest::collection::vec(proptest::option::of(1i32..10), 18),
            ) {
                let game = make_game(GameType::MatchPlay, 2);
                let (sa, sb) = (card_for("p1", &a), card_for("p2", &b));
                let first = evaluate_hole_results(&game, "p1", "p2", &sa, &sb).unwrap();
                let second = evaluate_hole_results(&game, "p1", "p2", &sa, &sb).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn leader_winning_next_hole_never_loses_ground(
                a in proptest::collection::vec(1i32..10, 1..17),
                b in proptest::collection::vec(1i32..10, 1..17),
            ) {
                let n = a.len().min(b.len());
                let game = make_game(GameType::MatchPlay, 2);
                let sa: Vec<_> = card_for("p1", &a[..n].iter().map(|&s| Some(s)).collect::<Vec<_>>());
                let sb: Vec<_> = card_for("p2", &b[..n].iter().map(|&s| Some(s)).collect::<Vec<_>>());
                let before_results = evaluate_hole_results(&game, "p1", "p2", &sa, &sb).unwrap();
                let before = compute_match_play_result(&game, "p1", "p2", &before_results).unwrap();
                prop_assume!(!before.is_all_square());

                // The leader wins the next hole by one stroke.
                let next = n as u8 + 1;
                let (mut sa, mut sb) = (sa, sb);
                if before.winner_id.as_deref() == Some("p1") {
                    sa.push(HoleScore::new("p1", next, 3));
                    sb.push(HoleScore::new("p2", next, 4));
                } else {
                    sa.push(HoleScore::new("p1", next, 4));
                    sb.push(HoleScore::new("p2", next, 3));
                }
                let after_results = evaluate_hole_results(&game, "p1", "p2", &sa, &sb).unwrap();
                let after = compute_match_play_result(&game, "p1", "p2", &after_results).unwrap();
                prop_assert_eq!(&after.winner_id, &before.winner_id);
                prop_assert!(after.holes_up >= before.holes_up);
            }
        }
    }
}
