//! Nassau: three match-play bets (front, back, overall) over one card.

use serde::{Deserialize, Serialize};

use press_core::error::ScoringError;
use press_core::game::{Game, GameStatus, GameType, HoleNumber};
use press_core::score::Scorecard;
use press_core::settlement::Settlement;

use crate::hole_result::{HoleResult, evaluate_hole_results};
use crate::match_play::{MatchPlayResult, compute_match_play_result};
use crate::scorer::GameScorer;
use crate::status::game_status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Front,
    Back,
    Overall,
}

/// One of the three Nassau bets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NassauSegment {
    pub segment: Segment,
    pub start_hole: HoleNumber,
    pub end_hole: HoleNumber,
    pub hole_results: Vec<HoleResult>,
    pub result: MatchPlayResult,
    pub status: GameStatus,
}

/// Hole ranges for front, back, and overall.
///
/// The front takes the first half of the range (rounded up); a one-hole
/// game has no back segment.
pub fn segment_ranges(game: &Game) -> Vec<(Segment, HoleNumber, HoleNumber)> {
    let front_len = game.hole_count().div_ceil(2);
    let front_end = game.start_hole + front_len - 1;
    let mut ranges = vec![(Segment::Front, game.start_hole, front_end)];
    if front_end < game.end_hole {
        ranges.push((Segment::Back, front_end + 1, game.end_hole));
    }
    ranges.push((Segment::Overall, game.start_hole, game.end_hole));
    ranges
}

/// Score every segment from the event card.
pub fn compute_nassau(game: &Game, card: &Scorecard) -> Result<Vec<NassauSegment>, ScoringError> {
    game.validate()?;
    let [a, b] = [&game.participants[0], &game.participants[1]];

    segment_ranges(game)
        .into_iter()
        .map(|(segment, start, end)| {
            let part = game.clone().with_holes(start, end);
            let hole_results = evaluate_hole_results(
                &part,
                a,
                b,
                &card.scores_in_game(a, &part),
                &card.scores_in_game(b, &part),
            )?;
            let result = compute_match_play_result(&part, a, b, &hole_results)?;
            Ok(NassauSegment {
                segment,
                start_hole: start,
                end_hole: end,
                hole_results,
                result,
                status: game_status(&part, card),
            })
        })
        .collect()
}

pub struct NassauScorer;

impl GameScorer for NassauScorer {
    fn game_type(&self) -> GameType {
        GameType::Nassau
    }

    /// Each decided segment pays the full stake.
    fn settle(&self, game: &Game, card: &Scorecard) -> Result<Vec<Settlement>, ScoringError> {
        Ok(compute_nassau(game, card)?
            .iter()
            .filter_map(|s| s.result.settlement(game.stake))
            .collect())
    }
}
