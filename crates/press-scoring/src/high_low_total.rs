//! High-Low-Total: two-person teams play three points per hole.
//!
//! Team one is `participants[0..2]`, team two is `participants[2..4]`.
//! Low ball compares each team's better score, high ball each team's
//! worse score, total the combined score. Lower wins each point.

use serde::{Deserialize, Serialize};

use press_core::error::ScoringError;
use press_core::game::{Game, GameType, HoleNumber, TieRule};
use press_core::score::Scorecard;
use press_core::settlement::Settlement;

use crate::scorer::GameScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    One,
    Two,
}

/// Points awarded on one fully scored hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighLowTotalHole {
    pub hole: HoleNumber,
    pub low: Option<Team>,
    pub high: Option<Team>,
    pub total: Option<Team>,
    pub team_one_points: u32,
    pub team_two_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighLowTotalResult {
    pub holes: Vec<HighLowTotalHole>,
    pub team_one_points: u32,
    pub team_two_points: u32,
}

impl HighLowTotalResult {
    /// Leading team and its point margin.
    pub fn leader(&self) -> Option<(Team, u32)> {
        match self.team_one_points.cmp(&self.team_two_points) {
            std::cmp::Ordering::Greater => {
                Some((Team::One, self.team_one_points - self.team_two_points))
            },
            std::cmp::Ordering::Less => Some((Team::Two, self.team_two_points - self.team_one_points)),
            std::cmp::Ordering::Equal => None,
        }
    }
}

fn point(one: i32, two: i32) -> Option<Team> {
    match one.cmp(&two) {
        std::cmp::Ordering::Less => Some(Team::One),
        std::cmp::Ordering::Greater => Some(Team::Two),
        std::cmp::Ordering::Equal => None,
    }
}

/// Score every fully scored hole. Each of the three points carries
/// separately under `TieRule::Carryover`.
pub fn compute_high_low_total(
    game: &Game,
    card: &Scorecard,
) -> Result<HighLowTotalResult, ScoringError> {
    game.validate()?;
    let p = &game.participants;

    let mut holes = Vec::new();
    let (mut one_total, mut two_total) = (0u32, 0u32);
    // Pending carry for low, high, total.
    let mut carry = [0u32; 3];

    for hole in game.holes() {
        let Some(s) = p
            .iter()
            .map(|id| card.strokes(id, hole))
            .collect::<Option<Vec<i32>>>()
        else {
            continue;
        };
        let (one, two) = ((s[0], s[1]), (s[2], s[3]));

        let outcomes = [
            point(one.0.min(one.1), two.0.min(two.1)),
            point(one.0.max(one.1), two.0.max(two.1)),
            point(one.0 + one.1, two.0 + two.1),
        ];

        let (mut one_pts, mut two_pts) = (0u32, 0u32);
        for (outcome, pending) in outcomes.iter().zip(carry.iter_mut()) {
            let value = 1 + *pending;
            match outcome {
                Some(Team::One) => {
                    one_pts += value;
                    *pending = 0;
                },
                Some(Team::Two) => {
                    two_pts += value;
                    *pending = 0;
                },
                None if game.tie_rule == TieRule::Carryover => *pending = value,
                None => {},
            }
        }

        one_total += one_pts;
        two_total += two_pts;
        holes.push(HighLowTotalHole {
            hole,
            low: outcomes[0],
            high: outcomes[1],
            total: outcomes[2],
            team_one_points: one_pts,
            team_two_points: two_pts,
        });
    }

    Ok(HighLowTotalResult {
        holes,
        team_one_points: one_total,
        team_two_points: two_total,
    })
}

pub struct HighLowTotalScorer;

impl GameScorer for HighLowTotalScorer {
    fn game_type(&self) -> GameType {
        GameType::HighLowTotal
    }

    /// Each losing player pays their positional counterpart
    /// `margin × stake`.
    fn settle(&self, game: &Game, card: &Scorecard) -> Result<Vec<Settlement>, ScoringError> {
        let result = compute_high_low_total(game, card)?;
        let Some((leader, margin)) = result.leader() else {
            return Ok(Vec::new());
        };
        let amount = margin.checked_mul(game.stake).ok_or_else(|| {
            ScoringError::InvalidSettlement(format!(
                "margin {margin} at stake {} overflows the amount range",
                game.stake
            ))
        })?;
        if amount == 0 {
            return Ok(Vec::new());
        }
        let p = &game.participants;
        let (winners, losers) = match leader {
            Team::One => (&p[0..2], &p[2..4]),
            Team::Two => (&p[2..4], &p[0..2]),
        };
        Ok(losers
            .iter()
            .zip(winners)
            .map(|(payer, payee)| Settlement::new(payer.clone(), payee.clone(), amount))
            .collect())
    }
}
