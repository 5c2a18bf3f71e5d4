//! Skins: the sole low score on a hole takes the skin.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use press_core::error::ScoringError;
use press_core::game::{Amount, Game, GameType, HoleNumber, TieRule};
use press_core::player::PlayerId;
use press_core::score::Scorecard;
use press_core::settlement::Settlement;

use crate::scorer::GameScorer;

/// What happened on one fully scored hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinHole {
    pub hole: HoleNumber,
    /// `None` when the low score was shared.
    pub winner_id: Option<PlayerId>,
    /// Skins awarded on this hole, carried ones included.
    pub skins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinsResult {
    pub holes: Vec<SkinHole>,
    pub skins_won: BTreeMap<PlayerId, u32>,
    /// Skins still riding when the scored holes ran out.
    pub carried: u32,
}

/// Walk the fully scored holes in order and award skins.
///
/// Holes where any participant is missing a score are skipped.
pub fn compute_skins(game: &Game, card: &Scorecard) -> Result<SkinsResult, ScoringError> {
    game.validate()?;

    let mut skins_won: BTreeMap<PlayerId, u32> =
        game.participants.iter().map(|p| (p.clone(), 0)).collect();
    let mut holes = Vec::new();
    let mut carried = 0u32;

    for hole in game.holes() {
        let Some(strokes) = game
            .participants
            .iter()
            .map(|p| card.strokes(p, hole).map(|s| (p, s)))
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };

        let low = strokes.iter().map(|(_, s)| *s).min().unwrap_or_default();
        let mut at_low = strokes.iter().filter(|(_, s)| *s == low);
        let winner = match (at_low.next(), at_low.next()) {
            (Some((p, _)), None) => Some((*p).clone()),
            _ => None,
        };

        let on_offer = 1 + carried;
        match &winner {
            Some(p) => {
                *skins_won.entry(p.clone()).or_default() += on_offer;
                carried = 0;
                holes.push(SkinHole {
                    hole,
                    winner_id: winner.clone(),
                    skins: on_offer,
                });
            },
            None => {
                if game.tie_rule == TieRule::Carryover {
                    carried = on_offer;
                }
                holes.push(SkinHole {
                    hole,
                    winner_id: None,
                    skins: 0,
                });
            },
        }
    }

    Ok(SkinsResult {
        holes,
        skins_won,
        carried,
    })
}

/// Every pair settles the difference in skins at `stake` per skin.
pub fn skins_settlements(
    result: &SkinsResult,
    stake: Amount,
) -> Result<Vec<Settlement>, ScoringError> {
    let players: Vec<(&PlayerId, u32)> = result.skins_won.iter().map(|(p, &n)| (p, n)).collect();
    let mut owed = Vec::new();
    for (i, &(pi, ni)) in players.iter().enumerate() {
        for &(pj, nj) in &players[i + 1..] {
            let amount = ni.abs_diff(nj).checked_mul(stake).ok_or_else(|| {
                ScoringError::InvalidSettlement(format!(
                    "{} skins at stake {stake} overflows the amount range",
                    ni.abs_diff(nj)
                ))
            })?;
            if amount == 0 {
                continue;
            }
            let (payer, payee) = if ni < nj { (pi, pj) } else { (pj, pi) };
            owed.push(Settlement::new(payer.clone(), payee.clone(), amount));
        }
    }
    Ok(owed)
}

pub struct SkinsScorer;

impl GameScorer for SkinsScorer {
    fn game_type(&self) -> GameType {
        GameType::Skins
    }

    fn settle(&self, game: &Game, card: &Scorecard) -> Result<Vec<Settlement>, ScoringError> {
        skins_settlements(&compute_skins(game, card)?, game.stake)
    }
}
