use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use press_core::currency::DISCLAIMER;
use press_core::error::ScoringError;
use press_core::game::{Amount, Game, GameId, GameStatus, GameType};
use press_core::player::PlayerId;
use press_core::score::Scorecard;
use press_core::settlement::Settlement;

use crate::scorer::scorer_for;
use crate::status::game_status;

/// Fold transfers into per-player balances.
///
/// Every participant appears in the output, starting at zero. Money only
/// moves between participants, so the balances always sum to zero.
pub fn compute_net_positions(
    settlements: &[Settlement],
    participant_ids: &[PlayerId],
) -> Result<BTreeMap<PlayerId, i64>, ScoringError> {
    let mut net: BTreeMap<PlayerId, i64> =
        participant_ids.iter().map(|p| (p.clone(), 0)).collect();

    for s in settlements {
        s.validate()?;
        let amount = i64::from(s.amount);
        for (party, delta) in [(&s.payer_id, -amount), (&s.payee_id, amount)] {
            let Some(balance) = net.get_mut(party) else {
                return Err(ScoringError::InvalidSettlement(format!(
                    "{party} is not a participant"
                )));
            };
            *balance += delta;
        }
    }
    Ok(net)
}

/// Collapse balances into as few payer→payee transfers as the greedy
/// largest-debtor/largest-creditor pass produces.
///
/// Replaying the returned transfers through [`compute_net_positions`]
/// reproduces `positions`.
pub fn simplify_ledger(
    positions: &BTreeMap<PlayerId, i64>,
) -> Result<Vec<Settlement>, ScoringError> {
    let total: i64 = positions.values().sum();
    if total != 0 {
        return Err(ScoringError::InvalidSettlement(format!(
            "net positions sum to {total}, expected 0"
        )));
    }

    let mut debtors: Vec<(&PlayerId, i64)> = positions
        .iter()
        .filter_map(|(p, &b)| (b < 0).then_some((p, -b)))
        .collect();
    let mut creditors: Vec<(&PlayerId, i64)> = positions
        .iter()
        .filter_map(|(p, &b)| (b > 0).then_some((p, b)))
        .collect();
    // Largest first; BTreeMap order breaks ties deterministically.
    debtors.sort_by(|a, b| b.1.cmp(&a.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ledger = Vec::new();
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let paid = debtors[d].1.min(creditors[c].1);
        let amount = Amount::try_from(paid).map_err(|_| {
            ScoringError::InvalidSettlement(format!("transfer of {paid} exceeds the currency range"))
        })?;
        ledger.push(Settlement::new(debtors[d].0.clone(), creditors[c].0.clone(), amount));
        debtors[d].1 -= paid;
        creditors[c].1 -= paid;
        if debtors[d].1 == 0 {
            d += 1;
        }
        if creditors[c].1 == 0 {
            c += 1;
        }
    }
    Ok(ledger)
}

/// Settlement of a single game, or an explicit marker that it is not
/// finished. Unfinished games never report a partial amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameSettlement {
    InProgress { status: GameStatus },
    Settled { settlements: Vec<Settlement> },
}

pub fn settle_game(game: &Game, card: &Scorecard) -> Result<GameSettlement, ScoringError> {
    game.validate()?;
    let status = game_status(game, card);
    if status != GameStatus::Complete {
        return Ok(GameSettlement::InProgress { status });
    }
    let settlements = scorer_for(game.game_type).settle(game, card)?;
    Ok(GameSettlement::Settled { settlements })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettlementEntry {
    pub game_id: GameId,
    pub game_type: GameType,
    pub is_press: bool,
    pub outcome: GameSettlement,
}

/// Money movement for an entire event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSettlement {
    pub games: Vec<GameSettlementEntry>,
    /// Raw transfers from every settled game.
    pub settlements: Vec<Settlement>,
    pub net_positions: BTreeMap<PlayerId, i64>,
    /// Simplified payer→payee transfers equivalent to `net_positions`.
    pub ledger: Vec<Settlement>,
    pub unsettled_games: Vec<GameId>,
    pub disclaimer: String,
}

impl EventSettlement {
    pub fn is_final(&self) -> bool {
        self.unsettled_games.is_empty()
    }
}

/// Settle every complete game of an event and net the results.
///
/// Games still pending or active are listed in `unsettled_games` and
/// contribute nothing to the balances.
pub fn settle_event(
    games: &[Game],
    card: &Scorecard,
    participant_ids: &[PlayerId],
) -> Result<EventSettlement, ScoringError> {
    let mut entries = Vec::with_capacity(games.len());
    let mut settlements = Vec::new();
    let mut unsettled_games = Vec::new();

    for game in games {
        let outcome = settle_game(game, card)?;
        match &outcome {
            GameSettlement::Settled { settlements: s } => settlements.extend(s.iter().cloned()),
            GameSettlement::InProgress { .. } => unsettled_games.push(game.id.clone()),
        }
        entries.push(GameSettlementEntry {
            game_id: game.id.clone(),
            game_type: game.game_type,
            is_press: game.is_press(),
            outcome,
        });
    }

    let net_positions = compute_net_positions(&settlements, participant_ids)?;
    let ledger = simplify_ledger(&net_positions)?;
    tracing::debug!(
        games = games.len(),
        unsettled = unsettled_games.len(),
        transfers = ledger.len(),
        "Settled event"
    );

    Ok(EventSettlement {
        games: entries,
        settlements,
        net_positions,
        ledger,
        unsettled_games,
        disclaimer: DISCLAIMER.to_string(),
    })
}
