use serde::{Deserialize, Serialize};

use press_core::error::ScoringError;
use press_core::game::{Amount, AutoPressConfig, Game, GameId, GameType, HoleNumber};
use press_core::player::PlayerId;
use press_core::score::HoleScore;

use crate::hole_result::evaluate_hole_results;
use crate::match_play::{MatchPlayResult, compute_match_play_result};

/// A press needs at least this many holes left to be worth playing.
pub const MIN_PRESS_RUNWAY: u32 = 2;

/// Why the trigger declined to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoPressReason {
    Disabled,
    CapReached,
    InsufficientHoles,
    ThresholdNotMet,
}

impl NoPressReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::CapReached => "cap reached",
            Self::InsufficientHoles => "insufficient holes",
            Self::ThresholdNotMet => "threshold not met",
        }
    }
}

impl std::fmt::Display for NoPressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the auto-press trigger. Nothing is created here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AutoPressDecision {
    Press {
        losing_player_id: PlayerId,
        start_hole: HoleNumber,
        stake: Amount,
    },
    NoPress {
        reason: NoPressReason,
    },
}

impl AutoPressDecision {
    pub fn should_press(&self) -> bool {
        matches!(self, Self::Press { .. })
    }

    fn no_press(reason: NoPressReason) -> Self {
        Self::NoPress { reason }
    }
}

/// Ordered press decision; the first failing check names the reason.
pub fn decide_auto_press(
    result: &MatchPlayResult,
    existing_presses: usize,
    holes_remaining: u32,
    next_hole: HoleNumber,
    parent_stake: Amount,
    config: &AutoPressConfig,
) -> Result<AutoPressDecision, ScoringError> {
    config.validate()?;

    if !config.enabled {
        return Ok(AutoPressDecision::no_press(NoPressReason::Disabled));
    }
    let existing = i64::try_from(existing_presses).unwrap_or(i64::MAX);
    if existing >= i64::from(config.max_presses) {
        return Ok(AutoPressDecision::no_press(NoPressReason::CapReached));
    }
    if holes_remaining < MIN_PRESS_RUNWAY {
        return Ok(AutoPressDecision::no_press(NoPressReason::InsufficientHoles));
    }
    // trigger > 0 after validate(), so a met threshold implies a loser.
    let trigger = config.trigger.unsigned_abs();
    let Some(loser) = result.loser_id.as_ref().filter(|_| result.holes_up >= trigger) else {
        return Ok(AutoPressDecision::no_press(NoPressReason::ThresholdNotMet));
    };

    let scaled = (f64::from(parent_stake) * config.stake_multiplier).round();
    if scaled > f64::from(Amount::MAX) {
        return Err(ScoringError::InvalidPressConfig(format!(
            "press stake {scaled} from stake {parent_stake} x {} exceeds {}",
            config.stake_multiplier,
            Amount::MAX
        )));
    }
    // Finite, non-negative and in range after the checks above.
    let stake = scaled as Amount;
    tracing::debug!(
        loser = %loser,
        holes_up = result.holes_up,
        start_hole = next_hole,
        stake,
        "Auto-press triggered"
    );
    Ok(AutoPressDecision::Press {
        losing_player_id: loser.clone(),
        start_hole: next_hole,
        stake,
    })
}

/// Evaluate the match through `current_hole` and run the trigger.
///
/// Scores after `current_hole` are ignored. The press would start on
/// `current_hole + 1` and run to the game's last hole.
#[allow(clippy::too_many_arguments)]
pub fn check_auto_press(
    game: &Game,
    player_a: &str,
    player_b: &str,
    a_scores: &[HoleScore],
    b_scores: &[HoleScore],
    config: &AutoPressConfig,
    current_hole: HoleNumber,
    existing_presses: usize,
) -> Result<AutoPressDecision, ScoringError> {
    game.validate_range()?;
    if !game.contains_hole(current_hole) {
        return Err(ScoringError::InvalidGameRange(format!(
            "current hole {current_hole} outside game range {}-{}",
            game.start_hole, game.end_hole
        )));
    }

    let played = |scores: &[HoleScore]| -> Vec<HoleScore> {
        scores
            .iter()
            .filter(|s| s.hole <= current_hole)
            .cloned()
            .collect()
    };
    let results = evaluate_hole_results(
        game,
        player_a,
        player_b,
        &played(a_scores),
        &played(b_scores),
    )?;
    let standing = compute_match_play_result(game, player_a, player_b, &results)?;

    decide_auto_press(
        &standing,
        existing_presses,
        u32::from(game.end_hole - current_hole),
        current_hole + 1,
        game.stake,
        config,
    )
}

/// Build the press game a `Press` decision asks for.
///
/// Presses run to the parent's last hole and never auto-press themselves.
pub fn press_game(
    parent: &Game,
    id: impl Into<GameId>,
    start_hole: HoleNumber,
    stake: Amount,
) -> Game {
    let mut press = Game::new(
        id,
        parent.event_id.clone(),
        GameType::MatchPlay,
        parent.participants.clone(),
    )
    .with_holes(start_hole, parent.end_hole)
    .with_stake(stake);
    press.parent_game_id = Some(parent.id.clone());
    press
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_core::test_helpers::{make_game, scores};

    fn standing(holes_up: u32, holes_remaining: u32) -> MatchPlayResult {
        MatchPlayResult {
            winner_id: Some("p1".to_string()),
            loser_id: Some("p2".to_string()),
            holes_up,
            holes_remaining,
        }
    }

    fn config(max_presses: i32) -> AutoPressConfig {
        AutoPressConfig {
            enabled: true,
            trigger: 2,
            max_presses,
            stake_multiplier: 1.0,
        }
    }

    #[test]
    fn presses_when_two_down_with_runway() {
        let decision = decide_auto_press(&standing(2, 10), 0, 10, 9, 10, &config(1)).unwrap();
        assert_eq!(
            decision,
            AutoPressDecision::Press {
                losing_player_id: "p2".to_string(),
                start_hole: 9,
                stake: 10,
            }
        );
        assert!(decision.should_press());
    }

    #[test]
    fn cap_reached_blocks_press() {
        let decision = decide_auto_press(&standing(2, 10), 1, 10, 9, 10, &config(1)).unwrap();
        assert_eq!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::CapReached
            }
        );
    }

    #[test]
    fn disabled_checked_first() {
        let cfg = AutoPressConfig {
            enabled: false,
            ..config(0)
        };
        let decision = decide_auto_press(&standing(5, 1), 3, 1, 18, 10, &cfg).unwrap();
        assert_eq!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::Disabled
            }
        );
    }

    #[test]
    fn zero_cap_never_presses() {
        let decision = decide_auto_press(&standing(4, 10), 0, 10, 9, 10, &config(0)).unwrap();
        assert!(matches!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::CapReached
            }
        ));
    }

    #[test]
    fn needs_two_holes_of_runway() {
        let decision = decide_auto_press(&standing(3, 1), 0, 1, 18, 10, &config(2)).unwrap();
        assert!(matches!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::InsufficientHoles
            }
        ));
    }

    #[test]
    fn threshold_not_met() {
        let decision = decide_auto_press(&standing(1, 10), 0, 10, 9, 10, &config(2)).unwrap();
        assert!(matches!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::ThresholdNotMet
            }
        ));

        let all_square = MatchPlayResult {
            winner_id: None,
            loser_id: None,
            holes_up: 0,
            holes_remaining: 10,
        };
        let decision = decide_auto_press(&all_square, 0, 10, 9, 10, &config(2)).unwrap();
        assert!(!decision.should_press());
    }

    #[test]
    fn stake_multiplier_rounds() {
        let cfg = AutoPressConfig {
            stake_multiplier: 1.5,
            ..config(1)
        };
        let decision = decide_auto_press(&standing(2, 10), 0, 10, 9, 5, &cfg).unwrap();
        // 5 * 1.5 = 7.5 rounds half away from zero
        assert!(matches!(decision, AutoPressDecision::Press { stake: 8, .. }));

        let cfg = AutoPressConfig {
            stake_multiplier: 0.5,
            ..config(1)
        };
        let decision = decide_auto_press(&standing(2, 10), 0, 10, 9, 5, &cfg).unwrap();
        assert!(matches!(decision, AutoPressDecision::Press { stake: 3, .. }));
    }

    #[test]
    fn press_stake_beyond_amount_range_is_an_error() {
        let cfg = AutoPressConfig {
            stake_multiplier: 1e10,
            ..config(1)
        };
        assert!(matches!(
            decide_auto_press(&standing(2, 10), 0, 10, 9, 10, &cfg),
            Err(ScoringError::InvalidPressConfig(_))
        ));

        let cfg = AutoPressConfig {
            stake_multiplier: 1.0,
            ..config(1)
        };
        let decision = decide_auto_press(&standing(2, 10), 0, 10, 9, Amount::MAX, &cfg).unwrap();
        let AutoPressDecision::Press { stake, .. } = decision else {
            panic!("expected a press, got {decision:?}");
        };
        assert_eq!(stake, Amount::MAX);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = AutoPressConfig {
            trigger: 0,
            ..config(1)
        };
        assert!(matches!(
            decide_auto_press(&standing(2, 10), 0, 10, 9, 5, &cfg),
            Err(ScoringError::InvalidPressConfig(_))
        ));
    }

    #[test]
    fn check_auto_press_from_scores() {
        let game = make_game(GameType::MatchPlay, 2).with_stake(10);
        let a = scores("p1", 1, &[4, 3, 5, 4]);
        let b = scores("p2", 1, &[5, 4, 5, 4]);
        let decision =
            check_auto_press(&game, "p1", "p2", &a, &b, &config(1), 4, 0).unwrap();
        assert_eq!(
            decision,
            AutoPressDecision::Press {
                losing_player_id: "p2".to_string(),
                start_hole: 5,
                stake: 10,
            }
        );
    }

    #[test]
    fn check_auto_press_ignores_holes_after_current() {
        let game = make_game(GameType::MatchPlay, 2);
        let a = scores("p1", 1, &[4, 3, 3]);
        let b = scores("p2", 1, &[5, 5, 5]);
        // Through hole 1 only one up.
        let decision = check_auto_press(&game, "p1", "p2", &a, &b, &config(1), 1, 0).unwrap();
        assert!(matches!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::ThresholdNotMet
            }
        ));
    }

    #[test]
    fn check_auto_press_on_seventeenth_lacks_runway() {
        let game = make_game(GameType::MatchPlay, 2);
        let a = scores("p1", 1, &[3; 17]);
        let b = scores("p2", 1, &[5; 17]);
        let decision = check_auto_press(&game, "p1", "p2", &a, &b, &config(1), 17, 0).unwrap();
        assert!(matches!(
            decision,
            AutoPressDecision::NoPress {
                reason: NoPressReason::InsufficientHoles
            }
        ));
    }

    #[test]
    fn check_auto_press_rejects_hole_outside_range() {
        let game = make_game(GameType::MatchPlay, 2).with_holes(1, 9);
        assert!(matches!(
            check_auto_press(&game, "p1", "p2", &[], &[], &config(1), 12, 0),
            Err(ScoringError::InvalidGameRange(_))
        ));
    }

    #[test]
    fn press_game_inherits_parent() {
        let parent = make_game(GameType::MatchPlay, 2).with_stake(10);
        let press = press_game(&parent, "press-1", 7, 10);
        assert_eq!(press.parent_game_id.as_deref(), Some("g1"));
        assert_eq!(press.holes(), 7..=18);
        assert_eq!(press.participants, parent.participants);
        assert!(!press.auto_press.enabled);
        assert!(press.validate_press_of(&parent, 6).is_ok());
    }

    #[test]
    fn decision_serializes_tagged() {
        let json = serde_json::to_value(AutoPressDecision::NoPress {
            reason: NoPressReason::CapReached,
        })
        .unwrap();
        assert_eq!(json["decision"], "no_press");
        assert_eq!(json["reason"], "cap_reached");
    }
}
