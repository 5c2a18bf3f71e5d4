use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::event::EventId;
use crate::player::PlayerId;

/// Hole number on an 18-hole card (1-based).
pub type HoleNumber = u8;

/// Unique identifier for a game (bet) within an event.
pub type GameId = String;

/// Play-money amount in whole Gator Bucks.
pub type Amount = u32;

pub const FIRST_HOLE: HoleNumber = 1;
pub const LAST_HOLE: HoleNumber = 18;

/// Upper bound on players in a single skins game.
pub const MAX_SKINS_PLAYERS: usize = 8;

/// The side games Press! knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    MatchPlay,
    Nassau,
    Skins,
    HighLowTotal,
}

impl GameType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MatchPlay => "match_play",
            Self::Nassau => "nassau",
            Self::Skins => "skins",
            Self::HighLowTotal => "high_low_total",
        }
    }

    /// Inclusive (min, max) participant counts.
    pub fn participant_bounds(self) -> (usize, usize) {
        match self {
            Self::MatchPlay | Self::Nassau => (2, 2),
            Self::Skins => (2, MAX_SKINS_PLAYERS),
            Self::HighLowTotal => (4, 4),
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens to a point or skin when the low score is shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieRule {
    /// The hole is void; nothing carries.
    #[default]
    Push,
    /// The hole's value rolls onto the next hole.
    Carryover,
}

/// Automatic press settings for a match-play game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPressConfig {
    pub enabled: bool,
    /// Holes-down margin that fires a press.
    pub trigger: i32,
    /// Maximum presses hanging off one parent game.
    pub max_presses: i32,
    /// Press stake relative to the parent stake.
    pub stake_multiplier: f64,
}

impl Default for AutoPressConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger: 2,
            max_presses: 1,
            stake_multiplier: 1.0,
        }
    }
}

impl AutoPressConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.trigger <= 0 {
            return Err(ScoringError::InvalidPressConfig(format!(
                "trigger must be > 0, got {}",
                self.trigger
            )));
        }
        if self.max_presses < 0 {
            return Err(ScoringError::InvalidPressConfig(format!(
                "max_presses must be >= 0, got {}",
                self.max_presses
            )));
        }
        if !self.stake_multiplier.is_finite() || self.stake_multiplier <= 0.0 {
            return Err(ScoringError::InvalidPressConfig(format!(
                "stake_multiplier must be > 0, got {}",
                self.stake_multiplier
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a game as derived from recorded scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// No participant has a score inside the game's range.
    Pending,
    /// Some holes scored, at least one still open.
    Active,
    /// Every participant has a score on every hole in range.
    Complete,
}

/// A bet set up inside an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub event_id: EventId,
    pub game_type: GameType,
    pub start_hole: HoleNumber,
    pub end_hole: HoleNumber,
    pub stake: Amount,
    /// `Some` marks this game as a press hanging off another game.
    #[serde(default)]
    pub parent_game_id: Option<GameId>,
    /// Ordered; for match play index 0 is player A and index 1 is player B.
    pub participants: Vec<PlayerId>,
    #[serde(default)]
    pub auto_press: AutoPressConfig,
    #[serde(default)]
    pub tie_rule: TieRule,
}

impl Game {
    /// A full-round game with a stake of 1 and default settings.
    pub fn new(
        id: impl Into<GameId>,
        event_id: impl Into<EventId>,
        game_type: GameType,
        participants: Vec<PlayerId>,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: event_id.into(),
            game_type,
            start_hole: FIRST_HOLE,
            end_hole: LAST_HOLE,
            stake: 1,
            parent_game_id: None,
            participants,
            auto_press: AutoPressConfig::default(),
            tie_rule: TieRule::default(),
        }
    }

    pub fn with_holes(mut self, start_hole: HoleNumber, end_hole: HoleNumber) -> Self {
        self.start_hole = start_hole;
        self.end_hole = end_hole;
        self
    }

    pub fn with_stake(mut self, stake: Amount) -> Self {
        self.stake = stake;
        self
    }

    /// Check `1 <= start_hole <= end_hole <= 18`.
    pub fn validate_range(&self) -> Result<(), ScoringError> {
        if self.start_hole < FIRST_HOLE || self.end_hole > LAST_HOLE {
            return Err(ScoringError::InvalidGameRange(format!(
                "holes {}-{} fall outside {FIRST_HOLE}-{LAST_HOLE}",
                self.start_hole, self.end_hole
            )));
        }
        if self.end_hole < self.start_hole {
            return Err(ScoringError::InvalidGameRange(format!(
                "end_hole {} is before start_hole {}",
                self.end_hole, self.start_hole
            )));
        }
        Ok(())
    }

    /// Full structural validation: range, participants, and auto-press settings.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.validate_range()?;

        let (min, max) = self.game_type.participant_bounds();
        let count = self.participants.len();
        if count < min || count > max {
            return Err(ScoringError::InvalidGameRange(format!(
                "{} needs {min}-{max} participants, got {count}",
                self.game_type
            )));
        }
        for (i, id) in self.participants.iter().enumerate() {
            if self.participants[..i].contains(id) {
                return Err(ScoringError::InvalidGameRange(format!(
                    "participant {id} listed twice"
                )));
            }
        }

        self.auto_press.validate()
    }

    /// Number of holes covered by the game.
    pub fn hole_count(&self) -> u8 {
        self.end_hole
            .checked_sub(self.start_hole)
            .map_or(0, |span| span.saturating_add(1))
    }

    pub fn holes(&self) -> RangeInclusive<HoleNumber> {
        self.start_hole..=self.end_hole
    }

    pub fn contains_hole(&self, hole: HoleNumber) -> bool {
        self.holes().contains(&hole)
    }

    pub fn is_press(&self) -> bool {
        self.parent_game_id.is_some()
    }

    /// Check that `self` is a legal press of `parent` given the parent's
    /// last completed hole.
    pub fn validate_press_of(
        &self,
        parent: &Game,
        parent_progress: HoleNumber,
    ) -> Result<(), ScoringError> {
        if self.parent_game_id.as_deref() != Some(parent.id.as_str()) {
            return Err(ScoringError::InvalidGameRange(format!(
                "game {} is not a press of {}",
                self.id, parent.id
            )));
        }
        if !parent.contains_hole(self.start_hole) || self.end_hole > parent.end_hole {
            return Err(ScoringError::InvalidGameRange(format!(
                "press holes {}-{} outside parent holes {}-{}",
                self.start_hole, self.end_hole, parent.start_hole, parent.end_hole
            )));
        }
        if self.start_hole <= parent_progress {
            return Err(ScoringError::InvalidGameRange(format!(
                "press starts on hole {} but the parent has already played hole {parent_progress}",
                self.start_hole
            )));
        }
        Ok(())
    }
}
