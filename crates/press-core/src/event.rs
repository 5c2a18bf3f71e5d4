use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerId};

/// Unique identifier for an event (a round of golf with bets attached).
pub type EventId = String;

/// A golf outing: the players and course that games and scores hang off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(default)]
    pub course_name: Option<String>,
    pub players: Vec<Player>,
    #[serde(default)]
    pub created_at: u64,
}

impl Event {
    pub fn participant_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn display_name(&self, player_id: &str) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.display_name.as_str())
    }
}
