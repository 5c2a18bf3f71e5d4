use serde::{Deserialize, Serialize};

/// Unique identifier for a player (opaque string, usually a UUID).
pub type PlayerId = String;

/// A golfer taking part in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// Whether this player may enter scores for the whole group.
    #[serde(default)]
    pub is_scorekeeper: bool,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_scorekeeper: false,
        }
    }
}
