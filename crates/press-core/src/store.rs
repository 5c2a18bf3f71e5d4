//! Injectable storage for events, games, and scorecards.
//!
//! The scoring crate never touches this module; callers load what they need
//! from a [`PressStore`] and hand plain values to the pure functions.

use std::collections::BTreeMap;

use crate::error::ScoringError;
use crate::event::{Event, EventId};
use crate::game::{Game, GameId};
use crate::score::{HoleScore, Scorecard};

/// Keyed get/put/list storage for one kind of record.
pub trait Repository<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace, returning the previous value.
    fn put(&mut self, key: String, value: V) -> Option<V>;

    /// All values in key order.
    fn list(&self) -> Vec<V>;
}

/// In-memory repository used in mock mode and tests.
#[derive(Debug, Clone)]
pub struct MemoryRepository<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> MemoryRepository<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone + Send + Sync> Repository<V> for MemoryRepository<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: String, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    fn list(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }
}

/// Failures surfaced by [`PressStore`] writes.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    UnknownEvent(EventId),
    UnknownGame(GameId),
    UnknownPlayer { event_id: EventId, player_id: String },
    Invalid(ScoringError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEvent(id) => write!(f, "event {id} not found"),
            Self::UnknownGame(id) => write!(f, "game {id} not found"),
            Self::UnknownPlayer {
                event_id,
                player_id,
            } => write!(f, "player {player_id} is not in event {event_id}"),
            Self::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ScoringError> for StoreError {
    fn from(e: ScoringError) -> Self {
        Self::Invalid(e)
    }
}

/// Events, games, and per-event scorecards behind swappable repositories.
pub struct PressStore {
    events: Box<dyn Repository<Event>>,
    games: Box<dyn Repository<Game>>,
    scorecards: Box<dyn Repository<Scorecard>>,
}

impl Default for PressStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PressStore {
    pub fn new(
        events: Box<dyn Repository<Event>>,
        games: Box<dyn Repository<Game>>,
        scorecards: Box<dyn Repository<Scorecard>>,
    ) -> Self {
        Self {
            events,
            games,
            scorecards,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryRepository::<Event>::new()),
            Box::new(MemoryRepository::<Game>::new()),
            Box::new(MemoryRepository::<Scorecard>::new()),
        )
    }

    pub fn event(&self, event_id: &str) -> Option<Event> {
        self.events.get(event_id)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.list()
    }

    pub fn put_event(&mut self, event: Event) {
        self.events.put(event.id.clone(), event);
    }

    pub fn game(&self, game_id: &str) -> Option<Game> {
        self.games.get(game_id)
    }

    /// Store a game after checking it against its event's roster.
    pub fn put_game(&mut self, game: Game) -> Result<(), StoreError> {
        game.validate()?;
        let event = self
            .event(&game.event_id)
            .ok_or_else(|| StoreError::UnknownEvent(game.event_id.clone()))?;
        if let Some(missing) = game.participants.iter().find(|p| !event.has_player(p)) {
            return Err(StoreError::UnknownPlayer {
                event_id: event.id,
                player_id: missing.clone(),
            });
        }
        if let Some(ref parent_id) = game.parent_game_id
            && self.game(parent_id).is_none()
        {
            return Err(StoreError::UnknownGame(parent_id.clone()));
        }
        tracing::debug!(game_id = %game.id, game_type = %game.game_type, "Stored game");
        self.games.put(game.id.clone(), game);
        Ok(())
    }

    pub fn games_for_event(&self, event_id: &str) -> Vec<Game> {
        self.games
            .list()
            .into_iter()
            .filter(|g| g.event_id == event_id)
            .collect()
    }

    /// Presses hanging directly off `game_id`, ordered by start hole.
    pub fn presses_of(&self, game_id: &str) -> Vec<Game> {
        let mut presses: Vec<Game> = self
            .games
            .list()
            .into_iter()
            .filter(|g| g.parent_game_id.as_deref() == Some(game_id))
            .collect();
        presses.sort_by_key(|g| g.start_hole);
        presses
    }

    /// The event's scorecard; empty if nothing has been recorded yet.
    pub fn scorecard(&self, event_id: &str) -> Scorecard {
        self.scorecards.get(event_id).unwrap_or_default()
    }

    /// Record a hole score (last write wins), returning the replaced strokes.
    pub fn record_score(
        &mut self,
        event_id: &str,
        score: HoleScore,
    ) -> Result<Option<i32>, StoreError> {
        let event = self
            .event(event_id)
            .ok_or_else(|| StoreError::UnknownEvent(event_id.to_string()))?;
        if !event.has_player(&score.player_id) {
            return Err(StoreError::UnknownPlayer {
                event_id: event.id,
                player_id: score.player_id,
            });
        }
        let mut card = self.scorecard(event_id);
        let previous = card.record(score)?;
        self.scorecards.put(event_id.to_string(), card);
        Ok(previous)
    }
}
