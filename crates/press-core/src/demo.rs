//! Demo data loaded when the service runs without a live backend.

use crate::event::{Event, EventId};
use crate::game::{AutoPressConfig, Game, GameType, TieRule};
use crate::player::Player;
use crate::score::HoleScore;
use crate::store::{PressStore, StoreError};

pub const DEMO_EVENT_ID: &str = "demo-gator-classic";

/// Gross scores for holes 1-6, one row per player.
const DEMO_SCORES: &[(&str, [i32; 6])] = &[
    ("demo-alice", [4, 3, 5, 4, 4, 3]),
    ("demo-bob", [5, 4, 5, 6, 4, 4]),
    ("demo-carol", [4, 4, 6, 5, 3, 4]),
    ("demo-dave", [5, 3, 4, 5, 5, 4]),
];

/// Populate `store` with a four-player event, three games, and six holes
/// of scores. Returns the demo event id.
pub fn seed(store: &mut PressStore) -> Result<EventId, StoreError> {
    let mut scorekeeper = Player::new("demo-alice", "Alice");
    scorekeeper.is_scorekeeper = true;
    store.put_event(Event {
        id: DEMO_EVENT_ID.to_string(),
        name: "Gator Classic".to_string(),
        course_name: Some("Bayou Links".to_string()),
        players: vec![
            scorekeeper,
            Player::new("demo-bob", "Bob"),
            Player::new("demo-carol", "Carol"),
            Player::new("demo-dave", "Dave"),
        ],
        created_at: crate::ids::unix_now(),
    });

    let mut match_play = Game::new(
        "demo-match",
        DEMO_EVENT_ID,
        GameType::MatchPlay,
        vec!["demo-alice".to_string(), "demo-bob".to_string()],
    )
    .with_stake(10);
    match_play.auto_press = AutoPressConfig {
        enabled: true,
        ..AutoPressConfig::default()
    };
    store.put_game(match_play)?;

    let mut skins = Game::new(
        "demo-skins",
        DEMO_EVENT_ID,
        GameType::Skins,
        DEMO_SCORES.iter().map(|(id, _)| id.to_string()).collect(),
    )
    .with_stake(2);
    skins.tie_rule = TieRule::Carryover;
    store.put_game(skins)?;

    store.put_game(
        Game::new(
            "demo-nassau",
            DEMO_EVENT_ID,
            GameType::Nassau,
            vec!["demo-carol".to_string(), "demo-dave".to_string()],
        )
        .with_stake(5),
    )?;

    for (player_id, strokes) in DEMO_SCORES {
        for (hole, &s) in (1u8..).zip(strokes.iter()) {
            store.record_score(DEMO_EVENT_ID, HoleScore::new(*player_id, hole, s))?;
        }
    }

    tracing::info!(event_id = DEMO_EVENT_ID, "Seeded demo event");
    Ok(DEMO_EVENT_ID.to_string())
}
