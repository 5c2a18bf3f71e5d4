pub mod currency;
pub mod demo;
pub mod error;
pub mod event;
pub mod game;
pub mod ids;
pub mod player;
pub mod score;
pub mod settlement;
pub mod store;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::event::Event;
    use crate::game::{Game, GameType, HoleNumber};
    use crate::player::{Player, PlayerId};
    use crate::score::{HoleScore, Scorecard};

    /// Create `n` test players with ids `p1`, `p2`, ...
    pub fn make_players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player {
                id: format!("p{}", i + 1),
                display_name: format!("Player{}", i + 1),
                is_scorekeeper: i == 0,
            })
            .collect()
    }

    /// An event holding `n` test players.
    pub fn make_event(id: &str, n: usize) -> Event {
        Event {
            id: id.to_string(),
            name: format!("Test event {id}"),
            course_name: None,
            players: make_players(n),
            created_at: 0,
        }
    }

    /// A game over the first `n` test players.
    pub fn make_game(game_type: GameType, n: usize) -> Game {
        let ids: Vec<PlayerId> = make_players(n).into_iter().map(|p| p.id).collect();
        Game::new("g1", "e1", game_type, ids)
    }

    /// Scores for one player starting at `first_hole`, one per stroke entry.
    pub fn scores(player_id: &str, first_hole: HoleNumber, strokes: &[i32]) -> Vec<HoleScore> {
        (first_hole..)
            .zip(strokes.iter())
            .map(|(hole, &s)| HoleScore::new(player_id, hole, s))
            .collect()
    }

    /// A scorecard built from `(player, strokes from hole 1)` rows.
    pub fn card(rows: &[(&str, &[i32])]) -> Scorecard {
        let all = rows
            .iter()
            .flat_map(|(player, strokes)| scores(player, 1, strokes));
        Scorecard::from_scores(all).expect("test scores must be valid")
    }
}
