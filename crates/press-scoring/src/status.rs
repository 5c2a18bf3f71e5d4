use press_core::game::{Game, GameStatus, HoleNumber};
use press_core::score::Scorecard;

/// Derive `pending` / `active` / `complete` from the recorded scores.
pub fn game_status(game: &Game, card: &Scorecard) -> GameStatus {
    let players = &game.participants;
    if game.holes().all(|h| card.hole_complete(players, h)) {
        GameStatus::Complete
    } else if game.holes().any(|h| card.hole_started(players, h)) {
        GameStatus::Active
    } else {
        GameStatus::Pending
    }
}

/// Last hole of the unbroken run of fully scored holes from `start_hole`.
///
/// `None` until the first hole of the game is complete.
pub fn last_completed_hole(game: &Game, card: &Scorecard) -> Option<HoleNumber> {
    game.holes()
        .take_while(|&h| card.hole_complete(&game.participants, h))
        .last()
}
