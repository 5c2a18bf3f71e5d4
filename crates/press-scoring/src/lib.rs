//! Scoring and settlement for Press! side games.
//!
//! Everything here is a pure function over in-memory values: hole results,
//! match standings, auto-press decisions, and who owes whom.

pub mod auto_press;
pub mod high_low_total;
pub mod hole_result;
pub mod match_play;
pub mod nassau;
pub mod scorer;
pub mod settlement;
pub mod skins;
pub mod status;

pub use auto_press::{AutoPressDecision, NoPressReason, check_auto_press, decide_auto_press};
pub use hole_result::{HoleResult, HoleWinner, evaluate_hole_results};
pub use match_play::{MatchPlayResult, compute_match_play_result};
pub use settlement::{EventSettlement, GameSettlement, compute_net_positions, settle_event};
pub use status::game_status;
