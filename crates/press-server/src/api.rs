use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use press_core::currency::{CURRENCY_ALT_NAME, CURRENCY_NAME, format_balance};
use press_core::event::{Event, EventId};
use press_core::game::{
    Amount, AutoPressConfig, FIRST_HOLE, Game, GameId, GameStatus, GameType, HoleNumber,
    LAST_HOLE, TieRule,
};
use press_core::ids::{new_id, unix_now};
use press_core::player::{Player, PlayerId};
use press_core::score::{HoleScore, Scorecard};
use press_core::store::PressStore;
use press_scoring::auto_press::{AutoPressDecision, check_auto_press, press_game};
use press_scoring::high_low_total::{HighLowTotalResult, compute_high_low_total};
use press_scoring::hole_result::HoleResult;
use press_scoring::match_play::{MatchPlayResult, score_match};
use press_scoring::nassau::{NassauSegment, compute_nassau};
use press_scoring::settlement::{EventSettlement, GameSettlement, settle_event, settle_game};
use press_scoring::skins::{SkinsResult, compute_skins};
use press_scoring::status::{game_status, last_completed_hole};

use crate::error::AppError;
use crate::state::{AppState, ScoreUpdate};

const MAX_ID_LEN: usize = 128;
const MAX_NAME_LEN: usize = 256;

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.len() > max {
        return Err(AppError::BadRequest(format!("{field} exceeds {max} chars")));
    }
    Ok(())
}

/// Request body for creating an event.
#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
    #[serde(default)]
    pub id: Option<EventId>,
    pub name: String,
    #[serde(default)]
    pub course_name: Option<String>,
    pub players: Vec<Player>,
}

impl CreateEventBody {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref id) = self.id {
            if id.is_empty() {
                return Err(AppError::BadRequest("id must not be empty".to_string()));
            }
            check_len("id", id, MAX_ID_LEN)?;
        }
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        check_len("name", &self.name, MAX_NAME_LEN)?;
        if let Some(ref course) = self.course_name {
            check_len("course_name", course, MAX_NAME_LEN)?;
        }
        if self.players.is_empty() {
            return Err(AppError::BadRequest("an event needs at least one player".to_string()));
        }
        for (i, player) in self.players.iter().enumerate() {
            if player.id.is_empty() {
                return Err(AppError::BadRequest("player id must not be empty".to_string()));
            }
            check_len("player id", &player.id, MAX_ID_LEN)?;
            check_len("display_name", &player.display_name, MAX_NAME_LEN)?;
            if self.players[..i].iter().any(|p| p.id == player.id) {
                return Err(AppError::BadRequest(format!(
                    "player {} listed twice",
                    player.id
                )));
            }
        }
        Ok(())
    }
}

/// GET /api/v1/events
pub async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.store.read().await.events())
}

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(body): Json<CreateEventBody>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    body.validate()?;

    let mut store = state.store.write().await;
    let max = state.config.limits.max_events;
    if store.events().len() >= max {
        return Err(AppError::Conflict(format!(
            "Event limit reached (max {max})"
        )));
    }
    let id = body.id.unwrap_or_else(new_id);
    if store.event(&id).is_some() {
        return Err(AppError::Conflict(format!("Event {id} already exists")));
    }

    let event = Event {
        id,
        name: body.name,
        course_name: body.course_name,
        players: body.players,
        created_at: unix_now(),
    };
    store.put_event(event.clone());
    tracing::info!(event_id = %event.id, players = event.players.len(), "Created event");

    Ok((StatusCode::CREATED, Json(event)))
}

/// An event with the games attached to it.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub games: Vec<Game>,
}

fn require_event(store: &PressStore, event_id: &str) -> Result<Event, AppError> {
    store
        .event(event_id)
        .ok_or_else(|| AppError::NotFound(format!("Event {event_id} not found")))
}

/// GET /api/v1/events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<EventDetail>, AppError> {
    let store = state.store.read().await;
    let event = require_event(&store, &event_id)?;
    let games = store.games_for_event(&event_id);
    Ok(Json(EventDetail { event, games }))
}

/// GET /api/v1/events/{event_id}/games
pub async fn list_games(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<Game>>, AppError> {
    let store = state.store.read().await;
    require_event(&store, &event_id)?;
    Ok(Json(store.games_for_event(&event_id)))
}

fn first_hole() -> HoleNumber {
    FIRST_HOLE
}

fn last_hole() -> HoleNumber {
    LAST_HOLE
}

fn default_stake() -> Amount {
    1
}

/// Request body for creating a game. Presses are opened by the server and
/// cannot be created here.
#[derive(Debug, Deserialize)]
pub struct CreateGameBody {
    #[serde(default)]
    pub id: Option<GameId>,
    pub game_type: GameType,
    pub participants: Vec<PlayerId>,
    #[serde(default = "first_hole")]
    pub start_hole: HoleNumber,
    #[serde(default = "last_hole")]
    pub end_hole: HoleNumber,
    #[serde(default = "default_stake")]
    pub stake: Amount,
    /// Falls back to the server's `[auto_press]` section for match play.
    #[serde(default)]
    pub auto_press: Option<AutoPressConfig>,
    #[serde(default)]
    pub tie_rule: TieRule,
}

/// POST /api/v1/events/{event_id}/games
pub async fn create_game(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    Json(body): Json<CreateGameBody>,
) -> Result<(StatusCode, Json<Game>), AppError> {
    if let Some(ref id) = body.id {
        check_len("id", id, MAX_ID_LEN)?;
    }

    let mut store = state.store.write().await;
    require_event(&store, &event_id)?;
    let max = state.config.limits.max_games_per_event;
    if store.games_for_event(&event_id).len() >= max {
        return Err(AppError::Conflict(format!(
            "Game limit reached for event {event_id} (max {max})"
        )));
    }
    let id = body.id.unwrap_or_else(new_id);
    if store.game(&id).is_some() {
        return Err(AppError::Conflict(format!("Game {id} already exists")));
    }

    let mut game = Game::new(id, event_id, body.game_type, body.participants)
        .with_holes(body.start_hole, body.end_hole)
        .with_stake(body.stake);
    game.tie_rule = body.tie_rule;
    game.auto_press = match body.auto_press {
        Some(config) => config,
        None if game.game_type == GameType::MatchPlay => state.config.auto_press.clone(),
        None => AutoPressConfig::default(),
    };
    store.put_game(game.clone())?;
    tracing::info!(
        game_id = %game.id,
        event_id = %game.event_id,
        game_type = %game.game_type,
        "Created game"
    );

    Ok((StatusCode::CREATED, Json(game)))
}

/// GET /api/v1/events/{event_id}/scores
pub async fn get_scores(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<Scorecard>, AppError> {
    let store = state.store.read().await;
    require_event(&store, &event_id)?;
    Ok(Json(store.scorecard(&event_id)))
}

/// Request body for recording one hole score.
#[derive(Debug, Deserialize)]
pub struct ScoreBody {
    pub player_id: PlayerId,
    pub hole: HoleNumber,
    pub strokes: i32,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: HoleScore,
    /// Strokes this score replaced, if the hole had already been entered.
    pub previous_strokes: Option<i32>,
    /// Presses opened as a result of this score.
    pub presses: Vec<Game>,
}

/// PUT /api/v1/events/{event_id}/scores: record a score (last write wins)
/// and run the auto-press trigger for the player's match-play games.
pub async fn put_score(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
    Json(body): Json<ScoreBody>,
) -> Result<Json<ScoreResponse>, AppError> {
    let score = HoleScore::new(body.player_id, body.hole, body.strokes);

    let (previous_strokes, presses) = {
        let mut store = state.store.write().await;
        let before = store.scorecard(&event_id);
        let previous = store.record_score(&event_id, score.clone())?;
        let presses = open_presses(&mut store, &event_id, &score, &before);
        (previous, presses)
    };

    tracing::info!(
        event_id = %event_id,
        player_id = %score.player_id,
        hole = score.hole,
        strokes = score.strokes,
        presses = presses.len(),
        "Recorded score"
    );

    // Err only means nobody is subscribed.
    let _ = state.score_updates.send(ScoreUpdate {
        event_id,
        player_id: score.player_id.clone(),
        hole: score.hole,
        strokes: score.strokes,
        previous_strokes,
        presses: presses.iter().map(|p| p.id.clone()).collect(),
    });

    Ok(Json(ScoreResponse {
        score,
        previous_strokes,
        presses,
    }))
}

/// Run the press trigger for every top-level match-play game the scored
/// player is in. `before` is the card as it was before `score` landed.
/// Failures are logged per game and never undo the score.
fn open_presses(
    store: &mut PressStore,
    event_id: &str,
    score: &HoleScore,
    before: &Scorecard,
) -> Vec<Game> {
    let card = store.scorecard(event_id);
    let candidates: Vec<Game> = store
        .games_for_event(event_id)
        .into_iter()
        .filter(|g| {
            g.game_type == GameType::MatchPlay
                && !g.is_press()
                && g.contains_hole(score.hole)
                && g.participants.contains(&score.player_id)
        })
        .collect();

    let mut opened = Vec::new();
    for game in candidates {
        match try_press(store, before, &card, &game) {
            Ok(Some(press)) => opened.push(press),
            Ok(None) => {},
            Err(e) => tracing::warn!(game_id = %game.id, "Auto-press check failed: {e}"),
        }
    }
    opened
}

fn try_press(
    store: &mut PressStore,
    before: &Scorecard,
    card: &Scorecard,
    game: &Game,
) -> Result<Option<Game>, AppError> {
    // Trigger only when the run of completed holes advances, and evaluate
    // at its new end. Filling a gap can jump the run several holes;
    // corrections leave it where it was.
    let Some(hole) = last_completed_hole(game, card) else {
        return Ok(None);
    };
    if last_completed_hole(game, before).is_some_and(|prev| prev >= hole) {
        return Ok(None);
    }
    let [a, b] = game.participants.as_slice() else {
        return Ok(None);
    };

    let existing = store.presses_of(&game.id);
    let decision = check_auto_press(
        game,
        a,
        b,
        &card.scores_in_game(a, game),
        &card.scores_in_game(b, game),
        &game.auto_press,
        hole,
        existing.len(),
    )?;
    let AutoPressDecision::Press {
        losing_player_id,
        start_hole,
        stake,
    } = decision
    else {
        return Ok(None);
    };
    if existing.iter().any(|p| p.start_hole == start_hole) {
        return Ok(None);
    }

    let press = press_game(game, new_id(), start_hole, stake);
    press.validate_press_of(game, hole)?;
    store.put_game(press.clone())?;
    tracing::info!(
        game_id = %game.id,
        press_id = %press.id,
        losing_player_id = %losing_player_id,
        start_hole,
        stake,
        "Opened press"
    );
    Ok(Some(press))
}

/// Live view of one game.
#[derive(Debug, Serialize)]
pub struct GameStatusResponse {
    pub game: Game,
    pub status: GameStatus,
    pub last_completed_hole: Option<HoleNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole_results: Option<Vec<HoleResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_result: Option<MatchPlayResult>,
    /// `AS`, `2 UP`, `3&2`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<NassauSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skins: Option<SkinsResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_low_total: Option<HighLowTotalResult>,
    pub presses: Vec<Game>,
    pub settlement: GameSettlement,
}

fn describe_game(
    game: Game,
    card: &Scorecard,
    presses: Vec<Game>,
) -> Result<GameStatusResponse, AppError> {
    let mut response = GameStatusResponse {
        status: game_status(&game, card),
        last_completed_hole: last_completed_hole(&game, card),
        hole_results: None,
        match_result: None,
        label: None,
        segments: Vec::new(),
        skins: None,
        high_low_total: None,
        presses,
        settlement: settle_game(&game, card)?,
        game,
    };
    match response.game.game_type {
        GameType::MatchPlay => {
            let (results, standing) = score_match(&response.game, card)?;
            response.label = Some(standing.status_label());
            response.hole_results = Some(results);
            response.match_result = Some(standing);
        },
        GameType::Nassau => response.segments = compute_nassau(&response.game, card)?,
        GameType::Skins => response.skins = Some(compute_skins(&response.game, card)?),
        GameType::HighLowTotal => {
            response.high_low_total = Some(compute_high_low_total(&response.game, card)?);
        },
    }
    Ok(response)
}

/// GET /api/v1/games/{game_id}/status
pub async fn get_game_status(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<GameStatusResponse>, AppError> {
    let store = state.store.read().await;
    let game = store
        .game(&game_id)
        .ok_or_else(|| AppError::NotFound(format!("Game {game_id} not found")))?;
    let card = store.scorecard(&game.event_id);
    let presses = store.presses_of(&game.id);
    drop(store);

    Ok(Json(describe_game(game, &card, presses)?))
}

#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    pub event_id: EventId,
    pub currency: &'static str,
    pub currency_alt_name: &'static str,
    #[serde(flatten)]
    pub settlement: EventSettlement,
    /// `+5 Gator Bucks` style balances keyed by player.
    pub balances: BTreeMap<PlayerId, String>,
    pub display_names: BTreeMap<PlayerId, String>,
}

/// GET /api/v1/events/{event_id}/settlement
pub async fn get_settlement(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<SettlementResponse>, AppError> {
    let (event, games, card) = {
        let store = state.store.read().await;
        let event = require_event(&store, &event_id)?;
        (
            event,
            store.games_for_event(&event_id),
            store.scorecard(&event_id),
        )
    };

    let settlement = settle_event(&games, &card, &event.participant_ids())?;
    let balances = settlement
        .net_positions
        .iter()
        .map(|(player, &net)| (player.clone(), format_balance(net)))
        .collect();
    let display_names = settlement
        .net_positions
        .keys()
        .filter_map(|player| {
            event
                .display_name(player)
                .map(|name| (player.clone(), name.to_string()))
        })
        .collect();

    Ok(Json(SettlementResponse {
        event_id,
        currency: CURRENCY_NAME,
        currency_alt_name: CURRENCY_ALT_NAME,
        settlement,
        balances,
        display_names,
    }))
}
