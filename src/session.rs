use std::sync::{Arc, Mutex, PoisonError};
use log::{error, info};
use serde_json::{json, Value};
use thiserror::Error;
use crate::board::{GameState, Move, MoveError, Player, SCARCE_SUPPLY};
use crate::driver::{GameEnd, SearchConfig};
use crate::engine::Engine;

/// Largest income a client may start either player with.
pub const MAX_START_COINS: u32 = 40;
/// Largest point lead, either way, a client may start from.
pub const MAX_START_LEAD: i32 = 1_000;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game has not started yet")]
    NotStarted,
    #[error("game has ended; send start to play again")]
    Finished,
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    #[error("malformed field: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("engine found no move")]
    NoEngineMove,
}

/// One client playing one side against the engine.
///
/// Client messages: `{"start": bool, "state"?: GameState}` (true = client is
/// player 1) and `{"move": Move}`. Replies carry the position and the
/// client's legal moves, the engine's move and score, an `end` marker, or are
/// turned into `{"error": ...}` by the server loop.
pub struct GameSession {
    started: bool,
    finished: bool,
    client: Player,
    state: GameState,
    half_turns: u32,
    config: SearchConfig,
    engine: Engine,
}

impl GameSession {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            started: false,
            finished: false,
            client: Player::One,
            state: GameState::new(),
            half_turns: 0,
            config,
            engine: Engine::new(config.horizon_depth.max(1)),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn half_turns(&self) -> u32 {
        self.half_turns
    }

    pub fn handle_message(&mut self, data: Value) -> Result<Value, SessionError> {
        let map = data.as_object()
            .ok_or_else(|| SessionError::InvalidMessage("expected an object".to_string()))?;

        if let Some(start) = map.get("start") {
            let client_is_player1 = start.as_bool().ok_or_else(|| {
                SessionError::InvalidMessage("expected boolean field: start".to_string())
            })?;
            let state = match map.get("state") {
                Some(state) => serde_json::from_value::<GameState>(state.clone())?,
                None => GameState::new(),
            };
            check_start(&state)?;
            self.handle_start(client_is_player1, state)
        } else if let Some(mv) = map.get("move") {
            if !self.started {
                return Err(SessionError::NotStarted);
            }
            if self.finished {
                return Err(SessionError::Finished);
            }
            let mv: Move = serde_json::from_value(mv.clone())?;
            self.handle_move(mv)
        } else {
            Err(SessionError::InvalidMessage(data.to_string()))
        }
    }

    fn handle_start(
        &mut self,
        client_is_player1: bool,
        state: GameState,
    ) -> Result<Value, SessionError> {
        self.started = true;
        self.finished = false;
        self.half_turns = 0;
        self.client = if client_is_player1 { Player::One } else { Player::Two };
        self.state = state;
        info!("Game started: client is {}, position {:?}", self.client, self.state);

        if let Some(end) = self.check_game_over() {
            return Ok(end);
        }
        match self.client {
            Player::One => Ok(json!({
                "state": self.state,
                "legal_moves": &*self.state.legal_moves(self.client),
            })),
            Player::Two => self.make_engine_move(),
        }
    }

    fn handle_move(&mut self, mv: Move) -> Result<Value, SessionError> {
        self.state.play_move(&mv, self.client)?;
        self.half_turns += 1;
        info!("Client plays ({}) -> {:?}", mv, self.state);
        match self.check_game_over() {
            Some(end) => Ok(end),
            None => self.make_engine_move(),
        }
    }

    fn make_engine_move(&mut self) -> Result<Value, SessionError> {
        let engine_player = self.client.opponent();
        let result = self.engine.best_move(&mut self.state, engine_player);
        let mv = result.best_move.ok_or(SessionError::NoEngineMove)?;
        self.state.play_move(&mv, engine_player)?;
        self.half_turns += 1;
        info!("Engine plays ({}), score {} -> {:?}", mv, result.score, self.state);

        match self.check_game_over() {
            Some(end) => {
                let mut response = end;
                response["move"] = json!(mv);
                response["score"] = json!(result.score);
                Ok(response)
            }
            None => Ok(json!({
                "move": mv,
                "score": result.score,
                "state": self.state,
                "legal_moves": &*self.state.legal_moves(self.client),
            })),
        }
    }

    fn check_game_over(&mut self) -> Option<Value> {
        let end = match self.state.outcome() {
            Some(outcome) => GameEnd::Finished(outcome),
            None if self.half_turns >= self.config.turn_cap => GameEnd::TurnCap,
            None => return None,
        };
        self.finished = true;
        info!("Game ended ({}) after {} half-turns", end.as_str(), self.half_turns);
        Some(json!({ "end": end.as_str(), "state": self.state }))
    }
}

// Client positions feed the move enumerator and i32 point arithmetic directly.
fn check_start(state: &GameState) -> Result<(), SessionError> {
    if state.scarce_left > SCARCE_SUPPLY {
        return Err(SessionError::InvalidMessage(format!(
            "scarce_left {} exceeds the supply of {}",
            state.scarce_left, SCARCE_SUPPLY
        )));
    }
    if state.coins_p1 > MAX_START_COINS || state.coins_p2 > MAX_START_COINS {
        return Err(SessionError::InvalidMessage(format!(
            "starting coins ({}, {}) above the limit of {}",
            state.coins_p1, state.coins_p2, MAX_START_COINS
        )));
    }
    if state.point_lead.unsigned_abs() > MAX_START_LEAD.unsigned_abs() {
        return Err(SessionError::InvalidMessage(format!(
            "point_lead {} outside ±{}",
            state.point_lead, MAX_START_LEAD
        )));
    }
    Ok(())
}

/// Handles one message, turning failures into an `{"error": ...}` reply.
pub fn respond(session: &Mutex<GameSession>, data: Value) -> Value {
    let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
    match session.handle_message(data) {
        Ok(response) => response,
        Err(e) => {
            error!("Error handling message: {}", e);
            json!({"error": e.to_string()})
        }
    }
}

/// `respond` on tokio's blocking pool, so a deep search never stalls the
/// connection tasks sharing a worker thread.
pub async fn respond_blocking(session: Arc<Mutex<GameSession>>, data: Value) -> Value {
    match tokio::task::spawn_blocking(move || respond(&session, data)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Engine task failed: {}", e);
            json!({"error": format!("engine task failed: {}", e)})
        }
    }
}
