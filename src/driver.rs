use log::info;
use serde::{Deserialize, Serialize};
use crate::board::{GameState, Move, Outcome, Player};
use crate::engine::Engine;
use crate::eval::Score;

pub const DEFAULT_HORIZON_DEPTH: u32 = 8;
pub const DEFAULT_TURN_CAP: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies searched before the heuristic takes over.
    #[serde(default = "default_horizon_depth")]
    pub horizon_depth: u32,
    /// Half-turns played before giving up on a game that never drains the pool.
    #[serde(default = "default_turn_cap")]
    pub turn_cap: u32,
}

fn default_horizon_depth() -> u32 {
    DEFAULT_HORIZON_DEPTH
}

fn default_turn_cap() -> u32 {
    DEFAULT_TURN_CAP
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizon_depth: DEFAULT_HORIZON_DEPTH,
            turn_cap: DEFAULT_TURN_CAP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    Finished(Outcome),
    /// Not an error: unlimited mid buys let some games run forever.
    TurnCap,
}

impl GameEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEnd::Finished(Outcome::Player1Wins) => "player1",
            GameEnd::Finished(Outcome::Player2Wins) => "player2",
            GameEnd::Finished(Outcome::Tie) => "tie",
            GameEnd::TurnCap => "turn_cap",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub player: Player,
    pub mv: Move,
    pub score: Score,
    pub state_after: GameState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameRecord {
    pub turns: Vec<Turn>,
    pub end: GameEnd,
    pub final_state: GameState,
}

/// Plays both sides with the engine until the pool runs dry or the turn cap is hit.
pub fn self_play(start: GameState, first: Player, config: &SearchConfig) -> GameRecord {
    // a zero horizon would only score the root, never pick a move
    let mut engine = Engine::new(config.horizon_depth.max(1));
    let mut state = start;
    let mut player = first;
    let mut turns = Vec::new();

    info!("Starting self-play from {:?} with {} to move, {:?}", state, player, config);
    let end = loop {
        if let Some(outcome) = state.outcome() {
            break GameEnd::Finished(outcome);
        }
        if turns.len() as u32 >= config.turn_cap {
            break GameEnd::TurnCap;
        }

        let result = engine.best_move(&mut state, player);
        let Some(mv) = result.best_move else {
            unreachable!("search of a live position returned no move");
        };
        state.apply_move(&mv, player);
        info!(
            "Turn {}: {} plays ({}), score {}, {} nodes -> {:?}",
            turns.len() + 1, player, mv, result.score, result.nodes, state
        );
        turns.push(Turn { player, mv, score: result.score, state_after: state });
        player = player.opponent();
    };

    match end {
        GameEnd::Finished(outcome) => info!("Game over after {} turns: {:?}", turns.len(), outcome),
        GameEnd::TurnCap => info!("Stopped after {} turns without resolution", turns.len()),
    }
    GameRecord { turns, end, final_state: state }
}
