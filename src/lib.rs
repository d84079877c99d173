//! Alpha-beta minimax for a two-player deckbuilding economy.
//!
//! Each turn a player spends their income on scarce 8-coin purchases worth 6
//! points, unlimited 5-coin purchases worth 3 points, or banks the rest as
//! income (one unit per 5 coins). The game ends when the 8 scarce units are
//! gone; the point lead decides the winner.
//!
//! - `board`: game state, moves, cached move enumeration, apply/undo
//! - `eval`: banded scores, terminal scoring, horizon heuristic
//! - `engine`: the alpha-beta search
//! - `driver`: self-play turn loop and search configuration
//! - `session`: JSON protocol for a client playing against the engine

pub mod board;
pub mod eval;
pub mod engine;
pub mod driver;
pub mod session;

pub use crate::board::{legal_moves, GameState, Move, MoveError, Outcome, Player};
pub use crate::eval::Score;
pub use crate::engine::{best_move, Engine, SearchResult};
pub use crate::driver::{self_play, GameEnd, GameRecord, SearchConfig, Turn};
pub use crate::session::{GameSession, SessionError};
