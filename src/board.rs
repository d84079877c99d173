use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use serde::{Deserialize, Serialize};
use lazy_static::lazy_static;
use thiserror::Error;

pub const BIG_COST: u32 = 8;
pub const BIG_POINTS: u32 = 6;
pub const MID_COST: u32 = 5;
pub const MID_POINTS: u32 = 3;
pub const COINS_PER_INCOME: u32 = 5;
pub const SCARCE_SUPPLY: u32 = 8;
pub const STARTING_COINS: u32 = 5;

lazy_static! {
    // keyed by (budget, min(scarce_left, budget / BIG_COST)); append-only
    static ref MOVE_CACHE: Mutex<HashMap<(u32, u32), Arc<[Move]>>> =
        Mutex::new(HashMap::new());
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => f.write_str("player 1"),
            Player::Two => f.write_str("player 2"),
        }
    }
}

/// One turn's purchases: scarce buys, fixed-value buys, and the coins left
/// over for income.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub big_buys: u32,
    pub mid_buys: u32,
    pub leftover_coins: u32,
}

impl Move {
    pub const fn new(big_buys: u32, mid_buys: u32, leftover_coins: u32) -> Self {
        Self { big_buys, mid_buys, leftover_coins }
    }

    pub fn points(&self) -> u32 {
        BIG_POINTS * self.big_buys + MID_POINTS * self.mid_buys
    }

    /// Permanent income bought with the leftover coins; the remainder is lost.
    pub fn income(&self) -> u32 {
        self.leftover_coins / COINS_PER_INCOME
    }

    pub fn spent(&self) -> u32 {
        BIG_COST * self.big_buys + MID_COST * self.mid_buys
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} big, {} mid, {} left over",
            self.big_buys, self.mid_buys, self.leftover_coins
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[serde(rename = "player1")]
    Player1Wins,
    #[serde(rename = "player2")]
    Player2Wins,
    Tie,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move ({mv}) for budget {budget} with {scarce_left} scarce left")]
    IllegalMove { mv: Move, budget: u32, scarce_left: u32 },
    #[error("game is already over")]
    GameOver,
}

fn enumerate_moves(budget: u32, max_big: u32) -> Arc<[Move]> {
    let mut moves = Vec::new();
    for big_buys in 0..=max_big {
        let after_big = budget - BIG_COST * big_buys;
        for mid_buys in 0..=after_big / MID_COST {
            moves.push(Move::new(big_buys, mid_buys, after_big - MID_COST * mid_buys));
        }
    }
    moves.into()
}

/// Every affordable purchase for `budget`, ordered by ascending big buys
/// then ascending mid buys. Never empty: `(0, 0, budget)` is always legal.
///
/// Any `scarce_left` at or above `budget / BIG_COST` yields the same list, so
/// the cache key is normalized before lookup.
pub fn legal_moves(budget: u32, scarce_left: u32) -> Arc<[Move]> {
    let max_big = scarce_left.min(budget / BIG_COST);
    let mut cache = MOVE_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    cache.entry((budget, max_big))
        .or_insert_with(|| enumerate_moves(budget, max_big))
        .clone()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Player 1's score minus player 2's score.
    pub point_lead: i32,
    pub coins_p1: u32,
    pub coins_p2: u32,
    pub scarce_left: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            point_lead: 0,
            coins_p1: STARTING_COINS,
            coins_p2: STARTING_COINS,
            scarce_left: SCARCE_SUPPLY,
        }
    }

    pub fn with(point_lead: i32, coins_p1: u32, coins_p2: u32, scarce_left: u32) -> Self {
        Self { point_lead, coins_p1, coins_p2, scarce_left }
    }

    pub fn coins(&self, player: Player) -> u32 {
        match player {
            Player::One => self.coins_p1,
            Player::Two => self.coins_p2,
        }
    }

    pub fn legal_moves(&self, player: Player) -> Arc<[Move]> {
        legal_moves(self.coins(player), self.scarce_left)
    }

    pub fn is_game_over(&self) -> bool {
        self.scarce_left == 0
    }

    /// The game ends when the scarce pool runs dry; the point lead decides it.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_game_over() {
            return None;
        }
        Some(match self.point_lead {
            lead if lead > 0 => Outcome::Player1Wins,
            lead if lead < 0 => Outcome::Player2Wins,
            _ => Outcome::Tie,
        })
    }

    /// In-place transition used by the search. `undo_move` with the same
    /// arguments restores the exact prior state.
    pub fn apply_move(&mut self, mv: &Move, player: Player) {
        assert_eq!(
            mv.spent() + mv.leftover_coins,
            self.coins(player),
            "move {mv} does not spend the mover's budget"
        );
        assert!(
            mv.big_buys <= self.scarce_left,
            "move {mv} exceeds the {} scarce left",
            self.scarce_left
        );
        self.scarce_left -= mv.big_buys;
        let points = mv.points() as i32;
        match player {
            Player::One => {
                self.point_lead += points;
                self.coins_p1 += mv.income();
            }
            Player::Two => {
                self.point_lead -= points;
                self.coins_p2 += mv.income();
            }
        }
    }

    pub fn undo_move(&mut self, mv: &Move, player: Player) {
        let points = mv.points() as i32;
        let coins = match player {
            Player::One => {
                self.point_lead -= points;
                &mut self.coins_p1
            }
            Player::Two => {
                self.point_lead += points;
                &mut self.coins_p2
            }
        };
        assert!(*coins >= mv.income(), "undo of {mv} would drive income negative");
        *coins -= mv.income();
        self.scarce_left += mv.big_buys;
    }

    /// Checked, permanent application for drivers advancing the real game.
    pub fn play_move(&mut self, mv: &Move, player: Player) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if !self.legal_moves(player).contains(mv) {
            return Err(MoveError::IllegalMove {
                mv: *mv,
                budget: self.coins(player),
                scarce_left: self.scarce_left,
            });
        }
        self.apply_move(mv, player);
        Ok(())
    }
}
