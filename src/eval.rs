//! Position scoring from player 1's point of view.
//!
//! Scores live in three bands on one scalar: player-1 forced wins above
//! `WIN_BASE`, heuristic estimates in `[0, 1]`, and player-2 forced wins below
//! `-WIN_BASE`. A drawn finish sits at the heuristic midpoint.

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::board::{GameState, Outcome, Player, BIG_COST, BIG_POINTS, COINS_PER_INCOME};

/// Above the logistic's range, including its `f64` saturation at exactly 1.0.
pub const WIN_BASE: f64 = 2.0;
pub const TIE_SCORE: f64 = 0.5;

const POINT_VALUE_SCALE: f64 = 0.2 * 9.0;
const POINT_VALUE_OFFSET: f64 = 5.0;
const INCOME_VALUE: f64 = 1.0;
const INCOME_PER_COIN: f64 = 1.0 / COINS_PER_INCOME as f64;
const COINS_PER_POINT: f64 = BIG_COST as f64 / BIG_POINTS as f64;
const SQUASH_GAIN: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(pub f64);

impl Score {
    pub const NEG_INFINITY: Score = Score(f64::NEG_INFINITY);
    pub const INFINITY: Score = Score(f64::INFINITY);
    pub const TIE: Score = Score(TIE_SCORE);

    /// `depth` is the horizon still unused, so quicker wins score higher.
    pub fn player1_win(depth: u32) -> Self {
        Score(WIN_BASE + depth as f64)
    }

    pub fn player2_win(depth: u32) -> Self {
        Score(-WIN_BASE - depth as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn forced_outcome(self) -> Option<Outcome> {
        if self.0 >= WIN_BASE {
            Some(Outcome::Player1Wins)
        } else if self.0 <= -WIN_BASE {
            Some(Outcome::Player2Wins)
        } else {
            None
        }
    }

    pub fn max(self, other: Score) -> Score {
        if other > self { other } else { self }
    }

    pub fn min(self, other: Score) -> Score {
        if other < self { other } else { self }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.forced_outcome() {
            Some(Outcome::Player1Wins) => write!(f, "player 1 wins (+{})", self.0 - WIN_BASE),
            Some(_) => write!(f, "player 2 wins (+{})", -self.0 - WIN_BASE),
            None => write!(f, "{:.4}", self.0),
        }
    }
}

pub fn terminal_score(outcome: Outcome, depth: u32) -> Score {
    match outcome {
        Outcome::Player1Wins => Score::player1_win(depth),
        Outcome::Player2Wins => Score::player2_win(depth),
        Outcome::Tie => Score::TIE,
    }
}

/// Points weigh more as the scarce pool drains: fewer turns remain to answer them.
pub fn marginal_point_value(scarce_left: u32) -> f64 {
    POINT_VALUE_SCALE / (scarce_left as f64 + POINT_VALUE_OFFSET)
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Estimated probability that player 1 wins from a non-terminal position.
pub fn heuristic(state: &GameState, to_move: Player) -> Score {
    let point_value = marginal_point_value(state.scarce_left);
    let point_term = state.point_lead as f64 * point_value;
    let income_term = INCOME_VALUE * (state.coins_p1 as f64 - state.coins_p2 as f64);

    // player 2 answers next: credit them the better of points or income
    let initiative_term = match to_move {
        Player::One => {
            let coins = state.coins_p2 as f64;
            let as_points = coins / COINS_PER_POINT * point_value;
            let as_income = coins * INCOME_PER_COIN * INCOME_VALUE;
            -as_points.max(as_income)
        }
        Player::Two => 0.0,
    };

    Score(logistic(SQUASH_GAIN * (point_term + income_term + initiative_term)))
}

/// Terminal score when the game is over, otherwise the heuristic.
pub fn evaluate(state: &GameState, to_move: Player, depth: u32) -> Score {
    match state.outcome() {
        Some(outcome) => terminal_score(outcome, depth),
        None => heuristic(state, to_move),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn balanced_position_is_the_tie_midpoint() {
        let state = GameState::new();
        assert_eq!(heuristic(&state, Player::Two), Score::TIE);
    }

    #[test]
    fn player1_to_move_concedes_player2_initiative() {
        // 5 coins: income option 1.0 beats points option 5 * 0.75 * 1.8 / 13
        let value = heuristic(&GameState::new(), Player::One).value();
        assert!((value - logistic(-0.5)).abs() < EPS);
    }

    #[test]
    fn initiative_prefers_points_late() {
        // one scarce left: points option 10 * 0.75 * 0.3 = 2.25 beats income 2.0
        let state = GameState::with(0, 10, 10, 1);
        let value = heuristic(&state, Player::One).value();
        assert!((value - logistic(-0.5 * 2.25)).abs() < EPS);
    }

    #[test]
    fn heuristic_is_monotone_in_lead_and_income() {
        let base = GameState::with(0, 8, 8, 5);
        let ahead = GameState::with(3, 8, 8, 5);
        let richer = GameState::with(0, 9, 8, 5);
        for to_move in [Player::One, Player::Two] {
            assert!(heuristic(&ahead, to_move) > heuristic(&base, to_move));
            assert!(heuristic(&richer, to_move) > heuristic(&base, to_move));
        }
    }

    #[test]
    fn same_lead_matters_more_near_the_end() {
        let early = GameState::with(6, 8, 8, 7);
        let late = GameState::with(6, 8, 8, 1);
        assert!(heuristic(&late, Player::Two) > heuristic(&early, Player::Two));
    }

    #[test]
    fn forced_outcomes_dominate_saturated_heuristics() {
        let crushing = GameState::with(10_000, 10_000, 0, 1);
        let hopeless = GameState::with(-10_000, 0, 10_000, 1);
        assert!(Score::player1_win(0) > heuristic(&crushing, Player::Two));
        assert!(Score::player2_win(0) < heuristic(&hopeless, Player::One));
        assert!(heuristic(&hopeless, Player::One) >= Score(0.0));
    }

    #[test]
    fn quicker_wins_rank_further_out() {
        assert!(Score::player1_win(3) > Score::player1_win(2));
        assert!(Score::player2_win(3) < Score::player2_win(2));
        assert_eq!(Score::player1_win(1).forced_outcome(), Some(Outcome::Player1Wins));
        assert_eq!(Score::player2_win(0).forced_outcome(), Some(Outcome::Player2Wins));
        assert_eq!(Score::TIE.forced_outcome(), None);
    }

    #[test]
    fn terminal_positions_ignore_economy() {
        let state = GameState::with(0, 40, 5, 0);
        assert_eq!(evaluate(&state, Player::One, 4), Score::TIE);
        let state = GameState::with(-1, 40, 5, 0);
        assert_eq!(evaluate(&state, Player::One, 4), Score::player2_win(4));
    }
}
