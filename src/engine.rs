use log::debug;
use crate::board::{GameState, Move, Player};
use crate::eval::{heuristic, terminal_score, Score};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    pub score: Score,
    /// `None` only when the root is already terminal or the horizon is zero.
    pub best_move: Option<Move>,
    pub nodes: u64,
}

/// Depth-limited alpha-beta minimax. Player 1 maximizes, player 2 minimizes.
///
/// The search walks a single `GameState` in place, applying each move before
/// recursing and undoing it afterwards, so the caller's state is unchanged
/// when a search returns.
pub struct Engine {
    horizon_depth: u32,
    nodes: u64,
}

impl Engine {
    pub fn new(horizon_depth: u32) -> Self {
        Self { horizon_depth, nodes: 0 }
    }

    pub fn horizon_depth(&self) -> u32 {
        self.horizon_depth
    }

    pub fn best_move(&mut self, state: &mut GameState, player: Player) -> SearchResult {
        self.nodes = 0;
        let root = *state;
        let (score, best_move) = match player {
            Player::One => {
                self.search_max(state, Score::NEG_INFINITY, Score::INFINITY, self.horizon_depth)
            }
            Player::Two => {
                self.search_min(state, Score::NEG_INFINITY, Score::INFINITY, self.horizon_depth)
            }
        };
        debug_assert_eq!(*state, root, "search left the position modified");
        debug!(
            "{} searched {} nodes at depth {}: score {}, move {:?}",
            player, self.nodes, self.horizon_depth, score, best_move
        );
        SearchResult { score, best_move, nodes: self.nodes }
    }

    fn search_max(
        &mut self,
        state: &mut GameState,
        mut alpha: Score,
        beta: Score,
        depth: u32,
    ) -> (Score, Option<Move>) {
        self.nodes += 1;
        if let Some(outcome) = state.outcome() {
            return (terminal_score(outcome, depth), None);
        }
        if depth == 0 {
            return (heuristic(state, Player::One), None);
        }

        let mut best_value = Score::NEG_INFINITY;
        let mut best_move = None;
        for mv in state.legal_moves(Player::One).iter() {
            state.apply_move(mv, Player::One);
            let (value, _) = self.search_min(state, alpha, beta, depth - 1);
            state.undo_move(mv, Player::One);

            // strict: the earliest move in enumeration order keeps ties
            if value > best_value {
                best_value = value;
                best_move = Some(*mv);
            }
            if best_value >= beta {
                break;
            }
            alpha = alpha.max(best_value);
        }
        assert!(best_move.is_some(), "no move searched for player 1 at {state:?}");
        (best_value, best_move)
    }

    fn search_min(
        &mut self,
        state: &mut GameState,
        alpha: Score,
        mut beta: Score,
        depth: u32,
    ) -> (Score, Option<Move>) {
        self.nodes += 1;
        if let Some(outcome) = state.outcome() {
            return (terminal_score(outcome, depth), None);
        }
        if depth == 0 {
            return (heuristic(state, Player::Two), None);
        }

        let mut best_value = Score::INFINITY;
        let mut best_move = None;
        for mv in state.legal_moves(Player::Two).iter() {
            state.apply_move(mv, Player::Two);
            let (value, _) = self.search_max(state, alpha, beta, depth - 1);
            state.undo_move(mv, Player::Two);

            if value < best_value {
                best_value = value;
                best_move = Some(*mv);
            }
            if best_value <= alpha {
                break;
            }
            beta = beta.min(best_value);
        }
        assert!(best_move.is_some(), "no move searched for player 2 at {state:?}");
        (best_value, best_move)
    }
}

/// One-shot search with a fresh engine.
pub fn best_move(state: &mut GameState, player: Player, horizon_depth: u32) -> SearchResult {
    Engine::new(horizon_depth).best_move(state, player)
}
