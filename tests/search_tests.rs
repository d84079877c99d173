use economy_engine::eval::{heuristic, terminal_score};
use economy_engine::{
    best_move, self_play, GameEnd, GameState, Move, Outcome, Player, Score, SearchConfig,
};

/// Plain minimax over the same tree, no pruning.
fn minimax(state: &mut GameState, player: Player, depth: u32) -> Score {
    if let Some(outcome) = state.outcome() {
        return terminal_score(outcome, depth);
    }
    if depth == 0 {
        return heuristic(state, player);
    }
    let mut best = match player {
        Player::One => Score::NEG_INFINITY,
        Player::Two => Score::INFINITY,
    };
    for mv in state.legal_moves(player).iter() {
        state.apply_move(mv, player);
        let value = minimax(state, player.opponent(), depth - 1);
        state.undo_move(mv, player);
        best = match player {
            Player::One => best.max(value),
            Player::Two => best.min(value),
        };
    }
    best
}

#[test]
fn pruning_matches_plain_minimax() {
    let positions = [
        (GameState::with(0, 8, 8, 1), 2),
        (GameState::new(), 4),
        (GameState::with(0, 12, 8, 8), 4),
        (GameState::with(3, 13, 9, 3), 4),
        (GameState::with(-6, 16, 10, 2), 5),
        (GameState::with(0, 21, 17, 8), 3),
    ];
    for (start, depth) in positions {
        for player in [Player::One, Player::Two] {
            let mut state = start;
            let expected = minimax(&mut state, player, depth);
            let result = best_move(&mut state, player, depth);
            assert_eq!(result.score, expected, "{:?} {:?} depth {}", start, player, depth);
            assert_eq!(state, start, "search must restore the position");
        }
    }
}

#[test]
fn best_move_reaches_its_score() {
    let mut state = GameState::with(3, 13, 9, 3);
    let result = best_move(&mut state, Player::One, 4);
    let mv = result.best_move.expect("live position has a move");
    state.apply_move(&mv, Player::One);
    assert_eq!(minimax(&mut state, Player::Two, 3), result.score);
}

#[test]
fn scarce_unit_decides_small_game() {
    let mut state = GameState::with(0, 8, 8, 1);
    let result = best_move(&mut state, Player::One, 2);
    assert_eq!(result.score, Score::player1_win(1));
    assert_eq!(result.best_move, Some(Move::new(1, 0, 0)));
}

#[test]
fn documented_opening_builds_income_then_wins() {
    let start = GameState::with(0, 12, 8, 8);
    let config = SearchConfig { horizon_depth: 12, turn_cap: 20 };

    let mut root = start;
    let opening = best_move(&mut root, Player::One, config.horizon_depth);
    assert_eq!(opening.best_move, Some(Move::new(0, 0, 12)));
    assert_eq!(opening.score.forced_outcome(), Some(Outcome::Player1Wins));

    let record = self_play(start, Player::One, &config);
    assert_eq!(record.turns[0].mv, Move::new(0, 0, 12));
    assert_eq!(record.end, GameEnd::Finished(Outcome::Player1Wins));
    assert_eq!(record.final_state.scarce_left, 0);
    assert!(record.final_state.point_lead > 0);
    assert_eq!(record.turns.len(), 11);

    // the loser never hastens the end
    for turn in record.turns.iter().filter(|turn| turn.player == Player::Two) {
        assert_eq!(turn.mv.big_buys, 0, "{:?}", turn);
    }
}

#[test]
fn default_game_runs_into_turn_cap() {
    let config = SearchConfig { horizon_depth: 4, turn_cap: 20 };
    let record = self_play(GameState::new(), Player::One, &config);
    assert_eq!(record.end, GameEnd::TurnCap);
    assert_eq!(record.turns.len(), 20);
    assert_eq!(record.final_state.scarce_left, 8);
}
