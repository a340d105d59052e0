/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use alquerque::{initial_grid, Action, Board, Cell, Outcome, Player, State, FORCED_CAPTURE_GRID};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Plays random games from the start of a `rows` x `cols` board, calling `check` before every action.
fn random_playouts(rows: usize, cols: usize, games: u64, mut check: impl FnMut(&mut State, Action)) {
    for seed in 0..games {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = State::new(Board::new(rows, cols).unwrap());

        for _ in 0..200 {
            if state.board().is_terminal().is_over() {
                break;
            }

            let actions = state.board().valid_actions();
            let Some(&action) = actions.choose(&mut rng) else {
                break;
            };

            check(&mut state, action);
            state.execute(action);
        }
    }
}

#[test]
fn test_initial_layout() {
    for rows in (1..=11).step_by(2) {
        for cols in (1..=11).step_by(2) {
            let grid = initial_grid(rows, cols).unwrap();
            let empty = grid.iter().filter(|cell| cell.is_none()).count();
            let ones = grid.iter().filter(|&&cell| cell == Some(Player::One)).count();
            let twos = grid.iter().filter(|&&cell| cell == Some(Player::Two)).count();

            assert_eq!(grid.len(), rows * cols);
            assert_eq!(empty, 1, "{rows}x{cols} must have exactly one empty cell");
            assert_eq!(grid[rows * cols / 2], None, "{rows}x{cols} must be empty at the center");
            assert_eq!(ones, twos);
        }
    }
}

#[test]
fn test_forced_capture_example() {
    let mut state = State::new(Board::from_grid(5, 5, Player::Two, &FORCED_CAPTURE_GRID).unwrap());
    let actions = state.board().valid_actions();

    assert!(!actions.is_empty());
    assert!(
        actions.iter().all(Action::is_capture),
        "Player two must capture, but got {actions:?}"
    );

    state.execute(actions[0]);
    assert_ne!(state.board().piece_values(), FORCED_CAPTURE_GRID.to_vec());

    assert!(state.undo());
    assert_eq!(state.board().piece_values(), FORCED_CAPTURE_GRID.to_vec());
    assert_eq!(state.board().next_player(), Player::Two);
}

#[test]
fn test_captures_exclude_moves() {
    random_playouts(5, 5, 50, |state, _| {
        let actions = state.board().valid_actions();
        if actions.iter().any(Action::is_capture) {
            assert!(
                actions.iter().all(Action::is_capture),
                "Moves offered alongside captures on\n{}",
                state.board()
            );
        }
    });
}

#[test]
fn test_execute_undo_round_trip() {
    for (rows, cols) in [(3, 3), (5, 5), (7, 7), (5, 9)] {
        random_playouts(rows, cols, 20, |state, action| {
            let before = state.board().clone();

            state.execute(action);
            assert!(state.undo());
            assert_eq!(state.board(), &before, "Undoing {action} did not restore the board");
            assert_eq!(state.board().key(), before.key());
        });
    }
}

#[test]
fn test_capture_chain_unwinds_one_step_at_a_time() {
    #[rustfmt::skip]
    let grid = [
        1, 2, 0, 2, 0,
        0, 0, 0, 0, 0,
        0, 0, 0, 0, 0,
        0, 0, 0, 0, 0,
        0, 0, 0, 0, 2,
    ];
    let start = Board::from_grid(5, 5, Player::One, &grid).unwrap();
    let mut state = State::new(start.clone());

    let first = state.board().valid_actions();
    assert_eq!(first, vec![Action::new_capture(Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0))]);
    state.execute(first[0]);
    let mid_chain = state.board().clone();
    assert_eq!(mid_chain.next_player(), Player::One, "The hunter can capture again");

    let second = state.board().valid_actions();
    assert_eq!(second.len(), 1);
    state.execute(second[0]);
    assert_eq!(state.board().next_player(), Player::Two);

    assert!(state.undo());
    assert_eq!(state.board(), &mid_chain);
    assert!(state.undo());
    assert_eq!(state.board(), &start);
}

#[test]
fn test_terminal_detection() {
    let no_twos = Board::from_grid(3, 3, Player::Two, &[1, 0, 0, 0, 0, 0, 0, 0, 1]).unwrap();
    assert_eq!(no_twos.is_terminal(), Outcome::Winner(Player::One));
    assert_eq!(no_twos.is_terminal().code(), 1);

    let no_ones = Board::from_grid(3, 3, Player::One, &[0, 0, 0, 0, 2, 0, 0, 0, 0]).unwrap();
    assert_eq!(no_ones.is_terminal(), Outcome::Winner(Player::Two));

    // One piece each, too far apart to capture
    let standoff = Board::from_grid(3, 3, Player::One, &[1, 0, 0, 0, 0, 0, 0, 0, 2]).unwrap();
    assert_eq!(standoff.is_terminal(), Outcome::Draw);
    assert_eq!(standoff.is_terminal().code(), 3);

    // One piece each, but the side to move can capture
    let hunt = Board::from_grid(3, 3, Player::One, &[1, 2, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    assert_eq!(hunt.is_terminal(), Outcome::Ongoing);
    assert_eq!(hunt.is_terminal().code(), 0);
}

#[test]
fn test_redo_replays_history() {
    let mut state = State::new(Board::new(5, 5).unwrap());
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..10 {
        if state.board().is_terminal().is_over() {
            break;
        }
        if let Some(&action) = state.board().valid_actions().choose(&mut rng) {
            state.execute(action);
        }
    }

    let end = state.board().clone();
    let played = state.history().len();

    while state.undo() {}
    assert_eq!(state.board(), &Board::new(5, 5).unwrap());

    while state.redo() {}
    assert_eq!(state.board(), &end);
    assert_eq!(state.history().len(), played);
}
