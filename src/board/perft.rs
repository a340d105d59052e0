/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Board;

/// Recursively executes every legal action until `depth` is reached, returning the number of positions reached.
///
/// Positions where the game has ended count as leaves. Every action is undone after use,
/// so `board` is left exactly as it was given.
///
/// If `SPLIT` is `true`, the count below each root action is logged at `info` level.
///
/// # Example
/// ```
/// # use alquerque::{perft, Board};
/// let mut board = Board::new(5, 5).unwrap();
/// assert_eq!(perft::<false>(&mut board, 1), 4);
/// ```
pub fn perft<const SPLIT: bool>(board: &mut Board, depth: usize) -> u64 {
    if depth == 0 || board.is_terminal().is_over() {
        return 1;
    }

    let mut nodes = 0;
    for mut action in board.valid_actions() {
        action.execute(board);
        let new_nodes = perft::<false>(board, depth - 1);
        action.undo(board);

        if SPLIT {
            log::info!("{action}: {new_nodes}");
        }

        nodes += new_nodes;
    }

    nodes
}
