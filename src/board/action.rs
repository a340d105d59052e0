/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use super::{Board, Cell};

/// Everything that changes a [`Board`].
///
/// An action is generated by [`Board::valid_actions`] or [`Board::piece_actions`], applied with
/// [`Action::execute`], and reverted with [`Action::undo`]. Undoing must happen on the exact board
/// the action was executed on, with every later action already undone.
#[derive(Clone, Copy, Debug, Eq)]
pub enum Action {
    /// Slides a piece onto an adjacent empty cell.
    Move {
        source: Cell,
        dest: Cell,

        /// Whether the turn passes to the other player. Only `false` when moving the hunter of a capture.
        change_player: bool,
    },

    /// Jumps over an adjacent opponent piece onto the empty cell behind it, removing the opponent piece.
    Capture {
        hunter: Cell,
        target: Cell,
        dest: Cell,

        /// Set by [`Action::execute`]: whether the turn passed to the other player.
        ///
        /// The turn is kept when the hunter can capture again from `dest`.
        changed_turn: bool,
    },
}

impl Action {
    /// Creates a standalone [`Action::Move`] that passes the turn.
    #[inline(always)]
    pub const fn new_move(source: Cell, dest: Cell) -> Self {
        Self::Move {
            source,
            dest,
            change_player: true,
        }
    }

    /// Creates an [`Action::Capture`] that has not been executed yet.
    #[inline(always)]
    pub const fn new_capture(hunter: Cell, target: Cell, dest: Cell) -> Self {
        Self::Capture {
            hunter,
            target,
            dest,
            changed_turn: false,
        }
    }

    /// The cell of the piece performing this action.
    #[inline(always)]
    pub const fn origin(&self) -> Cell {
        match *self {
            Self::Move { source, .. } => source,
            Self::Capture { hunter, .. } => hunter,
        }
    }

    /// The cell where the acting piece ends up.
    #[inline(always)]
    pub const fn destination(&self) -> Cell {
        match *self {
            Self::Move { dest, .. } | Self::Capture { dest, .. } => dest,
        }
    }

    /// The cell of the piece removed by this action, if any.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Cell> {
        match *self {
            Self::Move { .. } => None,
            Self::Capture { target, .. } => Some(target),
        }
    }

    /// Returns `true` if this action is a capture.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        matches!(self, Self::Capture { .. })
    }

    /// Applies this action to `board`.
    ///
    /// A capture flips the turn only if the hunter has no further capture from its landing cell,
    /// and records whether it did so that [`Action::undo`] can revert it.
    ///
    /// # Panics
    ///
    /// If the action's cells are outside of `board`.
    pub fn execute(&mut self, board: &mut Board) {
        match self {
            Self::Move {
                source,
                dest,
                change_player,
            } => {
                let piece = board.piece_at(*source);
                board.place(*source, None);
                board.place(*dest, piece);

                if *change_player {
                    board.toggle_next_player();
                }
            }

            Self::Capture {
                hunter,
                target,
                dest,
                changed_turn,
            } => {
                let piece = board.piece_at(*hunter);
                board.place(*hunter, None);
                board.place(*dest, piece);
                board.place(*target, None);

                // Killing streak: the same player keeps capturing with this piece
                *changed_turn = !board.has_capture_from(*dest);
                if *changed_turn {
                    board.toggle_next_player();
                }
            }
        }
    }

    /// Reverts this action on `board`.
    ///
    /// # Panics
    ///
    /// If the action's cells are outside of `board`, or a capture is undone while its landing cell is empty.
    pub fn undo(&self, board: &mut Board) {
        match *self {
            Self::Move {
                source,
                dest,
                change_player,
            } => {
                let piece = board.piece_at(dest);
                board.place(dest, None);
                board.place(source, piece);

                if change_player {
                    board.toggle_next_player();
                }
            }

            Self::Capture {
                hunter,
                target,
                dest,
                changed_turn,
            } => {
                let Some(hunter_player) = board.piece_at(dest) else {
                    panic!("Attempted to undo capture {self} but {dest} is empty on\n{board}");
                };

                board.place(dest, None);
                board.place(hunter, Some(hunter_player));
                board.place(target, Some(hunter_player.opponent()));

                if changed_turn {
                    board.toggle_next_player();
                }
            }
        }
    }
}

impl PartialEq for Action {
    /// Two actions are equal if they describe the same movement, regardless of their execution record.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Move {
                    source: s1,
                    dest: d1,
                    change_player: c1,
                },
                Self::Move {
                    source: s2,
                    dest: d2,
                    change_player: c2,
                },
            ) => s1 == s2 && d1 == d2 && c1 == c2,

            (
                Self::Capture {
                    hunter: h1,
                    target: t1,
                    dest: d1,
                    ..
                },
                Self::Capture {
                    hunter: h2,
                    target: t2,
                    dest: d2,
                    ..
                },
            ) => h1 == h2 && t1 == t2 && d1 == d2,

            _ => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { source, dest, .. } => write!(f, "{source} -> {dest}"),
            Self::Capture {
                hunter,
                target,
                dest,
                ..
            } => write!(f, "{hunter} x {target} -> {dest}"),
        }
    }
}

/// Executes an [`Action`] on a [`Board`] for as long as the guard lives, undoing it when dropped.
///
/// Dereferences to the board in its post-action state.
/// Guards must be dropped in the reverse order of their creation, which the borrow checker enforces.
pub struct ActionGuard<'a> {
    board: &'a mut Board,
    action: Action,
}

impl<'a> ActionGuard<'a> {
    /// Executes `action` on `board`.
    #[inline(always)]
    pub fn new(board: &'a mut Board, mut action: Action) -> Self {
        action.execute(board);
        Self { board, action }
    }
}

impl Deref for ActionGuard<'_> {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for ActionGuard<'_> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for ActionGuard<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        self.action.undo(self.board);
    }
}
