/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Action, Board, TTable};

/// A game in progress: a [`Board`] plus the log of actions applied to it.
///
/// The log supports linear undo/redo. `cur_hist` counts how many actions of `history` are
/// currently applied; executing a new action after undoing discards the undone tail.
#[derive(Debug)]
pub struct State {
    board: Board,
    history: Vec<Action>,
    cur_hist: usize,

    /// Move-ordering cache for the search, allocated on first use.
    ttable: Option<TTable>,
}

impl State {
    /// Wraps `board` in a new game state with an empty history.
    #[inline(always)]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
            cur_hist: 0,
            ttable: None,
        }
    }

    /// The current board.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board, for searches that execute and undo actions on it.
    #[inline(always)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Every action currently applied, in the order it was executed.
    #[inline(always)]
    pub fn history(&self) -> &[Action] {
        &self.history[..self.cur_hist]
    }

    /// The most recently applied action, if any.
    #[inline(always)]
    pub fn last_action(&self) -> Option<&Action> {
        self.history().last()
    }

    #[inline(always)]
    pub fn can_undo(&self) -> bool {
        self.cur_hist > 0
    }

    #[inline(always)]
    pub fn can_redo(&self) -> bool {
        self.cur_hist < self.history.len()
    }

    /// The transposition table of this game, created empty if this is its first use.
    #[inline(always)]
    pub fn ttable_mut(&mut self) -> &mut TTable {
        self.ttable.get_or_insert_with(TTable::default)
    }

    /// The transposition table of this game, if one has been created.
    #[inline(always)]
    pub fn ttable(&self) -> Option<&TTable> {
        self.ttable.as_ref()
    }

    /// Splits the state into its board and its transposition table, so both can be used at once.
    #[inline(always)]
    pub fn board_and_ttable(&mut self) -> (&mut Board, &mut TTable) {
        let ttable = self.ttable.get_or_insert_with(TTable::default);
        (&mut self.board, ttable)
    }

    /// Applies `action` and appends it to the history, discarding anything that could have been redone.
    pub fn execute(&mut self, mut action: Action) {
        self.history.truncate(self.cur_hist);
        action.execute(&mut self.board);
        self.history.push(action);
        self.cur_hist += 1;

        log::trace!("Executed {action}\n{}", self.board);
    }

    /// Reverts the most recent action.
    ///
    /// Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }

        self.cur_hist -= 1;
        self.history[self.cur_hist].undo(&mut self.board);
        true
    }

    /// Re-applies the most recently undone action.
    ///
    /// Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }

        self.history[self.cur_hist].execute(&mut self.board);
        self.cur_hist += 1;
        true
    }

    /// Undoes the most recent turn.
    ///
    /// A chain of captures by the same piece is undone as a whole.
    /// Returns the number of actions undone.
    pub fn undo_turn(&mut self) -> usize {
        let mut undone = 0;

        while self.undo() {
            undone += 1;

            // Keep going while the previous action was a capture that kept the turn
            let continues_chain = matches!(
                self.last_action(),
                Some(Action::Capture {
                    changed_turn: false,
                    ..
                })
            );
            if !continues_chain {
                break;
            }
        }

        undone
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.board.fmt(f)
    }
}
