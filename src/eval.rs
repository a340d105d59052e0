/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::bail;

use crate::{Board, Player, Score};

/// A static evaluation of a position.
///
/// Evaluations are always from [`Player::One`]'s perspective: a high number is good for player one,
/// and a low number is good for player two. The search orients them to whichever player it searches for.
pub trait Evaluate {
    fn evaluate(&self, board: &Board) -> f64;
}

impl<F> Evaluate for F
where
    F: Fn(&Board) -> f64,
{
    #[inline(always)]
    fn evaluate(&self, board: &Board) -> f64 {
        self(board)
    }
}

/// The built-in evaluation functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    /// Difference between player one's and player two's piece counts.
    #[default]
    PieceCount,

    /// Difference between the number of pieces each player has on the border of the board.
    Border,
}

impl Heuristic {
    /// Every built-in heuristic.
    pub const ALL: [Self; 2] = [Self::PieceCount, Self::Border];

    /// A short, stable name for this heuristic.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PieceCount => "piece-count",
            Self::Border => "border",
        }
    }
}

impl Evaluate for Heuristic {
    #[inline(always)]
    fn evaluate(&self, board: &Board) -> f64 {
        match self {
            Self::PieceCount => piece_count_difference(board),
            Self::Border => border_difference(board),
        }
    }
}

impl FromStr for Heuristic {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "piece-count" | "pieces" | "eval1" => Ok(Self::PieceCount),
            "border" | "eval2" => Ok(Self::Border),
            _ => bail!("unknown heuristic {s:?}"),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Number of player one's pieces minus the number of player two's pieces.
pub fn piece_count_difference(board: &Board) -> f64 {
    board.piece_count(Player::One) as f64 - board.piece_count(Player::Two) as f64
}

/// Number of player one's pieces on the outer ring minus the number of player two's pieces there.
pub fn border_difference(board: &Board) -> f64 {
    let last_col = board.num_cols() - 1;
    let last_row = board.num_rows() - 1;

    board
        .cells()
        .filter(|cell| cell.x == 0 || cell.y == 0 || cell.x == last_col || cell.y == last_row)
        .filter_map(|cell| board.piece_at(cell))
        .map(|player| player.perspective())
        .sum()
}

/// Orients `eval` from player one's perspective to `player`'s.
#[inline(always)]
pub(crate) fn score_for(eval: f64, player: Player) -> Score {
    Score::new(eval * player.perspective())
}
