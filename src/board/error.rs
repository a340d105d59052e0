/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Errors raised when constructing or accessing a [`Board`](super::Board).
///
/// All of these signal a programming or input error, never a regular game condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no such cell x:{x} y:{y}")]
    OutOfBounds { x: isize, y: isize },

    #[error("num_rows({rows}) and num_cols({cols}) must be odd")]
    EvenDimensions { rows: usize, cols: usize },

    #[error("grid has {found} cells, but the board needs {expected}")]
    GridSizeMismatch { expected: usize, found: usize },

    #[error("invalid piece value {value} at cell index {index}")]
    InvalidPiece { index: usize, value: u8 },

    #[error("invalid player {0}, expected 1 or 2")]
    InvalidPlayer(u8),
}
