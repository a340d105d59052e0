/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Reversible state-changing operations (moves and captures).
mod action;

/// Cell coordinates, players, and direction sets.
mod cell;

/// Errors produced by the board.
mod error;

/// The grid, legality, and terminal-state detection.
mod grid;

/// Move-generation validation.
mod perft;

/// Zobrist hashing of positions.
mod zobrist;

pub use action::*;
pub use cell::*;
pub use error::*;
pub use grid::*;
pub use perft::*;
pub use zobrist::*;
