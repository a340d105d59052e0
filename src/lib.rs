/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Agents that choose actions: random play and search.
mod agent;

/// The rules of the game: grid, actions, and position hashing.
mod board;

/// Command-line interface.
mod cli;

/// Static evaluation of positions.
mod eval;

/// Setting up and running matches and tournaments between agents.
mod game;

/// Numeric scores produced by the search.
mod score;

/// All search related code.
mod search;

/// A game in progress, with its history.
mod state;

/// Transposition table used for move ordering.
mod ttable;

/// Misc constants.
mod utils;

pub use agent::*;
pub use board::*;
pub use cli::*;
pub use eval::*;
pub use game::*;
pub use score::*;
pub use search::*;
pub use state::*;
pub use ttable::*;
pub use utils::*;
