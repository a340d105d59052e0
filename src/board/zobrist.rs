/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::Player;

/// Seed of the generator that fills every [`ZobristTable`].
///
/// Keys are drawn in the same order for every table, so a smaller table is a prefix of a larger one.
const ZOBRIST_SEED: u64 = 0x616c_7175_6572_7175;

/// Represents a key generated from a Zobrist hash of a grid and its side-to-move.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct ZobristKey(u64);

impl ZobristKey {
    /// Generates a [`ZobristKey`] from a grid and the player to move next, using the keys of `table`.
    ///
    /// # Panics
    ///
    /// If `grid` has more cells than `table`.
    pub fn from_parts(table: &ZobristTable, grid: &[Option<Player>], next_player: Player) -> Self {
        let mut key = Self::default();

        for (index, cell) in grid.iter().enumerate() {
            if let Some(player) = cell {
                key.hash(table.piece(index, *player));
            }
        }

        key.hash(table.next_player(next_player));
        key
    }

    /// Return the inner `u64` of this key.
    ///
    /// # Example
    /// ```
    /// # use alquerque::ZobristKey;
    /// let zero = ZobristKey::default();
    /// assert_eq!(zero.inner(), 0);
    /// ```
    #[inline(always)]
    pub fn inner(&self) -> u64 {
        self.0
    }

    /// Adds/removes `hash_key` to this [`ZobristKey`] with XOR.
    ///
    /// # Example
    /// ```
    /// # use alquerque::{Player, ZobristKey, ZobristTable};
    /// let table = ZobristTable::new(9);
    /// let mut key = ZobristKey::default();
    /// key.hash(table.piece(3, Player::One));
    /// assert_ne!(key, ZobristKey::default());
    ///
    /// // Calling again un-hashes it
    /// key.hash(table.piece(3, Player::One));
    /// assert_eq!(key, ZobristKey::default());
    /// ```
    #[inline(always)]
    pub fn hash(&mut self, hash_key: u64) {
        self.0 ^= hash_key;
    }
}

impl fmt::Display for ZobristKey {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Zobrist keys for one board size: one key for every player on every cell, plus the side-to-move.
#[derive(Clone, PartialEq, Eq)]
pub struct ZobristTable {
    piece_keys: Vec<[u64; Player::COUNT]>,

    /// Only [`Player::Two`] to move changes the key.
    player_two_key: u64,
}

impl ZobristTable {
    /// Generates the keys for a board of `cells` cells.
    pub fn new(cells: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let player_two_key = rng.gen();
        let piece_keys = (0..cells).map(|_| rng.gen()).collect();

        Self {
            piece_keys,
            player_two_key,
        }
    }

    /// Number of cells this table has keys for.
    #[inline(always)]
    pub fn cells(&self) -> usize {
        self.piece_keys.len()
    }

    /// The key for a piece of `player` at the linear cell `index`.
    #[inline(always)]
    pub fn piece(&self, index: usize, player: Player) -> u64 {
        self.piece_keys[index][player.index()]
    }

    /// The key for `player` being the side-to-move. [`Player::One`]'s key is 0.
    #[inline(always)]
    pub fn next_player(&self, player: Player) -> u64 {
        match player {
            Player::One => 0,
            Player::Two => self.player_two_key,
        }
    }
}

impl fmt::Debug for ZobristTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZobristTable")
            .field("cells", &self.cells())
            .finish_non_exhaustive()
    }
}
