/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Action, ZobristKey};

/// An entry into a [`TTable`].
#[derive(PartialEq, Clone, Debug)]
pub struct TTableEntry {
    /// Key of the position this entry represents.
    pub key: ZobristKey,

    /// Depth of the search that produced `ordering`.
    pub depth: u8,

    /// Legal actions of the position, best first, for the player to move.
    pub ordering: Vec<Action>,
}

impl TTableEntry {
    #[inline(always)]
    pub fn new(key: ZobristKey, depth: u8, ordering: Vec<Action>) -> Self {
        Self {
            key,
            depth,
            ordering,
        }
    }

    /// Returns `true` if `ordering` is a permutation of `actions`.
    ///
    /// Two positions can share a key, so a hit is only trusted if its actions are exactly the ones being searched.
    pub fn matches(&self, actions: &[Action]) -> bool {
        self.ordering.len() == actions.len() && actions.iter().all(|a| self.ordering.contains(a))
    }
}

/// Transposition Table.
///
/// Caches the move ordering found for a position, so that positions reached again
/// (from a later search, or through a different sequence of actions) are searched best-first.
/// Lives on the [`State`](crate::State), and so lasts for a single game.
#[derive(Debug)]
pub struct TTable {
    /// Internal cache of the TTable.
    cache: Vec<Option<TTableEntry>>,

    /// Number of lookups whose key matched but whose actions did not.
    pub(crate) collisions: usize,

    /// Number of lookups since last clearing.
    pub(crate) accesses: usize,

    /// Number of usable hits since last clearing.
    pub(crate) hits: usize,
}

impl TTable {
    /// Default number of entries. Must be a power of two.
    pub const DEFAULT_CAPACITY: usize = 1 << 16;

    /// Create a new [`TTable`] that can hold `capacity` entries, rounded up to a power of two.
    #[inline(always)]
    pub fn from_capacity(capacity: usize) -> Self {
        Self {
            cache: vec![None; capacity.max(1).next_power_of_two()],
            collisions: 0,
            accesses: 0,
            hits: 0,
        }
    }

    /// Clears the entries of this [`TTable`].
    #[inline(always)]
    pub fn clear(&mut self) {
        self.cache.iter_mut().for_each(|entry| *entry = None);
        self.collisions = 0;
        self.accesses = 0;
        self.hits = 0;
    }

    /// Returns the number of entries that can fit within this [`TTable`]
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.cache.len()
    }

    /// Returns the number of `Some` entries in this [`TTable`].
    #[inline(always)]
    pub fn num_entries(&self) -> usize {
        self.cache.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns `(hits, accesses, collisions)` since the table was last cleared.
    #[inline(always)]
    pub fn stats(&self) -> (usize, usize, usize) {
        (self.hits, self.accesses, self.collisions)
    }

    /// Map `key` to an index into this [`TTable`].
    #[inline(always)]
    fn index(&self, key: &ZobristKey) -> usize {
        key.inner() as usize & (self.capacity() - 1)
    }

    /// Get the entry if and only if it matches the provided key.
    #[inline(always)]
    pub fn get(&self, key: &ZobristKey) -> Option<&TTableEntry> {
        self.cache[self.index(key)]
            .as_ref()
            .filter(|e| &e.key == key)
    }

    /// Looks up the ordering cached for `key`, as long as it orders exactly `actions`.
    ///
    /// Updates the table's statistics.
    pub fn probe(&mut self, key: &ZobristKey, actions: &[Action]) -> Option<Vec<Action>> {
        self.accesses += 1;

        let index = self.index(key);
        let entry = self.cache[index].as_ref().filter(|e| &e.key == key)?;

        if entry.matches(actions) {
            self.hits += 1;
            Some(entry.ordering.clone())
        } else {
            self.collisions += 1;
            None
        }
    }

    /// Stores `entry`, unless an entry for the same key already holds an ordering at least as deep.
    ///
    /// Entries for other keys sharing the slot are replaced. Returns `true` if `entry` was stored.
    pub fn store(&mut self, entry: TTableEntry) -> bool {
        let index = self.index(&entry.key);
        let slot = &mut self.cache[index];

        if let Some(old) = slot {
            if old.key == entry.key && old.depth >= entry.depth {
                return false;
            }
        }

        *slot = Some(entry);
        true
    }
}

impl Default for TTable {
    #[inline(always)]
    fn default() -> Self {
        Self::from_capacity(Self::DEFAULT_CAPACITY)
    }
}
