/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::BoardError;

/// The four orthogonal directions. Every piece may move along these.
pub const ORTHOGONAL_DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// The four diagonal directions. Only pieces on even cells may move along these.
pub const DIAGONAL_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (1, 1), (-1, 1), (1, -1)];

/// One of the two sides of a game.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Number of players.
    pub const COUNT: usize = 2;

    /// Returns the other player.
    ///
    /// # Example
    /// ```
    /// # use alquerque::Player;
    /// assert_eq!(Player::One.opponent(), Player::Two);
    /// assert_eq!(Player::Two.opponent(), Player::One);
    /// ```
    #[inline(always)]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// The numeric value of this player's pieces on the grid (`1` or `2`).
    #[inline(always)]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based index, for lookup tables.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Multiplier that orients a score computed from [`Player::One`]'s perspective to `self`'s perspective.
    #[inline(always)]
    pub const fn perspective(self) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Two => -1.0,
        }
    }

    /// Converts a piece value of a grid cell into an optional player.
    ///
    /// `0` is an empty cell.
    #[inline(always)]
    pub fn from_piece_value(value: u8) -> Option<Option<Self>> {
        match value {
            0 => Some(None),
            1 => Some(Some(Self::One)),
            2 => Some(Some(Self::Two)),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = BoardError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(BoardError::InvalidPlayer(value)),
        }
    }
}

impl fmt::Display for Player {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// Coordinates of a cell on a [`Board`](super::Board).
///
/// `x` is the column and `y` is the row, both starting at the top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    /// Creates a new [`Cell`] at column `x` and row `y`.
    #[inline(always)]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns `true` if `x + y` is even.
    ///
    /// Pieces on even cells may also move diagonally.
    ///
    /// # Example
    /// ```
    /// # use alquerque::Cell;
    /// assert!(Cell::new(0, 0).is_even());
    /// assert!(!Cell::new(1, 0).is_even());
    /// assert!(Cell::new(3, 1).is_even());
    /// ```
    #[inline(always)]
    pub const fn is_even(&self) -> bool {
        (self.x + self.y) % 2 == 0
    }

    /// Directions a piece standing on this cell may travel along.
    #[inline(always)]
    pub fn directions(&self) -> impl Iterator<Item = (isize, isize)> {
        let diagonals: &[(isize, isize)] = if self.is_even() {
            &DIAGONAL_DIRECTIONS
        } else {
            &[]
        };

        ORTHOGONAL_DIRECTIONS
            .into_iter()
            .chain(diagonals.iter().copied())
    }

    /// Returns the cell `steps` steps away along `dir`, if its coordinates are non-negative.
    ///
    /// Upper bounds are checked by the board.
    #[inline(always)]
    pub fn offset(&self, dir: (isize, isize), steps: isize) -> Option<Self> {
        let x = self.x.checked_add_signed(dir.0 * steps)?;
        let y = self.y.checked_add_signed(dir.1 * steps)?;
        Some(Self::new(x, y))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_by_parity() {
        assert_eq!(Cell::new(2, 2).directions().count(), 8);
        assert_eq!(Cell::new(1, 2).directions().count(), 4);

        let odd: Vec<_> = Cell::new(0, 1).directions().collect();
        assert!(
            odd.iter().all(|(dx, dy)| dx.abs() + dy.abs() == 1),
            "Odd cells must only produce orthogonal directions, got {odd:?}"
        );
    }

    #[test]
    fn test_offset() {
        let c = Cell::new(1, 1);
        assert_eq!(c.offset((1, 1), 2), Some(Cell::new(3, 3)));
        assert_eq!(c.offset((-1, 0), 1), Some(Cell::new(0, 1)));
        assert_eq!(c.offset((-1, 0), 2), None);
        assert_eq!(c.offset((0, -1), 2), None);
    }

    #[test]
    fn test_player_values() {
        assert_eq!(Player::try_from(1).unwrap(), Player::One);
        assert_eq!(Player::try_from(2).unwrap(), Player::Two);
        assert!(Player::try_from(3).is_err());
        assert_eq!(Player::from_piece_value(0), Some(None));
        assert_eq!(Player::from_piece_value(7), None);
        assert_eq!(Player::Two.opponent().value(), 3 - Player::Two.value());
    }
}
