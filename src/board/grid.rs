/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, sync::Arc};

use super::{Action, ActionGuard, BoardError, Cell, Player, ZobristKey, ZobristTable};

/// Result of inspecting a [`Board`] for the end of the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Outcome {
    /// The game continues.
    Ongoing,

    /// The given player has captured every opposing piece.
    Winner(Player),

    /// Both players are down to a single piece and neither can capture.
    Draw,
}

impl Outcome {
    /// Numeric code of this outcome: `0` ongoing, `1`/`2` for the winning player, `3` for a draw.
    #[inline(always)]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Ongoing => 0,
            Self::Winner(player) => player.value(),
            Self::Draw => 3,
        }
    }

    /// Returns `true` if the game has ended.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Winner(player) => write!(f, "player {player} wins"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Builds the standard starting grid for a `num_rows` by `num_cols` board.
///
/// In row-major order, the first half of the cells (rounded down) belong to [`Player::One`],
/// followed by a single empty center cell, with the remainder belonging to [`Player::Two`].
///
/// # Example
/// ```
/// # use alquerque::{initial_grid, Player};
/// let grid = initial_grid(3, 3).unwrap();
/// assert_eq!(grid.len(), 9);
/// assert_eq!(grid[4], None);
/// assert_eq!(grid[0], Some(Player::One));
/// assert_eq!(grid[8], Some(Player::Two));
/// ```
pub fn initial_grid(num_rows: usize, num_cols: usize) -> Result<Vec<Option<Player>>, BoardError> {
    validate_dimensions(num_rows, num_cols)?;

    let half = num_cols * (num_rows / 2) + num_cols / 2;
    let mut grid = Vec::with_capacity(num_rows * num_cols);
    grid.extend(std::iter::repeat(Some(Player::One)).take(half));
    grid.push(None);
    grid.extend(std::iter::repeat(Some(Player::Two)).take(half));

    debug_assert_eq!(grid.len(), num_rows * num_cols);
    Ok(grid)
}

/// Ensures both dimensions are odd.
fn validate_dimensions(num_rows: usize, num_cols: usize) -> Result<(), BoardError> {
    if num_rows % 2 == 0 || num_cols % 2 == 0 {
        return Err(BoardError::EvenDimensions {
            rows: num_rows,
            cols: num_cols,
        });
    }

    Ok(())
}

/// An odd-by-odd grid of pieces and the player to move next.
///
/// Cells are stored row-major: the cell at column `x` and row `y` lives at index `y * num_cols + x`.
/// The board keeps a [`ZobristKey`] of its contents up to date as pieces and turns change.
/// Clones share the [`ZobristTable`] of the original.
#[derive(Clone, Debug)]
pub struct Board {
    num_rows: usize,
    num_cols: usize,
    grid: Vec<Option<Player>>,
    next_player: Player,
    key: ZobristKey,
    zobrist: Arc<ZobristTable>,
}

// Boards of the same size always have identical tables
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows == other.num_rows
            && self.num_cols == other.num_cols
            && self.next_player == other.next_player
            && self.key == other.key
            && self.grid == other.grid
    }
}

impl Eq for Board {}

impl Board {
    /// Creates a board with the standard starting layout, with [`Player::One`] to move.
    #[inline(always)]
    pub fn new(num_rows: usize, num_cols: usize) -> Result<Self, BoardError> {
        let grid = initial_grid(num_rows, num_cols)?;
        Ok(Self::from_cells(num_rows, num_cols, Player::One, grid))
    }

    /// Creates a board from a flat row-major array of piece values (`0` empty, `1`, or `2`).
    ///
    /// # Example
    /// ```
    /// # use alquerque::{Board, Player};
    /// let board = Board::from_grid(3, 3, Player::Two, &[1, 0, 0, 0, 0, 0, 0, 0, 2]).unwrap();
    /// assert_eq!(board.piece_count(Player::One), 1);
    /// assert!(Board::from_grid(3, 3, Player::One, &[0; 8]).is_err());
    /// ```
    pub fn from_grid(
        num_rows: usize,
        num_cols: usize,
        next_player: Player,
        grid: &[u8],
    ) -> Result<Self, BoardError> {
        validate_dimensions(num_rows, num_cols)?;

        let expected = num_rows * num_cols;
        if grid.len() != expected {
            return Err(BoardError::GridSizeMismatch {
                expected,
                found: grid.len(),
            });
        }

        let cells = grid
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Player::from_piece_value(value).ok_or(BoardError::InvalidPiece { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_cells(num_rows, num_cols, next_player, cells))
    }

    /// Creates a board from either a supplied grid, or the standard layout if `grid` is `None`.
    #[inline(always)]
    pub fn with_options(
        num_rows: usize,
        num_cols: usize,
        next_player: Player,
        grid: Option<&[u8]>,
    ) -> Result<Self, BoardError> {
        match grid {
            Some(grid) => Self::from_grid(num_rows, num_cols, next_player, grid),
            None => {
                let mut board = Self::new(num_rows, num_cols)?;
                if next_player != board.next_player {
                    board.toggle_next_player();
                }
                Ok(board)
            }
        }
    }

    /// Assembles a board from already-validated parts.
    fn from_cells(
        num_rows: usize,
        num_cols: usize,
        next_player: Player,
        grid: Vec<Option<Player>>,
    ) -> Self {
        let zobrist = Arc::new(ZobristTable::new(grid.len()));
        let key = ZobristKey::from_parts(&zobrist, &grid, next_player);
        Self {
            num_rows,
            num_cols,
            grid,
            next_player,
            key,
            zobrist,
        }
    }

    #[inline(always)]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline(always)]
    pub const fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// The player whose turn it is.
    #[inline(always)]
    pub const fn next_player(&self) -> Player {
        self.next_player
    }

    /// The row-major cell contents.
    #[inline(always)]
    pub fn grid(&self) -> &[Option<Player>] {
        &self.grid
    }

    /// The row-major cell contents as piece values (`0`, `1`, `2`).
    pub fn piece_values(&self) -> Vec<u8> {
        self.grid
            .iter()
            .map(|cell| cell.map_or(0, Player::value))
            .collect()
    }

    /// Hash of the grid and the side-to-move.
    #[inline(always)]
    pub const fn key(&self) -> ZobristKey {
        self.key
    }

    /// The keys this board is hashed with.
    #[inline(always)]
    pub fn zobrist(&self) -> &ZobristTable {
        &self.zobrist
    }

    /// The cell in the middle of the board.
    #[inline(always)]
    pub const fn center(&self) -> Cell {
        Cell::new(self.num_cols / 2, self.num_rows / 2)
    }

    /// Iterates over every cell of the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.num_rows).flat_map(move |y| (0..self.num_cols).map(move |x| Cell::new(x, y)))
    }

    /// Bounds check against `[0, num_cols) x [0, num_rows)`.
    #[inline(always)]
    pub fn is_valid_position(&self, x: isize, y: isize) -> bool {
        0 <= x && (x as usize) < self.num_cols && 0 <= y && (y as usize) < self.num_rows
    }

    /// Returns `true` if `cell` lies on this board.
    #[inline(always)]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.num_cols && cell.y < self.num_rows
    }

    /// Returns the piece at column `x` and row `y`.
    pub fn get_piece(&self, x: isize, y: isize) -> Result<Option<Player>, BoardError> {
        if !self.is_valid_position(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }

        Ok(self.piece_at(Cell::new(x as usize, y as usize)))
    }

    /// Places `piece` at column `x` and row `y`, or clears the cell if `piece` is `None`.
    pub fn set_piece(&mut self, x: isize, y: isize, piece: Option<Player>) -> Result<(), BoardError> {
        if !self.is_valid_position(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }

        self.place(Cell::new(x as usize, y as usize), piece);
        Ok(())
    }

    /// Returns the piece at `cell` without a descriptive bounds check.
    ///
    /// # Panics
    ///
    /// If `cell` is not on the board.
    #[inline(always)]
    pub fn piece_at(&self, cell: Cell) -> Option<Player> {
        self.grid[self.index_of(cell)]
    }

    /// Sets the contents of `cell`, keeping the Zobrist key in sync.
    #[inline(always)]
    pub(crate) fn place(&mut self, cell: Cell, piece: Option<Player>) {
        let index = self.index_of(cell);

        if let Some(old) = self.grid[index] {
            self.key.hash(self.zobrist.piece(index, old));
        }
        if let Some(new) = piece {
            self.key.hash(self.zobrist.piece(index, new));
        }

        self.grid[index] = piece;
    }

    /// Executes `action`, returning a guard that undoes it when dropped.
    ///
    /// # Example
    /// ```
    /// # use alquerque::{Board, Player};
    /// let mut board = Board::new(5, 5).unwrap();
    /// let action = board.valid_actions()[0];
    /// {
    ///     let after = board.scoped(action);
    ///     assert_eq!(after.next_player(), Player::Two);
    /// }
    /// assert_eq!(board, Board::new(5, 5).unwrap());
    /// ```
    #[inline(always)]
    pub fn scoped(&mut self, action: Action) -> ActionGuard<'_> {
        ActionGuard::new(self, action)
    }

    /// Passes the turn to the other player.
    #[inline(always)]
    pub(crate) fn toggle_next_player(&mut self) {
        self.next_player = self.next_player.opponent();
        self.key.hash(self.zobrist.next_player(Player::Two));
    }

    /// Linear index of `cell`.
    #[inline(always)]
    fn index_of(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "{cell} is not on a {}x{} board", self.num_cols, self.num_rows);
        cell.y * self.num_cols + cell.x
    }

    /// Returns the cell `steps` steps from `cell` along `dir`, if it is on the board.
    #[inline(always)]
    fn step(&self, cell: Cell, dir: (isize, isize), steps: isize) -> Option<Cell> {
        cell.offset(dir, steps).filter(|c| self.contains(*c))
    }

    /// Scans each direction in `dirs` from `cell`, appending candidate moves and captures for the side-to-move.
    ///
    /// An adjacent empty cell is a move. An adjacent opponent with an empty, on-board cell behind it is a capture.
    fn actions_along_directions(
        &self,
        cell: Cell,
        dirs: impl IntoIterator<Item = (isize, isize)>,
        actions: &mut Vec<Action>,
    ) {
        for dir in dirs {
            let Some(adjacent) = self.step(cell, dir, 1) else {
                continue;
            };

            match self.piece_at(adjacent) {
                None => actions.push(Action::new_move(cell, adjacent)),
                Some(player) if player == self.next_player => {}
                Some(_) => {
                    if let Some(dest) = self.step(cell, dir, 2) {
                        if self.piece_at(dest).is_none() {
                            actions.push(Action::new_capture(cell, adjacent, dest));
                        }
                    }
                }
            }
        }
    }

    /// Returns the actions available to the piece at column `x` and row `y`, moving as the side-to-move.
    ///
    /// Pieces on even cells (`x + y` even) move orthogonally and diagonally, pieces on odd cells only orthogonally.
    /// If any capture exists for this piece, only captures are returned.
    pub fn piece_actions(&self, x: isize, y: isize) -> Result<Vec<Action>, BoardError> {
        if !self.is_valid_position(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }

        Ok(self.actions_from(Cell::new(x as usize, y as usize)))
    }

    /// Infallible variant of [`Board::piece_actions`] for a cell known to be on the board.
    pub fn actions_from(&self, cell: Cell) -> Vec<Action> {
        let mut actions = Vec::new();
        self.actions_along_directions(cell, cell.directions(), &mut actions);

        retain_forced_captures(&mut actions);
        actions
    }

    /// Returns `true` if the piece at `cell` has a capture available.
    #[inline(always)]
    pub fn has_capture_from(&self, cell: Cell) -> bool {
        self.actions_from(cell).iter().any(Action::is_capture)
    }

    /// Returns every legal action for the side-to-move.
    ///
    /// If any piece of that player can capture, only captures are legal.
    pub fn valid_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();

        for cell in self.cells() {
            if self.piece_at(cell) == Some(self.next_player) {
                actions.extend(self.actions_from(cell));
            }
        }

        retain_forced_captures(&mut actions);
        actions
    }

    /// Number of pieces `player` has on the board.
    #[inline(always)]
    pub fn piece_count(&self, player: Player) -> usize {
        self.grid.iter().filter(|&&cell| cell == Some(player)).count()
    }

    /// Determines whether the game has ended.
    ///
    /// A player with no pieces loses. If both players have exactly one piece left
    /// and the side-to-move cannot capture, the game is drawn.
    pub fn is_terminal(&self) -> Outcome {
        let ones = self.piece_count(Player::One);
        let twos = self.piece_count(Player::Two);

        if ones == 0 {
            Outcome::Winner(Player::Two)
        } else if twos == 0 {
            Outcome::Winner(Player::One)
        } else if ones == 1
            && twos == 1
            && !self.valid_actions().iter().any(Action::is_capture)
        {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }
}

/// Forced capture: if `actions` contains any capture, discard all plain moves.
#[inline(always)]
fn retain_forced_captures(actions: &mut Vec<Action>) {
    if actions.iter().any(Action::is_capture) {
        actions.retain(Action::is_capture);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.chunks(self.num_cols) {
            let line = row
                .iter()
                .map(|cell| cell.map_or(0, Player::value).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }

        write!(f, "next player: {}", self.next_player)
    }
}
