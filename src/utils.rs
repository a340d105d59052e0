/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Number of rows of a board when none is specified.
pub const DEFAULT_ROWS: usize = 5;

/// Number of columns of a board when none is specified.
pub const DEFAULT_COLS: usize = 5;

/// Depths at which every search algorithm enters a tournament when none are specified.
pub const DEFAULT_TOURNAMENT_DEPTHS: [u8; 2] = [5, 7];

/// A 5x5 mid-game position with player two to move, where player two is forced to capture.
#[rustfmt::skip]
pub const FORCED_CAPTURE_GRID: [u8; 25] = [
    0, 0, 0, 0, 2,
    0, 1, 1, 2, 0,
    2, 2, 1, 1, 0,
    0, 2, 0, 0, 0,
    1, 0, 0, 0, 0,
];
