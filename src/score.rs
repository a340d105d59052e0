/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// The value of a position, from the perspective of whichever player a search is run for.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Score(pub(crate) f64);

impl Score {
    /// Score of a won game.
    pub const INF: Self = Self(f64::INFINITY);

    /// Score of a draw.
    pub const DRAW: Self = Self(0.0);

    #[inline(always)]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns `true` if this score is a forced win or loss.
    #[inline(always)]
    pub fn is_decisive(&self) -> bool {
        self.0.is_infinite()
    }

    /// Returns the larger of the two scores, preferring `self` on ties.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Returns the smaller of the two scores, preferring `self` on ties.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }
}

impl std::ops::Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::INFINITY {
            write!(f, "+inf")
        } else if self.0 == f64::NEG_INFINITY {
            write!(f, "-inf")
        } else {
            self.0.fmt(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Score::INF > Score::new(1_000.0));
        assert!(-Score::INF < Score::DRAW);
        assert_eq!(Score::new(2.0).max(Score::new(-3.0)), Score::new(2.0));
        assert_eq!(Score::new(2.0).min(Score::new(-3.0)), Score::new(-3.0));
        assert_eq!(-Score::new(2.0), Score::new(-2.0));
        assert!((-Score::INF).is_decisive());
        assert_eq!((-Score::INF).to_string(), "-inf");
    }
}
