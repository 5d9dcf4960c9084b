use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::Serialize;

/// Bit set of scorers: enables them on a search and records which fired on a result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScorerFlags(u8);

impl ScorerFlags {
    pub const NONE: Self = Self(0);
    pub const DICTIONARY_MATCH: Self = Self(1);
    pub const FREQUENCY: Self = Self(2);
    pub const KNOWN_PLAINTEXT: Self = Self(4);
    pub const ALL: Self = Self(7);

    /// Unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ScorerFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScorerFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ScorerFlags {
    /// Three columns, `D`, `F`, `K` or `-`, as printed next to a score.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (Self::DICTIONARY_MATCH, 'D'),
            (Self::FREQUENCY, 'F'),
            (Self::KNOWN_PLAINTEXT, 'K'),
        ] {
            let shown = if self.contains(flag) { c } else { '-' };
            write!(f, "{shown}")?;
        }
        Ok(())
    }
}
