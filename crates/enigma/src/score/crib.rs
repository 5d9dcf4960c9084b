//! Known-plaintext (crib) matching.
//!
//! An Enigma never enciphers a letter to itself, so a crib can only sit where
//! no crib letter lines up with the same ciphertext letter. That rules out most
//! offsets before any decoding happens.

use std::fmt;

use serde::Serialize;

use crate::cipher::{indices_to_text, text_to_indices};
use crate::error::{EnigmaError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CribOffset {
    At(usize),
    Anywhere,
}

impl fmt::Display for CribOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(o) => write!(f, "@{o}"),
            Self::Anywhere => f.write_str("anywhere"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crib {
    text: Vec<u8>,
    offset: CribOffset,
}

impl Crib {
    pub fn new(text: &str, offset: CribOffset) -> Result<Self> {
        if text.is_empty() {
            return Err(EnigmaError::config("crib is empty"));
        }
        Ok(Self {
            text: text_to_indices(text.as_bytes())?,
            offset,
        })
    }

    /// Crib letters as alphabet indices.
    pub fn letters(&self) -> &[u8] {
        &self.text
    }

    pub fn offset(&self) -> CribOffset {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the crib sits at `offset` of `plain`.
    #[inline]
    pub fn matches_at(&self, plain: &[u8], offset: usize) -> bool {
        self.window(plain, offset) == Some(&self.text[..])
    }

    /// The crib-length slice of `text` at `offset`, if it fits.
    fn window<'t>(&self, text: &'t [u8], offset: usize) -> Option<&'t [u8]> {
        let end = offset.checked_add(self.text.len())?;
        text.get(offset..end)
    }

    /// Check against the offset this crib was declared with.
    pub fn matches(&self, plain: &[u8]) -> bool {
        match self.offset {
            CribOffset::At(o) => self.matches_at(plain, o),
            CribOffset::Anywhere => plain.windows(self.text.len()).any(|w| w == self.text),
        }
    }

    /// Offsets where the crib can align with `ciphertext` without any letter
    /// enciphering to itself, ascending.
    pub fn candidate_offsets(&self, ciphertext: &[u8]) -> Vec<usize> {
        let fits = |o: usize| {
            self.window(ciphertext, o)
                .is_some_and(|c| c.iter().zip(&self.text).all(|(a, b)| a != b))
        };
        match self.offset {
            CribOffset::At(o) => fits(o).then_some(o).into_iter().collect(),
            CribOffset::Anywhere => (0..ciphertext.len().saturating_sub(self.text.len()) + 1)
                .filter(|&o| fits(o))
                .collect(),
        }
    }
}

impl fmt::Display for Crib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", indices_to_text(&self.text), self.offset)
    }
}
