//! Word list matched against decoded text.
//!
//! Operators either ran words together or separated them with `X`. In the
//! default stream mode a word counts when it occurs anywhere as a substring;
//! in X-separated mode the text is cut at every `X` and a word counts only
//! when it equals one of the pieces.

use serde::Serialize;

use crate::cipher::text_to_indices;
use crate::error::{EnigmaError, Result};

/// Minimum distinct words before the dictionary filter passes.
pub const DEFAULT_MIN_MATCHES: usize = 2;

/// Alphabet index of the `X` word separator.
const SEPARATOR: u8 = b'X' - b'A';

/// How decoded text is split into words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum WordSplit {
    /// Unspaced letter stream; words match as substrings.
    #[default]
    Stream,
    /// `X` separates words; words match whole pieces.
    XSeparated,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// Distinct words as alphabet indices, longest first.
    words: Vec<Vec<u8>>,
    split: WordSplit,
}

impl Dictionary {
    /// Words must be uppercase `A-Z`; blank entries are skipped, duplicates merged.
    pub fn new<S, I>(words: I) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut out: Vec<Vec<u8>> = Vec::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let indices = text_to_indices(word.as_bytes()).map_err(|e| {
                EnigmaError::config(format!("dictionary word {word:?}: {e}"))
            })?;
            out.push(indices);
        }
        out.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        out.dedup();
        Ok(Self {
            words: out,
            split: WordSplit::Stream,
        })
    }

    pub fn with_split(mut self, split: WordSplit) -> Self {
        self.split = split;
        self
    }

    pub fn split(&self) -> WordSplit {
        self.split
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn found(&self, text: &[u8], word: &[u8]) -> bool {
        match self.split {
            WordSplit::Stream => text.windows(word.len()).any(|w| w == word),
            WordSplit::XSeparated => text.split(|&c| c == SEPARATOR).any(|w| w == word),
        }
    }

    /// Number of distinct words occurring in `text`.
    pub fn count_matches(&self, text: &[u8]) -> usize {
        self.words.iter().filter(|w| self.found(text, w)).count()
    }

    /// Stops scanning once `k` words are found.
    pub fn matches_at_least(&self, text: &[u8], k: usize) -> bool {
        if k == 0 {
            return true;
        }
        let mut hits = 0;
        for w in &self.words {
            if self.found(text, w) {
                hits += 1;
                if hits == k {
                    return true;
                }
            }
        }
        false
    }
}
