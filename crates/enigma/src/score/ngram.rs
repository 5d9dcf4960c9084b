//! N-gram log-likelihood tables (n = 2..=4).
//!
//! Model
//! - A dense table of `26ⁿ` log10 probabilities indexed by the base-26 value of
//!   the gram (`"ABCD" -> ((0·26 + 1)·26 + 2)·26 + 3`).
//! - Grams absent from the source data get a floor value, by default the log
//!   probability of a hundredth of one observation.
//! - Read-only after construction; search workers share `&NgramTable`.

use crate::cipher::{text_to_indices, ALPHABET_SIZE};
use crate::error::{EnigmaError, Result};

pub const MIN_NGRAM: usize = 2;
pub const MAX_NGRAM: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct NgramTable {
    n: usize,
    /// `ALPHABET_SIZE^(n-1)`; strips the oldest letter from a rolling index.
    high: usize,
    log_probs: Vec<f32>,
    floor: f32,
}

impl NgramTable {
    fn empty(n: usize, floor: f32) -> Result<Self> {
        if !(MIN_NGRAM..=MAX_NGRAM).contains(&n) {
            return Err(EnigmaError::config(format!(
                "n-gram length {n} outside {MIN_NGRAM}..={MAX_NGRAM}"
            )));
        }
        if !floor.is_finite() {
            return Err(EnigmaError::config("n-gram floor must be finite"));
        }
        Ok(Self {
            n,
            high: ALPHABET_SIZE.pow(n as u32 - 1),
            log_probs: vec![floor; ALPHABET_SIZE.pow(n as u32)],
            floor,
        })
    }

    fn slot(&self, gram: &str) -> Result<usize> {
        if gram.len() != self.n {
            return Err(EnigmaError::config(format!(
                "gram {gram:?} does not have length {}",
                self.n
            )));
        }
        let indices = text_to_indices(gram.as_bytes())?;
        Ok(indices
            .iter()
            .fold(0usize, |acc, &i| acc * ALPHABET_SIZE + i as usize))
    }

    /// Build from raw gram counts; probabilities are `count / total`.
    pub fn from_counts<S, I>(n: usize, counts: I) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, u64)>,
    {
        let counts: Vec<(S, u64)> = counts.into_iter().collect();
        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return Err(EnigmaError::config("n-gram counts are empty"));
        }
        let total = total as f64;
        let mut table = Self::empty(n, (0.01 / total).log10() as f32)?;
        for (gram, count) in &counts {
            let slot = table.slot(gram.as_ref())?;
            if *count > 0 {
                table.log_probs[slot] = (*count as f64 / total).log10() as f32;
            }
        }
        Ok(table)
    }

    /// Build from log10 probabilities; unseen grams score `floor`.
    pub fn from_log_probs<S, I>(n: usize, log_probs: I, floor: f32) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, f32)>,
    {
        let mut table = Self::empty(n, floor)?;
        for (gram, lp) in log_probs {
            if !lp.is_finite() {
                return Err(EnigmaError::config(format!(
                    "log probability of {:?} is not finite",
                    gram.as_ref()
                )));
            }
            let slot = table.slot(gram.as_ref())?;
            table.log_probs[slot] = lp;
        }
        Ok(table)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Log probability of one gram given as alphabet indices.
    pub fn log_prob(&self, gram: &[u8]) -> f32 {
        debug_assert_eq!(gram.len(), self.n);
        let slot = gram
            .iter()
            .fold(0usize, |acc, &i| acc * ALPHABET_SIZE + i as usize);
        self.log_probs[slot]
    }

    /// Sum over every overlapping gram of the text.
    pub fn score(&self, text: &[u8]) -> f64 {
        if text.len() < self.n {
            return 0.0;
        }
        let mut slot = text[..self.n - 1]
            .iter()
            .fold(0usize, |acc, &i| acc * ALPHABET_SIZE + i as usize);
        let mut total = 0.0f64;
        for &i in &text[self.n - 1..] {
            slot = (slot % self.high) * ALPHABET_SIZE + i as usize;
            total += f64::from(self.log_probs[slot]);
        }
        total
    }

    /// [`NgramTable::score`] per gram, comparable across text lengths.
    /// Texts without a full gram get the floor.
    pub fn mean_score(&self, text: &[u8]) -> f64 {
        if text.len() < self.n {
            return f64::from(self.floor);
        }
        self.score(text) / (text.len() - self.n + 1) as f64
    }
}
