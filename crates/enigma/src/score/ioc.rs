//! Index of coincidence and language bands.
//!
//! The IoC of a text is `Σ fᵢ(fᵢ-1) / (N(N-1))`. Uniformly random letters give
//! about `1/26 ≈ 0.0385`; English sits near `1.73/26`, German near `2.05/26`.
//! Bands are stated in these normalized units (kappa × 26) and converted here.
//!
//! [`LetterTargets`] is the per-letter companion check: each letter's share of
//! the text must reach its target less a common offset.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cipher::ALPHABET_SIZE;
use crate::error::{EnigmaError, Result};

/// Letter histogram over alphabet indices.
#[inline]
pub fn letter_counts(text: &[u8]) -> [u32; ALPHABET_SIZE] {
    let mut counts = [0u32; ALPHABET_SIZE];
    for &i in text {
        counts[i as usize] += 1;
    }
    counts
}

/// IoC of a text of alphabet indices; 0 for texts shorter than two letters.
pub fn index_of_coincidence(text: &[u8]) -> f64 {
    let n = text.len() as u64;
    if n < 2 {
        return 0.0;
    }
    let pairs: u64 = letter_counts(text)
        .iter()
        .map(|&f| u64::from(f) * u64::from(f.saturating_sub(1)))
        .sum();
    pairs as f64 / (n * (n - 1)) as f64
}

/// Accepted IoC interval `center ± tolerance` (raw kappa values).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IocBand {
    pub center: f64,
    pub tolerance: f64,
}

impl IocBand {
    pub fn new(center: f64, tolerance: f64) -> Result<Self> {
        if !(center.is_finite() && tolerance.is_finite()) || center <= 0.0 || tolerance < 0.0 {
            return Err(EnigmaError::config(format!(
                "IoC band {center} ± {tolerance} must have a positive center and non-negative tolerance"
            )));
        }
        Ok(Self { center, tolerance })
    }

    /// Band given in normalized units (kappa × 26), e.g. `1.75 ± 0.25`.
    pub fn normalized(center: f64, tolerance: f64) -> Result<Self> {
        let a = ALPHABET_SIZE as f64;
        Self::new(center / a, tolerance / a)
    }

    pub fn lower(&self) -> f64 {
        self.center - self.tolerance
    }

    pub fn upper(&self) -> f64 {
        self.center + self.tolerance
    }

    #[inline]
    pub fn contains(&self, ioc: f64) -> bool {
        (self.lower()..=self.upper()).contains(&ioc)
    }
}

impl Default for IocBand {
    fn default() -> Self {
        Language::English.band()
    }
}

/// Minimum per-letter frequencies, `A` first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LetterTargets {
    targets: [f64; ALPHABET_SIZE],
    offset: f64,
}

impl LetterTargets {
    pub fn new(targets: [f64; ALPHABET_SIZE], offset: f64) -> Result<Self> {
        let bad = |v: f64| !v.is_finite() || v < 0.0;
        if let Some(i) = targets.iter().position(|&t| bad(t)) {
            return Err(EnigmaError::config(format!(
                "letter target for {} must be a non-negative number, got {}",
                (b'A' + i as u8) as char,
                targets[i]
            )));
        }
        if bad(offset) {
            return Err(EnigmaError::config(format!(
                "letter target offset {offset} must be non-negative"
            )));
        }
        Ok(Self { targets, offset })
    }

    pub fn uniform(target: f64, offset: f64) -> Result<Self> {
        Self::new([target; ALPHABET_SIZE], offset)
    }

    /// Parse 26 comma or whitespace separated frequencies.
    pub fn parse(s: &str, offset: f64) -> Result<Self> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f64>()
                    .map_err(|e| EnigmaError::config(format!("letter target {t:?}: {e}")))
            })
            .collect::<Result<Vec<f64>>>()?;
        let targets: [f64; ALPHABET_SIZE] = values.as_slice().try_into().map_err(|_| {
            EnigmaError::config(format!(
                "{} letter targets given, need {ALPHABET_SIZE}",
                values.len()
            ))
        })?;
        Self::new(targets, offset)
    }

    pub fn targets(&self) -> &[f64; ALPHABET_SIZE] {
        &self.targets
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Every letter's frequency is at least its target minus the offset.
    /// An empty text has no frequencies and never qualifies.
    pub fn sufficient(&self, text: &[u8]) -> bool {
        if text.is_empty() {
            return false;
        }
        let n = text.len() as f64;
        letter_counts(text)
            .iter()
            .zip(&self.targets)
            .all(|(&c, &t)| f64::from(c) / n >= t - self.offset)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Language {
    #[default]
    English,
    German,
}

impl Language {
    /// English 1.5..2.0, German 1.75..2.25 (normalized).
    pub fn band(self) -> IocBand {
        let a = ALPHABET_SIZE as f64;
        let center = match self {
            Self::English => 1.75,
            Self::German => 2.0,
        };
        IocBand {
            center: center / a,
            tolerance: 0.25 / a,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::English => "english",
            Self::German => "german",
        })
    }
}

impl FromStr for Language {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "de" | "german" | "deutsch" => Ok(Self::German),
            other => Err(EnigmaError::config(format!("unknown language {other:?}"))),
        }
    }
}
