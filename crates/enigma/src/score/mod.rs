//! Statistical scorers and their combination.
//!
//! Purpose
//! - Judge a decoded candidate (alphabet indices) and produce one comparable
//!   fitness value plus the set of scorers that fired.
//!
//! Model
//! - Filters run first and cheapest first: known plaintext, dictionary, then
//!   the frequency checks (IoC band and, when given, per-letter targets).
//!   A candidate failing an enabled filter is discarded.
//! - The fitness of a surviving candidate is the mean n-gram log-likelihood
//!   when a table is supplied, otherwise its IoC.
//!
//! Conventions
//! - Tables are borrowed; a `ScoringModel` is cheap to build per search.

mod crib;
mod dictionary;
mod flags;
mod ioc;
mod ngram;

pub use crib::{Crib, CribOffset};
pub use dictionary::{Dictionary, WordSplit, DEFAULT_MIN_MATCHES};
pub use flags::ScorerFlags;
pub use ioc::{index_of_coincidence, letter_counts, IocBand, Language, LetterTargets};
pub use ngram::{NgramTable, MAX_NGRAM, MIN_NGRAM};

use crate::error::{EnigmaError, Result};

/// Result of scoring one candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub flags: ScorerFlags,
}

/// Enabled scorers bound to their tables and to one ciphertext.
#[derive(Clone, Debug)]
pub struct ScoringModel<'a> {
    flags: ScorerFlags,
    ngrams: Option<&'a NgramTable>,
    dictionary: Option<&'a Dictionary>,
    min_matches: usize,
    band: IocBand,
    letter_targets: Option<&'a LetterTargets>,
    crib: Option<&'a Crib>,
    /// Offsets the crib may occupy in this ciphertext.
    crib_offsets: Vec<usize>,
}

impl<'a> ScoringModel<'a> {
    pub fn new(flags: ScorerFlags) -> Self {
        Self {
            flags,
            ngrams: None,
            dictionary: None,
            min_matches: DEFAULT_MIN_MATCHES,
            band: IocBand::default(),
            letter_targets: None,
            crib: None,
            crib_offsets: Vec::new(),
        }
    }

    pub fn with_ngrams(mut self, table: Option<&'a NgramTable>) -> Self {
        self.ngrams = table;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Option<&'a Dictionary>, min_matches: usize) -> Self {
        self.dictionary = dictionary;
        self.min_matches = min_matches;
        self
    }

    pub fn with_band(mut self, band: IocBand) -> Self {
        self.band = band;
        self
    }

    /// Per-letter minimums checked with the IoC band under `FREQUENCY`.
    pub fn with_letter_targets(mut self, targets: Option<&'a LetterTargets>) -> Self {
        self.letter_targets = targets;
        self
    }

    /// Bind a crib to the ciphertext it will be checked against.
    pub fn with_crib(mut self, crib: Option<&'a Crib>, ciphertext: &[u8]) -> Self {
        self.crib = crib;
        self.crib_offsets = crib.map_or_else(Vec::new, |c| c.candidate_offsets(ciphertext));
        self
    }

    /// Every enabled filter needs its table.
    pub fn validate(&self) -> Result<()> {
        if self.flags.contains(ScorerFlags::KNOWN_PLAINTEXT) && self.crib.is_none() {
            return Err(EnigmaError::config("known-plaintext scoring needs a crib"));
        }
        if self.flags.contains(ScorerFlags::DICTIONARY_MATCH) {
            match self.dictionary {
                None => {
                    return Err(EnigmaError::config("dictionary scoring needs a word list"))
                }
                Some(d) if d.is_empty() => {
                    return Err(EnigmaError::config("dictionary is empty"))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn flags(&self) -> ScorerFlags {
        self.flags
    }

    pub fn crib(&self) -> Option<&'a Crib> {
        self.crib
    }

    pub fn crib_offsets(&self) -> &[usize] {
        &self.crib_offsets
    }

    /// False when the crib is enabled but no offset survives the
    /// no-self-encryption check; nothing can then pass.
    pub fn crib_is_possible(&self) -> bool {
        !self.flags.contains(ScorerFlags::KNOWN_PLAINTEXT) || !self.crib_offsets.is_empty()
    }

    /// The crib offset, when the crib has exactly one place to be.
    pub fn fixed_crib_offset(&self) -> Option<usize> {
        match (self.flags.contains(ScorerFlags::KNOWN_PLAINTEXT), self.crib) {
            (true, Some(c)) if matches!(c.offset(), CribOffset::At(_)) => {
                self.crib_offsets.first().copied()
            }
            _ => None,
        }
    }

    /// Model without filters and with IoC fitness. The IoC is insensitive to
    /// a wrong plugboard, so it ranks rotor settings before a plugboard is known.
    pub fn plugboard_tolerant(&self) -> ScoringModel<'a> {
        ScoringModel {
            flags: ScorerFlags::NONE,
            ngrams: None,
            dictionary: None,
            min_matches: self.min_matches,
            band: self.band,
            letter_targets: None,
            crib: None,
            crib_offsets: Vec::new(),
        }
    }

    /// Fitness only, no filters.
    pub fn fitness(&self, plain: &[u8]) -> f64 {
        match self.ngrams {
            Some(t) => t.mean_score(plain),
            None => index_of_coincidence(plain),
        }
    }

    /// Filters, then fitness; `None` when an enabled filter rejects.
    pub fn evaluate(&self, plain: &[u8]) -> Option<Evaluation> {
        let mut fired = ScorerFlags::NONE;

        if self.flags.contains(ScorerFlags::KNOWN_PLAINTEXT) {
            let crib = self.crib?;
            if !self.crib_offsets.iter().any(|&o| crib.matches_at(plain, o)) {
                return None;
            }
            fired |= ScorerFlags::KNOWN_PLAINTEXT;
        }

        if self.flags.contains(ScorerFlags::DICTIONARY_MATCH) {
            if !self.dictionary?.matches_at_least(plain, self.min_matches) {
                return None;
            }
            fired |= ScorerFlags::DICTIONARY_MATCH;
        }

        let mut ioc = None;
        if self.flags.contains(ScorerFlags::FREQUENCY) {
            let value = index_of_coincidence(plain);
            if !self.band.contains(value) {
                return None;
            }
            if self.letter_targets.is_some_and(|t| !t.sufficient(plain)) {
                return None;
            }
            fired |= ScorerFlags::FREQUENCY;
            ioc = Some(value);
        }

        let score = match self.ngrams {
            Some(t) => t.mean_score(plain),
            None => ioc.unwrap_or_else(|| index_of_coincidence(plain)),
        };
        Some(Evaluation {
            score,
            flags: fired,
        })
    }
}
