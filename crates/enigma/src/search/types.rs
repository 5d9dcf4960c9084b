//! Search configuration and result types.

use std::time::Duration;

use serde::Serialize;

use super::CancelToken;
use crate::cipher::{Plugboard, ReflectorModel, RotorModel, ALPHABET_SIZE};
use crate::config::MachineSettings;
use crate::score::{
    Crib, Dictionary, IocBand, LetterTargets, NgramTable, ScorerFlags, DEFAULT_MIN_MATCHES,
};

/// How the plugboard dimension of the keyspace is handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlugboardSearch {
    /// Every candidate uses this pairing.
    Fixed(Plugboard),
    /// Rank rotor settings without a plugboard, then greedily add up to
    /// `max_pairs` pairs to each of the best `candidates`.
    HillClimb { max_pairs: usize, candidates: usize },
}

impl Default for PlugboardSearch {
    fn default() -> Self {
        Self::Fixed(Plugboard::empty())
    }
}

impl PlugboardSearch {
    /// Hill climb with the historical ten pairs.
    pub fn hill_climb() -> Self {
        Self::HillClimb {
            max_pairs: 10,
            candidates: 10,
        }
    }
}

/// Keyspace definition. Each dimension is a list of allowed values; a
/// one-element list fixes it.
#[derive(Clone, Debug)]
pub struct SearchBounds {
    pub catalog: Vec<RotorModel>,
    pub slots: usize,
    /// Per-slot restrictions `(slot, allowed)` applied on top of the catalog.
    pub slot_rotors: Vec<(usize, Vec<RotorModel>)>,
    pub reflectors: Vec<ReflectorModel>,
    /// One list per slot, leftmost first.
    pub rings: Vec<Vec<u8>>,
    pub positions: Vec<Vec<u8>>,
    pub plugboard: PlugboardSearch,
}

fn every_letter() -> Vec<u8> {
    (0..ALPHABET_SIZE as u8).collect()
}

impl SearchBounds {
    /// Every ring setting and start position, reflector B, no plugboard.
    pub fn new(catalog: Vec<RotorModel>, slots: usize) -> Self {
        Self {
            catalog,
            slots,
            slot_rotors: Vec::new(),
            reflectors: vec![ReflectorModel::B],
            rings: vec![every_letter(); slots],
            positions: vec![every_letter(); slots],
            plugboard: PlugboardSearch::default(),
        }
    }

    /// Enigma I: rotors I-V in three slots.
    pub fn enigma_i() -> Self {
        Self::new(RotorModel::WEHRMACHT.to_vec(), 3)
    }

    /// M4: a greek rotor on the left, three of I-VIII, thin reflectors.
    pub fn m4() -> Self {
        let mut bounds = Self::new(RotorModel::ALL.to_vec(), 4);
        bounds.slot_rotors = vec![(0, vec![RotorModel::Beta, RotorModel::Gamma])];
        bounds.reflectors = vec![ReflectorModel::BThin, ReflectorModel::CThin];
        bounds
    }

    pub fn with_reflectors(mut self, reflectors: Vec<ReflectorModel>) -> Self {
        self.reflectors = reflectors;
        self
    }

    pub fn with_slot_rotors(mut self, slot: usize, allowed: Vec<RotorModel>) -> Self {
        self.slot_rotors.push((slot, allowed));
        self
    }

    /// Fix the ring settings (one per slot).
    pub fn with_fixed_rings(mut self, rings: &[u8]) -> Self {
        self.rings = rings.iter().map(|&r| vec![r]).collect();
        self
    }

    pub fn with_ring_choices(mut self, slot: usize, allowed: Vec<u8>) -> Self {
        if let Some(s) = self.rings.get_mut(slot) {
            *s = allowed;
        } else {
            // Out-of-range slot; the keyspace validation reports it.
            self.rings.resize(slot + 1, Vec::new());
            self.rings[slot] = allowed;
        }
        self
    }

    /// Fix the start positions (one per slot).
    pub fn with_fixed_positions(mut self, positions: &[u8]) -> Self {
        self.positions = positions.iter().map(|&p| vec![p]).collect();
        self
    }

    pub fn with_position_choices(mut self, slot: usize, allowed: Vec<u8>) -> Self {
        if let Some(s) = self.positions.get_mut(slot) {
            *s = allowed;
        } else {
            self.positions.resize(slot + 1, Vec::new());
            self.positions[slot] = allowed;
        }
        self
    }

    pub fn with_plugboard(mut self, plugboard: PlugboardSearch) -> Self {
        self.plugboard = plugboard;
        self
    }
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self::enigma_i()
    }
}

/// Borrowed tables and run-time knobs for one search.
#[derive(Clone, Debug)]
pub struct SearchContext<'a> {
    pub ngrams: Option<&'a NgramTable>,
    pub dictionary: Option<&'a Dictionary>,
    pub dictionary_min_matches: usize,
    pub crib: Option<&'a Crib>,
    pub band: IocBand,
    /// Extra per-letter check under the frequency scorer.
    pub letter_targets: Option<&'a LetterTargets>,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
    pub cancel: CancelToken,
}

impl Default for SearchContext<'_> {
    fn default() -> Self {
        Self {
            ngrams: None,
            dictionary: None,
            dictionary_min_matches: DEFAULT_MIN_MATCHES,
            crib: None,
            band: IocBand::default(),
            letter_targets: None,
            threads: None,
            cancel: CancelToken::new(),
        }
    }
}

/// One ranked candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub key: MachineSettings,
    pub score: f64,
    /// Scorers that fired for this candidate.
    pub flags: ScorerFlags,
    /// Keyspace ordinal of the rotor setting.
    pub index: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchOutcome {
    /// Best first.
    pub records: Vec<ScoreRecord>,
    pub status: SearchStatus,
    /// Candidates decoded (including those rejected early by the crib).
    pub evaluated: u64,
    pub keyspace_len: u64,
    pub elapsed: Duration,
}
