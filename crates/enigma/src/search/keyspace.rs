//! Index-addressable keyspace.
//!
//! Model
//! - Ordinal `i` splits into a block (rotor arrangement × reflector) and an
//!   offset inside the block. Offsets enumerate ring settings (outer) and
//!   start positions (inner), rightmost slot fastest in both.
//! - Every ordinal in `0..len()` maps to a valid key; validation happens once
//!   in [`Keyspace::new`].
//!
//! Conventions
//! - Greek rotors only fit the non-stepping leftmost slot of a four-slot machine.

use super::types::{PlugboardSearch, SearchBounds};
use crate::cipher::{ReflectorModel, RotorModel, ALPHABET_SIZE, MAX_ROTORS};
use crate::config::MachineSettings;
use crate::error::{EnigmaError, Result};

#[derive(Clone, Debug)]
pub struct Keyspace {
    arrangements: Vec<Vec<RotorModel>>,
    reflectors: Vec<ReflectorModel>,
    rings: Vec<Vec<u8>>,
    positions: Vec<Vec<u8>>,
    /// Fixed plugboard pairs carried into every key (empty for hill climbs).
    plugboard: Vec<(u8, u8)>,
    /// Number of position combinations.
    position_span: u64,
    block_len: u64,
    len: u64,
}

fn check_dimension(what: &str, lists: &[Vec<u8>], slots: usize) -> Result<u64> {
    if lists.len() != slots {
        return Err(EnigmaError::bounds(format!(
            "{} {what} lists for {slots} slots",
            lists.len()
        )));
    }
    let mut span = 1u64;
    for (slot, list) in lists.iter().enumerate() {
        if list.is_empty() {
            return Err(EnigmaError::bounds(format!("no {what} allowed in slot {slot}")));
        }
        if let Some(&bad) = list.iter().find(|&&v| v as usize >= ALPHABET_SIZE) {
            return Err(EnigmaError::bounds(format!(
                "{what} {bad} in slot {slot} out of range 0..{ALPHABET_SIZE}"
            )));
        }
        span = span
            .checked_mul(list.len() as u64)
            .ok_or_else(|| EnigmaError::bounds("keyspace size overflows u64"))?;
    }
    Ok(span)
}

/// Ordered selections of distinct rotors, one per slot, lexicographic in the
/// per-slot allowed lists.
fn arrangements(allowed: &[Vec<RotorModel>]) -> Vec<Vec<RotorModel>> {
    fn extend(
        allowed: &[Vec<RotorModel>],
        prefix: &mut Vec<RotorModel>,
        out: &mut Vec<Vec<RotorModel>>,
    ) {
        let slot = prefix.len();
        if slot == allowed.len() {
            out.push(prefix.clone());
            return;
        }
        for &model in &allowed[slot] {
            if prefix.contains(&model) {
                continue;
            }
            prefix.push(model);
            extend(allowed, prefix, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    extend(allowed, &mut Vec::with_capacity(allowed.len()), &mut out);
    out
}

impl Keyspace {
    pub fn new(bounds: &SearchBounds) -> Result<Self> {
        if bounds.catalog.is_empty() {
            return Err(EnigmaError::NoRotorsAvailable);
        }
        let slots = bounds.slots;
        if slots == 0 || slots > MAX_ROTORS {
            return Err(EnigmaError::bounds(format!(
                "{slots} rotor slots requested, machine holds 1..={MAX_ROTORS}"
            )));
        }
        let mut catalog = bounds.catalog.clone();
        catalog.sort();
        catalog.dedup();
        if slots > catalog.len() {
            return Err(EnigmaError::bounds(format!(
                "{slots} rotor slots requested from a catalog of {}",
                catalog.len()
            )));
        }

        let mut allowed: Vec<Vec<RotorModel>> = vec![catalog.clone(); slots];
        for (slot, models) in &bounds.slot_rotors {
            let target = allowed.get_mut(*slot).ok_or_else(|| {
                EnigmaError::bounds(format!("rotor restriction for slot {slot} of {slots}"))
            })?;
            *target = models
                .iter()
                .copied()
                .filter(|m| catalog.contains(m))
                .collect();
        }
        for (slot, list) in allowed.iter_mut().enumerate() {
            let non_stepping = slots == MAX_ROTORS && slot == 0;
            list.retain(|m| non_stepping || !m.is_greek());
            if list.is_empty() {
                return Err(EnigmaError::NoRotorsAvailable);
            }
        }
        let arrangements = arrangements(&allowed);
        if arrangements.is_empty() {
            return Err(EnigmaError::bounds(
                "no arrangement of distinct rotors fits the slot restrictions",
            ));
        }

        // Merge repeats; the first occurrence keeps its place.
        let mut reflectors: Vec<ReflectorModel> = Vec::with_capacity(bounds.reflectors.len());
        for &r in &bounds.reflectors {
            if !reflectors.contains(&r) {
                reflectors.push(r);
            }
        }
        if reflectors.is_empty() {
            return Err(EnigmaError::bounds("no reflector allowed"));
        }

        let ring_span = check_dimension("ring setting", &bounds.rings, slots)?;
        let position_span = check_dimension("start position", &bounds.positions, slots)?;

        let plugboard = match &bounds.plugboard {
            PlugboardSearch::Fixed(board) => board.pairs(),
            PlugboardSearch::HillClimb { max_pairs, .. } => {
                if *max_pairs > crate::cipher::MAX_PLUGBOARD_PAIRS {
                    return Err(EnigmaError::bounds(format!(
                        "hill climb budget of {max_pairs} pairs exceeds the plugboard"
                    )));
                }
                Vec::new()
            }
        };

        let overflow = || EnigmaError::bounds("keyspace size overflows u64");
        let block_len = ring_span.checked_mul(position_span).ok_or_else(overflow)?;
        let blocks = (arrangements.len() as u64)
            .checked_mul(reflectors.len() as u64)
            .ok_or_else(overflow)?;
        let len = blocks.checked_mul(block_len).ok_or_else(overflow)?;

        Ok(Self {
            arrangements,
            reflectors,
            rings: bounds.rings.clone(),
            positions: bounds.positions.clone(),
            plugboard,
            position_span,
            block_len,
            len,
        })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slots(&self) -> usize {
        self.rings.len()
    }

    pub fn block_count(&self) -> u64 {
        (self.arrangements.len() * self.reflectors.len()) as u64
    }

    /// Keys per block.
    pub fn block_len(&self) -> u64 {
        self.block_len
    }

    /// Rotor arrangement and reflector of block `b`.
    pub fn block(&self, b: u64) -> (&[RotorModel], ReflectorModel) {
        let b = b as usize;
        let r = self.reflectors.len();
        (&self.arrangements[b / r], self.reflectors[b % r])
    }

    pub fn plugboard(&self) -> &[(u8, u8)] {
        &self.plugboard
    }

    /// Rings and positions for `offset` inside any block.
    #[inline]
    pub fn fill_state(&self, offset: u64, rings: &mut [u8], positions: &mut [u8]) {
        debug_assert!(offset < self.block_len);
        let mut ring_part = offset / self.position_span;
        let mut pos_part = offset % self.position_span;
        for slot in (0..self.slots()).rev() {
            let rl = &self.rings[slot];
            rings[slot] = rl[(ring_part % rl.len() as u64) as usize];
            ring_part /= rl.len() as u64;
            let pl = &self.positions[slot];
            positions[slot] = pl[(pos_part % pl.len() as u64) as usize];
            pos_part /= pl.len() as u64;
        }
    }

    /// Key of block `b` at `offset`.
    pub fn key_in_block(&self, b: u64, offset: u64) -> MachineSettings {
        let (rotors, reflector) = self.block(b);
        let n = self.slots();
        let mut rings = vec![0; n];
        let mut positions = vec![0; n];
        self.fill_state(offset, &mut rings, &mut positions);
        MachineSettings {
            rotors: rotors.to_vec(),
            rings,
            positions,
            reflector,
            plugboard: self.plugboard.clone(),
        }
    }

    pub fn key_at(&self, index: u64) -> Option<MachineSettings> {
        (index < self.len)
            .then(|| self.key_in_block(index / self.block_len, index % self.block_len))
    }

    /// Lazy enumeration starting at `index`; restart from any ordinal.
    pub fn iter_from(&self, index: u64) -> impl Iterator<Item = MachineSettings> + '_ {
        (index.min(self.len)..self.len)
            .map(move |i| self.key_in_block(i / self.block_len, i % self.block_len))
    }
}
