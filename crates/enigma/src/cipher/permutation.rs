//! Bijections over the alphabet, stored with their inverse.

use std::fmt;

use super::{Wiring, ALPHABET_SIZE};
use crate::error::{EnigmaError, Result};

/// A bijection `0..A -> 0..A` with O(1) lookup in both directions.
///
/// Invariant: `inv[fwd[x]] == x` for every `x`; enforced by every constructor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permutation {
    fwd: [u8; ALPHABET_SIZE],
    inv: [u8; ALPHABET_SIZE],
}

impl Permutation {
    pub fn identity() -> Self {
        let mut fwd = [0u8; ALPHABET_SIZE];
        for (i, slot) in fwd.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Self { fwd, inv: fwd }
    }

    /// Build from an index table; fails unless every index appears exactly once.
    pub fn new(map: [u8; ALPHABET_SIZE]) -> Result<Self> {
        const UNSET: u8 = u8::MAX;
        let mut inv = [UNSET; ALPHABET_SIZE];
        for (i, &image) in map.iter().enumerate() {
            let slot = inv.get_mut(image as usize).ok_or_else(|| {
                EnigmaError::permutation(format!("image {image} of {i} is outside the alphabet"))
            })?;
            if *slot != UNSET {
                return Err(EnigmaError::permutation(format!(
                    "{} is the image of both {} and {}",
                    image, *slot, i
                )));
            }
            *slot = i as u8;
        }
        Ok(Self { fwd: map, inv })
    }

    /// Build from a wiring string such as `"EKMFLGDQVZNTOWYHXUSPAIBRCJ"`.
    pub fn from_letters(wiring: &str) -> Result<Self> {
        let bytes = wiring.as_bytes();
        if bytes.len() != ALPHABET_SIZE {
            return Err(EnigmaError::permutation(format!(
                "wiring {wiring:?} has {} letters, expected {ALPHABET_SIZE}",
                bytes.len()
            )));
        }
        let mut map = [0u8; ALPHABET_SIZE];
        for (slot, &b) in map.iter_mut().zip(bytes) {
            let upper = b.to_ascii_uppercase();
            if !upper.is_ascii_uppercase() {
                return Err(EnigmaError::permutation(format!(
                    "wiring {wiring:?} contains non-letter {:?}",
                    b as char
                )));
            }
            *slot = upper - b'A';
        }
        Self::new(map)
    }

    #[inline]
    pub fn forward(&self, index: u8) -> u8 {
        self.fwd[index as usize]
    }

    #[inline]
    pub fn backward(&self, index: u8) -> u8 {
        self.inv[index as usize]
    }

    pub fn inverse(&self) -> Self {
        Self {
            fwd: self.inv,
            inv: self.fwd,
        }
    }

    /// `x ↦ then(self(x))`.
    pub fn compose(&self, then: &Permutation) -> Self {
        let mut fwd = [0u8; ALPHABET_SIZE];
        let mut inv = [0u8; ALPHABET_SIZE];
        for x in 0..ALPHABET_SIZE {
            let y = then.forward(self.forward(x as u8));
            fwd[x] = y;
            inv[y as usize] = x as u8;
        }
        Self { fwd, inv }
    }

    pub fn is_involution(&self) -> bool {
        self.fwd == self.inv
    }

    pub fn fixed_points(&self) -> impl Iterator<Item = u8> + '_ {
        self.fwd
            .iter()
            .enumerate()
            .filter(|&(i, &image)| i as u8 == image)
            .map(|(i, _)| i as u8)
    }

    pub fn as_letters(&self) -> String {
        super::indices_to_text(&self.fwd)
    }
}

impl Default for Permutation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Wiring for Permutation {
    #[inline]
    fn forward(&self, index: u8) -> u8 {
        Permutation::forward(self, index)
    }
    #[inline]
    fn backward(&self, index: u8) -> u8 {
        Permutation::backward(self, index)
    }
}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permutation({})", self.as_letters())
    }
}
