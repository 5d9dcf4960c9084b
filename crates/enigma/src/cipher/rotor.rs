//! A single wired rotor with ring setting, position and notches.

use super::{check_setting, Permutation, RotorModel, ALPHABET_SIZE};
use crate::error::Result;

const A: u8 = ALPHABET_SIZE as u8;

/// Rotor state: catalog wiring plus the two mutable offsets.
///
/// The signal enters at contact `i` and meets the wiring at
/// `i + position - ring (mod A)`; see [`Rotor::encode_forward`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotor {
    model: RotorModel,
    wiring: Permutation,
    /// Bit `k` set when position `k` is a notch.
    notches: u32,
    ring: u8,
    position: u8,
}

impl Rotor {
    pub fn new(model: RotorModel, ring: u8, position: u8) -> Result<Self> {
        let wiring = Permutation::from_letters(model.wiring())?;
        let notches = model
            .notches()
            .bytes()
            .fold(0u32, |bits, letter| bits | 1 << (letter - b'A'));
        Ok(Self {
            model,
            wiring,
            notches,
            ring: check_setting("ring setting", ring)?,
            position: check_setting("rotor position", position)?,
        })
    }

    pub fn model(&self) -> RotorModel {
        self.model
    }

    pub fn ring(&self) -> u8 {
        self.ring
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn set_ring(&mut self, ring: u8) -> Result<()> {
        self.ring = check_setting("ring setting", ring)?;
        Ok(())
    }

    pub fn set_position(&mut self, position: u8) -> Result<()> {
        self.position = check_setting("rotor position", position)?;
        Ok(())
    }

    /// Unchecked setters for the search hot path; values come from a validated keyspace.
    #[inline]
    pub(crate) fn set_state_unchecked(&mut self, ring: u8, position: u8) {
        debug_assert!(ring < A && position < A);
        self.ring = ring;
        self.position = position;
    }

    /// Notch positions in ascending order.
    pub fn notch_positions(&self) -> Vec<u8> {
        (0..A).filter(|&p| self.notches & (1 << p) != 0).collect()
    }

    #[inline]
    pub fn at_notch(&self) -> bool {
        self.notches & (1 << self.position) != 0
    }

    /// Advance one position; true when the rotor now sits on a notch.
    #[inline]
    pub fn step(&mut self) -> bool {
        self.position = if self.position + 1 == A {
            0
        } else {
            self.position + 1
        };
        self.at_notch()
    }

    #[inline]
    fn shift(&self) -> u8 {
        (self.position + A - self.ring) % A
    }

    /// Right-to-left pass (towards the reflector).
    #[inline]
    pub fn encode_forward(&self, index: u8) -> u8 {
        let shift = self.shift();
        let contact = self.wiring.forward((index + shift) % A);
        (contact + A - shift) % A
    }

    /// Left-to-right pass (back from the reflector).
    #[inline]
    pub fn encode_backward(&self, index: u8) -> u8 {
        let shift = self.shift();
        let contact = self.wiring.backward((index + shift) % A);
        (contact + A - shift) % A
    }
}
