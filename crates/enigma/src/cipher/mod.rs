//! Enigma cipher engine: permutations, rotors, reflector, plugboard, machine.
//!
//! Purpose
//! - Model every stage of the signal path as a bijection over alphabet indices
//!   `0..ALPHABET_SIZE`, so the machine is a plain composition of stages.
//! - Keep rotor state as small `Copy` values owned by the [`Machine`]; there is
//!   no shared or aliased rotor state.
//!
//! Conventions
//! - Letters are `u8` alphabet indices inside the engine (`A = 0`). Text-facing
//!   entry points take uppercase ASCII and reject anything else.
//! - Rotor slots are ordered leftmost to rightmost; the rightmost is the fast rotor.

mod catalog;
mod machine;
mod permutation;
mod plugboard;
mod reflector;
mod rotor;

pub use catalog::{ReflectorModel, RotorModel};
pub use machine::Machine;
pub use permutation::Permutation;
pub use plugboard::Plugboard;
pub use reflector::Reflector;
pub use rotor::Rotor;

use crate::error::{EnigmaError, Result};

/// Number of letters on the keyboard.
pub const ALPHABET_SIZE: usize = 26;
/// Largest rotor stack a machine accepts (the naval M4).
pub const MAX_ROTORS: usize = 4;
/// Only this many rotors (counted from the right) are driven by pawls.
pub const STEPPING_ROTORS: usize = 3;
/// A plugboard can pair every letter at most once.
pub const MAX_PLUGBOARD_PAIRS: usize = ALPHABET_SIZE / 2;

/// Shared `forward`/`backward` contract of the fixed stages in the signal path.
pub trait Wiring {
    fn forward(&self, index: u8) -> u8;
    fn backward(&self, index: u8) -> u8;
}

/// Uppercase ASCII letter to alphabet index.
#[inline]
pub fn letter_index(letter: u8) -> Option<u8> {
    letter.is_ascii_uppercase().then(|| letter - b'A')
}

/// Alphabet index to uppercase ASCII letter.
#[inline]
pub fn index_letter(index: u8) -> u8 {
    debug_assert!((index as usize) < ALPHABET_SIZE);
    b'A' + index
}

/// Convert uppercase text into alphabet indices, rejecting anything else.
pub fn text_to_indices(text: &[u8]) -> Result<Vec<u8>> {
    text.iter()
        .enumerate()
        .map(|(offset, &b)| {
            letter_index(b).ok_or(EnigmaError::InvalidCharacter {
                offset,
                found: b as char,
            })
        })
        .collect()
}

/// Inverse of [`text_to_indices`].
pub fn indices_to_text(indices: &[u8]) -> String {
    indices.iter().map(|&i| index_letter(i) as char).collect()
}

/// Parse a letter setting ("A".."Z", either case) into an index.
pub(crate) fn parse_setting_letter(c: char) -> Result<u8> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Ok(upper as u8 - b'A')
    } else {
        Err(EnigmaError::config(format!("setting {c:?} is not a letter")))
    }
}

pub(crate) fn check_setting(what: &str, value: u8) -> Result<u8> {
    if (value as usize) < ALPHABET_SIZE {
        Ok(value)
    } else {
        Err(EnigmaError::config(format!(
            "{what} {value} out of range 0..{ALPHABET_SIZE}"
        )))
    }
}

#[cfg(test)]
mod tests;
