//! Machine settings (the candidate key) and the structured snapshot.
//!
//! Purpose
//! - `MachineSettings` is the one value that describes a key: the search
//!   enumerates it, `Machine::from_settings` consumes it, key generation
//!   draws it.
//! - `MachineSnapshot` is plain data for printing and logging layers.
//!
//! Conventions
//! - Settings hold alphabet indices (`A = 0`); the text parsers below accept
//!   letters (`"ADU"`) or 1-based numbers (`"1 4 21"`) the way operators wrote them.

use std::fmt;

use serde::Serialize;

use crate::cipher::{ReflectorModel, RotorModel, ALPHABET_SIZE};
use crate::error::{EnigmaError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MachineSettings {
    /// Leftmost first.
    pub rotors: Vec<RotorModel>,
    pub rings: Vec<u8>,
    pub positions: Vec<u8>,
    pub reflector: ReflectorModel,
    pub plugboard: Vec<(u8, u8)>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            rotors: vec![RotorModel::I, RotorModel::II, RotorModel::III],
            rings: vec![0; 3],
            positions: vec![0; 3],
            reflector: ReflectorModel::B,
            plugboard: Vec::new(),
        }
    }
}

impl fmt::Display for MachineSettings {
    /// Compact key line, e.g. `I-II-III UKW-B rings AAA start ADU plugs AB CD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rotors: Vec<&str> = self.rotors.iter().map(|r| r.name()).collect();
        write!(
            f,
            "{} UKW-{} rings {} start {}",
            rotors.join("-"),
            self.reflector,
            letters(&self.rings),
            letters(&self.positions)
        )?;
        if !self.plugboard.is_empty() {
            let pairs: Vec<String> = self
                .plugboard
                .iter()
                .map(|&(a, b)| format!("{}{}", letter(a), letter(b)))
                .collect();
            write!(f, " plugs {}", pairs.join(" "))?;
        }
        Ok(())
    }
}

/// `?` marks an index outside the alphabet; settings are plain data and may
/// not have been validated yet.
fn letter(v: u8) -> char {
    if (v as usize) < ALPHABET_SIZE {
        (b'A' + v) as char
    } else {
        '?'
    }
}

fn letters(values: &[u8]) -> String {
    values.iter().map(|&v| letter(v)).collect()
}

/// Parse `"I II III"`, `"I,II,III"` or `"Beta-I-II-III"` into rotor models.
pub fn parse_rotor_list(s: &str) -> Result<Vec<RotorModel>> {
    let rotors = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<RotorModel>>>()?;
    if rotors.is_empty() {
        return Err(EnigmaError::config("empty rotor list"));
    }
    Ok(rotors)
}

/// Parse per-rotor settings: `"ADU"` (letters) or `"1 4 21"` (1-based numbers).
pub fn parse_settings(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.chars().any(|c| c.is_ascii_digit()) {
        s.split(|c: char| c.is_whitespace() || c == ',' || c == '-')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<usize>()
                    .ok()
                    .filter(|n| (1..=ALPHABET_SIZE).contains(n))
                    .map(|n| (n - 1) as u8)
                    .ok_or_else(|| {
                        EnigmaError::config(format!("setting {t:?} is not a number in 1..=26"))
                    })
            })
            .collect()
    } else {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(crate::cipher::parse_setting_letter)
            .collect()
    }
}

/// Per-rotor entry of a [`MachineSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RotorSnapshot {
    pub name: String,
    pub ring: char,
    pub position: char,
    pub notches: Vec<char>,
}

/// Serializable view of a machine's current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MachineSnapshot {
    pub rotors: Vec<RotorSnapshot>,
    pub reflector: String,
    pub plugboard: Vec<String>,
}
