//! The assembled machine: rotor stack, reflector, plugboard and the stepping
//! state machine.
//!
//! Model
//! - State is the tuple of rotor positions; it changes once per encoded letter,
//!   before the letter is enciphered.
//! - Stepping uses pre-step notch positions. The pawl left of rotor `p` engages
//!   when rotor `p` sits on a notch and then pushes both rotor `p` and its left
//!   neighbour. Hence a middle rotor on its own notch steps on two consecutive
//!   keypresses (double-step).
//! - Only the rightmost [`STEPPING_ROTORS`] rotors have pawls; the fourth rotor
//!   of an M4 stays put.

use super::{
    check_setting, Plugboard, Reflector, Rotor, Wiring, ALPHABET_SIZE, MAX_ROTORS,
    STEPPING_ROTORS,
};
use crate::config::{MachineSettings, MachineSnapshot, RotorSnapshot};
use crate::error::{EnigmaError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    /// Leftmost first; the last entry is the fast rotor.
    rotors: Vec<Rotor>,
    reflector: Reflector,
    plugboard: Plugboard,
}

impl Machine {
    pub fn new(rotors: Vec<Rotor>, reflector: Reflector, plugboard: Plugboard) -> Result<Self> {
        if rotors.is_empty() || rotors.len() > MAX_ROTORS {
            return Err(EnigmaError::config(format!(
                "machine needs 1..={MAX_ROTORS} rotors, got {}",
                rotors.len()
            )));
        }
        for (i, r) in rotors.iter().enumerate() {
            if rotors[..i].iter().any(|other| other.model() == r.model()) {
                return Err(EnigmaError::config(format!(
                    "rotor {} is fitted twice",
                    r.model()
                )));
            }
        }
        Ok(Self {
            rotors,
            reflector,
            plugboard,
        })
    }

    /// Build from a settings value; every invariant violation is reported.
    pub fn from_settings(settings: &MachineSettings) -> Result<Self> {
        let n = settings.rotors.len();
        if settings.rings.len() != n || settings.positions.len() != n {
            return Err(EnigmaError::config(format!(
                "{} rotors but {} ring settings and {} positions",
                n,
                settings.rings.len(),
                settings.positions.len()
            )));
        }
        let rotors = settings
            .rotors
            .iter()
            .zip(&settings.rings)
            .zip(&settings.positions)
            .map(|((&model, &ring), &pos)| Rotor::new(model, ring, pos))
            .collect::<Result<Vec<_>>>()?;
        let reflector = Reflector::new(settings.reflector)?;
        let plugboard = Plugboard::from_pairs(&settings.plugboard)?;
        Self::new(rotors, reflector, plugboard)
    }

    /// Enigma I default: rotors I II III, UKW-B, rings and positions at A, no plugs.
    pub fn enigma_i_default() -> Result<Self> {
        Self::from_settings(&MachineSettings::default())
    }

    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }

    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    pub fn set_plugboard(&mut self, plugboard: Plugboard) {
        self.plugboard = plugboard;
    }

    pub fn positions(&self) -> Vec<u8> {
        self.rotors.iter().map(Rotor::position).collect()
    }

    pub fn rings(&self) -> Vec<u8> {
        self.rotors.iter().map(Rotor::ring).collect()
    }

    pub fn set_positions(&mut self, positions: &[u8]) -> Result<()> {
        self.check_len("positions", positions.len())?;
        for &p in positions {
            check_setting("rotor position", p)?;
        }
        for (rotor, &p) in self.rotors.iter_mut().zip(positions) {
            rotor.set_position(p)?;
        }
        Ok(())
    }

    pub fn set_rings(&mut self, rings: &[u8]) -> Result<()> {
        self.check_len("ring settings", rings.len())?;
        for &r in rings {
            check_setting("ring setting", r)?;
        }
        for (rotor, &r) in self.rotors.iter_mut().zip(rings) {
            rotor.set_ring(r)?;
        }
        Ok(())
    }

    /// Reset rings and positions from validated slices (search hot path).
    #[inline]
    pub(crate) fn set_state_unchecked(&mut self, rings: &[u8], positions: &[u8]) {
        debug_assert_eq!(rings.len(), self.rotors.len());
        debug_assert_eq!(positions.len(), self.rotors.len());
        for ((rotor, &r), &p) in self.rotors.iter_mut().zip(rings).zip(positions) {
            rotor.set_state_unchecked(r, p);
        }
    }

    fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len == self.rotors.len() {
            Ok(())
        } else {
            Err(EnigmaError::config(format!(
                "{} {what} for {} rotors",
                len,
                self.rotors.len()
            )))
        }
    }

    /// Advance the rotor stack by one keypress.
    pub fn step(&mut self) {
        let n = self.rotors.len();
        let first = n - n.min(STEPPING_ROTORS);
        let mut advance = [false; MAX_ROTORS];
        advance[n - 1] = true;
        // Pawl p sits left of rotor p; the leftmost stepping rotor has none.
        for p in first + 1..n {
            if self.rotors[p].at_notch() {
                advance[p] = true;
                advance[p - 1] = true;
            }
        }
        for (rotor, &go) in self.rotors.iter_mut().zip(&advance) {
            if go {
                rotor.step();
            }
        }
    }

    /// Step `n` times without enciphering.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Signal path for the current rotor state, without stepping.
    #[inline]
    fn pass(&self, index: u8) -> u8 {
        let mut i = self.plugboard.forward(index);
        for rotor in self.rotors.iter().rev() {
            i = rotor.encode_forward(i);
        }
        i = self.reflector.forward(i);
        for rotor in &self.rotors {
            i = rotor.encode_backward(i);
        }
        self.plugboard.backward(i)
    }

    /// Step, then encipher one alphabet index.
    #[inline]
    pub fn encode_index(&mut self, index: u8) -> u8 {
        debug_assert!((index as usize) < ALPHABET_SIZE);
        self.step();
        self.pass(index)
    }

    /// Encipher alphabet indices into `out` (cleared first).
    pub fn encode_indices(&mut self, input: &[u8], out: &mut Vec<u8>) {
        out.clear();
        out.extend(input.iter().map(|&i| self.encode_index(i)));
    }

    /// Encipher uppercase ASCII; the rotor state is untouched when input is rejected.
    pub fn encode_bytes(&mut self, text: &[u8]) -> Result<Vec<u8>> {
        let indices = super::text_to_indices(text)?;
        Ok(indices
            .into_iter()
            .map(|i| super::index_letter(self.encode_index(i)))
            .collect())
    }

    pub fn encode(&mut self, text: &str) -> Result<String> {
        let indices = super::text_to_indices(text.as_bytes())?;
        let mut out = Vec::with_capacity(indices.len());
        self.encode_indices(&indices, &mut out);
        Ok(super::indices_to_text(&out))
    }

    /// Current settings (positions reflect every keypress so far).
    ///
    /// Settings name catalog reflectors only, so a machine with a custom
    /// reflector wiring has none and reports a configuration error.
    pub fn settings(&self) -> Result<MachineSettings> {
        let reflector = self.reflector.model().ok_or_else(|| {
            EnigmaError::config("custom reflector wiring has no catalog settings")
        })?;
        Ok(MachineSettings {
            rotors: self.rotors.iter().map(Rotor::model).collect(),
            rings: self.rings(),
            positions: self.positions(),
            reflector,
            plugboard: self.plugboard.pairs(),
        })
    }

    /// Structured, serializable view for logging and printing layers.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            rotors: self
                .rotors
                .iter()
                .map(|r| RotorSnapshot {
                    name: r.model().name().to_string(),
                    ring: (b'A' + r.ring()) as char,
                    position: (b'A' + r.position()) as char,
                    notches: r
                        .notch_positions()
                        .into_iter()
                        .map(|n| (b'A' + n) as char)
                        .collect(),
                })
                .collect(),
            reflector: self.reflector.name().to_string(),
            plugboard: self.plugboard.pair_strings(),
        }
    }
}
