//! Random keys with replay tokens.
//!
//! Purpose
//! - Draw valid `MachineSettings` for demos, benches and property tests, and
//!   make every draw reproducible from a `(seed, index)` pair.
//!
//! Model
//! - Three-rotor keys pick distinct rotors from I-VIII and a full-width
//!   reflector (B or C). Four-rotor keys put a greek rotor leftmost and use a
//!   thin reflector, as the M4 did.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cipher::{ReflectorModel, RotorModel, ALPHABET_SIZE, MAX_PLUGBOARD_PAIRS, MAX_ROTORS};
use crate::config::MachineSettings;
use crate::error::{EnigmaError, Result};

#[derive(Clone, Copy, Debug)]
pub struct KeyGenCfg {
    /// 1..=4 rotors; 4 means an M4 key with a greek rotor.
    pub rotor_count: usize,
    /// Number of plugboard pairs, at most 13. The Wehrmacht used 10.
    pub plug_pairs: usize,
}

impl Default for KeyGenCfg {
    fn default() -> Self {
        Self {
            rotor_count: 3,
            plug_pairs: 10,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64) -> Self {
        Self { seed, index: 0 }
    }

    /// Token for the following draw.
    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random valid key.
pub fn draw_settings(cfg: KeyGenCfg, tok: ReplayToken) -> Result<MachineSettings> {
    if cfg.rotor_count == 0 || cfg.rotor_count > MAX_ROTORS {
        return Err(EnigmaError::config(format!(
            "rotor count {} out of range 1..={MAX_ROTORS}",
            cfg.rotor_count
        )));
    }
    if cfg.plug_pairs > MAX_PLUGBOARD_PAIRS {
        return Err(EnigmaError::config(format!(
            "{} plug pairs exceed the {MAX_PLUGBOARD_PAIRS} a plugboard holds",
            cfg.plug_pairs
        )));
    }
    let mut rng = tok.to_std_rng();

    let mut pool: Vec<RotorModel> = RotorModel::ALL
        .into_iter()
        .filter(|m| !m.is_greek())
        .collect();
    pool.shuffle(&mut rng);
    let mut rotors: Vec<RotorModel> = Vec::with_capacity(cfg.rotor_count);
    let reflector = if cfg.rotor_count == MAX_ROTORS {
        rotors.push(if rng.gen::<bool>() {
            RotorModel::Beta
        } else {
            RotorModel::Gamma
        });
        rotors.extend_from_slice(&pool[..MAX_ROTORS - 1]);
        if rng.gen::<bool>() {
            ReflectorModel::BThin
        } else {
            ReflectorModel::CThin
        }
    } else {
        rotors.extend_from_slice(&pool[..cfg.rotor_count]);
        if rng.gen::<bool>() {
            ReflectorModel::B
        } else {
            ReflectorModel::C
        }
    };

    let n = rotors.len();
    let rings = (0..n)
        .map(|_| rng.gen_range(0..ALPHABET_SIZE as u8))
        .collect();
    let positions = (0..n)
        .map(|_| rng.gen_range(0..ALPHABET_SIZE as u8))
        .collect();

    let mut plug_letters: Vec<u8> = (0..ALPHABET_SIZE as u8).collect();
    plug_letters.shuffle(&mut rng);
    let plugboard = plug_letters[..2 * cfg.plug_pairs]
        .chunks_exact(2)
        .map(|p| (p[0].min(p[1]), p[0].max(p[1])))
        .collect();

    Ok(MachineSettings {
        rotors,
        rings,
        positions,
        reflector,
        plugboard,
    })
}
