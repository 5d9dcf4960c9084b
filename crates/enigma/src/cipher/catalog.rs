//! Historical rotor and reflector catalog.
//!
//! Wirings are listed as the letter each input `A..Z` maps to at ring `A`,
//! position `A`. Notches are the window letters from which a rotor carries its
//! left neighbour on the next keypress.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{EnigmaError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RotorModel {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    Beta,
    Gamma,
}

impl RotorModel {
    pub const ALL: [RotorModel; 10] = [
        Self::I,
        Self::II,
        Self::III,
        Self::IV,
        Self::V,
        Self::VI,
        Self::VII,
        Self::VIII,
        Self::Beta,
        Self::Gamma,
    ];

    /// Rotors I-V issued with the Enigma I.
    pub const WEHRMACHT: [RotorModel; 5] = [Self::I, Self::II, Self::III, Self::IV, Self::V];

    pub fn name(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
            Self::VI => "VI",
            Self::VII => "VII",
            Self::VIII => "VIII",
            Self::Beta => "Beta",
            Self::Gamma => "Gamma",
        }
    }

    pub fn wiring(self) -> &'static str {
        match self {
            Self::I => "EKMFLGDQVZNTOWYHXUSPAIBRCJ",
            Self::II => "AJDKSIRUXBLHWTMCQGZNPYFVOE",
            Self::III => "BDFHJLCPRTXVZNYEIWGAKMUSQO",
            Self::IV => "ESOVPZJAYQUIRHXLNFTGKDCMWB",
            Self::V => "VZBRGITYUPSDNHLXAWMJQOFECK",
            Self::VI => "JPGVOUMFYQBENHZRDKASXLICTW",
            Self::VII => "NZJHGRCXMYSWBOUFAIVLPEKQDT",
            Self::VIII => "FKQHTLXOCBJSPDZRAMEWNIUYGV",
            Self::Beta => "LEYJVCNIXWPBQMDRTAKZGFUHOS",
            Self::Gamma => "FSOKANUERHMBTIYCWLQPZXVGJD",
        }
    }

    pub fn notches(self) -> &'static str {
        match self {
            Self::I => "Q",
            Self::II => "E",
            Self::III => "V",
            Self::IV => "J",
            Self::V => "Z",
            Self::VI | Self::VII | Self::VIII => "ZM",
            Self::Beta | Self::Gamma => "",
        }
    }

    /// Greek rotors only fit the non-stepping fourth slot of the M4.
    pub fn is_greek(self) -> bool {
        matches!(self, Self::Beta | Self::Gamma)
    }
}

impl fmt::Display for RotorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RotorModel {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EnigmaError::config(format!("unknown rotor {wanted:?}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ReflectorModel {
    A,
    B,
    C,
    BThin,
    CThin,
}

impl ReflectorModel {
    pub const ALL: [ReflectorModel; 5] = [Self::A, Self::B, Self::C, Self::BThin, Self::CThin];

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::BThin => "B-thin",
            Self::CThin => "C-thin",
        }
    }

    pub fn wiring(self) -> &'static str {
        match self {
            Self::A => "EJMZALYXVBWFCRQUONTSPIKHGD",
            Self::B => "YRUHQSLDPXNGOKMIEBFZCWVJAT",
            Self::C => "FVPJIAOYEDRZXWGCTKUQSBNMHL",
            Self::BThin => "ENKQAUYWJICOPBLMDXZVFTHRGS",
            Self::CThin => "RDOBJNTKVEHMLFCWZAXGYIPSUQ",
        }
    }

    pub fn is_thin(self) -> bool {
        matches!(self, Self::BThin | Self::CThin)
    }
}

impl fmt::Display for ReflectorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReflectorModel {
    type Err = EnigmaError;

    /// Accepts `B`, `ukw-b`, `UKW B`, `b-thin`, `bthin`.
    fn from_str(s: &str) -> Result<Self> {
        let mut key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        if let Some(rest) = key.strip_prefix("UKW") {
            key = rest.to_string();
        }
        match key.as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "BTHIN" => Ok(Self::BThin),
            "CTHIN" => Ok(Self::CThin),
            _ => Err(EnigmaError::config(format!("unknown reflector {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::Permutation;

    #[test]
    fn every_catalog_wiring_is_a_permutation() {
        for model in RotorModel::ALL {
            assert!(Permutation::from_letters(model.wiring()).is_ok(), "{model}");
        }
        for model in ReflectorModel::ALL {
            let p = Permutation::from_letters(model.wiring()).unwrap();
            assert!(p.is_involution(), "{model}");
            assert_eq!(p.fixed_points().count(), 0, "{model}");
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for model in RotorModel::ALL {
            assert_eq!(model.name().parse::<RotorModel>().unwrap(), model);
        }
        assert_eq!("viii".parse::<RotorModel>().unwrap(), RotorModel::VIII);
        assert_eq!("UKW-B".parse::<ReflectorModel>().unwrap(), ReflectorModel::B);
        assert_eq!("c-thin".parse::<ReflectorModel>().unwrap(), ReflectorModel::CThin);
        assert!("IX".parse::<RotorModel>().is_err());
        assert!("D".parse::<ReflectorModel>().is_err());
    }
}
