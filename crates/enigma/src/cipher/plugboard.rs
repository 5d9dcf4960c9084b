//! Plugboard (Steckerbrett): an involution built from disjoint letter pairs.

use std::str::FromStr;

use super::{check_setting, Permutation, Wiring, ALPHABET_SIZE, MAX_PLUGBOARD_PAIRS};
use crate::error::{EnigmaError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Plugboard {
    wiring: Permutation,
    pairs: u8,
}

impl Plugboard {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pairs as alphabet indices; fails on overlaps, self-pairs or too many pairs.
    pub fn from_pairs(pairs: &[(u8, u8)]) -> Result<Self> {
        pairs
            .iter()
            .try_fold(Self::empty(), |board, &(a, b)| board.with_pair(a, b))
    }

    /// A copy with one more pair plugged in.
    pub fn with_pair(&self, a: u8, b: u8) -> Result<Self> {
        let a = check_setting("plugboard letter", a)?;
        let b = check_setting("plugboard letter", b)?;
        if a == b {
            return Err(EnigmaError::config(format!(
                "plugboard cannot pair {} with itself",
                (b'A' + a) as char
            )));
        }
        if self.pairs as usize >= MAX_PLUGBOARD_PAIRS {
            return Err(EnigmaError::config(format!(
                "plugboard holds at most {MAX_PLUGBOARD_PAIRS} pairs"
            )));
        }
        for letter in [a, b] {
            if self.is_plugged(letter) {
                return Err(EnigmaError::config(format!(
                    "plugboard letter {} appears in two pairs",
                    (b'A' + letter) as char
                )));
            }
        }
        let mut map = self.table();
        map[a as usize] = b;
        map[b as usize] = a;
        Ok(Self {
            wiring: Permutation::new(map)?,
            pairs: self.pairs + 1,
        })
    }

    /// A copy with the pair containing `letter` removed (no-op when unplugged).
    pub fn without(&self, letter: u8) -> Self {
        if !self.is_plugged(letter) {
            return *self;
        }
        let partner = self.wiring.forward(letter);
        let mut map = self.table();
        map[letter as usize] = letter;
        map[partner as usize] = partner;
        Self {
            wiring: Permutation::new(map).unwrap_or_default(),
            pairs: self.pairs - 1,
        }
    }

    fn table(&self) -> [u8; ALPHABET_SIZE] {
        let mut map = [0u8; ALPHABET_SIZE];
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = self.wiring.forward(i as u8);
        }
        map
    }

    /// False for unplugged letters and for anything outside the alphabet.
    #[inline]
    pub fn is_plugged(&self, letter: u8) -> bool {
        (letter as usize) < ALPHABET_SIZE && self.wiring.forward(letter) != letter
    }

    pub fn pair_count(&self) -> usize {
        self.pairs as usize
    }

    /// Pairs with the smaller letter first, ordered by that letter.
    pub fn pairs(&self) -> Vec<(u8, u8)> {
        (0..ALPHABET_SIZE as u8)
            .filter_map(|a| {
                let b = self.wiring.forward(a);
                (a < b).then_some((a, b))
            })
            .collect()
    }

    /// `"AB CD"` rendering of [`Plugboard::pairs`].
    pub fn pair_strings(&self) -> Vec<String> {
        self.pairs()
            .into_iter()
            .map(|(a, b)| [(b'A' + a) as char, (b'A' + b) as char].iter().collect())
            .collect()
    }

    pub fn wiring(&self) -> &Permutation {
        &self.wiring
    }
}

impl Wiring for Plugboard {
    #[inline]
    fn forward(&self, index: u8) -> u8 {
        self.wiring.forward(index)
    }
    #[inline]
    fn backward(&self, index: u8) -> u8 {
        self.wiring.forward(index)
    }
}

impl FromStr for Plugboard {
    type Err = EnigmaError;

    /// Accepts `"AB CD EF"`, `"ABCDEF"`, `"ab-cd"`; separators are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let letters: Vec<u8> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != ',')
            .map(super::parse_setting_letter)
            .collect::<Result<_>>()?;
        if letters.len() % 2 != 0 {
            return Err(EnigmaError::config(format!(
                "plugboard {s:?} has an unpaired letter"
            )));
        }
        let pairs: Vec<(u8, u8)> = letters.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        Self::from_pairs(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separated_and_packed_pairs() {
        let a: Plugboard = "AB CD-ef".parse().unwrap();
        let b: Plugboard = "ABCDEF".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.pair_count(), 3);
        assert_eq!(a.pair_strings(), vec!["AB", "CD", "EF"]);
        assert_eq!(a.forward(0), 1);
        assert_eq!(a.backward(1), 0);
        assert_eq!(a.forward(25), 25);
    }

    #[test]
    fn overlapping_and_odd_pairings_fail() {
        assert!(matches!(
            "AB AC".parse::<Plugboard>(),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
        assert!("ABC".parse::<Plugboard>().is_err());
        assert!("AA".parse::<Plugboard>().is_err());
        assert!("A1".parse::<Plugboard>().is_err());
    }

    #[test]
    fn at_most_thirteen_pairs() {
        let all: Plugboard = "ABCDEFGHIJKLMNOPQRSTUVWXYZ".parse().unwrap();
        assert_eq!(all.pair_count(), MAX_PLUGBOARD_PAIRS);
        assert!(all.wiring().is_involution());
        assert_eq!(all.wiring().fixed_points().count(), 0);
    }

    #[test]
    fn without_removes_whole_pair() {
        let board: Plugboard = "AZ BY".parse().unwrap();
        let fewer = board.without(25);
        assert_eq!(fewer.pair_count(), 1);
        assert!(!fewer.is_plugged(0));
        assert!(fewer.is_plugged(1));
        assert_eq!(fewer.without(7), fewer);
    }

    #[test]
    fn letters_outside_the_alphabet_are_never_plugged() {
        let board: Plugboard = "AZ".parse().unwrap();
        assert!(!board.is_plugged(26));
        assert!(!board.is_plugged(u8::MAX));
        assert_eq!(board.without(200), board);
        assert!(board.with_pair(1, 26).is_err());
    }
}
