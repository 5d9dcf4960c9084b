//! Text handling at the command-line boundary.
//!
//! The library only accepts uppercase `A-Z`. Operators type mixed case with
//! spaces and punctuation, so `encode` keeps their layout and `crack` strips
//! ciphertext down to letters.

use enigma::api::{letter_index, Machine};

/// Keep ASCII letters, uppercased; drop everything else.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Encipher letters (case preserved), pass other characters through unchanged.
/// Only letters step the rotors.
pub fn encode_preserving(machine: &mut Machine, text: &str) -> String {
    text.chars()
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                return c;
            }
            let upper = c.to_ascii_uppercase() as u8;
            let Some(index) = letter_index(upper) else {
                return c;
            };
            let out = (b'A' + machine.encode_index(index)) as char;
            if c.is_ascii_lowercase() {
                out.to_ascii_lowercase()
            } else {
                out
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_letters_only() {
        assert_eq!(sanitize("Hello, World!\n42 x"), "HELLOWORLDX");
        assert_eq!(sanitize("  \t"), "");
    }

    #[test]
    fn encode_preserves_case_and_punctuation() {
        let mut m = Machine::enigma_i_default().unwrap();
        assert_eq!(encode_preserving(&mut m, "Hello, World!"), "Ilbda, Amtaz!");
        assert_eq!(m.positions(), vec![0, 0, 10]);
    }

    #[test]
    fn encode_leaves_non_ascii_alone() {
        let mut m = Machine::enigma_i_default().unwrap();
        assert_eq!(encode_preserving(&mut m, "é 1"), "é 1");
        assert_eq!(m.positions(), vec![0, 0, 0]);
    }
}
