//! Greedy plugboard recovery for a fixed rotor setting.
//!
//! Each round tries every pair of unplugged letters and keeps the single pair
//! that improves the objective most; the climb stops at the pair budget or
//! when no pair improves. The objective ranks by crib letters matched (when a
//! crib is enabled) and then by fitness.

use super::CancelToken;
use crate::cipher::{Machine, Plugboard, ALPHABET_SIZE};
use crate::config::MachineSettings;
use crate::error::Result;
use crate::score::{Evaluation, ScorerFlags, ScoringModel};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Objective {
    crib_hits: usize,
    fitness: f64,
}

impl Objective {
    fn beats(&self, other: &Objective) -> bool {
        self.crib_hits > other.crib_hits
            || (self.crib_hits == other.crib_hits && self.fitness > other.fitness)
    }
}

struct Climber<'m, 'a> {
    machine: Machine,
    rings: Vec<u8>,
    positions: Vec<u8>,
    plain: Vec<u8>,
    ciphertext: &'m [u8],
    model: &'m ScoringModel<'a>,
}

impl Climber<'_, '_> {
    fn decode(&mut self, board: Plugboard) {
        self.machine.set_plugboard(board);
        self.machine.set_state_unchecked(&self.rings, &self.positions);
        self.machine.encode_indices(self.ciphertext, &mut self.plain);
    }

    fn objective(&mut self, board: Plugboard) -> Objective {
        self.decode(board);
        Objective {
            crib_hits: self.crib_hits(),
            fitness: self.model.fitness(&self.plain),
        }
    }

    /// Best count of agreeing crib letters over the admissible offsets.
    fn crib_hits(&self) -> usize {
        let crib = match self.model.crib() {
            Some(c) if self.model.flags().contains(ScorerFlags::KNOWN_PLAINTEXT) => c,
            _ => return 0,
        };
        self.model
            .crib_offsets()
            .iter()
            .map(|&o| {
                self.plain[o..o + crib.len()]
                    .iter()
                    .zip(crib.letters())
                    .filter(|(a, b)| a == b)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }
}

/// Climb from the key's own plugboard; returns the refined key and its
/// evaluation under the full model (`None` if a filter rejects it).
pub(crate) fn climb(
    key: &MachineSettings,
    ciphertext: &[u8],
    model: &ScoringModel<'_>,
    max_pairs: usize,
    cancel: &CancelToken,
) -> Result<(MachineSettings, Option<Evaluation>)> {
    let machine = Machine::from_settings(key)?;
    let mut board = *machine.plugboard();
    let mut climber = Climber {
        rings: machine.rings(),
        positions: machine.positions(),
        machine,
        plain: Vec::with_capacity(ciphertext.len()),
        ciphertext,
        model,
    };

    let mut best = climber.objective(board);
    while board.pair_count() < max_pairs {
        cancel.check()?;
        let mut step: Option<(Plugboard, Objective)> = None;
        for a in 0..ALPHABET_SIZE as u8 {
            if board.is_plugged(a) {
                continue;
            }
            for b in a + 1..ALPHABET_SIZE as u8 {
                if board.is_plugged(b) {
                    continue;
                }
                let candidate = board.with_pair(a, b)?;
                let o = climber.objective(candidate);
                if step.as_ref().map_or(true, |(_, s)| o.beats(s)) {
                    step = Some((candidate, o));
                }
            }
        }
        match step {
            Some((candidate, o)) if o.beats(&best) => {
                board = candidate;
                best = o;
            }
            _ => break,
        }
    }

    climber.decode(board);
    let eval = model.evaluate(&climber.plain);
    let mut refined = key.clone();
    refined.plugboard = board.pairs();
    Ok((refined, eval))
}
