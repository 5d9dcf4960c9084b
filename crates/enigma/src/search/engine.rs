//! Parallel keyspace scan.
//!
//! Model
//! - Blocks (rotor arrangement × reflector) run one after another; inside a
//!   block rayon splits the offsets into contiguous chunks. Each worker owns a
//!   machine, scratch buffers and a private [`TopK`]; chunk trackers are merged
//!   left to right, so results do not depend on the thread count.
//! - Cancellation is checked before every block and every candidate. A
//!   cancelled search still returns what it has ranked so far.
//! - With a hill-climbed plugboard the scan ranks rotor settings by IoC alone
//!   and the climb applies the full scoring model afterwards.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::keyspace::Keyspace;
use super::plugboard::climb;
use super::topk::TopK;
use super::types::{
    PlugboardSearch, ScoreRecord, SearchBounds, SearchContext, SearchOutcome, SearchStatus,
};
use super::CancelToken;
use crate::cipher::{text_to_indices, Machine};
use crate::config::MachineSettings;
use crate::error::{EnigmaError, Result};
use crate::score::{Crib, ScorerFlags, ScoringModel};

/// Per-thread state of a block scan.
struct Worker {
    machine: Machine,
    rings: Vec<u8>,
    positions: Vec<u8>,
    plain: Vec<u8>,
    top: TopK<ScoreRecord>,
    evaluated: u64,
}

impl Worker {
    fn new(machine: Machine, capacity: usize, text_len: usize) -> Self {
        let n = machine.rotors().len();
        Self {
            machine,
            rings: vec![0; n],
            positions: vec![0; n],
            plain: Vec::with_capacity(text_len),
            top: TopK::new(capacity),
            evaluated: 0,
        }
    }
}

/// Read-only inputs shared by the workers of one block.
struct BlockScan<'s, 'a> {
    keyspace: &'s Keyspace,
    block: u64,
    ciphertext: &'s [u8],
    model: &'s ScoringModel<'a>,
    /// Fixed crib offset for early rejection.
    prune: Option<(usize, &'a Crib)>,
    cancel: &'s CancelToken,
}

impl BlockScan<'_, '_> {
    fn visit(&self, mut w: Worker, offset: u64) -> Worker {
        if self.cancel.is_cancelled() {
            return w;
        }
        self.keyspace
            .fill_state(offset, &mut w.rings, &mut w.positions);
        w.machine.set_state_unchecked(&w.rings, &w.positions);
        w.evaluated += 1;

        if let Some((at, crib)) = self.prune {
            w.machine.advance(at);
            let span = &self.ciphertext[at..at + crib.len()];
            let machine = &mut w.machine;
            if span
                .iter()
                .zip(crib.letters())
                .any(|(&c, &p)| machine.encode_index(c) != p)
            {
                return w;
            }
            w.machine.set_state_unchecked(&w.rings, &w.positions);
        }

        w.machine.encode_indices(self.ciphertext, &mut w.plain);
        if let Some(eval) = self.model.evaluate(&w.plain) {
            if w.top.would_accept(eval.score) {
                w.top.offer(ScoreRecord {
                    key: self.keyspace.key_in_block(self.block, offset),
                    score: eval.score,
                    flags: eval.flags,
                    index: self.block * self.keyspace.block_len() + offset,
                });
            }
        }
        w
    }
}

/// Rank the keyspace in `bounds` against `ciphertext` (uppercase `A-Z`).
///
/// `EmptyCiphertext` and malformed input are reported before any work, as are
/// invalid bounds and scorers enabled without their tables.
pub fn run_search(
    ciphertext: &str,
    bounds: &SearchBounds,
    scorers: ScorerFlags,
    capacity: usize,
    ctx: &SearchContext<'_>,
) -> Result<SearchOutcome> {
    let started = Instant::now();
    if ciphertext.is_empty() {
        return Err(EnigmaError::EmptyCiphertext);
    }
    let cipher = text_to_indices(ciphertext.as_bytes())?;
    if capacity == 0 {
        return Err(EnigmaError::bounds("top-K capacity must be positive"));
    }
    let keyspace = Keyspace::new(bounds)?;
    let model = ScoringModel::new(scorers)
        .with_ngrams(ctx.ngrams)
        .with_dictionary(ctx.dictionary, ctx.dictionary_min_matches)
        .with_band(ctx.band)
        .with_letter_targets(ctx.letter_targets)
        .with_crib(ctx.crib, &cipher);
    model.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ctx.threads.unwrap_or(0))
        .build()
        .map_err(|e| EnigmaError::config(format!("thread pool: {e}")))?;

    let finish = |records: Vec<ScoreRecord>, status: SearchStatus, evaluated: u64| {
        let elapsed = started.elapsed();
        info!(
            status = ?status,
            evaluated,
            kept = records.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );
        SearchOutcome {
            records,
            status,
            evaluated,
            keyspace_len: keyspace.len(),
            elapsed,
        }
    };

    if !model.crib_is_possible() {
        if let Some(crib) = ctx.crib {
            warn!(%crib, "crib cannot align with the ciphertext without self-encryption");
        }
        return Ok(finish(Vec::new(), SearchStatus::Completed, 0));
    }

    let (scan_model, scan_capacity, climb_budget) = match bounds.plugboard {
        PlugboardSearch::Fixed(_) => (model.clone(), capacity, None),
        PlugboardSearch::HillClimb {
            max_pairs,
            candidates,
        } => (
            model.plugboard_tolerant(),
            capacity.max(candidates),
            Some(max_pairs),
        ),
    };
    let prune = scan_model.fixed_crib_offset().zip(ctx.crib);

    info!(
        keyspace = keyspace.len(),
        blocks = keyspace.block_count(),
        threads = pool.current_num_threads(),
        scorers = %scorers,
        hill_climb = climb_budget.is_some(),
        "search started"
    );

    let slots = keyspace.slots();
    let mut top = TopK::new(scan_capacity);
    let mut evaluated = 0u64;
    for b in 0..keyspace.block_count() {
        if ctx.cancel.is_cancelled() {
            break;
        }
        let (rotors, reflector) = keyspace.block(b);
        let template = Machine::from_settings(&MachineSettings {
            rotors: rotors.to_vec(),
            rings: vec![0; slots],
            positions: vec![0; slots],
            reflector,
            plugboard: keyspace.plugboard().to_vec(),
        })?;
        let scan = BlockScan {
            keyspace: &keyspace,
            block: b,
            ciphertext: &cipher,
            model: &scan_model,
            prune,
            cancel: &ctx.cancel,
        };
        let (block_top, block_evaluated) = pool.install(|| {
            (0..keyspace.block_len())
                .into_par_iter()
                .fold(
                    || Worker::new(template.clone(), scan_capacity, cipher.len()),
                    |w, offset| scan.visit(w, offset),
                )
                .map(|w| (w.top, w.evaluated))
                .reduce(
                    || (TopK::new(scan_capacity), 0),
                    |(left, le), (right, re)| (left.merge(right), le + re),
                )
        });
        top = top.merge(block_top);
        evaluated += block_evaluated;
        debug!(
            block = b,
            rotors = ?rotors,
            reflector = %reflector,
            evaluated,
            best = ?top.iter().next().map(|r| r.score),
            "block scanned"
        );
    }

    if ctx.cancel.is_cancelled() {
        let mut records = top.into_vec();
        records.truncate(capacity);
        return Ok(finish(records, SearchStatus::Cancelled, evaluated));
    }

    let Some(max_pairs) = climb_budget else {
        return Ok(finish(top.into_vec(), SearchStatus::Completed, evaluated));
    };

    let seeds = top.into_vec();
    debug!(seeds = seeds.len(), max_pairs, "plugboard climb started");
    let refined: Result<Vec<_>> = pool.install(|| {
        seeds
            .par_iter()
            .map(|seed| {
                climb(&seed.key, &cipher, &model, max_pairs, &ctx.cancel)
                    .map(|(key, eval)| (key, eval, seed.index))
            })
            .collect()
    });
    match refined {
        Ok(refined) => {
            let mut final_top = TopK::new(capacity);
            for (key, eval, index) in refined {
                if let Some(eval) = eval {
                    final_top.offer(ScoreRecord {
                        key,
                        score: eval.score,
                        flags: eval.flags,
                        index,
                    });
                }
            }
            Ok(finish(final_top.into_vec(), SearchStatus::Completed, evaluated))
        }
        Err(EnigmaError::Cancelled) => {
            let mut records = seeds;
            records.truncate(capacity);
            Ok(finish(records, SearchStatus::Cancelled, evaluated))
        }
        Err(e) => Err(e),
    }
}
