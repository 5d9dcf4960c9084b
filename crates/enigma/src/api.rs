//! Curated surface for the command-line front end and benches.
//!
//! Prefer these re-exports over reaching into submodules; names here are
//! grouped by the stage of the pipeline they belong to.

// Cipher engine
pub use crate::cipher::{
    indices_to_text, letter_index, text_to_indices, Machine, Permutation, Plugboard, Reflector,
    ReflectorModel, Rotor, RotorModel, Wiring, ALPHABET_SIZE, MAX_PLUGBOARD_PAIRS, MAX_ROTORS,
};
// Keys and snapshots
pub use crate::config::{
    parse_rotor_list, parse_settings, MachineSettings, MachineSnapshot, RotorSnapshot,
};
pub use crate::keygen::{draw_settings, KeyGenCfg, ReplayToken as KeyReplay};
// Scorers
pub use crate::score::{
    index_of_coincidence, Crib, CribOffset, Dictionary, Evaluation, IocBand, Language,
    LetterTargets, NgramTable, ScorerFlags, ScoringModel, WordSplit, DEFAULT_MIN_MATCHES,
};
// Search
pub use crate::search::{
    run_search, CancelToken, Keyspace, PlugboardSearch, ScoreRecord, SearchBounds, SearchContext,
    SearchOutcome, SearchStatus, TopK,
};
