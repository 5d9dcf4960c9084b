//! Enigma cipher simulation and key recovery.
//!
//! Layout
//! - `cipher`: permutations, rotors, reflectors, plugboard and the stepping machine.
//! - `score`: index of coincidence, n-gram, dictionary and crib scorers.
//! - `search`: keyspace enumeration, top-K ranking, parallel scan, plugboard climb.
//! - `config` / `keygen`: key values, snapshots and seeded random keys.
//!
//! Loading n-gram files and word lists, sanitizing text and printing are the
//! caller's job; this crate takes parsed tables and uppercase `A-Z` text.

pub mod api;
pub mod cipher;
pub mod config;
pub mod error;
pub mod keygen;
pub mod score;
pub mod search;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{EnigmaError, Result};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cipher::{Machine, Plugboard, ReflectorModel, RotorModel};
    pub use crate::config::{MachineSettings, MachineSnapshot};
    pub use crate::error::{EnigmaError, Result};
    pub use crate::score::{
        Crib, CribOffset, Dictionary, IocBand, Language, LetterTargets, NgramTable, ScorerFlags,
        WordSplit,
    };
    pub use crate::search::{
        run_search, CancelToken, PlugboardSearch, ScoreRecord, SearchBounds, SearchContext,
        SearchOutcome, SearchStatus,
    };
}
