//! Cryptanalysis search: keyspace enumeration, scoring and ranking.
//!
//! Purpose
//! - Recover rotor order, ring settings, start positions, reflector and
//!   (optionally) plugboard pairs from ciphertext alone or with a crib.
//!
//! Model
//! - [`Keyspace`] turns [`SearchBounds`] into an index-addressable sequence of
//!   candidate keys. [`run_search`] decodes every candidate, scores it with a
//!   [`crate::score::ScoringModel`] and keeps the best in a [`TopK`].
//!
//! Conventions
//! - Tables and cribs are borrowed through [`SearchContext`]; nothing here is global.

mod cancel;
mod engine;
mod keyspace;
mod plugboard;
mod topk;
mod types;

pub use cancel::CancelToken;
pub use engine::run_search;
pub use keyspace::Keyspace;
pub use topk::{Scored, TopK};
pub use types::{
    PlugboardSearch, ScoreRecord, SearchBounds, SearchContext, SearchOutcome, SearchStatus,
};
