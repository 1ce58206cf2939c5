//! Pronounceable word finder.
//!
//! This crate enumerates every fixed-length word over an alphabet and ranks
//! each one with a character n-gram model learnt from a corpus:
//! - An odometer-style candidate generator
//! - A unigram/bigram/trigram pronounceability model
//! - Threshold selection by value, percentile or top N
//! - A reporting pass filtering and summarizing the candidates
//!
//! Corpus I/O helpers are kept internal.

/// Candidate generation and the n-gram pronounceability model.
pub mod model;

/// Resolution of percentile and top-N requests into a cutoff score.
pub mod selector;

/// Filtering pass and run summary.
pub mod report;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (corpus loading, token streaming).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
