//! Candidate generation and scoring.
//!
//! - Ordered, deduplicated symbol sets (`Alphabet`)
//! - Exhaustive fixed-length word enumeration (`Generator`)
//! - Per-order n-gram counts (`NGramTable`)
//! - Weighted pronounceability scoring (`PronounceabilityModel`)

/// Ordered set of distinct lower-case symbols.
pub mod alphabet;

/// Mixed-radix enumerator of every word of a given length.
///
/// Lazy, finite and restartable.
pub mod generator;

/// Occurrence counts of a single n-gram order, with merging.
pub mod ngram_table;

/// Unigram, bigram and trigram tables combined into a word score.
///
/// Supports word lists, parallel corpus learning and merging.
pub mod pronounceable;

/// Weight triple of the n-gram orders.
pub mod weights;
