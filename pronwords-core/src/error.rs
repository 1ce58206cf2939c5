use std::io;

use thiserror::Error;

/// Errors returned by the generator, the model and the threshold selector.
///
/// Misuse errors are returned at call time and never coerced into a valid
/// value. Scoring a word with unknown symbols is not an error: it scores 0.
#[derive(Debug, Error)]
pub enum Error {
	/// The alphabet has no symbol left after deduplication.
	#[error("alphabet must contain at least one symbol")]
	EmptyAlphabet,

	/// `set_alphabet` was called while an enumeration is in progress.
	#[error("alphabet cannot change once generation has started, call reset() or create a new generator")]
	AlphabetLocked,

	/// A weight is negative, NaN or infinite.
	#[error("weights must be finite and non-negative, got ({0}, {1}, {2})")]
	InvalidWeights(f64, f64, f64),

	#[error("percentile must be between 0 and 100 (exclusive), got {0}")]
	InvalidPercentile(f64),

	#[error("top must be greater than 0")]
	InvalidTop,

	#[error("threshold must be a finite number, got {0}")]
	InvalidThreshold(f64),

	/// More than one of threshold, percentile and top was requested.
	#[error("only one of threshold, percentile or top can be used at a time")]
	ConflictingThresholdModes,

	/// The corpus could not be opened or a read failed mid-stream.
	#[error("error reading corpus: {0}")]
	Corpus(#[from] io::Error),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
