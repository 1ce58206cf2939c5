use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const UNIGRAM_WEIGHT_DEFAULT: f64 = 1.0;
pub const BIGRAM_WEIGHT_DEFAULT: f64 = 3.0;
pub const TRIGRAM_WEIGHT_DEFAULT: f64 = 5.0;

/// Relative influence of each n-gram order on a word score.
///
/// # Invariants
/// - every weight is finite and >= 0
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Weights {
	pub unigram: f64,
	pub bigram: f64,
	pub trigram: f64,
}

impl Weights {
	/// Builds a weight triple.
	///
	/// # Errors
	/// Returns [`Error::InvalidWeights`] if any weight is negative, NaN or infinite.
	pub fn new(unigram: f64, bigram: f64, trigram: f64) -> Result<Self> {
		let valid = |w: f64| w.is_finite() && w >= 0.0;
		if !(valid(unigram) && valid(bigram) && valid(trigram)) {
			return Err(Error::InvalidWeights(unigram, bigram, trigram));
		}
		Ok(Self { unigram, bigram, trigram })
	}
}

impl Default for Weights {
	/// 1 (uni), 3 (bi), 5 (tri): longer matches weigh more.
	fn default() -> Self {
		Self {
			unigram: UNIGRAM_WEIGHT_DEFAULT,
			bigram: BIGRAM_WEIGHT_DEFAULT,
			trigram: TRIGRAM_WEIGHT_DEFAULT,
		}
	}
}
