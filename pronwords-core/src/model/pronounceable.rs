use std::io::Read;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, warn};

use super::ngram_table::{char_bounds, NGramTable};
use super::weights::Weights;
use crate::error::{Error, Result};
use crate::io::{for_each_token, read_lines};

/// Number of chunks handed to each CPU when learning a corpus in parallel.
const CHUNKS_PER_CPU: usize = 8;

/// Denominators turning raw n-gram counts into bounded contributions.
///
/// Each aggregate is the highest count of its table, so the most frequent
/// n-gram of an order contributes exactly its weight. An aggregate of 0
/// means "no information" and makes the matching term contribute 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
	pub unigram: f64,
	pub bigram: f64,
	pub trigram: f64,
}

impl Normalization {
	/// Derives the aggregates from the tables as they are right now.
	pub fn of(unigram: &NGramTable, bigram: &NGramTable, trigram: &NGramTable) -> Self {
		Self {
			unigram: unigram.peak() as f64,
			bigram: bigram.peak() as f64,
			trigram: trigram.peak() as f64,
		}
	}
}

/// Weighted contribution of one n-gram, 0 when `norm` carries no information.
fn contribution(weight: f64, count: usize, norm: f64) -> f64 {
	if norm > 0.0 { weight * count as f64 / norm } else { 0.0 }
}

/// The `n` characters of `word` starting at character `i`.
fn gram<'a>(word: &'a str, bounds: &[usize], i: usize, n: usize) -> &'a str {
	&word[bounds[i]..bounds[i + n]]
}

/// Pronounceability model learnt from unigram, bigram and trigram counts.
///
/// A word scores high when its letters, letter pairs and letter triples are
/// frequent in the training text. The score is an average per-position
/// contribution, each term being `weight * count / peak count of its table`.
///
/// # Responsibilities
/// - Learn n-gram counts from words, word lists and whole corpus files
/// - Merge with another model (parallel learning)
/// - Score arbitrary words
///
/// # Invariants
/// - Table orders are 1, 2 and 3
/// - Counts only grow, nothing is ever pruned
/// - Scores are >= 0, and exactly 0 for words holding an unseen character
#[derive(Clone, Debug)]
pub struct PronounceabilityModel {
	unigram: NGramTable,
	bigram: NGramTable,
	trigram: NGramTable,
	weights: Weights,
}

impl Default for PronounceabilityModel {
	fn default() -> Self {
		Self::new()
	}
}

impl PronounceabilityModel {
	/// Returns an empty model with the default weights (1, 3, 5).
	pub fn new() -> Self {
		Self {
			unigram: NGramTable::new(1),
			bigram: NGramTable::new(2),
			trigram: NGramTable::new(3),
			weights: Weights::default(),
		}
	}

	/// Builds a model from a corpus file, learning it in parallel.
	///
	/// # Errors
	/// Returns [`Error::Corpus`] if the file cannot be opened or read.
	pub fn from_corpus_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let lines = read_lines(&path).map_err(|e| {
			warn!("cannot read corpus {}: {e}", path.as_ref().display());
			Error::Corpus(e)
		})?;
		Ok(Self::from_lines_parallel(&lines))
	}

	/// Splits `lines` into chunks, learns each chunk in a worker thread and
	/// merges the partial models.
	///
	/// # Notes
	/// - Chunk count is CPU count * `CHUNKS_PER_CPU`.
	/// - Workers own their partial model, all merging happens on the
	///   calling thread. The result is the same as learning `lines` in order.
	pub fn from_lines_parallel<S: AsRef<str> + Sync>(lines: &[S]) -> Self {
		let mut model = Self::new();
		if lines.is_empty() {
			return model;
		}

		let chunks = num_cpus::get().max(1) * CHUNKS_PER_CPU;
		let chunk_size = lines.len().div_ceil(chunks);

		thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for chunk in lines.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = Self::new();
					for line in chunk {
						partial.add_word(line.as_ref());
					}
					// The receiver lives until every sender is gone.
					let _ = tx.send(partial);
				});
			}
			drop(tx);

			for partial in rx {
				model.merge(&partial);
			}
		});

		debug!(
			"learnt {} lines: {} unigrams, {} bigrams, {} trigrams",
			lines.len(),
			model.unigram.len(),
			model.bigram.len(),
			model.trigram.len()
		);
		model
	}

	/// Replaces the weight distribution. Defaults are 1 (uni), 3 (bi), 5 (tri).
	///
	/// Scores computed before the call are not affected.
	///
	/// # Errors
	/// Returns [`Error::InvalidWeights`] for negative or non-finite weights.
	pub fn set_weights(&mut self, unigram: f64, bigram: f64, trigram: f64) -> Result<()> {
		self.weights = Weights::new(unigram, bigram, trigram)?;
		Ok(())
	}

	pub fn with_weights(mut self, weights: Weights) -> Self {
		self.weights = weights;
		self
	}

	pub fn weights(&self) -> Weights {
		self.weights
	}

	pub fn unigram(&self) -> &NGramTable {
		&self.unigram
	}

	pub fn bigram(&self) -> &NGramTable {
		&self.bigram
	}

	pub fn trigram(&self) -> &NGramTable {
		&self.trigram
	}

	/// Records the n-grams of `text`.
	///
	/// The text is lower-cased and cut at every character that is not
	/// Unicode `Alphabetic`, each remaining run is learnt on its own. Letter
	/// numbers such as `ᛮ` count as letters.
	pub fn add_word(&mut self, text: &str) {
		let text = text.to_lowercase();
		for token in text.split(|c: char| !c.is_alphabetic()).filter(|t| !t.is_empty()) {
			let bounds = char_bounds(token);
			self.unigram.add_token(token, &bounds);
			self.bigram.add_token(token, &bounds);
			self.trigram.add_token(token, &bounds);
		}
	}

	/// Reads `reader` word by word, recording the n-grams of each word.
	///
	/// # Returns
	/// The number of whitespace-delimited words read.
	///
	/// # Errors
	/// Returns [`Error::Corpus`] on a read failure. Words read before the
	/// failure stay in the model.
	pub fn add_word_list<R: Read>(&mut self, reader: R) -> Result<usize> {
		match for_each_token(reader, |word| self.add_word(word)) {
			Ok(words) => {
				debug!("learnt {words} words from word list");
				Ok(words)
			}
			Err(e) => {
				warn!("reading word list: {e}");
				Err(Error::Corpus(e))
			}
		}
	}

	/// Adds the counts of `other` to this model. Weights of `self` are kept.
	pub fn merge(&mut self, other: &Self) {
		self.unigram.absorb(&other.unigram);
		self.bigram.absorb(&other.bigram);
		self.trigram.absorb(&other.trigram);
	}

	/// Aggregates used by [`word_score`](Self::word_score) right now.
	pub fn normalization(&self) -> Normalization {
		Normalization::of(&self.unigram, &self.bigram, &self.trigram)
	}

	/// Calculates a score that attempts to express how easy it is to
	/// pronounce `word`.
	///
	/// # Behavior
	/// - Returns 0 as soon as a character never seen in training shows up,
	///   nothing can be said about such a word.
	/// - At each position adds the trigram term (when a trigram fits), the
	///   bigram term (when a bigram fits) and the unigram term.
	/// - Words longer than one character are divided by `(len - 1) * 3`.
	pub fn word_score(&self, word: &str) -> f64 {
		let word = word.to_lowercase();
		let bounds = char_bounds(&word);
		let len = bounds.len() - 1;
		if len == 0 {
			return 0.0;
		}

		let norm = self.normalization();
		let weights = self.weights;

		let mut score = 0.0;
		for i in 0..len {
			let unigrams = self.unigram.count(gram(&word, &bounds, i, 1));
			if unigrams == 0 {
				return 0.0;
			}

			if i + 3 <= len {
				score += contribution(weights.trigram, self.trigram.count(gram(&word, &bounds, i, 3)), norm.trigram);
			}
			if i + 2 <= len {
				score += contribution(weights.bigram, self.bigram.count(gram(&word, &bounds, i, 2)), norm.bigram);
			}
			score += contribution(weights.unigram, unigrams, norm.unigram);
		}

		if len == 1 {
			return score;
		}

		// Normalize by how many terms have been summed
		score / ((len - 1) as f64 * 3.0)
	}

	/// Whether `word` scores at least `threshold`.
	pub fn is_pronounceable(&self, word: &str, threshold: f64) -> bool {
		self.word_score(word) >= threshold
	}
}
