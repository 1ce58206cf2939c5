use std::collections::HashMap;

/// Occurrence counts of every n-gram of a fixed order.
///
/// An n-gram is a run of `n` consecutive characters of a token. Keys are
/// stored lower-cased, the caller is expected to lower-case its tokens.
///
/// # Responsibilities
/// - Accumulate occurrences while learning
/// - Answer count lookups while scoring
/// - Track the highest count, used as the normalization aggregate
/// - Absorb another table of the same order (parallel learning)
///
/// # Invariants
/// - `n >= 1`
/// - Every stored count is >= 1, counts never decrease
/// - `peak` equals the largest stored count, or 0 when empty
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NGramTable {
	/// The order of the table (number of characters in each n-gram).
	n: usize,

	/// Mapping from an n-gram to the number of times it was seen.
	counts: HashMap<String, usize>,

	/// Highest value in `counts`.
	peak: usize,
}

impl NGramTable {
	/// Creates an empty table of order `n`.
	///
	/// # Panics
	/// Panics if `n == 0`.
	pub fn new(n: usize) -> Self {
		assert!(n >= 1, "n-gram order must be >= 1");
		Self { n, counts: HashMap::new(), peak: 0 }
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Records every n-gram of `token`.
	///
	/// `bounds` holds the byte offset of each character of `token` followed
	/// by `token.len()`, so that n-grams are sliced on character boundaries.
	/// Tokens shorter than `n` characters contribute nothing.
	pub(crate) fn add_token(&mut self, token: &str, bounds: &[usize]) {
		let chars = bounds.len().saturating_sub(1);
		if chars < self.n {
			return;
		}

		for i in 0..=chars - self.n {
			self.add(&token[bounds[i]..bounds[i + self.n]], 1);
		}
	}

	/// Adds `occurrences` to the count of `gram`.
	fn add(&mut self, gram: &str, occurrences: usize) {
		let total = match self.counts.get_mut(gram) {
			Some(count) => {
				*count += occurrences;
				*count
			}
			None => {
				self.counts.insert(gram.to_owned(), occurrences);
				occurrences
			}
		};
		self.peak = self.peak.max(total);
	}

	/// Number of times `gram` was seen, 0 if never.
	pub fn count(&self, gram: &str) -> usize {
		self.counts.get(gram).copied().unwrap_or(0)
	}

	/// Highest count in the table, 0 when the table is empty.
	pub fn peak(&self) -> usize {
		self.peak
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(n-gram, count)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(gram, count)| (gram.as_str(), *count))
	}

	/// Sums the counts of `other` into this table, orders must match.
	///
	/// Used to merge partial models built by parallel learning.
	pub(crate) fn absorb(&mut self, other: &Self) {
		debug_assert_eq!(self.n, other.n);
		for (gram, occurrences) in &other.counts {
			self.add(gram, *occurrences);
		}
	}
}

/// Byte offset of each character of `token`, followed by `token.len()`.
pub(crate) fn char_bounds(token: &str) -> Vec<usize> {
	token
		.char_indices()
		.map(|(offset, _)| offset)
		.chain(std::iter::once(token.len()))
		.collect()
}
