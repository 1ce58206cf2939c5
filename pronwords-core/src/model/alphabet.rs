use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Symbols used when no alphabet is given.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Ordered set of distinct, lower-cased symbols.
///
/// The order is the first-seen order of the input and defines the
/// enumeration order of a [`Generator`](super::generator::Generator):
/// index 0 is the "smallest" digit.
///
/// # Invariants
/// - at least one symbol
/// - no two symbols are equal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
	symbols: Vec<char>,
}

impl Alphabet {
	/// Builds an alphabet from a string of symbols.
	///
	/// Upper and lower case variants of a letter count as the same symbol.
	///
	/// # Errors
	/// Returns [`Error::EmptyAlphabet`] if `characters` is empty.
	pub fn new(characters: &str) -> Result<Self> {
		let mut seen = HashSet::new();
		let symbols: Vec<char> = characters
			.to_lowercase()
			.chars()
			.filter(|c| seen.insert(*c))
			.collect();

		if symbols.is_empty() {
			return Err(Error::EmptyAlphabet);
		}
		Ok(Self { symbols })
	}

	/// Number of distinct symbols, always >= 1.
	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	/// Always `false`; kept for API symmetry with `len`.
	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	/// Symbol at `index`, in enumeration order.
	///
	/// # Panics
	/// Panics if `index >= len()`.
	pub fn symbol(&self, index: usize) -> char {
		self.symbols[index]
	}

	pub fn symbols(&self) -> &[char] {
		&self.symbols
	}
}

impl Default for Alphabet {
	fn default() -> Self {
		Self { symbols: DEFAULT_ALPHABET.chars().collect() }
	}
}

impl fmt::Display for Alphabet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
	}
}
