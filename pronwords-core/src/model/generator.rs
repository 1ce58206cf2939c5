use super::alphabet::Alphabet;
use crate::error::{Error, Result};

/// Where the generator stands in its enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
	/// Nothing produced yet; the next word is the all-zero one.
	Fresh,
	/// At least one word produced, `levels` describes the last one.
	Running,
	/// Every position reached its maximum index.
	Exhausted,
}

/// Odometer-style enumerator of every fixed-length word over an alphabet.
///
/// Words come out in the lexicographic order induced by the alphabet order:
/// the word is read as a base-`|alphabet|` numeral whose rightmost position
/// is the least significant digit. Each of the [`total`](Self::total) words
/// is produced exactly once.
///
/// # Responsibilities
/// - Hold the position-state vector (`levels`) and advance it one step at a time
/// - Signal the end of the enumeration with `None`
/// - Restart from the first word on [`reset`](Self::reset)
///
/// # Invariants
/// - `levels.len() == length`
/// - every entry of `levels` is `< alphabet.len()`
/// - the alphabet only changes while the cursor is `Fresh`
#[derive(Clone, Debug)]
pub struct Generator {
	alphabet: Alphabet,
	length: usize,
	/// Index into `alphabet` of the symbol at each position.
	levels: Vec<usize>,
	cursor: Cursor,
}

impl Generator {
	/// Creates a generator for words of `length` symbols taken from `characters`.
	///
	/// `characters` is lower-cased and deduplicated, first occurrence wins.
	///
	/// # Errors
	/// Returns [`Error::EmptyAlphabet`] if `characters` is empty.
	pub fn new(characters: &str, length: usize) -> Result<Self> {
		Ok(Self::with_alphabet(Alphabet::new(characters)?, length))
	}

	/// Creates a generator over the default `a..=z` alphabet.
	pub fn with_length(length: usize) -> Self {
		Self::with_alphabet(Alphabet::default(), length)
	}

	pub fn with_alphabet(alphabet: Alphabet, length: usize) -> Self {
		Self {
			alphabet,
			length,
			levels: vec![0; length],
			cursor: Cursor::Fresh,
		}
	}

	/// Replaces the alphabet.
	///
	/// # Errors
	/// - [`Error::AlphabetLocked`] once a word has been produced and
	///   [`reset`](Self::reset) was not called since.
	/// - [`Error::EmptyAlphabet`] if `characters` is empty.
	pub fn set_alphabet(&mut self, characters: &str) -> Result<()> {
		if self.cursor != Cursor::Fresh {
			return Err(Error::AlphabetLocked);
		}
		self.alphabet = Alphabet::new(characters)?;
		Ok(())
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn length(&self) -> usize {
		self.length
	}

	/// Current position-state vector, one alphabet index per position.
	pub fn levels(&self) -> &[usize] {
		&self.levels
	}

	/// Number of words the generator produces: `|alphabet| ^ length`.
	///
	/// Computed with exact integer arithmetic. Returns `None` if the count
	/// does not fit in a `u128`.
	pub fn total(&self) -> Option<u128> {
		let exponent = u32::try_from(self.length).ok()?;
		(self.alphabet.len() as u128).checked_pow(exponent)
	}

	/// Restores the initial state, the next word is the first one again.
	///
	/// Alphabet and length are left untouched.
	pub fn reset(&mut self) {
		self.levels.fill(0);
		self.cursor = Cursor::Fresh;
	}

	/// Moves `levels` one step forward.
	///
	/// Scans from the last position towards the first, skipping positions
	/// already at their maximum. The first position found below its maximum
	/// is incremented and every position after it goes back to 0.
	///
	/// Returns `false`, leaving `levels` untouched, when every position is at
	/// its maximum.
	fn advance(&mut self) -> bool {
		let top = self.alphabet.len() - 1;
		let Some(col) = self.levels.iter().rposition(|&level| level < top) else {
			return false;
		};

		self.levels[col] += 1;
		self.levels[col + 1..].fill(0);
		true
	}

	/// Word described by the current `levels`.
	fn word(&self) -> String {
		self.levels.iter().map(|&level| self.alphabet.symbol(level)).collect()
	}
}

impl Iterator for Generator {
	type Item = String;

	/// Produces the next word, or `None` once every word has been produced.
	///
	/// `None` is returned on every later call until [`Generator::reset`].
	fn next(&mut self) -> Option<String> {
		match self.cursor {
			Cursor::Fresh => {
				self.cursor = Cursor::Running;
			}
			Cursor::Running => {
				if !self.advance() {
					self.cursor = Cursor::Exhausted;
					return None;
				}
			}
			Cursor::Exhausted => return None,
		}
		Some(self.word())
	}
}
