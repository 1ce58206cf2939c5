//! Reporting pass: filters the candidates against a threshold and keeps
//! track of what was reported.

use std::fmt;

use serde::Serialize;

use crate::model::generator::Generator;
use crate::model::pronounceable::PronounceabilityModel;

/// A candidate that reached the threshold.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Match {
	pub word: String,
	pub score: f64,
}

impl fmt::Display for Match {
	/// `<word> <score>`
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.word, self.score)
	}
}

/// Enumerates the remaining words of `generator`, scores them and yields
/// those scoring at least `threshold` (every word when `threshold` is `None`).
pub fn matches<'a>(
	generator: &'a mut Generator,
	model: &'a PronounceabilityModel,
	threshold: Option<f64>,
) -> impl Iterator<Item = Match> + 'a {
	generator.by_ref().filter_map(move |word| {
		let score = model.word_score(&word);
		threshold.is_none_or(|t| score >= t).then(|| Match { word, score })
	})
}

/// Run statistics over the reported matches.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct Summary {
	/// Number of reported words.
	pub matched: u64,
	/// Number of candidates, `None` when it does not fit in a `u128`.
	pub total: Option<u128>,
	pub min: Option<f64>,
	pub max: Option<f64>,
}

impl Summary {
	pub fn new(total: Option<u128>) -> Self {
		Self { total, ..Self::default() }
	}

	/// Accounts for one reported match.
	pub fn record(&mut self, score: f64) {
		self.matched += 1;
		self.min = Some(self.min.map_or(score, |min| min.min(score)));
		self.max = Some(self.max.map_or(score, |max| max.max(score)));
	}

	/// Share of the candidates that were reported, rounded down.
	pub fn percent(&self) -> Option<u128> {
		match self.total {
			Some(total) if total > 0 => Some(u128::from(self.matched) * 100 / total),
			_ => None,
		}
	}
}

impl fmt::Display for Summary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let total = self.total.map_or_else(|| "?".to_owned(), |t| t.to_string());
		let percent = self.percent().map_or_else(|| "?".to_owned(), |p| p.to_string());
		writeln!(f, "        // Matched {}/{} words ({}%)", self.matched, total, percent)?;

		let min = self.min.unwrap_or(0.0);
		let max = self.max.unwrap_or(0.0);
		write!(f, "        // Scores min = {min} max = {max}")
	}
}
