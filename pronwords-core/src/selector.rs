//! Turns "the top N" or "the Pth percentile" into a single cutoff score.
//!
//! Resolving a percentile or a top-N request costs one full enumeration of
//! the generator. The generator is reset afterwards, ready for the
//! reporting pass.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::debug;

use crate::error::{Error, Result};
use crate::model::generator::Generator;
use crate::model::pronounceable::PronounceabilityModel;

/// How the reporting threshold is chosen. Exactly one mode per run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThresholdMode {
	/// Use the value as is.
	Explicit(f64),
	/// Score below which `p` percent of the candidates fall, `0 <= p < 100`.
	Percentile(f64),
	/// Lowest score among the `n` best candidates, `n > 0`.
	Top(usize),
}

impl ThresholdMode {
	/// Builds the mode out of optional user options.
	///
	/// # Returns
	/// - `Ok(None)` when no option is given: every candidate is reported.
	/// - `Ok(Some(mode))` when exactly one valid option is given.
	///
	/// # Errors
	/// - [`Error::ConflictingThresholdModes`] when more than one option is given.
	/// - Any error of [`validate`](Self::validate).
	pub fn from_options(threshold: Option<f64>, percentile: Option<f64>, top: Option<usize>) -> Result<Option<Self>> {
		let given = [threshold.is_some(), percentile.is_some(), top.is_some()];
		if given.iter().filter(|&&g| g).count() > 1 {
			return Err(Error::ConflictingThresholdModes);
		}

		let mode = match (threshold, percentile, top) {
			(Some(value), _, _) => Self::Explicit(value),
			(_, Some(p), _) => Self::Percentile(p),
			(_, _, Some(n)) => Self::Top(n),
			_ => return Ok(None),
		};
		mode.validate()?;
		Ok(Some(mode))
	}

	/// Checks the mode parameters, without enumerating anything.
	pub fn validate(&self) -> Result<()> {
		match *self {
			Self::Explicit(value) if !value.is_finite() => Err(Error::InvalidThreshold(value)),
			Self::Percentile(p) if !(0.0..100.0).contains(&p) => Err(Error::InvalidPercentile(p)),
			Self::Top(0) => Err(Error::InvalidTop),
			_ => Ok(()),
		}
	}
}

/// Resolves `mode` into a cutoff score.
///
/// # Returns
/// - `Ok(Some(cutoff))`: report every candidate scoring `>= cutoff`.
/// - `Ok(None)`: no threshold can be formed (top N larger than the
///   number of candidates).
///
/// # Behavior
/// - `Explicit` does not touch the generator.
/// - `Percentile` and `Top` enumerate the generator from its first word,
///   then reset it.
///
/// # Errors
/// Invalid parameters are rejected before any enumeration.
pub fn resolve_threshold(
	mode: ThresholdMode,
	generator: &mut Generator,
	model: &PronounceabilityModel,
) -> Result<Option<f64>> {
	mode.validate()?;

	let cutoff = match mode {
		ThresholdMode::Explicit(value) => return Ok(Some(value)),
		ThresholdMode::Percentile(p) => {
			debug!("determining threshold for {p}th percentile");
			generator.reset();
			let scores = generator.by_ref().map(|word| model.word_score(&word)).collect();
			percentile_cutoff(scores, p)
		}
		ThresholdMode::Top(n) => {
			debug!("determining threshold for top {n}");
			generator.reset();
			if generator.total().is_some_and(|total| n as u128 > total) {
				debug!("top {n} exceeds the {:?} candidates", generator.total());
				return Ok(None);
			}
			top_cutoff(generator.by_ref().map(|word| model.word_score(&word)), n)
		}
	};
	generator.reset();

	debug!("threshold resolved to {cutoff:?}");
	Ok(cutoff)
}

/// Score at index `floor(p / 100 * len)` of the ascending scores.
///
/// The index is clamped to the last score. Returns `None` for no scores.
fn percentile_cutoff(mut scores: Vec<f64>, p: f64) -> Option<f64> {
	if scores.is_empty() {
		return None;
	}
	scores.sort_by(f64::total_cmp);

	let index = (p / 100.0 * scores.len() as f64).floor() as usize;
	Some(scores[index.min(scores.len() - 1)])
}

/// Smallest of the `n` highest scores.
///
/// Keeps a min-heap of the best `n` scores seen so far: O(n) memory,
/// O(len * log n) time. Returns `None` when fewer than `n` scores come in.
fn top_cutoff<I: IntoIterator<Item = f64>>(scores: I, n: usize) -> Option<f64> {
	if n == 0 {
		return None;
	}

	let mut best: BinaryHeap<Reverse<Score>> = BinaryHeap::with_capacity(n);
	for score in scores {
		if best.len() < n {
			best.push(Reverse(Score(score)));
		} else if let Some(mut lowest) = best.peek_mut() {
			if score > lowest.0.0 {
				*lowest = Reverse(Score(score));
			}
		}
	}

	if best.len() < n {
		return None;
	}
	best.peek().map(|lowest| lowest.0.0)
}

/// Totally ordered score, for heap storage.
#[derive(Clone, Copy, Debug)]
struct Score(f64);

impl PartialEq for Score {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Score {}

impl PartialOrd for Score {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Score {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	fn trained(corpus: &str) -> PronounceabilityModel {
		let mut model = PronounceabilityModel::new();
		model.add_word(corpus);
		model
	}

	fn all_scores(generator: &mut Generator, model: &PronounceabilityModel) -> Vec<f64> {
		let scores = generator.by_ref().map(|w| model.word_score(&w)).collect();
		generator.reset();
		scores
	}

	#[test]
	fn no_option_means_no_mode() {
		assert_eq!(ThresholdMode::from_options(None, None, None).unwrap(), None);
	}

	#[test]
	fn single_options_map_to_their_mode() {
		assert_eq!(ThresholdMode::from_options(Some(0.4), None, None).unwrap(), Some(ThresholdMode::Explicit(0.4)));
		assert_eq!(ThresholdMode::from_options(None, Some(90.0), None).unwrap(), Some(ThresholdMode::Percentile(90.0)));
		assert_eq!(ThresholdMode::from_options(None, None, Some(3)).unwrap(), Some(ThresholdMode::Top(3)));
	}

	#[test]
	fn conflicting_options_are_rejected() {
		for (t, p, n) in [
			(Some(1.0), Some(50.0), None),
			(Some(1.0), None, Some(3)),
			(None, Some(50.0), Some(3)),
			(Some(1.0), Some(50.0), Some(3)),
		] {
			assert!(matches!(ThresholdMode::from_options(t, p, n), Err(Error::ConflictingThresholdModes)));
		}
	}

	#[test]
	fn invalid_parameters_are_rejected() {
		assert!(matches!(ThresholdMode::from_options(None, Some(100.0), None), Err(Error::InvalidPercentile(_))));
		assert!(matches!(ThresholdMode::from_options(None, Some(-1.0), None), Err(Error::InvalidPercentile(_))));
		assert!(matches!(ThresholdMode::from_options(None, None, Some(0)), Err(Error::InvalidTop)));
		assert!(matches!(ThresholdMode::from_options(Some(f64::NAN), None, None), Err(Error::InvalidThreshold(_))));
	}

	#[test]
	fn invalid_percentile_is_rejected_before_enumeration() {
		let model = trained("banana");
		let mut generator = Generator::new("abn", 3).unwrap();
		generator.next();
		generator.next();

		let result = resolve_threshold(ThresholdMode::Percentile(150.0), &mut generator, &model);
		assert!(matches!(result, Err(Error::InvalidPercentile(_))));
		// Untouched: the third word comes next.
		assert_eq!(generator.next().as_deref(), Some("aan"));
	}

	#[test]
	fn explicit_threshold_is_used_verbatim() {
		let model = trained("banana");
		let mut generator = Generator::new("abn", 2).unwrap();
		generator.next();
		let cutoff = resolve_threshold(ThresholdMode::Explicit(0.42), &mut generator, &model).unwrap();
		assert_eq!(cutoff, Some(0.42));
		assert_eq!(generator.next().as_deref(), Some("ab"));
	}

	#[test]
	fn top_larger_than_candidate_count_has_no_threshold() {
		let model = trained("banana");
		let mut generator = Generator::new("ab", 2).unwrap();
		let cutoff = resolve_threshold(ThresholdMode::Top(5), &mut generator, &model).unwrap();
		assert_eq!(cutoff, None);
	}

	#[test]
	fn top_larger_than_candidate_count_still_resets() {
		let model = trained("banana");
		let mut generator = Generator::new("ab", 2).unwrap();
		generator.next();
		generator.next();

		let cutoff = resolve_threshold(ThresholdMode::Top(5), &mut generator, &model).unwrap();
		assert_eq!(cutoff, None);
		let words: Vec<String> = generator.collect();
		assert_eq!(words, ["aa", "ab", "ba", "bb"]);
	}

	#[test]
	fn top_equal_to_candidate_count_is_the_minimum() {
		let model = trained("banana");
		let mut generator = Generator::new("abn", 2).unwrap();
		let scores = all_scores(&mut generator, &model);
		let minimum = scores.iter().copied().fold(f64::INFINITY, f64::min);

		let cutoff = resolve_threshold(ThresholdMode::Top(9), &mut generator, &model).unwrap();
		assert_eq!(cutoff, Some(minimum));
	}

	#[test]
	fn top_n_reports_at_least_n_words_and_resets() {
		let model = trained("banana bandana cabana");
		let mut generator = Generator::new("abcdn", 3).unwrap();

		let cutoff = resolve_threshold(ThresholdMode::Top(4), &mut generator, &model).unwrap().unwrap();

		assert_eq!(generator.next().as_deref(), Some("aaa"));
		generator.reset();
		let above = all_scores(&mut generator, &model).into_iter().filter(|&s| s >= cutoff).count();
		assert!(above >= 4);
		let strictly_above = all_scores(&mut generator, &model).into_iter().filter(|&s| s > cutoff).count();
		assert!(strictly_above < 4);
	}

	#[test]
	fn percentile_uses_floor_index_on_ascending_scores() {
		let model = trained("banana bandana cabana");
		let mut generator = Generator::new("abcdn", 2).unwrap();
		let mut scores = all_scores(&mut generator, &model);
		scores.sort_by(f64::total_cmp);

		let cutoff = resolve_threshold(ThresholdMode::Percentile(50.0), &mut generator, &model).unwrap();
		// 25 candidates, floor(0.5 * 25) = 12
		assert_eq!(cutoff, Some(scores[12]));
		assert_eq!(generator.next().as_deref(), Some("aa"));
	}

	#[test]
	fn percentile_zero_is_the_minimum() {
		assert_eq!(percentile_cutoff(vec![3.0, 1.0, 2.0], 0.0), Some(1.0));
	}

	#[test]
	fn percentile_index_is_clamped() {
		assert_eq!(percentile_cutoff(vec![3.0, 1.0, 2.0], 99.9), Some(3.0));
		assert_eq!(percentile_cutoff(vec![5.0], 99.0), Some(5.0));
		assert_eq!(percentile_cutoff(Vec::new(), 10.0), None);
	}

	#[test]
	fn top_cutoff_handles_ties_and_short_input() {
		assert_eq!(top_cutoff([1.0, 2.0, 2.0, 0.5], 2), Some(2.0));
		assert_eq!(top_cutoff([1.0, 2.0, 2.0, 0.5], 3), Some(1.0));
		assert_eq!(top_cutoff([1.0], 2), None);
		assert_eq!(top_cutoff([1.0], 0), None);
	}

	#[test]
	fn top_cutoff_matches_a_full_sort() {
		let mut rng = rand::rng();
		for _ in 0..50 {
			let len = rng.random_range(1..500);
			let scores: Vec<f64> = (0..len).map(|_| rng.random_range(0.0..10.0)).collect();
			let n = rng.random_range(1..=len);

			let mut sorted = scores.clone();
			sorted.sort_by(|a, b| b.total_cmp(a));
			assert_eq!(top_cutoff(scores, n), Some(sorted[n - 1]));
		}
	}
}
