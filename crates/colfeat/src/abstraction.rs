//! Regex-shape abstraction of raw strings.
//!
//! Maps each string to a "shape" in which character classes are replaced by
//! a representative symbol: uppercase letters by `A`, lowercase letters by
//! `a`, ASCII digits by `0`. All other characters pass through verbatim.

use std::borrow::Cow;

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;

/// Minimum number of values to consider parallelization
const MIN_VALUES_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

/// How a raw string is reduced to its shape.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbstractionPolicy {
    /// Each character is replaced by its class symbol independently:
    /// `"Ab12"` becomes `"Aa00"`. String length is preserved.
    PerCharacter,
    /// Maximal runs of one class collapse to a single symbol:
    /// `"Ab12"` becomes `"Aa0"`. Characters outside the three classes are
    /// never collapsed.
    WholeToken,
}

fn class_symbol(c: char) -> Option<char> {
    if c.is_ascii_uppercase() {
        Some('A')
    } else if c.is_ascii_lowercase() {
        Some('a')
    } else if c.is_ascii_digit() {
        Some('0')
    } else {
        None
    }
}

/// Abstract a single value to its shape under the given policy.
#[must_use]
pub fn regex_abstract(value: &str, policy: AbstractionPolicy) -> String {
    match policy {
        AbstractionPolicy::PerCharacter => value
            .chars()
            .map(|c| class_symbol(c).unwrap_or(c))
            .collect(),
        AbstractionPolicy::WholeToken => {
            let mut shape = String::with_capacity(value.len());
            let mut run: Option<char> = None;
            for c in value.chars() {
                match class_symbol(c) {
                    Some(symbol) => {
                        if run != Some(symbol) {
                            shape.push(symbol);
                            run = Some(symbol);
                        }
                    }
                    None => {
                        shape.push(c);
                        run = None;
                    }
                }
            }
            shape
        }
    }
}

fn progress_bar_setup(len: usize, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("valid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}

fn abstract_column_par<T: AsRef<str> + Sync>(
    values: &[T],
    policy: AbstractionPolicy,
) -> Vec<String> {
    debug!(num_values = values.len(), "Using parallel shape abstraction");
    let pb = progress_bar_setup(values.len(), "Abstracting shapes in parallel");
    let result = values
        .par_iter()
        .progress_with(pb.clone())
        .map(|value| regex_abstract(value.as_ref(), policy))
        .collect();
    pb.finish_with_message("Parallel shape abstraction complete");
    result
}

fn abstract_column_seq<T: AsRef<str>>(values: &[T], policy: AbstractionPolicy) -> Vec<String> {
    debug!(num_values = values.len(), "Using sequential shape abstraction");
    let pb = progress_bar_setup(values.len(), "Abstracting shapes");
    let result = values
        .iter()
        .progress_with(pb.clone())
        .map(|value| regex_abstract(value.as_ref(), policy))
        .collect();
    pb.finish_with_message("Shape abstraction complete");
    result
}

/// Determine if parallel processing should be used based on workload
/// characteristics: many values, or a large total character count.
#[inline]
fn should_use_parallel<T: AsRef<str>>(values: &[T]) -> bool {
    let num_values = values.len();

    if num_values >= MIN_VALUES_FOR_PARALLEL {
        return true;
    }

    // For fewer values, estimate total workload from a sample
    let total_chars: usize = if num_values > 20 {
        let sample_chars: usize = values.iter().take(20).map(|s| s.as_ref().len()).sum();
        (sample_chars * num_values) / 20
    } else {
        values.iter().map(|s| s.as_ref().len()).sum()
    };

    total_chars >= MIN_CHARS_FOR_PARALLEL
}

/// Abstract every value of a column under one policy.
pub fn abstract_column<T: AsRef<str> + Sync>(
    values: &[T],
    policy: AbstractionPolicy,
) -> Vec<String> {
    if should_use_parallel(values) {
        abstract_column_par(values, policy)
    } else {
        abstract_column_seq(values, policy)
    }
}
