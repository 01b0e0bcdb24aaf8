//! Column featurizers: the public fit/transform contract over a [`Corpus`].

mod stats;
mod tfidf;

use ndarray::Array2;

pub use stats::StatsFeaturizer;
pub use tfidf::TfidfFeaturizer;

use crate::{corpus::Corpus, error::Result};

/// A stateful extractor of numeric features from one string column.
///
/// Lifecycle: construct, [`fit`](Featurizer::fit) once on a training corpus
/// (the learned vocabulary is frozen from then on), then
/// [`transform`](Featurizer::transform) arbitrarily many corpora that share
/// the column semantics. `transform` or `n_features` before `fit` is
/// [`Error::NotFitted`](crate::Error::NotFitted).
pub trait Featurizer {
    /// Learn vocabularies and weighting statistics from `column` of `corpus`.
    fn fit(&mut self, corpus: &Corpus, column: &str) -> Result<()>;

    /// Produce the dense feature matrix for `column` of `corpus`.
    ///
    /// Rows align 1:1 with corpus rows; columns follow the fitted vocabulary
    /// ordering. Values outside the fitted vocabulary contribute zero.
    fn transform(&self, corpus: &Corpus, column: &str) -> Result<Array2<f64>>;

    /// Total number of output columns `transform` will produce.
    ///
    /// The corpus argument is part of the shared contract between
    /// featurizers; the implementations here derive the count from fitted
    /// state alone.
    fn n_features(&self, corpus: &Corpus) -> Result<usize>;

    /// Number of feature block types this featurizer contributes.
    ///
    /// A metadata tag for downstream model plumbing, not a column count;
    /// use [`n_features`](Featurizer::n_features) for dimensioning.
    fn feature_dim(&self) -> usize {
        1
    }
}
