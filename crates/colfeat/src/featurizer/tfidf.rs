use ndarray::Array2;
use tracing::debug;

use super::Featurizer;
use crate::{
    abstraction::{abstract_column, AbstractionPolicy},
    corpus::Corpus,
    error::{Error, Result},
    vectorizer::{to_dense, TfidfVectorizer, Tokenizer, VectorizerParams},
};

/// TF-IDF weighting featurizer over character n-grams (sizes 1 and 2).
///
/// `fit` additionally trains a second TF-IDF model over per-character shapes
/// (unigrams). That shape model is evaluated during `transform` but its
/// output is not concatenated into the returned matrix, and `n_features`
/// counts the character model only. Confirm with the model owner before
/// wiring the shape block into the output.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct TfidfFeaturizer {
    state: Option<TfidfState>,
}

#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
struct TfidfState {
    tfidf: TfidfVectorizer,
    shape_tfidf: TfidfVectorizer,
}

impl TfidfFeaturizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fitted character n-gram vocabulary.
    pub fn vocabulary(&self) -> Result<&ahash::HashMap<String, usize>> {
        Ok(self.fitted_state()?.tfidf.vocabulary())
    }

    fn fitted_state(&self) -> Result<&TfidfState> {
        self.state.as_ref().ok_or(Error::NotFitted {
            featurizer: "TfidfFeaturizer",
        })
    }
}

impl Featurizer for TfidfFeaturizer {
    fn fit(&mut self, corpus: &Corpus, column: &str) -> Result<()> {
        let values = corpus.column(column)?;
        if values.is_empty() {
            return Err(Error::EmptyColumn {
                column: column.to_owned(),
            });
        }
        debug!(column, num_rows = values.len(), "Fitting TfidfFeaturizer");

        let tfidf = TfidfVectorizer::fit(
            values,
            VectorizerParams::new(Tokenizer::Characters, 1..=2, 1),
        );

        let shapes = abstract_column(values, AbstractionPolicy::PerCharacter);
        let shape_tfidf = TfidfVectorizer::fit(
            &shapes,
            VectorizerParams::new(Tokenizer::Characters, 1..=1, 1),
        );

        self.state = Some(TfidfState { tfidf, shape_tfidf });
        Ok(())
    }

    fn transform(&self, corpus: &Corpus, column: &str) -> Result<Array2<f64>> {
        let state = self.fitted_state()?;
        let values = corpus.column(column)?;
        debug!(
            column,
            num_rows = values.len(),
            "Transforming with TfidfFeaturizer"
        );

        let weighted = state.tfidf.transform(values);

        // The shape model is evaluated here for parity with fit, but its
        // block is not part of the returned matrix.
        let shapes = abstract_column(values, AbstractionPolicy::PerCharacter);
        let _shape_weighted = state.shape_tfidf.transform(&shapes);

        Ok(to_dense(&weighted))
    }

    fn n_features(&self, _corpus: &Corpus) -> Result<usize> {
        // Character model only; the shape model is excluded, matching
        // transform's output.
        Ok(self.fitted_state()?.tfidf.num_features())
    }
}
