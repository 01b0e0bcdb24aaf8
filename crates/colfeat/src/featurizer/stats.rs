use ndarray::{concatenate, Array2, Axis};
use tracing::debug;

use super::Featurizer;
use crate::{
    abstraction::{abstract_column, AbstractionPolicy},
    corpus::Corpus,
    error::{Error, Result},
    vectorizer::{to_dense, CountVectorizer, Tokenizer, VectorizerParams},
};

/// Binary presence featurizer over characters and regex-abstracted shapes.
///
/// `fit` learns three independent vocabularies from the column:
///
/// 1. every distinct character,
/// 2. every distinct per-character shape (each whole shape string is one
///    vocabulary entry),
/// 3. every distinct whole-token shape.
///
/// `transform` emits one 0/1 indicator block per vocabulary and concatenates
/// them column-wise in that order.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct StatsFeaturizer {
    state: Option<StatsState>,
}

#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
struct StatsState {
    char_counter: CountVectorizer,
    shape_counter: CountVectorizer,
    token_shape_counter: CountVectorizer,
}

impl StatsFeaturizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Vocabulary sizes of the character, per-character-shape and
    /// whole-token-shape blocks, in output order.
    pub fn block_sizes(&self) -> Result<[usize; 3]> {
        let state = self.fitted_state()?;
        Ok([
            state.char_counter.num_features(),
            state.shape_counter.num_features(),
            state.token_shape_counter.num_features(),
        ])
    }

    fn fitted_state(&self) -> Result<&StatsState> {
        self.state.as_ref().ok_or(Error::NotFitted {
            featurizer: "StatsFeaturizer",
        })
    }
}

impl Featurizer for StatsFeaturizer {
    fn fit(&mut self, corpus: &Corpus, column: &str) -> Result<()> {
        let values = corpus.column(column)?;
        if values.is_empty() {
            return Err(Error::EmptyColumn {
                column: column.to_owned(),
            });
        }
        debug!(column, num_rows = values.len(), "Fitting StatsFeaturizer");

        let char_counter = CountVectorizer::fit(
            values,
            VectorizerParams::new(Tokenizer::Characters, 1..=1, 1).binary(),
        );

        let shapes = abstract_column(values, AbstractionPolicy::PerCharacter);
        let shape_counter = CountVectorizer::fit(
            &shapes,
            VectorizerParams::new(Tokenizer::Whole, 1..=1, 1).binary(),
        );

        let token_shapes = abstract_column(values, AbstractionPolicy::WholeToken);
        let token_shape_counter = CountVectorizer::fit(
            &token_shapes,
            VectorizerParams::new(Tokenizer::Whole, 1..=1, 1).binary(),
        );

        self.state = Some(StatsState {
            char_counter,
            shape_counter,
            token_shape_counter,
        });
        Ok(())
    }

    fn transform(&self, corpus: &Corpus, column: &str) -> Result<Array2<f64>> {
        let state = self.fitted_state()?;
        let values = corpus.column(column)?;
        debug!(
            column,
            num_rows = values.len(),
            "Transforming with StatsFeaturizer"
        );

        let char_features = to_dense(&state.char_counter.transform(values));

        let shapes = abstract_column(values, AbstractionPolicy::PerCharacter);
        let shape_features = to_dense(&state.shape_counter.transform(&shapes));

        let token_shapes = abstract_column(values, AbstractionPolicy::WholeToken);
        let token_shape_features = to_dense(&state.token_shape_counter.transform(&token_shapes));

        let features = concatenate(
            Axis(1),
            &[
                char_features.view(),
                shape_features.view(),
                token_shape_features.view(),
            ],
        )
        .expect("feature blocks share a row count");
        Ok(features)
    }

    fn n_features(&self, _corpus: &Corpus) -> Result<usize> {
        Ok(self.block_sizes()?.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(values: &[&str]) -> Corpus {
        Corpus::from_columns([("value", values.iter().map(|&v| v.to_owned()).collect())])
            .unwrap()
    }

    #[test]
    fn transform_before_fit_fails_fast() {
        let featurizer = StatsFeaturizer::new();
        assert!(matches!(
            featurizer.transform(&corpus(&["x"]), "value"),
            Err(Error::NotFitted { featurizer: "StatsFeaturizer" })
        ));
    }

    #[test]
    fn fit_on_missing_column_fails() {
        let mut featurizer = StatsFeaturizer::new();
        assert!(matches!(
            featurizer.fit(&corpus(&["x"]), "other"),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn fit_on_zero_rows_fails() {
        let mut featurizer = StatsFeaturizer::new();
        assert!(matches!(
            featurizer.fit(&corpus(&[]), "value"),
            Err(Error::EmptyColumn { .. })
        ));
    }

    #[test]
    fn output_shape_matches_rows_and_n_features() {
        let fit_corpus = corpus(&["ab", "a1", "zz9"]);
        let mut featurizer = StatsFeaturizer::new();
        featurizer.fit(&fit_corpus, "value").unwrap();

        let features = featurizer.transform(&fit_corpus, "value").unwrap();
        assert_eq!(features.nrows(), 3);
        assert_eq!(features.ncols(), featurizer.n_features(&fit_corpus).unwrap());
    }

    #[test]
    fn indicator_blocks_follow_fixed_order() {
        // Fit on ["ab", "a1"]:
        //   chars (sorted):              {"1": 0, "a": 1, "b": 2}
        //   per-char shapes ("aa","a0"): {"a0": 0, "aa": 1}
        //   whole-token shapes ("a","a0"): {"a": 0, "a0": 1}
        let fit_corpus = corpus(&["ab", "a1"]);
        let mut featurizer = StatsFeaturizer::new();
        featurizer.fit(&fit_corpus, "value").unwrap();
        assert_eq!(featurizer.block_sizes().unwrap(), [3, 2, 2]);

        let features = featurizer.transform(&corpus(&["a1"]), "value").unwrap();
        let row: Vec<f64> = features.row(0).to_vec();
        // "a1" contains '1' and 'a' but not 'b'; its shapes are "a0"/"a0"
        assert_eq!(row, vec![1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unseen_values_give_all_zero_rows() {
        let mut featurizer = StatsFeaturizer::new();
        featurizer.fit(&corpus(&["abc"]), "value").unwrap();

        let features = featurizer.transform(&corpus(&["XY."]), "value").unwrap();
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn transform_is_idempotent() {
        let fit_corpus = corpus(&["ab", "a1", ""]);
        let mut featurizer = StatsFeaturizer::new();
        featurizer.fit(&fit_corpus, "value").unwrap();

        let first = featurizer.transform(&fit_corpus, "value").unwrap();
        let second = featurizer.transform(&fit_corpus, "value").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_string_rows_zero_the_char_block() {
        let mut featurizer = StatsFeaturizer::new();
        featurizer.fit(&corpus(&["ab", ""]), "value").unwrap();
        let [n_chars, ..] = featurizer.block_sizes().unwrap();

        let features = featurizer.transform(&corpus(&[""]), "value").unwrap();
        for col in 0..n_chars {
            assert_eq!(features[[0, col]], 0.0);
        }
    }

    #[test]
    fn all_empty_column_yields_zero_width_char_block() {
        // The empty string still has a (empty) shape, so the shape blocks
        // keep one entry each while the character block is zero-width.
        let mut featurizer = StatsFeaturizer::new();
        featurizer.fit(&corpus(&["", ""]), "value").unwrap();
        assert_eq!(featurizer.block_sizes().unwrap(), [0, 1, 1]);

        let features = featurizer.transform(&corpus(&["", "x"]), "value").unwrap();
        assert_eq!(features.shape(), &[2, 2]);
    }

    #[test]
    fn feature_dim_is_a_constant_tag() {
        assert_eq!(StatsFeaturizer::new().feature_dim(), 1);
    }
}
