use ahash::HashMap;
use sprs::CsMat;
use tracing::debug;

use super::{ngrams, params::VectorizerParams, tokenizer};

/// Vocabulary-based token counter.
///
/// `fit` is the only constructor, so a `CountVectorizer` is always in the
/// fitted state; the vocabulary is frozen once built. Feature indices are
/// assigned by lexicographic order of the token strings, which keeps column
/// positions stable across runs.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// Vocabulary mapping n-gram to feature index
    vocab: HashMap<String, usize>,
}

impl CountVectorizer {
    pub fn fit<T: AsRef<str> + Sync>(texts: &[T], params: VectorizerParams) -> Self {
        debug!(num_texts = texts.len(), "Fitting CountVectorizer");
        let tokenized_texts = tokenizer::tokenize_all(texts, params.tokenizer());
        Self::fit_from_tokenized(&tokenized_texts, params, None)
    }

    /// Internal method to fit from pre-tokenized texts.
    /// Used by `fit_transform` to avoid double tokenization.
    fn fit_from_tokenized(
        tokenized_texts: &[Vec<String>],
        params: VectorizerParams,
        precomputed_ngrams: Option<&[HashMap<String, usize>]>,
    ) -> Self {
        debug!("Building vocabulary from tokenized texts");

        let vocab_df = precomputed_ngrams.map_or_else(
            || ngrams::build_vocabulary(tokenized_texts, params.ngram_sizes()),
            |ngram_maps| {
                // Fast path: reuse pre-computed n-grams
                debug!("Using pre-computed n-grams for vocabulary building");
                let vocab_df = dashmap::DashMap::with_hasher(ahash::RandomState::default());

                for ngram_map in ngram_maps {
                    for ngram in ngram_map.keys() {
                        vocab_df
                            .entry(ngram.clone())
                            .and_modify(|df| *df += 1)
                            .or_insert(1usize);
                    }
                }
                vocab_df
            },
        );

        let vocab_size = vocab_df.len();

        debug!(min_df = params.min_df(), "Applying min_df filtering");
        let filtered_vocab = vocab_df
            .into_iter()
            .filter(|(_, df)| *df >= params.min_df())
            .map(|(token, _)| token)
            .collect::<Vec<_>>();
        debug!(
            original_size = vocab_size,
            filtered_size = filtered_vocab.len(),
            "Vocabulary filtered by min_df"
        );

        let mut sorted_tokens = filtered_vocab;
        sorted_tokens.sort();
        let vocab = sorted_tokens
            .into_iter()
            .enumerate()
            .map(|(idx, token)| (token, idx))
            .collect::<HashMap<String, usize>>();

        debug!(vocab_size = vocab.len(), "CountVectorizer fitting complete");

        Self { params, vocab }
    }

    /// Count (or, in binary mode, flag) fitted-vocabulary n-grams per text.
    ///
    /// Tokens outside the fitted vocabulary are silently dropped. A zero
    /// vocabulary produces a zero-width matrix rather than an error.
    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using CountVectorizer"
        );
        let tokenized_texts = tokenizer::tokenize_all(texts, self.params.tokenizer());
        self.transform_from_tokenized(&tokenized_texts, texts.len(), None)
    }

    /// Internal method to transform from pre-tokenized texts.
    /// Used by `fit_transform` to avoid double tokenization and n-gram
    /// computation.
    fn transform_from_tokenized(
        &self,
        tokenized_texts: &[Vec<String>],
        num_texts: usize,
        precomputed_ngrams: Option<&[HashMap<String, usize>]>,
    ) -> CsMat<f64> {
        // Build CSR format directly
        let mut indptr = Vec::with_capacity(num_texts + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);

        let mut push_row = |ngram_map: &HashMap<String, usize>| {
            let mut row_entries = ngram_map
                .iter()
                .filter_map(|(ngram, &count)| {
                    self.vocab.get(ngram).map(|&col_idx| {
                        let value = if self.params.is_binary() {
                            1.0
                        } else {
                            count as f64
                        };
                        (col_idx, value)
                    })
                })
                .collect::<Vec<_>>();

            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            for (col_idx, value) in row_entries {
                indices.push(col_idx);
                data.push(value);
            }
            indptr.push(indices.len());
        };

        if let Some(ngram_maps) = precomputed_ngrams {
            // Fast path: use pre-computed n-grams
            for ngram_map in ngram_maps {
                push_row(ngram_map);
            }
        } else {
            for tokens in tokenized_texts {
                let ngram_map = ngrams::count_ngrams(tokens, self.params.ngram_sizes());
                push_row(&ngram_map);
            }
        }

        debug!(
            non_zero_entries = data.len(),
            "Text transformation complete"
        );
        CsMat::new((num_texts, self.num_features()), indptr, indices, data)
    }

    /// `fit` and `transform` in one pass, tokenizing and computing n-grams
    /// only once.
    pub fn fit_transform<T: AsRef<str> + Sync>(
        texts: &[T],
        params: VectorizerParams,
    ) -> (Self, CsMat<f64>) {
        debug!(
            num_texts = texts.len(),
            "fit_transform: tokenizing and computing n-grams once"
        );

        let tokenized_texts = tokenizer::tokenize_all(texts, params.tokenizer());

        let ngram_maps: Vec<_> = tokenized_texts
            .iter()
            .map(|tokens| ngrams::count_ngrams(tokens, params.ngram_sizes()))
            .collect();

        let vectorizer = Self::fit_from_tokenized(&tokenized_texts, params, Some(&ngram_maps[..]));
        let transformed =
            vectorizer.transform_from_tokenized(&tokenized_texts, texts.len(), Some(&ngram_maps[..]));

        (vectorizer, transformed)
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    /// The fitted vocabulary as a token-to-index mapping.
    #[must_use]
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocab
    }

    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::super::{to_dense, Tokenizer};
    use super::*;

    fn char_params() -> VectorizerParams {
        VectorizerParams::new(Tokenizer::Characters, 1..=1, 1)
    }

    #[test]
    fn vocabulary_indices_are_lexicographic() {
        let vectorizer = CountVectorizer::fit(&["ab", "a1"], char_params());
        let vocab = vectorizer.vocabulary();
        // '1' < 'a' < 'b' in lexicographic order
        assert_eq!(vocab["1"], 0);
        assert_eq!(vocab["a"], 1);
        assert_eq!(vocab["b"], 2);
    }

    #[test]
    fn binary_mode_caps_counts_at_one() {
        let vectorizer = CountVectorizer::fit(&["aa"], char_params().binary());
        let matrix = to_dense(&vectorizer.transform(&["aaa"]));
        assert_eq!(matrix[[0, 0]], 1.0);
    }

    #[test]
    fn count_mode_keeps_counts() {
        let vectorizer = CountVectorizer::fit(&["aa"], char_params());
        let matrix = to_dense(&vectorizer.transform(&["aaa"]));
        assert_eq!(matrix[[0, 0]], 3.0);
    }

    #[test]
    fn unseen_tokens_are_dropped() {
        let vectorizer = CountVectorizer::fit(&["ab"], char_params().binary());
        let matrix = to_dense(&vectorizer.transform(&["xyz"]));
        assert_eq!(matrix.shape(), &[1, 2]);
        assert!(matrix.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_vocabulary_gives_zero_width_matrix() {
        let vectorizer = CountVectorizer::fit(&["", ""], char_params());
        assert_eq!(vectorizer.num_features(), 0);
        let matrix = vectorizer.transform(&["anything"]);
        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.cols(), 0);
    }

    #[test]
    fn fit_transform_matches_fit_then_transform() {
        let texts = ["ab", "ba", "aab"];
        let params = VectorizerParams::new(Tokenizer::Characters, 1..=2, 1);
        let (vectorizer, combined) = CountVectorizer::fit_transform(&texts, params.clone());

        let separate = CountVectorizer::fit(&texts, params);
        assert_eq!(to_dense(&combined), to_dense(&separate.transform(&texts)));
        assert_eq!(vectorizer.num_features(), separate.num_features());
    }

    #[test]
    fn whole_tokenizer_treats_string_as_one_token() {
        let params = VectorizerParams::new(Tokenizer::Whole, 1..=1, 1).binary();
        let vectorizer = CountVectorizer::fit(&["a0", "a"], params);
        assert_eq!(vectorizer.num_features(), 2);
        let matrix = to_dense(&vectorizer.transform(&["a0"]));
        let vocab = vectorizer.vocabulary();
        assert_eq!(matrix[[0, vocab["a0"]]], 1.0);
        assert_eq!(matrix[[0, vocab["a"]]], 0.0);
    }

    #[test]
    fn min_df_filters_rare_tokens() {
        let params = VectorizerParams::new(Tokenizer::Characters, 1..=1, 2);
        let vectorizer = CountVectorizer::fit(&["ab", "ac"], params);
        // 'a' appears in both documents, 'b' and 'c' in one each
        assert_eq!(vectorizer.num_features(), 1);
        assert!(vectorizer.vocabulary().contains_key("a"));
    }
}
