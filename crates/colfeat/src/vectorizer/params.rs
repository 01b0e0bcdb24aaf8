use std::ops::RangeInclusive;

use super::tokenizer::Tokenizer;

#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct VectorizerParams {
    tokenizer: Tokenizer,
    ngram_sizes: Vec<usize>,
    /// Emit 0/1 presence indicators instead of occurrence counts.
    binary: bool,
    /// Minimum document frequency; tokens seen in fewer documents are
    /// dropped from the vocabulary.
    min_df: usize,
}

impl VectorizerParams {
    pub fn new(
        tokenizer: Tokenizer,
        ngram_range: impl Into<RangeInclusive<usize>>,
        min_df: usize,
    ) -> Self {
        let ngram_sizes = ngram_range.into().collect::<Vec<_>>();
        assert!(
            !ngram_sizes.is_empty(),
            "ngram_range must contain at least one value"
        );
        assert!(
            ngram_sizes.iter().all(|&n| n >= 1),
            "ngram sizes must be >= 1"
        );
        assert!(min_df >= 1, "min_df must be >= 1");
        Self {
            tokenizer,
            ngram_sizes,
            binary: false,
            min_df,
        }
    }

    /// Switch the vectorizer to binary presence mode.
    #[must_use]
    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    #[must_use]
    pub fn tokenizer(&self) -> Tokenizer {
        self.tokenizer
    }

    #[must_use]
    pub fn ngram_sizes(&self) -> &[usize] {
        &self.ngram_sizes
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.binary
    }

    #[must_use]
    pub fn min_df(&self) -> usize {
        self.min_df
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::Characters,
            ngram_sizes: vec![1],
            binary: false,
            min_df: 1,
        }
    }
}
