use rayon::prelude::*;
use tracing::debug;

/// Minimum number of texts to bother spawning rayon tasks for
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// How a document is split into tokens before n-gram extraction.
///
/// A fixed, enumerated strategy: these two cover every vectorizer this crate
/// builds, and an enum keeps the choice serializable alongside the fitted
/// vocabulary.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tokenizer {
    /// One token per character. No lowercasing, no filtering.
    Characters,
    /// The entire document is a single token. Empty documents yield the
    /// empty-string token, which is a legitimate vocabulary entry.
    Whole,
}

impl Tokenizer {
    pub fn tokenize(self, text: &str) -> Vec<String> {
        match self {
            Self::Characters => text.chars().map(String::from).collect(),
            Self::Whole => vec![text.to_owned()],
        }
    }
}

pub fn tokenize_all<T: AsRef<str> + Sync>(texts: &[T], tokenizer: Tokenizer) -> Vec<Vec<String>> {
    if texts.len() >= MIN_TEXTS_FOR_PARALLEL {
        debug!(num_texts = texts.len(), "Using parallel tokenization");
        texts
            .par_iter()
            .map(|text| tokenizer.tokenize(text.as_ref()))
            .collect()
    } else {
        debug!(num_texts = texts.len(), "Using sequential tokenization");
        texts
            .iter()
            .map(|text| tokenizer.tokenize(text.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_splits_per_char() {
        assert_eq!(Tokenizer::Characters.tokenize("a1"), vec!["a", "1"]);
        assert!(Tokenizer::Characters.tokenize("").is_empty());
    }

    #[test]
    fn whole_keeps_one_token() {
        assert_eq!(Tokenizer::Whole.tokenize("a1"), vec!["a1"]);
        assert_eq!(Tokenizer::Whole.tokenize(""), vec![""]);
    }
}
