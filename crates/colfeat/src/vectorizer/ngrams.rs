use ahash::{HashMap, HashMapExt};
use dashmap::DashMap;
use rayon::prelude::*;

/// Count n-gram occurrences within one tokenized document.
///
/// N-gram keys are the plain concatenation of their tokens. With
/// single-character tokens this is unambiguous; with whole-string tokens only
/// unigrams occur in practice.
pub fn count_ngrams(tokens: &[String], ngram_sizes: &[usize]) -> HashMap<String, usize> {
    let mut ngram_counter = HashMap::new();

    for &n in ngram_sizes {
        for window in tokens.windows(n) {
            *ngram_counter.entry(window.concat()).or_insert(0) += 1;
        }
    }
    ngram_counter
}

/// Document frequency per n-gram across all documents.
pub fn build_vocabulary(
    tokenized_texts: &[Vec<String>],
    ngram_sizes: &[usize],
) -> DashMap<String, usize, ahash::RandomState> {
    let vocab_df = DashMap::with_hasher(ahash::RandomState::default());

    tokenized_texts.par_iter().for_each(|tokens| {
        let ngrams = count_ngrams(tokens, ngram_sizes);
        for token in ngrams.into_keys() {
            vocab_df
                .entry(token)
                .and_modify(|df| *df += 1)
                .or_insert(1usize);
        }
    });
    vocab_df
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.chars().map(String::from).collect()
    }

    #[test]
    fn unigrams_and_bigrams() {
        let counts = count_ngrams(&tokens("aab"), &[1, 2]);
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["b"], 1);
        assert_eq!(counts["aa"], 1);
        assert_eq!(counts["ab"], 1);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn document_frequency_counts_documents_not_occurrences() {
        let docs = vec![tokens("aa"), tokens("ab")];
        let vocab_df = build_vocabulary(&docs, &[1]);
        // "a" appears twice in the first doc but counts once per document
        assert_eq!(*vocab_df.get("a").unwrap(), 2);
        assert_eq!(*vocab_df.get("b").unwrap(), 1);
    }
}
