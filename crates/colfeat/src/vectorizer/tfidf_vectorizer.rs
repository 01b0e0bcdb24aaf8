use ahash::HashMap;
use sprs::CsMat;
use tracing::debug;

use super::{count_vectorizer::CountVectorizer, params::VectorizerParams};

/// TF-IDF weighter over a fitted [`CountVectorizer`] vocabulary.
///
/// Numeric semantics match the smoothed scikit-learn defaults:
/// `idf = ln((n_docs + 1) / (df + 1)) + 1`, raw term counts scaled by idf,
/// then L2 row normalization. Relative-frequency term counts differ from raw
/// counts only by a per-row constant, which the normalization cancels.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    count_vectorizer: CountVectorizer,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<T: AsRef<str> + Sync>(texts: &[T], params: VectorizerParams) -> Self {
        debug!(num_texts = texts.len(), "Fitting TfidfVectorizer");
        let (count_vectorizer, tf_matrix) = CountVectorizer::fit_transform(texts, params);
        debug!("Calculating IDF values");

        let n_docs = texts.len() as f64;
        let num_features = count_vectorizer.num_features();

        // Count document frequency for each term
        let mut df = vec![0usize; num_features];

        for row_vec in tf_matrix.outer_iterator() {
            for (col_idx, _val) in row_vec.iter() {
                df[col_idx] += 1;
            }
        }
        // IDF: log((n_docs + 1) / (df + 1)) + 1
        let idf = df
            .iter()
            .map(|&doc_freq| ((n_docs + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0)
            .collect();
        debug!("IDF calculation complete");

        Self {
            count_vectorizer,
            idf,
        }
    }

    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using TfidfVectorizer"
        );
        let mut tf_matrix = self.count_vectorizer.transform(texts);

        for mut row_vec in tf_matrix.outer_iterator_mut() {
            // Apply IDF
            for (col_idx, val) in row_vec.iter_mut() {
                *val *= self.idf[col_idx];
            }
            // Normalize row vector (L2 norm)
            let norm = row_vec.iter().map(|(_, &v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, val) in row_vec.iter_mut() {
                    *val /= norm;
                }
            }
        }
        tf_matrix
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.count_vectorizer.num_features()
    }

    #[must_use]
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        self.count_vectorizer.vocabulary()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{to_dense, Tokenizer};
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn char_unigram_params() -> VectorizerParams {
        VectorizerParams::new(Tokenizer::Characters, 1..=1, 1)
    }

    #[test]
    fn single_document_single_term_normalizes_to_one() {
        let vectorizer = TfidfVectorizer::fit(&["a"], char_unigram_params());
        let matrix = to_dense(&vectorizer.transform(&["a"]));
        assert!((matrix[[0, 0]] - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn idf_follows_smoothed_log_formula() {
        // Fit on ["aa", "ab"]: df("a") = 2, df("b") = 1.
        // idf("a") = ln(3/3) + 1 = 1, idf("b") = ln(3/2) + 1.
        let vectorizer = TfidfVectorizer::fit(&["aa", "ab"], char_unigram_params());
        let vocab = vectorizer.vocabulary().clone();
        let matrix = to_dense(&vectorizer.transform(&["ab"]));

        // Counts are equal in "ab", so the ratio of weights is the idf ratio
        let ratio = matrix[[0, vocab["b"]]] / matrix[[0, vocab["a"]]];
        assert!((ratio - ((1.5f64).ln() + 1.0)).abs() < TOLERANCE);
    }

    #[test]
    fn rows_are_l2_normalized() {
        let params = VectorizerParams::new(Tokenizer::Characters, 1..=2, 1);
        let vectorizer = TfidfVectorizer::fit(&["abc", "abd", "xyz"], params);
        let matrix = to_dense(&vectorizer.transform(&["abc", "xy"]));

        for row in matrix.outer_iter() {
            let norm = row.iter().map(|&v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn all_unseen_row_stays_zero() {
        let vectorizer = TfidfVectorizer::fit(&["ab"], char_unigram_params());
        let matrix = to_dense(&vectorizer.transform(&["xyz"]));
        assert!(matrix.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn frequent_bigram_outweighs_rare_one_in_document() {
        // Weighting-direction check: fit on ["aa", "ab"], transform ["aa"].
        // "aa" occurs in the row, "ab" does not; idf values are identical.
        let params = VectorizerParams::new(Tokenizer::Characters, 1..=2, 1);
        let vectorizer = TfidfVectorizer::fit(&["aa", "ab"], params);
        let vocab = vectorizer.vocabulary().clone();
        let matrix = to_dense(&vectorizer.transform(&["aa"]));

        assert!(matrix[[0, vocab["aa"]]] > matrix[[0, vocab["ab"]]]);
        assert_eq!(matrix[[0, vocab["ab"]]], 0.0);
    }
}
