mod count_vectorizer;
mod ngrams;
mod params;
mod tfidf_vectorizer;
mod tokenizer;

use ndarray::Array2;
use sprs::CsMat;

pub use count_vectorizer::CountVectorizer;
pub use params::VectorizerParams;
pub use tfidf_vectorizer::TfidfVectorizer;
pub use tokenizer::Tokenizer;

/// Densify a CSR matrix.
///
/// Vectorizers keep their output sparse; callers densify once, at the
/// featurizer boundary.
#[must_use]
pub fn to_dense(matrix: &CsMat<f64>) -> Array2<f64> {
    let mut dense = Array2::zeros((matrix.rows(), matrix.cols()));
    for (row_idx, row_vec) in matrix.outer_iterator().enumerate() {
        for (col_idx, &value) in row_vec.iter() {
            dense[[row_idx, col_idx]] = value;
        }
    }
    dense
}
