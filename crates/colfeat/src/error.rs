use thiserror::Error;

/// Errors surfaced by corpus access and featurization.
#[derive(Debug, Error)]
pub enum Error {
    /// `transform` or `n_features` called on a featurizer that was never fit.
    #[error("{featurizer} used before fit; call fit() first")]
    NotFitted { featurizer: &'static str },

    /// The named column does not exist in the corpus.
    #[error("column `{column}` not found in corpus")]
    MissingColumn { column: String },

    /// The named column exists but has zero rows, so no vocabulary can be
    /// learned from it.
    #[error("column `{column}` has no rows to fit on")]
    EmptyColumn { column: String },

    /// Columns of a corpus must all have the same number of rows.
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read csv corpus")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
