//! # colfeat
//!
//! Numeric feature extraction from raw string columns.
//!
//! This crate turns one column of a tabular corpus into dense feature
//! matrices for a downstream error-detection classifier. Two featurizers are
//! provided:
//!
//! - [`StatsFeaturizer`]: binary presence indicators over individual
//!   characters and over regex-abstracted string shapes.
//! - [`TfidfFeaturizer`]: TF-IDF weighted character n-grams (sizes 1 and 2).
//!
//! Both follow the same lifecycle: construct, `fit` once on a training
//! corpus (the vocabulary is frozen from then on), then `transform` any
//! corpus that shares the column.
//!
//! ## Quick start
//!
//! ```rust
//! use colfeat::{Corpus, Featurizer, StatsFeaturizer};
//!
//! let corpus = Corpus::from_columns([(
//!     "zip",
//!     vec!["90210".to_string(), "9021O".to_string()],
//! )])?;
//!
//! let mut featurizer = StatsFeaturizer::new();
//! featurizer.fit(&corpus, "zip")?;
//!
//! let features = featurizer.transform(&corpus, "zip")?;
//! assert_eq!(features.nrows(), 2);
//! assert_eq!(features.ncols(), featurizer.n_features(&corpus)?);
//! # Ok::<(), colfeat::Error>(())
//! ```

pub mod abstraction;
pub mod corpus;
mod error;
pub mod featurizer;
pub mod vectorizer;

pub use corpus::Corpus;
pub use error::{Error, Result};
pub use featurizer::{Featurizer, StatsFeaturizer, TfidfFeaturizer};
