use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// A column-oriented table of raw string columns.
///
/// This is the only input type the featurizers accept. It is immutable once
/// built; `fit` and `transform` never modify it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    columns: Vec<(String, Vec<String>)>,
}

impl Corpus {
    /// Build a corpus from `(name, values)` pairs.
    ///
    /// All columns must have the same number of rows.
    pub fn from_columns<N: Into<String>>(
        columns: impl IntoIterator<Item = (N, Vec<String>)>,
    ) -> Result<Self> {
        let columns: Vec<(String, Vec<String>)> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();

        if let Some((_, first)) = columns.first() {
            let expected = first.len();
            for (name, values) in &columns {
                if values.len() != expected {
                    return Err(Error::RaggedColumn {
                        column: name.clone(),
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }

        Ok(Self { columns })
    }

    /// Read a corpus from a CSV file with a header row.
    ///
    /// Every field is kept as a raw string; no type inference is attempted.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading corpus from CSV");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut columns: Vec<(String, Vec<String>)> = reader
            .headers()?
            .iter()
            .map(|name| (name.to_owned(), Vec::new()))
            .collect();

        for record in reader.records() {
            let record = record?;
            for (idx, field) in record.iter().enumerate() {
                if let Some((_, values)) = columns.get_mut(idx) {
                    values.push(field.to_owned());
                }
            }
        }

        debug!(
            num_columns = columns.len(),
            num_rows = columns.first().map_or(0, |(_, v)| v.len()),
            "Corpus loaded"
        );
        Self::from_columns(columns)
    }

    /// The values of a named column, or [`Error::MissingColumn`].
    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.columns
            .iter()
            .find(|(col_name, _)| col_name == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_owned(),
            })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}
