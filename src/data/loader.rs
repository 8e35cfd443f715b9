//! CSV Data Loader Module
//! Loads price/volume tables from CSV files using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Loads CSV files into a `DataFrame` and keeps the most recent one.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file, replacing whatever was loaded before.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&mut DataFrame, LoaderError> {
        let path = file_path.as_ref().to_path_buf();
        let wrap = |source: PolarsError| LoaderError::Csv {
            path: path.clone(),
            source,
        };

        let df = LazyCsvReader::new(&path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .map_err(wrap)?
            .collect()
            .map_err(wrap)?;

        debug!(
            "loaded {} rows x {} columns from {:?}",
            df.height(),
            df.width(),
            path
        );

        self.file_path = Some(path);
        Ok(self.df.insert(df))
    }

    /// Get list of column names from the loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
