//! Data module - CSV loading, column normalization and numeric extraction

mod columns;
mod loader;
mod processor;

pub use columns::{canonical_name, normalize_columns, COLUMN_ALIASES};
pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
