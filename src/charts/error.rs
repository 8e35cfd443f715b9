//! Chart errors

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Grid needs at least one row and one column, got {rows}x{columns}")]
    InvalidShape { rows: usize, columns: usize },
    #[error("Figure size must be positive, got {width}x{height}")]
    InvalidFigureSize { width: f64, height: f64 },
    #[error("Surface index {index} out of range for a grid of {surfaces} surfaces")]
    SurfaceOutOfRange { index: usize, surfaces: usize },
    #[error("Unsupported chart type: {0:?}")]
    UnsupportedChartType(String),
    #[error("Missing required column {column} for {context}")]
    MissingColumn { column: String, context: String },
    #[error("Chart type {0} needs a table, got a single value")]
    ExpectedTable(&'static str),
    #[error("Chart type {0} needs a single value, got a table")]
    ExpectedScalar(&'static str),
    #[error("Color list is empty")]
    EmptyPalette,
    #[error("Unknown color: {0:?}")]
    UnknownColor(String),
    #[error("Unknown line style: {0:?}")]
    UnknownLineStyle(String),
    #[error("Unknown grid lines: {0:?} (expected major, minor or both)")]
    UnknownGridLines(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
