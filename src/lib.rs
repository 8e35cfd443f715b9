//! Candle Grid - candlestick, volume and overlay charts on a grid of subplots.
//!
//! A [`ChartGrid`] holds `rows x columns` surfaces. Each call to
//! [`ChartGrid::plot`] normalizes the column names of a polars `DataFrame`
//! and records OHLC bars, volume bars, line/bar series, signal markers or
//! reference lines on one surface. [`StaticChartRenderer`] turns the grid into
//! a PNG or SVG image with plotters.
//!
//! ```no_run
//! use candle_grid::{ChartGrid, ChartKind, PlotOptions, StaticChartRenderer};
//! use polars::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut prices = df!(
//!     "O" => [10.0, 11.0, 10.5],
//!     "H" => [12.0, 11.5, 10.5],
//!     "L" => [9.0, 10.0, 10.5],
//!     "C" => [11.0, 10.5, 10.5],
//!     "V" => [1500.0, -200.0, 0.0],
//! )?;
//!
//! let mut grid = ChartGrid::new(2, 1)?;
//! grid.plot(&mut prices, &PlotOptions::default().with_grid(None))?;
//! grid.plot(&mut prices, &PlotOptions::new(ChartKind::Volume).on_axes(1))?;
//! grid.plot(10.5, &PlotOptions::new(ChartKind::HLine))?;
//! StaticChartRenderer::save(&grid, "prices.png")?;
//! # Ok(())
//! # }
//! ```

pub mod charts;
pub mod config;
pub mod data;

pub use charts::{
    Axes, ChartError, ChartGrid, ChartKind, Color, DrawCommand, GridSettings, PlotData,
    PlotOptions, StaticChartRenderer, TitleLabels,
};
pub use config::{ConfigError, FigureConfig, PlotSource, PlotSpec};
pub use data::{normalize_columns, DataLoader};
