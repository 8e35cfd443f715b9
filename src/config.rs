//! Figure Configuration Module
//! JSON description of a chart grid and the ordered plot calls drawn on it.
//!
//! ```json
//! {
//!   "rows": 2, "columns": 1, "figure_size": [12, 8],
//!   "plots": [
//!     { "csv": "btc.csv", "chart_type": "ohlc", "signal": true, "grid": true,
//!       "index_column": "Date" },
//!     { "csv": "btc.csv", "ax": 1, "chart_type": "volume" },
//!     { "value": 42000, "chart_type": "hline", "custom_colors": ["salmon"] },
//!     { "at": "2024-03-01", "chart_type": "vline" }
//!   ]
//! }
//! ```

use crate::charts::{ChartError, ChartGrid, PlotOptions};
use crate::data::{DataLoader, LoaderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Plot #{index}: {reason}")]
    InvalidPlot { index: usize, reason: String },
    #[error("Plot #{index}: {source}")]
    Plot {
        index: usize,
        #[source]
        source: ChartError,
    },
    #[error(transparent)]
    Grid(#[from] ChartError),
    #[error(transparent)]
    Load(#[from] LoaderError),
}

fn default_figure_size() -> (f64, f64) {
    (12.0, 6.0)
}

fn default_constrained_layout() -> bool {
    true
}

fn default_dpi() -> u32 {
    100
}

/// Grid shape, figure options and plot calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    pub rows: usize,
    pub columns: usize,
    #[serde(default = "default_figure_size")]
    pub figure_size: (f64, f64),
    #[serde(default = "default_constrained_layout")]
    pub constrained_layout: bool,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default)]
    pub plots: Vec<PlotSpec>,
}

/// One plot call: where its data comes from plus the plot options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    /// CSV table, relative paths resolved against the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<PathBuf>,
    /// Single value for reference lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// X tick label of the target surface; a vline drawn at that row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    #[serde(flatten)]
    pub options: PlotOptions,
}

/// Resolved data source of a plot call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotSource {
    Csv(PathBuf),
    Value(f64),
    /// Position of an x tick label on the target surface
    At(String),
}

impl PlotSpec {
    pub fn source(&self, index: usize) -> Result<PlotSource, ConfigError> {
        match (&self.csv, self.value, &self.at) {
            (Some(path), None, None) => Ok(PlotSource::Csv(path.clone())),
            (None, Some(value), None) => Ok(PlotSource::Value(value)),
            (None, None, Some(label)) => Ok(PlotSource::At(label.clone())),
            (None, None, None) => Err(ConfigError::InvalidPlot {
                index,
                reason: "needs a csv path, a value or an x label".to_string(),
            }),
            _ => Err(ConfigError::InvalidPlot {
                index,
                reason: "set only one of csv, value and at".to_string(),
            }),
        }
    }
}

impl FigureConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        for (index, spec) in config.plots.iter().enumerate() {
            spec.source(index)?;
        }
        Ok(config)
    }

    /// Empty grid with this shape and figure options.
    pub fn build_grid(&self) -> Result<ChartGrid, ChartError> {
        let (width, height) = self.figure_size;
        Ok(ChartGrid::new(self.rows, self.columns)?
            .with_figure_size(width, height)?
            .with_constrained_layout(self.constrained_layout)
            .with_dpi(self.dpi))
    }

    /// Build the grid and run every plot call in order. Relative CSV paths are
    /// taken from `base_dir`.
    pub fn run(&self, base_dir: &Path) -> Result<ChartGrid, ConfigError> {
        let mut grid = self.build_grid()?;
        let mut loader = DataLoader::new();

        for (index, spec) in self.plots.iter().enumerate() {
            let result = match spec.source(index)? {
                PlotSource::Csv(path) => {
                    let path = if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    };
                    debug!("plot #{} from {:?}", index, path);
                    let df = loader.load_csv(&path)?;
                    let result = grid.plot(df, &spec.options);
                    if result.is_err() {
                        debug!(
                            "columns of {:?}: {:?}",
                            loader.get_file_path(),
                            loader.get_columns()
                        );
                    }
                    result
                }
                PlotSource::Value(value) => grid.plot(value, &spec.options),
                PlotSource::At(label) => {
                    let ax = spec.options.ax;
                    let x = grid
                        .axes(ax)
                        .and_then(|axes| axes.x_position(&label))
                        .ok_or_else(|| ConfigError::InvalidPlot {
                            index,
                            reason: format!("no x tick labelled {:?} on surface {}", label, ax),
                        })?;
                    grid.plot(x, &spec.options)
                }
            };
            result.map_err(|source| ConfigError::Plot { index, source })?;
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, Color, DrawCommand};

    #[test]
    fn parses_with_defaults() {
        let config = FigureConfig::from_json(
            r#"{"rows": 2, "columns": 1, "plots": [
                {"csv": "prices.csv"},
                {"value": 10.5, "chart_type": "hline", "custom_colors": ["salmon"], "ax": 1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(config.figure_size, (12.0, 6.0));
        assert!(config.constrained_layout);
        assert_eq!(config.dpi, 100);
        assert_eq!(config.plots[0].options.kind, ChartKind::Ohlc);
        assert_eq!(
            config.plots[0].source(0).unwrap(),
            PlotSource::Csv(PathBuf::from("prices.csv"))
        );
        assert_eq!(config.plots[1].options.kind, ChartKind::HLine);
        assert_eq!(config.plots[1].options.custom_colors, vec![Color::SALMON]);
        assert_eq!(config.plots[1].source(1).unwrap(), PlotSource::Value(10.5));
    }

    #[test]
    fn rejects_plot_without_source() {
        let err = FigureConfig::from_json(r#"{"rows": 1, "columns": 1, "plots": [{"chart_type": "line"}]}"#)
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPlot { index: 0, .. }));
    }

    #[test]
    fn rejects_plot_with_both_sources() {
        let err = FigureConfig::from_json(
            r#"{"rows": 1, "columns": 1, "plots": [{"csv": "a.csv", "value": 1.0}]}"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPlot { index: 0, .. }));
    }

    #[test]
    fn rejects_unknown_chart_type() {
        let err = FigureConfig::from_json(
            r#"{"rows": 1, "columns": 1, "plots": [{"value": 1.0, "chart_type": "pie"}]}"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn builds_grid_with_figure_options() {
        let config = FigureConfig::from_json(
            r#"{"rows": 2, "columns": 2, "figure_size": [8, 4], "constrained_layout": false, "dpi": 50}"#,
        )
        .unwrap();

        let grid = config.build_grid().unwrap();

        assert_eq!(grid.axes_list().len(), 4);
        assert_eq!(grid.layout().pixel_size(), (400, 200));
        assert!(!grid.layout().constrained_layout);
    }

    #[test]
    fn vline_at_a_date_label() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("btc.csv"),
            "Date,O,H,L,C\n2024-01-02,10,12,9,11\n2024-01-03,11,11.5,10,10.5\n",
        )
        .unwrap();
        let config = FigureConfig::from_json(
            r#"{"rows": 1, "columns": 1, "plots": [
                {"csv": "btc.csv", "index_column": "Date"},
                {"at": "2024-01-03", "chart_type": "vline"}
            ]}"#,
        )
        .unwrap();

        let grid = config.run(dir.path()).unwrap();

        let axes = grid.axes(0).unwrap();
        assert_eq!(axes.x_tick_labels().map(<[String]>::len), Some(2));
        assert_eq!(
            axes.commands().last(),
            Some(&DrawCommand::VerticalRule {
                x: 1.0,
                color: Color::BLACK
            })
        );
    }

    #[test]
    fn unknown_x_label_is_reported() {
        let config = FigureConfig::from_json(
            r#"{"rows": 1, "columns": 1, "plots": [{"at": "2024-01-03", "chart_type": "vline"}]}"#,
        )
        .unwrap();

        let err = config.run(Path::new(".")).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPlot { index: 0, .. }));
    }

    #[test]
    fn plot_errors_carry_their_index() {
        let config = FigureConfig::from_json(
            r#"{"rows": 1, "columns": 1, "plots": [
                {"value": 1.0, "chart_type": "hline"},
                {"value": 2.0, "chart_type": "hline", "ax": 3}
            ]}"#,
        )
        .unwrap();

        let err = config.run(Path::new(".")).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Plot {
                index: 1,
                source: ChartError::SurfaceOutOfRange { index: 3, surfaces: 1 }
            }
        ));
    }
}
