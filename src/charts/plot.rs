//! Plot call options: chart kind, styling, and the data handed to `ChartGrid::plot`.

use crate::charts::style::{Color, GridSettings};
use crate::charts::ChartError;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChartKind {
    #[default]
    Ohlc,
    Volume,
    Line,
    Bar,
    HLine,
    VLine,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Ohlc => "ohlc",
            ChartKind::Volume => "volume",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::HLine => "hline",
            ChartKind::VLine => "vline",
        }
    }

    /// Reference lines take a single value instead of a table.
    pub fn takes_scalar(&self) -> bool {
        matches!(self, ChartKind::HLine | ChartKind::VLine)
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ohlc" => Ok(ChartKind::Ohlc),
            "volume" => Ok(ChartKind::Volume),
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "hline" => Ok(ChartKind::HLine),
            "vline" => Ok(ChartKind::VLine),
            other => Err(ChartError::UnsupportedChartType(other.to_string())),
        }
    }
}

impl TryFrom<String> for ChartKind {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis labels and title. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleLabels {
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub title: Option<String>,
}

/// Options for a single `plot` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Row-major index of the target surface
    pub ax: usize,
    #[serde(rename = "chart_type")]
    pub kind: ChartKind,
    /// Overlay entry/exit markers from the `Signal` and `Price` columns
    pub signal: bool,
    pub custom_columns: Option<Vec<String>>,
    pub custom_colors: Vec<Color>,
    pub legend: bool,
    pub grid: bool,
    pub grid_settings: Option<GridSettings>,
    pub title_labels: Option<TitleLabels>,
    /// Column whose values label the x ticks (dates, usually)
    pub index_column: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            ax: 0,
            kind: ChartKind::Ohlc,
            signal: false,
            custom_columns: None,
            custom_colors: vec![Color::BLACK],
            legend: false,
            grid: false,
            grid_settings: None,
            title_labels: None,
            index_column: None,
        }
    }
}

impl PlotOptions {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn on_axes(mut self, ax: usize) -> Self {
        self.ax = ax;
        self
    }

    pub fn with_signal(mut self) -> Self {
        self.signal = true;
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        self.custom_colors = colors.into();
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }

    /// Enable grid lines; `settings` overrides the defaults field by field.
    pub fn with_grid(mut self, settings: Option<GridSettings>) -> Self {
        self.grid = true;
        self.grid_settings = settings;
        self
    }

    pub fn with_labels(mut self, labels: TitleLabels) -> Self {
        self.title_labels = Some(labels);
        self
    }

    /// Label x ticks with the values of `column`. Rows keep their positions.
    pub fn with_index_column(mut self, column: impl Into<String>) -> Self {
        self.index_column = Some(column.into());
        self
    }

    /// Custom columns to draw, or `None` when the default `Close` series applies.
    pub(crate) fn selected_columns(&self) -> Option<&[String]> {
        self.custom_columns
            .as_deref()
            .filter(|columns| !columns.is_empty())
    }
}

/// Data for a plot call: a table, or a single value for reference lines.
#[derive(Debug)]
pub enum PlotData<'a> {
    Frame(&'a mut DataFrame),
    Value(f64),
}

impl<'a> From<&'a mut DataFrame> for PlotData<'a> {
    fn from(df: &'a mut DataFrame) -> Self {
        PlotData::Frame(df)
    }
}

impl From<f64> for PlotData<'_> {
    fn from(value: f64) -> Self {
        PlotData::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_tags_parse() {
        assert_eq!("ohlc".parse::<ChartKind>().unwrap(), ChartKind::Ohlc);
        assert_eq!("vline".parse::<ChartKind>().unwrap(), ChartKind::VLine);
        assert!(matches!(
            "candles".parse::<ChartKind>(),
            Err(ChartError::UnsupportedChartType(tag)) if tag == "candles"
        ));
    }

    #[test]
    fn defaults_match_plot_signature() {
        let options = PlotOptions::default();

        assert_eq!(options.ax, 0);
        assert_eq!(options.kind, ChartKind::Ohlc);
        assert!(!options.signal && !options.legend && !options.grid);
        assert_eq!(options.custom_colors, vec![Color::BLACK]);
        assert!(options.custom_columns.is_none());
    }

    #[test]
    fn empty_column_list_selects_default_series() {
        let options = PlotOptions::new(ChartKind::Line).with_columns(Vec::<String>::new());

        assert!(options.selected_columns().is_none());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: PlotOptions = serde_json::from_str(
            r##"{"ax": 1, "chart_type": "line", "custom_columns": ["sma"], "custom_colors": ["red", "#0000ff"]}"##,
        )
        .unwrap();

        assert_eq!(options.ax, 1);
        assert_eq!(options.kind, ChartKind::Line);
        assert_eq!(options.custom_colors, vec![Color::RED, Color::BLUE]);
        assert!(!options.signal);
    }

    #[test]
    fn unknown_chart_type_in_json_is_rejected() {
        let err = serde_json::from_str::<PlotOptions>(r#"{"chart_type": "pie"}"#).unwrap_err();

        assert!(err.to_string().contains("pie"));
    }
}
