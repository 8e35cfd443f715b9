//! Chart Grid Module
//! A figure of `rows x columns` surfaces and the `plot` dispatch that turns a
//! price/volume table into draw calls on one of them.

use crate::charts::axes::{Axes, Bar};
use crate::charts::plot::{ChartKind, PlotData, PlotOptions, TitleLabels};
use crate::charts::style::{Color, MarkerShape};
use crate::charts::ChartError;
use crate::data::{normalize_columns, DataProcessor};
use polars::prelude::DataFrame;
use tracing::{debug, warn};

/// Height given to a doji body so it stays visible.
pub const DOJI_EPSILON: f64 = 1e-6;

pub const WICK_COLOR: Color = Color::BLACK;
pub const UP_COLOR: Color = Color::GREEN;
pub const DOWN_COLOR: Color = Color::RED;
pub const DOJI_COLOR: Color = Color::BLACK;
pub const WICK_WIDTH: f64 = 1.0;
pub const BODY_WIDTH: f64 = 3.0;
pub const DOJI_WIDTH: f64 = 6.0;

pub const VOLUME_UP_COLOR: Color = Color::BLUE;
pub const VOLUME_DOWN_COLOR: Color = Color::RED;
pub const VOLUME_FLAT_COLOR: Color = Color::BLACK;
pub const VOLUME_ALPHA: f64 = 0.5;

pub const SIGNAL_UP_COLOR: Color = Color::DODGER_BLUE;
pub const SIGNAL_DOWN_COLOR: Color = Color::SALMON;
pub const SIGNAL_ALPHA: f64 = 0.5;

const OHLC_COLUMNS: [&str; 4] = ["Open", "High", "Low", "Close"];

/// Direction of a candle body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candle {
    Up,
    Down,
    Doji,
}

impl Candle {
    /// `None` when open or close is NaN.
    pub fn classify(open: f64, close: f64) -> Option<Self> {
        if close > open {
            Some(Candle::Up)
        } else if close < open {
            Some(Candle::Down)
        } else if close == open {
            Some(Candle::Doji)
        } else {
            None
        }
    }

    /// Body span `(ymin, ymax)`, color and linewidth.
    pub fn body(&self, open: f64, close: f64) -> (f64, f64, Color, f64) {
        match self {
            Candle::Up => (open, close, UP_COLOR, BODY_WIDTH),
            Candle::Down => (close, open, DOWN_COLOR, BODY_WIDTH),
            Candle::Doji => (open, close + DOJI_EPSILON, DOJI_COLOR, DOJI_WIDTH),
        }
    }
}

/// Round-robin position in a caller's color list, shared by every plot call on a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCycle {
    index: usize,
}

impl ColorCycle {
    /// Index to use now for a palette of `len` colors, then advance.
    ///
    /// An index left over from a longer palette is reduced modulo `len`.
    pub fn next(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let current = self.index % len;
        self.index = if current + 1 >= len { 0 } else { current + 1 };
        current
    }

    pub fn position(&self) -> usize {
        self.index
    }
}

/// Figure layout options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    /// Width and height in inches
    pub figure_size: (f64, f64),
    /// Tight margins around each surface
    pub constrained_layout: bool,
    /// Pixels per inch
    pub dpi: u32,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            figure_size: (12.0, 6.0),
            constrained_layout: true,
            dpi: 100,
        }
    }
}

impl FigureLayout {
    /// Figure size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size;
        let dpi = self.dpi as f64;
        (
            ((w * dpi).round() as u32).max(1),
            ((h * dpi).round() as u32).max(1),
        )
    }

    /// Convert a linewidth in points to whole pixels, at least one.
    pub fn stroke_px(&self, points: f64) -> u32 {
        ((points * self.dpi as f64 / 72.0).round() as u32).max(1)
    }
}

/// A grid of chart surfaces.
#[derive(Debug, Clone)]
pub struct ChartGrid {
    rows: usize,
    columns: usize,
    layout: FigureLayout,
    axes: Vec<Axes>,
    color_cycle: ColorCycle,
}

impl ChartGrid {
    /// Grid of `rows x columns` surfaces, 12x6 inches with constrained layout.
    pub fn new(rows: usize, columns: usize) -> Result<Self, ChartError> {
        if rows == 0 || columns == 0 {
            return Err(ChartError::InvalidShape { rows, columns });
        }

        Ok(Self {
            rows,
            columns,
            layout: FigureLayout::default(),
            axes: vec![Axes::new(); rows * columns],
            color_cycle: ColorCycle::default(),
        })
    }

    pub fn with_figure_size(mut self, width: f64, height: f64) -> Result<Self, ChartError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ChartError::InvalidFigureSize { width, height });
        }
        self.layout.figure_size = (width, height);
        Ok(self)
    }

    pub fn with_constrained_layout(mut self, constrained: bool) -> Self {
        self.layout.constrained_layout = constrained;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.layout.dpi = dpi.max(1);
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn layout(&self) -> &FigureLayout {
        &self.layout
    }

    /// Surface at a row-major index.
    pub fn axes(&self, index: usize) -> Option<&Axes> {
        self.axes.get(index)
    }

    pub fn axes_list(&self) -> &[Axes] {
        &self.axes
    }

    pub fn color_cycle(&self) -> ColorCycle {
        self.color_cycle
    }

    /// Draw `data` onto surface `options.ax`.
    ///
    /// A table is column-normalized in place first. Every input check runs
    /// before anything is drawn, so a failed call leaves the surface untouched.
    pub fn plot<'a>(
        &mut self,
        data: impl Into<PlotData<'a>>,
        options: &PlotOptions,
    ) -> Result<(), ChartError> {
        let mut data = data.into();
        let kind = options.kind;

        if options.custom_colors.is_empty() {
            return Err(ChartError::EmptyPalette);
        }
        if options.ax >= self.axes.len() {
            return Err(ChartError::SurfaceOutOfRange {
                index: options.ax,
                surfaces: self.axes.len(),
            });
        }

        match (&mut data, kind.takes_scalar()) {
            (PlotData::Frame(df), false) => {
                normalize_columns(df)?;
                Self::check_columns(df, options)?;
            }
            (PlotData::Value(_), true) => {}
            (PlotData::Frame(_), true) => return Err(ChartError::ExpectedScalar(kind.as_str())),
            (PlotData::Value(_), false) => return Err(ChartError::ExpectedTable(kind.as_str())),
        }

        debug!("plotting {} on surface {}", kind, options.ax);

        let axes = &mut self.axes[options.ax];
        let cycle = &mut self.color_cycle;
        let first_color = options.custom_colors[0];

        match &data {
            PlotData::Frame(df) => match kind {
                ChartKind::Ohlc => draw_ohlc(axes, df)?,
                ChartKind::Volume => draw_volume(axes, df)?,
                ChartKind::Line => draw_columns(axes, df, options, cycle, SeriesShape::Line)?,
                ChartKind::Bar => draw_columns(axes, df, options, cycle, SeriesShape::Bar)?,
                ChartKind::HLine | ChartKind::VLine => {
                    return Err(ChartError::ExpectedScalar(kind.as_str()))
                }
            },
            PlotData::Value(value) => match kind {
                ChartKind::HLine => axes.axhline(*value, first_color),
                ChartKind::VLine => axes.axvline(*value, first_color),
                _ => return Err(ChartError::ExpectedTable(kind.as_str())),
            },
        }

        if let PlotData::Frame(df) = &data {
            if options.signal {
                draw_signals(axes, df)?;
            }
            if let Some(column) = &options.index_column {
                let labels = DataProcessor::text_values(df, column)?;
                axes.set_x_ticks(labels.into_iter().map(Option::unwrap_or_default).collect());
            }
        }

        if options.legend {
            if axes.legend_labels().is_empty() {
                warn!(
                    "legend requested on surface {} but no labelled series were drawn",
                    options.ax
                );
            }
            axes.legend();
        }

        if options.grid {
            let style = options.grid_settings.clone().unwrap_or_default().resolve();
            axes.grid(style);
        }

        if let Some(labels) = &options.title_labels {
            apply_labels(axes, labels);
        }

        Ok(())
    }

    fn check_columns(df: &DataFrame, options: &PlotOptions) -> Result<(), ChartError> {
        let kind = options.kind;
        let required: Vec<&str> = match kind {
            ChartKind::Ohlc => OHLC_COLUMNS.to_vec(),
            ChartKind::Volume => vec!["Volume"],
            ChartKind::Line | ChartKind::Bar => match options.selected_columns() {
                Some(columns) => columns.iter().map(String::as_str).collect(),
                None => vec!["Close"],
            },
            ChartKind::HLine | ChartKind::VLine => Vec::new(),
        };

        if let Some(column) = DataProcessor::first_missing(df, &required) {
            return Err(ChartError::MissingColumn {
                column: column.to_string(),
                context: format!("chart type {}", kind),
            });
        }

        if let Some(column) = &options.index_column {
            if !DataProcessor::has_column(df, column) {
                return Err(ChartError::MissingColumn {
                    column: column.clone(),
                    context: "x tick labels".to_string(),
                });
            }
        }

        if options.signal
            && DataProcessor::has_column(df, "Signal")
            && !DataProcessor::has_column(df, "Price")
        {
            return Err(ChartError::MissingColumn {
                column: "Price".to_string(),
                context: "signal overlay".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Clone, Copy)]
enum SeriesShape {
    Line,
    Bar,
}

fn draw_ohlc(axes: &mut Axes, df: &DataFrame) -> Result<(), ChartError> {
    let open = DataProcessor::numeric_values(df, "Open")?;
    let high = DataProcessor::numeric_values(df, "High")?;
    let low = DataProcessor::numeric_values(df, "Low")?;
    let close = DataProcessor::numeric_values(df, "Close")?;

    for (i, x) in DataProcessor::row_positions(df).into_iter().enumerate() {
        let (Some(o), Some(h), Some(l), Some(c)) = (open[i], high[i], low[i], close[i]) else {
            continue;
        };

        axes.vlines(x, l, h, WICK_COLOR, WICK_WIDTH);
        if let Some(candle) = Candle::classify(o, c) {
            let (ymin, ymax, color, width) = candle.body(o, c);
            axes.vlines(x, ymin, ymax, color, width);
        }
    }

    Ok(())
}

fn draw_volume(axes: &mut Axes, df: &DataFrame) -> Result<(), ChartError> {
    let volume = DataProcessor::numeric_values(df, "Volume")?;

    let bars = DataProcessor::row_positions(df)
        .into_iter()
        .zip(volume)
        .filter_map(|(x, v)| {
            let height = v?;
            let color = if height > 0.0 {
                VOLUME_UP_COLOR
            } else if height < 0.0 {
                VOLUME_DOWN_COLOR
            } else {
                VOLUME_FLAT_COLOR
            };
            Some(Bar { x, height, color })
        })
        .collect();

    axes.bar(bars, VOLUME_ALPHA, None);
    axes.axhline(0.0, Color::BLACK);
    Ok(())
}

/// Line or bar series for the selected columns, or the `Close` column by default.
fn draw_columns(
    axes: &mut Axes,
    df: &DataFrame,
    options: &PlotOptions,
    cycle: &mut ColorCycle,
    shape: SeriesShape,
) -> Result<(), ChartError> {
    let colors = &options.custom_colors;
    let series: Vec<(&str, Color)> = match options.selected_columns() {
        Some(columns) => columns
            .iter()
            .map(|name| (name.as_str(), colors[cycle.next(colors.len())]))
            .collect(),
        None => vec![("Close", colors[0])],
    };

    let positions = DataProcessor::row_positions(df);
    for (name, color) in series {
        let values = DataProcessor::numeric_values(df, name)?;
        let label = Some(name.to_string());
        match shape {
            SeriesShape::Line => {
                let points = positions.iter().copied().zip(values).collect();
                axes.plot_line(points, color, label);
            }
            SeriesShape::Bar => {
                let bars = positions
                    .iter()
                    .zip(values)
                    .filter_map(|(&x, v)| Some(Bar { x, height: v?, color }))
                    .collect();
                axes.bar(bars, 1.0, label);
            }
        }
    }

    Ok(())
}

/// Entry/exit markers at `Price` for rows with a non-zero `Signal`.
fn draw_signals(axes: &mut Axes, df: &DataFrame) -> Result<(), ChartError> {
    if !DataProcessor::has_column(df, "Signal") {
        debug!("signal overlay requested without a Signal column");
        return Ok(());
    }

    let signal = DataProcessor::numeric_values(df, "Signal")?;
    let price = DataProcessor::numeric_values(df, "Price")?;

    for (i, x) in DataProcessor::row_positions(df).into_iter().enumerate() {
        let (Some(s), Some(p)) = (signal[i], price[i]) else {
            continue;
        };
        if s > 0.0 {
            axes.marker(x, p, MarkerShape::TriangleUp, SIGNAL_UP_COLOR, SIGNAL_ALPHA);
        } else if s < 0.0 {
            axes.marker(x, p, MarkerShape::TriangleDown, SIGNAL_DOWN_COLOR, SIGNAL_ALPHA);
        }
    }

    Ok(())
}

fn apply_labels(axes: &mut Axes, labels: &TitleLabels) {
    let present = |text: &Option<String>| text.clone().filter(|t| !t.is_empty());

    if let Some(text) = present(&labels.xlabel) {
        axes.set_xlabel(text);
    }
    if let Some(text) = present(&labels.ylabel) {
        axes.set_ylabel(text);
    }
    if let Some(text) = present(&labels.title) {
        axes.set_title(text);
    }
}
