//! Charts module - Chart grid, surfaces and rendering

mod axes;
mod error;
mod grid;
mod plot;
mod renderer;
mod style;

pub use axes::{Axes, Bar, BarPlot, DrawCommand, LinePlot, Marker, Segment};
pub use error::ChartError;
pub use grid::{
    Candle, ChartGrid, ColorCycle, FigureLayout, DOJI_COLOR, DOJI_EPSILON, DOJI_WIDTH, DOWN_COLOR,
    SIGNAL_ALPHA, SIGNAL_DOWN_COLOR, SIGNAL_UP_COLOR, UP_COLOR, VOLUME_ALPHA, VOLUME_DOWN_COLOR,
    VOLUME_FLAT_COLOR, VOLUME_UP_COLOR, WICK_COLOR,
};
pub use plot::{ChartKind, PlotData, PlotOptions, TitleLabels};
pub use renderer::{Bounds, StaticChartRenderer};
pub use style::{Color, GridLines, GridSettings, GridStyle, LineStyle, MarkerShape};
