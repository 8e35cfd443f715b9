//! Axes Module
//! One drawing surface of the grid. Draw calls are recorded as commands and
//! realized onto a plotters backend when the figure is rendered.

use crate::charts::style::{Color, GridStyle, MarkerShape};

/// Vertical segment from `ymin` to `ymax` at `x`. Used for wicks and bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub x: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub color: Color,
    /// Width in points
    pub linewidth: f64,
}

/// One bar of a bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub height: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPlot {
    pub bars: Vec<Bar>,
    pub alpha: f64,
    pub label: Option<String>,
}

/// Line through `(x, y)` points; a `None` y breaks the line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    pub points: Vec<(f64, Option<f64>)>,
    pub color: Color,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub shape: MarkerShape,
    pub color: Color,
    pub alpha: f64,
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Segment(Segment),
    Bars(BarPlot),
    /// Horizontal line across the whole surface
    HorizontalRule { y: f64, color: Color },
    /// Vertical line across the whole surface
    VerticalRule { x: f64, color: Color },
    Line(LinePlot),
    Marker(Marker),
}

impl DrawCommand {
    /// Series label shown in the legend, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            DrawCommand::Bars(plot) => plot.label.as_deref(),
            DrawCommand::Line(plot) => plot.label.as_deref(),
            _ => None,
        }
    }
}

/// A single subplot.
#[derive(Debug, Clone, Default)]
pub struct Axes {
    commands: Vec<DrawCommand>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    title: Option<String>,
    grid: Option<GridStyle>,
    legend: bool,
    x_ticks: Option<Vec<String>>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vlines(&mut self, x: f64, ymin: f64, ymax: f64, color: Color, linewidth: f64) {
        self.commands.push(DrawCommand::Segment(Segment {
            x,
            ymin,
            ymax,
            color,
            linewidth,
        }));
    }

    pub fn bar(&mut self, bars: Vec<Bar>, alpha: f64, label: Option<String>) {
        self.commands
            .push(DrawCommand::Bars(BarPlot { bars, alpha, label }));
    }

    pub fn axhline(&mut self, y: f64, color: Color) {
        self.commands.push(DrawCommand::HorizontalRule { y, color });
    }

    pub fn axvline(&mut self, x: f64, color: Color) {
        self.commands.push(DrawCommand::VerticalRule { x, color });
    }

    pub fn plot_line(&mut self, points: Vec<(f64, Option<f64>)>, color: Color, label: Option<String>) {
        self.commands.push(DrawCommand::Line(LinePlot {
            points,
            color,
            label,
        }));
    }

    pub fn marker(&mut self, x: f64, y: f64, shape: MarkerShape, color: Color, alpha: f64) {
        self.commands.push(DrawCommand::Marker(Marker {
            x,
            y,
            shape,
            color,
            alpha,
        }));
    }

    /// Turn grid lines on with the given style. A later call replaces the style.
    pub fn grid(&mut self, style: GridStyle) {
        self.grid = Some(style);
    }

    pub fn legend(&mut self) {
        self.legend = true;
    }

    pub fn set_xlabel(&mut self, text: impl Into<String>) {
        self.xlabel = Some(text.into());
    }

    pub fn set_ylabel(&mut self, text: impl Into<String>) {
        self.ylabel = Some(text.into());
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = Some(text.into());
    }

    /// Label row position `i` with `labels[i]`. A later call replaces the labels.
    pub fn set_x_ticks(&mut self, labels: Vec<String>) {
        self.x_ticks = Some(labels);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn x_tick_labels(&self) -> Option<&[String]> {
        self.x_ticks.as_deref()
    }

    /// Row position of the first x tick labelled `label`.
    pub fn x_position(&self, label: &str) -> Option<f64> {
        self.x_ticks
            .as_ref()?
            .iter()
            .position(|tick| tick == label)
            .map(|i| i as f64)
    }

    pub fn grid_style(&self) -> Option<&GridStyle> {
        self.grid.as_ref()
    }

    pub fn legend_enabled(&self) -> bool {
        self.legend
    }

    /// Labels of every labelled series, in drawing order.
    pub fn legend_labels(&self) -> Vec<&str> {
        self.commands.iter().filter_map(DrawCommand::label).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
