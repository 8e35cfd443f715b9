//! Static Chart Renderer
//! Realizes the recorded surfaces of a `ChartGrid` as a PNG or SVG image.
//!
//! Layout:
//! 1. The figure is `figure_size x dpi` pixels on a white background
//! 2. It is split evenly into `rows x columns` areas, row-major
//! 3. Each area gets an autoscaled cartesian chart: title caption, axis
//!    descriptions, optional grid lines, the recorded series, optional legend

use crate::charts::axes::{Axes, DrawCommand};
use crate::charts::grid::{ChartGrid, FigureLayout};
use crate::charts::style::{Color, GridStyle, MarkerShape};
use crate::charts::ChartError;
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, DrawingArea, DrawingAreaErrorKind, DrawingBackend, EmptyElement,
    IntoDrawingArea, LineSeries, PathElement, Polygon, Rectangle, SVGBackend,
    SeriesLabelPosition, BLACK, WHITE,
};
use plotters::series::DashedLineSeries;
use plotters::style::Color as _;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

/// Half the width of a bar, in x units.
const BAR_HALF_WIDTH: f64 = 0.4;
/// Share of the data span added on both sides of each axis.
const AXIS_PADDING: f64 = 0.05;
/// Linewidth of line series and reference lines, in points.
const LINE_WIDTH: f64 = 1.5;
/// Half extent of a signal marker, in points.
const MARKER_HALF: f64 = 3.0;
/// Target number of major ticks per axis.
const MAJOR_TICKS: usize = 8;
/// Minor ticks per major step.
const MINOR_DIVISIONS: f64 = 5.0;

struct Spacing {
    margin: u32,
    x_label_area: u32,
    y_label_area: u32,
    caption_font: f64,
}

impl Spacing {
    fn for_layout(layout: &FigureLayout) -> Self {
        if layout.constrained_layout {
            Self {
                margin: 8,
                x_label_area: 36,
                y_label_area: 56,
                caption_font: 18.0,
            }
        } else {
            Self {
                margin: 24,
                x_label_area: 48,
                y_label_area: 72,
                caption_font: 20.0,
            }
        }
    }
}

/// Data extent of a surface, accumulated axis by axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
}

impl Bounds {
    fn widen(slot: &mut Option<(f64, f64)>, v: f64) {
        if !v.is_finite() {
            return;
        }
        *slot = Some(match *slot {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    pub fn add_x(&mut self, v: f64) {
        Self::widen(&mut self.x, v);
    }

    pub fn add_y(&mut self, v: f64) {
        Self::widen(&mut self.y, v);
    }

    /// Extent of everything recorded on `axes`. Reference lines span the whole
    /// surface, so they only count along their own coordinate.
    pub fn of(axes: &Axes) -> Self {
        let mut bounds = Self::default();
        for command in axes.commands() {
            match command {
                DrawCommand::Segment(seg) => {
                    bounds.add_x(seg.x);
                    bounds.add_y(seg.ymin);
                    bounds.add_y(seg.ymax);
                }
                DrawCommand::Bars(plot) => {
                    for bar in &plot.bars {
                        bounds.add_x(bar.x - BAR_HALF_WIDTH);
                        bounds.add_x(bar.x + BAR_HALF_WIDTH);
                        bounds.add_y(0.0);
                        bounds.add_y(bar.height);
                    }
                }
                DrawCommand::HorizontalRule { y, .. } => bounds.add_y(*y),
                DrawCommand::VerticalRule { x, .. } => bounds.add_x(*x),
                DrawCommand::Line(plot) => {
                    for (x, y) in &plot.points {
                        if let Some(y) = y {
                            bounds.add_x(*x);
                            bounds.add_y(*y);
                        }
                    }
                }
                DrawCommand::Marker(marker) => {
                    bounds.add_x(marker.x);
                    bounds.add_y(marker.y);
                }
            }
        }
        bounds
    }

    pub fn x_range(&self) -> Range<f64> {
        Self::padded(self.x)
    }

    pub fn y_range(&self) -> Range<f64> {
        Self::padded(self.y)
    }

    fn padded(extent: Option<(f64, f64)>) -> Range<f64> {
        match extent {
            None => 0.0..1.0,
            Some((lo, hi)) if hi > lo => {
                let pad = (hi - lo) * AXIS_PADDING;
                (lo - pad)..(hi + pad)
            }
            Some((v, _)) => {
                let pad = if v == 0.0 { 0.5 } else { v.abs() * AXIS_PADDING };
                (v - pad)..(v + pad)
            }
        }
    }
}

/// Renders chart grids with plotters.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write the figure to `path`; `.svg` selects SVG, anything else PNG.
    pub fn save(grid: &ChartGrid, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);

        if is_svg {
            Self::save_svg(grid, path)
        } else {
            Self::save_png(grid, path)
        }
    }

    pub fn save_png(grid: &ChartGrid, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;
        let root = BitMapBackend::new(path, grid.layout().pixel_size()).into_drawing_area();
        Self::draw_grid(grid, &root)?;
        info!("chart written to {:?}", path);
        Ok(())
    }

    pub fn save_svg(grid: &ChartGrid, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;
        let root = SVGBackend::new(path, grid.layout().pixel_size()).into_drawing_area();
        Self::draw_grid(grid, &root)?;
        info!("chart written to {:?}", path);
        Ok(())
    }

    /// Render the figure as an SVG document in memory.
    pub fn render_svg(grid: &ChartGrid) -> Result<String, ChartError> {
        let mut buffer = String::new();
        {
            let root =
                SVGBackend::with_string(&mut buffer, grid.layout().pixel_size()).into_drawing_area();
            Self::draw_grid(grid, &root)?;
        }
        Ok(buffer)
    }

    /// Draw every surface of `grid` onto `root`.
    pub fn draw_grid<DB: DrawingBackend>(
        grid: &ChartGrid,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE).map_err(render_err)?;

        let areas = root.split_evenly((grid.rows(), grid.columns()));
        for (index, (axes, area)) in grid.axes_list().iter().zip(areas.iter()).enumerate() {
            debug!(
                "rendering surface {} ({} commands)",
                index,
                axes.commands().len()
            );
            Self::draw_surface(axes, area, grid.layout())?;
        }

        root.present().map_err(render_err)?;
        Ok(())
    }

    fn draw_surface<DB: DrawingBackend>(
        axes: &Axes,
        area: &DrawingArea<DB, Shift>,
        layout: &FigureLayout,
    ) -> Result<(), ChartError> {
        let spacing = Spacing::for_layout(layout);
        let bounds = Bounds::of(axes);
        let x_range = bounds.x_range();
        let y_range = bounds.y_range();

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(spacing.margin)
            .x_label_area_size(spacing.x_label_area)
            .y_label_area_size(spacing.y_label_area);
        if let Some(title) = axes.title() {
            builder.caption(title, ("sans-serif", spacing.caption_font));
        }

        let mut chart = builder
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(render_err)?;

        let tick_labels = axes.x_tick_labels().unwrap_or(&[]);
        let format_x = |x: &f64| Self::tick_label(tick_labels, *x);

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().x_labels(MAJOR_TICKS).y_labels(MAJOR_TICKS);
        if !tick_labels.is_empty() {
            mesh.x_label_formatter(&format_x);
        }
        if let Some(text) = axes.xlabel() {
            mesh.x_desc(text);
        }
        if let Some(text) = axes.ylabel() {
            mesh.y_desc(text);
        }
        mesh.draw().map_err(render_err)?;

        // Grid sits beneath the series
        if let Some(style) = axes.grid_style() {
            for line in Self::grid_lines(style, &x_range, &y_range) {
                let stroke = Color::GRID
                    .to_rgba(1.0)
                    .stroke_width(layout.stroke_px(style.linewidth));
                match style.linestyle.dash_pattern() {
                    Some((dash, gap)) => {
                        let px = stroke.stroke_width;
                        chart
                            .draw_series(DashedLineSeries::new(line, dash * px, gap * px, stroke))
                            .map_err(render_err)?;
                    }
                    None => {
                        chart
                            .draw_series(LineSeries::new(line, stroke))
                            .map_err(render_err)?;
                    }
                }
            }
        }

        let line_px = layout.stroke_px(LINE_WIDTH);
        let marker_px = layout.stroke_px(MARKER_HALF) as i32;

        for command in axes.commands() {
            match command {
                DrawCommand::Segment(seg) => {
                    let style = seg
                        .color
                        .to_rgba(1.0)
                        .stroke_width(layout.stroke_px(seg.linewidth));
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            vec![(seg.x, seg.ymin), (seg.x, seg.ymax)],
                            style,
                        )))
                        .map_err(render_err)?;
                }
                DrawCommand::Bars(plot) => {
                    let alpha = plot.alpha;
                    let anno = chart
                        .draw_series(plot.bars.iter().map(|bar| {
                            Rectangle::new(
                                [
                                    (bar.x - BAR_HALF_WIDTH, 0.0),
                                    (bar.x + BAR_HALF_WIDTH, bar.height),
                                ],
                                bar.color.to_rgba(alpha).filled(),
                            )
                        }))
                        .map_err(render_err)?;
                    if let Some(label) = &plot.label {
                        let swatch = plot
                            .bars
                            .first()
                            .map(|bar| bar.color)
                            .unwrap_or(Color::BLACK)
                            .to_rgba(alpha);
                        anno.label(label.as_str()).legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 10, y + 5)], swatch.filled())
                        });
                    }
                }
                DrawCommand::HorizontalRule { y, color } => {
                    let style = color.to_rgba(1.0).stroke_width(line_px);
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            vec![(x_range.start, *y), (x_range.end, *y)],
                            style,
                        )))
                        .map_err(render_err)?;
                }
                DrawCommand::VerticalRule { x, color } => {
                    let style = color.to_rgba(1.0).stroke_width(line_px);
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            vec![(*x, y_range.start), (*x, y_range.end)],
                            style,
                        )))
                        .map_err(render_err)?;
                }
                DrawCommand::Line(plot) => {
                    let style = plot.color.to_rgba(1.0).stroke_width(line_px);
                    for (i, run) in Self::contiguous_runs(&plot.points).into_iter().enumerate() {
                        let anno = chart
                            .draw_series(LineSeries::new(run, style))
                            .map_err(render_err)?;
                        if let (0, Some(label)) = (i, &plot.label) {
                            anno.label(label.as_str()).legend(move |(x, y)| {
                                PathElement::new(vec![(x, y), (x + 20, y)], style)
                            });
                        }
                    }
                }
                DrawCommand::Marker(marker) => {
                    let style = marker.color.to_rgba(marker.alpha).filled();
                    chart
                        .draw_series(std::iter::once(
                            EmptyElement::at((marker.x, marker.y))
                                + Polygon::new(Self::triangle(marker.shape, marker_px), style),
                        ))
                        .map_err(render_err)?;
                }
            }
        }

        if axes.legend_enabled() && !axes.legend_labels().is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_err)?;
        }

        Ok(())
    }

    /// Label of the row at `x`; ticks between rows stay blank.
    fn tick_label(labels: &[String], x: f64) -> String {
        let row = x.round();
        if (x - row).abs() > 1e-6 || row < 0.0 {
            return String::new();
        }
        labels.get(row as usize).cloned().unwrap_or_default()
    }

    /// Triangle vertices in pixel offsets around the marker position.
    fn triangle(shape: MarkerShape, half: i32) -> Vec<(i32, i32)> {
        match shape {
            MarkerShape::TriangleUp => vec![(0, -half), (-half, half), (half, half)],
            MarkerShape::TriangleDown => vec![(0, half), (-half, -half), (half, -half)],
        }
    }

    /// Split a line at missing values. Always yields at least one run.
    fn contiguous_runs(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
        let mut runs: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
        for &(x, y) in points {
            match y.filter(|v| v.is_finite()) {
                Some(y) => {
                    if let Some(run) = runs.last_mut() {
                        run.push((x, y));
                    }
                }
                None => {
                    if runs.last().map(|run| !run.is_empty()).unwrap_or(false) {
                        runs.push(Vec::new());
                    }
                }
            }
        }
        if runs.len() > 1 && runs.last().map(Vec::is_empty).unwrap_or(false) {
            runs.pop();
        }
        runs
    }

    /// Grid line paths, vertical lines first.
    fn grid_lines(
        style: &GridStyle,
        x_range: &Range<f64>,
        y_range: &Range<f64>,
    ) -> Vec<Vec<(f64, f64)>> {
        let mut lines = Vec::new();
        for x in Self::grid_positions(style, x_range) {
            lines.push(vec![(x, y_range.start), (x, y_range.end)]);
        }
        for y in Self::grid_positions(style, y_range) {
            lines.push(vec![(x_range.start, y), (x_range.end, y)]);
        }
        lines
    }

    fn grid_positions(style: &GridStyle, range: &Range<f64>) -> Vec<f64> {
        let major = Self::nice_step(range.end - range.start, MAJOR_TICKS);
        let major_ticks = Self::tick_values(range, major);

        let mut positions = Vec::new();
        if style.which.includes_major() {
            positions.extend(major_ticks.iter().copied());
        }
        if style.which.includes_minor() {
            let minor = major / MINOR_DIVISIONS;
            let tolerance = minor * 1e-6;
            positions.extend(
                Self::tick_values(range, minor)
                    .into_iter()
                    .filter(|v| major_ticks.iter().all(|m| (m - v).abs() > tolerance)),
            );
        }
        positions
    }

    /// Multiples of `step` that fall inside `range`.
    pub fn tick_values(range: &Range<f64>, step: f64) -> Vec<f64> {
        if !(step.is_finite() && step > 0.0) || !(range.end > range.start) {
            return Vec::new();
        }
        let first = (range.start / step).ceil() as i64;
        let last = (range.end / step).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }

    /// Round step size giving roughly `target_steps` ticks over `range`.
    pub fn nice_step(range: f64, target_steps: usize) -> f64 {
        let raw_step = range / target_steps.max(1) as f64;
        let magnitude = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / magnitude;

        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

        nice * magnitude
    }

    fn ensure_parent(path: &Path) -> Result<(), ChartError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

fn render_err<E>(err: DrawingAreaErrorKind<E>) -> ChartError
where
    E: std::error::Error + Send + Sync,
{
    ChartError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::axes::Bar;
    use crate::charts::style::{GridLines, LineStyle};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn nice_steps() {
        assert!(approx(StaticChartRenderer::nice_step(10.0, 8), 2.0));
        assert!(approx(StaticChartRenderer::nice_step(1.0, 8), 0.2));
        assert!(approx(StaticChartRenderer::nice_step(300.0, 8), 50.0));
        assert!(approx(StaticChartRenderer::nice_step(7.0, 8), 1.0));
    }

    #[test]
    fn ticks_stay_inside_range() {
        let ticks = StaticChartRenderer::tick_values(&(-0.3..1.1), 0.5);

        assert_eq!(ticks, vec![0.0, 0.5, 1.0]);
        assert!(StaticChartRenderer::tick_values(&(0.0..1.0), 0.0).is_empty());
    }

    #[test]
    fn empty_surface_uses_unit_ranges() {
        let bounds = Bounds::of(&Axes::new());

        assert_eq!(bounds.x_range(), 0.0..1.0);
        assert_eq!(bounds.y_range(), 0.0..1.0);
    }

    #[test]
    fn bounds_pad_the_data_span() {
        let mut axes = Axes::new();
        axes.vlines(0.0, 9.0, 12.0, Color::BLACK, 1.0);
        axes.vlines(2.0, 10.0, 11.0, Color::BLACK, 1.0);

        let bounds = Bounds::of(&axes);
        let x = bounds.x_range();
        let y = bounds.y_range();

        assert!(approx(x.start, -0.1) && approx(x.end, 2.1));
        assert!(approx(y.start, 8.85) && approx(y.end, 12.15));
    }

    #[test]
    fn bars_include_baseline_and_width() {
        let mut axes = Axes::new();
        axes.bar(
            vec![Bar {
                x: 0.0,
                height: -4.0,
                color: Color::RED,
            }],
            0.5,
            None,
        );

        let bounds = Bounds::of(&axes);

        assert_eq!(bounds.x, Some((-0.4, 0.4)));
        assert_eq!(bounds.y, Some((-4.0, 0.0)));
    }

    #[test]
    fn reference_lines_count_on_their_own_axis_only() {
        let mut axes = Axes::new();
        axes.axhline(50.0, Color::BLACK);

        let bounds = Bounds::of(&axes);

        assert_eq!(bounds.x, None);
        assert_eq!(bounds.y, Some((50.0, 50.0)));
        assert!(approx(bounds.y_range().start, 47.5));
    }

    #[test]
    fn tick_labels_only_on_row_positions() {
        let labels = vec!["2024-01-02".to_string(), "2024-01-03".to_string()];

        assert_eq!(StaticChartRenderer::tick_label(&labels, 1.0), "2024-01-03");
        assert_eq!(StaticChartRenderer::tick_label(&labels, 0.5), "");
        assert_eq!(StaticChartRenderer::tick_label(&labels, -1.0), "");
        assert_eq!(StaticChartRenderer::tick_label(&labels, 2.0), "");
    }

    #[test]
    fn lines_split_at_missing_values() {
        let runs = StaticChartRenderer::contiguous_runs(&[
            (0.0, Some(1.0)),
            (1.0, Some(2.0)),
            (2.0, None),
            (3.0, Some(f64::NAN)),
            (4.0, Some(3.0)),
            (5.0, None),
        ]);

        assert_eq!(runs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 3.0)]]);
        assert_eq!(StaticChartRenderer::contiguous_runs(&[]), vec![Vec::new()]);
    }

    #[test]
    fn minor_grid_skips_major_positions() {
        let style = GridStyle {
            which: GridLines::Minor,
            linestyle: LineStyle::Dotted,
            linewidth: 0.5,
        };

        let minor = StaticChartRenderer::grid_positions(&style, &(0.0..8.0));

        // major step 1.0, minor step 0.2
        assert!(minor.iter().all(|v| (v - v.round()).abs() > 1e-9));
        assert_eq!(minor.len(), 32);
    }

    #[test]
    fn major_grid_lines_cover_both_axes() {
        let lines =
            StaticChartRenderer::grid_lines(&GridStyle::default(), &(0.0..8.0), &(0.0..16.0));

        // x: 0..=8 step 1, y: 0..=16 step 2
        assert_eq!(lines.len(), 9 + 9);
        assert_eq!(lines[0], vec![(0.0, 0.0), (0.0, 16.0)]);
        assert_eq!(lines[9], vec![(0.0, 0.0), (8.0, 0.0)]);
    }
}
