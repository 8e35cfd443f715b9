// Candle bodies, wicks and the doji tick.

use candle_grid::charts::{
    Segment, DOJI_COLOR, DOJI_EPSILON, DOJI_WIDTH, DOWN_COLOR, UP_COLOR, WICK_COLOR,
};
use candle_grid::{ChartGrid, DrawCommand, PlotOptions};
use polars::prelude::*;

fn segments(grid: &ChartGrid, ax: usize) -> Vec<Segment> {
    grid.axes(ax)
        .unwrap()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Segment(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn three_candle_scenario() {
    let mut prices = df!(
        "Open" => [10.0, 11.0, 10.5],
        "High" => [12.0, 11.5, 10.5],
        "Low" => [9.0, 10.0, 10.5],
        "Close" => [11.0, 10.5, 10.5],
    )
    .unwrap();

    let mut grid = ChartGrid::new(1, 1).unwrap();
    grid.plot(&mut prices, &PlotOptions::default()).unwrap();

    let segs = segments(&grid, 0);
    assert_eq!(segs.len(), 6);

    // row 0: wick then up body
    assert_eq!((segs[0].x, segs[0].ymin, segs[0].ymax), (0.0, 9.0, 12.0));
    assert_eq!(segs[0].color, WICK_COLOR);
    assert_eq!((segs[1].ymin, segs[1].ymax, segs[1].color), (10.0, 11.0, UP_COLOR));

    // row 1: down body spans close..open
    assert_eq!((segs[2].x, segs[2].ymin, segs[2].ymax), (1.0, 10.0, 11.5));
    assert_eq!((segs[3].ymin, segs[3].ymax, segs[3].color), (10.5, 11.0, DOWN_COLOR));

    // row 2: doji tick
    assert_eq!(segs[5].x, 2.0);
    assert_eq!(segs[5].ymin, 10.5);
    assert_eq!(segs[5].ymax, 10.5 + DOJI_EPSILON);
    assert!(segs[5].ymax > segs[5].ymin);
    assert_eq!(segs[5].color, DOJI_COLOR);
    assert_eq!(segs[5].linewidth, DOJI_WIDTH);
}

#[test]
fn every_row_gets_exactly_one_body() {
    let mut prices = df!(
        "open" => [1.0, 2.0, 3.0, 4.0, 5.0],
        "high" => [3.0, 3.0, 3.0, 5.0, 6.0],
        "low" => [0.5, 1.0, 2.0, 3.0, 4.0],
        "close" => [2.0, 1.5, 3.0, 4.5, 4.0],
    )
    .unwrap();

    let mut grid = ChartGrid::new(1, 1).unwrap();
    grid.plot(&mut prices, &PlotOptions::default()).unwrap();

    let bodies: Vec<_> = segments(&grid, 0)
        .into_iter()
        .filter(|s| s.linewidth > 1.0)
        .map(|s| s.color)
        .collect();

    assert_eq!(
        bodies,
        vec![UP_COLOR, DOWN_COLOR, DOJI_COLOR, UP_COLOR, DOWN_COLOR]
    );
}

#[test]
fn alias_columns_are_renamed_in_place() {
    let mut prices = df!("O" => [1.0], "H" => [2.0], "L" => [0.5], "C" => [1.5]).unwrap();

    let mut grid = ChartGrid::new(1, 1).unwrap();
    grid.plot(&mut prices, &PlotOptions::default()).unwrap();

    let names: Vec<String> = prices
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["Open", "High", "Low", "Close"]);
}

#[test]
fn rows_with_nulls_are_skipped() {
    let mut prices = DataFrame::new(vec![
        Column::new("Open".into(), [Some(1.0), None, Some(2.0)]),
        Column::new("High".into(), [Some(2.0), Some(2.0), Some(3.0)]),
        Column::new("Low".into(), [Some(0.5), Some(0.5), Some(1.0)]),
        Column::new("Close".into(), [Some(1.5), Some(1.0), Some(1.0)]),
    ])
    .unwrap();

    let mut grid = ChartGrid::new(1, 1).unwrap();
    grid.plot(&mut prices, &PlotOptions::default()).unwrap();

    let xs: Vec<f64> = segments(&grid, 0).iter().map(|s| s.x).collect();
    assert_eq!(xs, vec![0.0, 0.0, 2.0, 2.0]);
}

#[test]
fn multi_surface_grid_targets_requested_axes() {
    let mut prices = df!(
        "Open" => [1.0],
        "High" => [2.0],
        "Low" => [0.5],
        "Close" => [1.5],
    )
    .unwrap();

    let mut grid = ChartGrid::new(2, 2).unwrap();
    grid.plot(&mut prices, &PlotOptions::default().on_axes(3)).unwrap();

    assert!(grid.axes(0).unwrap().is_empty());
    assert_eq!(segments(&grid, 3).len(), 2);
}
