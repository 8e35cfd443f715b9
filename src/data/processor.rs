//! Data Processor Module
//! Column presence checks and numeric extraction from polars frames.

use polars::prelude::*;

/// Reads plot-ready values out of a `DataFrame`.
pub struct DataProcessor;

impl DataProcessor {
    /// Whether `df` has a column named exactly `name`.
    pub fn has_column(df: &DataFrame, name: &str) -> bool {
        df.get_column_index(name).is_some()
    }

    /// First of `required` that `df` does not have.
    pub fn first_missing<'a>(df: &DataFrame, required: &[&'a str]) -> Option<&'a str> {
        required
            .iter()
            .copied()
            .find(|name| !Self::has_column(df, name))
    }

    /// Cast a column to Float64 and collect it row by row; nulls stay `None`.
    pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let column = df.column(name)?;
        let values_f64 = column.cast(&DataType::Float64)?;
        let values_ca = values_f64.f64()?;

        Ok(values_ca.into_iter().collect())
    }

    /// Column values as display strings; nulls stay `None`.
    pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
        let column = df.column(name)?.cast(&DataType::String)?;
        let text = column.as_materialized_series().str()?;

        Ok(text.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// X position of every row. Rows are placed at their position in the frame.
    pub fn row_positions(df: &DataFrame) -> Vec<f64> {
        (0..df.height()).map(|i| i as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_columns_are_cast() {
        let df = df!("Volume" => [10i64, -3, 0]).unwrap();

        let values = DataProcessor::numeric_values(&df, "Volume").unwrap();

        assert_eq!(values, vec![Some(10.0), Some(-3.0), Some(0.0)]);
    }

    #[test]
    fn nulls_are_kept_as_none() {
        let df = DataFrame::new(vec![Column::new(
            "Close".into(),
            [Some(1.5), None, Some(2.5)],
        )])
        .unwrap();

        let values = DataProcessor::numeric_values(&df, "Close").unwrap();

        assert_eq!(values, vec![Some(1.5), None, Some(2.5)]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let df = df!("Close" => [1.0]).unwrap();

        assert!(DataProcessor::numeric_values(&df, "Open").is_err());
    }

    #[test]
    fn reports_first_missing_column() {
        let df = df!("Open" => [1.0], "Close" => [1.0]).unwrap();

        assert_eq!(
            DataProcessor::first_missing(&df, &["Open", "High", "Low", "Close"]),
            Some("High")
        );
        assert_eq!(DataProcessor::first_missing(&df, &["Close"]), None);
    }

    #[test]
    fn text_values_render_any_dtype() {
        let df = df!(
            "Date" => ["2024-01-02", "2024-01-03"],
            "Bar" => [7i64, 8],
        )
        .unwrap();

        assert_eq!(
            DataProcessor::text_values(&df, "Date").unwrap(),
            vec![Some("2024-01-02".to_string()), Some("2024-01-03".to_string())]
        );
        assert_eq!(
            DataProcessor::text_values(&df, "Bar").unwrap(),
            vec![Some("7".to_string()), Some("8".to_string())]
        );
    }

    #[test]
    fn rows_are_placed_by_position() {
        let df = df!("Close" => [1.0, 2.0, 3.0]).unwrap();

        assert_eq!(DataProcessor::row_positions(&df), vec![0.0, 1.0, 2.0]);
    }
}
