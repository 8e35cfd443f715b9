//! Column Normalization Module
//! Renames the accepted spellings of price/volume columns to their canonical names.

use polars::prelude::*;
use tracing::debug;

/// Canonical column names and the spellings accepted for each, in rename order.
///
/// Matching is case-insensitive and exact. The canonical name is always accepted
/// as well, so an already-normalized frame matches itself.
pub const COLUMN_ALIASES: [(&str, &[&str]); 7] = [
    ("Open", &["OPEN", "O"]),
    ("High", &["HIGH", "H"]),
    ("Low", &["LOW", "L"]),
    ("Close", &["CLOSE", "C"]),
    ("Signal", &["SIGNAL", "S"]),
    ("Price", &["PRICE", "TRADE PRICE", "P"]),
    ("Volume", &["VOLUME", "V"]),
];

/// Canonical name for a column spelling, if it is one of the recognized aliases.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let upper = name.to_uppercase();
    COLUMN_ALIASES
        .iter()
        .find(|(canonical, aliases)| {
            canonical.to_uppercase() == upper || aliases.iter().any(|a| *a == upper)
        })
        .map(|(canonical, _)| *canonical)
}

/// Rename recognized columns of `df` in place.
///
/// For each canonical key the first matching column wins. A key whose canonical
/// name is already present is left alone, so applying this twice equals applying
/// it once and no duplicate names are produced.
pub fn normalize_columns(df: &mut DataFrame) -> PolarsResult<()> {
    for (canonical, _) in COLUMN_ALIASES.iter() {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if names.iter().any(|n| n == canonical) {
            continue;
        }

        let Some(source) = names
            .iter()
            .find(|n| canonical_name(n) == Some(*canonical))
        else {
            continue;
        };

        debug!("renaming column {:?} to {:?}", source, canonical);
        df.rename(source, (*canonical).into())?;
    }

    Ok(())
}
