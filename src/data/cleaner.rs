//! Province table cleanup.
//!
//! The upstream province feed prefixes every name with a one-character
//! marker and ends with a national total row. Both are removed here.

use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

const NAME_COLUMN: &str = "province_name";
const ISLAND_COLUMN: &str = "island";

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("province table needs at least 2 rows, found {rows}")]
    TooFewRows { rows: usize },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

pub struct Cleaner;

impl Cleaner {
    /// Strip the name marker and drop the trailing total row.
    ///
    /// The last row is dropped unconditionally. If it carries an island it
    /// looks like a real province, which is logged but not treated as fatal.
    pub fn clean_provinces(df: &DataFrame) -> Result<DataFrame, CleanError> {
        let height = df.height();
        if height < 2 {
            return Err(CleanError::TooFewRows { rows: height });
        }

        Self::inspect_footer(&df.slice((height - 1) as i64, 1));

        let mut body = df.slice(0, height - 1);
        let names = body.column(NAME_COLUMN)?.cast(&DataType::String)?;
        let stripped: Vec<Option<String>> = names
            .str()?
            .into_iter()
            .map(|name| name.map(|n| Self::strip_marker(n).to_string()))
            .collect();
        body.with_column(Column::new(NAME_COLUMN.into(), stripped))?;

        debug!(rows_in = height, rows_out = body.height(), "cleaned province table");
        Ok(body)
    }

    /// Remove exactly one leading character.
    pub fn strip_marker(name: &str) -> &str {
        let mut chars = name.chars();
        chars.next();
        chars.as_str()
    }

    fn inspect_footer(footer: &DataFrame) {
        let island = footer
            .column(ISLAND_COLUMN)
            .ok()
            .and_then(|col| col.get(0).ok())
            .filter(|value| !value.is_null())
            .map(|value| value.to_string().trim_matches('"').to_string());

        if let Some(island) = island {
            let name = footer
                .column(NAME_COLUMN)
                .ok()
                .and_then(|col| col.get(0).ok())
                .map(|value| value.to_string().trim_matches('"').to_string())
                .unwrap_or_default();
            warn!(
                footer_name = %name,
                footer_island = %island,
                "dropped trailing row has an island; source may have no total row"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        df!(
            "province_name" => [Some("xAceh"), Some("xBali"), None, Some("xIndonesia")],
            "island" => [Some("Sumatera"), Some("Nusa Tenggara"), Some("Jawa"), None],
            "population" => [5i64, 4, 3, 12]
        )
        .unwrap()
    }

    #[test]
    fn drops_exactly_one_row() {
        let cleaned = Cleaner::clean_provinces(&raw_frame()).unwrap();
        assert_eq!(cleaned.height(), 3);
        let pops: Vec<Option<i64>> = cleaned
            .column("population")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(pops, vec![Some(5), Some(4), Some(3)]);
    }

    #[test]
    fn strips_one_leading_character() {
        let cleaned = Cleaner::clean_provinces(&raw_frame()).unwrap();
        let names: Vec<Option<&str>> = cleaned
            .column("province_name")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec![Some("Aceh"), Some("Bali"), None]);
    }

    #[test]
    fn strip_marker_counts_chars_not_bytes() {
        assert_eq!(Cleaner::strip_marker("\u{00A0}Jawa Timur"), "Jawa Timur");
        assert_eq!(Cleaner::strip_marker("\u{FFFD}Papua"), "Papua");
        assert_eq!(Cleaner::strip_marker(""), "");
    }

    #[test]
    fn single_row_table_is_rejected() {
        let df = df!("province_name" => ["xAceh"], "island" => ["Sumatera"]).unwrap();
        let err = Cleaner::clean_provinces(&df).unwrap_err();
        assert!(matches!(err, CleanError::TooFewRows { rows: 1 }));
    }

    #[test]
    fn real_province_footer_is_still_dropped() {
        let df = df!(
            "province_name" => ["xAceh", "xBali"],
            "island" => ["Sumatera", "Nusa Tenggara"]
        )
        .unwrap();
        let cleaned = Cleaner::clean_provinces(&df).unwrap();
        assert_eq!(cleaned.height(), 1);
    }
}
