//! CSV Data Loader Module
//! Reads the province and case feeds into polars DataFrames and enforces
//! the column contract of each feed.

use crate::data::TextEncoding;
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Columns the province feed must carry.
pub const PROVINCE_COLUMNS: [&str; 8] = [
    "province_name",
    "island",
    "population",
    "population_kmsquare",
    "confirmed",
    "deceased",
    "released",
    "capital_city",
];

/// Columns the daily case feed must carry.
pub const CASE_COLUMNS: [&str; 7] = [
    "date",
    "acc_confirmed",
    "new_confirmed",
    "new_released",
    "new_deceased",
    "new_tested",
    "being_checked",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("{} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("column '{column}' has values that are not {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },
}

/// Reads delimited files with a fixed text encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataLoader {
    encoding: TextEncoding,
}

impl DataLoader {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    /// Load the province feed.
    pub fn load_provinces(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        self.load_table(path, &PROVINCE_COLUMNS)
    }

    /// Load the daily case feed.
    pub fn load_cases(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        self.load_table(path, &CASE_COLUMNS)
    }

    /// Read a CSV file and check that every `required` column is present.
    /// Extra columns are kept and ignored downstream.
    pub fn load_table(&self, path: &Path, required: &[&str]) -> Result<DataFrame, LoaderError> {
        let raw = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "read input file");

        let df = self.parse_bytes(raw)?;
        Self::check_columns(&df, required, path)?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded table"
        );
        Ok(df)
    }

    /// Parse CSV bytes in this loader's encoding.
    pub fn parse_bytes(&self, raw: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let (bytes, csv_encoding) = self.encoding.prepare(raw);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_parse_options(CsvParseOptions::default().with_encoding(csv_encoding))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        Ok(df)
    }

    fn check_columns(df: &DataFrame, required: &[&str], path: &Path) -> Result<(), LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = required
            .iter()
            .filter(|name| !present.iter().any(|p| p == *name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoaderError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_case_feed() {
        let file = write_csv(
            b"date,acc_confirmed,new_confirmed,new_released,new_deceased,new_tested,being_checked\n\
              2020-03-02,2,2,0,0,0,0\n\
              2020-03-03,2,0,0,0,10,5\n",
        );
        let df = DataLoader::new(TextEncoding::Utf8)
            .load_cases(file.path())
            .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DataLoader::default()
            .load_cases(Path::new("/nonexistent/cases.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn missing_columns_are_reported_by_name() {
        let file = write_csv(b"date,acc_confirmed\n2020-03-02,2\n");
        let err = DataLoader::new(TextEncoding::Utf8)
            .load_cases(file.path())
            .unwrap_err();
        match err {
            LoaderError::MissingColumns { columns, .. } => {
                assert_eq!(columns.len(), 5);
                assert!(columns.contains(&"being_checked".to_string()));
                assert!(!columns.contains(&"date".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn windows_1252_names_are_decoded() {
        let mut bytes = b"province_name,island\n".to_vec();
        bytes.extend_from_slice(&[0xA0]);
        bytes.extend_from_slice(b"Aceh,Sumatera\n");
        let df = DataLoader::new(TextEncoding::Windows1252)
            .parse_bytes(bytes)
            .unwrap();
        let names = df.column("province_name").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("\u{00A0}Aceh"));
    }

    #[test]
    fn extra_columns_are_kept() {
        let file = write_csv(
            b"province_id,date,acc_confirmed,new_confirmed,new_released,new_deceased,new_tested,being_checked\n\
              1,2020-03-02,2,2,0,0,0,0\n",
        );
        let df = DataLoader::new(TextEncoding::Utf8)
            .load_cases(file.path())
            .unwrap();
        assert_eq!(df.width(), 8);
    }
}
