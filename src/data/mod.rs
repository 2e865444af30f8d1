//! Data module - CSV loading, cleanup and typed records

mod cleaner;
mod encoding;
mod loader;
mod records;

pub use cleaner::{CleanError, Cleaner};
pub use encoding::{decode_windows_1252, TextEncoding};
pub use loader::{DataLoader, LoaderError, CASE_COLUMNS, PROVINCE_COLUMNS};
pub use records::{CaseRecord, ProvinceRecord};
