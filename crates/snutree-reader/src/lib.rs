//! Snutree Record Readers
//!
//! Reads member directories into ordered key/value [`Row`]s that a
//! [`Schema`](snutree_core::schema::Schema) can turn into members.
//!
//! Two formats are supported:
//! - **CSV**: a header record followed by one record per member
//! - **TOML**: a `members` array of tables
//!
//! # Example
//!
//! ```
//! # use snutree_reader::{Format, read_rows};
//! let source = "name,big_name,pledge_semester\nAnn,,Fall 2000\n";
//! let rows = read_rows(source, Format::Csv).unwrap();
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0]["name"], "Ann");
//! ```

mod csv;
mod error;
mod table;

pub use snutree_core::schema::Row;

pub use error::ReadError;

use std::path::Path;

use log::debug;

/// Supported directory formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Toml,
}

impl Format {
    /// Picks a format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::UnsupportedFormat`] for any extension other than
    /// `csv` or `toml`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Ok(Format::Csv),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ReadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads all rows from `source` in the given format.
///
/// # Errors
///
/// Returns [`ReadError`] for syntax errors and malformed records.
pub fn read_rows(source: &str, format: Format) -> Result<Vec<Row>, ReadError> {
    let rows = match format {
        Format::Csv => csv::read(source)?,
        Format::Toml => table::read(source)?,
    };
    debug!(format:?, rows = rows.len(); "Read rows");
    Ok(rows)
}
