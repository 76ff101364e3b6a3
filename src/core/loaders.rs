//! Station CSV loading.
//!
//! This module reads a `;`-delimited broadcast station export into an
//! in-memory table:
//! - column names are trimmed and uppercased immediately after parsing, so
//!   downstream lookups are case-insensitive to source variation
//! - rows whose field count does not match the header are skipped (lenient
//!   parse policy)
//! - rows are stably sorted in ascending order by the numeric value of the
//!   `FREQUENCY` column

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::info;
use thiserror::Error;

use crate::config::CsvConfig;

/// Errors that can occur during station CSV loading.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("Missing column: {name}")]
    MissingColumn { name: String },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// In-memory station table with uppercased column names.
#[derive(Debug, Clone)]
pub struct StationTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl StationTable {
    fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            headers,
            index,
            rows,
        }
    }

    /// Returns the uppercased column headers in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of data rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a column, if present.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Iterates over row views in table order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |fields| Row {
            table: self,
            fields,
        })
    }

    /// Stably sorts rows in ascending order by the numeric value of `column`.
    ///
    /// Unparseable values sort after all numeric ones, keeping their relative
    /// order.
    fn sort_by_numeric(&mut self, column: &str) -> Result<()> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| LoaderError::MissingColumn {
                name: column.to_string(),
            })?;

        self.rows.sort_by(|a, b| {
            let left = sort_key(a.get(idx).map(String::as_str).unwrap_or(""));
            let right = sort_key(b.get(idx).map(String::as_str).unwrap_or(""));
            left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(())
    }
}

/// Numeric sort key for a raw field; unparseable values sort last.
fn sort_key(raw: &str) -> f64 {
    raw.trim().replace(',', ".").parse().unwrap_or(f64::INFINITY)
}

/// Borrowed view of one table row.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a StationTable,
    fields: &'a [String],
}

impl<'a> Row<'a> {
    /// Returns the raw field for a column, if the column exists.
    ///
    /// The value may be blank; use [`Row::value`] when a blank field should
    /// count as missing.
    pub fn raw(&self, column: &str) -> Option<&'a str> {
        self.table
            .column_index(column)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }

    /// Returns the trimmed field for a column when it is present and non-blank.
    pub fn value(&self, column: &str) -> Option<&'a str> {
        self.raw(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Returns the field parsed as f64 when present, non-blank and numeric.
    ///
    /// A comma decimal separator is accepted, matching the export format.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.value(column)
            .and_then(|v| v.replace(',', ".").parse().ok())
    }
}

/// Uppercase and trim a header record.
fn normalize_headers(record: &csv::StringRecord) -> Vec<String> {
    record.iter().map(|h| h.trim().to_uppercase()).collect()
}

/// Read only the column headers of a station CSV.
///
/// Returns the trimmed, uppercased header names in file order. Used for the
/// diagnostic header listing without loading the whole table.
pub fn read_headers<P: AsRef<Path>>(path: P, config: &CsvConfig) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter_byte())
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = normalize_headers(reader.headers()?);
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    Ok(headers)
}

/// Load a station CSV export into a frequency-sorted table.
///
/// Rows with the wrong field count are skipped rather than aborting the
/// load. After parsing, rows are stably sorted in ascending order by the
/// numeric `FREQUENCY` value; a table without a `FREQUENCY` column is a
/// [`LoaderError::MissingColumn`] failure.
///
/// # Arguments
///
/// * `path` - Path to the `;`-delimited station CSV file
/// * `config` - CSV configuration (delimiter)
///
/// # Errors
///
/// Returns an error if the file cannot be read, has no header row, or lacks
/// the `FREQUENCY` column.
pub fn load_station_csv<P: AsRef<Path>>(path: P, config: &CsvConfig) -> Result<StationTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = normalize_headers(reader.headers()?);
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = result?;

        // Lenient parse: drop rows whose field count does not match the header.
        if record.len() != headers.len() {
            skipped += 1;
            continue;
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    if skipped > 0 {
        info!("skipped {} malformed row(s) in {}", skipped, path.display());
    }
    info!("column headers in CSV file: {:?}", headers);

    let mut table = StationTable::new(headers, rows);
    table.sort_by_numeric("FREQUENCY")?;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_headers_are_uppercased() {
        let file = write_csv(&["frequency;Call_Sign;class", "98.5;KABC;B"]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();

        assert_eq!(table.headers(), &["FREQUENCY", "CALL_SIGN", "CLASS"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rows_sorted_by_frequency() {
        let file = write_csv(&[
            "FREQUENCY;CALL_SIGN",
            "104.3;KGHI",
            "88.1;KABC",
            "98.5;KDEF",
        ]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();

        let calls: Vec<&str> = table
            .rows()
            .map(|row| row.raw("CALL_SIGN").unwrap())
            .collect();
        assert_eq!(calls, vec!["KABC", "KDEF", "KGHI"]);
    }

    #[test]
    fn test_comma_decimal_frequency_sorts_numerically() {
        let file = write_csv(&["FREQUENCY;CALL_SIGN", "101,1;KB", "88,6;KA"]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();

        let calls: Vec<&str> = table
            .rows()
            .map(|row| row.raw("CALL_SIGN").unwrap())
            .collect();
        assert_eq!(calls, vec!["KA", "KB"]);
    }

    #[test]
    fn test_unparseable_frequency_sorts_last() {
        let file = write_csv(&["FREQUENCY;CALL_SIGN", "bogus;KX", "88.1;KA"]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();

        let calls: Vec<&str> = table
            .rows()
            .map(|row| row.raw("CALL_SIGN").unwrap())
            .collect();
        assert_eq!(calls, vec!["KA", "KX"]);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let file = write_csv(&[
            "FREQUENCY;CALL_SIGN;CLASS",
            "88.1;KABC;B",
            "98.5;KDEF",
            "104.3;KGHI;A;extra",
            "106.7;KJKL;C",
        ]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();

        assert_eq!(table.len(), 2);
        let calls: Vec<&str> = table
            .rows()
            .map(|row| row.raw("CALL_SIGN").unwrap())
            .collect();
        assert_eq!(calls, vec!["KABC", "KJKL"]);
    }

    #[test]
    fn test_missing_frequency_column() {
        let file = write_csv(&["CALL_SIGN;CLASS", "KABC;B"]);

        let err = load_station_csv(file.path(), &CsvConfig::default()).unwrap_err();

        match err {
            LoaderError::MissingColumn { name } => assert_eq!(name, "FREQUENCY"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let file = write_csv(&[]);

        let err = load_station_csv(file.path(), &CsvConfig::default()).unwrap_err();

        assert!(matches!(err, LoaderError::EmptyFile(_)));
    }

    #[test]
    fn test_read_headers() {
        let file = write_csv(&["frequency;call_sign", "98.5;KABC"]);

        let headers = read_headers(file.path(), &CsvConfig::default()).unwrap();

        assert_eq!(headers, vec!["FREQUENCY", "CALL_SIGN"]);
    }

    #[test]
    fn test_row_accessors() {
        let file = write_csv(&["FREQUENCY;CALL_SIGN;ERPHAV", "98.5;KABC;  "]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();
        let row = table.rows().next().unwrap();

        // Blank fields are present as raw values but count as missing.
        assert_eq!(row.raw("ERPHAV"), Some("  "));
        assert_eq!(row.value("ERPHAV"), None);
        assert_eq!(row.number("ERPHAV"), None);

        assert_eq!(row.raw("MISSING"), None);
        assert_eq!(row.value("CALL_SIGN"), Some("KABC"));
        assert_eq!(row.number("FREQUENCY"), Some(98.5));
    }

    #[test]
    fn test_row_number_accepts_comma_separator() {
        let file = write_csv(&["FREQUENCY;ERPVPK", "98.5;1234,5"]);

        let table = load_station_csv(file.path(), &CsvConfig::default()).unwrap();
        let row = table.rows().next().unwrap();

        assert_eq!(row.number("ERPVPK"), Some(1234.5));
    }
}
