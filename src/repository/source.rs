//! Bootstrap record sources.
//!
//! A source hands the store rows of positional string fields once, at
//! startup. The CSV implementation reads the file named in `data.books_csv`.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::ReaderBuilder;

use crate::error::StoreResult;

/// Provider of positional rows used to populate the store
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    /// Read every row, in source order
    fn rows(&self) -> StoreResult<Vec<Vec<String>>>;
}

/// CSV file on local disk
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    has_headers: bool,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>, has_headers: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            has_headers,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvSource {
    fn rows(&self) -> StoreResult<Vec<Vec<String>>> {
        let file = File::open(&self.path)?;
        read_rows(file, self.has_headers)
    }
}

/// Parse CSV data into rows of owned fields.
///
/// Rows may have differing field counts; column checks happen when the
/// rows are mapped onto records.
pub fn read_rows<R: Read>(reader: R, has_headers: bool) -> StoreResult<Vec<Vec<String>>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
