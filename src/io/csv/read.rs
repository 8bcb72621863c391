//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};

/// A delimited-text table with every cell kept as raw text.
///
/// Cells are not typed here: each consumer declares its own column types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl TextTable {
    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate rows as (column name, cell) pairs.
    pub fn records(&self) -> impl Iterator<Item = impl Iterator<Item = (&str, Option<&str>)>> {
        self.rows.iter().map(|row| {
            self.columns.iter().zip(row.iter())
                .map(|(name, cell)| (name.as_str(), cell.as_deref()))
        })
    }

    fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = df.get_column_names().iter().map(|name| name.to_string()).collect::<Vec<_>>();
        let cells = df.get_columns().iter()
            .map(|column| Ok(column.str()
                .with_context(|| format!("[io::csv::read] Column {:?} was not read as text", column.name()))?
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect::<Vec<_>>()))
            .collect::<Result<Vec<_>>>()?;

        let rows = (0..df.height())
            .map(|i| cells.iter().map(|column| column[i].clone()).collect())
            .collect();

        Ok(Self { columns, rows })
    }
}

/// Reads a comma-separated file with a header row, keeping every column as text.
pub(crate) fn read_csv_text(path: &Path) -> Result<TextTable> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))?;
    TextTable::from_dataframe(&df)
}

/// Reads CSV text from a string, keeping every column as text.
pub(crate) fn read_csv_text_string(csv: &str) -> Result<TextTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes()))
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")?;
    TextTable::from_dataframe(&df)
}
