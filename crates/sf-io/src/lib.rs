#![forbid(unsafe_code)]

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use sf_diag::DiagHandle;
use sf_frame::{Column, DataFrame, FrameError};
use sf_series::StringSeries;
use sf_types::DType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("processing csv input: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// CSV ingestion. Produces an all-string frame through the frame's public
/// construction and setter contract; nothing here touches frame internals.
#[derive(Debug, Clone)]
pub struct CsvReader {
    headers_present: bool,
    diag: DiagHandle,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CsvReader {
    #[must_use]
    pub fn new(headers_present: bool) -> Self {
        Self {
            headers_present,
            diag: DiagHandle::default(),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diag: DiagHandle) -> Self {
        self.diag = diag;
        self
    }

    /// Parse rows of text into a frame where every column is string-typed.
    ///
    /// Column names come from the header row when one is declared present,
    /// or are synthesized as `Column <index>` (zero-based) otherwise. Zero
    /// input rows yield an empty frame with no columns. Rows with unequal
    /// field counts fail; columns are never silently misaligned.
    pub fn read<R: Read>(&self, input: R) -> Result<DataFrame, IoError> {
        // Header handling is done here so the no-header case keeps row 0
        // as data; the csv reader itself runs headerless.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(input);

        let mut rows: Vec<StringRecord> = Vec::new();
        for record in reader.records() {
            rows.push(record.map_err(|err| {
                self.diag.error(&format!("reading data rows: {err}"));
                err
            })?);
        }

        if rows.is_empty() {
            return Ok(DataFrame::with_diagnostics([], self.diag.clone())?);
        }

        let names: Vec<String> = if self.headers_present {
            rows[0].iter().map(str::to_owned).collect()
        } else {
            (0..rows[0].len()).map(|i| format!("Column {i}")).collect()
        };
        let data = if self.headers_present {
            &rows[1..]
        } else {
            &rows[..]
        };

        let columns = names.iter().cloned().map(Column::string);
        let mut frame = DataFrame::with_diagnostics(columns, self.diag.clone())?;

        for (idx, name) in names.iter().enumerate() {
            let values: Vec<String> = data
                .iter()
                .map(|row| row.get(idx).unwrap_or_default().to_owned())
                .collect();
            frame = frame.set_string_column(name, StringSeries::from_values(values))?;
        }

        Ok(frame)
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<DataFrame, IoError> {
        let file = std::fs::File::open(path)?;
        self.read(file)
    }
}

/// Render a frame back to CSV text: a header row of name-ordered columns,
/// then one record per row ordinal. Ragged columns shorter than the frame's
/// row count contribute empty cells.
pub fn write_csv_string(frame: &DataFrame) -> Result<String, IoError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    let columns = frame.columns();
    writer.write_record(columns.iter().map(Column::name))?;

    let rendered = rendered_columns(frame, &columns)?;
    for row in 0..frame.row_count() {
        let record = rendered
            .iter()
            .map(|cells| cells.get(row).cloned().unwrap_or_default());
        writer.write_record(record)?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn rendered_columns(frame: &DataFrame, columns: &[Column]) -> Result<Vec<Vec<String>>, IoError> {
    columns
        .iter()
        .map(|column| {
            let cells = match column.dtype() {
                DType::String => frame.string_column(column.name())?.values().to_vec(),
                DType::Int => frame
                    .int_column(column.name())?
                    .values()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                DType::Float => frame
                    .float_column(column.name())?
                    .values()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            };
            Ok(cells)
        })
        .collect()
}
