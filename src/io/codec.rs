//! Thin adapter over the row-level `csv` codec: raw rows in, validated
//! [`Record`]s out, and back.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::CsvError;
use crate::record::{InvalidRecord, Record};

/// Defect found in a raw parsed row, reported to the parse fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowDefect {
    pub(crate) line: u64,
    pub(crate) kind: InvalidRecord,
}

/// Decision applied to a defective row: substitute a record, skip it
/// (`Ok(None)`), or abort the whole read.
pub(crate) type RowFallback<'a> = &'a mut dyn FnMut(RowDefect) -> Result<Option<Record>, CsvError>;

/// Parses header and data rows into [`Record`]s.
///
/// Blank lines are skipped by the underlying reader. A row violating the
/// record invariants is handed to `fallback` instead of being silently
/// dropped.
pub(crate) fn parse(
    source: impl Read,
    delimiter: u8,
    fallback: RowFallback,
) -> Result<Vec<Record>, CsvError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(source);
    let header = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|position| position.line()).unwrap_or(0);
        let fields = header
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| {
                let value = (!cell.is_empty()).then(|| cell.to_owned());
                (name.to_owned(), value)
            })
            .collect();
        match Record::new(fields) {
            Ok(record) => records.push(record),
            Err(kind) => {
                if let Some(substitute) = fallback(RowDefect { line, kind })? {
                    records.push(substitute);
                }
            }
        }
    }
    Ok(records)
}

/// Serializes the rows and persists them in one filesystem operation.
///
/// The header is emitted first in overwrite mode and omitted when appending.
/// Every row is padded or truncated to exactly the header's length before
/// serialization.
pub(crate) fn write(
    path: &Path,
    header: &[String],
    rows: Vec<Vec<String>>,
    delimiter: u8,
    overwrite: bool,
) -> Result<(), CsvError> {
    let mut buffer = Vec::new();
    {
        // Scoped so the writer releases its borrow of the buffer.
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(false)
            .from_writer(&mut buffer);
        if overwrite {
            writer.write_record(header)?;
        }
        let width = header.len();
        for row in rows {
            writer.write_record(&sized(row, width))?;
        }
        writer.flush()?;
    }
    if overwrite {
        fs::write(path, buffer)?;
    } else {
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(&buffer)?;
    }
    Ok(())
}

fn sized(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.truncate(width);
    while row.len() < width {
        row.push(String::new());
    }
    row
}
