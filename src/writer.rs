//! Writing typed records into CSV files.
//!
//! A [`CsvWriter`] runs one pipeline (validate the configuration and batch,
//! shape the record type, resolve or create the destination, encode the
//! rows, persist) under the same three failure-handling policies as the
//! reader, each with a synchronous and an asynchronous form.

use std::path::PathBuf;

use log::debug;
use tokio::task::JoinHandle;

use crate::config::Configuration;
use crate::error::CsvError;
use crate::io::codec;
use crate::io::locate::{EmbeddedAssets, Locator};
use crate::record::{CsvRecord, shape_of};

/// One batch of records to persist: the header, the rows, and the write
/// mode.
///
/// The header is **required** and must not be empty; duplicate column names
/// are dropped, keeping the first occurrence. `overwrite` is `true` by
/// default; [`append`](WriteBatch::append) switches it off.
#[derive(Debug, Clone)]
pub struct WriteBatch<T> {
    header: Vec<String>,
    rows: Vec<T>,
    overwrite: bool,
}

impl<T> WriteBatch<T> {
    pub fn new(header: impl IntoIterator<Item = impl Into<String>>, rows: Vec<T>) -> Self {
        let mut seen: Vec<String> = Vec::new();
        for column in header {
            let column = column.into();
            if !seen.contains(&column) {
                seen.push(column);
            }
        }
        Self {
            header: seen,
            rows,
            overwrite: true,
        }
    }

    /// Appends to the existing file content instead of replacing it; the
    /// header row is then omitted.
    pub fn append(mut self) -> Self {
        self.overwrite = false;
        self
    }

    pub(crate) fn header(&self) -> &[String] {
        &self.header
    }

    pub(crate) fn rows(&self) -> &[T] {
        &self.rows
    }

    pub(crate) fn overwrites(&self) -> bool {
        self.overwrite
    }
}

/// Writes typed records into CSV files under a base directory.
///
/// ```no_run
/// use typed_csv_rs::{Configuration, CsvWriter, WriteBatch, csv_record};
///
/// csv_record! {
///     #[derive(Debug)]
///     struct Account {
///         name: String,
///         balance: i64,
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let writer = CsvWriter::new();
/// let batch = WriteBatch::new(
///     ["name", "balance"],
///     vec![Account { name: "main".into(), balance: 12 }],
/// );
/// writer.write(&Configuration::new("accounts"), &batch)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvWriter {
    locator: Locator,
}

impl CsvWriter {
    /// A writer rooted at the current directory.
    pub fn new() -> Self {
        Self {
            locator: Locator::current(),
        }
    }

    /// A writer rooted at the given base directory.
    pub fn rooted(base: impl Into<PathBuf>) -> Self {
        Self {
            locator: Locator::new(base.into()),
        }
    }

    /// Registers embedded assets; an asset path can never be written, so
    /// they only influence read-side resolution of sibling readers. Kept for
    /// constructor symmetry.
    pub fn with_assets(mut self, assets: EmbeddedAssets) -> Self {
        self.locator = self.locator.with_assets(assets);
        self
    }

    /// Writes the batch, or fails with a message-carrying error when the
    /// configuration is invalid, the header is empty, or the type is not
    /// eligible. An empty batch still produces a file holding the header.
    pub fn write<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        batch: &WriteBatch<T>,
    ) -> anyhow::Result<()> {
        Ok(self.pipeline(config, batch, false)?)
    }

    /// Writes the batch, or returns `None` on any failure.
    pub fn write_or_none<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        batch: &WriteBatch<T>,
    ) -> Option<()> {
        self.pipeline(config, batch, false).ok()
    }

    /// Writes the batch, or fails with the precise [`CsvError`] variant.
    /// Unlike the other modes, an empty batch is rejected here.
    pub fn write_strict<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        batch: &WriteBatch<T>,
    ) -> Result<(), CsvError> {
        self.pipeline(config, batch, true)
    }

    /// Runs [`write`](CsvWriter::write) on the blocking-I/O pool and returns
    /// an awaitable handle.
    ///
    /// Aborting the handle before the pipeline starts discards the work;
    /// aborting during the blocking stage is best-effort, and awaiting an
    /// aborted handle reports cancellation, never a silent half-write
    /// mistaken for completion. Must be called within a Tokio runtime.
    pub fn write_async<T>(
        &self,
        config: Configuration,
        batch: WriteBatch<T>,
    ) -> JoinHandle<anyhow::Result<()>>
    where
        T: CsvRecord + Send + 'static,
    {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.write(&config, &batch))
    }

    /// Runs [`write_or_none`](CsvWriter::write_or_none) on the blocking-I/O
    /// pool and returns an awaitable handle.
    pub fn write_or_none_async<T>(
        &self,
        config: Configuration,
        batch: WriteBatch<T>,
    ) -> JoinHandle<Option<()>>
    where
        T: CsvRecord + Send + 'static,
    {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.write_or_none(&config, &batch))
    }

    /// Runs [`write_strict`](CsvWriter::write_strict) on the blocking-I/O
    /// pool and returns an awaitable handle.
    pub fn write_strict_async<T>(
        &self,
        config: Configuration,
        batch: WriteBatch<T>,
    ) -> JoinHandle<Result<(), CsvError>>
    where
        T: CsvRecord + Send + 'static,
    {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.write_strict(&config, &batch))
    }

    /// The shared pipeline: validate, shape, resolve, encode, persist.
    fn pipeline<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        batch: &WriteBatch<T>,
        strict: bool,
    ) -> Result<(), CsvError> {
        if !config.has_file() {
            return Err(CsvError::InvalidProperty("file"));
        }
        if batch.header().is_empty() {
            return Err(CsvError::InvalidProperty("header"));
        }
        if strict && batch.rows().is_empty() {
            return Err(CsvError::InvalidConfig("rows are not defined".to_owned()));
        }
        let shape = shape_of::<T>()?;
        let (path, created) = self.locator.resolve_or_create(config)?;
        // A freshly created folder has nothing to append to.
        let overwrite = batch.overwrites() || created;
        let rows: Vec<Vec<String>> = batch.rows().iter().map(|row| shape.encode(row)).collect();
        codec::write(&path, batch.header(), rows, config.delimiter(), overwrite)?;
        debug!(
            "wrote {} records to {}",
            batch.rows().len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
