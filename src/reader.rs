//! Reading CSV files into typed records.
//!
//! A [`CsvReader`] runs one pipeline (validate the configuration, shape the
//! target type, locate the resource, parse the rows, decode each record)
//! and surfaces it under three failure-handling policies:
//!
//! | entry point       | on failure                                  |
//! |-------------------|---------------------------------------------|
//! | [`CsvReader::read`]        | generic error carrying a message   |
//! | [`CsvReader::read_or_none`]| `None`, never an error             |
//! | [`CsvReader::read_strict`] | a [`CsvError`] variant to branch on|
//!
//! All three policies agree on *whether* a given input fails. Each entry
//! point also has an asynchronous sibling that hands the identical pipeline
//! to the blocking-I/O pool and returns an awaitable, abortable handle.

use std::path::PathBuf;

use log::debug;
use tokio::task::JoinHandle;

use crate::config::Configuration;
use crate::error::CsvError;
use crate::io::codec::{self, RowDefect};
use crate::io::locate::{EmbeddedAssets, Locator};
use crate::record::{CsvRecord, InvalidRecord, Record, shape_of};

/// Selects one page of records: 1-based page number, records per page.
///
/// An invalid selection (page number below 1, or size below 2) is ignored
/// and the whole file is returned; a page past the end yields an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: usize,
}

impl Page {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    fn is_valid(&self) -> bool {
        self.number > 0 && self.size > 1
    }

    fn slice<T>(&self, records: Vec<T>) -> Vec<T> {
        if !self.is_valid() {
            return records;
        }
        records
            .into_iter()
            .skip((self.number - 1) * self.size)
            .take(self.size)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 2)
    }
}

/// Reads CSV files into typed records.
///
/// The reader resolves configurations against embedded assets first, then
/// against the filesystem under its base directory (the current directory
/// unless [`rooted`](CsvReader::rooted) elsewhere).
///
/// ```no_run
/// use typed_csv_rs::{Configuration, CsvReader, csv_record};
///
/// csv_record! {
///     #[derive(Debug)]
///     struct Account {
///         name: String,
///         balance: i64,
///         active: bool,
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let reader = CsvReader::new();
/// let accounts: Vec<Account> = reader.read(&Configuration::new("accounts"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvReader {
    locator: Locator,
}

impl CsvReader {
    /// A reader rooted at the current directory.
    pub fn new() -> Self {
        Self {
            locator: Locator::current(),
        }
    }

    /// A reader rooted at the given base directory.
    pub fn rooted(base: impl Into<PathBuf>) -> Self {
        Self {
            locator: Locator::new(base.into()),
        }
    }

    /// Registers embedded assets, looked up before the filesystem.
    pub fn with_assets(mut self, assets: EmbeddedAssets) -> Self {
        self.locator = self.locator.with_assets(assets);
        self
    }

    /// Returns the file's records as `T`, or fails with a message-carrying
    /// error when the configuration is invalid, the type is not eligible,
    /// the file doesn't exist, or a row doesn't match the type.
    pub fn read<T: CsvRecord + 'static>(&self, config: &Configuration) -> anyhow::Result<Vec<T>> {
        Ok(self.pipeline(config, None)?)
    }

    /// Returns the file's records as `T`, or `None` on any failure.
    pub fn read_or_none<T: CsvRecord + 'static>(&self, config: &Configuration) -> Option<Vec<T>> {
        self.pipeline(config, None).ok()
    }

    /// Returns the file's records as `T`, or the precise [`CsvError`]
    /// variant describing the failure.
    pub fn read_strict<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
    ) -> Result<Vec<T>, CsvError> {
        self.pipeline(config, None)
    }

    /// Like [`read`](CsvReader::read), restricted to one page of records.
    pub fn read_page<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        page: Page,
    ) -> anyhow::Result<Vec<T>> {
        Ok(self.pipeline(config, Some(page))?)
    }

    /// Like [`read_or_none`](CsvReader::read_or_none), restricted to one
    /// page of records.
    pub fn read_page_or_none<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        page: Page,
    ) -> Option<Vec<T>> {
        self.pipeline(config, Some(page)).ok()
    }

    /// Like [`read_strict`](CsvReader::read_strict), restricted to one page
    /// of records.
    pub fn read_page_strict<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        page: Page,
    ) -> Result<Vec<T>, CsvError> {
        self.pipeline(config, Some(page))
    }

    /// Returns the file's records untyped, one [`Record`] per data row.
    pub fn read_records(&self, config: &Configuration) -> anyhow::Result<Vec<Record>> {
        if !config.has_file() {
            return Err(CsvError::InvalidProperty("file").into());
        }
        Ok(self.fetch(config)?)
    }

    /// Runs [`read`](CsvReader::read) on the blocking-I/O pool and returns
    /// an awaitable handle.
    ///
    /// Aborting the handle before the pipeline starts discards the work;
    /// aborting during the blocking stage is best-effort, and awaiting an
    /// aborted handle reports cancellation rather than completion. Must be
    /// called within a Tokio runtime.
    pub fn read_async<T>(&self, config: Configuration) -> JoinHandle<anyhow::Result<Vec<T>>>
    where
        T: CsvRecord + Send + 'static,
    {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read(&config))
    }

    /// Runs [`read_or_none`](CsvReader::read_or_none) on the blocking-I/O
    /// pool and returns an awaitable handle.
    pub fn read_or_none_async<T>(&self, config: Configuration) -> JoinHandle<Option<Vec<T>>>
    where
        T: CsvRecord + Send + 'static,
    {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read_or_none(&config))
    }

    /// Runs [`read_strict`](CsvReader::read_strict) on the blocking-I/O pool
    /// and returns an awaitable handle.
    pub fn read_strict_async<T>(&self, config: Configuration) -> JoinHandle<Result<Vec<T>, CsvError>>
    where
        T: CsvRecord + Send + 'static,
    {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read_strict(&config))
    }

    /// The shared pipeline: validate, shape, locate, parse, decode.
    fn pipeline<T: CsvRecord + 'static>(
        &self,
        config: &Configuration,
        page: Option<Page>,
    ) -> Result<Vec<T>, CsvError> {
        if !config.has_file() {
            return Err(CsvError::InvalidProperty("file"));
        }
        let shape = shape_of::<T>()?;
        let mut records = self.fetch(config)?;
        if let Some(page) = page {
            records = page.slice(records);
        }
        records.iter().map(|record| shape.decode(record)).collect()
    }

    fn fetch(&self, config: &Configuration) -> Result<Vec<Record>, CsvError> {
        let relative = config.relative_path();
        let target = self
            .locator
            .locate(config)
            .ok_or_else(|| CsvError::FileNotFound(relative.clone()))?;
        debug!("reading {relative}");
        let source = target.open()?;
        let mut fallback = |defect: RowDefect| -> Result<Option<Record>, CsvError> {
            match defect.kind {
                InvalidRecord::BlankColumnName => Err(CsvError::MalformedHeader(relative.clone())),
                InvalidRecord::NoFields => Err(CsvError::InvalidConfig(format!(
                    "row at line {} of `{relative}` has no fields",
                    defect.line
                ))),
            }
        };
        let records = codec::parse(source, config.delimiter(), &mut fallback)?;
        if records.is_empty() {
            return Err(CsvError::EmptyFile(relative));
        }
        Ok(records)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}
