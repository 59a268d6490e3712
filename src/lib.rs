#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Typed CSV for Rust

 A toolkit for reading and writing CSV files as typed records. Declare a
 plain struct, and move whole files in and out of `Vec`s of it, with the
 failure-handling policy of your choice.

 ## Core Concepts

 - **Record:** one decoded data row, an ordered mapping from non-blank
   column name to nullable cell text.
 - **[`CsvRecord`]:** the capability a target type supplies: field order
   and kinds, a constructor, per-field accessors. Derived from a struct
   declaration by [`csv_record!`].
 - **Configuration:** an immutable value targeting one file: name (the
   `.csv` extension is appended for you), optional folder, separator.
 - **Reader / Writer:** engines running a fixed pipeline (validate, shape
   the type, locate the resource, decode or encode rows) under three
   failure-handling policies, each with a synchronous and an asynchronous
   form.

 ## Failure-handling policies

 | policy   | reader                        | writer                   |
 |----------|-------------------------------|--------------------------|
 | throwing | [`read_csv`]                  | [`write_csv`]            |
 | nullable | [`read_csv_or_none`]          | [`write_csv_or_none`]    |
 | strict   | [`read_csv_strict`]           | [`write_csv_strict`]     |

 The throwing policy fails with a generic, message-carrying error; the
 nullable policy collapses every failure to `None`; the strict policy fails
 with a [`CsvError`] variant callers can branch on. All three agree on
 whether a given input fails.

 ## Getting Started

```rust
use std::env::temp_dir;
use typed_csv_rs::{csv_record, Configuration, CsvReader, CsvWriter, WriteBatch};

csv_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Account {
        name: String,
        balance: i64,
        active: bool,
    }
}

fn main() -> anyhow::Result<()> {
    let config = Configuration::new("accounts");
    let accounts = vec![
        Account { name: "main".into(), balance: 250, active: true },
        Account { name: "savings".into(), balance: -40, active: false },
    ];

    let writer = CsvWriter::rooted(temp_dir());
    writer.write(&config, &WriteBatch::new(["name", "balance", "active"], accounts.clone()))?;

    let reader = CsvReader::rooted(temp_dir());
    let loaded: Vec<Account> = reader.read(&config)?;
    assert_eq!(loaded, accounts);

    Ok(())
}
```

 ## Asynchronous forms

 Every operation has an `_async` sibling that hands the identical pipeline
 to Tokio's blocking-I/O pool and returns a [`tokio::task::JoinHandle`]:
 awaitable, and abortable before the blocking stage starts. Awaiting an
 aborted handle reports cancellation, so a cancelled write is never mistaken
 for a completed one.

 ## Embedded assets

 Readers resolve a configuration against an [`EmbeddedAssets`] registry
 before touching the filesystem, so data compiled into the binary with
 `include_bytes!` and files under the base directory are read through the
 same API.

 ## License

 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Configuration for targeting a CSV file.
pub mod config;

/// Error types for CSV operations.
pub mod error;

mod io;

/// Reading CSV files into typed records.
pub mod reader;

/// Record model and the `CsvRecord` capability.
pub mod record;

/// Writing typed records into CSV files.
pub mod writer;

#[doc(inline)]
pub use config::{Configuration, Separator};
#[doc(inline)]
pub use error::CsvError;
pub use io::locate::EmbeddedAssets;
#[doc(inline)]
pub use reader::{CsvReader, Page};
#[doc(inline)]
pub use record::{
    CsvField, CsvRecord, FieldKind, FieldSpec, FieldValue, InvalidRecord, Record, RecordShape,
};
#[doc(inline)]
pub use writer::{CsvWriter, WriteBatch};

use tokio::task::JoinHandle;

/// Returns the file's records as `T` according to the given configuration,
/// resolved from the current directory, or fails when:
/// - the type `T` is not eligible for CSV mapping
/// - the configuration is invalid
/// - the targeted file doesn't exist or doesn't contain a record.
pub fn read_csv<T: CsvRecord + 'static>(config: &Configuration) -> anyhow::Result<Vec<T>> {
    CsvReader::new().read(config)
}

/// Returns the file's records as `T` according to the given configuration,
/// resolved from the current directory, or `None` on any failure.
pub fn read_csv_or_none<T: CsvRecord + 'static>(config: &Configuration) -> Option<Vec<T>> {
    CsvReader::new().read_or_none(config)
}

/// Returns the file's records as `T` according to the given configuration,
/// resolved from the current directory, or the precise [`CsvError`] variant
/// describing the failure.
pub fn read_csv_strict<T: CsvRecord + 'static>(
    config: &Configuration,
) -> Result<Vec<T>, CsvError> {
    CsvReader::new().read_strict(config)
}

/// Reads the file's records as `T` **asynchronously** on the blocking-I/O
/// pool; same contract as [`read_csv`]. Must be called within a Tokio
/// runtime.
pub fn read_csv_async<T: CsvRecord + Send + 'static>(
    config: Configuration,
) -> JoinHandle<anyhow::Result<Vec<T>>> {
    CsvReader::new().read_async(config)
}

/// Reads the file's records as `T` **asynchronously** on the blocking-I/O
/// pool; same contract as [`read_csv_or_none`]. Must be called within a
/// Tokio runtime.
pub fn read_csv_or_none_async<T: CsvRecord + Send + 'static>(
    config: Configuration,
) -> JoinHandle<Option<Vec<T>>> {
    CsvReader::new().read_or_none_async(config)
}

/// Reads the file's records as `T` **asynchronously** on the blocking-I/O
/// pool; same contract as [`read_csv_strict`]. Must be called within a
/// Tokio runtime.
pub fn read_csv_strict_async<T: CsvRecord + Send + 'static>(
    config: Configuration,
) -> JoinHandle<Result<Vec<T>, CsvError>> {
    CsvReader::new().read_strict_async(config)
}

/// Writes the batch according to the given configuration, resolved from the
/// current directory, or fails when:
/// - the type `T` is not eligible for CSV mapping
/// - the configuration is invalid or the header is empty.
pub fn write_csv<T: CsvRecord + 'static>(
    config: &Configuration,
    batch: &WriteBatch<T>,
) -> anyhow::Result<()> {
    CsvWriter::new().write(config, batch)
}

/// Writes the batch according to the given configuration, resolved from the
/// current directory, or returns `None` on any failure.
pub fn write_csv_or_none<T: CsvRecord + 'static>(
    config: &Configuration,
    batch: &WriteBatch<T>,
) -> Option<()> {
    CsvWriter::new().write_or_none(config, batch)
}

/// Writes the batch according to the given configuration, resolved from the
/// current directory, or fails with the precise [`CsvError`] variant; an
/// empty batch is rejected in this mode.
pub fn write_csv_strict<T: CsvRecord + 'static>(
    config: &Configuration,
    batch: &WriteBatch<T>,
) -> Result<(), CsvError> {
    CsvWriter::new().write_strict(config, batch)
}

/// Writes the batch **asynchronously** on the blocking-I/O pool; same
/// contract as [`write_csv`]. Must be called within a Tokio runtime.
pub fn write_csv_async<T: CsvRecord + Send + 'static>(
    config: Configuration,
    batch: WriteBatch<T>,
) -> JoinHandle<anyhow::Result<()>> {
    CsvWriter::new().write_async(config, batch)
}

/// Writes the batch **asynchronously** on the blocking-I/O pool; same
/// contract as [`write_csv_or_none`]. Must be called within a Tokio runtime.
pub fn write_csv_or_none_async<T: CsvRecord + Send + 'static>(
    config: Configuration,
    batch: WriteBatch<T>,
) -> JoinHandle<Option<()>> {
    CsvWriter::new().write_or_none_async(config, batch)
}

/// Writes the batch **asynchronously** on the blocking-I/O pool; same
/// contract as [`write_csv_strict`]. Must be called within a Tokio runtime.
pub fn write_csv_strict_async<T: CsvRecord + Send + 'static>(
    config: Configuration,
    batch: WriteBatch<T>,
) -> JoinHandle<Result<(), CsvError>> {
    CsvWriter::new().write_strict_async(config, batch)
}
