//! Configuration for targeting a CSV file.
//!
//! A [`Configuration`] is an immutable value built fluently and owned by the
//! caller for the duration of a single read or write call. It normalizes the
//! file and folder names so that callers never have to care about the `.csv`
//! extension or the trailing path separator:
//!
//! ```
//! use typed_csv_rs::{Configuration, Separator};
//!
//! let config = Configuration::new("accounts")
//!     .folder("exports")
//!     .separator(Separator::Semicolon);
//!
//! assert_eq!(config.file_name(), "accounts.csv");
//! assert_eq!(config.folder_name(), "exports/");
//! ```

const FILE_SUFFIX: &str = ".csv";
const FOLDER_SUFFIX: char = '/';

/// Field separator used by the targeted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// The `,` character (default).
    #[default]
    Comma,
    /// The `;` character.
    Semicolon,
}

impl Separator {
    pub(crate) const fn as_byte(self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Semicolon => b';',
        }
    }
}

/// Targets a CSV file relative to the reader's or writer's base directory.
///
/// - `file` is **required**. The `.csv` extension is optional and appended
///   when missing; `"my-file.csv"` and `"my-file"` produce the same output.
///   A blank value is ignored.
/// - `folder` is **optional** and empty by default. The `/` suffix is
///   optional and appended when missing; a blank value is ignored.
/// - `separator` is **optional** and set to [`Separator::Comma`] by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    file: String,
    folder: String,
    separator: Separator,
}

impl Configuration {
    /// Creates a configuration targeting the given file.
    pub fn new(file: impl AsRef<str>) -> Self {
        Self {
            file: suffixed_file(file.as_ref()),
            folder: String::new(),
            separator: Separator::default(),
        }
    }

    /// Sets the folder containing the file.
    pub fn folder(mut self, folder: impl AsRef<str>) -> Self {
        let folder = folder.as_ref();
        if !folder.trim().is_empty() {
            self.folder = if folder.ends_with(FOLDER_SUFFIX) {
                folder.to_owned()
            } else {
                format!("{folder}{FOLDER_SUFFIX}")
            };
        }
        self
    }

    /// Sets the file's separator.
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// The normalized file name, `.csv` extension included.
    pub fn file_name(&self) -> &str {
        &self.file
    }

    /// The normalized folder name, trailing `/` included, or an empty string.
    pub fn folder_name(&self) -> &str {
        &self.folder
    }

    pub(crate) fn delimiter(&self) -> u8 {
        self.separator.as_byte()
    }

    /// Path of the file relative to the base directory.
    pub(crate) fn relative_path(&self) -> String {
        format!("{}{}", self.folder, self.file)
    }

    /// Whether the file name is usable: set, and more than the bare
    /// extension.
    pub(crate) fn has_file(&self) -> bool {
        !self.file.is_empty() && self.file != FILE_SUFFIX
    }
}

fn suffixed_file(value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else if value.ends_with(FILE_SUFFIX) {
        value.to_owned()
    } else {
        format!("{value}{FILE_SUFFIX}")
    }
}
