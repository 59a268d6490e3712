//! Resolution of a configuration against the two storage backends: embedded
//! assets compiled into the binary, and the filesystem under a base
//! directory.

use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

use log::debug;

use crate::config::Configuration;
use crate::error::CsvError;

/// Embedded resource namespace: relative paths mapped to bytes compiled into
/// the binary.
///
/// Entries use the same relative paths a [`Configuration`] resolves to, e.g.
/// `"folder/data.csv"`:
///
/// ```
/// use typed_csv_rs::EmbeddedAssets;
///
/// static ASSETS: EmbeddedAssets =
///     EmbeddedAssets::new(&[("folder/data.csv", b"h1,h2\na,b\n")]);
/// ```
///
/// Assets are read-only; writes always target the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedAssets {
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }

    fn get(&self, path: &str) -> Option<&'static [u8]> {
        self.entries
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, bytes)| *bytes)
    }
}

/// Resource handle produced by one resolution and consumed by exactly one
/// read.
pub(crate) enum Target {
    File(PathBuf),
    Stream(&'static [u8]),
}

impl Target {
    pub(crate) fn open(self) -> io::Result<Box<dyn Read>> {
        match self {
            Target::File(path) => Ok(Box::new(File::open(path)?)),
            Target::Stream(bytes) => Ok(Box::new(Cursor::new(bytes))),
        }
    }
}

/// Resolves logical relative paths against embedded assets first, then the
/// filesystem rooted at the base directory.
#[derive(Debug, Clone)]
pub(crate) struct Locator {
    base: PathBuf,
    assets: EmbeddedAssets,
}

impl Locator {
    pub(crate) fn new(base: PathBuf) -> Self {
        Self {
            base,
            assets: EmbeddedAssets::default(),
        }
    }

    /// A locator rooted at the process's current directory.
    pub(crate) fn current() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub(crate) fn with_assets(mut self, assets: EmbeddedAssets) -> Self {
        self.assets = assets;
        self
    }

    /// Finds a readable target for the configuration, embedded assets first.
    pub(crate) fn locate(&self, config: &Configuration) -> Option<Target> {
        let relative = config.relative_path();
        if let Some(bytes) = self.assets.get(&relative) {
            return Some(Target::Stream(bytes));
        }
        let path = self.base.join(&relative);
        path.is_file().then_some(Target::File(path))
    }

    /// Resolves the write destination, creating the configured folder when
    /// missing.
    ///
    /// Only the one directory level named by the configuration is created,
    /// never an ancestor chain. Returns the destination path and whether the
    /// folder was created on this resolution; a freshly created folder has
    /// nothing to append to, so the caller forces overwrite mode. Resolving
    /// twice without a write in between neither errors nor re-creates the
    /// folder.
    pub(crate) fn resolve_or_create(
        &self,
        config: &Configuration,
    ) -> Result<(PathBuf, bool), CsvError> {
        let path = self.base.join(config.relative_path());
        if path.is_file() {
            return Ok((path, false));
        }
        let folder = config.folder_name();
        let mut created = false;
        if !folder.is_empty() {
            let dir = self.base.join(folder);
            if !dir.exists() {
                fs::create_dir(&dir)?;
                debug!("created folder {}", dir.display());
                created = true;
            }
        }
        Ok((path, created))
    }
}
