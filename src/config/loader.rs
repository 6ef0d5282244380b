// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Reading and writing the configuration file set.

use crate::error::{ConfigError, Result};
use crate::ini::IniDocument;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File used when no explicit file set is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// An ordered set of configuration files.
///
/// Later files take precedence when reading; only the last one is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet(Vec<PathBuf>);

impl FileSet {
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest-precedence file, the one saves go to.
    pub fn last(&self) -> Option<&Path> {
        self.0.last().map(PathBuf::as_path)
    }

    /// Resolve relative paths against `base`. Absolute paths are kept.
    pub fn resolve(&self, base: &Path) -> FileSet {
        FileSet(self.0.iter().map(|p| base.join(p)).collect())
    }
}

impl From<&str> for FileSet {
    fn from(path: &str) -> Self {
        FileSet(vec![PathBuf::from(path)])
    }
}

impl From<String> for FileSet {
    fn from(path: String) -> Self {
        FileSet(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for FileSet {
    fn from(path: &Path) -> Self {
        FileSet(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for FileSet {
    fn from(path: PathBuf) -> Self {
        FileSet(vec![path])
    }
}

impl<T: Into<PathBuf>> From<Vec<T>> for FileSet {
    fn from(paths: Vec<T>) -> Self {
        FileSet(paths.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathBuf>, const N: usize> From<[T; N]> for FileSet {
    fn from(paths: [T; N]) -> Self {
        FileSet(paths.into_iter().map(Into::into).collect())
    }
}

/// Merge one file into `doc`.
///
/// Returns whether the file was read. A missing file is not an error;
/// unreadable or malformed files are logged and whatever parsed still applies.
pub fn read_into(doc: &mut IniDocument, path: &Path) -> bool {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Configuration file not found, skipping: {:?}", path);
            return false;
        }
        Err(e) => {
            tracing::warn!("Failed to read configuration file {:?}: {}", path, e);
            return false;
        }
    };

    tracing::debug!("Loading configuration from: {:?}", path);
    if let Err(e) = doc.read_str(&content) {
        tracing::warn!("Malformed configuration file {:?}: {}", path, e);
    }
    true
}

/// Read a single file into a fresh document.
pub fn read_single(path: &Path) -> IniDocument {
    let mut doc = IniDocument::new();
    read_into(&mut doc, path);
    doc
}

/// Read every file in order into one document, later files winning.
pub fn read_merged(paths: &[PathBuf]) -> IniDocument {
    let mut doc = IniDocument::new();
    for path in paths {
        read_into(&mut doc, path);
    }
    doc
}

/// Overwrite `path` with the serialized document.
pub fn save_document(doc: &IniDocument, path: &Path) -> Result<()> {
    tracing::debug!("Saving configuration to: {:?}", path);

    fs::write(path, doc.write_string()).map_err(|e| {
        ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}
