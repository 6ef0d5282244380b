// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for easyfig.
//!
//! Missing or malformed configuration entries are recovered inside the store
//! and never surface here. What does surface: invalid schemas, an empty file
//! set, filesystem failures while saving, and misses from raw lookups.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for easyfig operations.
#[derive(Error, Debug)]
pub enum EasyfigError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // INI document errors
    #[error("INI error: {0}")]
    Ini(#[from] IniError),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No configuration files given")]
    NoFiles,

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Errors raised by the INI document model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IniError {
    #[error("No section: '{section}'")]
    NoSection { section: String },

    #[error("No option '{option}' in section: '{section}'")]
    NoOption { section: String, option: String },

    #[error("File contains parsing errors: {}", format_lines(.lines))]
    Parsing { lines: Vec<(usize, String)> },
}

fn format_lines(lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(number, content)| format!("[line {}]: {:?}", number, content))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for easyfig operations.
pub type Result<T> = std::result::Result<T, EasyfigError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EasyfigError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
