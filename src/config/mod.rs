// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Schema, options and file handling.
//!
//! This module describes what a store holds (the schema), how it names and
//! protects options (the options) and where it reads and writes (the file
//! set).

pub mod default;
mod loader;
mod options;
mod schema;

pub use default::{default_schema, example_config};
pub use loader::{read_into, read_merged, read_single, save_document, FileSet, DEFAULT_CONFIG_FILE};
pub use options::{StoreOptions, GENERAL_SECTION};
pub use schema::*;
