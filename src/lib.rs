// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! easyfig - Typed, Persistent INI Settings
//!
//! Declare a schema of sections and typed defaults, point a store at one or
//! more INI files, and read back type-cast values.
//!
//! # Features
//!
//! - **Default Seeding**: Missing options are written to the save file on first run
//! - **Multi-file Precedence**: Later files override earlier ones; only the last is written
//! - **Typed Values**: Integers, floats, booleans, strings, and JSON lists, maps and tuples
//! - **Protected Options**: `_`-prefixed options are only editable by hand
//! - **Extension Hook**: Load sections the schema does not model
//!
//! # Example
//!
//! ```no_run
//! use easyfig::{ConfigStore, Schema};
//!
//! let schema = Schema::new()
//!     .section("GENERAL", |s| s.option("count", 1).option("_locked", 0))
//!     .section("NETWORK", |s| s.option("hosts", vec!["localhost"]));
//!
//! // Read site.ini then user.ini; save to user.ini
//! let mut store = ConfigStore::new(schema, vec!["site.ini", "user.ini"]).unwrap();
//!
//! if let Some(count) = store.settings().int("count") {
//!     println!("count = {}", count);
//! }
//!
//! store.set("count", 7).unwrap();
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod ini;
pub mod store;

// Re-exports for convenience
pub use config::{FileSet, OptionKind, OptionSpec, Schema, SchemaSection, StoreOptions, Value};
pub use error::{EasyfigError, Result};
pub use ini::IniDocument;
pub use store::{ConfigStore, NoExtraSections, SectionLoader, SetOutcome, SetRejection, Settings};
