// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! INI document model.
//!
//! A small, lenient implementation of the classic INI dialect: bracketed
//! section headers, `key = value` or `key : value` lines, `#`/`;` comments,
//! indented continuation lines and a `[DEFAULT]` fallback section.

mod document;
mod parser;

pub use document::{IniDocument, IniSection, DEFAULT_SECTION};
