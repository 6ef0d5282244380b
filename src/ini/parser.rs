// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Line-oriented INI parser.

use crate::error::IniError;
use lazy_static::lazy_static;
use regex::Regex;

use super::document::IniDocument;

lazy_static! {
    /// Section header, e.g. `[GENERAL]`.
    static ref SECTION_REGEX: Regex = Regex::new(r"^\[(?P<header>.+)\]").unwrap();

    /// Option line; the first `=` or `:` splits key from value.
    static ref OPTION_REGEX: Regex =
        Regex::new(r"^(?P<option>.*?)\s*(?P<delimiter>[=:])\s*(?P<value>.*)$").unwrap();
}

/// Parse `content` into `doc`, merging with whatever it already holds.
pub(super) fn parse_into(doc: &mut IniDocument, content: &str) -> Result<(), IniError> {
    let mut errors = Vec::new();
    let mut section: Option<String> = None;
    let mut option: Option<String> = None;
    let mut indent_level = 0;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            option = None;
            continue;
        }

        let indent = line.len() - line.trim_start().len();

        // Continuation of the previous value, even if it looks like a comment
        if let (Some(current), Some(key)) = (&section, &option) {
            if indent > indent_level {
                doc.append_line(current, key, trimmed);
                continue;
            }
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        indent_level = indent;

        if let Some(captures) = SECTION_REGEX.captures(trimmed) {
            let name = captures["header"].to_string();
            doc.add_section(&name);
            section = Some(name);
            option = None;
            continue;
        }

        let Some(current) = &section else {
            errors.push((index + 1, line.to_string()));
            continue;
        };

        match OPTION_REGEX.captures(trimmed) {
            Some(captures) => {
                let key = captures["option"].trim().to_lowercase();
                if key.is_empty() {
                    errors.push((index + 1, line.to_string()));
                    option = None;
                    continue;
                }
                doc.insert(current, &key, captures["value"].trim());
                option = Some(key);
            }
            None => {
                errors.push((index + 1, line.to_string()));
                option = None;
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(IniError::Parsing { lines: errors })
    }
}
