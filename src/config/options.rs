// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Store options.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the section whose options bind without a prefix.
pub const GENERAL_SECTION: &str = "GENERAL";

/// Options controlling naming, protection and write-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Leading character marking an option as protected.
    pub protect_marker: char,

    /// Section whose options bind under their bare name.
    pub default_section: String,

    /// Joins the lowercased section name and the option name.
    pub separator: String,

    /// Directory relative paths resolve against (working directory if unset).
    pub base_dir: Option<PathBuf>,

    /// Whether defaults for missing options are seeded into the save file.
    pub write_defaults: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            protect_marker: '_',
            default_section: GENERAL_SECTION.to_string(),
            separator: "_".to_string(),
            base_dir: None,
            write_defaults: true,
        }
    }
}

impl StoreOptions {
    /// Whether an option name carries the protection marker.
    pub fn is_protected(&self, option: &str) -> bool {
        option.starts_with(self.protect_marker)
    }

    /// Option name with a single leading protection marker removed.
    pub fn strip_marker<'a>(&self, option: &'a str) -> &'a str {
        option.strip_prefix(self.protect_marker).unwrap_or(option)
    }

    /// Name under which an option's value is bound.
    pub fn bound_name(&self, section: &str, option: &str) -> String {
        let name = self.strip_marker(option);
        if section == self.default_section {
            name.to_string()
        } else {
            format!("{}{}{}", section.to_lowercase(), self.separator, name)
        }
    }
}
