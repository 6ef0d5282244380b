// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Extension point for sections the schema does not model.

use crate::ini::IniDocument;

/// Called at the end of every load with the merged read document.
///
/// Implement this to pick up sections that need custom handling, e.g. a
/// `[PLUGINS]` section whose keys are not known ahead of time.
pub trait SectionLoader {
    fn load_additional_sections(&mut self, parser: &IniDocument) {
        let _ = parser;
    }
}

/// The default hook: loads nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtraSections;

impl SectionLoader for NoExtraSections {}
