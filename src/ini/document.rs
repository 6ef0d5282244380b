// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Ordered, case-insensitive-key INI document.

use crate::error::IniError;

use super::parser;

/// Name of the section whose entries act as fallbacks for every section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A named section with its entries in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Section name as written in its header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries of this section only, without `[DEFAULT]` fallbacks.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the section holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn append(&mut self, key: &str, line: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1.push('\n');
            entry.1.push_str(line);
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        self.entries.len() != before
    }
}

/// An INI document built from zero or more sources.
///
/// Option keys are normalized to lowercase on every access; section names
/// are case-sensitive. Reading further sources into an existing document
/// merges them, later values winning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    defaults: IniSection,
    sections: Vec<IniSection>,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IniDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            defaults: IniSection::new(DEFAULT_SECTION),
            sections: Vec::new(),
        }
    }

    /// Parse a document from a string.
    ///
    /// Valid lines are kept even when others fail; see [`IniDocument::read_str`].
    pub fn parse(content: &str) -> Result<Self, IniError> {
        let mut doc = Self::new();
        doc.read_str(content)?;
        Ok(doc)
    }

    /// Merge INI text into this document.
    ///
    /// Malformed lines are reported together in [`IniError::Parsing`], but
    /// every well-formed line is applied regardless.
    pub fn read_str(&mut self, content: &str) -> Result<(), IniError> {
        parser::parse_into(self, content)
    }

    /// Whether the document has no sections and no defaults.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.defaults.is_empty()
    }

    /// Whether a named section exists. Always false for `DEFAULT`.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    /// Add a section if it does not exist yet. Returns whether it was added.
    pub fn add_section(&mut self, name: &str) -> bool {
        if name == DEFAULT_SECTION || self.has_section(name) {
            return false;
        }
        self.sections.push(IniSection::new(name));
        true
    }

    /// Remove a whole section. Returns whether it existed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    /// Section names in order of first appearance, excluding `DEFAULT`.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Borrow a section (including `DEFAULT`) without fallbacks applied.
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        if name == DEFAULT_SECTION {
            return Some(&self.defaults);
        }
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut IniSection> {
        if name == DEFAULT_SECTION {
            return Some(&mut self.defaults);
        }
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// All entries visible from a section: `DEFAULT` entries first, then the
    /// section's own, with the section overriding.
    pub fn items(&self, section: &str) -> Result<Vec<(&str, &str)>, IniError> {
        let own = self.section(section).ok_or_else(|| IniError::NoSection {
            section: section.to_string(),
        })?;

        let mut items: Vec<(&str, &str)> = self.defaults.entries().collect();
        if section != DEFAULT_SECTION {
            for (key, value) in own.entries() {
                match items.iter_mut().find(|(k, _)| *k == key) {
                    Some(item) => item.1 = value,
                    None => items.push((key, value)),
                }
            }
        }
        Ok(items)
    }

    /// Option names visible from a section, `DEFAULT` fallbacks included.
    pub fn options(&self, section: &str) -> Result<Vec<&str>, IniError> {
        Ok(self.items(section)?.into_iter().map(|(k, _)| k).collect())
    }

    /// Look up an option, falling back to `DEFAULT`.
    pub fn get(&self, section: &str, option: &str) -> Result<&str, IniError> {
        let key = option.to_lowercase();
        let own = self.section(section).ok_or_else(|| IniError::NoSection {
            section: section.to_string(),
        })?;

        own.get(&key)
            .or_else(|| self.defaults.get(&key))
            .ok_or_else(|| IniError::NoOption {
                section: section.to_string(),
                option: key,
            })
    }

    /// Whether an option is visible from a section.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.get(section, option).is_ok()
    }

    /// Set an option in an existing section.
    pub fn set(
        &mut self,
        section: &str,
        option: &str,
        value: impl Into<String>,
    ) -> Result<(), IniError> {
        let target = self.section_mut(section).ok_or_else(|| IniError::NoSection {
            section: section.to_string(),
        })?;
        target.set(option.to_lowercase(), value.into());
        Ok(())
    }

    /// Remove an option from a section. Returns whether it was present.
    pub fn remove_option(&mut self, section: &str, option: &str) -> bool {
        let key = option.to_lowercase();
        self.section_mut(section)
            .map(|s| s.remove(&key))
            .unwrap_or(false)
    }

    /// Set an option, creating its section first when needed.
    pub fn insert(&mut self, section: &str, option: &str, value: impl Into<String>) {
        self.add_section(section);
        if let Some(target) = self.section_mut(section) {
            target.set(option.to_lowercase(), value.into());
        }
    }

    pub(super) fn append_line(&mut self, section: &str, key: &str, line: &str) {
        if let Some(target) = self.section_mut(section) {
            target.append(key, line);
        }
    }

    /// Serialize the document.
    ///
    /// `DEFAULT` comes first when non-empty; every section is followed by a
    /// blank line and multi-line values continue on tab-indented lines.
    pub fn write_string(&self) -> String {
        let mut out = String::new();
        if !self.defaults.is_empty() {
            write_section(&mut out, &self.defaults);
        }
        for section in &self.sections {
            write_section(&mut out, section);
        }
        out
    }
}

fn write_section(out: &mut String, section: &IniSection) {
    out.push_str(&format!("[{}]\n", section.name));
    for (key, value) in section.entries() {
        out.push_str(&format!("{} = {}\n", key, value.replace('\n', "\n\t")));
    }
    out.push('\n');
}
