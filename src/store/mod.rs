// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The configuration store.
//!
//! A store keeps two independent INI documents: the *read* document merges
//! every file in the set (later files winning), the *write* document holds
//! only the last file and is what gets saved. Every load re-reads both,
//! casts each schema option to its kind and swaps in the new [`Settings`].

mod cast;
mod hook;
mod settings;

pub use cast::{bind, cast};
pub use hook::{NoExtraSections, SectionLoader};
pub use settings::Settings;

use crate::config::{self, FileSet, Schema, StoreOptions, Value, DEFAULT_CONFIG_FILE};
use crate::error::{ConfigError, Result, ResultExt};
use crate::ini::IniDocument;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a [`ConfigStore::set`] call was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRejection {
    /// The option carries the protection marker.
    Protected,
    /// The section is not present in any file, even after reloading.
    UnknownSection,
    /// The section exists but does not hold the option.
    UnknownOption,
}

impl fmt::Display for SetRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SetRejection::Protected => "option is protected",
            SetRejection::UnknownSection => "unknown section",
            SetRejection::UnknownOption => "unknown option",
        };
        f.write_str(text)
    }
}

/// Result of a [`ConfigStore::set`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value was stored, saved and reloaded; holds its serialized form.
    Stored(String),
    /// Nothing was changed.
    Rejected(SetRejection),
}

impl SetOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, SetOutcome::Stored(_))
    }

    /// The serialized value, if stored.
    pub fn value(&self) -> Option<&str> {
        match self {
            SetOutcome::Stored(value) => Some(value),
            SetOutcome::Rejected(_) => None,
        }
    }
}

/// Typed settings backed by one or more INI files.
#[derive(Debug)]
pub struct ConfigStore<H: SectionLoader = NoExtraSections> {
    schema: Schema,
    options: StoreOptions,
    files: FileSet,
    save_path: PathBuf,
    reader: IniDocument,
    writer: IniDocument,
    settings: Settings,
    hook: H,
}

impl ConfigStore<NoExtraSections> {
    /// Open a store over one file or an ordered list of files.
    pub fn new(schema: Schema, files: impl Into<FileSet>) -> Result<Self> {
        Self::with_options(schema, files, StoreOptions::default(), NoExtraSections)
    }

    /// Open a store over `config.ini` in the working directory.
    pub fn open_default(schema: Schema) -> Result<Self> {
        Self::new(schema, DEFAULT_CONFIG_FILE)
    }
}

impl<H: SectionLoader> ConfigStore<H> {
    /// Open a store that calls `hook` at the end of every load.
    pub fn with_hook(schema: Schema, files: impl Into<FileSet>, hook: H) -> Result<Self> {
        Self::with_options(schema, files, StoreOptions::default(), hook)
    }

    /// Open a store with explicit options.
    pub fn with_options(
        schema: Schema,
        files: impl Into<FileSet>,
        options: StoreOptions,
        hook: H,
    ) -> Result<Self> {
        schema.validate(&options)?;

        let base = match &options.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to resolve working directory")?,
        };
        let files = files.into().resolve(&base);
        let save_path = files.last().ok_or(ConfigError::NoFiles)?.to_path_buf();

        let mut store = Self {
            schema,
            options,
            files,
            save_path,
            reader: IniDocument::new(),
            writer: IniDocument::new(),
            settings: Settings::default(),
            hook,
        };
        store.load()?;
        Ok(store)
    }

    /// Re-read every file, re-cast every option and save the write file.
    pub fn load(&mut self) -> Result<()> {
        self.writer = config::read_single(&self.save_path);
        self.reader = config::read_merged(self.files.paths());

        let mut settings = Settings::default();
        for section in self.schema.sections() {
            for spec in section.options() {
                let protected = self.options.is_protected(spec.name());
                let varname = self.options.bound_name(section.name(), spec.name());

                // Only the protected entry may define this name
                if protected {
                    let stripped = self.options.strip_marker(spec.name());
                    self.reader.remove_option(section.name(), stripped);
                    self.writer.remove_option(section.name(), stripped);
                }

                let raw = lookup(
                    &self.reader,
                    &mut self.writer,
                    section.name(),
                    spec.name(),
                    spec.default_value(),
                    !protected && self.options.write_defaults,
                );
                let value = cast::bind(&varname, &raw, spec.default_value());
                settings.insert(varname, value);
            }
        }
        self.settings = settings;

        self.save()?;
        self.hook.load_additional_sections(&self.reader);
        Ok(())
    }

    /// Read `key` from `section`, falling back to `default`.
    ///
    /// A miss is logged and, unless the key is protected, the default is
    /// seeded into the write document so the next save persists it.
    pub fn get(&mut self, key: &str, section: &str, default: impl Into<Value>) -> String {
        let default = default.into();
        let write_back = !self.options.is_protected(key) && self.options.write_defaults;
        lookup(&self.reader, &mut self.writer, section, key, &default, write_back)
    }

    /// Set an option in the default section.
    pub fn set(&mut self, option: &str, value: impl Into<Value>) -> Result<SetOutcome> {
        let section = self.options.default_section.clone();
        self.set_in(&section, option, value)
    }

    /// Set an existing, unprotected option, then save and reload.
    ///
    /// Refusals are reported as [`SetOutcome::Rejected`]; only I/O failures
    /// while saving are errors.
    pub fn set_in(
        &mut self,
        section: &str,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<SetOutcome> {
        if self.options.is_protected(option) || self.shadows_protected(section, option) {
            tracing::warn!("Refusing to set protected option {} in section {}", option, section);
            return Ok(SetOutcome::Rejected(SetRejection::Protected));
        }

        if !self.reader.has_section(section) {
            // The file may have been created since the last load
            self.load()?;
            if !self.reader.has_section(section) {
                tracing::warn!("Cannot set {}: no section {}", option, section);
                return Ok(SetOutcome::Rejected(SetRejection::UnknownSection));
            }
        }

        if !self.reader.has_option(section, option) {
            tracing::warn!("Cannot set {}: not present in section {}", option, section);
            return Ok(SetOutcome::Rejected(SetRejection::UnknownOption));
        }

        let serialized = set_internal(&mut self.writer, section, option, &value.into());
        self.save()?;
        self.load()?;

        tracing::debug!("Set {} in section {} to {}", option, section, serialized);
        Ok(SetOutcome::Stored(serialized))
    }

    /// The value of `option` as written in the merged files, without
    /// falling back to defaults or seeding anything.
    pub fn raw(&self, section: &str, option: &str) -> Result<&str> {
        Ok(self.reader.get(section, option)?)
    }

    /// Overwrite the last file with the write document.
    pub fn save(&self) -> Result<()> {
        config::save_document(&self.writer, &self.save_path)
    }

    /// `key : value` lines for every unprotected option visible in `section`.
    pub fn section_string(&self, section: &str) -> String {
        match self.reader.items(section) {
            Ok(items) => items
                .into_iter()
                .filter(|(key, _)| !self.options.is_protected(key))
                .map(|(key, value)| format!("{} : {}\n", key, value))
                .collect(),
            Err(_) => String::new(),
        }
    }

    /// The bound values.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Resolved file paths in precedence order.
    pub fn files(&self) -> &[PathBuf] {
        self.files.paths()
    }

    /// The file saves go to.
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// The merged read document.
    pub fn reader(&self) -> &IniDocument {
        &self.reader
    }

    /// The write document, as it will be saved.
    pub fn writer(&self) -> &IniDocument {
        &self.writer
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Whether `option` is the unmarked name of a protected schema option in
    /// `section`. Such a name can still resolve through `[DEFAULT]`.
    fn shadows_protected(&self, section: &str, option: &str) -> bool {
        let option = option.to_lowercase();
        self.schema
            .sections()
            .iter()
            .filter(|s| s.name() == section)
            .flat_map(|s| s.options())
            .any(|spec| {
                self.options.is_protected(spec.name())
                    && self.options.strip_marker(spec.name()).to_lowercase() == option
            })
    }
}

impl<H: SectionLoader> fmt::Display for ConfigStore<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.section_string(&self.options.default_section))
    }
}

fn lookup(
    reader: &IniDocument,
    writer: &mut IniDocument,
    section: &str,
    key: &str,
    default: &Value,
    write_back: bool,
) -> String {
    match reader.get(section, key) {
        Ok(value) => value.to_string(),
        Err(e) => {
            tracing::warn!(
                "Error getting config {} from section {}: {}; using default value: {}",
                key,
                section,
                e,
                default
            );
            if write_back {
                set_internal(writer, section, key, default)
            } else {
                default.to_ini_string()
            }
        }
    }
}

fn set_internal(writer: &mut IniDocument, section: &str, option: &str, value: &Value) -> String {
    let serialized = value.to_ini_string();
    writer.insert(section, option, serialized.as_str());
    serialized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn schema() -> Schema {
        Schema::new()
            .section("GENERAL", |s| s.option("count", 1).option("_locked", 0))
            .section("NETWORK", |s| {
                s.option("hosts", vec!["alpha"])
                    .option("ratio", 0.5)
                    .option("debug", false)
            })
    }

    #[test]
    fn test_first_run_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        let store = ConfigStore::new(schema(), path.clone()).unwrap();

        assert_eq!(store.settings().int("count"), Some(1));
        assert_eq!(store.settings().int("locked"), Some(0));
        assert_eq!(store.settings().float("network_ratio"), Some(0.5));
        assert_eq!(store.settings().bool("network_debug"), Some(false));
        assert_eq!(store.settings().len(), 5);

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.starts_with("[GENERAL]\ncount = 1\n\n[NETWORK]\n"));
        assert!(saved.contains("hosts = [\"alpha\"]"));
        assert!(saved.contains("ratio = 0.5"));
        assert!(!saved.contains("locked"));
    }

    #[test]
    fn test_bad_value_keeps_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[GENERAL]\ncount = many\n[NETWORK]\nhosts = not json\n").unwrap();

        let store = ConfigStore::new(schema(), path.clone()).unwrap();
        assert_eq!(store.settings().int("count"), Some(1));
        assert_eq!(store.settings().list("network_hosts"), Some(&[json!("alpha")][..]));

        // Present but malformed values are left alone on disk
        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("count = many"));
    }

    #[test]
    fn test_set_rejections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let mut store = ConfigStore::new(schema(), path.clone()).unwrap();

        assert_eq!(
            store.set("_locked", 5).unwrap(),
            SetOutcome::Rejected(SetRejection::Protected)
        );
        assert_eq!(
            store.set("locked", 5).unwrap(),
            SetOutcome::Rejected(SetRejection::Protected)
        );
        assert_eq!(
            store.set("missing", 5).unwrap(),
            SetOutcome::Rejected(SetRejection::UnknownOption)
        );
        assert_eq!(
            store.set_in("MISSING", "x", 5).unwrap(),
            SetOutcome::Rejected(SetRejection::UnknownSection)
        );
    }

    #[test]
    fn test_set_refuses_protected_name_through_default_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[DEFAULT]\nlocked = 5\n[GENERAL]\ncount = 1\n").unwrap();

        let mut store = ConfigStore::new(schema(), path.clone()).unwrap();
        let before = fs::read_to_string(&path).unwrap();
        assert_eq!(store.raw("GENERAL", "locked").unwrap(), "5");

        assert_eq!(
            store.set("locked", 99).unwrap(),
            SetOutcome::Rejected(SetRejection::Protected)
        );
        assert_eq!(
            store.set("LOCKED", 99).unwrap(),
            SetOutcome::Rejected(SetRejection::Protected)
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store.settings().int("locked"), Some(0));

        // Other DEFAULT fallbacks stay settable
        fs::write(&path, "[DEFAULT]\nretries = 2\n[GENERAL]\ncount = 1\n").unwrap();
        store.load().unwrap();
        assert!(store.set("retries", 3).unwrap().is_stored());
    }

    #[test]
    fn test_set_reloads_when_section_appears_after_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let schema = schema().section("EXTRA", |s| s.option("mode", "slow"));
        let options = StoreOptions {
            write_defaults: false,
            ..Default::default()
        };
        let mut store = ConfigStore::with_options(schema, path.clone(), options, NoExtraSections).unwrap();
        assert!(!store.reader().has_section("EXTRA"));

        // Written by someone else after the store was opened
        fs::write(&path, "[EXTRA]\nmode = fast\n").unwrap();

        assert_eq!(
            store.set_in("EXTRA", "mode", "turbo").unwrap(),
            SetOutcome::Stored("turbo".to_string())
        );
        assert_eq!(store.settings().str("extra_mode"), Some("turbo"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[EXTRA]\nmode = turbo\n\n");
    }

    #[test]
    fn test_raw_reports_missing_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[GENERAL]\ncount = 4\n").unwrap();
        let store = ConfigStore::new(schema(), path).unwrap();

        assert_eq!(store.raw("GENERAL", "count").unwrap(), "4");
        assert!(matches!(
            store.raw("NOPE", "count").unwrap_err(),
            crate::error::EasyfigError::Ini(crate::error::IniError::NoSection { .. })
        ));
        assert!(matches!(
            store.raw("GENERAL", "missing").unwrap_err(),
            crate::error::EasyfigError::Ini(crate::error::IniError::NoOption { .. })
        ));
    }

    #[test]
    fn test_set_in_other_section() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::new(schema(), dir.path().join("config.ini")).unwrap();

        let outcome = store.set_in("NETWORK", "hosts", vec!["a", "b"]).unwrap();
        assert_eq!(outcome.value(), Some("[\"a\",\"b\"]"));
        assert_eq!(
            store.settings().list("network_hosts"),
            Some(&[json!("a"), json!("b")][..])
        );
    }

    #[test]
    fn test_get_seeds_write_document() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::new(schema(), dir.path().join("config.ini")).unwrap();

        assert_eq!(store.get("theme", "UI", "dark"), "dark");
        assert_eq!(store.writer().get("UI", "theme").unwrap(), "dark");

        assert_eq!(store.get("_secret", "UI", "x"), "x");
        assert!(!store.writer().has_option("UI", "_secret"));

        // The file did not exist when the read document was built
        assert_eq!(store.get("count", "GENERAL", 9), "9");
        store.load().unwrap();
        assert_eq!(store.get("count", "GENERAL", 9), "1");
    }

    #[test]
    fn test_section_string_hides_protected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "[GENERAL]\ncount = 3\n_locked = 4\n").unwrap();

        let store = ConfigStore::new(schema(), path).unwrap();
        assert_eq!(store.settings().int("locked"), Some(4));
        assert_eq!(store.section_string("GENERAL"), "count : 3\n");
        assert_eq!(store.to_string(), "count : 3\n");
        assert_eq!(store.section_string("NOPE"), "");
    }

    #[test]
    fn test_write_defaults_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        let options = StoreOptions {
            write_defaults: false,
            ..Default::default()
        };

        let store = ConfigStore::with_options(schema(), path.clone(), options, NoExtraSections).unwrap();
        assert_eq!(store.settings().int("count"), Some(1));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_relative_paths_use_base_dir() {
        let dir = TempDir::new().unwrap();
        let options = StoreOptions {
            base_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let store = ConfigStore::with_options(schema(), "app.ini", options, NoExtraSections).unwrap();
        assert_eq!(store.save_path(), dir.path().join("app.ini"));
        assert!(dir.path().join("app.ini").exists());
    }

    #[test]
    fn test_empty_file_set_rejected() {
        let err = ConfigStore::new(schema(), Vec::<PathBuf>::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EasyfigError::Config(ConfigError::NoFiles)
        ));
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let dir = TempDir::new().unwrap();
        let bad = Schema::new().section("GENERAL", |s| s.option("locked", 1).option("_locked", 2));
        assert!(ConfigStore::new(bad, dir.path().join("config.ini")).is_err());
    }
}
