// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Starter schema and example file.

use super::schema::Schema;

/// A minimal starter schema: one regular and one protected option.
pub fn default_schema() -> Schema {
    Schema::new().section("GENERAL", |s| {
        s.option("example", 1).option("_protected_example", 0)
    })
}

/// Generate an example configuration file covering every value kind.
pub fn example_config() -> &'static str {
    r#"# easyfig configuration file
# Composite values (lists, maps, tuples) are stored as JSON.
# Options starting with "_" are protected: only editable here.

[DEFAULT]
; fallbacks visible from every section
verbose = false

[GENERAL]
example = 1
_protected_example = 0
ratio = 0.75
name = easyfig

[NETWORK]
hosts = ["alpha", "beta"]
limits = {"max_peers": 8, "timeout": 30}
motd = first line
    second line
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreOptions;
    use crate::ini::IniDocument;

    #[test]
    fn test_default_schema_is_valid() {
        let schema = default_schema();
        assert_eq!(schema.len(), 2);
        assert!(schema.validate(&StoreOptions::default()).is_ok());
    }

    #[test]
    fn test_example_config_parseable() {
        let doc = IniDocument::parse(example_config()).expect("Example config should parse");
        assert_eq!(doc.get("NETWORK", "verbose").unwrap(), "false");
        assert_eq!(doc.get("NETWORK", "motd").unwrap(), "first line\nsecond line");
        assert_eq!(doc.get("GENERAL", "_protected_example").unwrap(), "0");
    }
}
