//! # Configuration
//!
//! Attribute definitions can be written in code with
//! [`BitmaskAttribute::builder`] or loaded from TOML.
//!
//! A single attribute is loaded with [`confique`] from its own file:
//!
//! ```toml
//! values = ["web", "print", "email", "phone"]
//! null = false
//! default = ["web"]
//! ```
//!
//! A definitions document holds one table per attribute:
//!
//! ```toml
//! [medium]
//! values = ["web", "print", "email", "phone"]
//!
//! [allow_zero]
//! values = ["one", "two", "three"]
//! zero_value = "none"
//! ```
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `values` | required | Ordered flag labels; index `i` is bit `1 << i` |
//! | `null` | `true` | Treat a NULL column as zero when filtering |
//! | `default` | none | Labels assigned to new records without a value |
//! | `zero_value` | none | Label meaning "no flags" |
//! | `column` | attribute name | Backing column name |

use crate::attribute::BitmaskAttribute;
use crate::error::Result;
use crate::label::Label;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_null() -> bool {
    true
}

/// Definition of one bitmask attribute.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttributeConfig {
    /// Ordered flag labels.
    pub values: Vec<Label>,

    /// Whether a NULL column counts as zero when filtering.
    #[config(default = true)]
    #[serde(default = "default_null")]
    pub null: bool,

    /// Labels assigned to new records that have no value.
    pub default: Option<Vec<Label>>,

    /// Label that means "no flags".
    pub zero_value: Option<Label>,

    /// Backing column, when it differs from the attribute name.
    pub column: Option<String>,
}

impl AttributeConfig {
    pub fn new<I, L>(values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            null: true,
            default: None,
            zero_value: None,
            column: None,
        }
    }

    /// Load one attribute definition from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(AttributeConfig::builder().file(path.as_ref()).load()?)
    }
}

impl BitmaskAttribute {
    pub fn from_config(name: &str, config: &AttributeConfig) -> Result<Self> {
        let mut builder = BitmaskAttribute::builder(name)
            .values(config.values.iter())
            .null(config.null);
        if let Some(default) = &config.default {
            builder = builder.default(default.iter());
        }
        if let Some(zero) = &config.zero_value {
            builder = builder.zero_value(zero);
        }
        if let Some(column) = &config.column {
            builder = builder.column(column.clone());
        }
        builder.build()
    }
}

/// Parse a definitions document into attributes, ordered by name.
pub fn parse_definitions(source: &str) -> Result<Vec<BitmaskAttribute>> {
    let definitions: BTreeMap<String, AttributeConfig> = toml::from_str(source)?;
    definitions
        .iter()
        .map(|(name, config)| BitmaskAttribute::from_config(name, config))
        .collect()
}

/// Read and parse a definitions document.
pub fn load_definitions(path: impl AsRef<Path>) -> Result<Vec<BitmaskAttribute>> {
    let source = std::fs::read_to_string(path)?;
    parse_definitions(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_defaults() {
        let config = AttributeConfig::new(["web", "print"]);
        assert!(config.null);
        assert_eq!(config.default, None);
        assert_eq!(config.zero_value, None);
        assert_eq!(config.column, None);
    }

    #[test]
    fn builds_attribute_from_config() {
        let config = AttributeConfig {
            null: false,
            default: Some(vec!["web".into()]),
            zero_value: Some("none".into()),
            column: Some("Medium".into()),
            ..AttributeConfig::new(["web", "print"])
        };
        let attr = BitmaskAttribute::from_config("medium", &config).unwrap();
        assert_eq!(attr.column(), "Medium");
        assert!(!attr.allows_null());
        assert_eq!(attr.default_labels(), ["web"]);
        assert!(attr.codec().is_zero("none"));
    }

    #[test]
    fn parses_definitions_in_name_order() {
        let attrs = parse_definitions(
            r#"
            [medium]
            values = ["web", "print", "email", "phone"]

            [allow_zero]
            values = ["one", "two", "three"]
            zero_value = "none"
            null = false
            "#,
        )
        .unwrap();
        let names: Vec<_> = attrs.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["allow_zero", "medium"]);
        assert!(!attrs[0].allows_null());
        assert!(attrs[1].allows_null());
    }

    #[test]
    fn values_must_be_an_array() {
        let err = parse_definitions("[medium]\nvalues = \"web\"\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_values_are_rejected() {
        let err = parse_definitions("[medium]\nvalues = []\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_values_are_rejected() {
        let err = parse_definitions("[medium]\nnull = true\n").unwrap_err();
        assert!(err.is_configuration());
    }
}
