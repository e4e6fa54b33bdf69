//! Symbolic labels.
//!
//! A label is the name of one flag in a bitmask attribute (`web`, `print`, ...).
//! Labels compare by their text, so a label parsed from a config file, a
//! string literal and a label taken from the codec are interchangeable.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// The name of one flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A blank label (empty or whitespace only) always means "no flags".
    pub fn is_blank(&self) -> bool {
        is_blank(&self.0)
    }
}

pub(crate) fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label(name)
    }
}

impl From<&Label> for Label {
    fn from(label: &Label) -> Self {
        label.clone()
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_labels() {
        assert!(Label::new("").is_blank());
        assert!(Label::new("  ").is_blank());
        assert!(!Label::new("web").is_blank());
    }

    #[test]
    fn string_forms_are_the_same_label() {
        assert_eq!(Label::from("web"), Label::from("web".to_string()));
        assert_eq!(Label::from("web"), "web");
    }

    #[test]
    fn lookup_by_str() {
        let mut positions = HashMap::new();
        positions.insert(Label::from("print"), 1usize);
        assert_eq!(positions.get("print"), Some(&1));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::from("email")).unwrap();
        assert_eq!(json, "\"email\"");
        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "email");
    }
}
