//! # Bitmask Attributes
//!
//! A [`BitmaskAttribute`] binds a [`BitmaskCodec`] to one integer column of a
//! host record type. It provides:
//!
//! - **Live values**: [`BitmaskAttribute::values`] returns a [`ValueCollection`]
//!   whose every mutation re-encodes and writes back the column
//! - **Assignment**: labels, raw integers, or nothing at all
//! - **Presence queries**: "has any value", "has web", "has web and print"
//! - **Defaults**: applied once by the host's new-record hook
//! - **Filters**: predicate generators live in [`crate::predicate::scopes`]
//!
//! ## Usage
//!
//! ```ignore
//! let medium = BitmaskAttribute::builder("medium")
//!     .values(["web", "print", "email", "phone"])
//!     .default(["web"])
//!     .build()?;
//!
//! medium.apply_default(&mut record)?;
//! medium.values(&mut record).push("print")?;
//! assert!(medium.has(&mut record, ["web", "print"], Match::All)?);
//! ```

pub mod collection;
pub mod host;

pub use collection::{ValueCache, ValueCollection};
pub use host::{BackingField, BitmaskHost};

use crate::codec::BitmaskCodec;
use crate::error::{BitmaskError, Result};
use crate::label::Label;
use crate::mask::Mask;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Callback run with the decoded labels whenever a record's collection is
/// materialized.
pub type Extension = Arc<dyn Fn(&[Label]) + Send + Sync>;

/// How several requested labels combine in a presence query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Match {
    /// Every requested label must be present.
    #[default]
    All,
    /// At least one requested label must be present.
    Any,
}

#[derive(Clone)]
pub struct BitmaskAttribute {
    name: String,
    column: String,
    codec: BitmaskCodec,
    allow_null: bool,
    default: Vec<Label>,
    extension: Option<Extension>,
}

impl fmt::Debug for BitmaskAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmaskAttribute")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("codec", &self.codec)
            .field("allow_null", &self.allow_null)
            .field("default", &self.default)
            .field("extension", &self.extension.is_some())
            .finish()
    }
}

impl BitmaskAttribute {
    pub fn builder(name: impl Into<String>) -> AttributeBuilder {
        AttributeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing column name; the attribute name unless overridden.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn codec(&self) -> &BitmaskCodec {
        &self.codec
    }

    /// The configured labels, in bit order.
    pub fn labels(&self) -> &[Label] {
        self.codec.labels()
    }

    /// Whether a NULL column counts as zero when filtering.
    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    pub fn default_labels(&self) -> &[Label] {
        &self.default
    }

    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    /// Mask for a list of labels.
    pub fn bitmask_for<I, L>(&self, labels: I) -> Result<Mask>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        self.codec.encode(labels)
    }

    /// Labels for a mask, in bit order.
    pub fn labels_for(&self, mask: &Mask) -> Result<Vec<Label>> {
        self.codec.decode(mask)
    }

    /// The live collection of this attribute on `host`.
    pub fn values<'a, H>(&'a self, host: &'a mut H) -> ValueCollection<'a, H>
    where
        H: BitmaskHost + ?Sized,
    {
        ValueCollection::new(self, host)
    }

    pub fn get<H: BitmaskHost + ?Sized>(&self, host: &mut H) -> Result<Vec<Label>> {
        self.values(host).to_vec()
    }

    pub fn to_mask<H: BitmaskHost + ?Sized>(&self, host: &mut H) -> Result<Mask> {
        self.values(host).to_mask()
    }

    /// Replace the value with `labels`. Blank and zero-equivalent labels are
    /// dropped, so assigning only those clears the attribute.
    pub fn assign<H, I, L>(&self, host: &mut H, labels: I) -> Result<()>
    where
        H: BitmaskHost + ?Sized,
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels
            .into_iter()
            .map(Into::into)
            .filter(|label| !self.codec.is_zero(label.as_str()))
            .collect();
        self.values(host).replace(labels)
    }

    /// Replace the value with the labels of a raw integer.
    pub fn assign_raw<H: BitmaskHost + ?Sized>(&self, host: &mut H, value: i128) -> Result<()> {
        let labels = self.codec.decode_raw(value)?;
        self.values(host).replace(labels)
    }

    /// Replace the value with the labels of `mask`.
    pub fn assign_mask<H: BitmaskHost + ?Sized>(&self, host: &mut H, mask: &Mask) -> Result<()> {
        let labels = self.codec.decode(mask)?;
        self.values(host).replace(labels)
    }

    pub fn clear<H: BitmaskHost + ?Sized>(&self, host: &mut H) -> Result<()> {
        self.values(host).clear()
    }

    /// True when at least one label is set.
    pub fn is_present<H: BitmaskHost + ?Sized>(&self, host: &mut H) -> Result<bool> {
        Ok(!self.values(host).is_empty()?)
    }

    /// Presence query over several labels.
    ///
    /// With no labels this is [`is_present`](Self::is_present). A
    /// zero-equivalent label is "present" when the collection is empty.
    /// Unknown labels are simply absent.
    pub fn has<H, I, L>(&self, host: &mut H, labels: I, mode: Match) -> Result<bool>
    where
        H: BitmaskHost + ?Sized,
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let requested: Vec<L> = labels.into_iter().collect();
        let mut values = self.values(host);
        let current = values.labels()?;
        if requested.is_empty() {
            return Ok(!current.is_empty());
        }

        let holds = |label: &L| {
            let label = label.as_ref();
            if self.codec.is_zero(label) {
                current.is_empty()
            } else {
                current.iter().any(|value| value == label)
            }
        };
        Ok(match mode {
            Match::All => requested.iter().all(holds),
            Match::Any => requested.iter().any(holds),
        })
    }

    /// Presence of one configured label. Fails for labels that are not flags.
    pub fn has_label<H: BitmaskHost + ?Sized>(&self, host: &mut H, label: &str) -> Result<bool> {
        if self.codec.position(label).is_none() {
            return Err(BitmaskError::invalid_label(&self.name, label));
        }
        self.values(host).contains(label)
    }

    /// New-record hook: assign the configured default unless a value is
    /// already set. Returns whether the default was applied.
    pub fn apply_default<H: BitmaskHost + ?Sized>(&self, host: &mut H) -> Result<bool> {
        if self.default.is_empty() || self.is_present(host)? {
            return Ok(false);
        }
        self.values(host).replace(self.default.iter())?;
        debug!(attribute = %self.name, default = ?self.default, "applied default value");
        Ok(true)
    }
}

/// Builder for [`BitmaskAttribute`]; mirrors the definition options
/// (`as`, `null`, `default`, `zero_value`, column name, extension).
pub struct AttributeBuilder {
    name: String,
    values: Vec<Label>,
    column: Option<String>,
    allow_null: bool,
    default: Vec<Label>,
    zero_value: Option<Label>,
    extension: Option<Extension>,
}

impl AttributeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            column: None,
            allow_null: true,
            default: Vec::new(),
            zero_value: None,
            extension: None,
        }
    }

    /// The ordered flag labels (`as`).
    pub fn values<I, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Whether NULL is treated as zero when filtering. Defaults to true.
    pub fn null(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    pub fn default<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        self.default = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn zero_value(mut self, zero: impl Into<Label>) -> Self {
        self.zero_value = Some(zero.into());
        self
    }

    pub fn extension<F>(mut self, extension: F) -> Self
    where
        F: Fn(&[Label]) + Send + Sync + 'static,
    {
        self.extension = Some(Arc::new(extension));
        self
    }

    pub fn build(self) -> Result<BitmaskAttribute> {
        let mut codec = BitmaskCodec::new(&self.name, self.values)?;
        if let Some(zero) = self.zero_value {
            codec = codec.with_zero_value(zero)?;
        }

        if let Err(err) = codec.encode(&self.default) {
            return Err(BitmaskError::configuration(
                &self.name,
                format!("invalid default: {err}"),
            ));
        }

        let column = self.column.unwrap_or_else(|| self.name.clone());
        if column.is_empty() {
            return Err(BitmaskError::configuration(&self.name, "empty column name"));
        }

        Ok(BitmaskAttribute {
            name: self.name,
            column,
            codec,
            allow_null: self.allow_null,
            default: self.default,
            extension: self.extension,
        })
    }
}
