//! The live label collection of one attribute on one record.
//!
//! [`ValueCollection`] is a short-lived view borrowing the attribute and the
//! host record. The labels themselves live in the host's [`ValueCache`], so
//! the collection survives across views for as long as the record does.
//!
//! Every mutation goes through the same sequence: copy the current labels,
//! apply the change to the copy, encode it, and only then write the mask
//! back and replace the cached labels. If encoding fails the cached labels
//! are dropped (they are re-decoded from the untouched backing field on next
//! access) and the error is returned.

use super::host::BitmaskHost;
use super::BitmaskAttribute;
use crate::codec::BitmaskCodec;
use crate::error::Result;
use crate::label::Label;
use crate::mask::Mask;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-record storage for materialized label collections, keyed by attribute name.
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    entries: HashMap<String, Vec<Label>>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached labels of `attribute`, if its collection has been materialized.
    pub fn get(&self, attribute: &str) -> Option<&[Label]> {
        self.entries.get(attribute).map(Vec::as_slice)
    }

    /// Forget one attribute's collection.
    pub fn invalidate(&mut self, attribute: &str) {
        self.entries.remove(attribute);
    }

    /// Forget everything, e.g. after the record was reloaded.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub struct ValueCollection<'a, H: BitmaskHost + ?Sized> {
    attribute: &'a BitmaskAttribute,
    host: &'a mut H,
}

impl<'a, H: BitmaskHost + ?Sized> ValueCollection<'a, H> {
    pub(crate) fn new(attribute: &'a BitmaskAttribute, host: &'a mut H) -> Self {
        Self { attribute, host }
    }

    /// Current labels. Freshly decoded collections are in configuration
    /// order; after a mutation the mutation's order is kept.
    pub fn labels(&mut self) -> Result<&[Label]> {
        self.materialize()?;
        let name = self.attribute.name();
        Ok(self.host.value_cache().get(name).unwrap_or(&[]))
    }

    pub fn to_vec(&mut self) -> Result<Vec<Label>> {
        Ok(self.labels()?.to_vec())
    }

    pub fn len(&mut self) -> Result<usize> {
        Ok(self.labels()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.labels()?.is_empty())
    }

    pub fn contains(&mut self, label: &str) -> Result<bool> {
        Ok(self.labels()?.iter().any(|current| current == label))
    }

    /// Mask of the current labels.
    pub fn to_mask(&mut self) -> Result<Mask> {
        let attribute = self.attribute;
        let labels = self.labels()?;
        attribute.codec().encode(labels)
    }

    pub fn push(&mut self, label: impl Into<Label>) -> Result<()> {
        let label = label.into();
        self.mutate(|labels| labels.push(label))
    }

    pub fn extend<I, L>(&mut self, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let added: Vec<Label> = labels.into_iter().map(Into::into).collect();
        self.mutate(|labels| labels.extend(added))
    }

    /// Remove every occurrence of `label`. Returns whether it was present.
    pub fn remove(&mut self, label: &str) -> Result<bool> {
        self.mutate(|labels| {
            let before = labels.len();
            labels.retain(|current| current != label);
            labels.len() != before
        })
    }

    pub fn replace<I, L>(&mut self, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let replacement: Vec<Label> = labels.into_iter().map(Into::into).collect();
        self.mutate(|labels| *labels = replacement)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.mutate(Vec::clear)
    }

    /// Keep only the labels for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<()>
    where
        F: FnMut(&Label) -> bool,
    {
        self.mutate(|labels| labels.retain(|label| keep(label)))
    }

    /// Replace every label with `f(label)`.
    pub fn map<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&Label) -> Label,
    {
        self.mutate(|labels| {
            for label in labels.iter_mut() {
                *label = f(label);
            }
        })
    }

    fn materialize(&mut self) -> Result<()> {
        let attribute = self.attribute;
        if self.host.value_cache().get(attribute.name()).is_some() {
            return Ok(());
        }

        let stored = self.host.read_field(attribute.column()).unwrap_or_default();
        let labels = attribute.codec().decode(&stored)?;
        if let Some(extension) = attribute.extension() {
            extension(&labels);
        }
        self.host
            .value_cache()
            .entries
            .insert(attribute.name().to_string(), labels);
        Ok(())
    }

    fn mutate<T, F>(&mut self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Label>) -> T,
    {
        let mut working = self.labels()?.to_vec();
        let out = apply(&mut working);
        self.commit(working)?;
        Ok(out)
    }

    fn commit(&mut self, working: Vec<Label>) -> Result<()> {
        let attribute = self.attribute;
        let codec = attribute.codec();

        let mask = match codec.encode(&working) {
            Ok(mask) => mask,
            Err(err) => {
                self.host.value_cache().invalidate(attribute.name());
                debug!(
                    attribute = attribute.name(),
                    error = %err,
                    "rejected bitmask mutation rolled back"
                );
                return Err(err);
            }
        };

        let labels = normalize(codec, working);
        debug!(
            attribute = attribute.name(),
            column = attribute.column(),
            mask = %mask,
            "bitmask write-back"
        );
        self.host.write_field(attribute.column(), mask);
        self.host
            .value_cache()
            .entries
            .insert(attribute.name().to_string(), labels);
        Ok(())
    }
}

/// Drop zero-equivalent labels and duplicates, keeping first occurrences.
/// Only called on label lists that already encoded successfully.
fn normalize(codec: &BitmaskCodec, labels: Vec<Label>) -> Vec<Label> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| !codec.is_zero(label.as_str()))
        .filter_map(|label| codec.canonical(label.as_str()).cloned())
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
