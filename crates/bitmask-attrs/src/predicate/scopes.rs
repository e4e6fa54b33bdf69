//! Filter generators for bitmask attributes.
//!
//! | Generator | No labels | With labels |
//! |-----------|-----------|-------------|
//! | `with_all` | `field > 0` | every label set (zero label: field is zero) |
//! | `with_any` | `field > 0` | some label set (or field is zero, for a zero label) |
//! | `without` | `no_values` | none of the labels set (and field non-zero, for a zero label) |
//! | `with_exact` | `no_values` | field equals exactly the labels' mask |
//! | `no_values` | field is zero | - |
//! | `for_label` | - | that one label set |
//!
//! "Field is zero" means `field = 0`, or `field = 0 OR field IS NULL` when the
//! attribute allows null. A blank label counts as the zero label. Every
//! generator validates its labels first, so an unknown label fails before any
//! predicate is built.

use super::Predicate;
use crate::attribute::BitmaskAttribute;
use crate::error::{BitmaskError, Result};
use crate::mask::Mask;
use tracing::trace;

impl BitmaskAttribute {
    /// The zero test shared by several generators.
    pub fn zero_predicate(&self) -> Predicate {
        let eq_zero = Predicate::eq(self.column(), Mask::zero());
        if self.allows_null() {
            Predicate::or(vec![eq_zero, Predicate::is_null(self.column())])
        } else {
            eq_zero
        }
    }

    /// Records having every requested label.
    pub fn with_all<I, L>(&self, labels: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels = self.requested(labels)?;
        if labels.is_empty() {
            return Ok(self.traced("with_all", self.any_value()));
        }

        let mut parts = Vec::with_capacity(labels.len());
        for label in &labels {
            if self.codec().is_zero(label) {
                parts.push(self.zero_predicate());
            } else {
                parts.push(Predicate::bit_and_ne(
                    self.column(),
                    self.codec().bit(label)?,
                    Mask::zero(),
                ));
            }
        }
        Ok(self.traced("with_all", Predicate::and(parts)))
    }

    /// Records having at least one requested label.
    pub fn with_any<I, L>(&self, labels: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels = self.requested(labels)?;
        if labels.is_empty() {
            return Ok(self.traced("with_any", self.any_value()));
        }

        let mask = self.codec().encode(&labels)?;
        let condition = Predicate::bit_and_ne(self.column(), mask, Mask::zero());
        let predicate = if self.has_zero(&labels) {
            Predicate::or(vec![condition, self.zero_predicate()])
        } else {
            condition
        };
        Ok(self.traced("with_any", predicate))
    }

    /// Records having none of the requested labels.
    ///
    /// A NULL column never has a label, so it always qualifies. Asking to be
    /// without the zero label additionally requires some label to be set.
    pub fn without<I, L>(&self, labels: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels = self.requested(labels)?;
        if labels.is_empty() {
            return Ok(self.no_values());
        }

        let mask = self.codec().encode(&labels)?;
        let relation = Predicate::or(vec![
            Predicate::is_null(self.column()),
            Predicate::bit_and_eq(self.column(), mask, Mask::zero()),
        ]);
        let predicate = if self.has_zero(&labels) {
            Predicate::and(vec![relation, self.any_value()])
        } else {
            relation
        };
        Ok(self.traced("without", predicate))
    }

    /// Records whose value is exactly the requested labels.
    pub fn with_exact<I, L>(&self, labels: I) -> Result<Predicate>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels = self.requested(labels)?;
        if labels.is_empty() {
            return Ok(self.no_values());
        }

        let mask = self.codec().encode(&labels)?;
        let mut parts = Vec::with_capacity(2);
        if labels.iter().any(|label| !self.codec().is_zero(label)) {
            parts.push(Predicate::eq(self.column(), mask));
        }
        if self.has_zero(&labels) {
            parts.push(self.zero_predicate());
        }
        Ok(self.traced("with_exact", Predicate::and(parts)))
    }

    /// Records with no label set.
    pub fn no_values(&self) -> Predicate {
        self.traced("no_values", self.zero_predicate())
    }

    /// Records having one specific configured label.
    pub fn for_label(&self, label: &str) -> Result<Predicate> {
        let index = self
            .codec()
            .position(label)
            .ok_or_else(|| BitmaskError::invalid_label(self.name(), label))?;
        let predicate = Predicate::bit_and_ne(self.column(), Mask::bit(index), Mask::zero());
        Ok(self.traced("for_label", predicate))
    }

    fn any_value(&self) -> Predicate {
        Predicate::gt(self.column(), Mask::zero())
    }

    fn requested<I, L>(&self, labels: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        self.codec().encode(&labels)?;
        Ok(labels)
    }

    fn has_zero(&self, labels: &[String]) -> bool {
        labels.iter().any(|label| self.codec().is_zero(label))
    }

    fn traced(&self, generator: &str, predicate: Predicate) -> Predicate {
        trace!(attribute = self.name(), generator, predicate = ?predicate, "built predicate");
        predicate
    }
}
