//! Label ↔ mask arithmetic.
//!
//! The codec owns the ordered label list of one attribute. The label at
//! index `i` is bit `1 << i`. An optional zero value is accepted wherever a
//! label is but never gets a bit: it always encodes to 0, just like a blank
//! label.

use crate::error::{BitmaskError, Result};
use crate::label::{self, Label};
use crate::mask::Mask;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct BitmaskCodec {
    attribute: String,
    labels: Vec<Label>,
    positions: HashMap<Label, usize>,
    zero_value: Option<Label>,
}

impl BitmaskCodec {
    /// Build a codec for `attribute` over an ordered, non-empty, duplicate-free
    /// label list.
    pub fn new<I, L>(attribute: &str, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(BitmaskError::configuration(
                attribute,
                "must provide a non-empty list of values",
            ));
        }

        let mut positions = HashMap::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            if label.is_blank() {
                return Err(BitmaskError::configuration(
                    attribute,
                    format!("value #{index} is blank"),
                ));
            }
            if positions.insert(label.clone(), index).is_some() {
                return Err(BitmaskError::configuration(
                    attribute,
                    format!("duplicate value {:?}", label.as_str()),
                ));
            }
        }

        Ok(Self {
            attribute: attribute.to_string(),
            labels,
            positions,
            zero_value: None,
        })
    }

    /// Designate a zero-equivalent sentinel label.
    pub fn with_zero_value(mut self, zero: impl Into<Label>) -> Result<Self> {
        let zero = zero.into();
        if self.positions.contains_key(zero.as_str()) {
            return Err(BitmaskError::configuration(
                &self.attribute,
                format!("zero value {:?} is also a flag value", zero.as_str()),
            ));
        }
        self.zero_value = (!zero.is_blank()).then_some(zero);
        Ok(self)
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn zero_value(&self) -> Option<&Label> {
        self.zero_value.as_ref()
    }

    /// Number of flag labels, which is also the mask width.
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Largest valid mask, `2^width - 1`.
    pub fn max_mask(&self) -> Mask {
        Mask::all(self.width())
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// True for blank labels and the configured zero value.
    pub fn is_zero(&self, label: &str) -> bool {
        label::is_blank(label) || self.zero_value.as_ref().is_some_and(|zero| zero == label)
    }

    /// The configured label instance for `label`, if it is a flag.
    pub fn canonical(&self, label: &str) -> Option<&Label> {
        self.position(label).map(|index| &self.labels[index])
    }

    /// Bit of a single label; 0 for zero-equivalent labels.
    pub fn bit(&self, label: &str) -> Result<Mask> {
        if self.is_zero(label) {
            return Ok(Mask::zero());
        }
        self.position(label)
            .map(Mask::bit)
            .ok_or_else(|| BitmaskError::invalid_label(&self.attribute, label))
    }

    /// OR together the bits of every label. Order and repetition do not matter.
    pub fn encode<I, L>(&self, labels: I) -> Result<Mask>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut mask = Mask::zero();
        for label in labels {
            let label = label.as_ref();
            if self.is_zero(label) {
                continue;
            }
            let index = self
                .position(label)
                .ok_or_else(|| BitmaskError::invalid_label(&self.attribute, label))?;
            mask.set_bit(index);
        }
        Ok(mask)
    }

    /// Labels whose bits are set, in configuration order.
    pub fn decode(&self, mask: &Mask) -> Result<Vec<Label>> {
        if mask.bit_len() > self.width() {
            return Err(self.out_of_range(mask.to_string()));
        }
        Ok(mask.ones().map(|index| self.labels[index].clone()).collect())
    }

    /// Decode a raw signed integer, rejecting negatives.
    pub fn decode_raw(&self, value: i128) -> Result<Vec<Label>> {
        let unsigned = u128::try_from(value).map_err(|_| self.out_of_range(value.to_string()))?;
        self.decode(&Mask::from(unsigned))
    }

    fn out_of_range(&self, value: String) -> BitmaskError {
        BitmaskError::OutOfRange {
            attribute: self.attribute.clone(),
            value,
            width: self.width(),
        }
    }
}
