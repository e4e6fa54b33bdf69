//! Arbitrary-width unsigned masks.
//!
//! Attributes with more labels than a native integer has bits must not
//! truncate, so a [`Mask`] is a growable bit vector rather than a `u64`.
//! Bit `i` is the flag of the label at index `i`. Trailing zero bits are
//! always trimmed, which keeps equality and ordering numeric.

use bitvec::prelude::*;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::BitOr;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Mask {
    bits: BitVec,
}

impl Mask {
    /// The empty mask (integer 0).
    pub fn zero() -> Self {
        Self::default()
    }

    /// A mask with only bit `index` set (`1 << index`).
    pub fn bit(index: usize) -> Self {
        let mut bits = BitVec::repeat(false, index + 1);
        bits.set(index, true);
        Mask { bits }
    }

    /// A mask with the low `width` bits set (`2^width - 1`).
    pub fn all(width: usize) -> Self {
        Mask {
            bits: BitVec::repeat(true, width),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of significant bits; 0 for the zero mask.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn test_bit(&self, index: usize) -> bool {
        self.bits.get(index).map(|bit| *bit).unwrap_or(false)
    }

    pub fn set_bit(&mut self, index: usize) {
        if index >= self.bits.len() {
            self.bits.resize(index + 1, false);
        }
        self.bits.set(index, true);
    }

    /// Indexes of the set bits, lowest first.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    pub fn union(&self, other: &Mask) -> Mask {
        let mut out = self.clone();
        for index in other.ones() {
            out.set_bit(index);
        }
        out
    }

    pub fn intersection(&self, other: &Mask) -> Mask {
        let mut out = Mask::zero();
        for index in self.ones().filter(|&index| other.test_bit(index)) {
            out.set_bit(index);
        }
        out
    }

    pub fn to_u64(&self) -> Option<u64> {
        if self.bit_len() > 64 {
            return None;
        }
        Some(self.ones().fold(0u64, |acc, index| acc | (1u64 << index)))
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.bit_len() > 128 {
            return None;
        }
        Some(self.ones().fold(0u128, |acc, index| acc | (1u128 << index)))
    }

    fn from_words(value: u128) -> Self {
        let mut mask = Mask::zero();
        for index in 0..128 {
            if value & (1u128 << index) != 0 {
                mask.set_bit(index);
            }
        }
        mask
    }
}

impl From<u8> for Mask {
    fn from(value: u8) -> Self {
        Mask::from_words(u128::from(value))
    }
}

impl From<u32> for Mask {
    fn from(value: u32) -> Self {
        Mask::from_words(u128::from(value))
    }
}

impl From<u64> for Mask {
    fn from(value: u64) -> Self {
        Mask::from_words(u128::from(value))
    }
}

impl From<u128> for Mask {
    fn from(value: u128) -> Self {
        Mask::from_words(value)
    }
}

impl BitOr for &Mask {
    type Output = Mask;

    fn bitor(self, rhs: &Mask) -> Mask {
        self.union(rhs)
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Mask) -> Mask {
        self.union(&rhs)
    }
}

impl Ord for Mask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bit_len().cmp(&other.bit_len()).then_with(|| {
            (0..self.bit_len())
                .rev()
                .map(|index| self.test_bit(index).cmp(&other.test_bit(index)))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
    }
}

impl PartialOrd for Mask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Decimal rendering, exact for any width.
impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.to_u128() {
            return write!(f, "{value}");
        }

        // Little-endian 32-bit limbs, repeatedly divided by 10^9.
        let mut limbs = vec![0u32; self.bit_len().div_ceil(32)];
        for index in self.ones() {
            limbs[index / 32] |= 1 << (index % 32);
        }

        let mut chunks = Vec::new();
        while limbs.iter().any(|&limb| limb != 0) {
            let mut rem: u64 = 0;
            for limb in limbs.iter_mut().rev() {
                let cur = (rem << 32) | u64::from(*limb);
                *limb = (cur / 1_000_000_000) as u32;
                rem = cur % 1_000_000_000;
            }
            chunks.push(rem as u32);
        }

        let mut chunks = chunks.iter().rev();
        if let Some(first) = chunks.next() {
            write!(f, "{first}")?;
        }
        for chunk in chunks {
            write!(f, "{chunk:09}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({self})")
    }
}

/// JSON number when it fits in 64 bits, decimal string otherwise.
impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_u64() {
            Some(value) => serializer.serialize_u64(value),
            None => serializer.collect_str(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_empty() {
        let zero = Mask::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.bit_len(), 0);
        assert_eq!(zero.to_u64(), Some(0));
        assert_eq!(zero.to_string(), "0");
        assert_eq!(Mask::from(0u64), zero);
    }

    #[test]
    fn bit_and_union() {
        let web = Mask::bit(0);
        let phone = Mask::bit(3);
        let both = &web | &phone;
        assert_eq!(both.to_u64(), Some(9));
        assert_eq!(both.ones().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn intersection_trims_high_zero_bits() {
        let a = Mask::from(0b1011u64);
        let b = Mask::from(0b0011u64);
        let both = a.intersection(&b);
        assert_eq!(both, Mask::from(3u64));
        assert_eq!(both.bit_len(), 2);
        assert!(Mask::bit(5).intersection(&Mask::bit(1)).is_zero());
    }

    #[test]
    fn all_is_max_value() {
        assert_eq!(Mask::all(4).to_u64(), Some(15));
        assert_eq!(Mask::all(64).to_u64(), Some(u64::MAX));
        assert_eq!(Mask::all(65).to_u64(), None);
        assert_eq!(Mask::all(65).to_u128(), Some((1u128 << 65) - 1));
    }

    #[test]
    fn numeric_ordering() {
        assert!(Mask::from(3u64) < Mask::from(4u64));
        assert!(Mask::from(5u64) > Mask::from(4u64));
        assert!(Mask::bit(200) > Mask::all(199));
        assert_eq!(Mask::from(7u64).cmp(&Mask::from(7u32)), Ordering::Equal);
    }

    #[test]
    fn wide_masks_render_in_decimal() {
        assert_eq!(Mask::bit(127).to_string(), (1u128 << 127).to_string());
        // 2^130
        assert_eq!(
            Mask::bit(130).to_string(),
            "1361129467683753853853498429727072845824"
        );
        // 2^200 - 1
        assert_eq!(
            Mask::all(200).to_string(),
            "1606938044258990275541962092341162602522202993782792835301375"
        );
    }

    #[test]
    fn serializes_small_as_number_and_wide_as_string() {
        assert_eq!(serde_json::to_string(&Mask::from(11u64)).unwrap(), "11");
        assert_eq!(
            serde_json::to_string(&Mask::bit(64)).unwrap(),
            "\"18446744073709551616\""
        );
    }
}
