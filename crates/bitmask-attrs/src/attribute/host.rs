//! Collaborator traits implemented by the host record type.

use super::collection::ValueCache;
use crate::mask::Mask;

/// Integer cells of a record, keyed by column name.
///
/// `None` is a NULL / never-written column. The persistence layer owns the
/// storage; this crate only reads and writes whole masks.
pub trait BackingField {
    fn read_field(&self, column: &str) -> Option<Mask>;

    fn write_field(&mut self, column: &str, value: Mask);
}

/// A record that carries one or more bitmask attributes.
///
/// Besides its backing columns the record owns a [`ValueCache`], which holds
/// the live label collections of its attributes. Clear it when the record is
/// reloaded from storage.
pub trait BitmaskHost: BackingField {
    fn value_cache(&mut self) -> &mut ValueCache;
}
