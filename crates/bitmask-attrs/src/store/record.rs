use crate::attribute::{BackingField, BitmaskAttribute, BitmaskHost, ValueCache};
use crate::error::Result;
use crate::mask::Mask;
use std::collections::HashMap;
use uuid::Uuid;

/// A record with named integer columns. Unset columns are NULL.
#[derive(Debug, Clone, Default)]
pub struct MemRecord {
    pub(super) id: Option<Uuid>,
    pub(super) fields: HashMap<String, Mask>,
    cache: ValueCache,
}

impl MemRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn loaded(id: Uuid, fields: HashMap<String, Mask>) -> Self {
        Self {
            id: Some(id),
            fields,
            cache: ValueCache::new(),
        }
    }

    /// Store id; `None` until the record is first saved.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Raw column access, bypassing any attribute. Drops cached collections
    /// so they are re-decoded from the new value.
    pub fn set_field(&mut self, column: &str, value: Option<Mask>) {
        match value {
            Some(value) => {
                self.fields.insert(column.to_string(), value);
            }
            None => {
                self.fields.remove(column);
            }
        }
        self.cache.clear();
    }
}

impl BackingField for MemRecord {
    fn read_field(&self, column: &str) -> Option<Mask> {
        self.fields.get(column).cloned()
    }

    fn write_field(&mut self, column: &str, value: Mask) {
        self.fields.insert(column.to_string(), value);
    }
}

impl BitmaskHost for MemRecord {
    fn value_cache(&mut self) -> &mut ValueCache {
        &mut self.cache
    }
}

/// The bitmask attributes attached to one record type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: Vec<BitmaskAttribute>,
}

impl Schema {
    pub fn new(attributes: Vec<BitmaskAttribute>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[BitmaskAttribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&BitmaskAttribute> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    /// A new record with every attribute's default applied.
    pub fn instantiate(&self) -> Result<MemRecord> {
        let mut record = MemRecord::new();
        self.initialize(&mut record)?;
        Ok(record)
    }

    /// Run the new-record hook on `record`. Saved records are left alone.
    pub fn initialize(&self, record: &mut MemRecord) -> Result<()> {
        if !record.is_new() {
            return Ok(());
        }
        for attr in &self.attributes {
            attr.apply_default(record)?;
        }
        Ok(())
    }
}
