#![allow(dead_code)]

use bitmask_attrs::store::{MemRecord, MemoryStore, Schema};
use bitmask_attrs::{BitmaskAttribute, Mask};
use uuid::Uuid;

/// The campaign record type: a `medium` column plus a few oddly configured
/// attributes. `null` selects whether columns are nullable; non-nullable
/// columns start at 0 like a `NOT NULL DEFAULT 0` column would.
pub struct Campaign {
    pub schema: Schema,
    pub store: MemoryStore,
    pub null: bool,
}

impl Campaign {
    pub fn new(null: bool) -> Self {
        let schema = Schema::new(vec![
            BitmaskAttribute::builder("medium")
                .values(["web", "print", "email", "phone"])
                .null(null)
                .build()
                .unwrap(),
            BitmaskAttribute::builder("allow_zero")
                .values(["one", "two", "three"])
                .zero_value("none")
                .null(null)
                .build()
                .unwrap(),
            BitmaskAttribute::builder("Legacy")
                .values(["upper", "case"])
                .null(null)
                .build()
                .unwrap(),
            BitmaskAttribute::builder("2x")
                .values(["x", "y"])
                .null(null)
                .build()
                .unwrap(),
        ]);
        Self {
            schema,
            store: MemoryStore::new(),
            null,
        }
    }

    pub fn both() -> [Campaign; 2] {
        [Campaign::new(true), Campaign::new(false)]
    }

    pub fn attr(&self, name: &str) -> &BitmaskAttribute {
        self.schema.attribute(name).unwrap()
    }

    pub fn medium(&self) -> &BitmaskAttribute {
        self.attr("medium")
    }

    /// A new, unsaved record with defaults applied.
    pub fn record(&self) -> MemRecord {
        let mut record = MemRecord::new();
        if !self.null {
            for attr in self.schema.attributes() {
                record.set_field(attr.column(), Some(Mask::zero()));
            }
        }
        self.schema.initialize(&mut record).unwrap();
        record
    }

    /// A new record with `labels` assigned to `attribute`.
    pub fn build(&self, attribute: &str, labels: &[&str]) -> MemRecord {
        let mut record = self.record();
        self.attr(attribute)
            .assign(&mut record, labels.iter().copied())
            .unwrap();
        record
    }

    /// Build and save.
    pub fn create(&mut self, attribute: &str, labels: &[&str]) -> Uuid {
        let mut record = self.build(attribute, labels);
        self.store.save(&mut record)
    }

    pub fn reload(&self, id: Uuid) -> MemRecord {
        self.store.find(id).unwrap()
    }
}
