use super::record::MemRecord;
use crate::mask::Mask;
use crate::predicate::Predicate;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Row {
    id: Uuid,
    fields: HashMap<String, Mask>,
}

/// Records kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a new record or overwrite an existing one. New records get an id.
    pub fn save(&mut self, record: &mut MemRecord) -> Uuid {
        let id = *record.id.get_or_insert_with(Uuid::new_v4);
        let fields = record.fields.clone();
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => row.fields = fields,
            None => self.rows.push(Row { id, fields }),
        }
        debug!(%id, "saved record");
        id
    }

    /// A freshly loaded copy of a stored record, with no cached collections.
    pub fn find(&self, id: Uuid) -> Option<MemRecord> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .map(|row| MemRecord::loaded(row.id, row.fields.clone()))
    }

    pub fn all(&self) -> Vec<MemRecord> {
        self.rows
            .iter()
            .map(|row| MemRecord::loaded(row.id, row.fields.clone()))
            .collect()
    }

    /// Records for which `predicate` evaluates to true.
    pub fn filter(&self, predicate: &Predicate) -> Vec<MemRecord> {
        self.all()
            .into_iter()
            .filter(|record| predicate.matches(record))
            .collect()
    }

    /// Ids of the records matching `predicate`, in insertion order.
    pub fn filter_ids(&self, predicate: &Predicate) -> Vec<Uuid> {
        self.filter(predicate)
            .iter()
            .filter_map(MemRecord::id)
            .collect()
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
