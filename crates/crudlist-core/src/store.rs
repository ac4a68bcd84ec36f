//! In-memory record store
//!
//! No files, no locking - one current snapshot that every operation
//! replaces as a whole.

use crate::collection::Change;
use crate::{Collection, Error, IdGenerator, Record, Result, lowest_unused};

/// Owner of the current record collection
///
/// Every mutating operation derives a new [`Collection`] from the current
/// one and swaps it in with a single assignment. Missing IDs on delete,
/// toggle and update are silent no-ops reported as [`Change::Unchanged`].
#[derive(Debug, Clone, Default)]
pub struct Store {
    current: Collection,
    ids: IdGenerator,
}

impl Store {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `records`
    pub fn with_collection(records: Collection) -> Self {
        let mut store = Self::new();
        store.replace(records);
        store
    }

    /// Swap in a whole new collection
    pub fn replace(&mut self, records: Collection) {
        if let Some(max) = records.max_id() {
            self.ids.observe(max);
        }
        self.current = records;
    }

    /// Read-only view of the current records
    pub fn records(&self) -> &[Record] {
        self.current.records()
    }

    /// Cheap clone of the current snapshot
    pub fn snapshot(&self) -> Collection {
        self.current.clone()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Look up a record by ID
    pub fn get(&self, id: u64) -> Option<&Record> {
        self.current.get(id)
    }

    /// Look up a record by ID, failing when it does not exist
    pub fn require(&self, id: u64) -> Result<&Record> {
        self.get(id).ok_or(Error::NotFound(id))
    }

    /// Append a new unflagged record
    ///
    /// Title and detail are expected to be validated by the caller. When the
    /// generator has passed `u64::MAX` the lowest free ID is reused instead.
    pub fn create(&mut self, title: &str, detail: &str) -> Result<Record> {
        let id = match self.ids.next_id() {
            Some(id) => id,
            None => {
                lowest_unused(self.current.iter().map(|r| r.id)).ok_or(Error::IdsExhausted)?
            }
        };
        let record = Record::new(id, title, detail);
        let next = self.current.with_created(record.clone())?;
        self.current = next;
        tracing::debug!(id = record.id, len = self.current.len(), "record created");
        Ok(record)
    }

    /// Remove the record `id`
    pub fn delete(&mut self, id: u64) -> Change {
        let (next, change) = self.current.without(id);
        self.commit(next, change, "delete", id)
    }

    /// Flip the flag of record `id`
    pub fn toggle_flag(&mut self, id: u64) -> Change {
        let (next, change) = self.current.with_toggled(id);
        self.commit(next, change, "toggle", id)
    }

    /// Replace title, detail and flag of record `id`
    pub fn update(&mut self, id: u64, title: &str, detail: &str, flag: bool) -> Change {
        let (next, change) = self.current.with_updated(id, title, detail, flag);
        self.commit(next, change, "update", id)
    }

    fn commit(&mut self, next: Collection, change: Change, op: &str, id: u64) -> Change {
        match change {
            Change::Applied => {
                self.current = next;
                tracing::debug!(op, id, len = self.current.len(), "record changed");
            }
            Change::Unchanged => {
                tracing::debug!(op, id, "no record with this id, nothing changed");
            }
        }
        change
    }
}
