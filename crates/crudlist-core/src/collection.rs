//! Immutable record collections
//!
//! A [`Collection`] is a shared, read-only snapshot of records in display
//! order. Every transition builds a new collection and leaves the receiver
//! untouched, so a clone taken before an operation keeps seeing the old
//! state.

use crate::{Error, Record, Result};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

/// Outcome of a transition on a record ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The target record was found and the collection was rebuilt
    Applied,
    /// No record matched; the collection is the same snapshot as before
    Unchanged,
}

impl Change {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied)
    }
}

/// Ordered snapshot of records with unique IDs
#[derive(Debug, Clone, Default)]
pub struct Collection {
    records: Arc<[Record]>,
}

impl Collection {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate IDs
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(Error::DuplicateId(record.id));
            }
        }
        Ok(Self {
            records: records.into(),
        })
    }

    /// The starter list shown by a fresh todo app
    pub fn demo() -> Self {
        let mut done = Record::new(3, "Learn the Context API", "Description 3");
        done.flag = true;
        Self {
            records: vec![
                Record::new(1, "Learn ES6", "Description 1"),
                Record::new(2, "Learn React", "Description 2"),
                done,
                Record::new(4, "Watch a baseball game", "Description 4"),
            ]
            .into(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the record with `id` (linear scan)
    pub fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.position(id).map(|idx| &self.records[idx])
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    /// Largest ID in the collection
    pub fn max_id(&self) -> Option<u64> {
        self.records.iter().map(|r| r.id).max()
    }

    /// Whether both values share the same underlying snapshot
    pub fn ptr_eq(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }

    /// New collection with `record` appended at the end
    pub fn with_created(&self, record: Record) -> Result<Self> {
        if self.contains(record.id) {
            return Err(Error::DuplicateId(record.id));
        }
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.extend_from_slice(&self.records);
        next.push(record);
        Ok(Self {
            records: next.into(),
        })
    }

    /// New collection without the record `id`
    pub fn without(&self, id: u64) -> (Self, Change) {
        let Some(idx) = self.position(id) else {
            return (self.clone(), Change::Unchanged);
        };
        let mut next = Vec::with_capacity(self.records.len() - 1);
        next.extend_from_slice(&self.records[..idx]);
        next.extend_from_slice(&self.records[idx + 1..]);
        (
            Self {
                records: next.into(),
            },
            Change::Applied,
        )
    }

    /// New collection with the flag of record `id` flipped
    pub fn with_toggled(&self, id: u64) -> (Self, Change) {
        self.replace_at(id, Record::toggled)
    }

    /// New collection with every mutable field of record `id` replaced
    pub fn with_updated(&self, id: u64, title: &str, detail: &str, flag: bool) -> (Self, Change) {
        self.replace_at(id, |r| r.with_fields(title, detail, flag))
    }

    fn replace_at(&self, id: u64, f: impl FnOnce(&Record) -> Record) -> (Self, Change) {
        let Some(idx) = self.position(id) else {
            return (self.clone(), Change::Unchanged);
        };
        let mut next = self.records.to_vec();
        next[idx] = f(&self.records[idx]);
        (
            Self {
                records: next.into(),
            },
            Change::Applied,
        )
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.records[..] == other.records[..]
    }
}

impl Eq for Collection {}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.records[..].serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> Collection {
        Collection::from_records(vec![Record::new(1, "A", "a"), Record::new(2, "B", "b")]).unwrap()
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let err = Collection::from_records(vec![Record::new(1, "A", "a"), Record::new(1, "B", "b")])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId(1)));
    }

    #[test]
    fn test_with_created_appends_last() {
        let before = two();
        let after = before.with_created(Record::new(7, "C", "c")).unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(&after.records()[..2], before.records());
        assert_eq!(after.records()[2].id, 7);
    }

    #[test]
    fn test_with_created_rejects_colliding_id() {
        assert!(matches!(
            two().with_created(Record::new(2, "C", "c")),
            Err(Error::DuplicateId(2))
        ));
    }

    #[test]
    fn test_without_preserves_order() {
        let c = Collection::from_records(vec![
            Record::new(1, "A", "a"),
            Record::new(2, "B", "b"),
            Record::new(3, "C", "c"),
        ])
        .unwrap();
        let (after, change) = c.without(2);
        assert_eq!(change, Change::Applied);
        let ids: Vec<u64> = after.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_missing_id_returns_same_snapshot() {
        let c = two();
        let (after, change) = c.without(99);
        assert_eq!(change, Change::Unchanged);
        assert!(after.ptr_eq(&c));

        let (after, change) = c.with_toggled(99);
        assert_eq!(change, Change::Unchanged);
        assert!(after.ptr_eq(&c));

        let (after, change) = c.with_updated(99, "x", "y", true);
        assert_eq!(change, Change::Unchanged);
        assert!(after.ptr_eq(&c));
    }

    #[test]
    fn test_old_snapshot_survives_transition() {
        let c = two();
        let (after, _) = c.with_toggled(1);
        assert!(!c.records()[0].flag);
        assert!(after.records()[0].flag);
        assert_eq!(after.records()[1], c.records()[1]);
    }

    #[test]
    fn test_demo_has_unique_ids() {
        let demo = Collection::demo();
        assert_eq!(demo.len(), 4);
        assert!(Collection::from_records(demo.records().to_vec()).is_ok());
        assert_eq!(demo.max_id(), Some(4));
        assert!(demo.get(3).unwrap().flag);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&two()).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#""id":2"#));
    }
}
