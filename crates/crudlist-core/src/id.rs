//! ID generation for crudlist records
//!
//! IDs are time-derived (milliseconds since the Unix epoch) and bumped past
//! the last issued value, so two records created in the same millisecond
//! still get distinct IDs. Once `u64::MAX` has been handed out the counter
//! is exhausted and callers fall back to [`lowest_unused`].

use crate::{Error, Result};

/// Issues unique, strictly increasing record IDs
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next record ID
    ///
    /// Returns `None` when the counter has reached `u64::MAX`.
    pub fn next_id(&mut self) -> Option<u64> {
        let bumped = self.last.checked_add(1)?;
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.last = now.max(bumped);
        Some(self.last)
    }

    /// Make sure future IDs are issued above `id`
    ///
    /// Called for every record loaded from a seed.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    /// The most recently issued or observed ID
    pub fn last(&self) -> u64 {
        self.last
    }
}

/// Smallest ID from 1 upwards that is not in `taken`
pub fn lowest_unused(taken: impl IntoIterator<Item = u64>) -> Option<u64> {
    let mut taken: Vec<u64> = taken.into_iter().collect();
    taken.sort_unstable();
    taken.dedup();

    let mut candidate: u64 = 1;
    for id in taken {
        if id < candidate {
            continue;
        }
        if id > candidate {
            break;
        }
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Parse a record ID as it arrives from a route parameter or a command line
pub fn parse_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id().unwrap();
        let b = ids.next_id().unwrap();
        let c = ids.next_id().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_observe_moves_generator_past_seed() {
        let mut ids = IdGenerator::new();
        ids.observe(u64::MAX - 10);
        assert_eq!(ids.next_id(), Some(u64::MAX - 9));
    }

    #[test]
    fn test_next_id_stops_at_max() {
        let mut ids = IdGenerator::new();
        ids.observe(u64::MAX - 1);
        assert_eq!(ids.next_id(), Some(u64::MAX));
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.last(), u64::MAX);
    }

    #[test]
    fn test_lowest_unused() {
        assert_eq!(lowest_unused(std::iter::empty()), Some(1));
        assert_eq!(lowest_unused([0, 1, 2, 5]), Some(3));
        assert_eq!(lowest_unused([u64::MAX, 3, 1]), Some(2));
    }

    #[test]
    fn test_observe_never_moves_backwards() {
        let mut ids = IdGenerator::new();
        let issued = ids.next_id().unwrap();
        ids.observe(3);
        assert_eq!(ids.last(), issued);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_id("abc"), Err(Error::InvalidId(_))));
        assert!(matches!(parse_id("-1"), Err(Error::InvalidId(_))));
    }
}
