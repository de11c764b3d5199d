//! Bounded FIFO log of recent sync error messages.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default number of messages retained.
pub const DEFAULT_ERROR_CAPACITY: usize = 5;

/// Ring buffer of the most recent error messages, oldest evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl ErrorLog {
    /// Create an empty log. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a log from stored messages, oldest first. Only the newest
    /// `capacity` messages are kept.
    pub fn from_entries(capacity: usize, entries: impl IntoIterator<Item = String>) -> Self {
        let mut log = Self::with_capacity(capacity);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    /// Append a message, evicting the oldest entry when full.
    pub fn push(&mut self, message: impl Into<String>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message.into());
    }

    /// Most recent message, if any.
    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Messages in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ERROR_CAPACITY)
    }
}

// Serialized as a bare array so status snapshots read naturally as JSON.
impl Serialize for ErrorLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

// A bare array carries no bound: a standalone log comes back with the default
// capacity, or its length if longer. `SyncStatus` stores the capacity itself.
impl<'de> Deserialize<'de> for ErrorLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<String>::deserialize(deserializer)?;
        let capacity = DEFAULT_ERROR_CAPACITY.max(entries.len());
        Ok(ErrorLog::from_entries(capacity, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = ErrorLog::with_capacity(3);
        for msg in ["a", "b", "c", "d"] {
            log.push(msg);
        }
        assert_eq!(log.to_vec(), vec!["b", "c", "d"]);
        assert_eq!(log.latest(), Some("d"));
    }

    #[test]
    fn zero_capacity_keeps_one_entry() {
        let mut log = ErrorLog::with_capacity(0);
        log.push("first");
        log.push("second");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.to_vec(), vec!["second"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut log = ErrorLog::default();
        log.push("Sync error: timeout");
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json, serde_json::json!(["Sync error: timeout"]));
    }

    #[test]
    fn from_entries_keeps_newest_within_capacity() {
        let log = ErrorLog::from_entries(2, ["a", "b", "c"].map(String::from));
        assert_eq!(log.capacity(), 2);
        assert_eq!(log.to_vec(), vec!["b", "c"]);
    }

    proptest! {
        #[test]
        fn keeps_most_recent_in_order(
            capacity in 1usize..10,
            messages in proptest::collection::vec("[a-z]{1,6}", 0..40),
        ) {
            let mut log = ErrorLog::with_capacity(capacity);
            for m in &messages {
                log.push(m.clone());
            }
            prop_assert!(log.len() <= capacity);
            let skip = messages.len().saturating_sub(capacity);
            let expected: Vec<String> = messages[skip..].to_vec();
            prop_assert_eq!(log.to_vec(), expected);
        }
    }
}
