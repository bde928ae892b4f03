//! Tag index for bulk invalidation.
//!
//! Tracks which cache keys were stored under which tags so that a write to a
//! resource can drop every list page derived from it. The index is plain data;
//! the store mutates it inside its own critical sections, which keeps the
//! entry table and the index consistent without a second lock.

use std::collections::{BTreeSet, HashMap, HashSet};

/// Maps tag → set of keys currently stored under that tag.
///
/// Invariant: a key appears under tag T iff the current entry for that key
/// was created with T in its tag set and has not since been removed. Expired
/// entries stay indexed until they are invalidated or overwritten.
#[derive(Debug, Default)]
pub struct TagIndex {
    keys_by_tag: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` was stored under each tag in `tags`.
    pub fn register(&mut self, key: &str, tags: &BTreeSet<String>) {
        for tag in tags {
            self.keys_by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    /// Drop `key` from every tag in `tags`, pruning emptied tag buckets.
    ///
    /// `tags` must be the full tag set of the entry being removed so the
    /// index stays consistent across all of the entry's tags.
    pub fn unregister(&mut self, key: &str, tags: &BTreeSet<String>) {
        for tag in tags {
            if let Some(keys) = self.keys_by_tag.get_mut(tag.as_str()) {
                keys.remove(key);
                if keys.is_empty() {
                    self.keys_by_tag.remove(tag.as_str());
                }
            }
        }
    }

    /// Union of keys stored under any of the requested tags.
    pub fn keys_for_any(&self, tags: &[&str]) -> HashSet<String> {
        let mut keys = HashSet::new();
        for tag in tags {
            if let Some(tagged) = self.keys_by_tag.get(*tag) {
                keys.extend(tagged.iter().cloned());
            }
        }
        keys
    }

    /// Number of tags with at least one key.
    pub fn tag_count(&self) -> usize {
        self.keys_by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys_by_tag.is_empty()
    }
}
