//! Cache invalidation trigger.
//!
//! Write services call the trigger after a successful create, update, or
//! delete so the next list read recomputes. One canonical tag per resource:
//! entries are stored and invalidated under the same constant, never a
//! near-miss spelling of it.

use std::sync::Arc;

use tracing::info;

use super::store::{CacheError, ResponseCache};

/// Canonical tag for cached book list pages.
pub const BOOKS_TAG: &str = "booksCache";
/// Canonical tag for cached author list pages.
pub const AUTHORS_TAG: &str = "authorsCache";

/// Invalidation coordinator held by write-side services.
#[derive(Clone)]
pub struct CacheTrigger {
    cache: Arc<ResponseCache>,
}

impl CacheTrigger {
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self { cache }
    }

    /// Drop every entry stored under any of the given tags.
    pub fn invalidate(&self, tags: &[&str]) -> Result<usize, CacheError> {
        let removed = self.cache.invalidate(tags)?;
        info!(?tags, removed, "cache invalidation triggered");
        Ok(removed)
    }

    /// A book was created, updated, or deleted.
    pub fn books_changed(&self) -> Result<(), CacheError> {
        self.invalidate(&[BOOKS_TAG]).map(|_| ())
    }

    /// An author was created or updated.
    pub fn authors_changed(&self) -> Result<(), CacheError> {
        self.invalidate(&[AUTHORS_TAG]).map(|_| ())
    }

    /// An author was deleted; the cascade removes their books too, so both
    /// resources' list pages are stale.
    pub fn author_removed(&self) -> Result<(), CacheError> {
        self.invalidate(&[AUTHORS_TAG, BOOKS_TAG]).map(|_| ())
    }
}
