//! Folio response cache.
//!
//! A tag-aware, read-through cache for paginated list responses:
//!
//! - **Keys** fold resource identity, pagination, and the serialization
//!   variant together, so differing contexts can never cross-serve.
//! - **Store** populates on miss via a caller-supplied producer, with lazy
//!   TTL expiry and per-key singleflight under concurrent misses.
//! - **Trigger** invalidates whole resources by tag after writes.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `folio.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! list_ttl_secs = 60
//! ```

mod config;
mod keys;
mod lock;
mod store;
mod tags;
mod trigger;

pub use config::CacheConfig;
pub use keys::{KeyError, ListKey};
pub use store::{CacheError, ResponseCache};
pub use tags::TagIndex;
pub use trigger::{AUTHORS_TAG, BOOKS_TAG, CacheTrigger};
