//! Folio — a small, self-hosted library-catalog API built around a
//! tag-aware, read-through response cache.
//!
//! Layering follows the dependency direction:
//!
//! - [`domain`] — catalog entities and invariants
//! - [`application`] — repository traits, pagination, versioned
//!   serialization, and the author/book services
//! - [`cache`] — the response cache: keys, store, tag index, trigger
//! - [`infra`] — in-memory repositories, HTTP surface, telemetry
//! - [`config`] — typed settings with file → env → CLI precedence

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
