//! Cache key construction.
//!
//! List responses are keyed by resource name, pagination, and the negotiated
//! serialization variant. Every parameter that changes the produced payload
//! must be part of the key; keys built from the same inputs are identical.

use std::fmt;

use thiserror::Error;

/// Key for a cached, paginated list response.
///
/// Renders as `"<resource>List-<page>-<limit>-<variant>"`, e.g.
/// `"booksList-1-3-v2"`. The variant carries any dimension beyond pagination
/// that changes the serialized output (currently the API version).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    rendered: String,
}

impl ListKey {
    /// Build a key from resource identity, pagination, and output variant.
    ///
    /// The resource name and variant must be non-blank and free of `-`, which
    /// is reserved as the key separator; violations are programmer errors and
    /// are rejected immediately.
    pub fn new(resource: &str, page: u32, limit: u32, variant: &str) -> Result<Self, KeyError> {
        validate_segment(resource, "resource")?;
        validate_segment(variant, "variant")?;

        Ok(Self {
            rendered: format!("{resource}List-{page}-{limit}-{variant}"),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

fn validate_segment(value: &str, field: &'static str) -> Result<(), KeyError> {
    if value.trim().is_empty() {
        return Err(KeyError::BlankSegment { field });
    }
    if value.contains('-') {
        return Err(KeyError::ReservedSeparator {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("cache key {field} must not be blank")]
    BlankSegment { field: &'static str },
    #[error("cache key {field} `{value}` must not contain `-`")]
    ReservedSeparator { field: &'static str, value: String },
}
