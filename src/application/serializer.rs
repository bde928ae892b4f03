//! Versioned JSON serialization for API payloads.
//!
//! The negotiated API version changes what a payload contains (v2 exposes the
//! librarian's comment on books), which is why the version is folded into
//! every cache key: two versions of the same page are distinct cache entries.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, BookRecord};

/// Negotiated API version.
///
/// Clients select a version through the `Accept` header media-type parameter,
/// e.g. `application/json; version=2.0`. Unknown or absent versions fall back
/// to the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ApiVersion {
    #[serde(rename = "1.0")]
    V1,
    #[serde(rename = "2.0")]
    V2,
}

impl ApiVersion {
    /// Variant segment used in cache keys for this version.
    pub fn cache_variant(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    /// Parse a `version=` media-type parameter value.
    pub fn parse_param(value: &str) -> Option<Self> {
        match value.trim() {
            "1" | "1.0" => Some(ApiVersion::V1),
            "2" | "2.0" => Some(ApiVersion::V2),
            _ => None,
        }
    }
}

/// Serialize a payload to the opaque bytes handed to the cache.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(value).map(Bytes::from)
}

/// Author as embedded in book payloads: identity only, no book list, so the
/// two resources cannot recurse into each other.
#[derive(Debug, Serialize)]
pub struct AuthorSummaryDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl AuthorSummaryDto {
    pub fn from_record(author: &AuthorRecord) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub cover_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummaryDto>,
}

impl BookDto {
    pub fn from_record(
        book: &BookRecord,
        author: Option<&AuthorRecord>,
        version: ApiVersion,
    ) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            cover_text: book.cover_text.clone(),
            comment: match version {
                ApiVersion::V1 => None,
                ApiVersion::V2 => book.comment.clone(),
            },
            author: author.map(AuthorSummaryDto::from_record),
        }
    }
}

/// Book as embedded in author payloads.
#[derive(Debug, Serialize)]
pub struct BookSummaryDto {
    pub id: Uuid,
    pub title: String,
}

impl BookSummaryDto {
    pub fn from_record(book: &BookRecord) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub books: Vec<BookSummaryDto>,
}

impl AuthorDto {
    pub fn from_record(author: &AuthorRecord, books: &[BookRecord]) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            books: books.iter().map(BookSummaryDto::from_record).collect(),
        }
    }
}
