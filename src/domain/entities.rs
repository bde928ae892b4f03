//! Domain entities mirrored from the catalog store.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub cover_text: String,
    /// Librarian's note; only exposed from API version 2 onwards.
    pub comment: Option<String>,
    pub author_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}
