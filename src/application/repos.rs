//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{AuthorRecord, BookRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateAuthorParams {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateAuthorParams {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct CreateBookParams {
    pub title: String,
    pub cover_text: String,
    pub comment: Option<String>,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct UpdateBookParams {
    pub id: Uuid,
    pub title: String,
    pub cover_text: String,
    pub comment: Option<String>,
    pub author_id: Option<Uuid>,
}

#[async_trait]
pub trait AuthorsRepo: Send + Sync {
    /// Page of authors ordered by creation time, then id.
    async fn list_authors(&self, page: PageRequest) -> Result<Vec<AuthorRecord>, RepoError>;

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError>;

    async fn create_author(&self, params: CreateAuthorParams) -> Result<AuthorRecord, RepoError>;

    async fn update_author(&self, params: UpdateAuthorParams) -> Result<AuthorRecord, RepoError>;

    /// Deletes the author and, cascading, every book attributed to them.
    async fn delete_author(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait BooksRepo: Send + Sync {
    /// Page of books ordered by creation time, then id.
    async fn list_books(&self, page: PageRequest) -> Result<Vec<BookRecord>, RepoError>;

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, RepoError>;

    /// All books attributed to an author, in listing order.
    async fn list_books_by_author(&self, author_id: Uuid) -> Result<Vec<BookRecord>, RepoError>;

    async fn create_book(&self, params: CreateBookParams) -> Result<BookRecord, RepoError>;

    async fn update_book(&self, params: UpdateBookParams) -> Result<BookRecord, RepoError>;

    async fn delete_book(&self, id: Uuid) -> Result<(), RepoError>;
}
