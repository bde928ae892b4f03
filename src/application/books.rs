//! Book catalog service: cached list reads, invalidating writes.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::pagination::PageRequest;
use crate::application::repos::{AuthorsRepo, BooksRepo, CreateBookParams, UpdateBookParams};
use crate::application::serializer::{self, ApiVersion, BookDto};
use crate::cache::{BOOKS_TAG, CacheTrigger, ListKey, ResponseCache};
use crate::domain::entities::{AuthorRecord, BookRecord};
use crate::domain::error::DomainError;

const RESOURCE: &str = "books";

/// Outcome of a successful create: the new id for the `Location` header and
/// the serialized representation for the response body.
pub struct CreatedBook {
    pub id: Uuid,
    pub payload: Bytes,
}

pub struct BookService {
    books: Arc<dyn BooksRepo>,
    authors: Arc<dyn AuthorsRepo>,
    cache: Arc<ResponseCache>,
    trigger: CacheTrigger,
    list_ttl: Option<Duration>,
}

impl BookService {
    pub fn new(
        books: Arc<dyn BooksRepo>,
        authors: Arc<dyn AuthorsRepo>,
        cache: Arc<ResponseCache>,
        trigger: CacheTrigger,
        list_ttl: Option<Duration>,
    ) -> Self {
        Self {
            books,
            authors,
            cache,
            trigger,
            list_ttl,
        }
    }

    /// Serialized page of books, read through the response cache.
    pub async fn list_books(
        &self,
        page: PageRequest,
        version: ApiVersion,
    ) -> Result<Bytes, AppError> {
        let key = ListKey::new(RESOURCE, page.page(), page.limit(), version.cache_variant())?;
        let producer_key = key.clone();

        self.cache
            .get_or_populate(key.as_str(), &[BOOKS_TAG], self.list_ttl, move || async move {
                debug!(key = %producer_key, "populating book list page");
                let records = self.books.list_books(page).await?;
                let mut dtos = Vec::with_capacity(records.len());
                for record in &records {
                    let author = self.embedded_author(record).await?;
                    dtos.push(BookDto::from_record(record, author.as_ref(), version));
                }
                serializer::to_payload(&dtos).map_err(AppError::from)
            })
            .await
    }

    /// Serialized single book; not cached, mirroring the list-only cache scope.
    pub async fn book_detail(&self, id: Uuid, version: ApiVersion) -> Result<Bytes, AppError> {
        let book = self.books.find_book(id).await?.ok_or(AppError::NotFound)?;
        let author = self.embedded_author(&book).await?;
        let dto = BookDto::from_record(&book, author.as_ref(), version);
        Ok(serializer::to_payload(&dto)?)
    }

    pub async fn create_book(
        &self,
        params: CreateBookParams,
        version: ApiVersion,
    ) -> Result<CreatedBook, AppError> {
        validate_title(&params.title)?;
        let author_id = self.resolve_author(params.author_id).await?;

        let record = self
            .books
            .create_book(CreateBookParams {
                author_id,
                ..params
            })
            .await?;
        self.trigger.books_changed()?;

        let author = self.embedded_author(&record).await?;
        let payload =
            serializer::to_payload(&BookDto::from_record(&record, author.as_ref(), version))?;
        Ok(CreatedBook {
            id: record.id,
            payload,
        })
    }

    pub async fn update_book(&self, params: UpdateBookParams) -> Result<(), AppError> {
        validate_title(&params.title)?;
        let author_id = self.resolve_author(params.author_id).await?;

        self.books
            .update_book(UpdateBookParams {
                author_id,
                ..params
            })
            .await?;
        self.trigger.books_changed()?;
        Ok(())
    }

    pub async fn delete_book(&self, id: Uuid) -> Result<(), AppError> {
        self.books.delete_book(id).await?;
        self.trigger.books_changed()?;
        Ok(())
    }

    async fn embedded_author(&self, book: &BookRecord) -> Result<Option<AuthorRecord>, AppError> {
        match book.author_id {
            Some(id) => Ok(self.authors.find_author(id).await?),
            None => Ok(None),
        }
    }

    /// An unknown author reference stores as no author rather than failing,
    /// matching the repository's nullable attribution.
    async fn resolve_author(&self, author_id: Option<Uuid>) -> Result<Option<Uuid>, AppError> {
        match author_id {
            Some(id) => Ok(self.authors.find_author(id).await?.map(|author| author.id)),
            None => Ok(None),
        }
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("book title must not be blank").into());
    }
    Ok(())
}
