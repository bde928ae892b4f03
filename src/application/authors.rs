//! Author catalog service: cached list reads, invalidating writes.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::pagination::PageRequest;
use crate::application::repos::{AuthorsRepo, BooksRepo, CreateAuthorParams, UpdateAuthorParams};
use crate::application::serializer::{self, ApiVersion, AuthorDto};
use crate::cache::{AUTHORS_TAG, CacheTrigger, ListKey, ResponseCache};
use crate::domain::error::DomainError;

const RESOURCE: &str = "authors";

/// Outcome of a successful create: the new id for the `Location` header and
/// the serialized representation for the response body.
pub struct CreatedAuthor {
    pub id: Uuid,
    pub payload: Bytes,
}

pub struct AuthorService {
    authors: Arc<dyn AuthorsRepo>,
    books: Arc<dyn BooksRepo>,
    cache: Arc<ResponseCache>,
    trigger: CacheTrigger,
    list_ttl: Option<Duration>,
}

impl AuthorService {
    pub fn new(
        authors: Arc<dyn AuthorsRepo>,
        books: Arc<dyn BooksRepo>,
        cache: Arc<ResponseCache>,
        trigger: CacheTrigger,
        list_ttl: Option<Duration>,
    ) -> Self {
        Self {
            authors,
            books,
            cache,
            trigger,
            list_ttl,
        }
    }

    /// Serialized page of authors, read through the response cache.
    ///
    /// Author payloads embed book summaries only; the version dimension is
    /// still part of the key so a future versioned field cannot cross-serve.
    pub async fn list_authors(
        &self,
        page: PageRequest,
        version: ApiVersion,
    ) -> Result<Bytes, AppError> {
        let key = ListKey::new(RESOURCE, page.page(), page.limit(), version.cache_variant())?;
        let producer_key = key.clone();

        self.cache
            .get_or_populate(key.as_str(), &[AUTHORS_TAG], self.list_ttl, move || async move {
                debug!(key = %producer_key, "populating author list page");
                let records = self.authors.list_authors(page).await?;
                let mut dtos = Vec::with_capacity(records.len());
                for record in &records {
                    let books = self.books.list_books_by_author(record.id).await?;
                    dtos.push(AuthorDto::from_record(record, &books));
                }
                serializer::to_payload(&dtos).map_err(AppError::from)
            })
            .await
    }

    /// Serialized single author; not cached, mirroring the list-only cache scope.
    pub async fn author_detail(&self, id: Uuid) -> Result<Bytes, AppError> {
        let author = self.authors.find_author(id).await?.ok_or(AppError::NotFound)?;
        let books = self.books.list_books_by_author(author.id).await?;
        Ok(serializer::to_payload(&AuthorDto::from_record(
            &author, &books,
        ))?)
    }

    pub async fn create_author(&self, params: CreateAuthorParams) -> Result<CreatedAuthor, AppError> {
        validate_first_name(&params.first_name)?;

        let record = self.authors.create_author(params).await?;
        self.trigger.authors_changed()?;

        let payload = serializer::to_payload(&AuthorDto::from_record(&record, &[]))?;
        Ok(CreatedAuthor {
            id: record.id,
            payload,
        })
    }

    pub async fn update_author(&self, params: UpdateAuthorParams) -> Result<(), AppError> {
        validate_first_name(&params.first_name)?;

        self.authors.update_author(params).await?;
        self.trigger.authors_changed()?;
        Ok(())
    }

    /// Deletes the author; the cascade takes their books with them, so both
    /// resources' cached list pages are dropped.
    pub async fn delete_author(&self, id: Uuid) -> Result<(), AppError> {
        self.authors.delete_author(id).await?;
        self.trigger.author_removed()?;
        Ok(())
    }
}

fn validate_first_name(first_name: &str) -> Result<(), AppError> {
    if first_name.trim().is_empty() {
        return Err(DomainError::validation("author first name must not be blank").into());
    }
    Ok(())
}
