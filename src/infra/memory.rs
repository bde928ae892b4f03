//! In-memory catalog repositories.
//!
//! Backs the repository traits with process-local maps. Listing collects and
//! sorts by creation time then id, so pagination is deterministic within a
//! process lifetime.

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::{
    AuthorsRepo, BooksRepo, CreateAuthorParams, CreateBookParams, RepoError, UpdateAuthorParams,
    UpdateBookParams,
};
use crate::domain::entities::{AuthorRecord, BookRecord};

#[derive(Default)]
pub struct MemoryCatalog {
    authors: DashMap<Uuid, AuthorRecord>,
    books: DashMap<Uuid, BookRecord>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn authors_in_order(&self) -> Vec<AuthorRecord> {
        let mut records: Vec<AuthorRecord> =
            self.authors.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        records
    }

    fn books_in_order(&self) -> Vec<BookRecord> {
        let mut records: Vec<BookRecord> =
            self.books.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        records
    }
}

fn paginate<T>(records: Vec<T>, page: PageRequest) -> Vec<T> {
    records
        .into_iter()
        .skip(page.offset())
        .take(page.limit() as usize)
        .collect()
}

#[async_trait]
impl AuthorsRepo for MemoryCatalog {
    async fn list_authors(&self, page: PageRequest) -> Result<Vec<AuthorRecord>, RepoError> {
        Ok(paginate(self.authors_in_order(), page))
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        Ok(self.authors.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create_author(&self, params: CreateAuthorParams) -> Result<AuthorRecord, RepoError> {
        let record = AuthorRecord {
            id: Uuid::new_v4(),
            first_name: params.first_name,
            last_name: params.last_name,
            created_at: OffsetDateTime::now_utc(),
        };
        self.authors.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_author(&self, params: UpdateAuthorParams) -> Result<AuthorRecord, RepoError> {
        let mut entry = self.authors.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        entry.first_name = params.first_name;
        entry.last_name = params.last_name;
        Ok(entry.value().clone())
    }

    async fn delete_author(&self, id: Uuid) -> Result<(), RepoError> {
        self.authors.remove(&id).ok_or(RepoError::NotFound)?;
        // Orphan removal: the author's books go with them.
        self.books.retain(|_, book| book.author_id != Some(id));
        Ok(())
    }
}

#[async_trait]
impl BooksRepo for MemoryCatalog {
    async fn list_books(&self, page: PageRequest) -> Result<Vec<BookRecord>, RepoError> {
        Ok(paginate(self.books_in_order(), page))
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, RepoError> {
        Ok(self.books.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_books_by_author(&self, author_id: Uuid) -> Result<Vec<BookRecord>, RepoError> {
        Ok(self
            .books_in_order()
            .into_iter()
            .filter(|book| book.author_id == Some(author_id))
            .collect())
    }

    async fn create_book(&self, params: CreateBookParams) -> Result<BookRecord, RepoError> {
        let record = BookRecord {
            id: Uuid::new_v4(),
            title: params.title,
            cover_text: params.cover_text,
            comment: params.comment,
            author_id: params.author_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.books.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_book(&self, params: UpdateBookParams) -> Result<BookRecord, RepoError> {
        let mut entry = self.books.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        entry.title = params.title;
        entry.cover_text = params.cover_text;
        entry.comment = params.comment;
        entry.author_id = params.author_id;
        Ok(entry.value().clone())
    }

    async fn delete_book(&self, id: Uuid) -> Result<(), RepoError> {
        self.books.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

/// Seed the demo catalog: ten authors and twenty books, attributed round-robin.
pub async fn seed_fixtures(catalog: &MemoryCatalog) -> Result<(), RepoError> {
    let mut authors = Vec::with_capacity(10);
    for i in 0..10 {
        authors.push(
            catalog
                .create_author(CreateAuthorParams {
                    first_name: format!("First name {i}"),
                    last_name: format!("Last name {i}"),
                })
                .await?,
        );
    }

    for i in 0..20 {
        let author = &authors[i % authors.len()];
        catalog
            .create_book(CreateBookParams {
                title: format!("Book {i}"),
                cover_text: format!("Back-cover text number {i}"),
                comment: Some(format!("Librarian's note {i}")),
                author_id: Some(author.id),
            })
            .await?;
    }

    Ok(())
}
