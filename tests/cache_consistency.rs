//! Cache invalidation tests across the write paths.
//!
//! Every mutation must clear the list pages a prior read created: the cache
//! stores and invalidates under the same canonical tag per resource, so a
//! list read after any create, update, or delete goes back to the repository.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio::application::authors::AuthorService;
use folio::application::books::BookService;
use folio::application::pagination::PageRequest;
use folio::application::repos::{
    AuthorsRepo, BooksRepo, CreateAuthorParams, CreateBookParams, RepoError, UpdateAuthorParams,
    UpdateBookParams,
};
use folio::application::serializer::ApiVersion;
use folio::cache::{CacheConfig, CacheTrigger, ResponseCache};
use folio::domain::entities::{AuthorRecord, BookRecord};
use folio::infra::memory::{MemoryCatalog, seed_fixtures};
use uuid::Uuid;

/// Wraps the in-memory catalog and counts list queries, so a test can tell a
/// cache hit from a repository round trip.
struct CountingCatalog {
    inner: MemoryCatalog,
    book_list_queries: AtomicUsize,
    author_list_queries: AtomicUsize,
}

impl CountingCatalog {
    fn new(inner: MemoryCatalog) -> Self {
        Self {
            inner,
            book_list_queries: AtomicUsize::new(0),
            author_list_queries: AtomicUsize::new(0),
        }
    }

    fn book_list_queries(&self) -> usize {
        self.book_list_queries.load(Ordering::SeqCst)
    }

    fn author_list_queries(&self) -> usize {
        self.author_list_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BooksRepo for CountingCatalog {
    async fn list_books(&self, page: PageRequest) -> Result<Vec<BookRecord>, RepoError> {
        self.book_list_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.list_books(page).await
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, RepoError> {
        self.inner.find_book(id).await
    }

    async fn list_books_by_author(&self, author_id: Uuid) -> Result<Vec<BookRecord>, RepoError> {
        self.inner.list_books_by_author(author_id).await
    }

    async fn create_book(&self, params: CreateBookParams) -> Result<BookRecord, RepoError> {
        self.inner.create_book(params).await
    }

    async fn update_book(&self, params: UpdateBookParams) -> Result<BookRecord, RepoError> {
        self.inner.update_book(params).await
    }

    async fn delete_book(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete_book(id).await
    }
}

#[async_trait]
impl AuthorsRepo for CountingCatalog {
    async fn list_authors(&self, page: PageRequest) -> Result<Vec<AuthorRecord>, RepoError> {
        self.author_list_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.list_authors(page).await
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        self.inner.find_author(id).await
    }

    async fn create_author(&self, params: CreateAuthorParams) -> Result<AuthorRecord, RepoError> {
        self.inner.create_author(params).await
    }

    async fn update_author(&self, params: UpdateAuthorParams) -> Result<AuthorRecord, RepoError> {
        self.inner.update_author(params).await
    }

    async fn delete_author(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete_author(id).await
    }
}

struct Harness {
    catalog: Arc<CountingCatalog>,
    books: BookService,
    authors: AuthorService,
}

async fn harness_with_ttl(list_ttl: Option<Duration>) -> Harness {
    let inner = MemoryCatalog::new();
    seed_fixtures(&inner).await.expect("seeded catalog");
    let catalog = Arc::new(CountingCatalog::new(inner));

    let cache = Arc::new(ResponseCache::new(CacheConfig::default()));
    let trigger = CacheTrigger::new(cache.clone());

    let books_repo: Arc<dyn BooksRepo> = catalog.clone();
    let authors_repo: Arc<dyn AuthorsRepo> = catalog.clone();

    Harness {
        catalog,
        books: BookService::new(
            books_repo.clone(),
            authors_repo.clone(),
            cache.clone(),
            trigger.clone(),
            list_ttl,
        ),
        authors: AuthorService::new(authors_repo, books_repo, cache, trigger, list_ttl),
    }
}

async fn harness() -> Harness {
    harness_with_ttl(None).await
}

impl Harness {
    async fn read_books(&self) -> bytes::Bytes {
        self.books
            .list_books(PageRequest::default(), ApiVersion::V1)
            .await
            .expect("book list read")
    }

    async fn read_authors(&self) -> bytes::Bytes {
        self.authors
            .list_authors(PageRequest::default(), ApiVersion::V1)
            .await
            .expect("author list read")
    }

    async fn any_book(&self) -> BookRecord {
        self.catalog
            .inner
            .list_books(PageRequest::default())
            .await
            .expect("book page")
            .into_iter()
            .next()
            .expect("seeded book")
    }

    async fn any_author(&self) -> AuthorRecord {
        self.catalog
            .inner
            .list_authors(PageRequest::default())
            .await
            .expect("author page")
            .into_iter()
            .next()
            .expect("seeded author")
    }
}

#[tokio::test]
async fn repeated_list_reads_are_served_from_cache() {
    let h = harness().await;

    let first = h.read_books().await;
    let second = h.read_books().await;

    assert_eq!(first, second);
    assert_eq!(h.catalog.book_list_queries(), 1);
}

#[tokio::test]
async fn creating_a_book_invalidates_cached_book_lists() {
    let h = harness().await;

    h.read_books().await;
    h.books
        .create_book(
            CreateBookParams {
                title: "New arrival".to_string(),
                cover_text: String::new(),
                comment: None,
                author_id: None,
            },
            ApiVersion::V1,
        )
        .await
        .expect("created book");
    h.read_books().await;

    assert_eq!(h.catalog.book_list_queries(), 2);
}

#[tokio::test]
async fn updating_a_book_invalidates_cached_book_lists() {
    let h = harness().await;
    let book = h.any_book().await;

    h.read_books().await;
    h.books
        .update_book(UpdateBookParams {
            id: book.id,
            title: "Retitled".to_string(),
            cover_text: book.cover_text.clone(),
            comment: book.comment.clone(),
            author_id: book.author_id,
        })
        .await
        .expect("updated book");
    h.read_books().await;

    assert_eq!(h.catalog.book_list_queries(), 2);
}

#[tokio::test]
async fn deleting_a_book_invalidates_cached_book_lists() {
    let h = harness().await;
    let book = h.any_book().await;

    h.read_books().await;
    h.books.delete_book(book.id).await.expect("deleted book");
    h.read_books().await;

    assert_eq!(h.catalog.book_list_queries(), 2);
}

#[tokio::test]
async fn book_writes_leave_cached_author_lists_alone() {
    let h = harness().await;

    h.read_authors().await;
    h.books
        .create_book(
            CreateBookParams {
                title: "New arrival".to_string(),
                cover_text: String::new(),
                comment: None,
                author_id: None,
            },
            ApiVersion::V1,
        )
        .await
        .expect("created book");
    h.read_authors().await;

    assert_eq!(h.catalog.author_list_queries(), 1);
}

#[tokio::test]
async fn author_writes_invalidate_cached_author_lists() {
    let h = harness().await;
    let author = h.any_author().await;

    h.read_authors().await;
    h.authors
        .create_author(CreateAuthorParams {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
        })
        .await
        .expect("created author");
    h.read_authors().await;

    h.authors
        .update_author(UpdateAuthorParams {
            id: author.id,
            first_name: "Renamed".to_string(),
            last_name: author.last_name.clone(),
        })
        .await
        .expect("updated author");
    h.read_authors().await;

    assert_eq!(h.catalog.author_list_queries(), 3);
}

#[tokio::test]
async fn deleting_an_author_invalidates_both_resources() {
    let h = harness().await;
    let author = h.any_author().await;

    h.read_books().await;
    h.read_authors().await;

    h.authors
        .delete_author(author.id)
        .await
        .expect("deleted author");

    h.read_books().await;
    h.read_authors().await;

    assert_eq!(h.catalog.book_list_queries(), 2);
    assert_eq!(h.catalog.author_list_queries(), 2);
}

#[tokio::test]
async fn invalidation_covers_every_cached_page_of_the_resource() {
    let h = harness().await;

    for page in 1..=3u32 {
        h.books
            .list_books(PageRequest::from_params(Some(page), Some(3)), ApiVersion::V1)
            .await
            .expect("page read");
    }
    assert_eq!(h.catalog.book_list_queries(), 3);

    h.books
        .create_book(
            CreateBookParams {
                title: "New arrival".to_string(),
                cover_text: String::new(),
                comment: None,
                author_id: None,
            },
            ApiVersion::V1,
        )
        .await
        .expect("created book");

    for page in 1..=3u32 {
        h.books
            .list_books(PageRequest::from_params(Some(page), Some(3)), ApiVersion::V1)
            .await
            .expect("page re-read");
    }
    assert_eq!(h.catalog.book_list_queries(), 6);
}

#[tokio::test]
async fn versions_are_cached_independently_and_never_cross_serve() {
    let h = harness().await;

    let v1 = h
        .books
        .list_books(PageRequest::default(), ApiVersion::V1)
        .await
        .expect("v1 read");
    let v2 = h
        .books
        .list_books(PageRequest::default(), ApiVersion::V2)
        .await
        .expect("v2 read");

    assert_ne!(v1, v2, "versioned payloads must differ");
    assert_eq!(h.catalog.book_list_queries(), 2);

    // Both versions are now warm.
    h.books
        .list_books(PageRequest::default(), ApiVersion::V1)
        .await
        .expect("v1 re-read");
    h.books
        .list_books(PageRequest::default(), ApiVersion::V2)
        .await
        .expect("v2 re-read");
    assert_eq!(h.catalog.book_list_queries(), 2);
}

#[tokio::test(start_paused = true)]
async fn lists_expire_after_the_configured_ttl() {
    let h = harness_with_ttl(Some(Duration::from_secs(60))).await;

    h.read_books().await;
    tokio::time::advance(Duration::from_secs(61)).await;
    h.read_books().await;

    assert_eq!(h.catalog.book_list_queries(), 2);
}
