//! HTTP surface for the catalog API.

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod version;

pub use state::ApiState;

use axum::{Router, routing::get};

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/books",
            get(handlers::books::list_books).post(handlers::books::create_book),
        )
        .route(
            "/api/books/{id}",
            get(handlers::books::book_detail)
                .put(handlers::books::update_book)
                .delete(handlers::books::delete_book),
        )
        .route(
            "/api/authors",
            get(handlers::authors::list_authors).post(handlers::authors::create_author),
        )
        .route(
            "/api/authors/{id}",
            get(handlers::authors::author_detail)
                .put(handlers::authors::update_author)
                .delete(handlers::authors::delete_author),
        )
        .with_state(state)
}
