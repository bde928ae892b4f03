//! Book handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use bytes::Bytes;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::{CreateBookParams, UpdateBookParams};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{BookWriteRequest, ListQuery};
use crate::infra::http::state::ApiState;
use crate::infra::http::version::negotiate_version;

fn json_payload(payload: Bytes) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], payload)
}

pub async fn list_books(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let version = negotiate_version(&headers, state.default_version);
    let page = PageRequest::from_params(query.page, query.limit);

    let payload = state.books.list_books(page, version).await?;
    Ok(json_payload(payload))
}

pub async fn book_detail(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let version = negotiate_version(&headers, state.default_version);

    let payload = state.books.book_detail(id, version).await?;
    Ok(json_payload(payload))
}

pub async fn create_book(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(payload): Json<BookWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let version = negotiate_version(&headers, state.default_version);

    let created = state
        .books
        .create_book(
            CreateBookParams {
                title: payload.title,
                cover_text: payload.cover_text,
                comment: payload.comment,
                author_id: payload.author_id,
            },
            version,
        )
        .await?;

    let location = format!("/api/books/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [
            (header::LOCATION, location),
            (header::CONTENT_TYPE, "application/json".to_string()),
        ],
        created.payload,
    ))
}

pub async fn update_book(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .books
        .update_book(UpdateBookParams {
            id,
            title: payload.title,
            cover_text: payload.cover_text,
            comment: payload.comment,
            author_id: payload.author_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_book(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.books.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
