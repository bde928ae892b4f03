//! Author handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use bytes::Bytes;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::{CreateAuthorParams, UpdateAuthorParams};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{AuthorWriteRequest, ListQuery};
use crate::infra::http::state::ApiState;
use crate::infra::http::version::negotiate_version;

fn json_payload(payload: Bytes) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], payload)
}

pub async fn list_authors(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let version = negotiate_version(&headers, state.default_version);
    let page = PageRequest::from_params(query.page, query.limit);

    let payload = state.authors.list_authors(page, version).await?;
    Ok(json_payload(payload))
}

pub async fn author_detail(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state.authors.author_detail(id).await?;
    Ok(json_payload(payload))
}

pub async fn create_author(
    State(state): State<ApiState>,
    Json(payload): Json<AuthorWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .authors
        .create_author(CreateAuthorParams {
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    let location = format!("/api/authors/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [
            (header::LOCATION, location),
            (header::CONTENT_TYPE, "application/json".to_string()),
        ],
        created.payload,
    ))
}

pub async fn update_author(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AuthorWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .authors
        .update_author(UpdateAuthorParams {
            id,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_author(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.authors.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
