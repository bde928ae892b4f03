use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BookWriteRequest {
    pub title: String,
    #[serde(default)]
    pub cover_text: String,
    pub comment: Option<String>,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorWriteRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}
