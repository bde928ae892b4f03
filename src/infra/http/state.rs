use std::sync::Arc;

use crate::application::authors::AuthorService;
use crate::application::books::BookService;
use crate::application::serializer::ApiVersion;

#[derive(Clone)]
pub struct ApiState {
    pub authors: Arc<AuthorService>,
    pub books: Arc<BookService>,
    pub default_version: ApiVersion,
}
