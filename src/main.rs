use std::{process, sync::Arc};

use folio::{
    application::{
        authors::AuthorService,
        books::BookService,
        error::AppError,
        repos::{AuthorsRepo, BooksRepo},
    },
    cache::{CacheConfig, CacheTrigger, ResponseCache},
    config,
    infra::{
        error::InfraError,
        http::{self, ApiState},
        memory::{MemoryCatalog, seed_fixtures},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let catalog = Arc::new(MemoryCatalog::new());
    if settings.fixtures.seed_on_startup {
        seed_fixtures(&catalog).await.map_err(AppError::from)?;
        info!(target = "folio::bootstrap", "Seeded demo catalog");
    }

    let cache_config = CacheConfig::from(&settings.cache);
    let list_ttl = cache_config.list_ttl();
    let cache = Arc::new(ResponseCache::new(cache_config));
    let trigger = CacheTrigger::new(cache.clone());

    let books_repo: Arc<dyn BooksRepo> = catalog.clone();
    let authors_repo: Arc<dyn AuthorsRepo> = catalog.clone();

    let books = Arc::new(BookService::new(
        books_repo.clone(),
        authors_repo.clone(),
        cache.clone(),
        trigger.clone(),
        list_ttl,
    ));
    let authors = Arc::new(AuthorService::new(
        authors_repo,
        books_repo,
        cache,
        trigger,
        list_ttl,
    ));

    let state = ApiState {
        authors,
        books,
        default_version: settings.api.default_version,
    };
    let router = http::build_router(state);

    let addr = settings
        .server
        .bind_addr()
        .map_err(|err| AppError::unexpected(err.to_string()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(target = "folio::bootstrap", addr = %addr, "Serving catalog API");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
