use crate::config::db::DB;
use crate::config::AppConfig;
use crate::route::blog_page::{self, not_found_page, server_error_page};
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::fs;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod config;
pub mod errors;
pub mod model;
pub mod presenter;
pub mod route;
pub mod service;
pub mod util;

// Cloning AppState is cheap, the config and the pool sit behind Arc.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DB>,
}

// Application router creation
// Note: The order of layers is important.
pub async fn create_app(state: AppState) -> anyhow::Result<Router> {
    let config = &state.config;

    let static_route = Router::new().nest_service(
        &config.static_url,
        ServeDir::new(config.static_path.clone()).not_found_service(handle_404.into_service()),
    );

    fs::create_dir_all(&config.media.base_path)?;

    let media_route = Router::new().nest_service(
        &config.media.base_url,
        ServeDir::new(config.media.base_path.clone()).not_found_service(handle_404.into_service()),
    );

    // https://docs.rs/axum/latest/axum/middleware/index.html#ordering
    let mut app = Router::new()
        .merge(blog_page::create_routes())
        .merge(static_route)
        .merge(media_route)
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(config.http.max_body_size as usize)),
        );

    if config.log.log_requests {
        app = app.layer(TraceLayer::new_for_http());
    }
    Ok(app.with_state(state))
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = DB::new(&config.db.url, config.db.pool_size).await?;

        Ok(AppState {
            config: Arc::new(config),
            db: Arc::new(db),
        })
    }
}

pub async fn handle_404(_uri: Uri) -> Response {
    not_found_page()
}

async fn handle_405() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

// Custom panic handler, logs the panic and returns a 500 response
fn handle_panic(panic: Box<dyn std::any::Any + Send>) -> Response {
    let panic_message = if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Unknown panic"
    };

    error!("App panicked: {}", panic_message);
    server_error_page()
}
