use crate::errors::AppError;
use crate::service::page_service::{index_page, post_detail_page, tag_filter_page};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
#[cfg(not(debug_assertions))]
use include_dir::{include_dir, Dir};
use minijinja::{context, Environment, Value};
use serde::Serialize;
use tracing::error;

type HtmlResult = Result<Html<String>, HtmlError>;

pub fn create_routes() -> Router<AppState> {
    let mut env = Environment::new();
    load_templates(&mut env);

    Router::new()
        .route("/", get(index))
        .route("/post/{slug}", get(post_detail))
        .route("/tag/{tag_title}", get(tag_filter))
        .route("/contacts", get(contacts))
        .layer(Extension(env))
}

async fn index(
    State(state): State<AppState>,
    Extension(env): Extension<Environment<'static>>,
) -> HtmlResult {
    let page = index_page(&state.db, &state.config).await?;
    render(&env, "index.html", &state, page)
}

async fn post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(env): Extension<Environment<'static>>,
) -> HtmlResult {
    let page = post_detail_page(&state.db, &state.config, &slug).await?;
    render(&env, "post-details.html", &state, page)
}

async fn tag_filter(
    State(state): State<AppState>,
    Path(tag_title): Path<String>,
    Extension(env): Extension<Environment<'static>>,
) -> HtmlResult {
    let page = tag_filter_page(&state.db, &state.config, &tag_title).await?;
    render(&env, "posts-list.html", &state, page)
}

async fn contacts(
    State(state): State<AppState>,
    Extension(env): Extension<Environment<'static>>,
) -> HtmlResult {
    render(&env, "contacts.html", &state, context! {})
}

// Page fields sit at the top level of the template context, next to site-wide values.
fn render<T: Serialize>(env: &Environment, name: &str, state: &AppState, page: T) -> HtmlResult {
    let template = env.get_template(name)?;
    let page = Value::from_serialize(&page);
    Ok(Html(template.render(context! {
        app_name => state.config.app_name,
        static_url => state.config.static_url,
        ..page
    })?))
}

#[derive(Debug)]
pub enum HtmlError {
    NotFound,
    TemplateError(minijinja::Error),
    App(AppError),
}

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        if err.is_not_found() {
            HtmlError::NotFound
        } else {
            HtmlError::App(err)
        }
    }
}

impl From<minijinja::Error> for HtmlError {
    fn from(err: minijinja::Error) -> Self {
        HtmlError::TemplateError(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        match self {
            HtmlError::NotFound => not_found_page(),
            HtmlError::TemplateError(err) => {
                error!("template error: {:?}", err);
                server_error_page()
            }
            HtmlError::App(err) => {
                error!("app error: {:?}", err);
                (err.status(), Html(PAGE_500)).into_response()
            }
        }
    }
}

pub fn not_found_page() -> Response {
    (StatusCode::NOT_FOUND, Html(PAGE_404)).into_response()
}

pub fn server_error_page() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(PAGE_500)).into_response()
}

static PAGE_404: &str = include_str!("../../templates/404.html");
static PAGE_500: &str = include_str!("../../templates/500.html");

#[cfg(not(debug_assertions))]
static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

#[cfg(debug_assertions)]
fn load_templates(env: &mut Environment) {
    use minijinja::path_loader;
    // In development mode, use the file system to load templates in real-time
    env.set_loader(path_loader(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")));
}

#[cfg(not(debug_assertions))]
fn load_templates(env: &mut Environment<'static>) {
    for file in TEMPLATES_DIR.files() {
        if let Some(name) = file.path().to_str() {
            match std::str::from_utf8(file.contents()) {
                Ok(content) => {
                    if let Err(err) = env.add_template(name, content) {
                        error!("failed to add template {}: {}", name, err);
                    }
                }
                Err(_) => error!("template {} is not valid utf-8", name),
            }
        }
    }
}
