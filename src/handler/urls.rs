//! Page controllers
//!
//! Stateless functions: each takes the shared state and request context and
//! returns an `Outcome` for the router to turn into a response.

use std::sync::Arc;

use super::router::RequestContext;
use crate::config::AppState;
use crate::error::{CheckError, RegistryError};
use crate::http::{form, Flash};
use crate::logger;
use crate::registry::SubmitOutcome;
use crate::store;
use crate::views;

pub const MSG_INVALID_URL: &str = "Invalid URL";
pub const MSG_URL_EXISTS: &str = "Page already exists";
pub const MSG_URL_ADDED: &str = "Page successfully added";
pub const MSG_CHECK_OK: &str = "Page successfully checked";
pub const MSG_CHECK_FAILED: &str = "Page does not exist";

/// What a controller wants the router to send back
#[derive(Debug)]
pub enum Outcome {
    /// Rendered HTML page (200)
    Page(String),
    /// 302 to `target`, optionally carrying a notice for the next page
    Redirect { target: String, flash: Option<Flash> },
    Health,
    NotFound,
    BadRequest,
    PayloadTooLarge,
    ServerError,
}

impl Outcome {
    fn redirect(target: impl Into<String>, flash: Flash) -> Self {
        Self::Redirect {
            target: target.into(),
            flash: Some(flash),
        }
    }
}

/// `GET /`
pub fn index(ctx: &RequestContext) -> Outcome {
    Outcome::Page(views::index_page(ctx.flash.as_ref()))
}

/// `GET /urls?page=N`
pub async fn list(state: &Arc<AppState>, ctx: &RequestContext) -> Outcome {
    let page = form::query_value(ctx.query.as_deref(), "page")
        .and_then(|p| p.trim().parse::<u64>().ok())
        .unwrap_or(1);

    let app = Arc::clone(state);
    match store::run_blocking(move || app.registry.list(page)).await {
        Ok(page) => Outcome::Page(views::urls_page(&page, ctx.flash.as_ref())),
        Err(e) => server_error(&e),
    }
}

/// `POST /urls` with form field `url`
pub async fn create(state: &Arc<AppState>, body: &[u8]) -> Outcome {
    let raw = form::form_value(body, "url").unwrap_or_default();

    let app = Arc::clone(state);
    match store::run_blocking(move || app.registry.submit(&raw)).await {
        Ok(SubmitOutcome::Created(_)) => Outcome::redirect("/urls", Flash::success(MSG_URL_ADDED)),
        Ok(SubmitOutcome::AlreadyExists(_)) => {
            Outcome::redirect("/urls", Flash::info(MSG_URL_EXISTS))
        }
        Err(RegistryError::InvalidUrl { input, reason }) => {
            logger::log_debug(&format!("Rejected url '{input}': {reason}"));
            Outcome::redirect("/", Flash::danger(MSG_INVALID_URL))
        }
        Err(e) => server_error(&e),
    }
}

/// `GET /urls/{id}`
pub async fn show(state: &Arc<AppState>, ctx: &RequestContext, id: i64) -> Outcome {
    let app = Arc::clone(state);
    match store::run_blocking(move || app.registry.get(id)).await {
        Ok(details) => Outcome::Page(views::url_page(&details, ctx.flash.as_ref())),
        Err(RegistryError::NotFound(_)) => Outcome::NotFound,
        Err(e) => server_error(&e),
    }
}

/// `POST /urls/{id}/checks`
pub async fn check(state: &Arc<AppState>, id: i64) -> Outcome {
    let target = format!("/urls/{id}");
    match state.checker.check(id).await {
        Ok(_) => Outcome::redirect(target, Flash::success(MSG_CHECK_OK)),
        Err(CheckError::Fetch { .. }) => Outcome::redirect(target, Flash::danger(MSG_CHECK_FAILED)),
        Err(CheckError::NotFound(_)) => Outcome::NotFound,
        Err(e) => server_error(&e),
    }
}

fn server_error(err: &dyn std::error::Error) -> Outcome {
    logger::log_error(&err.to_string());
    Outcome::ServerError
}
