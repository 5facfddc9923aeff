//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route resolution, body limits,
//! flash cookie handling, dispatch to controllers and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, StatusCode};

use super::urls::{self, Outcome};
use crate::config::{AppState, HealthConfig};
use crate::http::{self, flash::FLASH_COOKIE, form, Flash};
use crate::logger::{self, AccessLogEntry};
use crate::views;

/// Application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    ListUrls,
    CreateUrl,
    ShowUrl(i64),
    CheckUrl(i64),
    Liveness,
    Readiness,
}

/// Result of matching a method and path against the routes
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(Route),
    /// The path exists but not for this method; carries the `Allow` value
    MethodNotAllowed(&'static str),
    NotFound,
}

/// Request context encapsulating information needed by controllers
pub struct RequestContext {
    pub query: Option<String>,
    pub is_head: bool,
    /// Notice carried over from the previous response, if any
    pub flash: Option<Flash>,
}

/// Match a request to a route. HEAD is served wherever GET is.
pub fn resolve(method: &Method, path: &str, health: &HealthConfig) -> Resolution {
    let is_read = *method == Method::GET || *method == Method::HEAD;
    let is_post = *method == Method::POST;

    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        if !is_read {
            return Resolution::MethodNotAllowed("GET, HEAD");
        }
        return if path == health.liveness_path {
            Resolution::Found(Route::Liveness)
        } else {
            Resolution::Found(Route::Readiness)
        };
    }

    // "/urls/" routes like "/urls"
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        [""] if is_read => Resolution::Found(Route::Index),
        [""] => Resolution::MethodNotAllowed("GET, HEAD"),
        ["urls"] if is_read => Resolution::Found(Route::ListUrls),
        ["urls"] if is_post => Resolution::Found(Route::CreateUrl),
        ["urls"] => Resolution::MethodNotAllowed("GET, HEAD, POST"),
        ["urls", id] => match id.parse::<i64>() {
            Ok(id) if is_read => Resolution::Found(Route::ShowUrl(id)),
            Ok(_) => Resolution::MethodNotAllowed("GET, HEAD"),
            Err(_) => Resolution::NotFound,
        },
        ["urls", id, "checks"] => match id.parse::<i64>() {
            Ok(id) if is_post => Resolution::Found(Route::CheckUrl(id)),
            Ok(_) => Resolution::MethodNotAllowed("POST"),
            Err(_) => Resolution::NotFound,
        },
        _ => Resolution::NotFound,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.referer = header_string(&parts.headers, "referer");
    entry.user_agent = header_string(&parts.headers, "user-agent");

    let flash_cookie = form::cookie_value(&parts.headers, FLASH_COOKIE);
    let had_flash_cookie = flash_cookie.is_some();
    let ctx = RequestContext {
        query: entry.query.clone(),
        is_head: parts.method == Method::HEAD,
        flash: flash_cookie.as_deref().and_then(Flash::from_cookie),
    };

    let mut response = if let Some(resp) = check_body_size(&parts.headers, state.config.http.max_body_size) {
        resp
    } else {
        match resolve(&parts.method, parts.uri.path(), &state.config.health) {
            Resolution::Found(route) => {
                let outcome = dispatch(route, &ctx, body, &state).await;
                into_response(outcome, &ctx, had_flash_cookie)
            }
            Resolution::MethodNotAllowed(allow) => {
                logger::log_warning(&format!(
                    "Method not allowed: {} {}",
                    parts.method,
                    parts.uri.path()
                ));
                http::build_405_response(allow)
            }
            Resolution::NotFound => not_found_response(ctx.is_head),
        }
    };

    if let Ok(value) = state.config.http.server_name.parse::<HeaderValue>() {
        response.headers_mut().insert("Server", value);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(route: Route, ctx: &RequestContext, body: B, state: &Arc<AppState>) -> Outcome
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match route {
        Route::Index => urls::index(ctx),
        Route::ListUrls => urls::list(state, ctx).await,
        Route::CreateUrl => match read_body(body, state.config.http.max_body_size).await {
            Ok(bytes) => urls::create(state, &bytes).await,
            Err(outcome) => outcome,
        },
        Route::ShowUrl(id) => urls::show(state, ctx, id).await,
        Route::CheckUrl(id) => urls::check(state, id).await,
        Route::Liveness | Route::Readiness => Outcome::Health,
    }
}

/// Collect a request body, enforcing the configured size limit
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Outcome>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body too large (max: {max_body_size} bytes)"
            ));
            Err(Outcome::PayloadTooLarge)
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(Outcome::BadRequest)
        }
    }
}

/// Turn a controller outcome into a response, moving flash notices into cookies
fn into_response(outcome: Outcome, ctx: &RequestContext, had_flash_cookie: bool) -> Response<Full<Bytes>> {
    match outcome {
        Outcome::Page(html) => {
            let response = http::build_html_response(StatusCode::OK, html, ctx.is_head);
            if had_flash_cookie {
                http::with_cookie(response, &Flash::clear_cookie())
            } else {
                response
            }
        }
        Outcome::Redirect { target, flash } => {
            let response = http::build_redirect_response(&target);
            match flash {
                Some(flash) => http::with_cookie(response, &flash.to_set_cookie()),
                None => response,
            }
        }
        Outcome::Health => http::build_health_response("ok"),
        Outcome::NotFound => not_found_response(ctx.is_head),
        Outcome::BadRequest => http::build_400_response("400 Bad Request"),
        Outcome::PayloadTooLarge => http::build_413_response(),
        Outcome::ServerError => http::build_500_response(),
    }
}

fn not_found_response(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(StatusCode::NOT_FOUND, views::not_found_page(), is_head)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &hyper::HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_string(headers: &hyper::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
