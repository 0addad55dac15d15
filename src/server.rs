//! HTTP surface of the site.
//!
//! JSON endpoints for the rendering layer: page contexts resolved from the
//! request path, the contact form, and a few operational routes.

use crate::contact::{validate, ContactError, RawFormFields};
use crate::i18n::{resolve_optional_locale, Direction, Locale, LocaleRegistry, TranslationStore};
use crate::routing::{
    alternate_paths, localized_path, resolve_path, switch_locale_path, Page, Route, RouteError,
};
use crate::security::has_valid_api_key;
use crate::transport::ContactTransport;
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared, read-only request state.
#[derive(Debug)]
pub struct AppState {
    pub store: Arc<TranslationStore>,
    pub transport: ContactTransport,
    pub admin_api_key: Option<String>,
}

type SharedState = Arc<AppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/locales", get(locales))
        .route("/api/metrics", get(metrics))
        .route("/api/contact", post(contact))
        .fallback(page)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve the site on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .await
        .context("HTTP server failed")
}

// ==================== Operational Routes ====================

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct LocaleSummary {
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    dir: Direction,
    is_default: bool,
}

async fn locales() -> Json<Vec<LocaleSummary>> {
    let locales = LocaleRegistry::get()
        .list()
        .into_iter()
        .map(|config| LocaleSummary {
            code: config.code,
            name: config.name,
            native_name: config.native_name,
            dir: config.direction(),
            is_default: config.is_default,
        })
        .collect();
    Json(locales)
}

async fn metrics(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(expected) = state.admin_api_key.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !has_valid_api_key(&headers, expected) {
        warn!("Rejected metrics request with invalid API key");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let coverage: BTreeMap<&str, serde_json::Value> = state
        .store
        .coverage()
        .into_iter()
        .map(|(locale, report)| {
            (
                locale.code(),
                json!({ "errors": report.errors.len(), "warnings": report.warnings.len() }),
            )
        })
        .collect();

    Json(json!({
        "lookups": state.store.metrics().report(),
        "coverage": coverage,
    }))
    .into_response()
}

// ==================== Contact Form ====================

async fn contact(
    State(state): State<SharedState>,
    payload: Result<Json<RawFormFields>, JsonRejection>,
) -> Response {
    let store = &state.store;

    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            warn!("Rejected malformed contact payload: {}", rejection.body_text());
            let locale = store.default_locale();
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": store.translate(locale, "contact.failure"),
                })),
            )
                .into_response();
        }
    };

    // Messages follow the submitted language when it is usable.
    let locale = resolve_optional_locale(raw.language.as_deref()).unwrap_or_default();

    match validate(&raw) {
        Ok(submission) => match state.transport.deliver(&submission).await {
            Ok(()) => {
                let message = store.translate_with(
                    submission.language,
                    "contact.success",
                    &[("name", submission.name.as_str())],
                );
                success(message)
            }
            Err(e) => {
                error!("Contact delivery failed: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "success": false,
                        "message": store.translate(submission.language, "contact.failure"),
                    })),
                )
                    .into_response()
            }
        },
        Err(ContactError::Honeypot) => {
            info!("Discarded contact submission with filled honeypot");
            let name = raw.name.as_deref().unwrap_or_default().trim();
            success(store.translate_with(locale, "contact.success", &[("name", name)]))
        }
        Err(ContactError::Fields(errors)) => {
            info!(
                "Contact submission rejected: {} invalid field(s)",
                errors.len()
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "success": false,
                    "errors": errors.localized(store, locale),
                })),
            )
                .into_response()
        }
    }
}

fn success(message: String) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": message })),
    )
        .into_response()
}

// ==================== Pages ====================

#[derive(Debug, Serialize)]
struct AlternateLink {
    locale: Locale,
    path: String,
}

#[derive(Debug, Serialize)]
struct PageContext {
    locale: Locale,
    dir: Direction,
    lang: &'static str,
    og_locale: &'static str,
    font: &'static str,
    page: Page,
    path: String,
    title: String,
    alternates: Vec<AlternateLink>,
    switch_to: Option<AlternateLink>,
    messages: BTreeMap<String, String>,
}

fn page_context(store: &TranslationStore, route: Route, path: &str) -> PageContext {
    let Route { locale, page } = route;
    let config = locale.config();

    let alternates = alternate_paths(page)
        .into_iter()
        .map(|(locale, path)| AlternateLink { locale, path })
        .collect();

    // First other locale; with two locales this is the language switcher.
    let switch_to = Locale::all()
        .into_iter()
        .find(|other| *other != locale)
        .map(|other| AlternateLink {
            locale: other,
            path: switch_locale_path(path, other),
        });

    PageContext {
        locale,
        dir: locale.direction(),
        lang: locale.code(),
        og_locale: config.og_locale,
        font: config.font_family,
        page,
        path: path.to_string(),
        title: store.translate(locale, page.title_key()).to_string(),
        alternates,
        switch_to,
        messages: store.resolved_messages(locale),
    }
}

async fn page(State(state): State<SharedState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = uri.path();
    match resolve_path(path) {
        Ok(route) => Json(page_context(&state.store, route, path)).into_response(),
        Err(e) => not_found(&state.store, &e),
    }
}

fn not_found(store: &TranslationStore, error: &RouteError) -> Response {
    let locale = error.render_locale();
    info!(locale = %locale, "Not found: {}", error);

    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "locale": locale,
            "dir": locale.direction(),
            "lang": locale.code(),
            "title": store.translate(locale, "notFound.title"),
            "description": store.translate(locale, "notFound.description"),
            "back": {
                "label": store.translate(locale, "notFound.back"),
                "path": localized_path("/", locale),
            },
        })),
    )
        .into_response()
}
