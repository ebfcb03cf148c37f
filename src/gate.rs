//! Locale redirect gate.
//!
//! Runs once per request before any handler. Requests for pages without a
//! locale prefix are redirected to the locale-qualified URL resolved from
//! the request's signals, and the resolved locale is persisted as a
//! preference cookie on the redirect. Asset and API traffic is never
//! redirected.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::i18n::Language;
use crate::locale::{self, LocaleSource};
use crate::server::AppState;

/// Name of the durable locale preference cookie. Readable by client-side
/// code (the language switcher), so it is deliberately not HttpOnly.
pub const LOCALE_COOKIE: &str = "preferred_locale";

/// One year, in seconds.
const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Request header carrying the platform's coarse geolocation country code,
/// when the deployment provides one.
const GEO_COUNTRY_HEADER: &str = "x-geo-country";

/// Paths that must never be locale-redirected: API routes, static assets,
/// and anything with a file extension.
fn is_excluded(path: &str) -> bool {
    path.starts_with("/api")
        || path.starts_with("/assets")
        || path.starts_with("/static")
        || path.starts_with("/images")
        || path == "/favicon.ico"
        || path.contains('.')
}

/// Extract a cookie value from the Cookie header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Build the Set-Cookie value for the locale preference.
fn preference_cookie(language: Language, secure: bool) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; SameSite=Lax{}",
        LOCALE_COOKIE,
        language.code(),
        COOKIE_MAX_AGE_SECS,
        if secure { "; Secure" } else { "" }
    )
}

/// The gate itself, mounted with `middleware::from_fn_with_state`.
///
/// Pages already carrying a locale segment pass through unmodified, with
/// the decision attached as a request extension for downstream handlers.
/// Everything else gets a 307 to the locale-qualified path.
pub async fn locale_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let headers = request.headers();

    let cookie = cookie_value(headers, LOCALE_COOKIE);
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let geo_country = headers.get(GEO_COUNTRY_HEADER).and_then(|v| v.to_str().ok());

    let decision = locale::resolve(&segments, cookie.as_deref(), accept_language, geo_country);

    if decision.source == LocaleSource::Path {
        request.extensions_mut().insert(decision);
        return next.run(request).await;
    }

    let location = match request.uri().query() {
        Some(query) => format!("/{}{}?{}", decision.language.code(), path, query),
        None => format!("/{}{}", decision.language.code(), path),
    };

    debug!(
        "Redirecting {} to {} (locale from {:?})",
        path, location, decision.source
    );

    (
        StatusCode::TEMPORARY_REDIRECT,
        [
            (header::LOCATION, location),
            (
                header::SET_COOKIE,
                preference_cookie(decision.language, state.config.is_production()),
            ),
        ],
    )
        .into_response()
}
