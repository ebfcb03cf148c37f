//! HTTP surface of the gateway.
//!
//! Exposes the translate endpoints consumed by the site's rendering
//! components, the operational health/languages endpoints, and the
//! locale-gated page fallback. Provider failures never surface here as
//! error responses; only caller bugs (missing fields, unknown language
//! codes, bad credentials) do.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::gate::locale_gate;
use crate::i18n::{Language, LanguageRegistry, MetricsReport, TranslationMetrics};
use crate::locale::LocaleDecision;
use crate::property::PropertyRecord;
use crate::provider::ProviderClient;
use crate::security::constant_time_compare;
use crate::structured::StructuredTranslator;
use crate::translator::TextTranslator;

/// Shared application state: configuration plus the translator that owns
/// this process's translation cache.
pub struct AppState {
    pub config: Config,
    pub translator: TextTranslator,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let provider = ProviderClient::new(&config)?;
        let translator = TextTranslator::new(provider, config.cache_capacity);
        Ok(Self { config, translator })
    }
}

/// Build the full router: API routes, the locale-gated page fallback, and
/// request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/translate", post(translate_text))
        .route("/api/translate/batch", post(translate_batch))
        .route("/api/translate/property", post(translate_property))
        .route("/api/translate/health", get(health))
        .route("/api/languages", get(languages))
        .fallback(localized_page)
        .layer(middleware::from_fn_with_state(state.clone(), locale_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Error taxonomy ====================

/// Client errors surfaced by the API. Transient provider conditions are
/// handled inside the translator and never appear here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unsupported language code '{0}'; supported codes are hy, en, ru")]
    UnsupportedLanguage(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid or missing API key")]
    Unauthorized,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedLanguage(_) | ApiError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

// ==================== Wire types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextResponse {
    pub success: bool,
    pub translation: String,
    pub degraded: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBatchRequest {
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBatchResponse {
    pub success: bool,
    pub translations: Vec<String>,
    pub degraded: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatePropertyRequest {
    #[serde(default)]
    pub property: Option<PropertyRecord>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatePropertyResponse {
    pub success: bool,
    pub property: PropertyRecord,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub provider_reachable: bool,
    pub cache_size: usize,
    pub metrics: MetricsReport,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    pub success: bool,
    pub languages: Vec<LanguageInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub success: bool,
    pub locale: &'static str,
    pub path: String,
}

// ==================== Helpers ====================

fn parse_target(code: Option<&str>) -> Result<Language, ApiError> {
    let code = code.ok_or(ApiError::MissingField("targetLanguage"))?;
    Language::from_code(code).map_err(|_| ApiError::UnsupportedLanguage(code.to_string()))
}

/// Absent source means the canonical language: listing content is always
/// authored in Armenian.
fn parse_source(code: Option<&str>) -> Result<Language, ApiError> {
    match code {
        Some(code) => {
            Language::from_code(code).map_err(|_| ApiError::UnsupportedLanguage(code.to_string()))
        }
        None => Ok(Language::canonical()),
    }
}

fn check_api_key(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = &state.config.api_key else {
        return Ok(());
    };
    let provided = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if constant_time_compare(provided, expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

// ==================== Handlers ====================

async fn translate_text(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TranslateTextRequest>,
) -> Result<Json<TranslateTextResponse>, ApiError> {
    check_api_key(&state, &headers)?;
    let target = parse_target(request.target_language.as_deref())?;
    let source = parse_source(request.source_language.as_deref())?;
    let text = request.text.ok_or(ApiError::MissingField("text"))?;

    let outcome = state.translator.translate(&text, source, target).await;

    Ok(Json(TranslateTextResponse {
        success: true,
        degraded: outcome.is_fallback(),
        translation: outcome.into_text(),
    }))
}

async fn translate_batch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TranslateBatchRequest>,
) -> Result<Json<TranslateBatchResponse>, ApiError> {
    check_api_key(&state, &headers)?;
    let target = parse_target(request.target_language.as_deref())?;
    let source = parse_source(request.source_language.as_deref())?;
    let texts = request.texts.ok_or(ApiError::MissingField("texts"))?;

    let outcomes = state.translator.translate_batch(&texts, source, target).await;
    let degraded = outcomes.iter().any(|o| o.is_fallback());

    Ok(Json(TranslateBatchResponse {
        success: true,
        translations: outcomes.into_iter().map(|o| o.into_text()).collect(),
        degraded,
    }))
}

async fn translate_property(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TranslatePropertyRequest>,
) -> Result<Json<TranslatePropertyResponse>, ApiError> {
    check_api_key(&state, &headers)?;
    let target = parse_target(request.target_language.as_deref())?;
    let property = request.property.ok_or(ApiError::MissingField("property"))?;

    let structured = StructuredTranslator::new(&state.translator);
    let result = structured.translate_record(&property, target).await;

    Ok(Json(TranslatePropertyResponse {
        success: true,
        degraded: result.is_degraded(),
        property: result.record,
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let provider_reachable = state.translator.test_connection().await;

    Json(HealthResponse {
        success: true,
        provider_reachable,
        cache_size: state.translator.cache_size(),
        metrics: TranslationMetrics::global().report(),
        checked_at: Utc::now(),
    })
}

async fn languages() -> Json<LanguagesResponse> {
    let languages = LanguageRegistry::get()
        .list_enabled()
        .into_iter()
        .map(|config| LanguageInfo {
            code: config.code,
            name: config.name,
            native_name: config.native_name,
        })
        .collect();

    Json(LanguagesResponse {
        success: true,
        languages,
    })
}

/// Hand-off point for the rendering frontend: every locale-prefixed page
/// path lands here with the gate's decision attached. Excluded paths that
/// match no route (stray asset requests) have no decision and 404.
async fn localized_page(
    decision: Option<Extension<LocaleDecision>>,
    uri: Uri,
) -> Response {
    match decision {
        Some(Extension(decision)) => Json(PageContext {
            success: true,
            locale: decision.language.code(),
            path: uri.path().to_string(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
