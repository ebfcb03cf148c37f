//! Integration tests for the locale gateway HTTP surface.
//!
//! These tests spawn the real router on an ephemeral port, stub the
//! external translation provider with wiremock, and drive requests with a
//! redirect-disabled reqwest client so the gate's 307s can be observed.

use std::sync::Arc;

use listing_locale_gateway::config::Config;
use listing_locale_gateway::server::{self, AppState};
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

// ==================== Test Helpers ====================

fn test_config(provider_url: &str, api_key: Option<&str>) -> Config {
    Config {
        environment: "test".to_string(),
        port: 0,
        provider_api_url: provider_url.to_string(),
        provider_api_key: "test-provider-key".to_string(),
        provider_timeout_secs: 5,
        cache_capacity: 64,
        api_key: api_key.map(|k| k.to_string()),
    }
}

/// Spawn the gateway against the given provider URL; returns its base URL.
async fn spawn_app(provider_url: &str, api_key: Option<&str>) -> String {
    let state = Arc::new(AppState::new(test_config(provider_url, api_key)).expect("state"));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    format!("http://{}", addr)
}

/// A client that does not follow redirects, so 307s are observable.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build client")
}

fn translations_body(translations: &[&str]) -> serde_json::Value {
    serde_json::json!({ "translations": translations })
}

// ==================== Translate Endpoint Tests ====================

#[tokio::test]
async fn translate_text_success() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translations_body(&["House"])))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Տուն", "targetLanguage": "en"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["translation"], "House");
    assert_eq!(body["degraded"], false);
}

#[tokio::test]
async fn translate_text_missing_target_language_is_400() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Տուն"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("targetLanguage"));
}

#[tokio::test]
async fn translate_text_unsupported_language_is_400() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Տուն", "targetLanguage": "de"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert!(body["error"].as_str().unwrap().contains("de"));
}

#[tokio::test]
async fn translate_text_same_language_skips_provider() {
    let provider = MockServer::start().await;
    // Any provider traffic fails this expectation on drop
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translations_body(&[])))
        .expect(0)
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({
            "text": "Տուն",
            "sourceLanguage": "hy",
            "targetLanguage": "hy"
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["translation"], "Տուն");
    assert_eq!(body["degraded"], false);
}

#[tokio::test]
async fn translate_text_provider_failure_degrades_to_source() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Տուն", "targetLanguage": "ru"}))
        .send()
        .await
        .expect("request");

    // Provider failure is not a request failure
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["translation"], "Տուն");
    assert_eq!(body["degraded"], true);
}

// ==================== Batch Endpoint Tests ====================

#[tokio::test]
async fn translate_batch_preserves_order_and_passes_empty_through() {
    let provider = MockServer::start().await;
    // Only the two non-empty texts reach the provider
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(
            serde_json::json!({"texts": ["Տուն", "Այգի"]}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(translations_body(&["House", "Garden"])),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate/batch", base))
        .json(&serde_json::json!({
            "texts": ["Տուն", "", "Այգի"],
            "targetLanguage": "en"
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(
        body["translations"],
        serde_json::json!(["House", "", "Garden"])
    );
    assert_eq!(body["degraded"], false);
}

#[tokio::test]
async fn translate_batch_missing_texts_is_400() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate/batch", base))
        .json(&serde_json::json!({"targetLanguage": "en"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert!(body["error"].as_str().unwrap().contains("texts"));
}

// ==================== Property Endpoint Tests ====================

fn sample_property() -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "title": "Տուն Երևանում",
        "description": "Լավ վիճակում",
        "price": 250000,
        "area": 120.5,
        "listing_type": "sale",
        "details": {
            "property_type": "house",
            "bedrooms": 3,
            "bathrooms": 2
        },
        "city": { "id": 1, "name": "Yerevan" },
        "images": [
            { "id": 9, "url": "https://img.example.com/9.jpg", "caption": "Խոհանոց" }
        ]
    })
}

#[tokio::test]
async fn translate_property_translates_text_and_preserves_structure() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translations_body(&[
            "House in Yerevan",
            "In good condition",
            "Kitchen",
        ])))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate/property", base))
        .json(&serde_json::json!({
            "property": sample_property(),
            "targetLanguage": "en"
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["degraded"], false);

    let property = &body["property"];
    assert_eq!(property["title"], "House in Yerevan");
    assert_eq!(property["description"], "In good condition");
    assert_eq!(property["images"][0]["caption"], "Kitchen");

    // Non-text fields are byte-identical to the input
    assert_eq!(property["price"], 250000);
    assert_eq!(property["area"], 120.5);
    assert_eq!(property["city"], serde_json::json!({"id": 1, "name": "Yerevan"}));
    assert_eq!(property["details"]["bedrooms"], 3);
    assert_eq!(property["images"][0]["url"], "https://img.example.com/9.jpg");
}

#[tokio::test]
async fn translate_property_provider_failure_returns_source_record() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate/property", base))
        .json(&serde_json::json!({
            "property": sample_property(),
            "targetLanguage": "en"
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["degraded"], true);
    // Record comes back complete, in source language
    assert_eq!(body["property"]["title"], "Տուն Երևանում");
    assert_eq!(body["property"]["price"], 250000);
}

#[tokio::test]
async fn translate_property_missing_property_is_400() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .post(format!("{}/api/translate/property", base))
        .json(&serde_json::json!({"targetLanguage": "en"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
}

// ==================== Health & Languages Tests ====================

#[tokio::test]
async fn health_reports_provider_and_cache() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/api/translate/health", base))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["providerReachable"], true);
    assert!(body["cacheSize"].is_u64());
    assert!(body["metrics"]["cacheHitRate"].is_number());
    assert!(body["checkedAt"].is_string());
}

#[tokio::test]
async fn languages_lists_the_three_locales() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/api/languages", base))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    let codes: Vec<&str> = body["languages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["hy", "en", "ru"]);
    assert_eq!(body["languages"][0]["nativeName"], "Հայերեն");
}

// ==================== Locale Gate Tests ====================

#[tokio::test]
async fn bare_page_path_redirects_to_default_locale_and_sets_cookie() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/properties", base))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/hy/properties"
    );

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("cookie set on redirect")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("preferred_locale=hy"));
    assert!(cookie.contains("Max-Age=31536000"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("HttpOnly"));
    // Test environment is not production
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn redirect_honors_accept_language_header() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/properties", base))
        .header("accept-language", "ru-RU,ru;q=0.9")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/ru/properties"
    );
}

#[tokio::test]
async fn redirect_prefers_cookie_over_header() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/properties", base))
        .header("cookie", "preferred_locale=ru")
        .header("accept-language", "hy-AM")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/ru/properties"
    );
}

#[tokio::test]
async fn redirect_honors_geo_country() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/properties", base))
        .header("x-geo-country", "KZ")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/ru/properties"
    );
}

#[tokio::test]
async fn redirect_preserves_query_string() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/properties?page=2&sort=price", base))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 307);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/hy/properties?page=2&sort=price"
    );
}

#[tokio::test]
async fn locale_prefixed_path_passes_through() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/en/properties", base))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["locale"], "en");
    assert_eq!(body["path"], "/en/properties");
}

#[tokio::test]
async fn api_paths_are_never_redirected() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/api/translate/health", base))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn asset_paths_are_never_redirected() {
    let provider = MockServer::start().await;
    let base = spawn_app(&provider.uri(), None).await;

    let response = client()
        .get(format!("{}/robots.txt", base))
        .send()
        .await
        .expect("request");

    // Not redirected; nothing serves it either
    assert_eq!(response.status(), 404);
}

// ==================== Auth Tests ====================

#[tokio::test]
async fn translate_requires_api_key_when_configured() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(translations_body(&["House"])))
        .mount(&provider)
        .await;

    let base = spawn_app(&provider.uri(), Some("sekrit")).await;

    let denied = client()
        .post(format!("{}/api/translate", base))
        .json(&serde_json::json!({"text": "Տուն", "targetLanguage": "en"}))
        .send()
        .await
        .expect("request");
    assert_eq!(denied.status(), 401);

    let allowed = client()
        .post(format!("{}/api/translate", base))
        .header("x-api-key", "sekrit")
        .json(&serde_json::json!({"text": "Տուն", "targetLanguage": "en"}))
        .send()
        .await
        .expect("request");
    assert_eq!(allowed.status(), 200);
}
