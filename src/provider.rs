use crate::config::Config;
use crate::i18n::Language;
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wire request for the external translation provider.
#[derive(Debug, Serialize)]
struct ProviderRequest<'a> {
    texts: &'a [&'a str],
    source: &'static str,
    target: &'static str,
}

/// Wire response from the external translation provider.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    translations: Vec<String>,
}

/// HTTP client for the external translation service.
///
/// The provider is opaque: it receives texts plus a language pair and
/// returns translated texts in the same order. One logical translate
/// operation maps to one POST, retried only on transient failures.
pub struct ProviderClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ProviderClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.provider_timeout_secs))
            .build()
            .context("Failed to create provider HTTP client")?;

        Ok(Self {
            client,
            api_url: config.provider_api_url.trim_end_matches('/').to_string(),
            api_key: config.provider_api_key.clone(),
        })
    }

    /// Translate a batch of texts in one provider round-trip.
    ///
    /// The returned vector has exactly the same length and order as `texts`;
    /// a response of any other length is treated as malformed and surfaced
    /// as an error.
    pub async fn translate(
        &self,
        texts: &[&str],
        source: Language,
        target: Language,
    ) -> Result<Vec<String>> {
        let request = ProviderRequest {
            texts,
            source: source.code(),
            target: target.code(),
        };

        let translations = with_retry_if(
            &RetryConfig::provider_call(),
            &format!("Translation to {}", target.name()),
            || async {
                let response = self
                    .client
                    .post(format!("{}/translate", self.api_url))
                    .header("Authorization", format!("Bearer {}", self.api_key))
                    .json(&request)
                    .send()
                    .await
                    .context("Failed to send request to translation provider")?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                    anyhow::bail!("Translation provider error ({}): {}", status, body);
                }

                let parsed: ProviderResponse = response
                    .json()
                    .await
                    .context("Failed to parse translation provider response")?;

                if parsed.translations.len() != texts.len() {
                    anyhow::bail!(
                        "Translation provider returned {} translations for {} texts",
                        parsed.translations.len(),
                        texts.len()
                    );
                }

                Ok(parsed.translations)
            },
            is_retryable_error,
        )
        .await?;

        debug!(
            "Provider translated {} text(s) {} -> {}",
            texts.len(),
            source.code(),
            target.code()
        );

        Ok(translations)
    }

    /// Probe the provider's health endpoint. Used by operational checks
    /// only, never on the request-serving path.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Determine if an error is retryable (5xx errors, 429 rate limit, network
/// errors). Other 4xx client errors should not be retried.
fn is_retryable_error(error: &anyhow::Error) -> bool {
    let error_str = error.to_string();

    // Error format: "Translation provider error (400 Bad Request): ..."
    if error_str.contains("Translation provider error") {
        if let Some(start) = error_str.find('(') {
            if let Some(end) = error_str[start..].find(')') {
                let status_str = &error_str[start + 1..start + end];
                // Extract just the numeric status code (e.g., "400" from "400 Bad Request")
                let status_num = status_str.split_whitespace().next().unwrap_or("");
                if let Ok(status) = status_num.parse::<u16>() {
                    // Retry 429 (rate limit) and 5xx errors
                    // Don't retry other 4xx errors (400, 401, 403, etc.)
                    return status == 429 || status >= 500;
                }
            }
        }
    }

    // Retry network errors, timeouts, and other transient failures
    true
}
