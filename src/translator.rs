use crate::cache::{CacheKey, TranslationCache};
use crate::i18n::{Language, LanguageConfig, LanguageRegistry, TranslationMetrics, TranslationValidator};
use crate::provider::ProviderClient;
use anyhow::Result;
use tracing::warn;

/// Outcome of a translate operation.
///
/// Translation can never fail outright: the caller always receives usable
/// text. The two variants keep a degraded passthrough distinguishable from
/// an actual translation, so rendering code cannot mistake one for the
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Target-language text: from the provider, the cache, or an identity
    /// short-circuit (same language pair, empty input).
    Translated(String),
    /// The provider failed; the source text is passed through unchanged.
    Fallback(String),
}

impl Translation {
    /// The text to render, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            Translation::Translated(t) | Translation::Fallback(t) => t,
        }
    }

    /// Consume the outcome, yielding the text to render.
    pub fn into_text(self) -> String {
        match self {
            Translation::Translated(t) | Translation::Fallback(t) => t,
        }
    }

    /// Whether this is a degraded (untranslated) result.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Translation::Fallback(_))
    }
}

/// Orchestrates text translation against the external provider, consulting
/// and populating the session-scoped cache.
///
/// Owns its `TranslationCache`; construct one translator per serving scope
/// so cached entries never leak across sessions or tests.
pub struct TextTranslator {
    provider: ProviderClient,
    cache: TranslationCache,
}

impl TextTranslator {
    pub fn new(provider: ProviderClient, cache_capacity: usize) -> Self {
        Self {
            provider,
            cache: TranslationCache::new(cache_capacity),
        }
    }

    /// Translate a single text.
    ///
    /// Same-language pairs and empty/whitespace-only input short-circuit to
    /// an identity result without touching the cache or the provider. On
    /// provider failure the source text is passed through as
    /// `Translation::Fallback`; a down provider never breaks rendering.
    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Translation {
        if source == target || text.trim().is_empty() {
            return Translation::Translated(text.to_string());
        }

        let metrics = TranslationMetrics::global();
        let key = CacheKey::new(text, source, target);

        if let Some(cached) = self.cache.get(&key) {
            metrics.record_cache_hit();
            return Translation::Translated(cached);
        }
        metrics.record_cache_miss();

        match self.request_translations(&[key.text()], source, target).await {
            Ok(translations) => match translations.into_iter().next() {
                Some(translated) => Translation::Translated(translated),
                None => Translation::Fallback(text.to_string()),
            },
            Err(e) => {
                warn!(
                    "Translation {} -> {} failed, passing source text through: {:#}",
                    source.code(),
                    target.code(),
                    e
                );
                Translation::Fallback(text.to_string())
            }
        }
    }

    /// Translate a batch of texts in one combined provider call.
    ///
    /// The output has exactly the length and order of the input. Empty and
    /// whitespace-only elements pass through without a provider call; cache
    /// hits are served from the cache; the remaining elements go to the
    /// provider together. If that combined call fails, every element that
    /// was pending on it falls back to its own source text.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Vec<Translation> {
        if source == target {
            return texts
                .iter()
                .map(|t| Translation::Translated(t.clone()))
                .collect();
        }

        let metrics = TranslationMetrics::global();
        let mut results: Vec<Option<Translation>> = vec![None; texts.len()];
        let mut pending: Vec<usize> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                results[i] = Some(Translation::Translated(text.clone()));
                continue;
            }
            let key = CacheKey::new(text, source, target);
            if let Some(cached) = self.cache.get(&key) {
                metrics.record_cache_hit();
                results[i] = Some(Translation::Translated(cached));
            } else {
                metrics.record_cache_miss();
                pending.push(i);
            }
        }

        if !pending.is_empty() {
            let to_translate: Vec<&str> = pending.iter().map(|&i| texts[i].trim()).collect();

            match self.request_translations(&to_translate, source, target).await {
                Ok(translations) => {
                    for (&i, translated) in pending.iter().zip(translations) {
                        results[i] = Some(Translation::Translated(translated));
                    }
                }
                Err(e) => {
                    warn!(
                        "Batch translation {} -> {} failed for {} text(s), passing source texts through: {:#}",
                        source.code(),
                        target.code(),
                        pending.len(),
                        e
                    );
                    for &i in &pending {
                        results[i] = Some(Translation::Fallback(texts[i].clone()));
                    }
                }
            }
        }

        results
            .into_iter()
            .map(|r| r.expect("every batch slot is filled before collection"))
            .collect()
    }

    /// One logical provider round-trip: records metrics, validates each
    /// translation, and populates the cache on success.
    async fn request_translations(
        &self,
        texts: &[&str],
        source: Language,
        target: Language,
    ) -> Result<Vec<String>> {
        let metrics = TranslationMetrics::global();
        metrics.record_provider_call();

        match self.provider.translate(texts, source, target).await {
            Ok(translations) => {
                for (source_text, translated) in texts.iter().zip(&translations) {
                    let validation = TranslationValidator::validate(source_text, translated);
                    if validation.has_warnings() {
                        warn!(
                            "Translation validation warnings for {} ({}): {:?}",
                            target.name(),
                            target.code(),
                            validation.warnings
                        );
                    }
                    if validation.has_errors() {
                        warn!(
                            "Translation validation errors for {} ({}): {:?}",
                            target.name(),
                            target.code(),
                            validation.errors
                        );
                    }
                    self.cache
                        .put(CacheKey::new(source_text, source, target), translated.clone());
                }
                Ok(translations)
            }
            Err(e) => {
                metrics.record_provider_failure();
                Err(e)
            }
        }
    }

    /// All enabled languages. Operational/introspection use only.
    pub fn supported_languages(&self) -> Vec<&'static LanguageConfig> {
        LanguageRegistry::get().list_enabled()
    }

    /// Probe provider connectivity. Not on the request-serving path.
    pub async fn test_connection(&self) -> bool {
        self.provider.health_check().await
    }

    /// Number of entries currently in the cache.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
