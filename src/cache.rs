//! Session-scoped translation cache.
//!
//! Maps (normalized source text, source language, target language) to a
//! previously obtained translation so identical strings are translated at
//! most once per process. The cache is size-bounded LRU; there is no
//! per-key locking, so two concurrent misses for the same key may both call
//! the provider and the last write wins. Translations are idempotent per
//! key, so that is harmless.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::i18n::Language;

/// Composite identity of a translation: what was asked, from and to which
/// language. Text is trim-normalized so that padding differences do not
/// produce duplicate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    text: String,
    source: Language,
    target: Language,
}

impl CacheKey {
    pub fn new(text: &str, source: Language, target: Language) -> Self {
        Self {
            text: text.trim().to_string(),
            source,
            target,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// In-memory LRU cache of completed translations.
///
/// Owned by a `TextTranslator` instance, never shared process-wide, so each
/// session (and each test) gets an isolated cache.
pub struct TranslationCache {
    inner: Mutex<LruCache<CacheKey, String>>,
}

impl TranslationCache {
    /// Create a cache bounded to `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).expect("cache capacity must be > 0"),
            )),
        }
    }

    /// Look up a cached translation.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut cache = self.inner.lock().expect("cache mutex poisoned");
        cache.get(key).cloned()
    }

    /// Insert a translation. A later write for the same key overwrites the
    /// earlier one rather than duplicating it.
    pub fn put(&self, key: CacheKey, translation: String) {
        let mut cache = self.inner.lock().expect("cache mutex poisoned");
        cache.put(key, translation);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        let cache = self.inner.lock().expect("cache mutex poisoned");
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
