//! Internationalization (i18n) module for multi-language support.
//!
//! This module provides the centralized architecture for the three site
//! languages. All language metadata, translation observability, and
//! translation quality validation live here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages and their metadata
//! - `language`: Type-safe Language type validated against the registry
//! - `validator`: Translation quality validation
//! - `metrics`: Translation observability and metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Language, LanguageRegistry};
//!
//! // Get canonical language (Armenian)
//! let canonical = Language::canonical();
//!
//! // Create language from code
//! let russian = Language::from_code("ru")?;
//!
//! // List all enabled languages
//! let languages = LanguageRegistry::get().list_enabled();
//! ```

mod language;
mod metrics;
mod registry;
mod validator;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use validator::{TranslationValidator, ValidationReport};
