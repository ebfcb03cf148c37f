//! Translation quality validation module.
//!
//! Listing copy is full of tokens that must survive translation byte for
//! byte: measurements ("65 քմ"), prices, construction years, phone-less
//! contact URLs and email addresses. This module compares source and
//! translated text and reports mismatches. Reports are observability only;
//! a bad translation is still returned to the caller.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

// Regex patterns for extraction (cached for performance)
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate that a translation preserves important elements from the
    /// original.
    ///
    /// Checks that:
    /// - numbers (prices, areas, room counts, years) are preserved
    /// - URLs are preserved
    /// - email addresses are preserved
    /// - a non-empty source did not translate to an empty string
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !original.trim().is_empty() && translated.trim().is_empty() {
            report
                .errors
                .push("Non-empty source translated to empty text".to_string());
            return report;
        }

        // Numbers: order-insensitive comparison; translators may reorder
        // clauses, but every figure must survive.
        let mut orig_numbers = Self::extract_numbers(original);
        let mut trans_numbers = Self::extract_numbers(translated);
        orig_numbers.sort();
        trans_numbers.sort();
        if orig_numbers != trans_numbers {
            report.warnings.push(format!(
                "Number mismatch: original has {:?}, translation has {:?}",
                orig_numbers, trans_numbers
            ));
        }

        let orig_urls = Self::extract_urls(original);
        let trans_urls = Self::extract_urls(translated);
        if orig_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: original has {} URLs, translation has {} URLs",
                orig_urls.len(),
                trans_urls.len()
            ));
        }

        let orig_emails = Self::extract_emails(original);
        let trans_emails = Self::extract_emails(translated);
        if orig_emails != trans_emails {
            report.warnings.push(format!(
                "Email mismatch: original has {:?}, translation has {:?}",
                orig_emails, trans_emails
            ));
        }

        report
    }

    /// Extract all numeric tokens (integers and decimals) from text
    fn extract_numbers(text: &str) -> Vec<String> {
        let regex = NUMBER_REGEX.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Extract all URLs from text
    fn extract_urls(text: &str) -> Vec<String> {
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"https?://[^\s)\]]+").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Extract all email addresses from text
    fn extract_emails(text: &str) -> Vec<String> {
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap()
        });

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
