//! Request locale resolution.
//!
//! A pure, synchronous precedence chain that maps the signals carried by an
//! inbound request to one of the three supported languages. No I/O happens
//! here; unrecognized inputs fall through to the next arm and ultimately to
//! the Armenian default.

use crate::i18n::Language;

/// The signal that decided the locale for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    /// Explicit locale segment at the start of the URL path
    Path,
    /// Persisted preference cookie
    Cookie,
    /// Accept-Language header
    Header,
    /// Coarse geolocation country code
    Geo,
    /// No signal matched
    Default,
}

/// The resolved language for a request plus the signal that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleDecision {
    pub language: Language,
    pub source: LocaleSource,
}

/// Country codes mapped to Russian when no stronger signal is present.
const RUSSIAN_SPEAKING_COUNTRIES: [&str; 6] = ["RU", "BY", "KZ", "KG", "TJ", "UZ"];

/// Resolve the language for a request.
///
/// Precedence, first match wins:
/// 1. first path segment is a supported code
/// 2. preference cookie holds a supported code
/// 3. Accept-Language substring scan: Armenian markers first ("hy", and
///    "am", which also matches Amharic and any `*-AM` region tag; Armenian
///    wins that ambiguity), then "ru", then "en". Quality weights in the
///    header are ignored.
/// 4. geolocation country: AM is Armenian; a fixed set of countries is Russian
/// 5. Armenian default
pub fn resolve(
    path_segments: &[&str],
    cookie: Option<&str>,
    accept_language: Option<&str>,
    geo_country: Option<&str>,
) -> LocaleDecision {
    if let Some(language) = path_segments.first().and_then(|s| Language::from_code(s).ok()) {
        return LocaleDecision {
            language,
            source: LocaleSource::Path,
        };
    }

    if let Some(language) = cookie.and_then(|c| Language::from_code(c.trim()).ok()) {
        return LocaleDecision {
            language,
            source: LocaleSource::Cookie,
        };
    }

    if let Some(header) = accept_language {
        let header = header.to_ascii_lowercase();
        let language = if header.contains("hy") || header.contains("am") {
            Some(Language::ARMENIAN)
        } else if header.contains("ru") {
            Some(Language::RUSSIAN)
        } else if header.contains("en") {
            Some(Language::ENGLISH)
        } else {
            None
        };
        if let Some(language) = language {
            return LocaleDecision {
                language,
                source: LocaleSource::Header,
            };
        }
    }

    if let Some(country) = geo_country {
        let country = country.trim();
        if country.eq_ignore_ascii_case("AM") {
            return LocaleDecision {
                language: Language::ARMENIAN,
                source: LocaleSource::Geo,
            };
        }
        if RUSSIAN_SPEAKING_COUNTRIES
            .iter()
            .any(|c| country.eq_ignore_ascii_case(c))
        {
            return LocaleDecision {
                language: Language::RUSSIAN,
                source: LocaleSource::Geo,
            };
        }
    }

    LocaleDecision {
        language: Language::canonical(),
        source: LocaleSource::Default,
    }
}
