//! Language resolution: maps a reader's locale preference to a provider code.
//!
//! The provider (DeepL) recognizes its own set of upper-case codes, some of
//! which carry a regional variant (`EN-US`, `PT-BR`). This module owns the
//! fixed table from short ISO 639-1 tags to those codes and never fails:
//! anything it does not recognize resolves to the default code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A language code as recognized by the translation provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The default target for any unrecognized or unobservable locale.
    pub fn default_target() -> Self {
        Self::new(DEFAULT_PROVIDER_CODE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// One row of the locale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedLanguage {
    /// ISO 639-1 tag (e.g. "ja", "en")
    pub tag: &'static str,

    /// Provider-specific code (e.g. "JA", "EN-US")
    pub provider_code: &'static str,

    /// English name of the language
    pub name: &'static str,
}

pub const DEFAULT_PROVIDER_CODE: &str = "EN-US";

const SUPPORTED_LANGUAGES: &[SupportedLanguage] = &[
    SupportedLanguage { tag: "ja", provider_code: "JA", name: "Japanese" },
    SupportedLanguage { tag: "en", provider_code: "EN-US", name: "English" },
    SupportedLanguage { tag: "zh", provider_code: "ZH", name: "Chinese" },
    SupportedLanguage { tag: "ko", provider_code: "KO", name: "Korean" },
    SupportedLanguage { tag: "es", provider_code: "ES", name: "Spanish" },
    SupportedLanguage { tag: "fr", provider_code: "FR", name: "French" },
    SupportedLanguage { tag: "de", provider_code: "DE", name: "German" },
    SupportedLanguage { tag: "it", provider_code: "IT", name: "Italian" },
    SupportedLanguage { tag: "pt", provider_code: "PT-BR", name: "Portuguese" },
    SupportedLanguage { tag: "ru", provider_code: "RU", name: "Russian" },
];

/// All languages the resolver can map to, in table order.
pub fn supported_languages() -> &'static [SupportedLanguage] {
    SUPPORTED_LANGUAGES
}

/// Resolve a raw locale tag to a provider code.
///
/// Accepts BCP 47 (`fr-CA`) and POSIX (`fr_CA.UTF-8`) spellings; only the
/// primary subtag is used. `None`, empty tags, `C`/`POSIX` and unknown
/// languages all resolve to [`DEFAULT_PROVIDER_CODE`].
pub fn resolve(locale: Option<&str>) -> LanguageCode {
    let Some(primary) = locale.and_then(primary_subtag) else {
        return LanguageCode::default_target();
    };

    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.tag == primary)
        .map(|lang| LanguageCode::new(lang.provider_code))
        .unwrap_or_else(LanguageCode::default_target)
}

/// Resolve the target language from the process locale.
///
/// Reads `LC_ALL`, then `LC_MESSAGES`, then `LANG`, taking the first one that
/// carries a real preference. This is the only I/O the resolver performs.
pub fn detect_target_language() -> LanguageCode {
    let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| primary_subtag(value).is_some());

    resolve(locale.as_deref())
}

/// Resolve the target language from an HTTP `Accept-Language` header.
///
/// Only the first listed language is considered; quality weights are ignored.
pub fn resolve_accept_language(header: &str) -> LanguageCode {
    let first = header
        .split(',')
        .next()
        .map(|entry| entry.split(';').next().unwrap_or(entry).trim());

    resolve(first)
}

/// Lowercased primary language subtag, or `None` when no preference is expressed.
fn primary_subtag(locale: &str) -> Option<String> {
    let primary = locale
        .trim()
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match primary.as_str() {
        "" | "c" | "posix" | "*" => None,
        _ => Some(primary),
    }
}
