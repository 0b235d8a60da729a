// src/domain/policy.rs
//
// Selection Policy - immutable per-run configuration shared read-only
// across every movie's pipeline.

use serde::{Deserialize, Serialize};

/// Policy knobs that drive candidate selection and replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Two-letter language code the user wants trailers in
    pub target_language: String,

    /// Strict mode: catalog candidates must match `target_language`
    /// exactly. Never restricts the keyword-search fallback.
    pub strict: bool,

    /// Resolution ceiling passed to the downloader; never request
    /// higher than needed
    pub preferred_height: u32,

    /// Accept a non-mp4 container when it preserves a resolution
    /// advantage, trading format uniformity for quality
    pub allow_non_mp4_for_quality: bool,
}

/// Locale details for a language code, used to shape provider queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Catalog locale, e.g. "de-DE"
    pub locale: &'static str,
    /// Search region code, e.g. "DE"
    pub region: &'static str,
    /// The word "trailer audiences search for" in that language,
    /// appended to keyword queries
    pub native_word: &'static str,
}

const LANGUAGE_TABLE: &[(&str, LanguageProfile)] = &[
    ("de", LanguageProfile { locale: "de-DE", region: "DE", native_word: "Deutsch" }),
    ("en", LanguageProfile { locale: "en-US", region: "US", native_word: "English" }),
    ("fr", LanguageProfile { locale: "fr-FR", region: "FR", native_word: "Français" }),
    ("it", LanguageProfile { locale: "it-IT", region: "IT", native_word: "Italiano" }),
    ("es", LanguageProfile { locale: "es-ES", region: "ES", native_word: "Español" }),
    ("nl", LanguageProfile { locale: "nl-NL", region: "NL", native_word: "Nederlands" }),
    ("pt", LanguageProfile { locale: "pt-PT", region: "PT", native_word: "Português" }),
    ("pl", LanguageProfile { locale: "pl-PL", region: "PL", native_word: "Polski" }),
    ("tr", LanguageProfile { locale: "tr-TR", region: "TR", native_word: "Türkçe" }),
    ("ru", LanguageProfile { locale: "ru-RU", region: "RU", native_word: "Русский" }),
];

impl LanguageProfile {
    /// Profile for a language code; unknown codes fall back to English.
    pub fn for_code(code: &str) -> LanguageProfile {
        LANGUAGE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, p)| *p)
            .unwrap_or(LanguageProfile {
                locale: "en-US",
                region: "US",
                native_word: "English",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_profile() {
        let p = LanguageProfile::for_code("de");
        assert_eq!(p.locale, "de-DE");
        assert_eq!(p.region, "DE");
        assert_eq!(p.native_word, "Deutsch");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let p = LanguageProfile::for_code("xx");
        assert_eq!(p.locale, "en-US");
        assert_eq!(p.region, "US");
    }
}
