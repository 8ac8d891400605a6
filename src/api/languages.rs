//! Result languages accepted by the `language` query parameter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preferred language for product names. The API falls back to any
/// available name when none exists in the requested language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Danish,
    German,
    Spanish,
    Finnish,
    French,
    Italian,
    Dutch,
    Norwegian,
    Polish,
    Portuguese,
    Swedish,
    Czech,
    Hungarian,
    Japanese,
    Any,
}

impl Language {
    /// Returns the numeric code sent on the wire.
    pub fn code(&self) -> u32 {
        match self {
            Language::English => 1,
            Language::Danish => 2,
            Language::German => 3,
            Language::Spanish => 4,
            Language::Finnish => 5,
            Language::French => 6,
            Language::Italian => 8,
            Language::Dutch => 10,
            Language::Norwegian => 11,
            Language::Polish => 12,
            Language::Portuguese => 13,
            Language::Swedish => 15,
            Language::Czech => 17,
            Language::Hungarian => 18,
            Language::Japanese => 19,
            Language::Any => 99,
        }
    }

    /// Looks up a language by its numeric code.
    pub fn from_code(code: u32) -> Option<Language> {
        Language::all().iter().copied().find(|l| l.code() == code)
    }

    /// Returns the ISO 639-1 code, or `*` for [`Language::Any`].
    pub fn iso_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Danish => "da",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Finnish => "fi",
            Language::French => "fr",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Norwegian => "no",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Swedish => "sv",
            Language::Czech => "cs",
            Language::Hungarian => "hu",
            Language::Japanese => "ja",
            Language::Any => "*",
        }
    }

    /// Returns all supported languages.
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Danish,
            Language::German,
            Language::Spanish,
            Language::Finnish,
            Language::French,
            Language::Italian,
            Language::Dutch,
            Language::Norwegian,
            Language::Polish,
            Language::Portuguese,
            Language::Swedish,
            Language::Czech,
            Language::Hungarian,
            Language::Japanese,
            Language::Any,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::Danish => "danish",
            Language::German => "german",
            Language::Spanish => "spanish",
            Language::Finnish => "finnish",
            Language::French => "french",
            Language::Italian => "italian",
            Language::Dutch => "dutch",
            Language::Norwegian => "norwegian",
            Language::Polish => "polish",
            Language::Portuguese => "portuguese",
            Language::Swedish => "swedish",
            Language::Czech => "czech",
            Language::Hungarian => "hungarian",
            Language::Japanese => "japanese",
            Language::Any => "any",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();

        if let Ok(code) = key.parse::<u32>() {
            return Language::from_code(code).ok_or_else(|| LanguageParseError(s.to_string()));
        }

        Language::all()
            .iter()
            .copied()
            .find(|l| l.to_string() == key || l.iso_code() == key)
            .ok_or_else(|| LanguageParseError(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct LanguageParseError(String);

impl fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown language '{}'. Use a name (german), an ISO code (de) or a numeric code (3)",
            self.0
        )
    }
}

impl std::error::Error for LanguageParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!(Language::from_str("english").unwrap(), Language::English);
        assert_eq!(Language::from_str("en").unwrap(), Language::English);
        assert_eq!(Language::from_str("1").unwrap(), Language::English);
        assert_eq!(Language::from_str("de").unwrap(), Language::German);
        assert_eq!(Language::from_str("GERMAN").unwrap(), Language::German);
        assert_eq!(Language::from_str("3").unwrap(), Language::German);
        assert_eq!(Language::from_str("*").unwrap(), Language::Any);
        assert_eq!(Language::from_str("99").unwrap(), Language::Any);
        assert_eq!(Language::from_str(" ja ").unwrap(), Language::Japanese);

        assert!(Language::from_str("klingon").is_err());
        assert!(Language::from_str("7").is_err());
        assert!(Language::from_str("").is_err());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::English.code(), 1);
        assert_eq!(Language::German.code(), 3);
        assert_eq!(Language::Italian.code(), 8);
        assert_eq!(Language::Any.code(), 99);
        assert_eq!(Language::from_code(15), Some(Language::Swedish));
        assert_eq!(Language::from_code(0), None);
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u32> = Language::all().iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Language::all().len());
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for language in Language::all() {
            assert_eq!(Language::from_str(&language.to_string()).unwrap(), *language);
        }
    }

    #[test]
    fn test_language_default() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_parse_error_display() {
        let msg = Language::from_str("xyz").unwrap_err().to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("ISO code"));
    }

    #[test]
    fn test_language_serde() {
        let json = serde_json::to_string(&Language::French).unwrap();
        assert_eq!(json, "\"french\"");

        let parsed: Language = serde_json::from_str("\"dutch\"").unwrap();
        assert_eq!(parsed, Language::Dutch);
    }
}
