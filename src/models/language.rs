//! Language and translation identifiers used by the 3Play API.

use serde::{Deserialize, Serialize};

/// Language names and IDs used in the 3Play API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
    Chinese,
    Japanese,
}

/// Raised when a language id returned by the API has no [`Language`] counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown 3Play language id: {0}")]
pub struct UnknownLanguage(pub i64);

impl Language {
    /// The numeric id 3Play uses for this language.
    pub fn id(self) -> i64 {
        match self {
            Language::English => 1,
            Language::French => 5,
            Language::German => 7,
            Language::Italian => 8,
            Language::Spanish => 13,
            Language::Chinese => 18,
            Language::Japanese => 23,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Spanish => "Spanish",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Language::English,
            Language::French,
            Language::German,
            Language::Italian,
            Language::Spanish,
            Language::Chinese,
            Language::Japanese,
        ]
    }

    /// Looks up a language by id.
    pub fn from_id(id: i64) -> Option<Self> {
        Self::all().iter().copied().find(|lang| lang.id() == id)
    }

    /// Looks up a language by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl TryFrom<i64> for Language {
    type Error = UnknownLanguage;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(UnknownLanguage(id))
    }
}

impl From<Language> for i64 {
    fn from(lang: Language) -> Self {
        lang.id()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Translation service option ids, using the cheapest vendor ("Gengo - Standard").
///
/// Only translations to and from English are offered.
pub struct TranslationOption;

impl TranslationOption {
    /// Returns the translation service option id from `source` to `target`.
    pub fn get(source: Language, target: Language) -> Option<u32> {
        use Language::*;

        let id = match (source, target) {
            (English, Chinese) => 56,
            (English, French) => 94,
            (English, German) => 97,
            (English, Italian) => 116,
            (English, Spanish) => 93,
            (English, Japanese) => 76,
            (Chinese, English) => 285,
            (French, English) => 290,
            (German, English) => 287,
            (Italian, English) => 294,
            (Spanish, English) => 132,
            (Japanese, English) => 282,
            _ => return None,
        };

        Some(id)
    }
}

/// Output formats for formatted transcript text.
///
/// The full list is available from `/transcripts/output_formats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptFormat {
    #[default]
    Srt,
}

impl TranscriptFormat {
    pub fn id(self) -> u32 {
        match self {
            TranscriptFormat::Srt => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_ids_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_id(lang.id()), Some(*lang));
        }
        assert_eq!(Language::from_id(2), None);
        assert_eq!(Language::try_from(99), Err(UnknownLanguage(99)));
    }

    #[test]
    fn test_language_serde_as_id() {
        let lang: Language = serde_json::from_str("13").unwrap();
        assert_eq!(lang, Language::Spanish);
        assert_eq!(serde_json::to_string(&Language::Chinese).unwrap(), "18");
        assert!(serde_json::from_str::<Language>("4").is_err());
    }

    #[test]
    fn test_language_from_name() {
        assert_eq!(Language::from_name(" spanish "), Some(Language::Spanish));
        assert_eq!(Language::from_name("Klingon"), None);
    }

    #[test]
    fn test_translation_option_lookup() {
        assert_eq!(
            TranslationOption::get(Language::English, Language::Spanish),
            Some(93)
        );
        assert_eq!(
            TranslationOption::get(Language::Japanese, Language::English),
            Some(282)
        );
        assert_eq!(
            TranslationOption::get(Language::French, Language::German),
            None
        );
        assert_eq!(
            TranslationOption::get(Language::English, Language::English),
            None
        );
    }
}
