//! Language detection for user input.

use lingua::{Language, LanguageDetectorBuilder};

/// Languages told apart by [`LinguaDetector`].
const LANGUAGES: [Language; 21] = [
    Language::Arabic,
    Language::Bengali,
    Language::Chinese,
    Language::Dutch,
    Language::English,
    Language::French,
    Language::German,
    Language::Hindi,
    Language::Indonesian,
    Language::Italian,
    Language::Japanese,
    Language::Korean,
    Language::Persian,
    Language::Polish,
    Language::Portuguese,
    Language::Russian,
    Language::Spanish,
    Language::Turkish,
    Language::Ukrainian,
    Language::Urdu,
    Language::Vietnamese,
];

/// A type that guesses which language a text is written in.
///
/// Detection is best-effort. Returning `None` means "don't know", which
/// callers must treat as a normal outcome rather than an error.
pub trait LanguageDetector: Send + Sync {
    /// Returns a lower-case ISO 639-1 language code, e.g. `"en"`.
    fn detect(&self, text: &str) -> Option<String>;
}

/// A [`LanguageDetector`] backed by `lingua`, which stays accurate on
/// inputs as short as a single symptom sentence.
///
/// Text without any letters has no language and yields `None`.
pub struct LinguaDetector {
    detector: lingua::LanguageDetector,
}

impl LinguaDetector {
    /// Creates a detector for the languages patients most commonly write
    /// in. Language models are loaded on first use.
    #[inline]
    pub fn new() -> Self {
        Self {
            detector: LanguageDetectorBuilder::from_languages(&LANGUAGES)
                .build(),
        }
    }
}

impl Default for LinguaDetector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for LinguaDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let language = self.detector.detect_language_of(text)?;
        trace!("detected {language:?}");
        Some(language.iso_code_639_1().to_string().to_lowercase())
    }
}
