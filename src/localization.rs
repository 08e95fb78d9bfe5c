//! Localized strings and the fallback policy used to resolve them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The languages a [`LocalizedText`] can carry a string for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English, the default authoring language.
    #[default]
    En,
    /// German.
    De,
    /// French.
    Fr,
    /// Spanish.
    Es,
    /// Italian.
    It,
    /// Portuguese.
    Pt,
    /// Polish.
    Pl,
    /// Russian.
    Ru,
    /// Japanese.
    Ja,
    /// Korean.
    Ko,
    /// Chinese.
    Zh,
}

impl Language {
    /// The ISO 639-1 code of the language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Pl => "pl",
            Language::Ru => "ru",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What to do when a [`LocalizedText`] has no string for the requested language.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalizationFallback {
    /// Emit a placeholder naming the missing language and the text description.
    #[default]
    DebugOutput,
    /// Use the string of the configured fallback language.
    Language,
    /// Return an empty string.
    Empty,
}

/// A string in several languages, plus a description for authors.
///
/// # Examples
///
/// ```
/// use bevy_conversations::prelude::*;
///
/// let greeting = LocalizedText::new("greeting")
///     .with(Language::En, "Hello")
///     .with(Language::De, "Hallo");
///
/// assert_eq!(greeting.resolve(Language::De, LocalizationFallback::Empty, Language::En), "Hallo");
/// assert_eq!(greeting.resolve(Language::Fr, LocalizationFallback::Language, Language::En), "Hello");
/// assert_eq!(greeting.resolve(Language::Fr, LocalizationFallback::Empty, Language::En), "");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// A human readable description, only used while authoring and in placeholders.
    #[serde(default)]
    pub description: String,
    /// The string of each language.
    #[serde(default)]
    pub strings: IndexMap<Language, String>,
}

impl LocalizedText {
    /// Creates a text with the given description and no strings.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            strings: IndexMap::new(),
        }
    }

    /// Sets the string for a language, builder style.
    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        self.set(language, text);
        self
    }

    /// Sets the string for a language, replacing any previous one.
    pub fn set(&mut self, language: Language, text: impl Into<String>) {
        self.strings.insert(language, text.into());
    }

    /// The string for a language, if there is one.
    pub fn get(&self, language: Language) -> Option<&str> {
        self.strings.get(&language).map(String::as_str)
    }

    /// Resolves the text in `language`, applying `fallback` when it is missing.
    ///
    /// With [`LocalizationFallback::Language`] the `fallback_language` string is used.
    /// If that one is missing too the debug placeholder is returned, there is no
    /// further chaining.
    pub fn resolve(
        &self,
        language: Language,
        fallback: LocalizationFallback,
        fallback_language: Language,
    ) -> String {
        if let Some(text) = self.get(language) {
            return text.to_string();
        }
        match fallback {
            LocalizationFallback::DebugOutput => self.placeholder(language),
            LocalizationFallback::Language => match self.get(fallback_language) {
                Some(text) => text.to_string(),
                None => self.placeholder(fallback_language),
            },
            LocalizationFallback::Empty => String::new(),
        }
    }

    /// The placeholder shown for a missing language.
    fn placeholder(&self, language: Language) -> String {
        let description = if self.description.is_empty() {
            "unnamed"
        } else {
            self.description.as_str()
        };
        format!("<missing {language} text: {description}>")
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn farewell() -> LocalizedText {
        LocalizedText::new("farewell")
            .with(Language::En, "Goodbye")
            .with(Language::Fr, "Au revoir")
    }

    #[rstest]
    #[case(LocalizationFallback::DebugOutput)]
    #[case(LocalizationFallback::Language)]
    #[case(LocalizationFallback::Empty)]
    fn present_language_ignores_fallback(farewell: LocalizedText, #[case] fb: LocalizationFallback) {
        assert_eq!(farewell.resolve(Language::Fr, fb, Language::De), "Au revoir");
    }

    #[rstest]
    fn missing_language_uses_fallback_language(farewell: LocalizedText) {
        let text = farewell.resolve(Language::Ja, LocalizationFallback::Language, Language::En);
        assert_eq!(text, "Goodbye");
    }

    #[rstest]
    fn missing_fallback_language_gives_placeholder(farewell: LocalizedText) {
        let text = farewell.resolve(Language::Ja, LocalizationFallback::Language, Language::De);
        assert_eq!(text, "<missing de text: farewell>");
    }

    #[rstest]
    fn debug_output_names_language_and_description(farewell: LocalizedText) {
        let text = farewell.resolve(Language::Ko, LocalizationFallback::DebugOutput, Language::En);
        assert_eq!(text, "<missing ko text: farewell>");
    }

    #[test]
    fn empty_text_never_panics() {
        let text = LocalizedText::default();
        assert_eq!(
            text.resolve(Language::En, LocalizationFallback::DebugOutput, Language::En),
            "<missing en text: unnamed>"
        );
        assert_eq!(
            text.resolve(Language::Zh, LocalizationFallback::Language, Language::En),
            "<missing en text: unnamed>"
        );
        assert_eq!(
            text.resolve(Language::Pl, LocalizationFallback::Empty, Language::En),
            ""
        );
    }

    #[test]
    fn set_replaces_previous_string() {
        let mut text = LocalizedText::new("t").with(Language::En, "one");
        text.set(Language::En, "two");
        assert_eq!(text.get(Language::En), Some("two"));
        assert_eq!(text.strings.len(), 1);
    }
}
