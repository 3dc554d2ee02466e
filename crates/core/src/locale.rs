//! Locale-keyed text values and locale negotiation.
//!
//! Titles and descriptions are stored as a map from locale code (`en_US`,
//! `fr_CA`, ...) to text. Rendering resolves the active locale first, then the
//! tenant's primary locale, then any non-empty entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Locale used when neither configuration nor the request names one.
pub const DEFAULT_LOCALE: &str = "en_US";

/// A text value with one entry per locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a value holding a single entry.
    pub fn single(locale: &str, text: impl Into<String>) -> Self {
        let mut value = Self::new();
        value.set(locale, text);
        value
    }

    /// Set the entry for `locale`, replacing any existing text.
    pub fn set(&mut self, locale: &str, text: impl Into<String>) {
        self.0.insert(locale.to_string(), text.into());
    }

    /// Builder form of [`LocalizedText::set`].
    pub fn with(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.set(locale, text);
        self
    }

    /// Raw entry for `locale`, if any.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Entry for `locale` if present and non-blank.
    fn non_blank(&self, locale: &str) -> Option<&str> {
        self.get(locale).filter(|s| !s.trim().is_empty())
    }

    /// Resolve the display string: `active`, then `fallback`, then the first
    /// non-blank entry in locale order.
    pub fn resolve(&self, active: &str, fallback: &str) -> Option<&str> {
        self.non_blank(active)
            .or_else(|| self.non_blank(fallback))
            .or_else(|| {
                self.0
                    .values()
                    .map(String::as_str)
                    .find(|s| !s.trim().is_empty())
            })
    }

    /// `true` when the entry for `locale` is missing or whitespace-only.
    pub fn is_blank(&self, locale: &str) -> bool {
        self.non_blank(locale).is_none()
    }

    /// `true` when every entry is blank (or there are none).
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|s| s.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return a copy with surrounding whitespace trimmed from every entry and
    /// blank entries dropped.
    pub fn normalized(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.trim().to_string()))
                .filter(|(_, v)| !v.is_empty())
                .collect(),
        )
    }
}

/// Pick the preferred locale from an `Accept-Language` header value.
///
/// Returns the first listed language tag (ignoring quality weights and `*`)
/// converted to the underscore form used for storage keys, e.g. `fr-CA` ->
/// `fr_CA`.
pub fn parse_accept_language(header: &str) -> Option<String> {
    header
        .split(',')
        .map(|part| part.split(';').next().unwrap_or("").trim())
        .find(|tag| !tag.is_empty() && *tag != "*")
        .map(|tag| tag.replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_active_locale() {
        let text = LocalizedText::single("en_US", "Fiction").with("fr_CA", "Roman");
        assert_eq!(text.resolve("fr_CA", "en_US"), Some("Roman"));
    }

    #[test]
    fn resolve_falls_back_to_primary_then_any() {
        let text = LocalizedText::single("en_US", "Fiction").with("de_DE", "  ");
        assert_eq!(text.resolve("de_DE", "en_US"), Some("Fiction"));

        let only_french = LocalizedText::single("fr_CA", "Roman");
        assert_eq!(only_french.resolve("de_DE", "en_US"), Some("Roman"));
    }

    #[test]
    fn resolve_empty_is_none() {
        assert_eq!(LocalizedText::new().resolve("en_US", "en_US"), None);
    }

    #[test]
    fn blank_detection_trims() {
        let text = LocalizedText::single("en_US", "   ");
        assert!(text.is_blank("en_US"));
        assert!(text.is_blank("fr_CA"));
        assert!(text.is_empty());
    }

    #[test]
    fn normalized_drops_blank_entries() {
        let text = LocalizedText::single("en_US", "  Fiction ").with("fr_CA", "");
        let normalized = text.normalized();
        assert_eq!(normalized.get("en_US"), Some("Fiction"));
        assert_eq!(normalized.get("fr_CA"), None);
    }

    #[test]
    fn serializes_as_plain_map() {
        let text = LocalizedText::single("en_US", "Fiction");
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json, serde_json::json!({"en_US": "Fiction"}));
    }

    #[test]
    fn accept_language_first_tag() {
        assert_eq!(
            parse_accept_language("fr-CA,fr;q=0.9,en;q=0.8").as_deref(),
            Some("fr_CA")
        );
        assert_eq!(parse_accept_language("*, en-US").as_deref(), Some("en_US"));
        assert_eq!(parse_accept_language(""), None);
    }
}
