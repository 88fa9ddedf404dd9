//! Translation lookup for labels, tooltips, and input values.

use std::collections::BTreeMap;

/// String lookup capability.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait Translator: Send + Sync {
    /// Get the translation for a key, if one exists.
    fn get(&self, key: &str) -> Option<String>;

    /// Get the translation for a key, falling back to the key itself.
    fn lookup(&self, key: &str) -> String {
        self.get(key).unwrap_or_else(|| {
            tracing::trace!(key, "No translation, using key");
            key.to_owned()
        })
    }

    /// Translate every text of a key/text list through `prefix + text`.
    ///
    /// Order is preserved; untranslated entries keep their text.
    fn lookup_many(&self, entries: &[(String, String)], prefix: &str) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(key, text)| {
                let translated = self
                    .get(&format!("{prefix}{text}"))
                    .unwrap_or_else(|| text.clone());
                (key.clone(), translated)
            })
            .collect()
    }
}

/// Map-backed translator.
#[derive(Clone, Debug, Default)]
pub struct MapTranslator {
    strings: BTreeMap<String, String>,
}

impl MapTranslator {
    /// Create an empty translator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.strings.insert(key.into(), text.into());
        self
    }
}

impl From<BTreeMap<String, String>> for MapTranslator {
    fn from(strings: BTreeMap<String, String>) -> Self {
        Self { strings }
    }
}

impl Translator for MapTranslator {
    fn get(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }
}
