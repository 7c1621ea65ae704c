//! Record model for the prebuilt search document.
//!
//! The site build emits one JSON array with a record per content page.
//! Record ids are dense 0-based positions into that array, so a search hit
//! can be resolved back to its record by direct indexing.

use serde::Deserialize;

/// A field that the site build may emit either as one string or as an
/// ordered list of strings (`tags`, `categories`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl Default for TextOrList {
    fn default() -> Self {
        TextOrList::List(Vec::new())
    }
}

impl TextOrList {
    /// Non-blank entries in document order.
    pub fn items(&self) -> Vec<&str> {
        match self {
            TextOrList::Text(s) => {
                if s.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![s.as_str()]
                }
            }
            TextOrList::List(v) => v
                .iter()
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.items().join(separator)
    }
}

/// One searchable content page from the prebuilt document.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRecord {
    pub id: u32,
    pub title: String,
    pub url: String,
    /// Display-only, already formatted by the site build.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub categories: TextOrList,
    #[serde(default)]
    pub tags: TextOrList,
    /// Preferred snippet source when present and non-blank.
    #[serde(default)]
    pub shortinfo: Option<String>,
    /// Full body text, the snippet fallback.
    #[serde(default)]
    pub content: String,
}

impl SearchRecord {
    /// Categories and tags merged into one indexable line.
    pub fn taxonomy_text(&self) -> String {
        let mut parts = self.categories.items();
        parts.extend(self.tags.items());
        parts.join(" ")
    }

    /// The shortinfo field when it carries visible text.
    pub fn shortinfo_text(&self) -> Option<&str> {
        self.shortinfo
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
