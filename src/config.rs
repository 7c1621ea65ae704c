//! Widget configuration.

use serde::Deserialize;

/// Host platform, used only to pick the shortcut glyph shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    /// Label for the open-search shortcut, e.g. "⌘K" or "Ctrl+K".
    pub fn shortcut_label(self, key: char) -> String {
        let key = key.to_ascii_uppercase();
        match self {
            Platform::MacOs => format!("\u{2318}{key}"),
            Platform::Other => format!("Ctrl+{key}"),
        }
    }
}

/// Tunables for one widget instance. All values have working defaults; hosts
/// usually deserialize this from a small JSON blob embedded in the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Absolute-origin path of the prebuilt search document.
    pub document_url: String,
    /// Quiet period between the last keystroke and query execution.
    pub debounce_ms: u64,
    /// Queries shorter than this (trimmed, in chars) never reach the engine.
    pub min_query_len: usize,
    /// Result rows are truncated to this many hits.
    pub max_results: usize,
    /// Snippet length in chars when falling back to record content.
    pub snippet_len: usize,
    /// Query terms shorter than this are not highlighted.
    pub highlight_min_len: usize,
    /// Delay before focusing the input, letting the open transition start.
    pub focus_delay_ms: u64,
    /// Letter of the primary-modifier global shortcut.
    pub shortcut_key: char,
    pub platform: Platform,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            document_url: "/search.json".to_string(),
            debounce_ms: 150,
            min_query_len: 2,
            max_results: 10,
            snippet_len: 150,
            highlight_min_len: 2,
            focus_delay_ms: 50,
            shortcut_key: 'k',
            platform: Platform::Other,
        }
    }
}
