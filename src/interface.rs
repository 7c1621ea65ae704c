//! Shared types crossing module boundaries.
//!
//! This file is the source of truth for the widget's public vocabulary:
//! search hits, rendered rows, result-area view states, and the keyboard
//! events the controller understands.

/// A ranked reference into the loaded record sequence.
///
/// `position` indexes the record array directly; `score` is the engine's
/// relevance value, descending across a result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub position: usize,
    pub score: f32,
}

/// One rendered result row.
///
/// `index` and `url` are carried alongside the markup so the host can wire
/// event delegation: hover resolves to [`crate::SearchWidget::row_hovered`],
/// click to [`crate::SearchWidget::row_clicked`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub index: usize,
    pub url: String,
    pub html: String,
}

/// Everything the result area can display.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    /// Default prompt, shown while idle and after close.
    Hint,
    /// The search document fetch is in flight.
    Loading,
    /// The fetch or index build failed; persists until a reopen retries.
    LoadFailed,
    /// The engine rejected the query even after the plain-token fallback.
    InvalidQuery,
    /// A query ran and matched nothing.
    NoMatches { query: String },
    Rows(Vec<ResultRow>),
}

/// Keys intercepted while the search surface is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Escape,
}

/// Modifier state for the global shortcut. `primary` is Cmd on macOS and
/// Ctrl elsewhere; the host resolves which physical modifier that is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub primary: bool,
}
