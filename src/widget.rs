//! Overlay controller.
//!
//! `SearchWidget` is the single owner of UI session state. Every mutation
//! happens inside one of its event handlers (open/close, keys, input,
//! timers, load callbacks), which keeps the whole widget single-threaded
//! and lock-free: the host event loop delivers one event at a time.
//!
//! The fetch runs at most once per page session. `open()` starts it only
//! when no load is in flight and no index is built, so overlapping opens
//! can never double-fetch or double-build.

use crate::config::WidgetConfig;
use crate::index::SearchIndex;
use crate::interface::{Key, Modifiers, ResultsView};
use crate::loader;
use crate::models::SearchRecord;
use crate::render;
use crate::surface::{Surface, TimerId};

/// A query waiting out its debounce period.
#[derive(Debug)]
struct PendingQuery {
    timer: TimerId,
    query: String,
}

/// Session state, reset on close except for the load flags: a built index
/// is kept for the rest of the page session.
#[derive(Debug, Default)]
struct SessionState {
    open: bool,
    index_loaded: bool,
    loading: bool,
    load_failed: bool,
    selected: Option<usize>,
    pending_focus: Option<TimerId>,
    pending_debounce: Option<PendingQuery>,
    /// Destination URLs of the currently rendered rows, by row index.
    row_urls: Vec<String>,
}

enum Direction {
    Down,
    Up,
}

/// The search overlay: input, result list, selection and navigation.
pub struct SearchWidget<S: Surface> {
    surface: S,
    config: WidgetConfig,
    state: SessionState,
    records: Vec<SearchRecord>,
    index: Option<SearchIndex>,
}

impl<S: Surface> SearchWidget<S> {
    pub fn new(mut surface: S, config: WidgetConfig) -> Self {
        let glyph = config.platform.shortcut_label(config.shortcut_key);
        surface.set_shortcut_glyph(&glyph);
        surface.set_results_html(&render::view_html(&ResultsView::Hint));
        Self {
            surface,
            config,
            state: SessionState::default(),
            records: Vec::new(),
            index: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn records(&self) -> &[SearchRecord] {
        &self.records
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Show the overlay. Focus is deferred by a short timer so the host's
    /// open transition can start first. Idempotent while already open.
    pub fn open(&mut self) {
        if self.state.open {
            return;
        }
        self.state.open = true;
        self.surface.show_overlay();

        let timer = self.surface.set_timeout(self.config.focus_delay_ms);
        self.state.pending_focus = Some(timer);

        if !self.state.index_loaded && !self.state.loading {
            self.state.loading = true;
            self.state.load_failed = false;
            self.show_view(&ResultsView::Loading);
            self.surface.begin_fetch(&self.config.document_url);
        } else if self.state.loading {
            // Reopened while the first fetch is still in flight.
            self.show_view(&ResultsView::Loading);
        }
    }

    /// Hide the overlay and reset the per-open state. The load flags stay
    /// untouched so a built index survives close/reopen cycles. Safe to
    /// call when already closed.
    pub fn close(&mut self) {
        if !self.state.open {
            return;
        }
        self.state.open = false;
        self.cancel_pending_timers();
        self.surface.hide_overlay();
        self.surface.clear_input();
        self.show_view(&ResultsView::Hint);
        self.set_selection(None);
        self.state.row_urls.clear();
    }

    /// Page-wide shortcut handler. Returns true when the event was consumed
    /// and the host should suppress the browser default.
    pub fn global_key(&mut self, key: char, modifiers: Modifiers) -> bool {
        if modifiers.primary && key.eq_ignore_ascii_case(&self.config.shortcut_key) {
            self.open();
            return true;
        }
        false
    }

    /// Keys intercepted while the overlay is open. Returns true when the
    /// event was consumed.
    pub fn key_pressed(&mut self, key: Key) -> bool {
        if !self.state.open {
            return false;
        }
        match key {
            Key::Escape => self.close(),
            Key::Down => self.move_selection(Direction::Down),
            Key::Up => self.move_selection(Direction::Up),
            Key::Enter => {
                if let Some(url) = self
                    .state
                    .selected
                    .and_then(|i| self.state.row_urls.get(i))
                    .cloned()
                {
                    self.surface.navigate(&url);
                }
            }
        }
        true
    }

    /// Input text changed. Short input resets to the hint immediately; a
    /// searchable query is scheduled behind the debounce period, replacing
    /// any previously scheduled one.
    pub fn input_changed(&mut self, text: &str) {
        self.cancel_debounce();

        let trimmed = text.trim();
        if trimmed.chars().count() < self.config.min_query_len {
            self.show_view(&ResultsView::Hint);
            self.set_selection(None);
            self.state.row_urls.clear();
            return;
        }

        if !self.state.index_loaded {
            let view = if self.state.load_failed {
                ResultsView::LoadFailed
            } else {
                ResultsView::Loading
            };
            self.show_view(&view);
            return;
        }

        let timer = self.surface.set_timeout(self.config.debounce_ms);
        self.state.pending_debounce = Some(PendingQuery {
            timer,
            query: trimmed.to_string(),
        });
    }

    /// Host callback for any timer issued through the surface.
    pub fn timer_fired(&mut self, id: TimerId) {
        if self.state.pending_focus == Some(id) {
            self.state.pending_focus = None;
            self.surface.focus_input();
            return;
        }
        if self
            .state
            .pending_debounce
            .as_ref()
            .is_some_and(|p| p.timer == id)
        {
            let pending = self.state.pending_debounce.take();
            if let Some(pending) = pending {
                self.run_query(&pending.query);
            }
        }
    }

    /// Success callback of the document fetch.
    pub fn load_succeeded(&mut self, body: &str) {
        let outcome = loader::parse_records(body)
            .map_err(|e| e.to_string())
            .and_then(|records| {
                SearchIndex::build(&records)
                    .map(|index| (records, index))
                    .map_err(|e| e.to_string())
            });
        match outcome {
            Ok((records, index)) => {
                log::info!("search index built over {} records", records.len());
                self.records = records;
                self.index = Some(index);
                self.state.loading = false;
                self.state.index_loaded = true;
                self.state.load_failed = false;
                self.show_view(&ResultsView::Hint);
            }
            Err(reason) => self.load_failed(&reason),
        }
    }

    /// Error callback of the document fetch. The widget stays interactive
    /// but cannot search; the next open/close cycle may fetch again.
    pub fn load_failed(&mut self, reason: &str) {
        log::error!("search document load failed: {reason}");
        self.state.loading = false;
        self.state.load_failed = true;
        self.show_view(&ResultsView::LoadFailed);
    }

    /// Hover shares selection state with the keyboard.
    pub fn row_hovered(&mut self, index: usize) {
        if index < self.state.row_urls.len() {
            self.set_selection(Some(index));
            self.scroll_selection_into_view();
        }
    }

    /// Click navigates straight away, whatever the current selection is.
    pub fn row_clicked(&mut self, index: usize) {
        if let Some(url) = self.state.row_urls.get(index).cloned() {
            self.surface.navigate(&url);
        }
    }

    /// Clicking the backdrop dismisses the overlay, like the close button.
    pub fn backdrop_clicked(&mut self) {
        self.close();
    }

    fn run_query(&mut self, query: &str) {
        // Every executed query starts from a clean selection.
        self.set_selection(None);

        let Some(index) = &self.index else {
            return;
        };
        match index.query(query, self.config.max_results) {
            Ok(hits) if hits.is_empty() => {
                self.state.row_urls.clear();
                self.show_view(&ResultsView::NoMatches {
                    query: query.to_string(),
                });
            }
            Ok(hits) => {
                let rows = render::rows(&self.records, &hits, query, &self.config);
                self.state.row_urls = rows.iter().map(|row| row.url.clone()).collect();
                self.show_view(&ResultsView::Rows(rows));
            }
            Err(err) => {
                log::warn!("query {query:?} rejected: {err}");
                self.state.row_urls.clear();
                self.show_view(&ResultsView::InvalidQuery);
            }
        }
    }

    fn show_view(&mut self, view: &ResultsView) {
        self.surface.set_results_html(&render::view_html(view));
    }

    fn set_selection(&mut self, selected: Option<usize>) {
        self.state.selected = selected;
        self.surface.mark_selected(selected);
    }

    fn move_selection(&mut self, direction: Direction) {
        let count = self.state.row_urls.len();
        if count == 0 {
            return;
        }
        let next = match (self.state.selected, direction) {
            (None, Direction::Down) => 0,
            (Some(i), Direction::Down) => (i + 1) % count,
            (None, Direction::Up) => count - 1,
            (Some(i), Direction::Up) => (i + count - 1) % count,
        };
        self.set_selection(Some(next));
        self.scroll_selection_into_view();
    }

    /// Scroll just far enough that the selected row is fully visible; do
    /// nothing when it already is.
    fn scroll_selection_into_view(&mut self) {
        let Some(index) = self.state.selected else {
            return;
        };
        let Some(row) = self.surface.row_extent(index) else {
            return;
        };
        let viewport = self.surface.viewport();
        if row.top < viewport.scroll_top {
            self.surface.set_scroll_top(row.top);
        } else if row.bottom() > viewport.scroll_top + viewport.height {
            self.surface.set_scroll_top(row.bottom() - viewport.height);
        }
    }

    fn cancel_debounce(&mut self) {
        if let Some(pending) = self.state.pending_debounce.take() {
            self.surface.clear_timeout(pending.timer);
        }
    }

    fn cancel_pending_timers(&mut self) {
        self.cancel_debounce();
        if let Some(timer) = self.state.pending_focus.take() {
            self.surface.clear_timeout(timer);
        }
    }
}
