//! Result rendering.
//!
//! Pure functions from hits and records to HTML strings. Escaping happens
//! before any markup is added, and highlight matching runs against the raw
//! text, so query input can never smuggle tags into the output.

use crate::config::WidgetConfig;
use crate::interface::{Hit, ResultRow, ResultsView};
use crate::models::SearchRecord;

const HINT_TEXT: &str = "Type at least two characters to search.";
const LOADING_TEXT: &str = "Loading search index\u{2026}";
const LOAD_FAILED_TEXT: &str = "Search is unavailable right now. Reload the page to try again.";
const INVALID_QUERY_TEXT: &str = "That query cannot be searched. Try plain words.";

/// Separator between the date and the taxonomy in a row's metadata line.
const META_SEPARATOR: &str = " \u{00b7} ";

/// Render any result-area state to markup.
pub fn view_html(view: &ResultsView) -> String {
    match view {
        ResultsView::Hint => format!(r#"<p class="search-hint">{HINT_TEXT}</p>"#),
        ResultsView::Loading => format!(r#"<p class="search-status">{LOADING_TEXT}</p>"#),
        ResultsView::LoadFailed => {
            format!(r#"<p class="search-status search-status-error">{LOAD_FAILED_TEXT}</p>"#)
        }
        ResultsView::InvalidQuery => {
            format!(r#"<p class="search-status search-status-error">{INVALID_QUERY_TEXT}</p>"#)
        }
        ResultsView::NoMatches { query } => format!(
            r#"<p class="search-empty">No results for &ldquo;{}&rdquo;</p>"#,
            escape_html(query)
        ),
        ResultsView::Rows(rows) => {
            let mut html = String::from(r#"<ul class="search-results">"#);
            for row in rows {
                html.push_str(&row.html);
            }
            html.push_str("</ul>");
            html
        }
    }
}

/// Map hits back to records and build one row per resolvable hit.
pub fn rows(
    records: &[SearchRecord],
    hits: &[Hit],
    raw_query: &str,
    config: &WidgetConfig,
) -> Vec<ResultRow> {
    let terms = query_terms(raw_query, config.highlight_min_len);
    hits.iter()
        .enumerate()
        .filter_map(|(index, hit)| {
            let record = records.get(hit.position)?;
            Some(build_row(index, record, &terms, config))
        })
        .collect()
}

fn build_row(
    index: usize,
    record: &SearchRecord,
    terms: &[String],
    config: &WidgetConfig,
) -> ResultRow {
    let title = highlight(&record.title, terms);
    let snippet = snippet_html(record, terms, config.snippet_len);

    let mut html = format!(
        r#"<li class="search-result" data-index="{index}" data-url="{}">"#,
        escape_html(&record.url)
    );
    html.push_str(&format!(r#"<h3 class="search-result-title">{title}</h3>"#));
    html.push_str(&format!(r#"<p class="search-result-snippet">{snippet}</p>"#));
    if let Some(meta) = meta_line(record) {
        html.push_str(&format!(r#"<p class="search-result-meta">{meta}</p>"#));
    }
    html.push_str("</li>");

    ResultRow {
        index,
        url: record.url.clone(),
        html,
    }
}

/// Snippet for one record: shortinfo verbatim when present, otherwise the
/// leading slice of the body with an ellipsis.
fn snippet_html(record: &SearchRecord, terms: &[String], snippet_len: usize) -> String {
    if let Some(shortinfo) = record.shortinfo_text() {
        return highlight(&normalize_whitespace(shortinfo), terms);
    }
    let body = normalize_whitespace(&record.content);
    let lead: String = body.chars().take(snippet_len).collect();
    let mut html = highlight(&lead, terms);
    html.push('\u{2026}');
    html
}

/// Date plus categories/tags, `None` when the record carries neither.
fn meta_line(record: &SearchRecord) -> Option<String> {
    let mut parts = Vec::new();
    let date = record.date.trim();
    if !date.is_empty() {
        parts.push(escape_html(date));
    }
    let mut taxonomy = record.categories.items();
    taxonomy.extend(record.tags.items());
    if !taxonomy.is_empty() {
        parts.push(escape_html(&taxonomy.join(", ")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(META_SEPARATOR))
    }
}

/// Lowercased alphanumeric query tokens long enough to highlight.
pub fn query_terms(raw_query: &str, min_len: usize) -> Vec<String> {
    let mut terms: Vec<String> = raw_query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= min_len.max(1))
        .map(str::to_lowercase)
        .collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Escape text for use in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Escape `text` and wrap every case-insensitive occurrence of each term in
/// `<mark>`. Matching runs on the raw characters and overlapping matches are
/// merged, so entity boundaries are never split.
pub fn highlight(text: &str, terms: &[String]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().map(|&c| fold_char(c)).collect();

    let mut marked = vec![false; chars.len()];
    for term in terms {
        let term_chars: Vec<char> = term.chars().map(fold_char).collect();
        if term_chars.is_empty() || term_chars.len() > chars.len() {
            continue;
        }
        for start in 0..=chars.len() - term_chars.len() {
            if folded[start..start + term_chars.len()] == term_chars[..] {
                for flag in &mut marked[start..start + term_chars.len()] {
                    *flag = true;
                }
            }
        }
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;
    while i < chars.len() {
        if marked[i] {
            out.push_str("<mark>");
            while i < chars.len() && marked[i] {
                push_escaped(&mut out, chars[i]);
                i += 1;
            }
            out.push_str("</mark>");
        } else {
            push_escaped(&mut out, chars[i]);
            i += 1;
        }
    }
    out
}

/// Case folding that keeps a one-to-one char mapping.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Collapse newlines, tabs and space runs into single spaces.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_from_json(json: serde_json::Value) -> SearchRecord {
        serde_json::from_value(json).unwrap()
    }

    fn sample_record() -> SearchRecord {
        record_from_json(serde_json::json!({
            "id": 0,
            "title": "Pipelines Intro",
            "url": "/posts/pipelines-intro",
            "date": "2021-04-01",
            "categories": "engineering",
            "tags": ["jekyll", "rust"],
            "shortinfo": "Getting started with pipelines",
            "content": "A long body about pipelines."
        }))
    }

    #[test]
    fn test_escape_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_highlight_wraps_case_insensitively() {
        let html = highlight("Pipelines Intro", &["pipelines".into()]);
        assert_eq!(html, "<mark>Pipelines</mark> Intro");
    }

    #[test]
    fn test_highlight_merges_overlapping_terms() {
        let html = highlight("pipeline", &["pipe".into(), "pipeline".into()]);
        assert_eq!(html, "<mark>pipeline</mark>");
    }

    #[test]
    fn test_highlight_escapes_surrounding_markup() {
        let html = highlight("<b>pipe</b> & co", &["pipe".into()]);
        assert_eq!(html, "&lt;b&gt;<mark>pipe</mark>&lt;/b&gt; &amp; co");
    }

    #[test]
    fn test_highlight_never_matches_inside_entities() {
        // "amp" occurs in the escaped form of "&" but not in the raw text.
        let html = highlight("Tom & Jerry", &["amp".into()]);
        assert!(!html.contains("<mark>"));
        assert_eq!(html, "Tom &amp; Jerry");
    }

    #[test]
    fn test_highlight_multiple_occurrences() {
        let html = highlight("go go go", &["go".into()]);
        assert_eq!(html, "<mark>go</mark> <mark>go</mark> <mark>go</mark>");
    }

    #[test]
    fn test_query_terms_filters_short_tokens() {
        assert_eq!(query_terms("a pipelines of x", 2), vec!["of", "pipelines"]);
    }

    #[test]
    fn test_query_terms_strips_metacharacters() {
        assert_eq!(query_terms("<script>alert</script>", 2), vec!["alert", "script"]);
    }

    #[test]
    fn test_snippet_prefers_shortinfo() {
        let record = sample_record();
        let html = snippet_html(&record, &["pipelines".into()], 150);
        assert!(html.contains("Getting started"));
        assert!(html.contains("<mark>pipelines</mark>"));
        assert!(!html.ends_with('\u{2026}'));
    }

    #[test]
    fn test_snippet_falls_back_to_content_with_ellipsis() {
        let record = record_from_json(serde_json::json!({
            "id": 1,
            "title": "Body only",
            "url": "/posts/body",
            "content": "word ".repeat(100)
        }));
        let html = snippet_html(&record, &[], 150);
        assert!(html.ends_with('\u{2026}'));
        // Markup overhead aside, the visible text is capped at 150 chars.
        assert!(html.chars().count() <= 151);
    }

    #[test]
    fn test_snippet_normalizes_whitespace() {
        let record = record_from_json(serde_json::json!({
            "id": 1,
            "title": "T",
            "url": "/t",
            "content": "line one\n\n\tline   two"
        }));
        let html = snippet_html(&record, &[], 150);
        assert!(html.starts_with("line one line two"));
    }

    #[test]
    fn test_meta_line_joins_date_and_taxonomy() {
        let meta = meta_line(&sample_record()).unwrap();
        assert_eq!(meta, "2021-04-01 \u{00b7} engineering, jekyll, rust");
    }

    #[test]
    fn test_meta_line_absent_when_empty() {
        let record = record_from_json(serde_json::json!({
            "id": 1,
            "title": "T",
            "url": "/t"
        }));
        assert_eq!(meta_line(&record), None);
    }

    #[test]
    fn test_row_carries_index_and_url() {
        let records = vec![sample_record()];
        let hits = vec![Hit { position: 0, score: 1.0 }];
        let rows = rows(&records, &hits, "pipelines", &WidgetConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].url, "/posts/pipelines-intro");
        assert!(rows[0].html.contains(r#"data-index="0""#));
        assert!(rows[0].html.contains(r#"data-url="/posts/pipelines-intro""#));
        assert!(rows[0].html.contains("<mark>Pipelines</mark>"));
    }

    #[test]
    fn test_unresolvable_hit_is_skipped() {
        let records = vec![sample_record()];
        let hits = vec![
            Hit { position: 7, score: 2.0 },
            Hit { position: 0, score: 1.0 },
        ];
        let rows = rows(&records, &hits, "intro", &WidgetConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "/posts/pipelines-intro");
    }

    #[test]
    fn test_no_matches_view_escapes_query() {
        let html = view_html(&ResultsView::NoMatches {
            query: "<script>".into(),
        });
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_rows_view_concatenates_markup() {
        let row = ResultRow {
            index: 0,
            url: "/a".into(),
            html: "<li>a</li>".into(),
        };
        let html = view_html(&ResultsView::Rows(vec![row]));
        assert_eq!(html, r#"<ul class="search-results"><li>a</li></ul>"#);
    }
}
