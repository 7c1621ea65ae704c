//! Search document loading.
//!
//! The document is a JSON array of records produced by the site build. The
//! widget fetches it at most once per page session; the controller guards
//! the single-flight behavior, this module only parses (and, for native
//! hosts, fetches) the bytes.

use crate::models::SearchRecord;
use thiserror::Error;

/// Error type for document loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to parse search document: {0}")]
    Parse(#[from] serde_json::Error),
    #[cfg(feature = "http")]
    #[error("failed to fetch search document: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "http")]
    #[error("search document request returned HTTP {0}")]
    Status(u16),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Parse the raw document body into the record sequence.
pub fn parse_records(body: &str) -> LoadResult<Vec<SearchRecord>> {
    let records: Vec<SearchRecord> = serde_json::from_str(body)?;
    Ok(records)
}

/// Blocking fetch-and-parse for hosts with direct network access.
/// Browser-like hosts instead start the fetch through
/// [`crate::surface::Surface::begin_fetch`] and deliver the body to the
/// widget's load callbacks.
#[cfg(feature = "http")]
pub fn fetch_records(url: &str) -> LoadResult<Vec<SearchRecord>> {
    let response = reqwest::blocking::get(url)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }
    let body = response.text()?;
    parse_records(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let records = parse_records(
            r#"[
                {"id": 0, "title": "One", "url": "/one", "tags": "a"},
                {"id": 1, "title": "Two", "url": "/two", "tags": ["b", "c"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "Two");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_records(r#"{"id": 0}"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_records("[{").is_err());
    }
}
