//! Tantivy index over the loaded records.
//!
//! Built in RAM once per page session and never rebuilt; the record sequence
//! is immutable for the lifetime of the page. Queries go through Tantivy's
//! parser with single-edit fuzziness on every field; when the parser rejects
//! the raw text (quotes, stray syntax), a hand-assembled plain-token query
//! takes over.

use crate::interface::Hit;
use crate::models::SearchRecord;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, FAST, STORED,
};
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument, Term};
use thiserror::Error;

/// Edit distance tolerated by the primary query attempt.
const FUZZY_DISTANCE: u8 = 1;

/// Error type for index operations
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),
    #[error("query contains no searchable terms")]
    QueryRejected,
}

pub type IndexResult<T> = Result<T, IndexError>;

/// In-memory search index with weighted record fields.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    id_field: Field,
    title_field: Field,
    taxonomy_field: Field,
    shortinfo_field: Field,
    content_field: Field,
}

impl SearchIndex {
    /// Build the index from the full record sequence. Ids are expected to be
    /// dense 0-based positions; a mismatch is logged and the position wins.
    pub fn build(records: &[SearchRecord]) -> IndexResult<Self> {
        let schema = Self::build_schema();
        let index = Index::create_in_ram(schema.clone());

        let id_field = schema.get_field("id")?;
        let title_field = schema.get_field("title")?;
        let taxonomy_field = schema.get_field("taxonomy")?;
        let shortinfo_field = schema.get_field("shortinfo")?;
        let content_field = schema.get_field("content")?;

        let mut writer = index.writer(15_000_000)?;
        for (position, record) in records.iter().enumerate() {
            if record.id as usize != position {
                log::warn!(
                    "search record id {} found at position {}, using position",
                    record.id,
                    position
                );
            }
            let mut doc = TantivyDocument::default();
            doc.add_u64(id_field, position as u64);
            doc.add_text(title_field, &record.title);
            doc.add_text(taxonomy_field, record.taxonomy_text());
            if let Some(shortinfo) = record.shortinfo_text() {
                doc.add_text(shortinfo_field, shortinfo);
            }
            doc.add_text(content_field, &record.content);
            writer.add_document(doc)?;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            id_field,
            title_field,
            taxonomy_field,
            shortinfo_field,
            content_field,
        })
    }

    fn build_schema() -> Schema {
        let mut builder = Schema::builder();
        builder.add_u64_field("id", STORED | FAST);

        let indexing = TextFieldIndexing::default()
            .set_tokenizer("default")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text = TextOptions::default().set_indexing_options(indexing);
        builder.add_text_field("title", text.clone());
        builder.add_text_field("taxonomy", text.clone());
        builder.add_text_field("shortinfo", text.clone());
        builder.add_text_field("content", text);
        builder.build()
    }

    /// Field weights: title dominates, taxonomy and shortinfo sit between,
    /// body text is the baseline.
    fn weighted_fields(&self) -> [(Field, f32); 4] {
        [
            (self.title_field, 10.0),
            (self.taxonomy_field, 5.0),
            (self.shortinfo_field, 3.0),
            (self.content_field, 1.0),
        ]
    }

    /// Execute a query and return up to `limit` hits, relevance-descending.
    /// Ties keep the engine's internal order.
    pub fn query(&self, raw: &str, limit: usize) -> IndexResult<Vec<Hit>> {
        let searcher = self.reader.searcher();

        let query: Box<dyn Query> = match self.fuzzy_parser().parse_query(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::debug!("fuzzy parse rejected {raw:?}, falling back to tokens: {err}");
                self.token_query(raw)?
            }
        };

        let top_docs = searcher.search(&*query, &TopDocs::with_limit(limit.max(1)))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let position = doc
                .get_first(self.id_field)
                .and_then(|value| value.as_u64())
                .unwrap_or(0) as usize;
            hits.push(Hit { position, score });
        }
        Ok(hits)
    }

    /// Parser for the primary attempt: every term on every field matches
    /// within one edit, transpositions counted as one.
    fn fuzzy_parser(&self) -> QueryParser {
        let mut parser = QueryParser::for_index(
            &self.index,
            vec![
                self.title_field,
                self.taxonomy_field,
                self.shortinfo_field,
                self.content_field,
            ],
        );
        for (field, boost) in self.weighted_fields() {
            parser.set_field_boost(field, boost);
            parser.set_field_fuzzy(field, false, FUZZY_DISTANCE, true);
        }
        parser
    }

    /// Fallback for raw text the parser rejects: lowercase alphanumeric
    /// tokens, each an exact term clause against every weighted field.
    fn token_query(&self, raw: &str) -> IndexResult<Box<dyn Query>> {
        let tokens: Vec<String> = raw
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        if tokens.is_empty() {
            return Err(IndexError::QueryRejected);
        }

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for (field, boost) in self.weighted_fields() {
            for token in &tokens {
                let term = Term::from_field_text(field, token);
                let term_query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
                clauses.push((Occur::Should, Box::new(BoostQuery::new(term_query, boost))));
            }
        }
        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    /// Number of indexed records.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}
