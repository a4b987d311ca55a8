//! Fuzzy search over the registry catalog
//!
//! Schemas are scored on three fields with fixed weights (name 0.4, title 0.4,
//! description 0.2). Queries shorter than two characters skip scoring and list
//! the catalog as-is. Results are paged: [`SchemaIndex::load_more`] grows the
//! visible window, and a different query shrinks it back to one page.

pub mod debounce;
pub mod score;

use std::time::{Duration, Instant};

use crate::registry::ServerSchema;

pub use debounce::Debouncer;
use score::{field_score, normalize_query};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_THRESHOLD: f64 = 0.4;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_CHARS: usize = 2;

/// Searchable schema fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaField {
    Name,
    Title,
    Description,
}

impl SchemaField {
    fn text(self, schema: &ServerSchema) -> Option<&str> {
        match self {
            SchemaField::Name => Some(&schema.name),
            SchemaField::Title => schema.title.as_deref(),
            SchemaField::Description => schema.description.as_deref(),
        }
    }
}

pub const FIELD_WEIGHTS: [(SchemaField, f64); 3] = [
    (SchemaField::Name, 0.4),
    (SchemaField::Title, 0.4),
    (SchemaField::Description, 0.2),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub page_size: usize,
    /// Highest field score still counted as a match
    pub threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// A catalog entry that matched, by position in the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch {
    pub index: usize,
    /// Weighted similarity; higher is better
    pub relevance: f64,
}

/// Score `catalog` against `query`, best first.
///
/// Pure and stateless; short queries return every schema in catalog order.
pub fn search(catalog: &[ServerSchema], query: &str, threshold: f64) -> Vec<ScoredMatch> {
    let pattern = normalize_query(query);
    if pattern.len() < MIN_QUERY_CHARS {
        return (0..catalog.len())
            .map(|index| ScoredMatch {
                index,
                relevance: 1.0,
            })
            .collect();
    }

    let mut matches: Vec<ScoredMatch> = catalog
        .iter()
        .enumerate()
        .filter_map(|(index, schema)| {
            let mut relevance = 0.0;
            let mut matched = false;
            for (field, weight) in FIELD_WEIGHTS {
                let Some(text) = field.text(schema) else {
                    continue;
                };
                let score = field_score(&pattern, text);
                if score <= threshold {
                    matched = true;
                    relevance += weight * (1.0 - score);
                }
            }
            matched.then_some(ScoredMatch { index, relevance })
        })
        .collect();

    // Stable: ties keep catalog order
    matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    matches
}

/// Paged view of a catalog filtered by the current query
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    catalog: Vec<ServerSchema>,
    options: SearchOptions,
    query: String,
    limit: usize,
    matches: Vec<ScoredMatch>,
}

impl SchemaIndex {
    pub fn new(catalog: Vec<ServerSchema>, options: SearchOptions) -> Self {
        let matches = search(&catalog, "", options.threshold);
        Self {
            catalog,
            limit: options.page_size,
            options,
            query: String::new(),
            matches,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn catalog(&self) -> &[ServerSchema] {
        &self.catalog
    }

    /// Re-score for a new query. The page window resets only if the text changed.
    pub fn set_query(&mut self, query: &str) {
        if query == self.query {
            return;
        }
        self.query = query.to_string();
        self.limit = self.options.page_size;
        self.matches = search(&self.catalog, query, self.options.threshold);
        tracing::debug!("Query '{}' matched {} schemas", query, self.matches.len());
    }

    pub fn load_more(&mut self) {
        self.limit = self.limit.saturating_add(self.options.page_size);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Visible page of results
    pub fn results(&self) -> Vec<&ServerSchema> {
        self.matches
            .iter()
            .take(self.limit)
            .map(|m| &self.catalog[m.index])
            .collect()
    }

    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn has_more(&self) -> bool {
        self.matches.len() > self.limit
    }
}

/// Debounced search input bound to an index
#[derive(Debug, Clone)]
pub struct SchemaSearch {
    index: SchemaIndex,
    input: Debouncer<String>,
}

impl SchemaSearch {
    pub fn new(index: SchemaIndex, settle: Duration) -> Self {
        Self {
            index,
            input: Debouncer::new(settle),
        }
    }

    /// Record a keystroke-level edit of the query.
    pub fn edit(&mut self, query: impl Into<String>, now: Instant) {
        self.input.push(query.into(), now);
    }

    /// Apply the query if it has settled. Returns whether scoring ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.input.poll(now) {
            Some(query) => {
                self.index.set_query(&query);
                true
            }
            None => false,
        }
    }

    /// An edit is waiting for its settle window
    pub fn is_searching(&self) -> bool {
        self.input.is_pending()
    }

    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut SchemaIndex {
        &mut self.index
    }
}
