//! Full-text annotation search with IIIF AnnotationList envelopes
//!
//! One read transaction materializes the ordered result set, the page
//! window is sliced out of it, and each windowed result is framed to JSON
//! with a snippet label attached. Pagination links are minted from
//! independent copies of the query parameters.

pub mod snippet;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::executor::QueryExecutor;
use crate::query;
use crate::store::{DocumentFramer, GraphStore, TransactionMode};

/// IIIF Presentation v2 context emitted on every envelope
pub const IIIF_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";

/// Parameters of one search request
///
/// Immutable: pagination-link construction goes through [`with_page`]
/// copies so the page used for the window computation is never disturbed.
///
/// [`with_page`]: SearchQuery::with_page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Caller-facing search endpoint, the base of every pagination link
    pub base_uri: String,
    /// Manifest URI restricting the search
    pub scope: String,
    /// Free-text term, matched case-sensitively as a substring
    pub term: String,
    /// 0-based page index
    pub page: usize,
    /// Page size; always at least 1
    pub results_per_page: usize,
}

/// Default page size when the caller does not name one
pub const DEFAULT_RESULTS_PER_PAGE: usize = 20;

impl SearchQuery {
    pub fn new(
        base_uri: impl Into<String>,
        scope: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            base_uri: base_uri.into(),
            scope: scope.into(),
            term: term.into(),
            page: 0,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
        }
    }

    /// Copy of this query positioned on `page`
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Copy of this query with the given page size (clamped to at least 1)
    pub fn with_results_per_page(&self, results_per_page: usize) -> Self {
        Self {
            results_per_page: results_per_page.max(1),
            ..self.clone()
        }
    }

    /// The caller-facing URI of this query, used for pagination links
    ///
    /// Carries the page size too, so a client following `next` windows the
    /// same way the request that minted the link did.
    pub fn to_uri(&self) -> String {
        format!(
            "{}?q={}&page={}&resultsPerPage={}",
            self.base_uri,
            urlencoding::encode(&self.term),
            self.page,
            self.results_per_page
        )
    }
}

/// Pagination block of an [`AnnotationList`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Within {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Within {
    fn new(total: usize) -> Self {
        Self {
            kind: "sc:Layer",
            total,
            first: None,
            last: None,
            next: None,
        }
    }
}

/// A IIIF AnnotationList result envelope
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationList {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    /// Framed annotation documents, in result order
    pub resources: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within: Option<Within>,
    #[serde(rename = "startIndex", skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
}

impl AnnotationList {
    /// An envelope with no pagination block (plain annotation listing)
    pub(crate) fn plain(resources: Vec<Value>) -> Self {
        Self {
            context: IIIF_CONTEXT,
            kind: "sc:AnnotationList",
            resources,
            within: None,
            start_index: None,
        }
    }
}

/// Executes searches and builds result envelopes
#[derive(Clone)]
pub struct SearchEngine {
    executor: QueryExecutor,
    store: Arc<dyn GraphStore>,
    framer: Arc<dyn DocumentFramer>,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn GraphStore>, framer: Arc<dyn DocumentFramer>) -> Self {
        Self {
            executor: QueryExecutor::new(store.clone()),
            store,
            framer,
        }
    }

    /// Run a paginated search and build its envelope
    ///
    /// An out-of-range page yields an empty but well-formed envelope. A
    /// framing failure on any windowed result aborts the whole search.
    pub async fn search(&self, request: &SearchQuery) -> Result<AnnotationList> {
        let scope = query::iri(&request.scope)?;
        let select = query::search_annotations(&scope, &request.term);
        let rows = self
            .executor
            .select(&select, TransactionMode::Read)
            .await?;

        let total = rows.len();
        let per_page = request.results_per_page.max(1);
        let start = request.page.saturating_mul(per_page);
        let end = usize::min(start.saturating_add(per_page), total);

        let mut within = Within::new(total);
        let start_index;
        if total > per_page {
            let page_count = total / per_page;
            if request.page != page_count {
                within.next = Some(request.with_page(request.page + 1).to_uri());
            }
            within.first = Some(request.with_page(0).to_uri());
            within.last = Some(request.with_page(page_count).to_uri());
            start_index = request.page;
        } else {
            start_index = 0;
        }

        let mut resources = Vec::new();
        if start < end {
            for row in &rows[start..end] {
                let anno_uri = row.iri("anno").ok_or_else(|| {
                    Error::StoreUnavailable("search result row lacks an ?anno binding".to_string())
                })?;
                let graph = self.store.named_graph(anno_uri).await?.ok_or_else(|| {
                    Error::StoreUnavailable(format!("annotation graph {anno_uri} is missing"))
                })?;

                let mut doc = self.framer.frame_annotation(&graph, true).await?;
                match body_text(&doc) {
                    Some(text) => {
                        let label = snippet::extract(text, &request.term);
                        doc["label"] = Value::String(label);
                    }
                    None => {
                        tracing::debug!(
                            annotation = anno_uri,
                            "annotation body has no usable text, omitting snippet"
                        );
                    }
                }
                resources.push(doc);
            }
        }

        Ok(AnnotationList {
            context: IIIF_CONTEXT,
            kind: "sc:AnnotationList",
            resources,
            within: Some(within),
            start_index: Some(start_index),
        })
    }
}

/// Body text of a framed annotation, if the document has the expected shape
///
/// The `resource` entry may be a single body object or a sequence of them;
/// the first body's `chars` string is the searchable text.
fn body_text(doc: &Value) -> Option<&str> {
    let resource = doc.get("resource")?;
    let body = match resource {
        Value::Array(items) => items.first()?,
        other => other,
    };
    body.get("chars")?.as_str()
}
