//! External collaborator traits
//!
//! The physical graph store, the JSON-LD framing adapter, the annotation
//! persistence path, and the primary manifest indexer all live outside this
//! crate. They are injected as trait objects so the query layer carries no
//! implicit knowledge of any particular backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::query::SelectQuery;
use crate::rdf::{Binding, NamedGraph};

/// Transaction mode for a graph-store transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    Read,
    Write,
}

/// The physical triple/quad store
///
/// The store understands a declarative graph-pattern query language and
/// named-graph addressing. A `None` result set means the store holds no
/// data for the query, which callers treat as zero rows.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Open a transaction in the given mode
    async fn begin(&self, mode: TransactionMode) -> Result<()>;

    /// Close the current transaction
    async fn end(&self) -> Result<()>;

    /// Execute a SELECT query, returning solution rows in query order
    async fn select(&self, query: &SelectQuery) -> Result<Option<Vec<Binding>>>;

    /// Fetch the named graph for a URI, `None` if absent
    async fn named_graph(&self, uri: &str) -> Result<Option<NamedGraph>>;
}

/// JSON-LD framing adapter: named graph to IIIF document shape
#[async_trait]
pub trait DocumentFramer: Send + Sync {
    /// Frame an annotation graph as its IIIF JSON document
    ///
    /// `include_context` controls whether the `@context` key is emitted on
    /// the framed document.
    async fn frame_annotation(&self, graph: &NamedGraph, include_context: bool) -> Result<Value>;

    /// Frame a manifest graph as its IIIF JSON document
    async fn frame_manifest(&self, graph: &NamedGraph) -> Result<Value>;
}

/// Persistence path for repaired annotations
#[async_trait]
pub trait AnnotationUpdater: Send + Sync {
    /// Persist an updated annotation document, replacing the stored graph
    async fn update_annotation(&self, document: &Value) -> Result<()>;
}

/// The primary manifest indexing step
///
/// Indexing the manifest content itself is external; this layer only runs
/// the consistency repair that follows it.
#[async_trait]
pub trait ManifestIndexer: Send + Sync {
    /// Index a manifest, returning the canonical short id and manifest URI
    async fn index_manifest_primary(
        &self,
        short_id: &str,
        manifest: &Value,
    ) -> Result<IndexedManifest>;
}

/// Outcome of primary manifest indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedManifest {
    /// The canonical short id assigned by the indexer
    pub short_id: String,
    /// The manifest's graph URI
    pub uri: String,
}
