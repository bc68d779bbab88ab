//! The annotation query service
//!
//! Facade over the query templates, the transactional executor, the search
//! engine, and the consistency maintainer. This is the surface an HTTP
//! layer or ingest pipeline talks to.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::consistency::ConsistencyMaintainer;
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::query;
use crate::rdf::NamedGraph;
use crate::search::{AnnotationList, SearchEngine, SearchQuery};
use crate::store::{
    AnnotationUpdater, DocumentFramer, GraphStore, ManifestIndexer, TransactionMode,
};

/// Annotation count for one annotated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageAnnoCount {
    #[serde(rename = "pageId")]
    pub page_id: String,
    pub count: u64,
}

/// Query and consistency operations over the annotation graph store
#[derive(Clone)]
pub struct AnnotationQueryService {
    store: Arc<dyn GraphStore>,
    framer: Arc<dyn DocumentFramer>,
    executor: QueryExecutor,
    search: SearchEngine,
    consistency: ConsistencyMaintainer,
}

impl AnnotationQueryService {
    pub fn new(
        store: Arc<dyn GraphStore>,
        framer: Arc<dyn DocumentFramer>,
        updater: Arc<dyn AnnotationUpdater>,
        indexer: Arc<dyn ManifestIndexer>,
    ) -> Self {
        Self {
            executor: QueryExecutor::new(store.clone()),
            search: SearchEngine::new(store.clone(), framer.clone()),
            consistency: ConsistencyMaintainer::new(
                store.clone(),
                framer.clone(),
                updater,
                indexer,
            ),
            store,
            framer,
        }
    }

    /// All annotations whose target's source is the given page
    pub async fn annotations_from_page(&self, page_id: &str) -> Result<Vec<NamedGraph>> {
        let select = query::annotations_on_page(page_id)?;
        let rows = self.executor.select(&select, TransactionMode::Read).await?;

        let mut annotations = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(uri) = row.iri("annoId") else { continue };
            match self.store.named_graph(uri).await? {
                Some(graph) => annotations.push(graph),
                None => tracing::warn!("annotation graph {uri} listed for page but missing"),
            }
        }
        Ok(annotations)
    }

    /// URIs of every stored manifest
    pub async fn manifests(&self) -> Result<Vec<String>> {
        let rows = self
            .executor
            .select(&query::manifests(), TransactionMode::Read)
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.iri("manifest").map(str::to_string))
            .collect())
    }

    /// The manifest URI for a caller-facing short id, `None` if unknown
    pub async fn resolve_manifest_id(&self, short_id: &str) -> Result<Option<String>> {
        let rows = self
            .executor
            .select(&query::manifest_by_short_id(short_id), TransactionMode::Read)
            .await?;
        Ok(rows
            .first()
            .and_then(|row| row.iri("manifest"))
            .map(str::to_string))
    }

    /// The framed manifest document for a short id, `None` if unknown
    pub async fn manifest(&self, short_id: &str) -> Result<Option<Value>> {
        let Some(uri) = self.resolve_manifest_id(short_id).await? else {
            tracing::debug!("no manifest for short id {short_id}");
            return Ok(None);
        };
        let Some(graph) = self.store.named_graph(&uri).await? else {
            tracing::warn!("manifest {uri} resolved but its graph is missing");
            return Ok(None);
        };
        Ok(Some(self.framer.frame_manifest(&graph).await?))
    }

    /// Paginated full-text search over annotation bodies
    pub async fn search(&self, request: &SearchQuery) -> Result<AnnotationList> {
        self.search.search(request).await
    }

    /// Annotation counts per page, ordered by page id
    pub async fn annotated_pages(&self) -> Result<Vec<PageAnnoCount>> {
        let rows = self
            .executor
            .select(&query::annotated_page_counts(), TransactionMode::Read)
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let page_id = row.iri("pageId")?.to_string();
                let count = row.count("count")?;
                Some(PageAnnoCount { page_id, count })
            })
            .collect())
    }

    /// Manifests containing the given canvas, `None` when there are none
    pub async fn manifests_for_canvas(&self, canvas_id: &str) -> Result<Option<Vec<String>>> {
        let select = query::manifests_for_canvas(canvas_id)?;
        let rows = self.executor.select(&select, TransactionMode::Read).await?;

        let parents: Vec<String> = rows
            .iter()
            .filter_map(|row| row.iri("manifest").map(str::to_string))
            .collect();
        Ok(if parents.is_empty() { None } else { Some(parents) })
    }

    /// Every annotation in the store, framed without context
    ///
    /// Manifest list nodes are excluded; the envelope carries no pagination
    /// block.
    pub async fn all_annotations(&self) -> Result<AnnotationList> {
        let rows = self
            .executor
            .select(&query::all_annotations(), TransactionMode::Read)
            .await?;

        let mut resources = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(uri) = row.iri("anno") else { continue };
            let Some(graph) = self.store.named_graph(uri).await? else {
                tracing::warn!("annotation graph {uri} listed but missing");
                continue;
            };
            resources.push(self.framer.frame_annotation(&graph, false).await?);
        }
        Ok(AnnotationList::plain(resources))
    }

    /// Index a manifest and repair annotations it orphaned
    pub async fn reconcile_after_index(&self, short_id: &str, manifest: &Value) -> Result<String> {
        self.consistency.reconcile_after_index(short_id, manifest).await
    }
}
