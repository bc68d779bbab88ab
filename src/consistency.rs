//! Post-index consistency repair
//!
//! After a manifest is (re)indexed, annotations that target one of its
//! canvases may predate it and carry no link back to it. This pass finds
//! those orphans and patches each one with a `within` reference to the
//! manifest. The orphan query already excludes linked annotations, so a
//! second run for the same manifest repairs nothing.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::executor::QueryExecutor;
use crate::query;
use crate::store::{
    AnnotationUpdater, DocumentFramer, GraphStore, ManifestIndexer, TransactionMode,
};

/// Links orphaned annotations to a freshly indexed manifest
#[derive(Clone)]
pub struct ConsistencyMaintainer {
    executor: QueryExecutor,
    store: Arc<dyn GraphStore>,
    framer: Arc<dyn DocumentFramer>,
    updater: Arc<dyn AnnotationUpdater>,
    indexer: Arc<dyn ManifestIndexer>,
}

impl ConsistencyMaintainer {
    pub fn new(
        store: Arc<dyn GraphStore>,
        framer: Arc<dyn DocumentFramer>,
        updater: Arc<dyn AnnotationUpdater>,
        indexer: Arc<dyn ManifestIndexer>,
    ) -> Self {
        Self {
            executor: QueryExecutor::new(store.clone()),
            store,
            framer,
            updater,
            indexer,
        }
    }

    /// Index a manifest, then link any annotations it orphaned
    ///
    /// Candidate discovery uses one read transaction; each repair then
    /// talks to the store on its own, so no write lock is held across the
    /// batch. A failed repair is logged and skipped; the short id from
    /// primary indexing is returned regardless of how many repairs landed.
    pub async fn reconcile_after_index(&self, short_id: &str, manifest: &Value) -> Result<String> {
        let indexed = self.indexer.index_manifest_primary(short_id, manifest).await?;
        let manifest_iri = query::iri(&indexed.uri)?;

        let rows = self
            .executor
            .select(&query::orphan_annotations(&manifest_iri), TransactionMode::Read)
            .await?;

        // Each graph is repaired at most once per pass, in first-seen order.
        let mut candidates: Vec<String> = Vec::new();
        for row in &rows {
            match row.iri("graph") {
                Some(uri) if !candidates.iter().any(|seen| seen == uri) => {
                    candidates.push(uri.to_string());
                }
                Some(_) => {}
                None => tracing::warn!("orphan result row lacks a ?graph binding"),
            }
        }
        tracing::debug!(
            manifest = %indexed.uri,
            candidates = candidates.len(),
            "linking orphaned annotations"
        );

        for uri in &candidates {
            if let Err(err) = self.repair(uri, &indexed.uri).await {
                tracing::error!("failed to link annotation {uri} to {}: {err}", indexed.uri);
            }
        }

        Ok(indexed.short_id)
    }

    /// Patch one orphaned annotation with a `within` link and persist it
    async fn repair(&self, annotation_uri: &str, manifest_uri: &str) -> Result<()> {
        let Some(graph) = self.store.named_graph(annotation_uri).await? else {
            tracing::warn!("annotation graph {annotation_uri} not found during repair");
            return Ok(());
        };

        let mut doc = self.framer.frame_annotation(&graph, false).await?;
        add_within(&mut doc, manifest_uri)?;
        self.updater.update_annotation(&doc).await
    }
}

/// Add a `within` reference to the manifest on a framed annotation's target
///
/// Object targets gain a `within` key; bare-string targets are promoted to
/// an object keeping the old value under `full`.
pub(crate) fn add_within(doc: &mut Value, manifest_uri: &str) -> Result<()> {
    let Some(target) = doc.get_mut("on") else {
        return Err(Error::Framing(
            "framed annotation has no target to link".to_string(),
        ));
    };
    match target {
        Value::Object(fields) => {
            fields.insert("within".to_string(), Value::String(manifest_uri.to_string()));
            Ok(())
        }
        Value::String(full) => {
            let full = full.clone();
            *target = serde_json::json!({ "full": full, "within": manifest_uri });
            Ok(())
        }
        other => Err(Error::Framing(format!(
            "annotation target has unexpected shape: {other}"
        ))),
    }
}
