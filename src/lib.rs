//! Marginalia
//!
//! Query and consistency layer for a IIIF annotation graph store. The
//! physical triple store, the JSON-LD framing adapter, the annotation
//! persistence path, and the primary manifest indexer are injected
//! collaborators; this crate orchestrates them to answer structural
//! queries (annotations on a page, manifests containing a canvas), run
//! paginated full-text search over annotation bodies, and repair
//! annotations left unlinked after a manifest is (re)indexed.
//!
//! # Modules
//!
//! - `service`: [`AnnotationQueryService`], the operation surface
//! - `store`: collaborator traits (graph store, framer, updater, indexer)
//! - `query`: graph-pattern query templates and safe parameterization
//! - `executor`: one-transaction-per-query execution
//! - `search`: pagination, envelope construction, snippets
//! - `consistency`: post-index orphan-annotation repair
//! - `rdf`: triple/graph/binding value types and vocabulary

pub mod consistency;
pub mod error;
pub mod executor;
pub mod query;
pub mod rdf;
pub mod search;
pub mod service;
pub mod store;


pub use error::{Error, Result};
pub use search::{AnnotationList, SearchQuery, Within};
pub use service::{AnnotationQueryService, PageAnnoCount};
pub use store::{
    AnnotationUpdater, DocumentFramer, GraphStore, IndexedManifest, ManifestIndexer,
    TransactionMode,
};
