//! Error types
//!
//! One error enum for the whole crate. Expected absences (unknown short id,
//! canvas with no manifest, missing graph during repair) are `Option`s at the
//! call sites, never errors.

use thiserror::Error;

/// Errors surfaced by the query and consistency layer
#[derive(Debug, Error)]
pub enum Error {
    /// The graph store could not open a transaction or execute a query
    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    /// The framing adapter could not convert a graph to its JSON shape
    #[error("Framing failed: {0}")]
    Framing(String),

    /// The persistence path refused an updated annotation document
    #[error("Annotation update failed: {0}")]
    Update(String),

    /// A caller-supplied IRI contains characters that cannot appear in a
    /// query IRI token
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// The primary manifest indexing step failed
    #[error("Manifest indexing failed: {0}")]
    Indexing(String),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
