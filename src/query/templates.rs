//! Query templates
//!
//! Pure builders, one per logical operation. Graph patterns mirror the IIIF
//! Presentation v2 / Open Annotation data shape: annotation targets point at
//! canvases via `oa:hasSource`, manifests reach their canvases through
//! `sc:hasSequences` and an RDF linked list under `sc:hasCanvases`.

use super::{iri, literal, regex_term, IriRef, SelectQuery};
use crate::error::Result;

const PREFIXES: &str = "PREFIX oa: <http://www.w3.org/ns/oa#> \
                        PREFIX sc: <http://iiif.io/api/presentation/2#> \
                        PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> \
                        PREFIX dcterms: <http://purl.org/dc/terms/> \
                        PREFIX dc: <http://purl.org/dc/elements/1.1/> \
                        PREFIX cnt: <http://www.w3.org/2011/content#> ";

/// Annotations whose target's source is the given page
///
/// Projects `?annoId` and `?graph`.
pub fn annotations_on_page(page_id: &str) -> Result<SelectQuery> {
    let page = iri(page_id)?;
    Ok(SelectQuery::new(format!(
        "{PREFIXES}select ?annoId ?graph where {{ \
           GRAPH ?graph {{ ?on oa:hasSource <{page}> . \
             ?annoId oa:hasTarget ?on }} \
         }}"
    )))
}

/// All graph subjects typed as a Manifest
///
/// Projects `?manifest`.
pub fn manifests() -> SelectQuery {
    SelectQuery::new(format!(
        "{PREFIXES}select ?manifest where {{ \
           GRAPH ?graph {{ ?manifest rdf:type sc:Manifest }} \
         }}"
    ))
}

/// The manifest whose `dc:identifier` literal equals the given short id
///
/// Projects `?manifest`; at most one row, absence is a normal outcome.
pub fn manifest_by_short_id(short_id: &str) -> SelectQuery {
    let id = literal(short_id);
    SelectQuery::new(format!(
        "{PREFIXES}select ?manifest where {{ \
           GRAPH ?graph {{ ?manifest rdf:type sc:Manifest . \
             ?manifest dc:identifier '{id}' }} \
         }}"
    ))
}

/// Manifests whose sequence's canvas list contains the given canvas
///
/// The canvas list is an RDF linked list, so membership needs the
/// transitive `rdf:rest*/rdf:first` path, not a single hop. Projects
/// `?manifest`.
pub fn manifests_for_canvas(canvas_id: &str) -> Result<SelectQuery> {
    let canvas = iri(canvas_id)?;
    Ok(SelectQuery::new(format!(
        "{PREFIXES}select ?manifest where {{ \
           GRAPH ?graph {{ \
             ?manifest sc:hasSequences ?sequence . \
             ?sequence ?sequenceCount ?sequenceId . \
             ?sequenceId rdf:type sc:Sequence . \
             ?sequenceId sc:hasCanvases ?canvasList . \
             ?canvasList rdf:rest*/rdf:first <{canvas}> \
           }} \
         }}"
    )))
}

/// Annotations in scope whose body text matches the search term
///
/// Case-sensitive substring match; the term is escaped so it matches
/// literally. Ordered by annotation id for deterministic pagination.
/// Projects `?anno`, `?content`, and `?graph`.
pub fn search_annotations(scope: &IriRef, term: &str) -> SelectQuery {
    let term = regex_term(term);
    SelectQuery::new(format!(
        "{PREFIXES}select ?anno ?content ?graph where {{ \
           GRAPH ?graph {{ ?anno oa:hasTarget ?target . \
             ?anno oa:hasBody ?body . \
             ?target dcterms:isPartOf <{scope}> . \
             ?body cnt:chars ?content . \
             FILTER regex(str(?content), \".*{term}.*\") \
           }} \
         }} ORDER BY ?anno"
    ))
}

/// Annotations targeting one of a manifest's canvases without a link back
/// to that manifest
///
/// Set difference: canvases transitively reachable from the manifest's
/// sequences, minus annotations whose target already carries
/// `dcterms:isPartOf` for it. Projects distinct `?graph` (the annotation
/// graph URIs needing repair).
pub fn orphan_annotations(manifest_uri: &IriRef) -> SelectQuery {
    SelectQuery::new(format!(
        "{PREFIXES}select distinct ?graph where {{ \
           GRAPH ?graph2 {{ \
             <{manifest_uri}> sc:hasSequences ?sequence . \
             ?sequence ?sequenceCount ?sequenceId . \
             ?sequenceId rdf:type sc:Sequence . \
             ?sequenceId sc:hasCanvases ?canvasList . \
             ?canvasList rdf:rest*/rdf:first ?canvas \
           }} \
           GRAPH ?graph {{ \
             ?source oa:hasSource ?canvas . \
             ?anno oa:hasTarget ?source . \
             FILTER NOT EXISTS {{ ?source dcterms:isPartOf <{manifest_uri}> }} \
           }} \
         }}"
    ))
}

/// Every Annotation-typed subject that is not a list node
///
/// Manifest canvas lists are plumbing; anything sitting under `rdf:first`
/// is filtered out. Projects `?anno`.
pub fn all_annotations() -> SelectQuery {
    SelectQuery::new(format!(
        "{PREFIXES}select ?anno where {{ \
           GRAPH ?graph {{ ?anno rdf:type oa:Annotation . \
             FILTER NOT EXISTS {{ ?canvas rdf:first ?anno }} \
           }} \
         }}"
    ))
}

/// Annotation counts per annotated page, ordered by page id
///
/// Projects `?pageId` and aggregated `?count`.
pub fn annotated_page_counts() -> SelectQuery {
    SelectQuery::new(format!(
        "{PREFIXES}select ?pageId (count(?annoId) as ?count) where {{ \
           GRAPH ?graph {{ ?on oa:hasSource ?pageId . \
             ?annoId oa:hasTarget ?on }} \
         }} group by ?pageId order by ?pageId"
    ))
}
