//! Lightweight RDF value types
//!
//! The physical triple store lives behind the [`crate::store::GraphStore`]
//! trait; these types are just the currency exchanged with it. A named graph
//! holds the triples of one logical document (an annotation or a manifest),
//! and a binding is one solution row of a graph-pattern query.

use serde::{Deserialize, Serialize};

/// IIIF / RDF vocabulary IRIs
///
/// The expanded forms of the prefixed names the query templates match
/// against. Store adapters and framers interpret graph data in these
/// terms; the templates themselves render prefixed names.
pub mod vocab {
    /// Open Annotation: annotation target
    pub const OA_HAS_TARGET: &str = "http://www.w3.org/ns/oa#hasTarget";
    /// Open Annotation: annotation body
    pub const OA_HAS_BODY: &str = "http://www.w3.org/ns/oa#hasBody";
    /// Open Annotation: target source (the canvas/page being annotated)
    pub const OA_HAS_SOURCE: &str = "http://www.w3.org/ns/oa#hasSource";
    /// Open Annotation: the Annotation class
    pub const OA_ANNOTATION: &str = "http://www.w3.org/ns/oa#Annotation";

    /// rdf:type
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// rdf:first (list head)
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// rdf:rest (list tail)
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// rdf:nil (list terminator)
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    /// IIIF Presentation v2: the Manifest class
    pub const SC_MANIFEST: &str = "http://iiif.io/api/presentation/2#Manifest";
    /// IIIF Presentation v2: the Sequence class
    pub const SC_SEQUENCE: &str = "http://iiif.io/api/presentation/2#Sequence";
    /// IIIF Presentation v2: manifest to sequence list
    pub const SC_HAS_SEQUENCES: &str = "http://iiif.io/api/presentation/2#hasSequences";
    /// IIIF Presentation v2: sequence to canvas list
    pub const SC_HAS_CANVASES: &str = "http://iiif.io/api/presentation/2#hasCanvases";

    /// dcterms:isPartOf (the "within" link on an annotation target)
    pub const DCTERMS_IS_PART_OF: &str = "http://purl.org/dc/terms/isPartOf";
    /// dc:identifier (the manifest short id literal)
    pub const DC_IDENTIFIER: &str = "http://purl.org/dc/elements/1.1/identifier";

    /// cnt:chars, the embedded full-text property on annotation bodies
    pub const CNT_CHARS: &str = "http://www.w3.org/2011/content#chars";
}

/// One RDF term: an IRI reference or a literal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// An IRI (or blank-node label)
    Iri(String),
    /// A literal; the lexical form only, datatypes are not modeled here
    Literal(String),
}

impl Term {
    /// The IRI string, if this term is an IRI
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    /// The literal lexical form, if this term is a literal
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Term::Iri(_) => None,
            Term::Literal(value) => Some(value),
        }
    }
}

/// A subject-predicate-object triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// A named graph: one logical document addressed by URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedGraph {
    /// The graph URI (also the document id)
    pub name: String,
    pub triples: Vec<Triple>,
}

impl NamedGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triples: Vec::new(),
        }
    }

    /// Objects of all `(subject, predicate, _)` triples in this graph
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }
}

/// One solution row of a graph-pattern query
///
/// Variable order follows the query's projection; lookup is by variable name
/// without the leading `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    values: Vec<(String, Term)>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable; later binds of the same name shadow earlier ones
    pub fn with(mut self, variable: impl Into<String>, term: Term) -> Self {
        self.values.push((variable.into(), term));
        self
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.values
            .iter()
            .rev()
            .find(|(name, _)| name == variable)
            .map(|(_, term)| term)
    }

    /// The IRI bound to `variable`, if any
    pub fn iri(&self, variable: &str) -> Option<&str> {
        self.get(variable).and_then(Term::as_iri)
    }

    /// The literal bound to `variable`, if any
    pub fn literal(&self, variable: &str) -> Option<&str> {
        self.get(variable).and_then(Term::as_literal)
    }

    /// The literal bound to `variable`, parsed as an unsigned count
    pub fn count(&self, variable: &str) -> Option<u64> {
        self.literal(variable).and_then(|v| v.parse().ok())
    }
}
