//! Graph-pattern query construction
//!
//! Queries are built from fixed templates plus caller parameters. Every
//! caller-supplied value passes through [`iri`], [`literal`], or
//! [`regex_term`] before it is spliced into query text, so a crafted search
//! term or identifier cannot alter the query's structure.

mod templates;

pub use templates::{
    all_annotations, annotated_page_counts, annotations_on_page, manifest_by_short_id,
    manifests, manifests_for_canvas, orphan_annotations, search_annotations,
};

use crate::error::{Error, Result};

/// A rendered SELECT query ready for the graph store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    text: String,
}

impl SelectQuery {
    pub(crate) fn new(text: String) -> Self {
        Self { text }
    }

    /// The query text handed to the store
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A caller IRI validated for splicing into a `<...>` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IriRef(String);

impl IriRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IriRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a caller-supplied IRI for use inside a `<...>` token
///
/// Rejects the characters that would terminate the token or smuggle in
/// additional pattern text. The store performs its own full IRI parsing;
/// this guard only has to keep the query text well-formed.
pub fn iri(value: &str) -> Result<IriRef> {
    if value.is_empty() {
        return Err(Error::InvalidIri("empty IRI".to_string()));
    }
    if value
        .chars()
        .any(|c| matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`') || c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidIri(value.to_string()));
    }
    Ok(IriRef(value.to_string()))
}

/// Escape a caller-supplied string for a single-quoted query literal
pub fn literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a free-text search term for use inside a regex FILTER
///
/// The term must match as a literal substring, so regex metacharacters are
/// escaped first and the result is then literal-escaped for quoting.
pub fn regex_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    literal(&escaped)
}
