//! Search result snippets
//!
//! A snippet is a small window of the annotation body text around the first
//! token containing the search term. Embedded markup tags are stripped
//! before tokenizing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches simple embedded markup tags like `<p>`, `</b>`, `< br />`
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("<[ /]*[a-zA-Z0-9 ]*[ /]*>").expect("tag pattern is valid")
});

/// Number of tokens a text must have before windowing kicks in
const MIN_WINDOW_TOKENS: usize = 5;

/// Tokens of context kept before and after the matched token
const CONTEXT_TOKENS: usize = 2;

/// Build a snippet of `text` around the first token containing `term`
///
/// Short texts (fewer than five tokens after tag stripping) come back
/// whole, as does any text where no token contains the term.
pub fn extract(text: &str, term: &str) -> String {
    let cleaned = TAG_RE.replace_all(text, "").into_owned();
    let tokens: Vec<&str> = cleaned.split(' ').collect();

    if tokens.len() < MIN_WINDOW_TOKENS {
        return cleaned;
    }

    let Some(found) = tokens.iter().position(|token| token.contains(term)) else {
        return cleaned;
    };

    let start = found.saturating_sub(CONTEXT_TOKENS);
    let end = usize::min(found + CONTEXT_TOKENS, tokens.len());
    tokens[start..end].join(" ")
}
