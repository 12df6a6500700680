//! Search keyword derivation.
//!
//! Turns an extracted code body into a space-joined, lower-cased,
//! de-duplicated keyword string suitable for substring search. Common
//! declaration and control-flow keywords are dropped, as are tokens too
//! short to be useful.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Declaration/control-flow keywords never worth indexing.
pub const STOPLIST: &[&str] = &[
    "const", "let", "var", "if", "else", "for", "while", "return", "function", "class",
];

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// Derive the keyword string for one code body.
///
/// Tokens are identifier-shaped words, lower-cased; stoplist entries and
/// tokens of length <= 2 are discarded; duplicates keep only their first
/// occurrence. The survivors are joined with single spaces.
pub fn derive_keywords(code: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();

    for m in WORD_RE.find_iter(code) {
        let token = m.as_str().to_lowercase();
        if token.len() <= 2 || STOPLIST.contains(&token.as_str()) {
            continue;
        }
        if seen.insert(token.clone()) {
            out.push(token);
        }
    }

    out.join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
