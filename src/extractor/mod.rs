//! Regex-based code unit extraction.
//!
//! Turns raw source text into named, located, keyword-tagged code units
//! without any real parsing. Three surface patterns catch function-like
//! constructs, one catches classes, and one catches import statements.
//! Body extents come from quote-aware brace matching ([`braces`]).
//!
//! This heuristic, surface-syntax approach is the core contract of the
//! tool: false matches inside comments or template strings are accepted,
//! and malformed code simply yields fewer (or zero) units, never an error.

pub mod braces;
pub mod keywords;

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{CodeUnit, Extraction, UnitKind, SNIPPET_LEN};

lazy_static! {
    /// Function-like constructs, one alternation scanned left-to-right,
    /// non-overlapping:
    ///   (1) `async? function name`
    ///   (2) `const|let name = async? (` (arrow/function expression binding)
    ///   (3) `name(...) {` (bare method-style definition)
    static ref FUNCTION_RE: Regex = Regex::new(
        r"(?:\basync\s+)?\bfunction\s+([A-Za-z_][A-Za-z0-9_]*)|\b(?:const|let)\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:async\s*)?\(|\b([A-Za-z_][A-Za-z0-9_]*)\s*\([^)]*\)\s*\{"
    )
    .unwrap();

    static ref CLASS_RE: Regex = Regex::new(r"\bclass\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();

    static ref IMPORT_RE: Regex =
        Regex::new(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"]"#).unwrap();
}

/// Stateless per-file extractor. Each call to [`Extractor::extract`] is
/// self-contained; there is no cross-file state.
pub struct Extractor;

impl Extractor {
    /// Extract every function, class, and import pattern from `source`.
    pub fn extract(source: &str) -> Extraction {
        let mut units = Vec::new();

        for caps in FUNCTION_RE.captures_iter(source) {
            let Some(m) = caps.get(0) else { continue };
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|g| g.as_str().to_string())
                .unwrap_or_default();
            units.push(make_unit(UnitKind::Function, name, source, m.start()));
        }

        for caps in CLASS_RE.captures_iter(source) {
            let Some(m) = caps.get(0) else { continue };
            let name = caps
                .get(1)
                .map(|g| g.as_str().to_string())
                .unwrap_or_default();
            units.push(make_unit(UnitKind::Class, name, source, m.start()));
        }

        let patterns = IMPORT_RE
            .captures_iter(source)
            .filter_map(|caps| caps.get(1).map(|g| format!("import:{}", g.as_str())))
            .collect();

        Extraction { units, patterns }
    }
}

/// Build one unit from a match offset: locate the body via brace matching,
/// compute line numbers, and derive the snippet and keywords.
///
/// The ending line is additive — `line_start` plus the number of newlines
/// in the extracted body — rather than the absolute line of the closing
/// brace. For a body truncated at end of text the two can differ; callers
/// and tests rely on the additive arithmetic.
fn make_unit(kind: UnitKind, name: String, source: &str, offset: usize) -> CodeUnit {
    let line_start = count_newlines(&source[..offset]) as u32 + 1;
    let end = braces::find_block_end(source, offset);
    let code = source[offset..end].to_string();
    let line_end = line_start + count_newlines(&code) as u32;
    let snippet: String = code.chars().take(SNIPPET_LEN).collect();
    let keywords = keywords::derive_keywords(&code);

    CodeUnit {
        kind,
        name,
        code,
        snippet,
        line_start,
        line_end,
        keywords,
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
