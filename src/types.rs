//! Core domain types for snipdex.

use serde::{Deserialize, Serialize};

/// Display snippets are the first 200 characters of the extracted code.
pub const SNIPPET_LEN: usize = 200;

/// File extensions the indexer considers source code.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".py", ".go", ".rs", ".java",
];

/// Returns `true` if `path` ends in one of the supported extensions.
pub fn is_supported(path: &str) -> bool {
    SUPPORTED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

// ---------------------------------------------------------------------------
// UnitKind
// ---------------------------------------------------------------------------

/// Kinds of extracted code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Function,
    Class,
    Pattern,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Pattern => "pattern",
        }
    }

    /// Parse from a string (case-insensitive, accepts common aliases).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "function" | "fn" | "func" => Some(Self::Function),
            "class" | "cls" => Some(Self::Class),
            "pattern" => Some(Self::Pattern),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CodeUnit
// ---------------------------------------------------------------------------

/// A single extracted function or class, before it is bound to a project.
///
/// Produced by the extractor; `snippet` is always a prefix of `code` and
/// `keywords` is the derived, stoplist-filtered search string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeUnit {
    pub kind: UnitKind,
    pub name: String,
    pub code: String,
    pub snippet: String,
    pub line_start: u32,
    pub line_end: u32,
    pub keywords: String,
}

/// Everything the extractor found in one file: full units plus flat
/// pattern tags (e.g. `import:react`). Patterns are counted, not stored.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub units: Vec<CodeUnit>,
    pub patterns: Vec<String>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// An indexed project, keyed by its unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub root_path: String,
    pub file_count: i64,
    /// Unix timestamp of the last completed index run.
    pub indexed_at: i64,
}

// ---------------------------------------------------------------------------
// StoredUnit
// ---------------------------------------------------------------------------

/// A persisted code unit, joined with its project name on query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUnit {
    pub id: i64,
    pub project_id: i64,
    pub project: String,
    pub file_path: String,
    pub name: String,
    pub kind: UnitKind,
    pub code: String,
    pub snippet: String,
    pub line_start: u32,
    pub line_end: u32,
    pub keywords: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
