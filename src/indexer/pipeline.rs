//! Indexing pipeline.
//!
//! Orchestrates file discovery, per-file extraction, and storage.
//! Extraction is embarrassingly parallel (each file is independent), so
//! it fans out over rayon; persistence stays sequential on the single
//! SQLite connection.
//!
//! A run wholly replaces the named project: its previous units are
//! deleted up front and the fresh extraction results take their place.
//! There is no incremental or per-file diffing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, SnipdexError};
use crate::extractor::Extractor;
use crate::store::ProjectStore;
use crate::types::{is_supported, Extraction};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Directory names excluded from every walk, on top of user excludes.
const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "dist", "build", ".git", "coverage"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options controlling an indexing run.
pub struct IndexOptions {
    pub root_dir: PathBuf,
    pub project_name: String,
    /// When false the walk stays in the top-level directory.
    pub recursive: bool,
    /// Extra glob patterns to exclude, relative to the root.
    pub excludes: Vec<String>,
}

/// Summary of an indexing run.
#[derive(Debug, Clone)]
pub struct IndexResult {
    pub files_indexed: usize,
    pub units_created: usize,
    pub patterns_found: usize,
    pub duration_ms: u128,
}

impl std::fmt::Display for IndexResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Indexed {} files: {} units, {} patterns in {}ms",
            self.files_indexed, self.units_created, self.patterns_found, self.duration_ms,
        )
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The extract-and-store pipeline for one project.
pub struct IndexingPipeline<'a> {
    store: &'a ProjectStore,
}

impl<'a> IndexingPipeline<'a> {
    pub fn new(store: &'a ProjectStore) -> Self {
        Self { store }
    }

    /// Index a directory tree as one project.
    ///
    /// Any unreadable file aborts the whole run with an I/O error; a
    /// partially indexed project is worse than a failed run the caller
    /// can retry.
    pub fn index_directory(&self, options: &IndexOptions) -> Result<IndexResult> {
        let start = Instant::now();
        let root = &options.root_dir;

        let project_id = self.store.create_or_replace_project(
            &options.project_name,
            &root.to_string_lossy(),
        )?;

        let file_paths = collect_files(root, options.recursive, &options.excludes)?;
        debug!(files = file_paths.len(), root = %root.display(), "collected files");

        // ---- Extract (parallel via rayon, no DB access) ----
        let extracted: Vec<(String, Extraction)> = file_paths
            .par_iter()
            .map(|abs_path| {
                let rel_path = abs_path
                    .strip_prefix(root)
                    .unwrap_or(abs_path)
                    .to_string_lossy()
                    .to_string();
                let source = fs::read_to_string(abs_path)?;
                Ok((rel_path, Extractor::extract(&source)))
            })
            .collect::<Result<Vec<_>>>()?;

        // ---- Persist (sequential, single connection) ----
        let mut files_indexed = 0usize;
        let mut units_created = 0usize;
        let mut patterns_found = 0usize;

        for (rel_path, extraction) in extracted {
            self.store
                .insert_units(project_id, &rel_path, &extraction.units)?;
            debug!(
                file = %rel_path,
                units = extraction.units.len(),
                patterns = extraction.patterns.len(),
                "indexed file"
            );
            units_created += extraction.units.len();
            patterns_found += extraction.patterns.len();
            files_indexed += 1;
        }

        self.store.finish_project(project_id, files_indexed)?;

        Ok(IndexResult {
            files_indexed,
            units_created,
            patterns_found,
            duration_ms: start.elapsed().as_millis(),
        })
    }
}

// ---------------------------------------------------------------------------
// File collection (using the `ignore` crate for gitignore awareness)
// ---------------------------------------------------------------------------

/// Collect supported source files under `root`, respecting `.gitignore`,
/// the default exclude directories, and any user-supplied glob excludes.
/// Paths come back sorted so runs are deterministic.
fn collect_files(root: &Path, recursive: bool, excludes: &[String]) -> Result<Vec<PathBuf>> {
    let mut overrides = OverrideBuilder::new(root);
    for dir in DEFAULT_EXCLUDES {
        overrides
            .add(&format!("!**/{dir}"))
            .map_err(|e| SnipdexError::InvalidGlob(e.to_string()))?;
    }
    for pattern in excludes {
        overrides
            .add(&format!("!{pattern}"))
            .map_err(|_| SnipdexError::InvalidGlob(pattern.clone()))?;
    }
    let overrides = overrides
        .build()
        .map_err(|e| SnipdexError::InvalidGlob(e.to_string()))?;

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(true).overrides(overrides);
    if !recursive {
        builder.max_depth(Some(1));
    }

    let mut files = Vec::new();
    for entry in builder.build().flatten() {
        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if is_supported(&path.to_string_lossy()) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::initialize_database;
    use crate::types::UnitKind;
    use std::fs;

    fn setup_store() -> ProjectStore {
        let conn = initialize_database(":memory:").unwrap();
        ProjectStore::from_connection(conn)
    }

    fn setup_tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();

        fs::write(
            tmp.path().join("auth.ts"),
            "import jwt from \"jsonwebtoken\";\n\
             function login(user) { return jwt.sign(user); }\n\
             class AuthService {\n  constructor() {}\n}\n",
        )
        .unwrap();

        fs::write(
            tmp.path().join("util.js"),
            "const clamp = (n, lo, hi) => { return Math.min(hi, Math.max(lo, n)); }\n",
        )
        .unwrap();

        fs::write(tmp.path().join("notes.txt"), "not source code").unwrap();

        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(
            tmp.path().join("nested").join("deep.ts"),
            "function nestedHelper() { return 1; }\n",
        )
        .unwrap();

        fs::create_dir(tmp.path().join("node_modules")).unwrap();
        fs::write(
            tmp.path().join("node_modules").join("vendor.js"),
            "function vendorOnly() { return 0; }\n",
        )
        .unwrap();

        tmp
    }

    fn options(tmp: &tempfile::TempDir) -> IndexOptions {
        IndexOptions {
            root_dir: tmp.path().to_path_buf(),
            project_name: "demo".to_string(),
            recursive: true,
            excludes: Vec::new(),
        }
    }

    #[test]
    fn collect_files_skips_unsupported_and_default_excludes() {
        let tmp = setup_tree();
        let files = collect_files(tmp.path(), true, &[]).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"auth.ts".to_string()));
        assert!(names.contains(&"util.js".to_string()));
        assert!(names.contains(&"deep.ts".to_string()));
        assert!(!names.contains(&"notes.txt".to_string()));
        assert!(!names.contains(&"vendor.js".to_string()));
    }

    #[test]
    fn collect_files_non_recursive_stays_at_top_level() {
        let tmp = setup_tree();
        let files = collect_files(tmp.path(), false, &[]).unwrap();
        assert!(files
            .iter()
            .all(|p| p.parent() == Some(tmp.path())));
    }

    #[test]
    fn collect_files_honors_user_excludes() {
        let tmp = setup_tree();
        let files = collect_files(tmp.path(), true, &["*.js".to_string()]).unwrap();
        assert!(files
            .iter()
            .all(|p| !p.to_string_lossy().ends_with(".js")));
    }

    #[test]
    fn index_directory_full_pipeline() {
        let tmp = setup_tree();
        let store = setup_store();
        let pipeline = IndexingPipeline::new(&store);

        let result = pipeline.index_directory(&options(&tmp)).unwrap();

        assert_eq!(result.files_indexed, 3);
        assert!(result.units_created >= 4, "login, AuthService, clamp, nestedHelper");
        assert_eq!(result.patterns_found, 1);

        let project = store.get_project("demo").unwrap().expect("project stored");
        assert_eq!(project.file_count, 3);

        let units = store.query_units(Some("demo"), None).unwrap();
        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert!(names.contains(&"login"));
        assert!(names.contains(&"AuthService"));
        assert!(names.contains(&"clamp"));
        assert!(names.contains(&"nestedHelper"));
        assert!(!names.contains(&"vendorOnly"));

        let classes = store
            .query_units(Some("demo"), Some(UnitKind::Class))
            .unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "AuthService");
    }

    #[test]
    fn reindex_replaces_previous_units() {
        let tmp = setup_tree();
        let store = setup_store();
        let pipeline = IndexingPipeline::new(&store);

        pipeline.index_directory(&options(&tmp)).unwrap();
        let first = store.query_units(Some("demo"), None).unwrap().len();

        // Second run over the same tree must not accumulate duplicates.
        pipeline.index_directory(&options(&tmp)).unwrap();
        let second = store.query_units(Some("demo"), None).unwrap().len();
        assert_eq!(first, second);
    }

    #[test]
    fn non_recursive_run_skips_nested_files() {
        let tmp = setup_tree();
        let store = setup_store();
        let pipeline = IndexingPipeline::new(&store);

        let mut opts = options(&tmp);
        opts.recursive = false;
        pipeline.index_directory(&opts).unwrap();

        let names: Vec<String> = store
            .query_units(Some("demo"), None)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert!(!names.contains(&"nestedHelper".to_string()));
    }

    #[test]
    fn invalid_exclude_glob_is_reported() {
        let tmp = setup_tree();
        let err = collect_files(tmp.path(), true, &["{unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, SnipdexError::InvalidGlob(_)));
    }

    #[test]
    fn empty_directory_indexes_zero_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = setup_store();
        let pipeline = IndexingPipeline::new(&store);

        let result = pipeline
            .index_directory(&IndexOptions {
                root_dir: tmp.path().to_path_buf(),
                project_name: "empty".to_string(),
                recursive: true,
                excludes: Vec::new(),
            })
            .unwrap();

        assert_eq!(result.files_indexed, 0);
        assert_eq!(result.units_created, 0);
        assert!(store.get_project("empty").unwrap().is_some());
    }
}
