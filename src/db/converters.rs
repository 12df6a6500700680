//! Row-to-struct converters for snipdex database queries.

use rusqlite::Row;

use crate::types::{Project, StoredUnit, UnitKind};

/// Convert a row from a `SELECT * FROM projects` query into a [`Project`].
pub fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        root_path: row.get("root_path")?,
        file_count: row.get("file_count")?,
        indexed_at: row.get("indexed_at")?,
    })
}

/// Convert a row from a code_units query joined with the project name
/// (`projects.name AS project`) into a [`StoredUnit`].
///
/// An unrecognized kind string falls back to `function` rather than
/// failing the whole query.
pub fn row_to_stored_unit(row: &Row<'_>) -> rusqlite::Result<StoredUnit> {
    let kind_str: String = row.get("kind")?;
    Ok(StoredUnit {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        project: row.get("project")?,
        file_path: row.get("file_path")?,
        name: row.get("name")?,
        kind: UnitKind::from_str_loose(&kind_str).unwrap_or(UnitKind::Function),
        code: row.get("code")?,
        snippet: row.get("snippet")?,
        line_start: row.get("line_start")?,
        line_end: row.get("line_end")?,
        keywords: row.get("keywords")?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
