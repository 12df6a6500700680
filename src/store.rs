//! SQLite CRUD layer for projects and their stored code units.
//!
//! Uses `rusqlite` with `prepare_cached` for automatic statement caching.
//! The store owns the connection and is passed explicitly into the
//! pipeline, search engine, and exporter — acquisition and release are
//! scoped to a single command invocation, never a process-wide handle.

use rusqlite::{params, params_from_iter, Connection};

use crate::db::converters::{row_to_project, row_to_stored_unit};
use crate::db::schema::initialize_database;
use crate::error::{Result, SnipdexError};
use crate::types::{CodeUnit, Project, StoredUnit, UnitKind};

// ---------------------------------------------------------------------------
// StoreStats
// ---------------------------------------------------------------------------

/// Aggregate statistics about the stored index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub projects: usize,
    pub units: usize,
    pub functions: usize,
    pub classes: usize,
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const INSERT_PROJECT_SQL: &str = "\
INSERT INTO projects (name, root_path, file_count) VALUES (?1, ?2, 0)";

const RESET_PROJECT_SQL: &str = "\
UPDATE projects SET root_path = ?2, file_count = 0, indexed_at = strftime('%s','now')
WHERE id = ?1";

const FINISH_PROJECT_SQL: &str = "\
UPDATE projects SET file_count = ?2, indexed_at = strftime('%s','now') WHERE id = ?1";

const DELETE_PROJECT_UNITS_SQL: &str = "\
DELETE FROM code_units WHERE project_id = ?1";

const INSERT_UNIT_SQL: &str = "\
INSERT INTO code_units
  (project_id, file_path, name, kind, code, snippet, line_start, line_end, keywords)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const SELECT_UNITS_SQL: &str = "\
SELECT u.*, p.name AS project
FROM code_units u
JOIN projects p ON p.id = u.project_id
WHERE 1=1";

// ---------------------------------------------------------------------------
// ProjectStore
// ---------------------------------------------------------------------------

/// Typed CRUD wrapper around the snipdex SQLite database.
pub struct ProjectStore {
    pub conn: Connection,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore").finish_non_exhaustive()
    }
}

impl ProjectStore {
    /// Open (or create) the database at `db_path`, apply the schema, and
    /// return a ready-to-use store.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection. Useful in tests where the caller
    /// has already called `initialize_database(":memory:")`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    // -------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------

    /// Create a project under `name`, or reset an existing one.
    ///
    /// Re-indexing wholly replaces a project's units, so an existing
    /// project has its units deleted and its row updated with the new
    /// root path inside a single transaction. Returns the project id.
    pub fn create_or_replace_project(&self, name: &str, root_path: &str) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let id = {
            let existing: Option<i64> = tx
                .prepare_cached("SELECT id FROM projects WHERE name = ?1")?
                .query_row(params![name], |row| row.get(0))
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;

            match existing {
                Some(id) => {
                    tx.prepare_cached(DELETE_PROJECT_UNITS_SQL)?
                        .execute(params![id])?;
                    tx.prepare_cached(RESET_PROJECT_SQL)?
                        .execute(params![id, root_path])?;
                    id
                }
                None => {
                    tx.prepare_cached(INSERT_PROJECT_SQL)?
                        .execute(params![name, root_path])?;
                    tx.last_insert_rowid()
                }
            }
        };
        tx.commit()?;
        Ok(id)
    }

    /// Record the final file count once an indexing run has processed
    /// every file.
    pub fn finish_project(&self, project_id: i64, file_count: usize) -> Result<()> {
        self.conn
            .prepare_cached(FINISH_PROJECT_SQL)?
            .execute(params![project_id, file_count as i64])?;
        Ok(())
    }

    /// Look up a project by name.
    pub fn get_project(&self, name: &str) -> Result<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT * FROM projects WHERE name = ?1")?;
        let mut rows = stmt.query_and_then(params![name], row_to_project)?;
        match rows.next() {
            Some(Ok(project)) => Ok(Some(project)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// All projects, ordered by name.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT * FROM projects ORDER BY name")?;
        let rows = stmt.query_and_then([], row_to_project)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Delete a project; its units go with it via the cascade.
    ///
    /// # Errors
    ///
    /// [`SnipdexError::ProjectNotFound`] if no project has that name.
    pub fn delete_project(&self, name: &str) -> Result<()> {
        let affected = self
            .conn
            .prepare_cached("DELETE FROM projects WHERE name = ?1")?
            .execute(params![name])?;
        if affected == 0 {
            return Err(SnipdexError::ProjectNotFound(name.to_string()));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Units
    // -------------------------------------------------------------------

    /// Batch-insert one file's extracted units inside a single transaction.
    pub fn insert_units(
        &self,
        project_id: i64,
        file_path: &str,
        units: &[CodeUnit],
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_UNIT_SQL)?;
            for unit in units {
                stmt.execute(params![
                    project_id,
                    file_path,
                    unit.name,
                    unit.kind.as_str(),
                    unit.code,
                    unit.snippet,
                    unit.line_start,
                    unit.line_end,
                    unit.keywords,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Retrieve a single stored unit by id, or `None` if it doesn't exist.
    pub fn get_unit(&self, id: i64) -> Result<Option<StoredUnit>> {
        let sql = format!("{} AND u.id = ?1", SELECT_UNITS_SQL);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let mut rows = stmt.query_and_then(params![id], row_to_stored_unit)?;
        match rows.next() {
            Some(Ok(unit)) => Ok(Some(unit)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Fetch stored units, optionally restricted to one project and/or one
    /// kind. Both filters compose with AND semantics; ranking happens in
    /// the search layer, not here.
    pub fn query_units(
        &self,
        project: Option<&str>,
        kind: Option<UnitKind>,
    ) -> Result<Vec<StoredUnit>> {
        let mut sql = String::from(SELECT_UNITS_SQL);
        let mut args: Vec<String> = Vec::new();
        if let Some(name) = project {
            sql.push_str(" AND p.name = ?");
            args.push(name.to_string());
        }
        if let Some(kind) = kind {
            sql.push_str(" AND u.kind = ?");
            args.push(kind.as_str().to_string());
        }
        sql.push_str(" ORDER BY u.id");

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_and_then(params_from_iter(args.iter()), row_to_stored_unit)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Aggregates
    // -------------------------------------------------------------------

    pub fn stats(&self) -> Result<StoreStats> {
        let count = |sql: &str| -> Result<usize> {
            let mut stmt = self.conn.prepare_cached(sql)?;
            let n: i64 = stmt.query_row([], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(StoreStats {
            projects: count("SELECT count(*) FROM projects")?,
            units: count("SELECT count(*) FROM code_units")?,
            functions: count("SELECT count(*) FROM code_units WHERE kind = 'function'")?,
            classes: count("SELECT count(*) FROM code_units WHERE kind = 'class'")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
