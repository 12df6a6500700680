//! SQLite schema initialization for snipdex.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants — kept as separate strings so each statement can be executed
// individually, which makes error reporting clearer.
// ---------------------------------------------------------------------------

const CREATE_PROJECTS: &str = "\
CREATE TABLE IF NOT EXISTS projects (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE,
  root_path TEXT NOT NULL,
  file_count INTEGER NOT NULL DEFAULT 0,
  indexed_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
)";

const CREATE_CODE_UNITS: &str = "\
CREATE TABLE IF NOT EXISTS code_units (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  project_id INTEGER NOT NULL,
  file_path TEXT NOT NULL,
  name TEXT NOT NULL,
  kind TEXT NOT NULL,
  code TEXT NOT NULL,
  snippet TEXT NOT NULL,
  line_start INTEGER NOT NULL,
  line_end INTEGER NOT NULL,
  keywords TEXT NOT NULL DEFAULT '',
  FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_units_project ON code_units(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_units_kind ON code_units(kind)",
    "CREATE INDEX IF NOT EXISTS idx_units_name ON code_units(name)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the schema.
///
/// The returned connection has WAL mode, foreign-key enforcement (unit
/// rows cascade-delete with their project), and synchronous NORMAL already
/// configured.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(CREATE_PROJECTS)?;
    conn.execute_batch(CREATE_CODE_UNITS)?;
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        initialize_database(":memory:").expect("schema creation should succeed on :memory:")
    }

    /// Helper: query sqlite_master for a given type and name.
    fn object_exists(conn: &Connection, obj_type: &str, obj_name: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
                rusqlite::params![obj_type, obj_name],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    #[test]
    fn tables_exist() {
        let conn = setup();
        for table in &["projects", "code_units"] {
            assert!(
                object_exists(&conn, "table", table),
                "table '{table}' should exist"
            );
        }
    }

    #[test]
    fn indexes_exist() {
        let conn = setup();
        for idx in &["idx_units_project", "idx_units_kind", "idx_units_name"] {
            assert!(
                object_exists(&conn, "index", idx),
                "index '{idx}' should exist"
            );
        }
    }

    #[test]
    fn pragmas_are_set() {
        let conn = setup();

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        // In-memory databases report "memory" instead of "wal".
        assert!(
            journal_mode == "wal" || journal_mode == "memory",
            "journal_mode should be 'wal' or 'memory', got '{journal_mode}'"
        );

        let fk: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1, "foreign_keys should be ON");

        let sync: i64 = conn
            .pragma_query_value(None, "synchronous", |row| row.get(0))
            .unwrap();
        assert_eq!(sync, 1, "synchronous should be NORMAL (1)");
    }

    #[test]
    fn project_name_is_unique() {
        let conn = setup();
        conn.execute(
            "INSERT INTO projects (name, root_path) VALUES ('api', '/srv/api')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO projects (name, root_path) VALUES ('api', '/elsewhere')",
            [],
        );
        assert!(dup.is_err(), "duplicate project name should be rejected");
    }

    #[test]
    fn deleting_project_cascades_to_units() {
        let conn = setup();
        conn.execute(
            "INSERT INTO projects (name, root_path) VALUES ('api', '/srv/api')",
            [],
        )
        .unwrap();
        let project_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO code_units (project_id, file_path, name, kind, code, snippet, line_start, line_end)
             VALUES (?1, 'a.ts', 'f', 'function', 'function f() {}', 'function f() {}', 1, 1)",
            [project_id],
        )
        .unwrap();

        conn.execute("DELETE FROM projects WHERE id = ?1", [project_id])
            .unwrap();

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM code_units", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0, "cascade should remove the project's units");
    }

    #[test]
    fn indexed_at_defaults_to_now() {
        let conn = setup();
        conn.execute(
            "INSERT INTO projects (name, root_path) VALUES ('api', '/srv/api')",
            [],
        )
        .unwrap();
        let ts: i64 = conn
            .query_row("SELECT indexed_at FROM projects WHERE name = 'api'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(ts > 0);
    }
}
