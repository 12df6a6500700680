//! Markdown export of indexed code units.
//!
//! Produces a single document meant to be pasted into an AI assistant's
//! context window: entries grouped by project, functions before classes,
//! each with its location and snippet. Group sizes are capped so one
//! large project cannot flood the document.

use crate::error::{Result, SnipdexError};
use crate::search::{SearchEngine, SearchOptions};
use crate::store::ProjectStore;
use crate::types::{StoredUnit, UnitKind};

/// Maximum entries rendered per kind group within a project.
pub const GROUP_LIMIT: usize = 20;

/// Exporter borrowing a store for the duration of one export.
#[derive(Debug)]
pub struct Exporter<'a> {
    store: &'a ProjectStore,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a ProjectStore) -> Self {
        Self { store }
    }

    /// Render the markdown export for one project, or for every project
    /// when `project` is `None`.
    ///
    /// # Errors
    ///
    /// [`SnipdexError::ProjectNotFound`] when a named project does not
    /// exist. Exporting all projects from an empty store just yields the
    /// document header.
    pub fn export_markdown(&self, project: Option<&str>) -> Result<String> {
        let project_names: Vec<String> = match project {
            Some(name) => {
                if self.store.get_project(name)?.is_none() {
                    return Err(SnipdexError::ProjectNotFound(name.to_string()));
                }
                vec![name.to_string()]
            }
            None => self
                .store
                .list_projects()?
                .into_iter()
                .map(|p| p.name)
                .collect(),
        };

        let engine = SearchEngine::new(self.store);
        let mut doc = String::from("# snipdex export\n");

        for name in project_names {
            // The empty query enumerates the whole project; hits come
            // back name-sorted.
            let options = SearchOptions {
                limit: usize::MAX,
                project: Some(name.clone()),
                kind: None,
            };
            let units: Vec<StoredUnit> = engine
                .search("", &options)?
                .into_iter()
                .map(|hit| hit.unit)
                .collect();

            doc.push_str(&format!("\n## {name}\n"));
            render_kind_group(&mut doc, "Functions", &units, UnitKind::Function);
            render_kind_group(&mut doc, "Classes", &units, UnitKind::Class);
        }

        Ok(doc)
    }
}

fn render_kind_group(doc: &mut String, title: &str, units: &[StoredUnit], kind: UnitKind) {
    let selected: Vec<&StoredUnit> = units
        .iter()
        .filter(|u| u.kind == kind)
        .take(GROUP_LIMIT)
        .collect();
    if selected.is_empty() {
        return;
    }

    doc.push_str(&format!("\n### {title}\n"));
    for unit in selected {
        doc.push_str(&format!(
            "\n#### `{}`\n\n`{}` lines {}-{}\n\n```\n{}\n```\n",
            unit.name, unit.file_path, unit.line_start, unit.line_end, unit.snippet,
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
