use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use snipdex::cli::{create_spinner, print_hit, print_project, print_success};
use snipdex::export::Exporter;
use snipdex::indexer::{IndexOptions, IndexingPipeline};
use snipdex::observability::init_logging;
use snipdex::search::{SearchEngine, SearchOptions};
use snipdex::store::ProjectStore;
use snipdex::types::UnitKind;

#[derive(Parser)]
#[command(name = "snipdex")]
#[command(version, about = "Index code units across projects and search them for AI context")]
struct Cli {
    /// Database path (default: ~/.snipdex/snipdex.db)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory as a project
    Index {
        /// Directory to index (default: current dir)
        #[arg(default_value = ".")]
        path: String,
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Glob patterns to exclude (repeatable or comma-separated)
        #[arg(long = "exclude", value_delimiter = ',')]
        excludes: Vec<String>,
    },
    /// Search indexed code units
    Search {
        /// Search query (empty string matches everything)
        query: String,
        /// Restrict to one project
        #[arg(long)]
        project: Option<String>,
        /// Restrict to one kind (function, class)
        #[arg(long)]
        kind: Option<String>,
        /// Maximum results
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the full stored code of one unit
    Show {
        /// Unit id as reported by search
        id: i64,
    },
    /// List indexed projects
    List,
    /// Remove a project and its units
    Remove {
        /// Project name
        name: String,
    },
    /// Export indexed units as markdown
    Export {
        /// Restrict to one project
        #[arg(long)]
        project: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show index statistics
    Stats,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);

    match cli.command {
        Commands::Index {
            path,
            name,
            recursive,
            excludes,
        } => cmd_index(&db_path, &path, name.as_deref(), recursive, excludes),
        Commands::Search {
            query,
            project,
            kind,
            limit,
            json,
        } => cmd_search(&db_path, &query, project, kind.as_deref(), limit, json),
        Commands::Show { id } => cmd_show(&db_path, id),
        Commands::List => cmd_list(&db_path),
        Commands::Remove { name } => cmd_remove(&db_path, &name),
        Commands::Export { project, output } => {
            cmd_export(&db_path, project.as_deref(), output.as_deref())
        }
        Commands::Stats => cmd_stats(&db_path),
    }
}

// ---------------------------------------------------------------------------
// CLI command implementations
// ---------------------------------------------------------------------------

fn default_db_path() -> String {
    dirs::home_dir()
        .map(|home| home.join(".snipdex").join("snipdex.db"))
        .unwrap_or_else(|| PathBuf::from("snipdex.db"))
        .to_string_lossy()
        .to_string()
}

fn open_store(db_path: &str) -> ProjectStore {
    if let Some(parent) = PathBuf::from(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                eprintln!("Error: cannot create database directory: {}", e);
                process::exit(1);
            });
        }
    }
    ProjectStore::new(db_path).unwrap_or_else(|e| {
        eprintln!("Error: cannot open database: {}", e);
        process::exit(1);
    })
}

fn parse_kind(kind: &str) -> UnitKind {
    UnitKind::from_str_loose(kind).unwrap_or_else(|| {
        eprintln!("Error: unknown kind '{}' (expected function or class)", kind);
        process::exit(1);
    })
}

fn cmd_index(db_path: &str, path: &str, name: Option<&str>, recursive: bool, excludes: Vec<String>) {
    let root = PathBuf::from(path).canonicalize().unwrap_or_else(|e| {
        eprintln!("Error: cannot resolve directory '{}': {}", path, e);
        process::exit(1);
    });

    let project_name = name
        .map(str::to_string)
        .or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| {
            eprintln!("Error: cannot derive a project name from '{}'; pass --name", path);
            process::exit(1);
        });

    let store = open_store(db_path);
    let pipeline = IndexingPipeline::new(&store);

    let spinner = create_spinner(&format!("Indexing {} ...", project_name));
    let result = pipeline
        .index_directory(&IndexOptions {
            root_dir: root,
            project_name: project_name.clone(),
            recursive,
            excludes,
        })
        .unwrap_or_else(|e| {
            spinner.finish_and_clear();
            eprintln!("Error: indexing failed: {}", e);
            process::exit(1);
        });
    spinner.finish_and_clear();

    print_success(&format!("{}: {}", project_name, result));
}

fn cmd_search(
    db_path: &str,
    query: &str,
    project: Option<String>,
    kind: Option<&str>,
    limit: usize,
    json: bool,
) {
    let store = open_store(db_path);
    let engine = SearchEngine::new(&store);
    let options = SearchOptions {
        limit,
        project,
        kind: kind.map(parse_kind),
    };

    let hits = engine.search(query, &options).unwrap_or_else(|e| {
        eprintln!("Error: search failed: {}", e);
        process::exit(1);
    });

    if json {
        let payload: Vec<serde_json::Value> = hits
            .iter()
            .map(|hit| {
                serde_json::json!({
                    "score": hit.score,
                    "unit": hit.unit,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&payload) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: cannot serialize results: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if hits.is_empty() {
        println!("No results found for \"{}\".", query);
        return;
    }
    for (i, hit) in hits.iter().enumerate() {
        print_hit(i, hit);
    }
}

fn cmd_show(db_path: &str, id: i64) {
    let store = open_store(db_path);
    match store.get_unit(id) {
        Ok(Some(unit)) => {
            println!(
                "{} ({}) {} {}:{}-{}",
                unit.name, unit.kind, unit.project, unit.file_path, unit.line_start, unit.line_end,
            );
            println!("{}", unit.code);
        }
        Ok(None) => {
            eprintln!("Error: {}", snipdex::error::SnipdexError::UnitNotFound(id));
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: lookup failed: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_list(db_path: &str) {
    let store = open_store(db_path);
    let projects = store.list_projects().unwrap_or_else(|e| {
        eprintln!("Error: cannot list projects: {}", e);
        process::exit(1);
    });

    if projects.is_empty() {
        println!("No projects indexed yet.");
        return;
    }
    for project in &projects {
        print_project(project);
    }
}

fn cmd_remove(db_path: &str, name: &str) {
    let store = open_store(db_path);
    store.delete_project(name).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    print_success(&format!("Removed project '{}'", name));
}

fn cmd_export(db_path: &str, project: Option<&str>, output: Option<&std::path::Path>) {
    let store = open_store(db_path);
    let doc = Exporter::new(&store)
        .export_markdown(project)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    match output {
        Some(path) => {
            std::fs::write(path, &doc).unwrap_or_else(|e| {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            });
            print_success(&format!("Exported to {}", path.display()));
        }
        None => print!("{}", doc),
    }
}

fn cmd_stats(db_path: &str) {
    let store = open_store(db_path);
    let stats = store.stats().unwrap_or_else(|e| {
        eprintln!("Error: cannot read stats: {}", e);
        process::exit(1);
    });

    println!("Projects:  {}", stats.projects);
    println!("Units:     {}", stats.units);
    println!("Functions: {}", stats.functions);
    println!("Classes:   {}", stats.classes);
}
