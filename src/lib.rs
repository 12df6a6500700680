//! snipdex — regex-based code unit indexing and keyword search.
//!
//! Scans source trees, extracts function- and class-like units with
//! heuristic regexes and brace matching, stores them in SQLite, and
//! serves tier-scored keyword search plus markdown export for AI
//! assistant context windows.

pub mod cli;
pub mod db;
pub mod error;
pub mod export;
pub mod extractor;
pub mod indexer;
pub mod observability;
pub mod search;
pub mod store;
pub mod types;
