//! Database layer for snipdex.
//!
//! - [`schema`] — DDL and initialization (`initialize_database`).
//! - [`converters`] — Row-to-struct conversions.

pub mod converters;
pub mod schema;

pub use converters::{row_to_project, row_to_stored_unit};
pub use schema::initialize_database;
