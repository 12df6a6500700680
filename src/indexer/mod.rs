//! Indexing layer: file discovery plus the extraction pipeline.

pub mod pipeline;

pub use pipeline::{IndexOptions, IndexResult, IndexingPipeline};
