//! Foundation types for persisted query extraction.
//!
//! This crate provides the source-file classification shared by the extractor,
//! the extraction engine and the CLI. It has zero external dependencies.

mod file;

pub use file::{file_extension, Language};
