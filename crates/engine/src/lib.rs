//! # Persisted query extraction
//!
//! Walks a source tree, gathers GraphQL operations, and assigns each distinct
//! canonical signature an integer ID starting at 1.
//!
//! ```rust,ignore
//! let options = ExtractOptions::new().with_exclude_patterns(["__generated__"])?;
//! let manifest = Extractor::new(options).extract(Path::new("src"))?;
//! ```
//!
//! A run reads every file first, then parses the combined text once, so
//! operation name uniqueness is checked across the whole tree before any ID is
//! handed out.

mod error;
mod extractor;
mod options;
mod split;
mod walk;

pub use error::{EngineError, Result};
pub use extractor::Extractor;
pub use options::{ExtractOptions, DEFAULT_EXTENSIONS};
pub use split::{duplicate_definition_names, separate_operations, SeparatedOperation};
