//! Pulls raw GraphQL text out of program source.
//!
//! Two pieces make up the extractor:
//!
//! - [`find_tagged_literals`] parses JavaScript or TypeScript with swc and
//!   returns every template literal tagged with one of the configured
//!   identifiers (`gql` by default). Each literal's `body` is its cooked text
//!   with placeholders replaced by a space.
//! - [`strip_interpolations`] does the same placeholder removal on raw
//!   literal text.
//!
//! [`extract_from_source`] and [`extract_from_file`] return the bodies.

mod error;
mod extractor;
mod interpolation;
mod source_location;

pub use error::{ExtractError, Result};
pub use extractor::{
    extract_from_file, extract_from_source, find_tagged_literals, ExtractConfig, TaggedLiteral,
};
pub use interpolation::strip_interpolations;
pub use source_location::SourceLocation;

// Re-export for convenience
pub use graphql_persist_types::Language;
