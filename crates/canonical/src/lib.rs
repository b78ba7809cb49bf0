//! # Canonical operation signatures
//!
//! Everything that must agree byte for byte between build-time extraction and
//! runtime lookup lives here:
//!
//! - [`TransformPipeline`] applies pure [`QueryTransformer`]s to a document.
//! - [`fragments_used_by`] and [`assemble_operation_document`] resolve an
//!   operation's fragment closure.
//! - [`signature_of`] prints the canonical document that keys the manifest.
//! - [`Manifest`] maps signatures to persisted query IDs.
//!
//! ```rust,ignore
//! let document = parse_document(text)?;
//! for operation in operations(&document) {
//!     let assembled = assemble_operation_document(&document, operation);
//!     let key = signature_of(&assembled);
//! }
//! ```

mod error;
mod fragments;
mod manifest;
mod signature;
mod transform;

pub use error::{CanonicalError, Result};
pub use fragments::{assemble_operation_document, fragments_used_by, operations};
pub use manifest::{
    DuplicateSignaturePolicy, Manifest, ManifestBuilder, ManifestError, DEFAULT_MANIFEST_FILE,
};
pub use signature::{parse_document, signature_of};
pub use transform::{AddTypename, QueryTransformer, TransformPipeline};

// Re-export the AST so downstream crates name the same types.
pub use apollo_compiler::{ast, Name, Node};
