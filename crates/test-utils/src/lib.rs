//! Fixtures and formatting helpers shared by the integration tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::{format_manifest, manifest_ids};
pub use fixtures::TestTree;
