//! Snapshot helpers for manifests.
//!
//! Signatures span several lines, so a manifest is formatted one entry per
//! block with its ID in front. That keeps inline snapshots readable.

use graphql_persist_canonical::Manifest;

/// Format a manifest for snapshot testing.
///
/// # Example
///
/// ```ignore
/// use graphql_persist_test_utils::format_manifest;
///
/// let manifest = extractor.extract(tree.path())?;
/// insta::assert_snapshot!(format_manifest(&manifest));
/// ```
#[must_use]
pub fn format_manifest(manifest: &Manifest) -> String {
    if manifest.is_empty() {
        return String::from("(empty manifest)");
    }

    manifest
        .iter()
        .map(|(signature, id)| format!("[{id}]\n{}", signature.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// IDs in manifest order.
#[must_use]
pub fn manifest_ids(manifest: &Manifest) -> Vec<u64> {
    manifest.iter().map(|(_, id)| id).collect()
}
