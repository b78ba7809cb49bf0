//! The persisted query manifest: canonical signature to integer ID.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name used for the manifest when none is configured.
pub const DEFAULT_MANIFEST_FILE: &str = "extracted_queries.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to access manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest ID must be a positive integer, found {id}")]
    InvalidId { id: u64 },
}

/// What to do when a run produces a signature it has already assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateSignaturePolicy {
    /// Keep the first ID; the counter does not advance.
    #[default]
    Reuse,
    /// Assign a fresh ID and overwrite the entry in place.
    Overwrite,
}

impl FromStr for DuplicateSignaturePolicy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "reuse" => Ok(Self::Reuse),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!(
                "unknown duplicate signature policy '{other}', expected 'reuse' or 'overwrite'"
            )),
        }
    }
}

/// Mapping from canonical signature to persisted query ID.
///
/// Iteration follows insertion order. Serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, u64>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, signature: &str) -> Option<u64> {
        self.entries.get(signature).copied()
    }

    #[must_use]
    pub fn contains(&self, signature: &str) -> bool {
        self.entries.contains_key(signature)
    }

    /// Inserts or overwrites an entry, returning the previous ID.
    ///
    /// An overwritten entry keeps its original position.
    pub fn insert(&mut self, signature: String, id: u64) -> Option<u64> {
        self.entries.insert(signature, id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(signature, id)| (signature.as_str(), *id))
    }

    /// Parses a manifest from JSON, rejecting IDs that are not positive.
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        if let Some(id) = manifest.entries.values().copied().find(|id| *id == 0) {
            return Err(ManifestError::InvalidId { id });
        }
        Ok(manifest)
    }

    /// Compact JSON, one object, no trailing newline.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }

    #[tracing::instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json_str(&json)?;
        tracing::info!(entries = manifest.len(), "Manifest loaded");
        Ok(manifest)
    }

    /// Writes the manifest so readers never observe a partial file.
    ///
    /// The JSON goes to a temporary file in the destination directory, which
    /// is then renamed over `path`.
    #[tracing::instrument(skip(self), fields(path = %path.display(), entries = self.len()))]
    pub fn write_atomic(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        let io_error = |source: std::io::Error| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        };

        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = tempfile::NamedTempFile::new_in(directory).map_err(io_error)?;
        file.write_all(json.as_bytes()).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(path).map_err(|e| io_error(e.error))?;

        tracing::debug!("Manifest written");
        Ok(())
    }
}

/// Accumulates one extraction run's manifest and owns its ID counter.
///
/// IDs start at 1. Every run creates its own builder, so independent runs never
/// share a counter.
#[derive(Debug)]
pub struct ManifestBuilder {
    manifest: Manifest,
    next_id: u64,
    policy: DuplicateSignaturePolicy,
}

impl ManifestBuilder {
    #[must_use]
    pub fn new(policy: DuplicateSignaturePolicy) -> Self {
        Self {
            manifest: Manifest::new(),
            next_id: 1,
            policy,
        }
    }

    /// Records a signature and returns the ID it maps to.
    pub fn record(&mut self, signature: String) -> u64 {
        if self.policy == DuplicateSignaturePolicy::Reuse {
            if let Some(id) = self.manifest.get(&signature) {
                tracing::debug!(id, "Signature already assigned, reusing ID");
                return id;
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        if let Some(previous) = self.manifest.insert(signature, id) {
            tracing::debug!(previous, id, "Signature reassigned");
        }
        id
    }

    /// The ID the next new signature would receive.
    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    #[must_use]
    pub fn finish(self) -> Manifest {
        self.manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_starts_at_one() {
        let mut builder = ManifestBuilder::new(DuplicateSignaturePolicy::Reuse);
        assert_eq!(builder.record("a".into()), 1);
        assert_eq!(builder.record("b".into()), 2);
        assert_eq!(builder.next_id(), 3);
    }

    #[test]
    fn test_builder_reuse_policy() {
        let mut builder = ManifestBuilder::new(DuplicateSignaturePolicy::Reuse);
        builder.record("a".into());
        builder.record("b".into());
        assert_eq!(builder.record("a".into()), 1);
        assert_eq!(builder.record("c".into()), 3);

        let manifest = builder.finish();
        let entries: Vec<_> = manifest.iter().collect();
        assert_eq!(entries, vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn test_builder_overwrite_policy() {
        let mut builder = ManifestBuilder::new(DuplicateSignaturePolicy::Overwrite);
        builder.record("a".into());
        builder.record("b".into());
        assert_eq!(builder.record("a".into()), 3);

        let manifest = builder.finish();
        let entries: Vec<_> = manifest.iter().collect();
        assert_eq!(entries, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "reuse".parse::<DuplicateSignaturePolicy>(),
            Ok(DuplicateSignaturePolicy::Reuse)
        );
        assert_eq!(
            "overwrite".parse::<DuplicateSignaturePolicy>(),
            Ok(DuplicateSignaturePolicy::Overwrite)
        );
        assert!("first".parse::<DuplicateSignaturePolicy>().is_err());
    }

    #[test]
    fn test_json_is_a_flat_object() {
        let mut manifest = Manifest::new();
        manifest.insert("query A {\n  a\n}\n".into(), 1);
        manifest.insert("query B {\n  b\n}\n".into(), 2);

        insta::assert_snapshot!(
            manifest.to_json().unwrap(),
            @r#"{"query A {\n  a\n}\n":1,"query B {\n  b\n}\n":2}"#
        );
    }

    #[test]
    fn test_from_json_rejects_zero() {
        let result = Manifest::from_json_str(r#"{"query A { a }": 0}"#);
        assert!(matches!(result, Err(ManifestError::InvalidId { id: 0 })));
    }

    #[test]
    fn test_from_json_rejects_non_integers() {
        assert!(Manifest::from_json_str(r#"{"query A { a }": -1}"#).is_err());
        assert!(Manifest::from_json_str(r#"{"query A { a }": "1"}"#).is_err());
        assert!(Manifest::from_json_str("[]").is_err());
    }

    #[test]
    fn test_write_atomic_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST_FILE);

        let mut manifest = Manifest::new();
        manifest.insert("query A { a }".into(), 1);
        manifest.write_atomic(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale").unwrap();

        Manifest::new().write_atomic(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Manifest::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }
}
