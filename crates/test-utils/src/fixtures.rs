//! On-disk source trees for extraction tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory populated with source files.
///
/// The directory is removed when the tree is dropped. Builder methods panic on
/// I/O failure since they only run inside tests.
///
/// ```ignore
/// let tree = TestTree::new()
///     .with_file("queries/author.graphql", "query Author { author { name } }")
///     .with_file("README.md", "not graphql");
/// let manifest = Extractor::default().extract(tree.path())?;
/// ```
#[derive(Debug)]
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Writes a file, creating parent directories as needed.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
        self
    }

    /// Creates an empty directory.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.join(relative)).expect("failed to create dir");
        self
    }

    /// Creates a symbolic link at `link` pointing to `target`.
    ///
    /// `target` is taken as is, so it may be relative to the link's directory
    /// or absolute.
    #[cfg(unix)]
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_symlink(self, link: &str, target: impl AsRef<Path>) -> Self {
        let path = self.join(link);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::os::unix::fs::symlink(target, &path).expect("failed to create symlink");
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
