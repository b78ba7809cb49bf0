//! Input tree traversal.

use crate::{EngineError, ExtractOptions, Result};
use graphql_persist_extract::extract_from_file;
use graphql_persist_types::file_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads every eligible file under `root` and joins their GraphQL text with
/// newlines.
///
/// Entries are visited sorted by file name. Excluded paths are pruned before
/// they are descended into, and symbolic links are never followed, the root
/// included. The first read failure aborts the walk.
pub(crate) fn read_input_path(root: &Path, options: &ExtractOptions) -> Result<String> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let excluded = options.is_excluded(&entry.path().to_string_lossy());
            if excluded {
                tracing::debug!(path = %entry.path().display(), "Excluded");
            }
            !excluded
        });

    let mut pieces = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| EngineError::Walk {
            path: source.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            source,
        })?;

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            tracing::debug!(path = %entry.path().display(), "Skipping symbolic link");
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        if let Some(text) = read_file(entry.path(), options)? {
            pieces.push(text);
        }
    }

    tracing::debug!(files = pieces.len(), "Input tree read");
    Ok(pieces.join("\n"))
}

/// Returns `None` for files whose extension is not accepted.
fn read_file(path: &Path, options: &ExtractOptions) -> Result<Option<String>> {
    let Some(extension) = file_extension(path) else {
        return Ok(None);
    };
    if !options.accepts_extension(extension) {
        return Ok(None);
    }

    if options.embedded {
        let blocks = extract_from_file(path, &options.extract_config)?;
        tracing::trace!(path = %path.display(), blocks = blocks.len(), "Extracted embedded GraphQL");
        return Ok(Some(blocks.join("\n")));
    }

    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Strips trailing `/` characters, keeping a lone root intact.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() {
        path.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("src/")), PathBuf::from("src"));
        assert_eq!(normalize_path(Path::new("src///")), PathBuf::from("src"));
        assert_eq!(normalize_path(Path::new("src")), PathBuf::from("src"));
        assert_eq!(normalize_path(Path::new("/")), PathBuf::from("/"));
    }
}
