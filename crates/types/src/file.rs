//! File-related types: [`Language`] and extension detection.

use std::path::Path;

/// Source language of a file (determines how GraphQL is read out of it).
///
/// Pure GraphQL files are read verbatim. JavaScript-family files hold GraphQL
/// inside tagged template literals and must go through extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Raw GraphQL files (.graphql, .gql, .gqls)
    GraphQL,
    /// TypeScript (.ts, .tsx, .mts, .cts)
    TypeScript,
    /// JavaScript (.js, .jsx, .mjs, .cjs) and anything else read in embedded mode
    JavaScript,
}

impl Language {
    /// Detect language from a file extension (without the leading dot).
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "graphql" | "gql" | "gqls" => Some(Self::GraphQL),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Detect language from a file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        file_extension(path).and_then(Self::from_extension)
    }

    /// Check if this language requires extraction (vs. direct GraphQL parsing).
    #[must_use]
    pub const fn requires_extraction(&self) -> bool {
        !matches!(self, Self::GraphQL)
    }

    /// Whether JSX syntax should be accepted when parsing this language.
    ///
    /// TypeScript enables it only for `.tsx`, so callers pass the extension.
    #[must_use]
    pub fn allows_jsx(&self, extension: &str) -> bool {
        match self {
            Self::GraphQL => false,
            Self::TypeScript => extension == "tsx",
            Self::JavaScript => true,
        }
    }
}

/// Returns the text after the last `.` in the file's base name.
///
/// Unlike [`Path::extension`], a dot-file such as `.graphql` has the extension
/// `graphql`. A base name without any dot has no extension.
#[must_use]
pub fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let (_, extension) = name.rsplit_once('.')?;
    Some(extension)
}
