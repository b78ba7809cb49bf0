use graphql_persist_canonical::{DuplicateSignaturePolicy, DEFAULT_MANIFEST_FILE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration file contents.
///
/// Every section is optional; a missing `extract` section means defaults, a
/// missing `router` section means no runtime routing is configured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistConfig {
    pub extract: ExtractSection,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub router: Option<RouterConfig>,
}

impl PersistConfig {
    /// Resolves relative file paths against `base`, usually the directory
    /// holding the config file.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.extract.output = resolve(base, &self.extract.output);
        if let Some(router) = self.router.as_mut() {
            router.manifest = resolve(base, &router.manifest);
        }
        self
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Build-time extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractSection {
    /// Where the manifest is written
    pub output: PathBuf,

    /// File extensions read from the input tree, without the dot
    pub extensions: Vec<String>,

    /// Read GraphQL out of tagged template literals
    pub embedded: bool,

    /// Template tags recognised in embedded mode
    pub tags: Vec<String>,

    /// Regular expressions; matching paths are skipped
    pub exclude: Vec<String>,

    /// Add `__typename` to every nested selection set before signing
    pub add_typename: bool,

    pub duplicate_signatures: DuplicateSignaturePolicy,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_MANIFEST_FILE),
            extensions: vec!["graphql".to_string()],
            embedded: false,
            tags: vec!["gql".to_string()],
            exclude: Vec::new(),
            add_typename: false,
            duplicate_signatures: DuplicateSignaturePolicy::default(),
        }
    }
}

/// Runtime settings for sending persisted queries to a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// When false, requests are forwarded with their full query text
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// The GraphQL endpoint requests are posted to
    pub uri: String,

    /// Manifest produced by extraction (default: extracted_queries.json)
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// HTTP headers sent with every request (e.g., for authentication)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds (default: 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,
}

const fn default_enabled() -> bool {
    true
}

fn default_manifest() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST_FILE)
}

impl RouterConfig {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            enabled: true,
            uri: uri.into(),
            manifest: default_manifest(),
            headers: None,
            timeout: None,
            connect_timeout: None,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    /// Headers as (name, value) pairs, sorted by name.
    #[must_use]
    pub fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers: Vec<_> = self
            .headers
            .iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        headers.sort_unstable();
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PersistConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, PersistConfig::default());
        assert_eq!(config.extract.output, PathBuf::from("extracted_queries.json"));
        assert_eq!(config.extract.extensions, vec!["graphql"]);
        assert_eq!(config.extract.tags, vec!["gql"]);
        assert!(config.router.is_none());
    }

    #[test]
    fn test_partial_extract_section() {
        let yaml = r"
extract:
  embedded: true
  extensions: [js, ts]
";
        let config: PersistConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.extract.embedded);
        assert_eq!(config.extract.extensions, vec!["js", "ts"]);
        assert_eq!(config.extract.tags, vec!["gql"]);
        assert!(!config.extract.add_typename);
    }

    #[test]
    fn test_duplicate_signatures_setting() {
        let yaml = r"
extract:
  duplicate_signatures: overwrite
";
        let config: PersistConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.extract.duplicate_signatures,
            DuplicateSignaturePolicy::Overwrite
        );
    }

    #[test]
    fn test_router_defaults() {
        let yaml = r"
router:
  uri: https://api.example.com/graphql
";
        let config: PersistConfig = serde_saphyr::from_str(yaml).unwrap();
        let router = config.router.unwrap();
        assert!(router.enabled);
        assert_eq!(router.manifest, PathBuf::from("extracted_queries.json"));
        assert_eq!(router.timeout(), Duration::from_secs(30));
        assert_eq!(router.connect_timeout(), Duration::from_secs(10));
        assert!(router.headers().is_empty());
    }

    #[test]
    fn test_router_headers_sorted() {
        let yaml = r"
router:
  uri: https://api.example.com/graphql
  headers:
    X-Trace: abc
    Authorization: Bearer token
";
        let config: PersistConfig = serde_saphyr::from_str(yaml).unwrap();
        let router = config.router.unwrap();
        assert_eq!(
            router.headers(),
            vec![("Authorization", "Bearer token"), ("X-Trace", "abc")]
        );
    }

    #[test]
    fn test_router_requires_uri() {
        let result = serde_saphyr::from_str::<PersistConfig>("router:\n  enabled: true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_saphyr::from_str::<PersistConfig>("extract:\n  outptu: x.json\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_relative_to() {
        let config = PersistConfig {
            router: Some(RouterConfig::new("http://localhost:4000/graphql")),
            ..PersistConfig::default()
        };

        let resolved = config.relative_to(Path::new("/project"));
        assert_eq!(
            resolved.extract.output,
            PathBuf::from("/project/extracted_queries.json")
        );
        assert_eq!(
            resolved.router.unwrap().manifest,
            PathBuf::from("/project/extracted_queries.json")
        );
    }

    #[test]
    fn test_relative_to_keeps_absolute_paths() {
        let config = PersistConfig {
            extract: ExtractSection {
                output: PathBuf::from("/tmp/out.json"),
                ..ExtractSection::default()
            },
            router: None,
        };
        let resolved = config.relative_to(Path::new("/project"));
        assert_eq!(resolved.extract.output, PathBuf::from("/tmp/out.json"));
    }
}
