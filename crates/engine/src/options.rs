use crate::{EngineError, Result};
use graphql_persist_canonical::{DuplicateSignaturePolicy, TransformPipeline};
use graphql_persist_extract::ExtractConfig;
use regex::Regex;

/// Default set of file extensions read from the input tree.
pub const DEFAULT_EXTENSIONS: &[&str] = &["graphql"];

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Extensions (without the dot) of files that are read
    pub extensions: Vec<String>,
    /// Pull GraphQL out of tagged template literals instead of reading files whole
    pub embedded: bool,
    /// Paths matching any of these are skipped, directories included
    pub exclude: Vec<Regex>,
    /// Tagged template settings used in embedded mode
    pub extract_config: ExtractConfig,
    /// Transforms applied to every operation before it is signed
    pub transforms: TransformPipeline,
    pub duplicate_signatures: DuplicateSignaturePolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            embedded: false,
            exclude: Vec::new(),
            extract_config: ExtractConfig::default(),
            transforms: TransformPipeline::new(),
            duplicate_signatures: DuplicateSignaturePolicy::default(),
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    /// Compiles and sets the exclusion patterns.
    pub fn with_exclude_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = patterns
            .into_iter()
            .map(|pattern| compile_pattern(pattern.as_ref()))
            .collect::<Result<_>>()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extract_config.tag_identifiers = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_transforms(mut self, transforms: TransformPipeline) -> Self {
        self.transforms = transforms;
        self
    }

    #[must_use]
    pub const fn with_duplicate_signatures(mut self, policy: DuplicateSignaturePolicy) -> Self {
        self.duplicate_signatures = policy;
        self
    }

    pub(crate) fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|allowed| allowed == extension)
    }

    pub(crate) fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.is_match(path))
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| EngineError::InvalidExcludePattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.extensions, vec!["graphql".to_string()]);
        assert!(!options.embedded);
        assert!(options.exclude.is_empty());
        assert!(options.transforms.is_empty());
        assert_eq!(options.extract_config.tag_identifiers, vec!["gql".to_string()]);
        assert_eq!(options.duplicate_signatures, DuplicateSignaturePolicy::Reuse);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = ExtractOptions::new().with_exclude_patterns(["src/(unclosed"]);
        match result {
            Err(EngineError::InvalidExcludePattern { pattern, .. }) => {
                assert_eq!(pattern, "src/(unclosed");
            }
            other => panic!("expected InvalidExcludePattern, got {other:?}"),
        }
    }

    #[test]
    fn test_exclusion_matches_anywhere_in_path() {
        let options = ExtractOptions::new()
            .with_exclude_patterns(["node_modules", r"\.test\."])
            .unwrap();
        assert!(options.is_excluded("app/node_modules/lib/q.graphql"));
        assert!(options.is_excluded("src/author.test.graphql"));
        assert!(!options.is_excluded("src/author.graphql"));
    }

    #[test]
    fn test_accepts_extension() {
        let options = ExtractOptions::new().with_extensions(["js", "ts"]);
        assert!(options.accepts_extension("ts"));
        assert!(!options.accepts_extension("graphql"));
    }
}
