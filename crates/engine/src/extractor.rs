use crate::split::{duplicate_definition_names, separate_operations};
use crate::walk::{normalize_path, read_input_path};
use crate::{EngineError, ExtractOptions, Result};
use graphql_persist_canonical::ast::Document;
use graphql_persist_canonical::{
    assemble_operation_document, operations, parse_document, signature_of, Manifest,
    ManifestBuilder,
};
use std::path::Path;

/// Builds persisted query manifests from a source tree.
///
/// An `Extractor` holds only configuration. Every call that produces a
/// manifest starts a fresh ID counter at 1, so one extractor can be shared
/// between threads and reused across runs.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    #[must_use]
    pub const fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Walks `input` (a file or a directory) and returns its manifest.
    ///
    /// Nothing is written. Any read failure, syntax error or duplicate
    /// operation name aborts the run.
    #[tracing::instrument(skip(self), fields(input = %input.display()))]
    pub fn extract(&self, input: &Path) -> Result<Manifest> {
        let source = self.read_input_path(input)?;
        let manifest = self.manifest_from_source(&source)?;
        tracing::info!(operations = manifest.len(), "Extraction complete");
        Ok(manifest)
    }

    /// Runs [`extract`](Self::extract) and writes the manifest to `output`.
    ///
    /// The file is only written once the whole input has been processed.
    #[tracing::instrument(skip(self), fields(input = %input.display(), output = %output.display()))]
    pub fn extract_to_file(&self, input: &Path, output: &Path) -> Result<Manifest> {
        let manifest = self.extract(input)?;
        manifest.write_atomic(output)?;
        tracing::info!(path = %output.display(), "Wrote output file");
        Ok(manifest)
    }

    /// The combined GraphQL text of every eligible file under `path`.
    pub fn read_input_path(&self, path: &Path) -> Result<String> {
        read_input_path(&normalize_path(path), &self.options)
    }

    /// Parses combined GraphQL text and maps each of its operations.
    pub fn manifest_from_source(&self, source: &str) -> Result<Manifest> {
        if source.trim().is_empty() {
            tracing::debug!("No GraphQL input");
            return Ok(Manifest::new());
        }

        let document = parse_document(source)?;

        let duplicates = duplicate_definition_names(&document);
        if !duplicates.is_empty() {
            return Err(EngineError::DuplicateOperationNames(duplicates));
        }

        let mut builder = ManifestBuilder::new(self.options.duplicate_signatures);
        for separated in separate_operations(&document) {
            tracing::trace!(operation = ?separated.name, "Mapping operation");
            self.map_document(&separated.document, &mut builder);
        }
        Ok(builder.finish())
    }

    /// Maps every operation of an already parsed document.
    ///
    /// Unlike [`manifest_from_source`](Self::manifest_from_source) there is
    /// no duplicate-name check and no splitting.
    #[must_use]
    pub fn manifest_from_document(&self, document: &Document) -> Manifest {
        let mut builder = ManifestBuilder::new(self.options.duplicate_signatures);
        self.map_document(document, &mut builder);
        builder.finish()
    }

    /// Reads and maps a single GraphQL file.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn process_graphql_file(&self, path: &Path) -> Result<Manifest> {
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = parse_document(&source)?;
        Ok(self.manifest_from_document(&document))
    }

    fn map_document(&self, document: &Document, builder: &mut ManifestBuilder) {
        let transformed = self.options.transforms.apply(document);

        for operation in operations(&transformed) {
            let assembled = assemble_operation_document(&transformed, operation);
            let id = builder.record(signature_of(&assembled));
            tracing::debug!(
                operation = operation.name.as_ref().map_or("<anonymous>", |name| name.as_str()),
                id,
                "Assigned ID"
            );
        }
    }
}
