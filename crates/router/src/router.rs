use crate::{
    GraphQLRequest, GraphQLResponse, HttpExecutor, OutgoingRequest, PersistedRequest,
    QueryExecutor, QueryRequest, Result, RouterError,
};
use graphql_persist_canonical::ast::{Document, OperationDefinition};
use graphql_persist_canonical::{
    assemble_operation_document, operations, signature_of, Manifest, Name, Node,
    TransformPipeline,
};
use graphql_persist_config::RouterConfig;
use std::sync::Arc;

type OperationNode = Node<OperationDefinition>;

/// Sends persisted query IDs in place of query text.
///
/// Every request is signed the same way extraction signs operations, looked up
/// in the manifest and replaced by `{id, variables, operationName}`. A request
/// whose signature is missing fails; it is never sent as text. A disabled
/// router forwards every request with its full query text.
///
/// The manifest is shared read-only, so a router can serve concurrent calls.
pub struct PersistedQueryRouter<E> {
    manifest: Arc<Manifest>,
    executor: E,
    enabled: bool,
    transforms: TransformPipeline,
}

impl<E: QueryExecutor> PersistedQueryRouter<E> {
    #[must_use]
    pub fn new(manifest: impl Into<Arc<Manifest>>, executor: E) -> Self {
        Self {
            manifest: manifest.into(),
            executor,
            enabled: true,
            transforms: TransformPipeline::new(),
        }
    }

    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Transforms to apply before signing; must match the ones extraction used.
    #[must_use]
    pub fn with_transforms(mut self, transforms: TransformPipeline) -> Self {
        self.transforms = transforms;
        self
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Computes the manifest key for a request.
    ///
    /// The operation is chosen by `operation_name` when the document defines
    /// it, otherwise it must be the document's only operation. It is then
    /// assembled with the fragments it spreads, so unused fragments and
    /// definition order in the request do not affect the key.
    pub fn signature_for(&self, request: &GraphQLRequest) -> Result<String> {
        let transformed = self.transforms.apply(&request.query);
        let operation = select_operation(&transformed, request.operation_name.as_deref())?;
        Ok(signature_of(&assemble_operation_document(
            &transformed,
            operation,
        )))
    }

    /// Rewrites a request into the body that goes over the wire. No I/O.
    pub fn reduce(&self, request: &GraphQLRequest) -> Result<OutgoingRequest> {
        if !self.enabled {
            return Ok(OutgoingRequest::Query(QueryRequest {
                query: request.query.to_string(),
                variables: request.variables.clone(),
                operation_name: request.operation_name.clone(),
            }));
        }

        let signature = self.signature_for(request)?;
        let Some(id) = self.manifest.get(&signature) else {
            tracing::warn!(operation = ?request.operation_name, "Query not in manifest");
            return Err(RouterError::NotInManifest {
                operation: request.operation_name.clone(),
                signature,
            });
        };

        tracing::debug!(id, "Persisted query found");
        Ok(OutgoingRequest::Persisted(PersistedRequest {
            id,
            variables: request.variables.clone(),
            operation_name: request.operation_name.clone(),
        }))
    }

    /// Reduces the request and sends it through the executor.
    #[tracing::instrument(skip(self, request), fields(operation = ?request.operation_name))]
    pub async fn execute(&self, request: &GraphQLRequest) -> Result<GraphQLResponse> {
        let outgoing = self.reduce(request)?;
        self.executor.execute(&outgoing).await
    }
}

impl PersistedQueryRouter<HttpExecutor> {
    /// Loads the configured manifest and posts to the configured endpoint.
    ///
    /// A relative `config.manifest` is read relative to the working directory;
    /// configs returned by `load_config` already have it resolved against the
    /// config file's directory. A disabled router never reads the manifest.
    #[tracing::instrument(skip(config), fields(uri = %config.uri, manifest = %config.manifest.display()))]
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let manifest = if config.enabled {
            Manifest::load(&config.manifest)?
        } else {
            Manifest::new()
        };

        let executor = HttpExecutor::new(config.uri.clone())
            .with_headers(config.headers())
            .with_timeout(config.timeout())
            .with_connect_timeout(config.connect_timeout());

        Ok(Self::new(manifest, executor).with_enabled(config.enabled))
    }
}

fn select_operation<'a>(document: &'a Document, name: Option<&str>) -> Result<&'a OperationNode> {
    let candidates: Vec<&OperationNode> = operations(document).collect();

    if let Some(name) = name {
        if let Some(operation) = candidates
            .iter()
            .copied()
            .find(|operation| operation.name.as_ref().map(Name::as_str) == Some(name))
        {
            return Ok(operation);
        }
    }

    match (candidates.as_slice(), name) {
        ([], _) => Err(RouterError::NoOperation),
        ([only], _) => Ok(*only),
        (_, Some(name)) => Err(RouterError::UnknownOperation(name.to_string())),
        (_, None) => Err(RouterError::AmbiguousOperation),
    }
}
