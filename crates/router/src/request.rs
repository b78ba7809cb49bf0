//! Request and response shapes.
//!
//! [`GraphQLRequest`] is what callers hand to the router: a parsed document
//! plus the usual variables and operation name. The router turns it into an
//! [`OutgoingRequest`], which is what goes over the wire.

use crate::Result;
use graphql_persist_canonical::ast::Document;
use graphql_persist_canonical::parse_document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Variables = Map<String, Value>;

/// An operation a caller wants to run.
#[derive(Debug, Clone)]
pub struct GraphQLRequest {
    /// The operation and every fragment it spreads
    pub query: Document,
    pub variables: Option<Variables>,
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    #[must_use]
    pub const fn new(query: Document) -> Self {
        Self {
            query,
            variables: None,
            operation_name: None,
        }
    }

    /// Parses the query text, failing on syntax errors.
    pub fn parse(query: &str) -> Result<Self> {
        Ok(Self::new(parse_document(query)?))
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// A request carrying the full query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// A request naming a persisted query by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRequest {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// The JSON body sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutgoingRequest {
    Persisted(PersistedRequest),
    Query(QueryRequest),
}

impl OutgoingRequest {
    /// The persisted ID, if this request carries one.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        match self {
            Self::Persisted(request) => Some(request.id),
            Self::Query(_) => None,
        }
    }

    #[must_use]
    pub const fn variables(&self) -> Option<&Variables> {
        match self {
            Self::Persisted(request) => request.variables.as_ref(),
            Self::Query(request) => request.variables.as_ref(),
        }
    }

    #[must_use]
    pub fn operation_name(&self) -> Option<&str> {
        match self {
            Self::Persisted(request) => request.operation_name.as_deref(),
            Self::Query(request) => request.operation_name.as_deref(),
        }
    }
}

/// A GraphQL response as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}
