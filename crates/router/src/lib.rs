//! # Persisted query routing
//!
//! Wraps a [`QueryExecutor`] so that outgoing operations are sent as manifest
//! IDs instead of query text.
//!
//! ```no_run
//! use graphql_persist_canonical::Manifest;
//! use graphql_persist_router::{GraphQLRequest, HttpExecutor, PersistedQueryRouter};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::load(Path::new("extracted_queries.json"))?;
//! let router = PersistedQueryRouter::new(
//!     manifest,
//!     HttpExecutor::new("https://api.example.com/graphql"),
//! );
//!
//! let request = GraphQLRequest::parse("query ListOfAuthors { author { firstName } }")?;
//! let response = router.execute(&request).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod request;
mod router;

pub use error::{Result, RouterError};
pub use executor::{HttpExecutor, QueryExecutor};
pub use request::{
    GraphQLRequest, GraphQLResponse, OutgoingRequest, PersistedRequest, QueryRequest, Variables,
};
pub use router::PersistedQueryRouter;
