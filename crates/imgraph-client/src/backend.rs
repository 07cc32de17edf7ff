//! Backend seam
//!
//! Everything the core needs from the backend of record. [`HttpBackend`](crate::HttpBackend)
//! is the production implementation; tests substitute scripted backends.

use crate::error::BackendError;
use crate::wire::{ChatRequest, ChatResponse, HealthResponse, UploadRequest};
use async_trait::async_trait;
use imgraph_model::{EditPayload, Graph};

/// Backend of record for the knowledge graph
///
/// Every graph-returning call yields the complete graph after the operation;
/// callers replace their copy wholesale.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Analyze uploaded images and return the merged full graph
    async fn upload(&self, request: &UploadRequest) -> Result<Graph, BackendError>;

    /// Fetch the current full graph
    async fn full_graph(&self) -> Result<Graph, BackendError>;

    /// Apply a batched edit and return the refreshed full graph
    async fn edit_graph(&self, payload: &EditPayload) -> Result<Graph, BackendError>;

    /// Ask the assistant a question
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;

    /// Liveness probe
    async fn health(&self) -> Result<HealthResponse, BackendError>;
}
