//! Testing utilities for the imgraph workspace
//!
//! Shared fixtures and a scripted [`GraphBackend`].

#![allow(missing_docs)]

use async_trait::async_trait;
use imgraph_client::{
    BackendError, ChatRequest, ChatResponse, GraphBackend, HealthResponse, UploadRequest,
};
use imgraph_model::{EditPayload, Graph, GraphNode, GraphRelationship};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Three nodes; A->B carries two labels, B->C one
pub fn sample_graph() -> Graph {
    Graph::new()
        .with_node(GraphNode::new("A").with_source("street.png-0a1b2c3d"))
        .with_node(GraphNode::new("B").with_source("street.png-0a1b2c3d"))
        .with_node(GraphNode::new("C"))
        .with_relationship(GraphRelationship::new("A", "B", "knows"))
        .with_relationship(GraphRelationship::new("A", "B", "likes"))
        .with_relationship(GraphRelationship::new("B", "C", "calls"))
}

/// Single node graph, handy as a distinguishable replacement
pub fn single_node_graph(name: &str) -> Graph {
    Graph::new().with_node(GraphNode::new(name))
}

/// Chat response carrying `subgraph` as its relevant subgraph
pub fn chat_response(text: &str, image_names: &[&str], subgraph: &Graph) -> ChatResponse {
    ChatResponse {
        response: text.to_string(),
        image_names: image_names.iter().map(|s| (*s).to_string()).collect(),
        relevant_subgraph: serde_json::to_value(subgraph).unwrap(),
    }
}

/// Non-success status from `endpoint`
pub fn rejection(endpoint: &'static str) -> BackendError {
    BackendError::Status {
        endpoint,
        status: 400,
        body: r#"{"detail": "rejected"}"#.to_string(),
    }
}

/// Network failure on `endpoint`
pub fn transport_failure(endpoint: &'static str) -> BackendError {
    BackendError::transport(endpoint, "connection refused")
}

/// Undecodable response body on `endpoint`
pub fn decode_failure(endpoint: &'static str) -> BackendError {
    BackendError::Decode {
        endpoint,
        source: serde_json::from_str::<serde_json::Value>("{\"nodes\": [").unwrap_err(),
    }
}

/// Request recorded by [`ScriptedBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(UploadRequest),
    FullGraph,
    EditGraph(EditPayload),
    Chat(ChatRequest),
    Health,
}

/// Backend answering from queued responses
///
/// Graph-returning calls (upload, full graph, edit) share one queue; chat has
/// its own. An exhausted queue answers with a transport failure.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    graphs: Mutex<VecDeque<Result<Graph, BackendError>>>,
    chats: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a graph answer
    pub fn with_graph(self, graph: Graph) -> Self {
        self.graphs.lock().push_back(Ok(graph));
        self
    }

    /// Queue a failure for the next graph-returning call
    pub fn with_graph_error(self, error: BackendError) -> Self {
        self.graphs.lock().push_back(Err(error));
        self
    }

    /// Queue a chat answer
    pub fn with_chat(self, response: ChatResponse) -> Self {
        self.chats.lock().push_back(Ok(response));
        self
    }

    /// Queue a chat failure
    pub fn with_chat_error(self, error: BackendError) -> Self {
        self.chats.lock().push_back(Err(error));
        self
    }

    /// Every request so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Number of requests so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Payloads sent to the edit endpoint
    pub fn edit_payloads(&self) -> Vec<EditPayload> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::EditGraph(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Chat requests sent so far
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Chat(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn next_graph(&self, endpoint: &'static str) -> Result<Graph, BackendError> {
        self.graphs
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::transport(endpoint, "no scripted response")))
    }
}

#[async_trait]
impl GraphBackend for ScriptedBackend {
    async fn upload(&self, request: &UploadRequest) -> Result<Graph, BackendError> {
        self.calls.lock().push(Call::Upload(request.clone()));
        self.next_graph("/upload")
    }

    async fn full_graph(&self) -> Result<Graph, BackendError> {
        self.calls.lock().push(Call::FullGraph);
        self.next_graph("/fullgraph")
    }

    async fn edit_graph(&self, payload: &EditPayload) -> Result<Graph, BackendError> {
        self.calls.lock().push(Call::EditGraph(payload.clone()));
        self.next_graph("/editgraph")
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.calls.lock().push(Call::Chat(request.clone()));
        self.chats
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::transport("/query", "no scripted response")))
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.calls.lock().push(Call::Health);
        Ok(HealthResponse {
            status: "ok".to_string(),
        })
    }
}
