//! Request and response bodies of the backend HTTP surface
//!
//! | Endpoint | Request | Response |
//! |---|---|---|
//! | `POST /upload` | [`UploadRequest`] | [`FullGraphResponse`] |
//! | `GET /fullgraph` | none | [`FullGraphResponse`] |
//! | `POST /editgraph` | [`EditPayload`](imgraph_model::EditPayload) | [`FullGraphResponse`] |
//! | `POST /query` | [`ChatRequest`] | [`ChatResponse`] |
//! | `GET /healthcheck` | none | [`HealthResponse`] |

use imgraph_model::Graph;
use serde::{Deserialize, Serialize};

/// Endpoint paths, relative to the base URL
pub mod endpoints {
    /// Image upload and analysis
    pub const UPLOAD: &str = "/upload";
    /// Full graph query
    pub const FULL_GRAPH: &str = "/fullgraph";
    /// Batched graph edit
    pub const EDIT_GRAPH: &str = "/editgraph";
    /// Chat query
    pub const QUERY: &str = "/query";
    /// Liveness probe
    pub const HEALTH: &str = "/healthcheck";
}

/// Images to analyze, with the segmentation grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Base64 image bodies, no data-URL prefix
    pub image_base64_array: Vec<String>,
    /// Hash-suffixed image names, parallel to `image_base64_array`
    pub image_name_array: Vec<String>,
    /// Grid rows
    pub rows: u32,
    /// Grid columns
    pub cols: u32,
    /// Section overlap
    pub overlap: u32,
}

/// Full graph envelope returned by upload, query and edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullGraphResponse {
    /// Complete graph after the operation
    pub full_graph: Graph,
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person asking
    User,
    /// The assistant answering
    Assistant,
}

/// One turn of conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker
    pub role: ChatRole,
    /// Message text; assistant turns carry a JSON `{"text", "imageSources"}` object
    pub content: String,
}

impl ChatTurn {
    /// User turn
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Assistant turn
    #[inline]
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user message
    pub user_input: String,
    /// Prior turns, oldest first
    pub conversation_history: Vec<ChatTurn>,
    /// Scope the answer to the subgraph relevant to `user_input`
    pub use_relevant_context: bool,
}

/// Chat answer
///
/// `relevant_subgraph` is kept as raw JSON; the chat bridge decodes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant answer text (markdown)
    pub response: String,
    /// Hash-suffixed names of the images the answer draws on
    pub image_names: Vec<String>,
    /// Graph the assistant was given as context
    pub relevant_subgraph: serde_json::Value,
}

/// Liveness probe answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when healthy
    pub status: String,
}

impl HealthResponse {
    /// Check for the healthy status
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
