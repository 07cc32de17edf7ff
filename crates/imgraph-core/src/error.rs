//! Error types for imgraph core
//!
//! Two layers:
//! - [`EditError`]: an edit command could not be built from user input
//! - [`SessionError`]: an operation against the backend failed

use imgraph_client::BackendError;
use imgraph_model::GraphError;

/// Edit command validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// A parsed edge label was empty
    #[error("edge labels must not be empty")]
    EmptyLabel,

    /// A node name was empty
    #[error("node names must not be empty")]
    EmptyNodeName,

    /// Value contains the edge id separator
    #[error("'{0}' contains the reserved sequence '#$#'")]
    ReservedSeparator(String),

    /// Rename to the current name
    #[error("node '{0}' already has that name")]
    Unchanged(String),
}

/// Session operation error
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Backend call failed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Edit command was invalid
    #[error("invalid edit: {0}")]
    Edit(#[from] EditError),

    /// Chat message was empty after trimming
    #[error("message is empty")]
    EmptyMessage,

    /// Upload batch contained no images
    #[error("no images to upload")]
    EmptyUpload,

    /// Chat response carried a subgraph that is not a graph
    #[error("malformed relevant subgraph: {0}")]
    MalformedSubgraph(#[source] GraphError),
}

impl SessionError {
    /// Check if the backend could not be reached
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Backend(e) if e.is_transport())
    }

    /// Check if the backend refused the request
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Backend(e) if e.is_rejection())
    }

    /// Check if the input was refused before any request was sent
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Edit(_) | Self::EmptyMessage | Self::EmptyUpload)
    }
}
