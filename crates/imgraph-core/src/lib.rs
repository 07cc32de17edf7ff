//! imgraph Core
//!
//! Client-side state and protocol for the image knowledge graph:
//! - [`GraphStore`]: full graph, relevant subgraph and active view, each observable
//! - [`EditCommand`]: validated user edits turned into batched payloads
//! - [`ChatBridge`]: routes chat subgraphs into the store and to subscribers
//! - [`GraphSession`]: ties a backend to a store for refresh, upload, chat and edit
//!
//! # Example
//!
//! ```rust,ignore
//! use imgraph_core::prelude::*;
//!
//! let session = GraphSession::new(Arc::new(HttpBackend::new(&ClientConfig::new())?));
//! session.refresh().await?;
//!
//! let render = session.store().active_render();
//! let key = render.resolve_edge(&render.edges[0].id)?;
//! session.apply(&EditCommand::edit_edge(&key, "knows, trusts")?).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod chat;
pub mod edit;
pub mod error;
pub mod session;
pub mod store;

pub use chat::{ChatAnswer, ChatBridge, ConversationHistory};
pub use edit::{EditCommand, EditKind, EditOutcome};
pub use error::{EditError, SessionError};
pub use session::GraphSession;
pub use store::{select_view, ActiveView, GraphStore, StoreSnapshot, ViewSource};

/// Prelude for common imports
pub mod prelude {
    pub use crate::chat::{ChatAnswer, ChatBridge, ConversationHistory};
    pub use crate::edit::{EditCommand, EditKind, EditOutcome};
    pub use crate::error::{EditError, SessionError};
    pub use crate::session::GraphSession;
    pub use crate::store::{ActiveView, GraphStore, ViewSource};
    pub use imgraph_client::{ClientConfig, GraphBackend, HttpBackend, UploadBatch};
    pub use imgraph_model::{EditPayload, Graph, GraphNode, GraphRelationship};
    pub use imgraph_render::{convert, EdgeKey, RenderGraph};
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
