//! imgraph Client
//!
//! Talks to the graph backend of record over HTTP.
//!
//! - [`GraphBackend`]: async trait covering upload, full graph, edit, chat and health
//! - [`HttpBackend`]: `reqwest` implementation
//! - [`ClientConfig`]: base URL, timeout and segmentation grid, loadable from TOML
//! - [`UploadBatch`]: reads and encodes images with hash-suffixed names
//!
//! # Example
//!
//! ```rust,ignore
//! use imgraph_client::{ClientConfig, GraphBackend, HttpBackend};
//!
//! # async fn example() -> Result<(), imgraph_client::BackendError> {
//! let backend = HttpBackend::new(&ClientConfig::new().with_env_overrides())?;
//! let graph = backend.full_graph().await?;
//! println!("{} nodes", graph.node_count());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod upload;
pub mod wire;

pub use backend::GraphBackend;
pub use config::{ClientConfig, Segmentation, API_BASE_URL_ENV};
pub use error::BackendError;
pub use http::HttpBackend;
pub use upload::{UploadBatch, UploadImage};
pub use wire::{
    ChatRequest, ChatResponse, ChatRole, ChatTurn, FullGraphResponse, HealthResponse,
    UploadRequest,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
