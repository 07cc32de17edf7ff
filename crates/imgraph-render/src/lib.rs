//! imgraph Render
//!
//! Converts the normalized [`Graph`](imgraph_model::Graph) into the node/edge
//! model a graph renderer draws, and owns the string encoding of edge ids at
//! that boundary.
//!
//! # Core Concepts
//!
//! - [`convert`]: pure, total graph to [`RenderGraph`] conversion
//! - [`RenderEdge`]: one edge per `(from, to)` pair, carrying every merged label
//! - [`EdgeKey`]: structured edge identity with an [`encode`](EdgeKey::encode) /
//!   [`decode`](EdgeKey::decode) pair for renderer ids
//!
//! # Example
//!
//! ```rust,ignore
//! use imgraph_render::{convert, EdgeKey};
//!
//! let render = convert(&graph);
//! for edge in &render.edges {
//!     let key = EdgeKey::decode(&edge.id)?;
//!     println!("{} -> {}: {:?}", key.from, key.to, key.labels);
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod convert;
mod edge_id;
mod model;

pub use convert::{convert, truncate_label, ELLIPSIS, MAX_LABEL_CHARS};
pub use edge_id::{EdgeIdError, EdgeKey, EDGE_ID_SEPARATOR};
pub use model::{RenderEdge, RenderGraph, RenderNode};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
