//! imgraph Model
//!
//! Normalized knowledge graph types exchanged with the graph backend.
//!
//! # Core Concepts
//!
//! - [`Graph`]: nodes (unique by name) plus relationships between them
//! - [`GraphNode`] / [`GraphRelationship`]: entities and labelled links detected in images
//! - [`EditPayload`]: batched diff of node and edge changes sent per user edit
//! - [`parse_labels`]: comma-separated label input as typed by the user
//! - [`display_source_name`]: strips the content-hash suffix from uploaded image names
//!
//! # Example
//!
//! ```rust,ignore
//! use imgraph_model::{Graph, GraphNode, GraphRelationship};
//!
//! let graph = Graph::new()
//!     .with_node(GraphNode::new("A"))
//!     .with_node(GraphNode::new("B"))
//!     .with_relationship(GraphRelationship::new("A", "B", "knows"));
//!
//! assert_eq!(graph.relationship_count(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod edit;
mod graph;
mod image_name;
mod labels;

// Re-exports
pub use edit::{EdgeEdit, EditPayload, NodeEdit};
pub use graph::{Graph, GraphError, GraphNode, GraphRelationship};
pub use image_name::{display_source_name, hashed_image_name, HASH_SUFFIX_LEN};
pub use labels::{join_labels, parse_labels, LABEL_JOINER};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn graph_decodes_from_backend_json() {
        let json = r#"{
            "nodes": [
                {"name": "Start", "context": ["entry"], "imageSources": ["flow.png-0a1b2c3d"]},
                {"name": "End", "context": null, "imageSources": null}
            ],
            "relationships": [
                {"from": "Start", "to": "End", "name": "leads to", "context": [], "imageSources": ["flow.png-0a1b2c3d"]}
            ]
        }"#;

        let graph = Graph::from_json(json).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.node("End").unwrap().image_sources.is_empty());
        assert_eq!(
            display_source_name(&graph.nodes[0].image_sources[0]),
            "flow.png"
        );
    }

    #[test]
    fn payload_labels_come_from_parsed_input() {
        let labels = parse_labels("knows,  likes ");
        let payload = EditPayload::new().add_edges("A", "B", &labels);
        assert_eq!(payload.added_edges.len(), 2);
        assert_eq!(payload.added_edges[1].label, "likes");
    }
}
