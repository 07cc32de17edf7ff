//! Graph to render model conversion
//!
//! Relationships sharing a `(from, to)` pair collapse into one render edge
//! whose title lists every label in relationship order. Duplicate labels are
//! kept, so a relationship recorded twice shows up twice in the title.

use crate::edge_id::EdgeKey;
use crate::model::{RenderEdge, RenderGraph, RenderNode};
use imgraph_model::Graph;
use indexmap::IndexMap;

/// Maximum number of characters of a title shown as the edge label
pub const MAX_LABEL_CHARS: usize = 20;

/// Marker appended to truncated labels
pub const ELLIPSIS: &str = "...";

/// Convert a normalized graph into the render model
#[must_use]
pub fn convert(graph: &Graph) -> RenderGraph {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| RenderNode {
            id: node.name.clone(),
            label: node.name.clone(),
            group: node.primary_source().map(str::to_string),
        })
        .collect();

    let mut merged: IndexMap<(&str, &str), Vec<String>> = IndexMap::new();
    for relationship in &graph.relationships {
        merged
            .entry((relationship.from.as_str(), relationship.to.as_str()))
            .or_default()
            .push(relationship.name.clone());
    }

    let edges = merged
        .into_iter()
        .map(|((from, to), labels)| {
            let key = EdgeKey::new(from, to, labels);
            let title = key.title();
            RenderEdge {
                id: key.encode(),
                from: key.from,
                to: key.to,
                label: truncate_label(&title),
                title,
                labels: key.labels,
            }
        })
        .collect();

    RenderGraph { nodes, edges }
}

/// Shorten a title to [`MAX_LABEL_CHARS`] characters plus [`ELLIPSIS`]
///
/// Counts characters, not bytes, so multi-byte labels are never split.
#[must_use]
pub fn truncate_label(title: &str) -> String {
    match title.char_indices().nth(MAX_LABEL_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &title[..cut]),
        None => title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgraph_model::{GraphNode, GraphRelationship};
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_same_pair() {
        let graph = Graph::new()
            .with_node(GraphNode::new("A"))
            .with_node(GraphNode::new("B"))
            .with_relationship(GraphRelationship::new("A", "B", "knows"))
            .with_relationship(GraphRelationship::new("A", "B", "likes"));

        let render = convert(&graph);
        assert_eq!(render.edges.len(), 1);

        let edge = &render.edges[0];
        assert_eq!(edge.title, "knows, likes");
        assert_eq!(edge.label, "knows, likes");
        assert_eq!(edge.id, "A#$#B#$#knows, likes");
    }

    #[test]
    fn direction_matters() {
        let graph = Graph::new()
            .with_relationship(GraphRelationship::new("A", "B", "x"))
            .with_relationship(GraphRelationship::new("B", "A", "y"));

        let render = convert(&graph);
        assert_eq!(render.edges.len(), 2);
        assert_eq!(render.edges[0].id, "A#$#B#$#x");
        assert_eq!(render.edges[1].id, "B#$#A#$#y");
    }

    #[test]
    fn first_seen_order() {
        let graph = Graph::new()
            .with_relationship(GraphRelationship::new("B", "C", "1"))
            .with_relationship(GraphRelationship::new("A", "B", "2"))
            .with_relationship(GraphRelationship::new("B", "C", "3"));

        let render = convert(&graph);
        let ids: Vec<_> = render.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["B#$#C#$#1, 3", "A#$#B#$#2"]);
    }

    #[test]
    fn duplicate_labels_are_preserved() {
        let graph = Graph::new()
            .with_relationship(GraphRelationship::new("A", "B", "x"))
            .with_relationship(GraphRelationship::new("A", "B", "x"));

        let render = convert(&graph);
        assert_eq!(render.edges[0].title, "x, x");
        assert_eq!(render.edges[0].labels(), ["x", "x"]);
    }

    #[test]
    fn node_group_is_first_source() {
        let graph = Graph::new()
            .with_node(GraphNode::new("A").with_source("one.png").with_source("two.png"))
            .with_node(GraphNode::new("B"));

        let render = convert(&graph);
        assert_eq!(
            render.nodes,
            [
                RenderNode {
                    id: "A".into(),
                    label: "A".into(),
                    group: Some("one.png".into()),
                },
                RenderNode {
                    id: "B".into(),
                    label: "B".into(),
                    group: None,
                },
            ]
        );
    }

    #[test]
    fn truncation_boundary() {
        let exact = "a".repeat(MAX_LABEL_CHARS);
        assert_eq!(truncate_label(&exact), exact);

        let long = "b".repeat(MAX_LABEL_CHARS + 1);
        assert_eq!(truncate_label(&long), format!("{}...", "b".repeat(20)));
    }

    #[test]
    fn truncation_counts_characters() {
        let title = "é".repeat(25);
        let label = truncate_label(&title);
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS + ELLIPSIS.len());
        assert!(label.starts_with(&"é".repeat(20)));
    }

    #[test]
    fn long_title_keeps_full_id() {
        let graph = Graph::new()
            .with_relationship(GraphRelationship::new("A", "B", "communicates with"))
            .with_relationship(GraphRelationship::new("A", "B", "depends on"));

        let edge = &convert(&graph).edges[0];
        assert_eq!(edge.title, "communicates with, depends on");
        assert_eq!(edge.label, "communicates with, d...");
        assert_eq!(edge.id, "A#$#B#$#communicates with, depends on");
        assert_eq!(EdgeKey::decode(&edge.id).unwrap(), edge.key());
    }

    #[test]
    fn empty_graph_converts_to_empty_model() {
        assert!(convert(&Graph::new()).is_empty());
    }
}
