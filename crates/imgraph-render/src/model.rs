//! Renderer-facing node/edge model

use crate::edge_id::{EdgeIdError, EdgeKey};
use serde::Serialize;

/// Node as consumed by the visualization layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    /// Node id (the node name)
    pub id: String,
    /// Display label (the node name)
    pub label: String,
    /// Visual grouping key: first image source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Merged edge for one `(from, to)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    /// Encoded [`EdgeKey`]
    pub id: String,
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Title, truncated for display
    pub label: String,
    /// Every merged label joined with `", "`
    pub title: String,
    #[serde(skip)]
    pub(crate) labels: Vec<String>,
}

impl RenderEdge {
    /// Structured identity of this edge
    #[inline]
    #[must_use]
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.from, &self.to, self.labels.clone())
    }

    /// Merged labels in relationship order
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Complete render model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderGraph {
    /// Nodes in graph order
    pub nodes: Vec<RenderNode>,
    /// Merged edges in first-seen order
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    /// Look up node by id
    #[inline]
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up edge by encoded id
    #[inline]
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&RenderEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Edges touching `node_id` in either direction
    pub fn incident_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a RenderEdge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.from == node_id || e.to == node_id)
    }

    /// Keys of the edges touching `node_id`
    #[must_use]
    pub fn incident_edge_keys(&self, node_id: &str) -> Vec<EdgeKey> {
        self.incident_edges(node_id).map(RenderEdge::key).collect()
    }

    /// Resolve an encoded edge id handed back by a renderer
    ///
    /// An id present in this model yields that edge's key with the labels
    /// exactly as the backend named them; only unknown ids are decoded.
    ///
    /// # Errors
    /// Returns [`EdgeIdError::Malformed`] for an unknown id that does not decode
    pub fn resolve_edge(&self, id: &str) -> Result<EdgeKey, EdgeIdError> {
        match self.edge(id) {
            Some(edge) => Ok(edge.key()),
            None => EdgeKey::decode(id),
        }
    }

    /// No nodes and no edges
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::convert;
    use crate::edge_id::EdgeKey;
    use imgraph_model::{Graph, GraphRelationship};
    use pretty_assertions::assert_eq;

    fn branching() -> Graph {
        Graph::new()
            .with_relationship(GraphRelationship::new("Check", "Done", "if yes, continue"))
            .with_relationship(GraphRelationship::new("Check", "Retry", "else"))
            .with_relationship(GraphRelationship::new("Retry", "Check", "loop#$#back"))
    }

    #[test]
    fn resolve_keeps_labels_with_joiner() {
        let render = convert(&branching());
        let edge = &render.edges[0];

        let key = render.resolve_edge(&edge.id).unwrap();
        assert_eq!(key.labels, ["if yes, continue"]);
        assert_ne!(EdgeKey::decode(&edge.id).unwrap(), key);
    }

    #[test]
    fn resolve_keeps_labels_with_separator() {
        let render = convert(&branching());
        let edge = &render.edges[2];

        assert!(EdgeKey::decode(&edge.id).is_err());
        let key = render.resolve_edge(&edge.id).unwrap();
        assert_eq!((key.from.as_str(), key.to.as_str()), ("Retry", "Check"));
        assert_eq!(key.labels, ["loop#$#back"]);
    }

    #[test]
    fn resolve_unknown_id_falls_back_to_decode() {
        let render = convert(&branching());
        let key = render.resolve_edge("A#$#B#$#x, y").unwrap();
        assert_eq!(key, EdgeKey::new("A", "B", vec!["x".into(), "y".into()]));
        assert!(render.resolve_edge("A#$#B").is_err());
    }

    #[test]
    fn incident_keys_cover_both_directions() {
        let render = convert(&branching());
        let keys = render.incident_edge_keys("Retry");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].labels, ["else"]);
        assert_eq!(keys[1].labels, ["loop#$#back"]);
        assert!(render.incident_edge_keys("Nowhere").is_empty());
    }
}
