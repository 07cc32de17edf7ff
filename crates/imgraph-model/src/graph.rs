//! Normalized graph model
//!
//! Mirrors the backend's JSON shape: `{"nodes": [...], "relationships": [...]}` with
//! camelCase `imageSources`. Nodes are identified by name.

use serde::{Deserialize, Deserializer, Serialize};

/// Entity detected in one or more images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique node name (identity)
    pub name: String,
    /// Free-text context snippets gathered during extraction
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: Vec<String>,
    /// Names of the images the node was found in
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_sources: Vec<String>,
}

impl GraphNode {
    /// Create node with no context or sources
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: Vec::new(),
            image_sources: Vec::new(),
        }
    }

    /// Add an image source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.image_sources.push(source.into());
        self
    }

    /// Add a context snippet
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// First image source, used as a visual grouping key
    #[inline]
    #[must_use]
    pub fn primary_source(&self) -> Option<&str> {
        self.image_sources.first().map(String::as_str)
    }
}

/// Labelled, directed link between two nodes
///
/// Several relationships may share the same `(from, to)` pair with different names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRelationship {
    /// Source node name
    pub from: String,
    /// Target node name
    pub to: String,
    /// Relationship label
    pub name: String,
    /// Free-text context snippets
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: Vec<String>,
    /// Names of the images the relationship was found in
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_sources: Vec<String>,
}

impl GraphRelationship {
    /// Create relationship with no context or sources
    #[inline]
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            name: name.into(),
            context: Vec::new(),
            image_sources: Vec::new(),
        }
    }

    /// Add an image source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.image_sources.push(source.into());
        self
    }
}

/// Knowledge graph as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes, unique by name
    pub nodes: Vec<GraphNode>,
    /// Relationships in backend order
    pub relationships: Vec<GraphRelationship>,
}

impl Graph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a graph from backend JSON
    ///
    /// # Errors
    /// Returns [`GraphError::Decode`] if required fields are missing or mistyped
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a graph from an already-parsed JSON value
    ///
    /// # Errors
    /// Returns [`GraphError::Decode`] if required fields are missing or mistyped
    pub fn from_value(value: serde_json::Value) -> Result<Self, GraphError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Add node, replacing any node with the same name
    #[must_use]
    pub fn with_node(mut self, node: GraphNode) -> Self {
        self.insert_node(node);
        self
    }

    /// Add relationship
    #[inline]
    #[must_use]
    pub fn with_relationship(mut self, relationship: GraphRelationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Insert node, replacing any node with the same name
    ///
    /// Returns the replaced node, if any.
    pub fn insert_node(&mut self, node: GraphNode) -> Option<GraphNode> {
        match self.nodes.iter_mut().find(|n| n.name == node.name) {
            Some(existing) => Some(std::mem::replace(existing, node)),
            None => {
                self.nodes.push(node);
                None
            }
        }
    }

    /// Look up node by name
    #[inline]
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Check if node exists
    #[inline]
    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.node(name).is_some()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships
    #[inline]
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Graph with neither nodes nor relationships
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }
}

/// Errors decoding graphs
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// JSON did not match the graph shape
    #[error("malformed graph: {0}")]
    Decode(#[from] serde_json::Error),
}

// The backend stores `null` for lists on user-created nodes and edges.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
