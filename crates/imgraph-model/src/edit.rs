//! Edit payload sent to the backend's edit endpoint
//!
//! One payload is produced per user edit action. Node edits use the
//! `{oldName, newName}` convention: an empty `oldName` creates a node, an
//! empty `newName` deletes one, and two names retire the old identity in
//! favour of the new one.

use serde::{Deserialize, Serialize};

/// Single `(from, to, label)` edge triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeEdit {
    /// Source node name
    pub from: String,
    /// Target node name
    pub to: String,
    /// Relationship label
    pub label: String,
}

impl EdgeEdit {
    /// Create edge triple
    #[inline]
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }
}

/// Node identity transition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEdit {
    /// Retired name, empty for creation
    pub old_name: String,
    /// Introduced name, empty for deletion
    pub new_name: String,
}

impl NodeEdit {
    /// Node creation
    #[inline]
    #[must_use]
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            old_name: String::new(),
            new_name: name.into(),
        }
    }

    /// Node deletion
    #[inline]
    #[must_use]
    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            old_name: name.into(),
            new_name: String::new(),
        }
    }

    /// Rename: retire `old_name`, introduce `new_name`
    #[inline]
    #[must_use]
    pub fn rename(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

/// Batched graph diff for one edit action
///
/// Empty sections are omitted from the wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPayload {
    /// Edges to create
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_edges: Vec<EdgeEdit>,
    /// Edges to remove
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_edges: Vec<EdgeEdit>,
    /// Node creations, renames and deletions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edited_nodes: Vec<NodeEdit>,
}

impl EditPayload {
    /// Create empty payload
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one edge per label between `from` and `to`
    #[must_use]
    pub fn add_edges<S: AsRef<str>>(mut self, from: &str, to: &str, labels: &[S]) -> Self {
        self.added_edges.extend(
            labels
                .iter()
                .map(|label| EdgeEdit::new(from, to, label.as_ref())),
        );
        self
    }

    /// Delete one edge per label between `from` and `to`
    #[must_use]
    pub fn delete_edges<S: AsRef<str>>(mut self, from: &str, to: &str, labels: &[S]) -> Self {
        self.deleted_edges.extend(
            labels
                .iter()
                .map(|label| EdgeEdit::new(from, to, label.as_ref())),
        );
        self
    }

    /// Append a node edit
    #[inline]
    #[must_use]
    pub fn edit_node(mut self, edit: NodeEdit) -> Self {
        self.edited_nodes.push(edit);
        self
    }

    /// Total number of entries across all sections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.added_edges.len() + self.deleted_edges.len() + self.edited_nodes.len()
    }

    /// Payload that would change nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
