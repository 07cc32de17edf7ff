//! Edit commands
//!
//! Editing is two-phase. Building an [`EditCommand`] is synchronous and
//! validates user input. Edges are named by their [`EdgeKey`], never by the
//! encoded render id: ids coming back from a renderer are resolved with
//! [`RenderGraph::resolve_edge`](imgraph_render::RenderGraph::resolve_edge)
//! first, so labels keep their exact backend spelling. Submitting is
//! asynchronous: the payload goes to the backend and only a confirmed response
//! replaces the store's full graph. A failed submission leaves the store as it
//! was; nothing is rolled back because nothing was applied early.

use crate::error::{EditError, SessionError};
use crate::store::GraphStore;
use imgraph_client::GraphBackend;
use imgraph_model::{parse_labels, EditPayload, Graph, NodeEdit};
use imgraph_render::{EdgeKey, EDGE_ID_SEPARATOR};
use std::collections::HashSet;
use std::sync::Arc;

/// User action an [`EditCommand`] was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// New node
    AddNode,
    /// Node renamed
    RenameNode,
    /// Node and its incident edges removed
    DeleteNode,
    /// Edge labels added between two nodes
    AddEdge,
    /// Edge labels replaced
    EditEdge,
    /// Edge and all its labels removed
    DeleteEdge,
    /// Several nodes and edges removed at once
    DeleteSelection,
}

/// Result of submitting an [`EditCommand`]
#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// Backend confirmed; the store now holds `full_graph`
    Applied {
        /// Payload that was sent
        payload: EditPayload,
        /// Refreshed full graph
        full_graph: Arc<Graph>,
    },
    /// Nothing to change, no request was sent
    Skipped,
}

impl EditOutcome {
    /// Check if the backend applied the edit
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Validated edit ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCommand {
    kind: EditKind,
    payload: EditPayload,
}

impl EditCommand {
    /// Create a node named `label`
    ///
    /// # Errors
    /// Returns [`EditError`] if the name is empty or contains `#$#`
    pub fn add_node(label: &str) -> Result<Self, EditError> {
        let name = node_name(label)?;
        Ok(Self::new(
            EditKind::AddNode,
            EditPayload::new().edit_node(NodeEdit::create(name)),
        ))
    }

    /// Rename node `old` to `new`
    ///
    /// Sent as a single `{oldName, newName}` entry; the backend keeps the
    /// node's relationships.
    ///
    /// # Errors
    /// Returns [`EditError::Unchanged`] when the names are equal, or a
    /// validation error for either name
    pub fn rename_node(old: &str, new: &str) -> Result<Self, EditError> {
        let old = node_name(old)?;
        let new = node_name(new)?;
        if old == new {
            return Err(EditError::Unchanged(old.to_string()));
        }
        Ok(Self::new(
            EditKind::RenameNode,
            EditPayload::new().edit_node(NodeEdit::rename(old, new)),
        ))
    }

    /// Delete `node_id` together with the edges touching it
    ///
    /// `incident_edges` are the keys of the render edges connected to the
    /// node, see [`RenderGraph::incident_edge_keys`](imgraph_render::RenderGraph::incident_edge_keys).
    ///
    /// # Errors
    /// Returns [`EditError::EmptyNodeName`] for an empty node id
    pub fn delete_node(node_id: &str, incident_edges: &[EdgeKey]) -> Result<Self, EditError> {
        let payload = deletion_payload(&[node_id], incident_edges)?;
        Ok(Self::new(EditKind::DeleteNode, payload))
    }

    /// Add one relationship per label in `raw_labels` from `from` to `to`
    ///
    /// # Errors
    /// Returns [`EditError`] for empty or reserved names and labels
    pub fn add_edge(from: &str, to: &str, raw_labels: &str) -> Result<Self, EditError> {
        let from = node_name(from)?;
        let to = node_name(to)?;
        let labels = validated_labels(raw_labels)?;
        Ok(Self::new(
            EditKind::AddEdge,
            EditPayload::new().add_edges(from, to, &labels),
        ))
    }

    /// Replace the labels of edge `key` with `raw_labels`
    ///
    /// Only the difference is sent: labels that were added and labels that
    /// were removed. Labels present before and after produce no entries, and
    /// an edit that changes nothing yields a command that is skipped on submit.
    ///
    /// # Errors
    /// Returns [`EditError`] for invalid labels
    pub fn edit_edge(key: &EdgeKey, raw_labels: &str) -> Result<Self, EditError> {
        let new_labels = validated_labels(raw_labels)?;

        let added = difference(&new_labels, &key.labels);
        let removed = difference(&key.labels, &new_labels);

        Ok(Self::new(
            EditKind::EditEdge,
            EditPayload::new()
                .add_edges(&key.from, &key.to, &added)
                .delete_edges(&key.from, &key.to, &removed),
        ))
    }

    /// Delete edge `key` and every label merged into it
    #[must_use]
    pub fn delete_edge(key: &EdgeKey) -> Self {
        Self::new(
            EditKind::DeleteEdge,
            EditPayload::new().delete_edges(&key.from, &key.to, &key.labels),
        )
    }

    /// Delete several nodes and edges in one batch
    ///
    /// Edges listed more than once are sent once.
    ///
    /// # Errors
    /// Returns [`EditError::EmptyNodeName`] for an empty node id
    pub fn delete_selection<N: AsRef<str>>(
        node_ids: &[N],
        edges: &[EdgeKey],
    ) -> Result<Self, EditError> {
        let payload = deletion_payload(node_ids, edges)?;
        Ok(Self::new(EditKind::DeleteSelection, payload))
    }

    #[inline]
    fn new(kind: EditKind, payload: EditPayload) -> Self {
        Self { kind, payload }
    }

    /// Action this command was built from
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    /// Payload that will be sent
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &EditPayload {
        &self.payload
    }

    /// Consume into the payload
    #[inline]
    #[must_use]
    pub fn into_payload(self) -> EditPayload {
        self.payload
    }

    /// Command would change nothing
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.payload.is_empty()
    }

    /// Send the payload and apply the confirmed graph to `store`
    ///
    /// No-op commands return [`EditOutcome::Skipped`] without a request.
    ///
    /// # Errors
    /// Returns [`SessionError::Backend`] on transport failure, rejection or
    /// malformed response; the store is left untouched
    pub async fn submit(
        &self,
        backend: &dyn GraphBackend,
        store: &GraphStore,
    ) -> Result<EditOutcome, SessionError> {
        if self.is_noop() {
            tracing::debug!("{:?} changes nothing, skipping", self.kind);
            return Ok(EditOutcome::Skipped);
        }

        tracing::info!("Submitting {:?} ({} entries)", self.kind, self.payload.len());
        let graph = backend.edit_graph(&self.payload).await.map_err(|e| {
            tracing::warn!("{:?} failed: {}", self.kind, e);
            e
        })?;

        let full_graph = store.replace_full_graph(graph);
        Ok(EditOutcome::Applied {
            payload: self.payload.clone(),
            full_graph,
        })
    }
}

fn check_reserved(value: &str) -> Result<(), EditError> {
    if value.contains(EDGE_ID_SEPARATOR) {
        return Err(EditError::ReservedSeparator(value.to_string()));
    }
    Ok(())
}

fn node_name(raw: &str) -> Result<&str, EditError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(EditError::EmptyNodeName);
    }
    check_reserved(name)?;
    Ok(name)
}

fn validated_labels(raw: &str) -> Result<Vec<String>, EditError> {
    let labels = parse_labels(raw);
    for label in &labels {
        if label.is_empty() {
            return Err(EditError::EmptyLabel);
        }
        check_reserved(label)?;
    }
    Ok(labels)
}

/// Distinct entries of `left` missing from `right`, in first-seen order
fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    left.iter()
        .filter(|label| !right.contains(label.as_str()) && seen.insert(label.as_str()))
        .cloned()
        .collect()
}

fn deletion_payload<N: AsRef<str>>(
    node_ids: &[N],
    edges: &[EdgeKey],
) -> Result<EditPayload, EditError> {
    let mut payload = EditPayload::new();

    let mut seen = HashSet::new();
    for key in edges.iter().filter(|key| seen.insert(*key)) {
        payload.deleted_edges.extend(key.triples());
    }

    for node in node_ids {
        let node = node.as_ref();
        if node.is_empty() {
            return Err(EditError::EmptyNodeName);
        }
        payload = payload.edit_node(NodeEdit::delete(node));
    }

    Ok(payload)
}
