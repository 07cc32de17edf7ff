//! Graph state store
//!
//! Holds the full graph, the chat-relevant subgraph and the view policy.
//! Every field has its own `watch` channel:
//! - full graph: published on every replacement
//! - relevant subgraph: published when set, and when a replacement clears it
//! - active view: published only when the selected graph actually changes
//!
//! Replacing the full graph always clears the relevant subgraph.

use imgraph_model::Graph;
use imgraph_render::{convert, RenderGraph};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

/// Which graph the active view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSource {
    /// The complete graph
    Full,
    /// The subgraph returned with the last chat answer
    Relevant,
}

/// Currently selected graph
#[derive(Debug, Clone)]
pub struct ActiveView {
    /// Where the graph comes from
    pub source: ViewSource,
    /// Selected graph
    pub graph: Arc<Graph>,
}

impl ActiveView {
    /// Same source and the very same graph instance
    #[inline]
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.source == other.source && Arc::ptr_eq(&self.graph, &other.graph)
    }

    /// Render model of the selected graph
    #[must_use]
    pub fn render(&self) -> RenderGraph {
        convert(&self.graph)
    }
}

/// View selection policy
///
/// The relevant subgraph wins only when it is preferred and non-empty.
#[must_use]
pub fn select_view(full: &Arc<Graph>, relevant: &Arc<Graph>, prefer_relevant: bool) -> ActiveView {
    if prefer_relevant && !relevant.is_empty() {
        ActiveView {
            source: ViewSource::Relevant,
            graph: Arc::clone(relevant),
        }
    } else {
        ActiveView {
            source: ViewSource::Full,
            graph: Arc::clone(full),
        }
    }
}

/// Point-in-time copy of the store state
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// Full graph
    pub full: Arc<Graph>,
    /// Relevant subgraph
    pub relevant: Arc<Graph>,
    /// View preference
    pub prefer_relevant: bool,
    /// Source of the active view
    pub active: ViewSource,
    /// A full graph has been received
    pub loaded: bool,
}

#[derive(Debug)]
struct StoreState {
    full: Arc<Graph>,
    relevant: Arc<Graph>,
    prefer_relevant: bool,
    loaded: bool,
}

/// Client-side graph state
///
/// Shared as `Arc<GraphStore>`. The lock is never held across an await.
#[derive(Debug)]
pub struct GraphStore {
    state: RwLock<StoreState>,
    full_tx: watch::Sender<Arc<Graph>>,
    relevant_tx: watch::Sender<Arc<Graph>>,
    view_tx: watch::Sender<ActiveView>,
}

impl GraphStore {
    /// Create empty store preferring the relevant subgraph
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefer_relevant(true)
    }

    /// Create empty store with the given view preference
    #[must_use]
    pub fn with_prefer_relevant(prefer_relevant: bool) -> Self {
        let full = Arc::new(Graph::new());
        let relevant = Arc::new(Graph::new());
        let view = select_view(&full, &relevant, prefer_relevant);

        let (full_tx, _) = watch::channel(Arc::clone(&full));
        let (relevant_tx, _) = watch::channel(Arc::clone(&relevant));
        let (view_tx, _) = watch::channel(view);

        Self {
            state: RwLock::new(StoreState {
                full,
                relevant,
                prefer_relevant,
                loaded: false,
            }),
            full_tx,
            relevant_tx,
            view_tx,
        }
    }

    /// Current full graph
    #[must_use]
    pub fn current_full_graph(&self) -> Arc<Graph> {
        Arc::clone(&self.state.read().full)
    }

    /// Current relevant subgraph, empty if none
    #[must_use]
    pub fn current_relevant_subgraph(&self) -> Arc<Graph> {
        Arc::clone(&self.state.read().relevant)
    }

    /// Replace the full graph and clear the relevant subgraph
    pub fn replace_full_graph(&self, graph: Graph) -> Arc<Graph> {
        let graph = Arc::new(graph);
        let mut state = self.state.write();

        state.full = Arc::clone(&graph);
        state.loaded = true;
        self.full_tx.send_replace(Arc::clone(&graph));

        if !state.relevant.is_empty() {
            tracing::debug!("Full graph replaced, clearing relevant subgraph");
            state.relevant = Arc::new(Graph::new());
            self.relevant_tx.send_replace(Arc::clone(&state.relevant));
        }

        tracing::info!(
            "Full graph: {} nodes, {} relationships",
            graph.node_count(),
            graph.relationship_count()
        );
        self.publish_view(&state);
        graph
    }

    /// Set the relevant subgraph; an empty graph clears it
    pub fn set_relevant_subgraph(&self, graph: Graph) -> Arc<Graph> {
        let graph = Arc::new(graph);
        let mut state = self.state.write();

        state.relevant = Arc::clone(&graph);
        self.relevant_tx.send_replace(Arc::clone(&graph));

        tracing::debug!("Relevant subgraph: {} nodes", graph.node_count());
        self.publish_view(&state);
        graph
    }

    /// Clear the relevant subgraph
    pub fn clear_relevant_subgraph(&self) {
        let mut state = self.state.write();
        if state.relevant.is_empty() {
            return;
        }
        state.relevant = Arc::new(Graph::new());
        self.relevant_tx.send_replace(Arc::clone(&state.relevant));
        self.publish_view(&state);
    }

    /// Choose whether the relevant subgraph should be shown when present
    pub fn set_prefer_relevant(&self, prefer: bool) {
        let mut state = self.state.write();
        state.prefer_relevant = prefer;
        self.publish_view(&state);
    }

    /// Current view preference
    #[must_use]
    pub fn prefer_relevant(&self) -> bool {
        self.state.read().prefer_relevant
    }

    /// Currently selected graph
    #[must_use]
    pub fn active_view(&self) -> ActiveView {
        let state = self.state.read();
        select_view(&state.full, &state.relevant, state.prefer_relevant)
    }

    /// Render model of the active view
    #[must_use]
    pub fn active_render(&self) -> RenderGraph {
        self.active_view().render()
    }

    /// A full graph has been received at least once
    #[must_use]
    pub fn has_loaded(&self) -> bool {
        self.state.read().loaded
    }

    /// Consistent copy of all fields
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        let view = select_view(&state.full, &state.relevant, state.prefer_relevant);
        StoreSnapshot {
            full: Arc::clone(&state.full),
            relevant: Arc::clone(&state.relevant),
            prefer_relevant: state.prefer_relevant,
            active: view.source,
            loaded: state.loaded,
        }
    }

    /// Full graph changes
    #[must_use]
    pub fn subscribe_full_graph(&self) -> watch::Receiver<Arc<Graph>> {
        self.full_tx.subscribe()
    }

    /// Relevant subgraph changes
    #[must_use]
    pub fn subscribe_relevant_subgraph(&self) -> watch::Receiver<Arc<Graph>> {
        self.relevant_tx.subscribe()
    }

    /// Active view changes
    #[must_use]
    pub fn subscribe_active_view(&self) -> watch::Receiver<ActiveView> {
        self.view_tx.subscribe()
    }

    // Called with the write lock held so views are published in state order.
    fn publish_view(&self, state: &StoreState) {
        let next = select_view(&state.full, &state.relevant, state.prefer_relevant);
        let changed = self.view_tx.send_if_modified(|current| {
            if current.same_as(&next) {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            tracing::debug!("Active view changed");
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
