//! Chat-context bridge
//!
//! Feeds the subgraph returned with each chat answer into the store and
//! multicasts it to subscribers. Subscriptions are unbounded and carry no
//! replay: a subscriber only sees subgraphs published after it subscribed.
//!
//! The store update and the publish happen under the subscriber lock, so
//! concurrent chat responses reach every subscriber in the order they were
//! written to the store. Lock order is subscribers then store; the store
//! never calls back here.

use crate::error::SessionError;
use crate::store::GraphStore;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use imgraph_client::{ChatResponse, ChatTurn};
use imgraph_model::{display_source_name, Graph};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// Chat answer ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    /// Answer text (markdown)
    pub text: String,
    /// Source image names with the hash suffix stripped
    pub sources: Vec<String>,
    /// Source image names as returned by the backend
    pub image_names: Vec<String>,
}

impl ChatAnswer {
    /// Build from a backend response
    #[must_use]
    pub fn from_response(response: &ChatResponse) -> Self {
        Self {
            text: response.response.clone(),
            sources: response
                .image_names
                .iter()
                .map(|name| display_source_name(name).to_string())
                .collect(),
            image_names: response.image_names.clone(),
        }
    }

    /// Content of the assistant turn recorded in conversation history
    #[must_use]
    pub fn history_content(&self) -> String {
        json!({
            "text": self.text,
            "imageSources": self.image_names,
        })
        .to_string()
    }
}

/// Turns sent along with each chat query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<ChatTurn>,
}

impl ConversationHistory {
    /// Create empty history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange: the user turn, then the assistant turn
    pub fn record_exchange(&mut self, user_input: &str, answer: &ChatAnswer) {
        self.turns.push(ChatTurn::user(user_input));
        self.turns.push(ChatTurn::assistant(answer.history_content()));
    }

    /// Turns, oldest first
    #[inline]
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Copy of the turns for a request body
    #[inline]
    #[must_use]
    pub fn to_vec(&self) -> Vec<ChatTurn> {
        self.turns.clone()
    }

    /// Number of turns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// No turns yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Forget every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Routes chat subgraphs into the store and to subscribers
#[derive(Debug)]
pub struct ChatBridge {
    store: Arc<GraphStore>,
    subscribers: Mutex<Vec<UnboundedSender<Arc<Graph>>>>,
}

impl ChatBridge {
    /// Create bridge feeding `store`
    #[must_use]
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self {
            store,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Store this bridge feeds
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// Handle a chat response
    ///
    /// Decodes the relevant subgraph, sets it on the store and publishes it.
    /// A `null` subgraph counts as empty.
    ///
    /// # Errors
    /// Returns [`SessionError::MalformedSubgraph`] if the subgraph does not
    /// decode; the store is left untouched
    pub fn on_chat_response(&self, response: &ChatResponse) -> Result<ChatAnswer, SessionError> {
        let subgraph = decode_subgraph(&response.relevant_subgraph)?;
        let mut subscribers = self.subscribers.lock();
        let subgraph = self.store.set_relevant_subgraph(subgraph);
        publish(&mut subscribers, &subgraph);
        Ok(ChatAnswer::from_response(response))
    }

    /// Stream of relevant subgraphs published from now on
    #[must_use]
    pub fn subscribe_relevant_subgraph(&self) -> UnboundedReceiver<Arc<Graph>> {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Number of live subscribers as of the last publish
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

fn publish(subscribers: &mut Vec<UnboundedSender<Arc<Graph>>>, subgraph: &Arc<Graph>) {
    subscribers.retain(|tx| tx.unbounded_send(Arc::clone(subgraph)).is_ok());
    tracing::debug!("Published relevant subgraph to {} subscriber(s)", subscribers.len());
}

fn decode_subgraph(value: &Value) -> Result<Graph, SessionError> {
    if value.is_null() {
        return Ok(Graph::new());
    }
    Graph::from_value(value.clone()).map_err(|e| {
        tracing::error!("Relevant subgraph did not decode: {}", e);
        SessionError::MalformedSubgraph(e)
    })
}
