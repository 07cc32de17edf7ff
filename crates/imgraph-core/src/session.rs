//! Session orchestrator
//!
//! Owns the backend, the store, the chat bridge and the conversation
//! history, and exposes one entry point per user action.

use crate::chat::{ChatAnswer, ChatBridge, ConversationHistory};
use crate::edit::{EditCommand, EditOutcome};
use crate::error::SessionError;
use crate::store::GraphStore;
use imgraph_client::{ChatRequest, GraphBackend, HealthResponse, Segmentation, UploadBatch};
use imgraph_model::Graph;
use parking_lot::Mutex;
use std::sync::Arc;

/// One user's view of the backend graph
pub struct GraphSession {
    backend: Arc<dyn GraphBackend>,
    store: Arc<GraphStore>,
    bridge: ChatBridge,
    history: Mutex<ConversationHistory>,
    segmentation: Segmentation,
}

impl GraphSession {
    /// Create session with a fresh store
    #[must_use]
    pub fn new(backend: Arc<dyn GraphBackend>) -> Self {
        Self::with_store(backend, Arc::new(GraphStore::new()))
    }

    /// Create session around an existing store
    #[must_use]
    pub fn with_store(backend: Arc<dyn GraphBackend>, store: Arc<GraphStore>) -> Self {
        Self {
            backend,
            bridge: ChatBridge::new(Arc::clone(&store)),
            store,
            history: Mutex::new(ConversationHistory::new()),
            segmentation: Segmentation::default(),
        }
    }

    /// Set the segmentation grid used for uploads
    #[inline]
    #[must_use]
    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Graph state
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// Chat bridge, for subgraph subscriptions
    #[inline]
    #[must_use]
    pub fn bridge(&self) -> &ChatBridge {
        &self.bridge
    }

    /// Copy of the conversation so far
    #[must_use]
    pub fn history(&self) -> ConversationHistory {
        self.history.lock().clone()
    }

    /// Start a new conversation
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Fetch the full graph and replace the store's copy
    ///
    /// # Errors
    /// Returns [`SessionError::Backend`] if the query fails
    pub async fn refresh(&self) -> Result<Arc<Graph>, SessionError> {
        let graph = self.backend.full_graph().await?;
        Ok(self.store.replace_full_graph(graph))
    }

    /// Upload images and replace the store's graph with the merged result
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyUpload`] for an empty batch, or
    /// [`SessionError::Backend`] if the upload fails
    pub async fn upload(&self, batch: UploadBatch) -> Result<Arc<Graph>, SessionError> {
        if batch.is_empty() {
            return Err(SessionError::EmptyUpload);
        }

        tracing::info!(
            "Uploading {} image(s) with a {}x{} grid",
            batch.len(),
            self.segmentation.rows,
            self.segmentation.cols
        );
        let request = batch.into_request(self.segmentation);
        let graph = self.backend.upload(&request).await?;
        Ok(self.store.replace_full_graph(graph))
    }

    /// Ask the assistant a question
    ///
    /// History grows by one exchange only when the answer arrives and its
    /// subgraph decodes.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyMessage`] for blank input, otherwise the
    /// backend or decoding failure
    pub async fn ask(
        &self,
        message: &str,
        use_relevant_context: bool,
    ) -> Result<ChatAnswer, SessionError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let request = ChatRequest {
            user_input: message.to_string(),
            conversation_history: self.history.lock().to_vec(),
            use_relevant_context,
        };

        tracing::info!(
            "Asking with {} prior turn(s), relevant context {}",
            request.conversation_history.len(),
            use_relevant_context
        );
        let response = self.backend.chat(&request).await?;
        let answer = self.bridge.on_chat_response(&response)?;

        self.history.lock().record_exchange(message, &answer);
        Ok(answer)
    }

    /// Submit an edit command
    ///
    /// # Errors
    /// Returns [`SessionError::Backend`] if the edit is not confirmed; the
    /// store is left untouched
    pub async fn apply(&self, command: &EditCommand) -> Result<EditOutcome, SessionError> {
        command.submit(self.backend.as_ref(), &self.store).await
    }

    /// Probe the backend
    ///
    /// # Errors
    /// Returns [`SessionError::Backend`] if the backend is unreachable
    pub async fn health(&self) -> Result<HealthResponse, SessionError> {
        Ok(self.backend.health().await?)
    }
}

impl std::fmt::Debug for GraphSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSession")
            .field("store", &self.store)
            .field("segmentation", &self.segmentation)
            .finish_non_exhaustive()
    }
}
