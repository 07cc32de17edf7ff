//! GraphSession Tests
//!
//! Drives a session against a scripted backend and checks how store state
//! and conversation history follow confirmed and failed operations.

use imgraph_client::{UploadBatch, UploadImage};
use imgraph_core::prelude::*;
use imgraph_core::StoreSnapshot;
use imgraph_model::{EdgeEdit, NodeEdit};
use imgraph_test_utils::{
    chat_response, decode_failure, rejection, sample_graph, single_node_graph, transport_failure,
    Call, ScriptedBackend,
};
use pretty_assertions::assert_eq;

fn session(backend: &Arc<ScriptedBackend>) -> GraphSession {
    GraphSession::new(Arc::clone(backend) as Arc<dyn GraphBackend>)
}

fn assert_same_state(before: &StoreSnapshot, after: &StoreSnapshot) {
    assert!(Arc::ptr_eq(&before.full, &after.full));
    assert!(Arc::ptr_eq(&before.relevant, &after.relevant));
    assert_eq!(before.active, after.active);
}

#[tokio::test]
async fn test_refresh_loads_full_graph() {
    let backend = Arc::new(ScriptedBackend::new().with_graph(sample_graph()));
    let session = session(&backend);

    assert!(!session.store().has_loaded());
    session.refresh().await.unwrap();

    assert!(session.store().has_loaded());
    assert_eq!(session.store().current_full_graph().node_count(), 3);
    assert_eq!(backend.calls(), [Call::FullGraph]);
}

#[tokio::test]
async fn test_confirmed_edit_replaces_graph_and_clears_relevant() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_chat(chat_response("answer", &[], &single_node_graph("A")))
            .with_graph(single_node_graph("Edited")),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();
    session.ask("what is A?", true).await.unwrap();
    assert_eq!(session.store().active_view().source, ViewSource::Relevant);

    let outcome = session
        .apply(&EditCommand::add_node("Edited").unwrap())
        .await
        .unwrap();

    assert!(outcome.is_applied());
    assert!(session.store().current_full_graph().contains_node("Edited"));
    assert!(session.store().current_relevant_subgraph().is_empty());
    assert_eq!(session.store().active_view().source, ViewSource::Full);
}

#[tokio::test]
async fn test_rejected_edit_leaves_store_untouched() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_chat(chat_response("answer", &[], &single_node_graph("A")))
            .with_graph_error(rejection("/editgraph")),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();
    session.ask("what is A?", true).await.unwrap();
    let before = session.store().snapshot();

    let err = session
        .apply(&EditCommand::delete_edge(&EdgeKey::new(
            "A",
            "B",
            vec!["knows".into(), "likes".into()],
        )))
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    assert_same_state(&before, &session.store().snapshot());
}

#[tokio::test]
async fn test_malformed_edit_response_leaves_store_untouched() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_chat(chat_response("answer", &[], &single_node_graph("A")))
            .with_graph_error(decode_failure("/editgraph")),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();
    session.ask("what is A?", true).await.unwrap();
    let before = session.store().snapshot();

    let err = session
        .apply(&EditCommand::add_node("Gate").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Backend(ref e) if e.is_decode()));
    assert!(!err.is_local());
    assert_eq!(backend.edit_payloads().len(), 1);
    assert_same_state(&before, &session.store().snapshot());
}

#[tokio::test]
async fn test_transport_failure_leaves_store_untouched() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_graph_error(transport_failure("/editgraph")),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();
    let before = session.store().snapshot();

    let err = session
        .apply(&EditCommand::rename_node("A", "Alpha").unwrap())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_same_state(&before, &session.store().snapshot());
}

#[tokio::test]
async fn test_noop_edge_edit_sends_nothing() {
    let backend = Arc::new(ScriptedBackend::new().with_graph(sample_graph()));
    let session = session(&backend);
    session.refresh().await.unwrap();

    let render = session.store().active_render();
    let key = render.resolve_edge(&render.edges[0].id).unwrap();
    let outcome = session
        .apply(&EditCommand::edit_edge(&key, "likes, knows").unwrap())
        .await
        .unwrap();

    assert!(!outcome.is_applied());
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_edge_edit_payload_from_render_id() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_graph(sample_graph()),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();

    let render = session.store().active_render();
    let key = render.resolve_edge("A#$#B#$#knows, likes").unwrap();
    session
        .apply(&EditCommand::edit_edge(&key, "likes, trusts").unwrap())
        .await
        .unwrap();

    let payloads = backend.edit_payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].added_edges, [EdgeEdit::new("A", "B", "trusts")]);
    assert_eq!(payloads[0].deleted_edges, [EdgeEdit::new("A", "B", "knows")]);
}

#[tokio::test]
async fn test_delete_node_uses_incident_edges() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_graph(single_node_graph("C")),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();

    let render = session.store().active_render();
    let command = EditCommand::delete_node("B", &render.incident_edge_keys("B")).unwrap();
    session.apply(&command).await.unwrap();

    let payload = &backend.edit_payloads()[0];
    assert_eq!(
        payload.deleted_edges,
        [
            EdgeEdit::new("A", "B", "knows"),
            EdgeEdit::new("A", "B", "likes"),
            EdgeEdit::new("B", "C", "calls"),
        ]
    );
    assert_eq!(payload.edited_nodes, [NodeEdit::delete("B")]);
}

#[tokio::test]
async fn test_delete_edge_with_comma_in_label() {
    let graph = Graph::new()
        .with_node(GraphNode::new("Check"))
        .with_node(GraphNode::new("Done"))
        .with_relationship(GraphRelationship::new("Check", "Done", "if yes, continue"));
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(graph)
            .with_graph(single_node_graph("Check")),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();

    let render = session.store().active_render();
    let key = render.resolve_edge(&render.edges[0].id).unwrap();
    session.apply(&EditCommand::delete_edge(&key)).await.unwrap();

    assert_eq!(
        backend.edit_payloads()[0].deleted_edges,
        [EdgeEdit::new("Check", "Done", "if yes, continue")]
    );
}

#[tokio::test]
async fn test_history_grows_only_on_success() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_chat_error(transport_failure("/query"))
            .with_chat(chat_response(
                "B is a cat",
                &["cat.png-0a1b2c3d"],
                &single_node_graph("B"),
            )),
    );
    let session = session(&backend);

    assert!(session.ask("what is B?", true).await.unwrap_err().is_transport());
    assert!(session.history().is_empty());

    let answer = session.ask("  what is B?  ", false).await.unwrap();
    assert_eq!(answer.sources, ["cat.png"]);
    assert_eq!(session.history().len(), 2);

    let requests = backend.chat_requests();
    assert_eq!(requests[1].user_input, "what is B?");
    assert!(!requests[1].use_relevant_context);
    assert!(requests[1].conversation_history.is_empty());
}

#[tokio::test]
async fn test_history_is_sent_with_next_query() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_chat(chat_response("first", &[], &Graph::new()))
            .with_chat(chat_response("second", &[], &Graph::new())),
    );
    let session = session(&backend);

    session.ask("one", true).await.unwrap();
    session.ask("two", true).await.unwrap();

    let history = &backend.chat_requests()[1].conversation_history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "one");
}

#[tokio::test]
async fn test_empty_message_is_rejected_locally() {
    let backend = Arc::new(ScriptedBackend::new());
    let session = session(&backend);

    let err = session.ask("   ", true).await.unwrap_err();
    assert!(matches!(err, SessionError::EmptyMessage));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_upload_replaces_graph() {
    let backend = Arc::new(ScriptedBackend::new().with_graph(sample_graph()));
    let session = session(&backend);
    session.store().set_relevant_subgraph(single_node_graph("stale"));

    let batch = UploadBatch::new().with_image(UploadImage::from_bytes("street.png", b"bytes"));
    session.upload(batch).await.unwrap();

    assert_eq!(session.store().current_full_graph().node_count(), 3);
    assert!(session.store().current_relevant_subgraph().is_empty());
    match &backend.calls()[0] {
        Call::Upload(request) => {
            assert_eq!(request.image_name_array.len(), 1);
            assert!(request.image_name_array[0].starts_with("street.png-"));
            assert_eq!((request.rows, request.cols, request.overlap), (2, 2, 50));
        }
        other => panic!("expected upload, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_upload_is_rejected_locally() {
    let backend = Arc::new(ScriptedBackend::new());
    let session = session(&backend);

    let err = session.upload(UploadBatch::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::EmptyUpload));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_chat_subgraph_reaches_subscribers() {
    use futures::StreamExt;

    let backend = Arc::new(
        ScriptedBackend::new().with_chat(chat_response("ok", &[], &single_node_graph("X"))),
    );
    let session = session(&backend);
    let mut subgraphs = session.bridge().subscribe_relevant_subgraph();

    session.ask("show X", true).await.unwrap();
    assert!(subgraphs.next().await.unwrap().contains_node("X"));
}

#[tokio::test]
async fn test_view_preference_selects_graph() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_graph(sample_graph())
            .with_chat(chat_response("ok", &[], &single_node_graph("X"))),
    );
    let session = session(&backend);
    session.refresh().await.unwrap();
    session.ask("show X", true).await.unwrap();

    session.store().set_prefer_relevant(false);
    assert_eq!(session.store().active_render().nodes.len(), 3);

    session.store().set_prefer_relevant(true);
    let render = session.store().active_render();
    assert_eq!(render.nodes.len(), 1);
    assert!(render.node("X").is_some());
}

#[tokio::test]
async fn test_health() {
    let backend = Arc::new(ScriptedBackend::new());
    assert!(session(&backend).health().await.unwrap().is_ok());
}
