//! End-to-end tests for the orchestrating render service, exercised
//! through the legacy template path with in-memory collaborators.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{build_render_service, render_request};
use sar_client::{DocumentStore, MemoryDocumentStore};
use sar_core::error::CoreError;

// ---------------------------------------------------------------------------
// Test: a successful render persists the HTML and the raw payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn renders_and_persists_html_and_json() {
    let store = Arc::new(MemoryDocumentStore::new());
    let data = json!({"title": "Key worker sessions", "notes": "Weekly entries"});
    let service = build_render_service(Some(data.clone()), HashMap::new(), Arc::clone(&store));

    let id = Uuid::new_v4();
    let outcome = service.render(&render_request(Some(id))).await.unwrap();

    assert_eq!(outcome.document_key, format!("{id}/keyworker-api.html"));
    assert_eq!(outcome.template_version.as_deref(), Some("legacy"));
    assert!(!outcome.already_rendered);

    let html = store.get(&outcome.document_key).await.unwrap().unwrap();
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("<h2>Key worker sessions</h2>"));
    assert!(html.contains("Weekly entries"));

    let payload = store
        .get(&format!("{id}/keyworker-api.json"))
        .await
        .unwrap()
        .unwrap();
    let payload: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(payload, data);
}

// ---------------------------------------------------------------------------
// Test: rendering is idempotent per (request id, service)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_render_for_same_request_is_skipped() {
    let store = Arc::new(MemoryDocumentStore::new());
    let service =
        build_render_service(Some(json!({"title": "t"})), HashMap::new(), Arc::clone(&store));

    let request = render_request(Some(Uuid::new_v4()));
    let first = service.render(&request).await.unwrap();
    assert!(!first.already_rendered);
    let objects_after_first = store.len().await;

    let second = service.render(&request).await.unwrap();
    assert!(second.already_rendered);
    assert_eq!(second.document_key, first.document_key);
    assert_eq!(second.template_version, None);
    assert_eq!(store.len().await, objects_after_first);
}

// ---------------------------------------------------------------------------
// Test: no subject data still produces a document
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_subject_data_persists_fallback_html_and_null_json() {
    let store = Arc::new(MemoryDocumentStore::new());
    let service = build_render_service(None, HashMap::new(), Arc::clone(&store));

    let id = Uuid::new_v4();
    let outcome = service.render(&render_request(Some(id))).await.unwrap();
    assert_eq!(outcome.template_version.as_deref(), Some("legacy"));

    let html = store.get(&outcome.document_key).await.unwrap().unwrap();
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("No data held"));
    assert!(html.contains("Keyworker"));

    let payload = store
        .get(&format!("{id}/keyworker-api.json"))
        .await
        .unwrap()
        .unwrap();
    let payload: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(payload, Value::Null);
}

// ---------------------------------------------------------------------------
// Test: attachments referenced by the payload are persisted alongside
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attachments_are_fetched_and_persisted_in_order() {
    let store = Arc::new(MemoryDocumentStore::new());
    let data = json!({
        "title": "t",
        "attachments": [
            {
                "filename": "photo.jpg",
                "contentType": "image/jpeg",
                "url": "https://keyworker-api.example/files/1"
            },
            {
                "filename": "note.pdf",
                "contentType": "application/pdf",
                "url": "https://keyworker-api.example/files/2"
            }
        ]
    });
    let attachments = HashMap::from([
        (
            "https://keyworker-api.example/files/1".to_string(),
            b"jpeg-bytes".to_vec(),
        ),
        (
            "https://keyworker-api.example/files/2".to_string(),
            b"pdf-bytes".to_vec(),
        ),
    ]);
    let service = build_render_service(Some(data), attachments, Arc::clone(&store));

    let id = Uuid::new_v4();
    service.render(&render_request(Some(id))).await.unwrap();

    let first = store
        .get(&format!("{id}/keyworker-api/attachments/1-photo.jpg"))
        .await
        .unwrap();
    assert_eq!(first.as_deref(), Some(b"jpeg-bytes".as_slice()));

    let second = store
        .get(&format!("{id}/keyworker-api/attachments/2-note.pdf"))
        .await
        .unwrap();
    assert_eq!(second.as_deref(), Some(b"pdf-bytes".as_slice()));
}

// ---------------------------------------------------------------------------
// Test: malformed payloads fail before anything is written
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_attachments_list_is_rejected_before_any_write() {
    let store = Arc::new(MemoryDocumentStore::new());
    let data = json!({"title": "t", "attachments": [{"filename": 42}]});
    let service = build_render_service(Some(data), HashMap::new(), Arc::clone(&store));

    let err = service
        .render(&render_request(Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn missing_request_id_is_rejected() {
    let store = Arc::new(MemoryDocumentStore::new());
    let service =
        build_render_service(Some(json!({"title": "t"})), HashMap::new(), Arc::clone(&store));

    let err = service.render(&render_request(None)).await.unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
    assert!(store.is_empty().await);
}
