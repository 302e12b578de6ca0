//! Integration tests for `SqliteStore` against an in-memory database.

use cv_core::store::DocumentStore;
use cv_sync::{SaveOutcome, StripKeys, load_document, save_document};
use serde_json::json;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Raw key-value operations ────────────────────────────────────────────────

#[tokio::test]
async fn read_missing_key_returns_none() {
  let s = store().await;
  assert_eq!(s.read("cv").await.unwrap(), None);
  assert_eq!(s.updated_at("cv").await.unwrap(), None);
}

#[tokio::test]
async fn write_then_read() {
  let s = store().await;
  s.write("cv", "{\"summary\":\"x\"}").await.unwrap();
  assert_eq!(
    s.read("cv").await.unwrap().as_deref(),
    Some("{\"summary\":\"x\"}")
  );
  assert!(s.updated_at("cv").await.unwrap().is_some());
}

#[tokio::test]
async fn write_replaces_previous_value() {
  let s = store().await;
  s.write("cv", "first").await.unwrap();
  let first_at = s.updated_at("cv").await.unwrap().unwrap();
  s.write("cv", "second").await.unwrap();

  assert_eq!(s.read("cv").await.unwrap().as_deref(), Some("second"));
  assert_eq!(s.keys().await.unwrap(), vec!["cv".to_string()]);
  assert!(s.updated_at("cv").await.unwrap().unwrap() >= first_at);
}

#[tokio::test]
async fn values_are_stored_verbatim() {
  let s = store().await;
  s.write("broken", "{not json").await.unwrap();
  assert_eq!(s.read("broken").await.unwrap().as_deref(), Some("{not json"));
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
  let s = store().await;
  s.write("cv", "x").await.unwrap();
  assert!(s.delete("cv").await.unwrap());
  assert!(!s.delete("cv").await.unwrap());
  assert_eq!(s.read("cv").await.unwrap(), None);
}

#[tokio::test]
async fn keys_are_sorted() {
  let s = store().await;
  for key in ["drafts/b", "cv", "drafts/a"] {
    s.write(key, "{}").await.unwrap();
  }
  assert_eq!(s.keys().await.unwrap(), vec![
    "cv".to_string(),
    "drafts/a".to_string(),
    "drafts/b".to_string(),
  ]);
}

// ─── Document workflow ───────────────────────────────────────────────────────

#[tokio::test]
async fn legacy_document_round_trips_through_the_store() {
  let s = store().await;
  let legacy = json!({
    "personalInfo": {
      "fullName": "Katherine Johnson",
      "contacts": [{"type": "email", "value": "kj@example.com"}],
    },
    "experiences": [{
      "company": "NASA",
      "description": [{"text": "Trajectories", "type": "bullet"}],
    }],
  });
  s.write("cv", &legacy.to_string()).await.unwrap();

  let doc = load_document(&s, "cv").await.unwrap();
  assert_eq!(doc.personal_info.email, "kj@example.com");
  assert_eq!(
    doc.experiences[0].description,
    "<ul><li><p>Trajectories</p></li></ul>"
  );

  let strip = StripKeys::default();
  assert_eq!(
    save_document(&s, "cv", &doc, &strip).await.unwrap(),
    SaveOutcome::Written
  );
  assert_eq!(
    save_document(&s, "cv", &doc, &strip).await.unwrap(),
    SaveOutcome::Unchanged
  );

  let reloaded = load_document(&s, "cv").await.unwrap();
  assert_eq!(reloaded, doc);
  assert_eq!(reloaded, cv_migrate::migrate(&doc.to_json().unwrap()));
}
