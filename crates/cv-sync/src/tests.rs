//! Load/save workflow tests against in-memory stores.

use std::{collections::BTreeMap, sync::Mutex};

use cv_core::{document::CvDocument, store::DocumentStore};
use serde_json::json;

use crate::{SaveOutcome, StripKeys, load_document, save_document};

#[derive(Default)]
struct MemoryStore {
  values: Mutex<BTreeMap<String, String>>,
  writes: Mutex<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("store offline")]
struct Offline;

impl MemoryStore {
  fn with(key: &str, value: &str) -> Self {
    let store = Self::default();
    store
      .values
      .lock()
      .unwrap()
      .insert(key.to_string(), value.to_string());
    store
  }

  fn writes(&self) -> usize { *self.writes.lock().unwrap() }
}

impl DocumentStore for MemoryStore {
  type Error = Offline;

  async fn read(&self, key: &str) -> Result<Option<String>, Offline> {
    Ok(self.values.lock().unwrap().get(key).cloned())
  }

  async fn write(&self, key: &str, value: &str) -> Result<(), Offline> {
    *self.writes.lock().unwrap() += 1;
    self
      .values
      .lock()
      .unwrap()
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<bool, Offline> {
    Ok(self.values.lock().unwrap().remove(key).is_some())
  }

  async fn keys(&self) -> Result<Vec<String>, Offline> {
    Ok(self.values.lock().unwrap().keys().cloned().collect())
  }
}

/// A store whose every operation fails.
struct BrokenStore;

impl DocumentStore for BrokenStore {
  type Error = Offline;

  async fn read(&self, _key: &str) -> Result<Option<String>, Offline> {
    Err(Offline)
  }

  async fn write(&self, _key: &str, _value: &str) -> Result<(), Offline> {
    Err(Offline)
  }

  async fn delete(&self, _key: &str) -> Result<bool, Offline> { Err(Offline) }

  async fn keys(&self) -> Result<Vec<String>, Offline> { Err(Offline) }
}

fn sample() -> CvDocument {
  let mut doc = CvDocument::default();
  doc.personal_info.full_name = "Alan Turing".into();
  doc.summary = "<p>Computable numbers</p>".into();
  doc
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_missing_key_is_none() {
  let store = MemoryStore::default();
  assert!(load_document(&store, "cv").await.is_none());
}

#[tokio::test]
async fn load_malformed_json_is_none() {
  let store = MemoryStore::with("cv", "{not json");
  assert!(load_document(&store, "cv").await.is_none());
}

#[tokio::test]
async fn load_read_failure_is_none() {
  assert!(load_document(&BrokenStore, "cv").await.is_none());
}

#[tokio::test]
async fn load_migrates_legacy_shapes() {
  let legacy = json!({
    "personalInfo": {"fullName": "Alan Turing"},
    "summary": "**Computable** numbers",
    "sidebarOrder": ["skills"],
  });
  let store = MemoryStore::with("cv", &legacy.to_string());

  let doc = load_document(&store, "cv").await.unwrap();
  assert_eq!(doc.personal_info.full_name, "Alan Turing");
  assert_eq!(doc.summary, "<strong>Computable</strong> numbers");
  assert_eq!(doc.sidebar_order.len(), 3);
}

// ─── Saving ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_writes_then_skips_identical_content() {
  let store = MemoryStore::default();
  let strip = StripKeys::default();
  let doc = sample();

  assert_eq!(
    save_document(&store, "cv", &doc, &strip).await.unwrap(),
    SaveOutcome::Written
  );
  assert_eq!(
    save_document(&store, "cv", &doc, &strip).await.unwrap(),
    SaveOutcome::Unchanged
  );
  assert_eq!(store.writes(), 1);

  let loaded = load_document(&store, "cv").await.unwrap();
  assert_eq!(loaded, doc);
}

#[tokio::test]
async fn save_ignores_representation_differences() {
  let stored = json!({
    "id": "remote-row",
    "personalInfo": {"fullName": "Alan Turing", "email": null},
    "summary": "<p>Computable numbers</p>",
    "experiences": [],
    "education": [],
    "skills": [],
    "courses": [],
    "certifications": [],
    "awards": [],
    "visibility": {
      "photo": true, "summary": true, "experiences": true, "education": true,
      "skills": true, "courses": true, "certifications": true, "awards": true,
    },
    "sidebarOrder": ["contact", "summary", "skills"],
  });
  let store = MemoryStore::with("cv", &stored.to_string());

  let outcome = save_document(&store, "cv", &sample(), &StripKeys::default())
    .await
    .unwrap();
  assert_eq!(outcome, SaveOutcome::Unchanged);
  assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn save_overwrites_changed_and_malformed_copies() {
  let strip = StripKeys::default();

  let store = MemoryStore::with("cv", "garbage");
  assert_eq!(
    save_document(&store, "cv", &sample(), &strip).await.unwrap(),
    SaveOutcome::Written
  );

  let mut edited = sample();
  edited.summary = "<p>On computable numbers</p>".into();
  assert_eq!(
    save_document(&store, "cv", &edited, &strip).await.unwrap(),
    SaveOutcome::Written
  );
  assert_eq!(store.writes(), 2);
}

#[tokio::test]
async fn save_propagates_store_errors() {
  let result =
    save_document(&BrokenStore, "cv", &sample(), &StripKeys::default()).await;
  assert!(matches!(result, Err(crate::Error::Store(_))));
}
