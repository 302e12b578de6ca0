//! Loading and saving documents through a [`DocumentStore`].

use cv_core::{document::CvDocument, store::DocumentStore};
use cv_migrate::migrate;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  canonical::StripKeys,
  fingerprint::{fingerprint, fingerprint_value},
};

/// The result of [`save_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
  /// The stored copy already had the same content; nothing was written.
  Unchanged,
  Written,
}

/// Read and migrate the document stored under `key`.
///
/// A failing read and a value that is not JSON both mean "no document":
/// they are logged and `None` is returned.
pub async fn load_document<S: DocumentStore>(
  store: &S,
  key: &str,
) -> Option<CvDocument> {
  let raw = match store.read(key).await {
    Ok(Some(raw)) => raw,
    Ok(None) => {
      debug!(key, "no stored document");
      return None;
    }
    Err(e) => {
      warn!(key, error = %e, "failed to read stored document");
      return None;
    }
  };

  match serde_json::from_str::<Value>(&raw) {
    Ok(value) => Some(migrate(&value)),
    Err(e) => {
      warn!(key, error = %e, "stored document is not valid JSON");
      None
    }
  }
}

/// Write `doc` under `key` unless the stored copy already fingerprints the
/// same.
pub async fn save_document<S: DocumentStore>(
  store: &S,
  key: &str,
  doc: &CvDocument,
  strip: &StripKeys,
) -> Result<SaveOutcome> {
  let next = fingerprint(doc, strip);

  let current = store
    .read(key)
    .await
    .map_err(Error::store)?
    .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
    .map(|value| fingerprint_value(&value, strip));

  if current.as_deref() == Some(next.as_str()) {
    debug!(key, fingerprint = %next, "document unchanged, skipping write");
    return Ok(SaveOutcome::Unchanged);
  }

  let json = doc.to_json_string()?;
  store.write(key, &json).await.map_err(Error::store)?;
  info!(key, fingerprint = %next, "document written");
  Ok(SaveOutcome::Written)
}
