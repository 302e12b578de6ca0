//! Deciding whether a local document has to be pushed to the remote store.

use cv_core::document::CvDocument;
use serde_json::Value;
use tracing::debug;

use crate::{
  canonical::StripKeys,
  fingerprint::{fingerprint, fingerprint_value},
};

/// What to do with the local copy of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPlan {
  /// Both copies fingerprint identically; skip the write.
  InSync,
  /// The remote row exists but differs.
  PushLocal {
    local:  String,
    remote: String,
  },
  /// There is no remote row yet.
  CreateRemote,
}

impl SyncPlan {
  pub fn needs_write(&self) -> bool { !matches!(self, SyncPlan::InSync) }
}

/// Compare the local document against the remote row, if any.
pub fn plan(
  local: &CvDocument,
  remote: Option<&Value>,
  strip: &StripKeys,
) -> SyncPlan {
  let Some(remote) = remote else {
    return SyncPlan::CreateRemote;
  };

  let local = fingerprint(local, strip);
  let remote = fingerprint_value(remote, strip);
  if local == remote {
    debug!(fingerprint = %local, "documents in sync");
    SyncPlan::InSync
  } else {
    debug!(%local, %remote, "documents differ");
    SyncPlan::PushLocal { local, remote }
  }
}
