//! Error types for `cv-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown sidebar section: {0:?}")]
  UnknownSidebarSection(String),

  #[error("unknown contact kind: {0:?}")]
  UnknownContactKind(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
