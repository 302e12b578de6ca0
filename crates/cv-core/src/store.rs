//! The `DocumentStore` trait, the persistence boundary.
//!
//! A store holds raw strings under string keys and knows nothing about the
//! document shape. Decoding and migration happen one layer up, so a store
//! never rejects a value for being malformed.

use std::future::Future;

/// Abstraction over a key-value persistence backend (e.g.
/// `cv-store-sqlite`).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the raw value stored under `key`, or `None` when absent.
  fn read(
    &self,
    key: &str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  /// Store `value` under `key`, replacing any previous value.
  fn write(
    &self,
    key: &str,
    value: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Remove `key`. Returns `true` if a value was removed.
  fn delete(
    &self,
    key: &str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// All keys currently present, in lexicographic order.
  fn keys(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}
