//! Schema migration for stored CV documents.
//!
//! Stored résumés have gone through many shapes: flat and list-based
//! contacts, markdown-bold and bullet-array descriptions, missing or corrupt
//! sidebar orders. [`migrate`] accepts any JSON value and always returns a
//! fully-populated [`CvDocument`](cv_core::document::CvDocument).
//!
//! Decoding is two-phase. [`decode`] turns the raw value into typed,
//! permissive shapes that record what was found without ever failing; the
//! migrator then maps those shapes onto the canonical document.

mod decode;
mod migrate;

pub use decode::LegacyContact;
pub use migrate::{
  migrate, migrate_contacts, migrate_rich_text, migrate_sidebar_order,
};
