//! Core types and trait definitions for the CV document pipeline.
//!
//! This crate is deliberately free of markup, database and CLI dependencies.
//! Every other crate in the workspace depends on it.

pub mod document;
pub mod error;
pub mod sidebar;
pub mod store;

pub use error::{Error, Result};
