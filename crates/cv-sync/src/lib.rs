//! Content fingerprints and the skip-unchanged-writes sync workflow.
//!
//! Local and remote copies of a document disagree on ids and on whether an
//! unset field is `null`, missing or `""`. [`fingerprint`] hides both
//! differences so callers can tell when a write would change nothing.

mod canonical;
mod fingerprint;
mod plan;
mod workflow;

pub mod error;

pub use canonical::{ABSENT, DEFAULT_STRIP_KEYS, StripKeys, canonicalize};
pub use error::{Error, Result};
pub use fingerprint::{fingerprint, fingerprint_value};
pub use plan::{SyncPlan, plan};
pub use workflow::{SaveOutcome, load_document, save_document};

#[cfg(test)]
mod tests;
