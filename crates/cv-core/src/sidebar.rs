//! The three fixed sidebar sections and their default order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::Error;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SidebarSection {
  Contact,
  Summary,
  Skills,
}

/// Display order used when a document carries no usable order of its own.
pub const DEFAULT_SIDEBAR_ORDER: [SidebarSection; 3] = [
  SidebarSection::Contact,
  SidebarSection::Summary,
  SidebarSection::Skills,
];

impl SidebarSection {
  pub fn default_order() -> &'static [SidebarSection; 3] {
    &DEFAULT_SIDEBAR_ORDER
  }

  /// Parse a persisted section id; ids are matched exactly.
  pub fn parse(id: &str) -> crate::Result<Self> {
    Self::from_str(id).map_err(|_| Error::UnknownSidebarSection(id.to_string()))
  }
}
