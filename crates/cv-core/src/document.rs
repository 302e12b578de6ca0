//! The canonical CV document: the shape every persisted résumé is migrated
//! into before anything else reads it.
//!
//! Every collection is always present (possibly empty) and every scalar is a
//! plain string, so consumers never have to distinguish "missing" from
//! "empty". Collections are ordered; the order is the display/print order.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Result, sidebar::SidebarSection};

// ─── Personal info ───────────────────────────────────────────────────────────

/// A flat contact field that used to live in the legacy `contacts` list.
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
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactKind {
  Email,
  Phone,
  Location,
  Linkedin,
  Website,
}

/// Identity and contact block shown at the top of the CV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
  pub full_name: String,
  pub title:     String,
  pub email:     String,
  pub phone:     String,
  pub location:  String,
  pub linkedin:  String,
  pub website:   String,
  /// Either a `data:` URI held only locally, or a persisted remote URL.
  pub photo:     Option<String>,
}

impl ContactKind {
  /// Parse a legacy `contacts[].type` value; case and surrounding
  /// whitespace are ignored.
  pub fn parse(raw: &str) -> Result<Self> {
    raw
      .trim()
      .to_ascii_lowercase()
      .parse()
      .map_err(|_| crate::Error::UnknownContactKind(raw.to_string()))
  }
}

impl PersonalInfo {
  pub fn contact(&self, kind: ContactKind) -> &str {
    match kind {
      ContactKind::Email => &self.email,
      ContactKind::Phone => &self.phone,
      ContactKind::Location => &self.location,
      ContactKind::Linkedin => &self.linkedin,
      ContactKind::Website => &self.website,
    }
  }

  pub fn contact_mut(&mut self, kind: ContactKind) -> &mut String {
    match kind {
      ContactKind::Email => &mut self.email,
      ContactKind::Phone => &mut self.phone,
      ContactKind::Location => &mut self.location,
      ContactKind::Linkedin => &mut self.linkedin,
      ContactKind::Website => &mut self.website,
    }
  }

  pub fn photo_ref(&self) -> PhotoRef<'_> {
    self.photo.as_deref().map_or(PhotoRef::Absent, PhotoRef::classify)
  }
}

/// How the photo field is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoRef<'a> {
  Absent,
  /// Raw image bytes embedded as a `data:` URI; never leaves the local store.
  Embedded(&'a str),
  /// A reference into remote object storage.
  Remote(&'a str),
}

impl<'a> PhotoRef<'a> {
  pub fn classify(value: &'a str) -> Self {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      PhotoRef::Absent
    } else if trimmed
      .get(..5)
      .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    {
      PhotoRef::Embedded(value)
    } else {
      PhotoRef::Remote(value)
    }
  }

  pub fn is_embedded(&self) -> bool { matches!(self, Self::Embedded(_)) }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A position held. `description` is canonical markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
  pub id:          String,
  pub company:     String,
  pub position:    String,
  pub location:    String,
  pub start_date:  String,
  pub end_date:    String,
  pub current:     bool,
  pub description: String,
  pub sort_order:  u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
  pub id:          String,
  pub institution: String,
  pub degree:      String,
  pub field:       String,
  pub location:    String,
  pub start_date:  String,
  pub end_date:    String,
  pub description: String,
  pub sort_order:  u32,
}

/// A named group of skills. `skills` is canonical markup, usually a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillCategory {
  pub id:         String,
  pub name:       String,
  pub skills:     String,
  pub sort_order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
  pub id:          String,
  pub name:        String,
  pub institution: String,
  pub date:        String,
  pub description: String,
  pub sort_order:  u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
  pub id:         String,
  pub name:       String,
  pub issuer:     String,
  pub date:       String,
  pub url:        String,
  pub sort_order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Award {
  pub id:          String,
  pub title:       String,
  pub issuer:      String,
  pub date:        String,
  pub description: String,
  pub sort_order:  u32,
}

// ─── Visibility ──────────────────────────────────────────────────────────────

/// Which optional sections are shown. Everything is visible by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Visibility {
  pub photo:          bool,
  pub summary:        bool,
  pub experiences:    bool,
  pub education:      bool,
  pub skills:         bool,
  pub courses:        bool,
  pub certifications: bool,
  pub awards:         bool,
}

impl Default for Visibility {
  fn default() -> Self {
    Self {
      photo:          true,
      summary:        true,
      experiences:    true,
      education:      true,
      skills:         true,
      courses:        true,
      certifications: true,
      awards:         true,
    }
  }
}

// ─── CvDocument ──────────────────────────────────────────────────────────────

/// The fully-populated canonical document produced by the migrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CvDocument {
  pub personal_info:  PersonalInfo,
  /// Canonical markup.
  pub summary:        String,
  pub experiences:    Vec<Experience>,
  pub education:      Vec<Education>,
  pub skills:         Vec<SkillCategory>,
  pub courses:        Vec<Course>,
  pub certifications: Vec<Certification>,
  pub awards:         Vec<Award>,
  pub visibility:     Visibility,
  /// Always a permutation of the three sidebar sections.
  pub sidebar_order:  Vec<SidebarSection>,
}

impl Default for CvDocument {
  fn default() -> Self {
    Self {
      personal_info:  PersonalInfo::default(),
      summary:        String::new(),
      experiences:    Vec::new(),
      education:      Vec::new(),
      skills:         Vec::new(),
      courses:        Vec::new(),
      certifications: Vec::new(),
      awards:         Vec::new(),
      visibility:     Visibility::default(),
      sidebar_order:  SidebarSection::default_order().to_vec(),
    }
  }
}

impl CvDocument {
  pub fn to_json(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  pub fn to_json_string(&self) -> Result<String> {
    Ok(serde_json::to_string(self)?)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn default_document_serialises_every_collection() {
    let value = CvDocument::default().to_json().unwrap();
    for key in [
      "experiences",
      "education",
      "skills",
      "courses",
      "certifications",
      "awards",
    ] {
      assert_eq!(value[key], json!([]), "{key} must be an empty array");
    }
    assert_eq!(value["sidebarOrder"], json!(["contact", "summary", "skills"]));
    assert_eq!(value["visibility"]["awards"], json!(true));
  }

  #[test]
  fn canonical_json_round_trips() {
    let mut doc = CvDocument::default();
    doc.personal_info.full_name = "Ada Lovelace".into();
    doc.experiences.push(Experience {
      id: "e1".into(),
      company: "Analytical Engines".into(),
      description: "<p>Wrote the first program</p>".into(),
      ..Default::default()
    });

    let text = doc.to_json_string().unwrap();
    let back: CvDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);
  }

  #[test]
  fn photo_classification() {
    assert_eq!(PhotoRef::classify(""), PhotoRef::Absent);
    assert!(PhotoRef::classify("data:image/png;base64,AAAA").is_embedded());
    assert!(PhotoRef::classify("DATA:image/png;base64,AAAA").is_embedded());
    assert_eq!(
      PhotoRef::classify("https://cdn.example.com/p.png"),
      PhotoRef::Remote("https://cdn.example.com/p.png")
    );
  }

  #[test]
  fn contact_kind_parses_lowercase() {
    use std::str::FromStr;
    assert_eq!(ContactKind::from_str("linkedin").unwrap(), ContactKind::Linkedin);
    assert!(ContactKind::from_str("fax").is_err());
    assert_eq!(ContactKind::Website.as_ref(), "website");
  }

  #[test]
  fn contact_kind_parse_is_lenient_about_case() {
    assert_eq!(ContactKind::parse(" Email ").unwrap(), ContactKind::Email);
    assert!(matches!(
      ContactKind::parse("fax"),
      Err(crate::Error::UnknownContactKind(k)) if k == "fax"
    ));
  }
}
