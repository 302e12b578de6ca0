//! Validated decode of arbitrarily-shaped stored documents.
//!
//! Every wrapper here deserializes from *any* JSON value and records what it
//! found instead of failing, so decoding a whole document cannot fail. The
//! migrator then works on these typed shapes rather than probing raw JSON.

use cv_core::document::ContactKind;
use cv_markup::contains_markup;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

// ─── Generic wrappers ────────────────────────────────────────────────────────

/// A value that decoded as `T`, or was present with the wrong shape (or
/// absent).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Loose<T> {
  Valid(T),
  Invalid,
}

impl<T> Default for Loose<T> {
  fn default() -> Self { Loose::Invalid }
}

impl<T> Loose<T> {
  pub(crate) fn valid(self) -> Option<T> {
    match self {
      Loose::Valid(v) => Some(v),
      Loose::Invalid => None,
    }
  }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Loose<T> {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(T::deserialize(value).map_or(Loose::Invalid, Loose::Valid))
  }
}

/// A scalar rendered as text: strings pass through, numbers and booleans
/// are stringified, anything else is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Text(pub String);

impl Text {
  pub(crate) fn from_value(value: &Value) -> Self {
    Text(match value {
      Value::String(s) => s.clone(),
      Value::Number(n) => n.to_string(),
      Value::Bool(b) => b.to_string(),
      _ => String::new(),
    })
  }
}

impl<'de> Deserialize<'de> for Text {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    Ok(Text::from_value(&Value::deserialize(d)?))
  }
}

/// A JSON array of records. Non-arrays decode as empty; elements that are
/// not objects are dropped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Records<T> {
  pub items:   Vec<T>,
  pub dropped: usize,
}

impl<T> Default for Records<T> {
  fn default() -> Self {
    Records {
      items:   Vec::new(),
      dropped: 0,
    }
  }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Records<T> {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let Value::Array(elements) = Value::deserialize(d)? else {
      return Ok(Records::default());
    };
    let total = elements.len();
    let items: Vec<T> = elements
      .into_iter()
      .filter(Value::is_object)
      .filter_map(|e| T::deserialize(e).ok())
      .collect();
    Ok(Records {
      dropped: total - items.len(),
      items,
    })
  }
}

// ─── Rich text ───────────────────────────────────────────────────────────────

/// The runtime shape of a description-like field.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum RichText {
  /// A string already containing whitelisted tags.
  Markup(String),
  /// A string with no recognised tags; may use `**bold**`.
  Legacy(String),
  /// A bullet array (`[string]` or `[{text, type}]`).
  Bullets(Value),
  #[default]
  Missing,
}

impl RichText {
  pub(crate) fn from_value(value: &Value) -> Self {
    match value {
      Value::Array(_) => RichText::Bullets(value.clone()),
      Value::String(s) if contains_markup(s) => RichText::Markup(s.clone()),
      Value::String(s) => RichText::Legacy(s.clone()),
      Value::Number(_) | Value::Bool(_) => {
        RichText::Legacy(Text::from_value(value).0)
      }
      Value::Null | Value::Object(_) => RichText::Missing,
    }
  }
}

impl<'de> Deserialize<'de> for RichText {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    Ok(RichText::from_value(&Value::deserialize(d)?))
  }
}

// ─── Legacy contacts ─────────────────────────────────────────────────────────

/// One `{type, value}` entry of the retired `contacts` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyContact {
  pub kind:  ContactKind,
  pub value: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawContact {
  #[serde(rename = "type")]
  kind:  Text,
  value: Text,
}

impl LegacyContact {
  /// Decode a contacts list, skipping entries with an unknown `type`.
  pub fn decode_list(value: &Value) -> Vec<LegacyContact> {
    Records::<RawContact>::deserialize(value)
      .map(|records| records.items)
      .unwrap_or_default()
      .into_iter()
      .filter_map(|raw| {
        let kind = ContactKind::parse(&raw.kind.0).ok()?;
        Some(LegacyContact {
          kind,
          value: raw.value.0,
        })
      })
      .collect()
  }
}

// ─── Document shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawPersonalInfo {
  pub full_name: Text,
  pub title:     Text,
  pub email:     Text,
  pub phone:     Text,
  pub location:  Text,
  pub linkedin:  Text,
  pub website:   Text,
  pub photo:     Text,
  pub contacts:  Value,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawExperience {
  pub id:          Text,
  pub company:     Text,
  pub position:    Text,
  pub location:    Text,
  pub start_date:  Text,
  pub end_date:    Text,
  pub current:     Loose<bool>,
  pub description: RichText,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawEducation {
  pub id:          Text,
  pub institution: Text,
  pub degree:      Text,
  pub field:       Text,
  pub location:    Text,
  pub start_date:  Text,
  pub end_date:    Text,
  pub description: RichText,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawSkillCategory {
  pub id:     Text,
  pub name:   Text,
  pub skills: RichText,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawCourse {
  pub id:          Text,
  pub name:        Text,
  pub institution: Text,
  pub date:        Text,
  pub description: RichText,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawCertification {
  pub id:     Text,
  pub name:   Text,
  pub issuer: Text,
  pub date:   Text,
  pub url:    Text,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawAward {
  pub id:          Text,
  pub title:       Text,
  pub issuer:      Text,
  pub date:        Text,
  pub description: RichText,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawVisibility {
  pub photo:          Loose<bool>,
  pub summary:        Loose<bool>,
  pub experiences:    Loose<bool>,
  pub education:      Loose<bool>,
  pub skills:         Loose<bool>,
  pub courses:        Loose<bool>,
  pub certifications: Loose<bool>,
  pub awards:         Loose<bool>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawDocument {
  pub personal_info:  Loose<RawPersonalInfo>,
  /// Legacy location of the contacts list.
  pub contacts:       Value,
  pub summary:        RichText,
  pub experiences:    Records<RawExperience>,
  pub education:      Records<RawEducation>,
  pub skills:         Records<RawSkillCategory>,
  pub courses:        Records<RawCourse>,
  pub certifications: Records<RawCertification>,
  pub awards:         Records<RawAward>,
  pub visibility:     Loose<RawVisibility>,
  pub sidebar_order:  Value,
}

impl RawDocument {
  /// Decode any JSON value. Non-objects decode as an empty document.
  pub(crate) fn decode(value: &Value) -> Self {
    if !value.is_object() {
      return RawDocument::default();
    }
    RawDocument::deserialize(value).unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn text_stringifies_scalars() {
    assert_eq!(Text::from_value(&json!("a")).0, "a");
    assert_eq!(Text::from_value(&json!(12)).0, "12");
    assert_eq!(Text::from_value(&json!(true)).0, "true");
    assert_eq!(Text::from_value(&json!(null)).0, "");
    assert_eq!(Text::from_value(&json!({"x": 1})).0, "");
  }

  #[test]
  fn records_drop_non_objects() {
    let records: Records<RawCourse> =
      Records::deserialize(&json!([{"name": "Rust"}, "junk", 3, [1, 2]]))
        .unwrap();
    assert_eq!(records.items.len(), 1);
    assert_eq!(records.items[0].name.0, "Rust");
    assert_eq!(records.dropped, 3);
  }

  #[test]
  fn records_from_non_array_are_empty() {
    let records: Records<RawCourse> =
      Records::deserialize(&json!({"name": "x"})).unwrap();
    assert!(records.items.is_empty());
  }

  #[test]
  fn rich_text_routing() {
    assert_eq!(
      RichText::from_value(&json!("<p>x</p>")),
      RichText::Markup("<p>x</p>".into())
    );
    assert_eq!(
      RichText::from_value(&json!("**x**")),
      RichText::Legacy("**x**".into())
    );
    assert!(matches!(
      RichText::from_value(&json!(["a"])),
      RichText::Bullets(_)
    ));
    assert_eq!(RichText::from_value(&json!(null)), RichText::Missing);
  }

  #[test]
  fn wrong_field_types_do_not_poison_the_record() {
    let raw = RawDocument::decode(&json!({
      "personalInfo": {"fullName": ["not", "a", "string"], "email": "a@b.c"},
      "visibility": {"awards": "nope", "courses": false},
    }));
    let info = raw.personal_info.valid().unwrap();
    assert_eq!(info.full_name.0, "");
    assert_eq!(info.email.0, "a@b.c");
    let vis = raw.visibility.valid().unwrap();
    assert_eq!(vis.awards, Loose::Invalid);
    assert_eq!(vis.courses, Loose::Valid(false));
  }

  #[test]
  fn non_object_document_decodes_empty() {
    for value in [json!(null), json!([1, 2]), json!("cv"), json!(5)] {
      let raw = RawDocument::decode(&value);
      assert!(raw.experiences.items.is_empty());
      assert_eq!(raw.personal_info, Loose::Invalid);
    }
  }

  #[test]
  fn legacy_contacts_decode() {
    let contacts = LegacyContact::decode_list(&json!([
      {"type": "email", "value": "a@b.c"},
      {"type": "Phone", "value": 5551234},
      {"type": "fax", "value": "nope"},
      "garbage",
    ]));
    assert_eq!(contacts, vec![
      LegacyContact {
        kind:  ContactKind::Email,
        value: "a@b.c".into(),
      },
      LegacyContact {
        kind:  ContactKind::Phone,
        value: "5551234".into(),
      },
    ]);
  }
}
