//! Content fingerprints for canonical documents.
//!
//! A fingerprint is the SHA-256 of the canonical serialization, hex-encoded.
//! Two copies of a document with equal fingerprints are content-identical no
//! matter which store produced them.

use cv_core::document::{CvDocument, PhotoRef};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::{StripKeys, canonicalize};

/// Fingerprint a canonical document.
pub fn fingerprint(doc: &CvDocument, strip: &StripKeys) -> String {
  // A document of strings, booleans and vectors always serializes.
  let value = serde_json::to_value(doc).unwrap_or_default();
  fingerprint_value(&value, strip)
}

/// Fingerprint a raw JSON value, e.g. a row read from a remote store.
pub fn fingerprint_value(value: &Value, strip: &StripKeys) -> String {
  let mut value = value.clone();
  drop_embedded_photo(&mut value);

  let mut hasher = Sha256::new();
  hasher.update(canonicalize(&value, strip).as_bytes());
  hex::encode(hasher.finalize())
}

/// An embedded `data:` photo lives only in the local store, so it is left
/// out. A remote photo reference stays in.
fn drop_embedded_photo(value: &mut Value) {
  let Some(info) = value
    .get_mut("personalInfo")
    .and_then(Value::as_object_mut)
  else {
    return;
  };
  let embedded = info
    .get("photo")
    .and_then(Value::as_str)
    .is_some_and(|photo| PhotoRef::classify(photo).is_embedded());
  if embedded {
    info.remove("photo");
  }
}

#[cfg(test)]
mod tests {
  use cv_core::document::{Course, Experience};
  use serde_json::json;

  use super::*;

  fn sample() -> CvDocument {
    let mut doc = CvDocument::default();
    doc.personal_info.full_name = "Grace Hopper".into();
    doc.experiences = vec![
      Experience {
        id: "a".into(),
        company: "Navy".into(),
        ..Default::default()
      },
      Experience {
        id: "b".into(),
        company: "Remington Rand".into(),
        sort_order: 1,
        ..Default::default()
      },
    ];
    doc
  }

  #[test]
  fn is_deterministic_hex() {
    let strip = StripKeys::default();
    let fp = fingerprint(&sample(), &strip);
    assert_eq!(fp, fingerprint(&sample(), &strip));
    assert_eq!(fp.len(), 64);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn ids_are_ignored() {
    let strip = StripKeys::default();
    let mut other = sample();
    other.experiences[0].id = "remote-1".into();
    other.experiences[1].id = "remote-2".into();
    assert_eq!(fingerprint(&sample(), &strip), fingerprint(&other, &strip));
    assert_ne!(
      fingerprint(&sample(), &StripKeys::none()),
      fingerprint(&other, &StripKeys::none())
    );
  }

  #[test]
  fn null_and_empty_string_agree() {
    let strip = StripKeys::default();
    let local = json!({
      "summary": "",
      "courses": [{"id": "1", "name": "SQL", "date": ""}],
    });
    let remote = json!({
      "summary": null,
      "courses": [{"id": "99", "name": "SQL", "date": null, "userId": "u"}],
    });
    assert_eq!(
      fingerprint_value(&local, &strip),
      fingerprint_value(&remote, &strip)
    );
  }

  #[test]
  fn typed_and_raw_forms_agree() {
    let strip = StripKeys::default();
    let mut doc = CvDocument::default();
    doc.courses.push(Course {
      id: "local".into(),
      name: "SQL".into(),
      ..Default::default()
    });
    let mut raw = doc.to_json().unwrap();
    raw["courses"][0]["id"] = json!("remote");
    raw["courses"][0]["date"] = Value::Null;
    assert_eq!(fingerprint(&doc, &strip), fingerprint_value(&raw, &strip));
  }

  #[test]
  fn remote_photo_changes_the_digest() {
    let strip = StripKeys::default();
    let mut a = sample();
    let mut b = sample();
    a.personal_info.photo = Some("https://cdn.example/a.jpg".into());
    b.personal_info.photo = Some("https://cdn.example/b.jpg".into());
    assert_ne!(fingerprint(&a, &strip), fingerprint(&b, &strip));
  }

  #[test]
  fn embedded_photo_is_ignored() {
    let strip = StripKeys::default();
    let mut a = sample();
    let mut b = sample();
    a.personal_info.photo = Some("data:image/png;base64,AAAA".into());
    b.personal_info.photo = Some("data:image/png;base64,BBBB".into());
    assert_eq!(fingerprint(&a, &strip), fingerprint(&b, &strip));
    assert_eq!(fingerprint(&a, &strip), fingerprint(&sample(), &strip));
  }

  #[test]
  fn reordering_entries_changes_the_digest() {
    let strip = StripKeys::default();
    let mut swapped = sample();
    swapped.experiences.swap(0, 1);
    assert_ne!(fingerprint(&sample(), &strip), fingerprint(&swapped, &strip));
  }
}
