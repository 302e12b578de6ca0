//! Representation-independent serialization of JSON values.
//!
//! `null`, a missing key and `""` all mean "unset" depending on which store
//! wrote the value; they collapse to one sentinel here. Object keys are
//! sorted, arrays keep their order.

use std::collections::BTreeSet;

use serde_json::Value;

/// Canonical form of an unset value.
pub const ABSENT: &str = "~";

/// Keys that legitimately differ between copies of the same document.
pub const DEFAULT_STRIP_KEYS: [&str; 4] = ["id", "userId", "createdAt", "updatedAt"];

/// The set of object keys dropped before comparison, at every depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripKeys(BTreeSet<String>);

impl StripKeys {
  pub fn none() -> Self { StripKeys(BTreeSet::new()) }

  pub fn contains(&self, key: &str) -> bool { self.0.contains(key) }
}

impl Default for StripKeys {
  fn default() -> Self { DEFAULT_STRIP_KEYS.into_iter().collect() }
}

impl<S: Into<String>> FromIterator<S> for StripKeys {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    StripKeys(iter.into_iter().map(Into::into).collect())
  }
}

/// Serialize `value` canonically.
///
/// Scalars serialize as JSON; the absent values serialize as [`ABSENT`].
/// Objects drop stripped keys and keys whose value is absent, then list the
/// remaining `"key":value` pairs in key order. Arrays keep every element,
/// absent ones included, in their original positions.
pub fn canonicalize(value: &Value, strip: &StripKeys) -> String {
  let mut out = String::new();
  write_value(value, strip, &mut out);
  out
}

fn write_value(value: &Value, strip: &StripKeys, out: &mut String) {
  match value {
    Value::Null => out.push_str(ABSENT),
    Value::String(s) if s.is_empty() => out.push_str(ABSENT),
    Value::Bool(_) | Value::Number(_) | Value::String(_) => {
      out.push_str(&value.to_string())
    }
    Value::Array(items) => {
      out.push('[');
      for (i, item) in items.iter().enumerate() {
        if i > 0 {
          out.push(',');
        }
        write_value(item, strip, out);
      }
      out.push(']');
    }
    Value::Object(map) => {
      let mut pairs: Vec<(&String, String)> = map
        .iter()
        .filter(|(key, _)| !strip.contains(key))
        .map(|(key, v)| (key, canonicalize(v, strip)))
        .filter(|(_, v)| v != ABSENT)
        .collect();
      pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

      out.push('{');
      for (i, (key, v)) in pairs.into_iter().enumerate() {
        if i > 0 {
          out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        out.push_str(&v);
      }
      out.push('}');
    }
  }
}
