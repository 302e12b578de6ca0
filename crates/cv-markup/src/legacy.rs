//! Legacy rich-text shapes → canonical markup.
//!
//! Two historical representations are still found in stored documents:
//! markdown-style `**bold**` strings and structured bullet arrays
//! (`[{text, type}]`). Both functions here are pure and total.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::{
  node::{Block, HeadingLevel, Inline, InlineContent, ListKind},
  parse::parse_inline,
  serialize::{inline_to_markup, to_markup},
  token::has_whitelisted_tag,
};

const BOLD_DELIMITER: &str = "**";

// ─── Bullet kinds ────────────────────────────────────────────────────────────

/// The closed set of bullet item kinds after alias normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BulletKind {
  Bullet,
  Numbered,
  Paragraph,
  Title,
  Subtitle,
  Heading3,
  Quote,
}

/// Retired kind names and the kind each one now means.
pub const BULLET_KIND_ALIASES: [(&str, BulletKind); 3] = [
  ("subheading", BulletKind::Title),
  ("comment", BulletKind::Bullet),
  ("code", BulletKind::Paragraph),
];

impl BulletKind {
  /// Resolve a stored kind name. Aliases are applied first; unknown names
  /// fall back to [`BulletKind::Bullet`].
  pub fn normalize(raw: &str) -> Self {
    let name = raw.trim().to_ascii_lowercase();
    BULLET_KIND_ALIASES
      .iter()
      .find(|(alias, _)| *alias == name)
      .map(|(_, kind)| *kind)
      .or_else(|| BulletKind::from_str(&name).ok())
      .unwrap_or(BulletKind::Bullet)
  }

  fn list_kind(self) -> Option<ListKind> {
    match self {
      BulletKind::Bullet => Some(ListKind::Bulleted),
      BulletKind::Numbered => Some(ListKind::Numbered),
      _ => None,
    }
  }
}

// ─── Validated input ─────────────────────────────────────────────────────────

/// One entry of a legacy bullet array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletItem {
  pub text: String,
  pub kind: BulletKind,
}

impl BulletItem {
  pub fn new(text: impl Into<String>, kind: BulletKind) -> Self {
    Self {
      text: text.into(),
      kind,
    }
  }
}

/// The shapes a bullet-migrated field may arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulletsInput {
  /// Already a markup string; passed through untouched.
  Markup(String),
  Items(Vec<BulletItem>),
  /// Null, absent, or a shape that carries no text.
  Missing,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBullet {
  Plain(String),
  Item(RawBulletItem),
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawBulletItem {
  text: Value,
  #[serde(rename = "type")]
  kind: Value,
}

impl BulletsInput {
  /// Decode an untyped JSON value. Never fails: array elements that are
  /// neither strings nor objects are skipped.
  pub fn from_value(value: &Value) -> Self {
    match value {
      Value::String(s) => BulletsInput::Markup(s.clone()),
      Value::Array(elements) => BulletsInput::Items(
        elements
          .iter()
          .filter_map(|e| RawBullet::deserialize(e).ok())
          .map(|raw| match raw {
            RawBullet::Plain(text) => BulletItem::new(text, BulletKind::Bullet),
            RawBullet::Item(item) => BulletItem::new(
              scalar_text(&item.text),
              item
                .kind
                .as_str()
                .map_or(BulletKind::Bullet, BulletKind::normalize),
            ),
          })
          .collect(),
      ),
      _ => BulletsInput::Missing,
    }
  }
}

fn scalar_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => b.to_string(),
    _ => String::new(),
  }
}

// ─── Markdown bold ───────────────────────────────────────────────────────────

/// Convert `**bold**` segments to `<strong>` runs.
///
/// Text without a delimiter is returned unchanged, so this is the identity on
/// plain text and on markup that never used the convention. It must only be
/// applied to fields known to hold legacy text.
pub fn migrate_markdown_bold(text: &str) -> String {
  if text.is_empty() || !text.contains(BOLD_DELIMITER) {
    return text.to_string();
  }
  inline_to_markup(&bold_inlines(text))
}

/// Split on `**`; odd-numbered segments are bold. Empty segments are dropped.
fn bold_inlines(text: &str) -> Vec<Inline> {
  text
    .split(BOLD_DELIMITER)
    .enumerate()
    .filter(|(_, segment)| !segment.is_empty())
    .map(|(i, segment)| {
      if i % 2 == 1 {
        Inline::bold(vec![Inline::text(segment)])
      } else {
        Inline::text(segment)
      }
    })
    .collect()
}

// ─── Bullet arrays ───────────────────────────────────────────────────────────

/// Convert a bullet array to canonical markup.
///
/// Consecutive `bullet` (or `numbered`) items share one `<ul>` (or `<ol>`);
/// any change of kind closes the open list. Every other kind becomes one
/// standalone block.
pub fn migrate_bullets(input: &BulletsInput) -> String {
  match input {
    BulletsInput::Markup(s) => s.clone(),
    BulletsInput::Missing => String::new(),
    BulletsInput::Items(items) => to_markup(&bullet_blocks(items)),
  }
}

/// [`migrate_bullets`] over an untyped JSON value.
pub fn migrate_bullets_value(value: &Value) -> String {
  migrate_bullets(&BulletsInput::from_value(value))
}

fn bullet_blocks(items: &[BulletItem]) -> Vec<Block> {
  let mut blocks = Vec::new();
  let mut open: Option<(ListKind, Vec<Vec<Inline>>)> = None;

  for item in items {
    let content = item_inlines(&item.text);

    if let Some(kind) = item.kind.list_kind() {
      match open.as_mut() {
        Some((open_kind, entries)) if *open_kind == kind => {
          entries.push(content);
        }
        _ => {
          close_list(&mut open, &mut blocks);
          open = Some((kind, vec![content]));
        }
      }
      continue;
    }

    close_list(&mut open, &mut blocks);
    blocks.push(match item.kind {
      BulletKind::Title => Block::Heading {
        level: HeadingLevel::H2,
        content,
      },
      BulletKind::Subtitle => Block::Heading {
        level: HeadingLevel::H3,
        content,
      },
      BulletKind::Heading3 => Block::Heading {
        level: HeadingLevel::H4,
        content,
      },
      BulletKind::Quote => Block::Quote { content },
      BulletKind::Paragraph | BulletKind::Bullet | BulletKind::Numbered => {
        Block::Paragraph { content }
      }
    });
  }
  close_list(&mut open, &mut blocks);

  blocks
}

fn close_list(
  open: &mut Option<(ListKind, Vec<Vec<Inline>>)>,
  blocks: &mut Vec<Block>,
) {
  if let Some((list, items)) = open.take() {
    blocks.push(Block::List { list, items });
  }
}

/// Item text may already carry inline markup (newer editors wrote it that
/// way); otherwise it is legacy text and may use `**bold**`.
fn item_inlines(text: &str) -> Vec<Inline> {
  if has_whitelisted_tag(text) {
    match parse_inline(text) {
      InlineContent::Nodes(nodes) => nodes,
      InlineContent::Plain(s) => vec![Inline::text(s)],
      InlineContent::Empty => Vec::new(),
    }
  } else {
    bold_inlines(text)
  }
}
