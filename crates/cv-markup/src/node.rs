//! Typed render tree produced by the parser.

use serde::Serialize;

// ─── Inline ──────────────────────────────────────────────────────────────────

/// An inline run. Formatting nodes nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
  Text { text: String },
  Bold { children: Vec<Inline> },
  Italic { children: Vec<Inline> },
  Underline { children: Vec<Inline> },
  Strike { children: Vec<Inline> },
  /// `<span style="color: …">`
  Color { color: String, children: Vec<Inline> },
  /// `<mark style="background-color: …" data-color="…">`
  Highlight {
    background: String,
    color:      Option<String>,
    children:   Vec<Inline>,
  },
  LineBreak,
}

impl Inline {
  pub fn text(s: impl Into<String>) -> Self { Inline::Text { text: s.into() } }

  pub fn bold(children: Vec<Inline>) -> Self { Inline::Bold { children } }
}

// ─── Block ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
  H2,
  H3,
  H4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
  Bulleted,
  Numbered,
}

/// A block-level node. List items and quotes wrap exactly one paragraph, so
/// they are modelled directly as inline sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
  Paragraph { content: Vec<Inline> },
  Heading { level: HeadingLevel, content: Vec<Inline> },
  List { list: ListKind, items: Vec<Vec<Inline>> },
  Quote { content: Vec<Inline> },
}

impl Block {
  /// An empty paragraph, which is what editors emit for a cleared field.
  pub fn is_blank(&self) -> bool {
    matches!(self, Block::Paragraph { content } if content.is_empty())
  }
}

// ─── Parse results ───────────────────────────────────────────────────────────

/// Result of [`crate::parse_inline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineContent {
  /// Nothing to render.
  Empty,
  /// Untagged input, returned byte-for-byte.
  Plain(String),
  Nodes(Vec<Inline>),
}

/// Result of [`crate::parse_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DocumentContent {
  Empty,
  Plain(String),
  Blocks(Vec<Block>),
}

impl InlineContent {
  pub fn is_empty(&self) -> bool { matches!(self, Self::Empty) }
}

impl DocumentContent {
  pub fn is_empty(&self) -> bool { matches!(self, Self::Empty) }
}
