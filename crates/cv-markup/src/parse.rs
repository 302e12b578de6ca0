//! Recursive-descent parser over the whitelisted grammar.
//!
//! Pipeline:
//!   raw &str
//!     └─ tokenize()          → Vec<Token>
//!          └─ TreeBuilder::build() → Vec<RawNode>   (nesting repaired)
//!               └─ blocks() / inlines() → typed AST
//!
//! Nesting repair rules: an unclosed element ends where its parent ends; a
//! close tag for an outer element implicitly closes the inner ones; a close
//! tag with no matching open element is kept as literal text.

use crate::{
  entity::decode_entities,
  node::{
    Block, DocumentContent, HeadingLevel, Inline, InlineContent, ListKind,
  },
  token::{Attr, Tag, Token, attr, style_property, tokenize},
};

/// Elements nested deeper than this are kept as literal text.
const MAX_DEPTH: usize = 128;

// ─── Intermediate tree ───────────────────────────────────────────────────────

#[derive(Debug)]
enum RawNode<'a> {
  /// Text between tags; entities still encoded.
  Text(&'a str),
  /// A tag that could not be placed, kept verbatim.
  Literal(&'a str),
  Element {
    tag:      Tag,
    attrs:    Vec<Attr>,
    children: Vec<RawNode<'a>>,
  },
}

impl RawNode<'_> {
  fn is_blank(&self) -> bool {
    matches!(self, RawNode::Text(t) if t.trim().is_empty())
  }
}

struct TreeBuilder<'a> {
  tokens: Vec<Token<'a>>,
  pos:    usize,
}

impl<'a> TreeBuilder<'a> {
  fn build(input: &'a str) -> Vec<RawNode<'a>> {
    let mut builder = TreeBuilder {
      tokens: tokenize(input),
      pos:    0,
    };
    let mut open = Vec::new();
    builder.children(&mut open)
  }

  /// Parse siblings until the end of input or a close tag that belongs to
  /// an element in `open`. The close tag for the innermost open element is
  /// consumed; one for an outer element is left for the caller.
  fn children(&mut self, open: &mut Vec<Tag>) -> Vec<RawNode<'a>> {
    let mut nodes = Vec::new();

    while self.pos < self.tokens.len() {
      match self.tokens[self.pos].clone() {
        Token::Text(text) => {
          self.pos += 1;
          nodes.push(RawNode::Text(text));
        }
        Token::Open {
          tag,
          attrs,
          self_closing,
          raw,
        } => {
          self.pos += 1;
          if self_closing {
            nodes.push(RawNode::Element {
              tag,
              attrs,
              children: Vec::new(),
            });
          } else if open.len() >= MAX_DEPTH {
            nodes.push(RawNode::Literal(raw));
          } else {
            open.push(tag);
            let children = self.children(open);
            open.pop();
            nodes.push(RawNode::Element {
              tag,
              attrs,
              children,
            });
          }
        }
        Token::Close { tag, raw } => {
          if open.last() == Some(&tag) {
            self.pos += 1;
            return nodes;
          }
          if open.contains(&tag) {
            return nodes;
          }
          self.pos += 1;
          nodes.push(RawNode::Literal(raw));
        }
      }
    }

    nodes
  }
}

// ─── Public entry points ─────────────────────────────────────────────────────

/// Parse a single inline field. A lone outer `<p>` wrapper is discarded.
///
/// Only the empty string is [`InlineContent::Empty`]; any other untagged
/// input, whitespace included, comes back as [`InlineContent::Plain`].
pub fn parse_inline(input: &str) -> InlineContent {
  if input.is_empty() {
    return InlineContent::Empty;
  }
  if !input.contains('<') {
    return InlineContent::Plain(input.to_string());
  }

  let tree = TreeBuilder::build(input);
  let mut significant = tree.iter().filter(|n| !n.is_blank());
  let nodes = match (significant.next(), significant.next()) {
    (
      Some(RawNode::Element {
        tag: Tag::P,
        children,
        ..
      }),
      None,
    ) => inlines(children),
    _ => inlines(&tree),
  };

  if nodes.is_empty() {
    InlineContent::Empty
  } else {
    InlineContent::Nodes(nodes)
  }
}

/// Parse a rich-text field into an ordered sequence of blocks. Empty and
/// untagged input behave as in [`parse_inline`].
pub fn parse_document(input: &str) -> DocumentContent {
  if input.is_empty() {
    return DocumentContent::Empty;
  }
  if !input.contains('<') {
    return DocumentContent::Plain(input.to_string());
  }

  let tree = TreeBuilder::build(input);
  let blocks = blocks(&tree);
  if blocks.iter().all(Block::is_blank) {
    DocumentContent::Empty
  } else {
    DocumentContent::Blocks(blocks)
  }
}

// ─── Block conversion ────────────────────────────────────────────────────────

fn blocks(nodes: &[RawNode<'_>]) -> Vec<Block> {
  let mut out = Vec::new();
  // Inline content found between blocks is gathered into an implicit
  // paragraph.
  let mut loose: Vec<&RawNode<'_>> = Vec::new();

  for node in nodes {
    let block = match node {
      RawNode::Element { tag, children, .. } if tag.is_block() => {
        block_for(*tag, children)
      }
      _ => {
        loose.push(node);
        continue;
      }
    };
    flush_loose(&mut loose, &mut out);
    out.extend(block);
  }
  flush_loose(&mut loose, &mut out);

  out
}

fn flush_loose(loose: &mut Vec<&RawNode<'_>>, out: &mut Vec<Block>) {
  if loose.iter().all(|n| n.is_blank()) {
    loose.clear();
    return;
  }
  let mut run = InlineRun::default();
  for node in loose.drain(..) {
    run.push_node(node);
  }
  out.push(Block::Paragraph {
    content: run.finish(),
  });
}

fn block_for(tag: Tag, children: &[RawNode<'_>]) -> Option<Block> {
  let block = match tag {
    Tag::P | Tag::Li => Block::Paragraph {
      content: inlines(children),
    },
    Tag::H2 => heading(HeadingLevel::H2, children),
    Tag::H3 => heading(HeadingLevel::H3, children),
    Tag::H4 => heading(HeadingLevel::H4, children),
    Tag::Blockquote => Block::Quote {
      content: inlines(children),
    },
    Tag::Ul => list(ListKind::Bulleted, children),
    Tag::Ol => list(ListKind::Numbered, children),
    _ => return None,
  };
  Some(block)
}

fn heading(level: HeadingLevel, children: &[RawNode<'_>]) -> Block {
  Block::Heading {
    level,
    content: inlines(children),
  }
}

fn list(kind: ListKind, children: &[RawNode<'_>]) -> Block {
  let mut items = Vec::new();
  // Stray content inside a list becomes its own item rather than vanishing.
  let mut stray: Vec<&RawNode<'_>> = Vec::new();

  for node in children {
    match node {
      RawNode::Element {
        tag: Tag::Li,
        children,
        ..
      } => {
        flush_stray(&mut stray, &mut items);
        items.push(inlines(children));
      }
      other => stray.push(other),
    }
  }
  flush_stray(&mut stray, &mut items);

  Block::List { list: kind, items }
}

fn flush_stray(stray: &mut Vec<&RawNode<'_>>, items: &mut Vec<Vec<Inline>>) {
  if stray.iter().all(|n| n.is_blank()) {
    stray.clear();
    return;
  }
  let mut run = InlineRun::default();
  for node in stray.drain(..) {
    run.push_node(node);
  }
  items.push(run.finish());
}

// ─── Inline conversion ───────────────────────────────────────────────────────

fn inlines(nodes: &[RawNode<'_>]) -> Vec<Inline> {
  let mut run = InlineRun::default();
  run.splice(nodes);
  run.finish()
}

/// Inline nodes collected for one run.
///
/// Block elements flattened into the run are separated from their
/// neighbours by a break that is only emitted once more content follows, so
/// a run never ends with a separator it invented. Breaks from `<br>` are
/// always kept.
#[derive(Default)]
struct InlineRun {
  nodes:         Vec<Inline>,
  pending_break: bool,
}

impl InlineRun {
  fn finish(self) -> Vec<Inline> { self.nodes }

  fn push(&mut self, node: Inline) {
    if std::mem::take(&mut self.pending_break) {
      self.nodes.push(Inline::LineBreak);
    }
    self.nodes.push(node);
  }

  fn push_text(&mut self, text: String) {
    if text.is_empty() {
      return;
    }
    if !self.pending_break {
      if let Some(Inline::Text { text: prev }) = self.nodes.last_mut() {
        prev.push_str(&text);
        return;
      }
    }
    self.push(Inline::Text { text });
  }

  /// Request a separator unless the run is empty or already ends in a break.
  fn separate(&mut self) {
    if self.nodes.last().is_some_and(|n| *n != Inline::LineBreak) {
      self.pending_break = true;
    }
  }

  /// Inline the children of a transparent element.
  fn splice(&mut self, children: &[RawNode<'_>]) {
    for child in children {
      self.push_node(child);
    }
  }

  fn push_node(&mut self, node: &RawNode<'_>) {
    match node {
      RawNode::Text(raw) => self.push_text(decode_entities(raw)),
      RawNode::Literal(raw) => self.push_text((*raw).to_string()),
      RawNode::Element {
        tag,
        attrs,
        children,
      } => self.push_element(*tag, attrs, children),
    }
  }

  fn push_element(
    &mut self,
    tag: Tag,
    attrs: &[Attr],
    children: &[RawNode<'_>],
  ) {
    match tag {
      Tag::Br => self.push(Inline::LineBreak),
      Tag::Strong => self.push(Inline::Bold {
        children: inlines(children),
      }),
      Tag::Em => self.push(Inline::Italic {
        children: inlines(children),
      }),
      Tag::U => self.push(Inline::Underline {
        children: inlines(children),
      }),
      Tag::S => self.push(Inline::Strike {
        children: inlines(children),
      }),
      Tag::Span => {
        match attr(attrs, "style").and_then(|s| style_property(s, "color")) {
          Some(color) => self.push(Inline::Color {
            color:    color.to_string(),
            children: inlines(children),
          }),
          None => self.splice(children),
        }
      }
      Tag::Mark => {
        let background = attr(attrs, "style")
          .and_then(|s| style_property(s, "background-color"));
        match background {
          Some(background) => self.push(Inline::Highlight {
            background: background.to_string(),
            color:      attr(attrs, "data-color")
              .filter(|c| !c.trim().is_empty())
              .map(str::to_string),
            children:   inlines(children),
          }),
          None => self.splice(children),
        }
      }
      // Block elements inside inline content keep their text.
      _ => {
        self.separate();
        self.splice(children);
        self.separate();
      }
    }
  }
}
