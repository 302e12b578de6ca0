//! Render tree → canonical markup, and render tree → plain text.
//!
//! The markup emitted here is exactly what [`crate::parse_document`] reads
//! back: no whitespace between blocks, list items and quotes always wrap a
//! single `<p>`.

use crate::node::{Block, DocumentContent, HeadingLevel, Inline, InlineContent, ListKind};

// ─── Escaping ────────────────────────────────────────────────────────────────

/// Escape text content: `&`, `<`, `>`.
pub(crate) fn escape_text(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value: `&`, `"`.
fn escape_attr(s: &str) -> String {
  s.replace('&', "&amp;").replace('"', "&quot;")
}

// ─── Markup ──────────────────────────────────────────────────────────────────

/// Serialize blocks as canonical markup.
pub fn to_markup(blocks: &[Block]) -> String {
  let mut out = String::new();
  for block in blocks {
    write_block(block, &mut out);
  }
  out
}

/// Serialize an inline run as canonical markup (no paragraph wrapper).
pub fn inline_to_markup(inlines: &[Inline]) -> String {
  let mut out = String::new();
  write_inlines(inlines, &mut out);
  out
}

fn heading_tag(level: HeadingLevel) -> &'static str {
  match level {
    HeadingLevel::H2 => "h2",
    HeadingLevel::H3 => "h3",
    HeadingLevel::H4 => "h4",
  }
}

fn list_tag(kind: ListKind) -> &'static str {
  match kind {
    ListKind::Bulleted => "ul",
    ListKind::Numbered => "ol",
  }
}

fn write_block(block: &Block, out: &mut String) {
  match block {
    Block::Paragraph { content } => write_wrapped("p", content, out),
    Block::Heading { level, content } => {
      write_wrapped(heading_tag(*level), content, out)
    }
    Block::List { list, items } => {
      let tag = list_tag(*list);
      out.push_str(&format!("<{tag}>"));
      for item in items {
        out.push_str("<li>");
        write_wrapped("p", item, out);
        out.push_str("</li>");
      }
      out.push_str(&format!("</{tag}>"));
    }
    Block::Quote { content } => {
      out.push_str("<blockquote>");
      write_wrapped("p", content, out);
      out.push_str("</blockquote>");
    }
  }
}

fn write_wrapped(tag: &str, content: &[Inline], out: &mut String) {
  out.push_str(&format!("<{tag}>"));
  write_inlines(content, out);
  out.push_str(&format!("</{tag}>"));
}

fn write_inlines(inlines: &[Inline], out: &mut String) {
  for inline in inlines {
    match inline {
      Inline::Text { text } => out.push_str(&escape_text(text)),
      Inline::Bold { children } => write_wrapped("strong", children, out),
      Inline::Italic { children } => write_wrapped("em", children, out),
      Inline::Underline { children } => write_wrapped("u", children, out),
      Inline::Strike { children } => write_wrapped("s", children, out),
      Inline::Color { color, children } => {
        out.push_str(&format!(
          "<span style=\"color: {}\">",
          escape_attr(color)
        ));
        write_inlines(children, out);
        out.push_str("</span>");
      }
      Inline::Highlight {
        background,
        color,
        children,
      } => {
        out.push_str(&format!(
          "<mark style=\"background-color: {}\"",
          escape_attr(background)
        ));
        if let Some(color) = color {
          out.push_str(&format!(" data-color=\"{}\"", escape_attr(color)));
        }
        out.push('>');
        write_inlines(children, out);
        out.push_str("</mark>");
      }
      Inline::LineBreak => out.push_str("<br>"),
    }
  }
}

// ─── Plain text ──────────────────────────────────────────────────────────────

/// Flatten parsed content to plain text: one line per paragraph, heading or
/// list item. Numbered items are prefixed `N. `, bulleted ones `- `.
pub fn to_plain_text(content: &DocumentContent) -> String {
  match content {
    DocumentContent::Empty => String::new(),
    DocumentContent::Plain(s) => s.clone(),
    DocumentContent::Blocks(blocks) => {
      let mut lines: Vec<String> = Vec::new();
      for block in blocks {
        match block {
          Block::Paragraph { content } | Block::Heading { content, .. } => {
            lines.push(inline_plain(content))
          }
          Block::Quote { content } => {
            lines.push(format!("> {}", inline_plain(content)))
          }
          Block::List { list, items } => {
            for (i, item) in items.iter().enumerate() {
              let prefix = match list {
                ListKind::Bulleted => "- ".to_string(),
                ListKind::Numbered => format!("{}. ", i + 1),
              };
              lines.push(format!("{prefix}{}", inline_plain(item)));
            }
          }
        }
      }
      lines.join("\n")
    }
  }
}

/// Flatten an inline parse result to plain text.
pub fn inline_to_plain_text(content: &InlineContent) -> String {
  match content {
    InlineContent::Empty => String::new(),
    InlineContent::Plain(s) => s.clone(),
    InlineContent::Nodes(nodes) => inline_plain(nodes),
  }
}

fn inline_plain(inlines: &[Inline]) -> String {
  let mut out = String::new();
  write_plain(inlines, &mut out);
  out
}

fn write_plain(inlines: &[Inline], out: &mut String) {
  for inline in inlines {
    match inline {
      Inline::Text { text } => out.push_str(text),
      Inline::LineBreak => out.push('\n'),
      Inline::Bold { children }
      | Inline::Italic { children }
      | Inline::Underline { children }
      | Inline::Strike { children }
      | Inline::Color { children, .. }
      | Inline::Highlight { children, .. } => write_plain(children, out),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{parse_document, parse_inline};

  #[test]
  fn list_and_quote_markup() {
    let blocks = vec![
      Block::List {
        list:  ListKind::Bulleted,
        items: vec![vec![Inline::text("a")], vec![Inline::text("b")]],
      },
      Block::Quote {
        content: vec![Inline::text("q")],
      },
    ];
    assert_eq!(
      to_markup(&blocks),
      "<ul><li><p>a</p></li><li><p>b</p></li></ul><blockquote><p>q</p></blockquote>"
    );
  }

  #[test]
  fn text_is_escaped() {
    assert_eq!(
      inline_to_markup(&[Inline::text("a < b & c")]),
      "a &lt; b &amp; c"
    );
  }

  #[test]
  fn canonical_markup_survives_parse_and_serialize() {
    let input = concat!(
      "<h3>Skills</h3>",
      "<p>Rust &amp; <strong>C<em>++</em></strong><br>",
      "<span style=\"color: #336699\">blue</span> ",
      "<mark style=\"background-color: #ffff00\" data-color=\"yellow\">lit</mark></p>",
      "<ol><li><p>one</p></li><li><p><s>two</s> <u>three</u></p></li></ol>",
    );
    let DocumentContent::Blocks(blocks) = parse_document(input) else {
      panic!("expected blocks")
    };
    assert_eq!(to_markup(&blocks), input);
  }

  #[test]
  fn plain_text_flattening() {
    let content =
      parse_document("<h2>Role</h2><ul><li><p>x</p></li></ul><ol><li><p>y</p></li><li><p>z</p></li></ol>");
    assert_eq!(to_plain_text(&content), "Role\n- x\n1. y\n2. z");
    assert_eq!(
      inline_to_plain_text(&parse_inline("<p>a<br><strong>b</strong></p>")),
      "a\nb"
    );
  }
}
