//! Tokenizer for the canonical markup whitelist.
//!
//! Only whitelisted tags become [`Token::Open`] / [`Token::Close`]. Anything
//! that merely looks like a tag (`<div>`, `<!-- -->`, `a < b`) stays in the
//! surrounding [`Token::Text`] run, which is what makes unknown markup
//! degrade to literal text.

use crate::entity::decode_entities;

// ─── Tag whitelist ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
  P,
  H2,
  H3,
  H4,
  Ul,
  Ol,
  Li,
  Blockquote,
  Strong,
  Em,
  U,
  S,
  Br,
  Span,
  Mark,
}

/// `(name, tag)` pairs; names are matched case-insensitively.
const TAG_WHITELIST: [(&str, Tag); 15] = [
  ("p", Tag::P),
  ("h2", Tag::H2),
  ("h3", Tag::H3),
  ("h4", Tag::H4),
  ("ul", Tag::Ul),
  ("ol", Tag::Ol),
  ("li", Tag::Li),
  ("blockquote", Tag::Blockquote),
  ("strong", Tag::Strong),
  ("em", Tag::Em),
  ("u", Tag::U),
  ("s", Tag::S),
  ("br", Tag::Br),
  ("span", Tag::Span),
  ("mark", Tag::Mark),
];

impl Tag {
  pub(crate) fn from_name(name: &str) -> Option<Tag> {
    TAG_WHITELIST
      .iter()
      .find(|(n, _)| n.eq_ignore_ascii_case(name))
      .map(|(_, t)| *t)
  }

  pub(crate) fn is_block(self) -> bool {
    matches!(
      self,
      Tag::P
        | Tag::H2
        | Tag::H3
        | Tag::H4
        | Tag::Ul
        | Tag::Ol
        | Tag::Li
        | Tag::Blockquote
    )
  }

  /// Void elements never have children or a closing tag.
  pub(crate) fn is_void(self) -> bool { matches!(self, Tag::Br) }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attr {
  /// Lowercased attribute name.
  pub name:  String,
  /// Entity-decoded value; empty for bare attributes.
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
  Text(&'a str),
  Open {
    tag:          Tag,
    attrs:        Vec<Attr>,
    self_closing: bool,
    raw:          &'a str,
  },
  Close {
    tag: Tag,
    raw: &'a str,
  },
}

pub(crate) fn attr<'a>(attrs: &'a [Attr], name: &str) -> Option<&'a str> {
  attrs
    .iter()
    .find(|a| a.name == name)
    .map(|a| a.value.as_str())
}

/// Look up a single property in an inline `style` attribute value.
pub(crate) fn style_property<'a>(style: &'a str, property: &str) -> Option<&'a str> {
  style.split(';').find_map(|decl| {
    let (name, value) = decl.split_once(':')?;
    if name.trim().eq_ignore_ascii_case(property) {
      let value = value.trim();
      (!value.is_empty()).then_some(value)
    } else {
      None
    }
  })
}

// ─── Scanner ─────────────────────────────────────────────────────────────────

/// Split `input` into text runs and whitelisted tags.
pub(crate) fn tokenize(input: &str) -> Vec<Token<'_>> {
  let mut tokens = Vec::new();
  let mut text_start = 0usize;
  let mut pos = 0usize;

  while let Some(offset) = input[pos..].find('<') {
    let lt = pos + offset;
    match scan_tag(input, lt) {
      Some((token, end)) => {
        if text_start < lt {
          tokens.push(Token::Text(&input[text_start..lt]));
        }
        tokens.push(token);
        pos = end;
        text_start = end;
      }
      None => pos = lt + 1,
    }
  }

  if text_start < input.len() {
    tokens.push(Token::Text(&input[text_start..]));
  }
  tokens
}

/// True iff `input` contains at least one whitelisted tag.
pub(crate) fn has_whitelisted_tag(input: &str) -> bool {
  let mut pos = 0usize;
  while let Some(offset) = input[pos..].find('<') {
    let lt = pos + offset;
    if scan_tag(input, lt).is_some() {
      return true;
    }
    pos = lt + 1;
  }
  false
}

/// Try to read a whitelisted tag starting at byte `lt` (which holds `<`).
/// Returns the token and the byte offset just past its `>`.
fn scan_tag(input: &str, lt: usize) -> Option<(Token<'_>, usize)> {
  let bytes = input.as_bytes();
  let mut i = lt + 1;

  let closing = bytes.get(i) == Some(&b'/');
  if closing {
    i += 1;
  }

  let name_start = i;
  if !bytes.get(i)?.is_ascii_alphabetic() {
    return None;
  }
  while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
    i += 1;
  }
  let tag = Tag::from_name(&input[name_start..i])?;

  if closing {
    i = skip_ws(bytes, i);
    if bytes.get(i) != Some(&b'>') {
      return None;
    }
    let end = i + 1;
    return Some((
      Token::Close {
        tag,
        raw: &input[lt..end],
      },
      end,
    ));
  }

  // The name must be delimited; `<strongest>` is not `<strong>`.
  match bytes.get(i)? {
    b'>' | b'/' => {}
    b if b.is_ascii_whitespace() => {}
    _ => return None,
  }

  let mut attrs = Vec::new();
  loop {
    i = skip_ws(bytes, i);
    match bytes.get(i)? {
      b'>' => {
        let end = i + 1;
        return Some((
          Token::Open {
            tag,
            attrs,
            self_closing: tag.is_void(),
            raw: &input[lt..end],
          },
          end,
        ));
      }
      b'/' => {
        if bytes.get(i + 1) != Some(&b'>') {
          return None;
        }
        let end = i + 2;
        return Some((
          Token::Open {
            tag,
            attrs,
            self_closing: true,
            raw: &input[lt..end],
          },
          end,
        ));
      }
      _ => {
        let (attr, next) = scan_attr(input, i)?;
        attrs.push(attr);
        i = next;
      }
    }
  }
}

fn scan_attr(input: &str, start: usize) -> Option<(Attr, usize)> {
  let bytes = input.as_bytes();
  let mut i = start;
  while i < bytes.len()
    && !bytes[i].is_ascii_whitespace()
    && !matches!(bytes[i], b'=' | b'>' | b'/' | b'"' | b'\'' | b'<')
  {
    i += 1;
  }
  if i == start {
    return None;
  }
  let name = input[start..i].to_ascii_lowercase();

  let after_name = skip_ws(bytes, i);
  if bytes.get(after_name) != Some(&b'=') {
    return Some((
      Attr {
        name,
        value: String::new(),
      },
      i,
    ));
  }

  i = skip_ws(bytes, after_name + 1);
  let (raw_value, next) = match *bytes.get(i)? {
    quote @ (b'"' | b'\'') => {
      let close = input[i + 1..].find(quote as char)? + i + 1;
      (&input[i + 1..close], close + 1)
    }
    _ => {
      let value_start = i;
      while i < bytes.len()
        && !bytes[i].is_ascii_whitespace()
        && !matches!(bytes[i], b'>' | b'<')
      {
        i += 1;
      }
      if i == value_start {
        return None;
      }
      (&input[value_start..i], i)
    }
  };

  Some((
    Attr {
      name,
      value: decode_entities(raw_value),
    },
    next,
  ))
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
  while i < bytes.len() && bytes[i].is_ascii_whitespace() {
    i += 1;
  }
  i
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_text_and_tags() {
    let tokens = tokenize("a<strong>b</strong>c");
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0], Token::Text("a"));
    assert!(matches!(tokens[1], Token::Open { tag: Tag::Strong, .. }));
    assert_eq!(tokens[2], Token::Text("b"));
    assert!(matches!(tokens[3], Token::Close { tag: Tag::Strong, .. }));
    assert_eq!(tokens[4], Token::Text("c"));
  }

  #[test]
  fn unknown_tags_stay_in_text() {
    let tokens = tokenize("x <div>y</div> z");
    assert_eq!(tokens, vec![Token::Text("x <div>y</div> z")]);
  }

  #[test]
  fn lone_angle_bracket_is_text() {
    assert_eq!(tokenize("1 < 2"), vec![Token::Text("1 < 2")]);
    assert_eq!(tokenize("<"), vec![Token::Text("<")]);
    assert_eq!(tokenize("<strong"), vec![Token::Text("<strong")]);
  }

  #[test]
  fn prefix_of_tag_name_is_not_a_tag() {
    assert_eq!(tokenize("<strongest>"), vec![Token::Text("<strongest>")]);
  }

  #[test]
  fn tag_names_are_case_insensitive() {
    assert!(matches!(tokenize("<EM>")[0], Token::Open { tag: Tag::Em, .. }));
  }

  #[test]
  fn br_variants_are_self_closing() {
    for input in ["<br>", "<br/>", "<br />"] {
      let Token::Open {
        tag, self_closing, ..
      } = &tokenize(input)[0]
      else {
        panic!("expected open tag for {input}")
      };
      assert_eq!(*tag, Tag::Br);
      assert!(*self_closing);
    }
  }

  #[test]
  fn attributes_are_decoded() {
    let tokens = tokenize(
      r#"<mark style="background-color: yellow" data-color='Yellow &amp; co'>"#,
    );
    let Token::Open { tag, attrs, .. } = &tokens[0] else {
      panic!("expected open tag")
    };
    assert_eq!(*tag, Tag::Mark);
    assert_eq!(attr(attrs, "style"), Some("background-color: yellow"));
    assert_eq!(attr(attrs, "data-color"), Some("Yellow & co"));
  }

  #[test]
  fn unterminated_attribute_is_text() {
    assert_eq!(
      tokenize(r#"<span style="color: red>x"#),
      vec![Token::Text(r#"<span style="color: red>x"#)]
    );
  }

  #[test]
  fn style_lookup() {
    let style = "background-color: #ff0; color: red";
    assert_eq!(style_property(style, "color"), Some("red"));
    assert_eq!(style_property(style, "background-color"), Some("#ff0"));
    assert_eq!(style_property(style, "font-weight"), None);
  }

  #[test]
  fn detects_whitelisted_tags_only() {
    assert!(has_whitelisted_tag("<p>x</p>"));
    assert!(has_whitelisted_tag("a</strong>"));
    assert!(!has_whitelisted_tag("<div>x</div>"));
    assert!(!has_whitelisted_tag("plain"));
  }
}
