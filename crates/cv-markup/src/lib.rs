//! Restricted rich-text markup for CV fields.
//!
//! Parses the canonical tag whitelist into a typed render tree, serializes
//! render trees back to canonical markup, and converts the two legacy
//! rich-text shapes (markdown bold, bullet arrays) into canonical markup.
//! Pure synchronous; every function is total.
//!
//! # Whitelist
//!
//! Block: `p`, `h2`, `h3`, `h4`, `ul`, `ol`, `li`, `blockquote`.
//! Inline: `strong`, `em`, `u`, `s`, `br`, `span` (`style="color: …"`),
//! `mark` (`style="background-color: …"` plus `data-color`).
//! Anything else is text.
//!
//! # Quick start
//!
//! ```
//! use cv_markup::{DocumentContent, parse_document};
//!
//! let DocumentContent::Blocks(blocks) =
//!   parse_document("<ul><li><p>Shipped it</p></li></ul>")
//! else {
//!   unreachable!()
//! };
//! assert_eq!(blocks.len(), 1);
//! ```

mod entity;
pub mod legacy;
mod node;
mod parse;
mod serialize;
mod token;

pub use legacy::{
  BULLET_KIND_ALIASES, BulletItem, BulletKind, BulletsInput, migrate_bullets,
  migrate_bullets_value, migrate_markdown_bold,
};
pub use node::{
  Block, DocumentContent, HeadingLevel, Inline, InlineContent, ListKind,
};
pub use parse::{parse_document, parse_inline};
pub use serialize::{
  inline_to_markup, inline_to_plain_text, to_markup, to_plain_text,
};

/// True iff `input` contains at least one whitelisted tag, i.e. it is
/// already canonical markup rather than legacy or plain text.
pub fn contains_markup(input: &str) -> bool {
  token::has_whitelisted_tag(input)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contains_markup_only_for_whitelisted_tags() {
    assert!(contains_markup("<p>x</p>"));
    assert!(contains_markup("a<br>b"));
    assert!(!contains_markup("a <b>bold</b>"));
    assert!(!contains_markup("**legacy**"));
    assert!(!contains_markup(""));
  }

  #[test]
  fn parsing_is_deterministic() {
    let input = "<p>a <strong>b</em> c</p><ul><li>d";
    assert_eq!(parse_document(input), parse_document(input));
    assert_eq!(parse_inline(input), parse_inline(input));
  }
}
