//! Character-reference decoding for text inside parsed markup.

/// Named references recognised by the decoder.
const NAMED_ENTITIES: [(&str, char); 18] = [
  ("amp", '&'),
  ("lt", '<'),
  ("gt", '>'),
  ("quot", '"'),
  ("apos", '\''),
  ("nbsp", '\u{a0}'),
  ("ndash", '\u{2013}'),
  ("mdash", '\u{2014}'),
  ("hellip", '\u{2026}'),
  ("lsquo", '\u{2018}'),
  ("rsquo", '\u{2019}'),
  ("ldquo", '\u{201c}'),
  ("rdquo", '\u{201d}'),
  ("bull", '\u{2022}'),
  ("middot", '\u{b7}'),
  ("copy", '\u{a9}'),
  ("reg", '\u{ae}'),
  ("euro", '\u{20ac}'),
];

/// Longest reference body we bother looking for (`#x10FFFF` / `hellip`).
const MAX_REFERENCE_LEN: usize = 10;

/// Decode `&name;`, `&#NN;` and `&#xHH;` references. Anything that does not
/// form a valid reference is kept verbatim.
pub(crate) fn decode_entities(input: &str) -> String {
  if !input.contains('&') {
    return input.to_string();
  }

  let mut out = String::with_capacity(input.len());
  let mut rest = input;
  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    let after = &rest[amp + 1..];
    match decode_reference(after) {
      Some((ch, consumed)) => {
        out.push(ch);
        rest = &after[consumed..];
      }
      None => {
        out.push('&');
        rest = after;
      }
    }
  }
  out.push_str(rest);
  out
}

/// Decode the reference at the start of `s` (just after `&`). Returns the
/// character and the number of bytes consumed including the `;`.
fn decode_reference(s: &str) -> Option<(char, usize)> {
  let window = &s.as_bytes()[..s.len().min(MAX_REFERENCE_LEN + 1)];
  let semi = window.iter().position(|b| *b == b';')?;
  if semi == 0 {
    return None;
  }
  let body = &s[..semi];

  let ch = if let Some(num) = body.strip_prefix('#') {
    let code = match num.strip_prefix(['x', 'X']) {
      Some(hex) => u32::from_str_radix(hex, 16).ok()?,
      None => num.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|c| *c != '\0')?
  } else {
    NAMED_ENTITIES
      .iter()
      .find(|(name, _)| *name == body)
      .map(|(_, c)| *c)?
  };

  Some((ch, semi + 1))
}
