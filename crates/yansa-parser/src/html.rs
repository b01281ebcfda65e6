//! HTML character reference decoding.
//!
//! Filenames scraped from web pages often carry `&amp;` and friends. Only
//! the references that show up in practice are known by name; numeric
//! references are decoded generically.

use std::borrow::Cow;

use phf::phf_map;

/// Longest name we bother looking for between `&` and `;`.
const MAX_REFERENCE_LEN: usize = 10;

static ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    "amp" => "&",
    "lt" => "<",
    "gt" => ">",
    "quot" => "\"",
    "apos" => "'",
    "nbsp" => "\u{a0}",
    "ndash" => "\u{2013}",
    "mdash" => "\u{2014}",
    "hellip" => "\u{2026}",
    "lsquo" => "\u{2018}",
    "rsquo" => "\u{2019}",
    "ldquo" => "\u{201c}",
    "rdquo" => "\u{201d}",
    "laquo" => "\u{ab}",
    "raquo" => "\u{bb}",
    "middot" => "\u{b7}",
    "eacute" => "\u{e9}",
    "egrave" => "\u{e8}",
    "aacute" => "\u{e1}",
    "agrave" => "\u{e0}",
    "iacute" => "\u{ed}",
    "oacute" => "\u{f3}",
    "uacute" => "\u{fa}",
    "ntilde" => "\u{f1}",
    "ccedil" => "\u{e7}",
    "uuml" => "\u{fc}",
    "ouml" => "\u{f6}",
    "auml" => "\u{e4}",
    "szlig" => "\u{df}",
};

/// Decodes named and numeric character references. Unknown references are
/// left untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match decode_reference(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the reference at the start of `tail` (text after `&`). Returns
/// the decoded text and the number of bytes consumed including the `;`.
fn decode_reference(tail: &str) -> Option<(String, usize)> {
    let semi = tail
        .char_indices()
        .take(MAX_REFERENCE_LEN + 1)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let name = &tail[..semi];
    if name.is_empty() {
        return None;
    }

    let decoded = if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        char::from_u32(code)?.to_string()
    } else {
        ENTITIES.get(name)?.to_string()
    };
    Some((decoded, semi + 1))
}
