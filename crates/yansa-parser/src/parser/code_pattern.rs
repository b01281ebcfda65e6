//! Compiler for the studio-code pattern notation.
//!
//! A code pattern is either a raw regex prefixed with `re:` or a small
//! placeholder notation:
//!
//! | Input     | Regex                                        |
//! |-----------|----------------------------------------------|
//! | `###`     | `\d{3}`                                      |
//! | `(##)`    | `\d{0,2}` (a group made only of `#`)         |
//! | `(a#)`    | `(?:a\d{1})?`                                |
//! | `\#`      | literal `#`                                  |
//! | other     | the character itself, escaped                |
//!
//! A `)` without an open group is a literal.

use std::iter::Peekable;
use std::str::Chars;

use regex::{Regex, RegexBuilder};

use crate::error::CodePatternError;

const RAW_PREFIX: &str = "re:";

/// Translates `pattern` into an unanchored regex body.
pub fn translate(pattern: &str) -> Result<String, CodePatternError> {
    let pattern = pattern.trim();
    if let Some(raw) = strip_raw_prefix(pattern) {
        let raw = raw.trim();
        let raw = raw.strip_prefix('^').unwrap_or(raw);
        let raw = raw.strip_suffix('$').unwrap_or(raw);
        if raw.is_empty() {
            return Err(CodePatternError::Empty);
        }
        return Ok(raw.to_string());
    }
    if pattern.is_empty() {
        return Err(CodePatternError::Empty);
    }

    let mut compiler = Compiler {
        chars: pattern.chars().peekable(),
    };
    let sequence = compiler.sequence(false)?;
    Ok(sequence.regex)
}

/// Compiles `pattern` into a case-insensitive regex matching a whole token.
///
/// With `allow_suffix` the code is captured in group 1 and may be followed
/// by anything that starts with a non-alphanumeric character.
pub fn compile(pattern: &str, allow_suffix: bool) -> Result<Regex, CodePatternError> {
    let body = translate(pattern)?;
    let anchored = if allow_suffix {
        format!("^({body})(?:[^A-Za-z0-9].*)?$")
    } else {
        format!("^(?:{body})$")
    };
    Ok(RegexBuilder::new(&anchored).case_insensitive(true).build()?)
}

fn strip_raw_prefix(pattern: &str) -> Option<&str> {
    let head = pattern.get(..RAW_PREFIX.len())?;
    head.eq_ignore_ascii_case(RAW_PREFIX)
        .then(|| &pattern[RAW_PREFIX.len()..])
}

struct Sequence {
    regex: String,
    /// Count of `#` when the sequence holds nothing else.
    only_digits: Option<usize>,
}

struct Compiler<'p> {
    chars: Peekable<Chars<'p>>,
}

impl Compiler<'_> {
    fn sequence(&mut self, in_group: bool) -> Result<Sequence, CodePatternError> {
        let mut regex = String::new();
        let mut digits = 0usize;
        let mut only_digits = true;

        while let Some(ch) = self.chars.next() {
            match ch {
                '#' => {
                    let mut run = 1;
                    while self.chars.next_if_eq(&'#').is_some() {
                        run += 1;
                    }
                    digits += run;
                    regex.push_str(&format!(r"\d{{{run}}}"));
                }
                '(' => {
                    let inner = self.sequence(true)?;
                    match inner.only_digits {
                        Some(n) if n > 0 => regex.push_str(&format!(r"\d{{0,{n}}}")),
                        _ => regex.push_str(&format!("(?:{})?", inner.regex)),
                    }
                    only_digits = false;
                }
                ')' if in_group => {
                    return Ok(Sequence {
                        regex,
                        only_digits: only_digits.then_some(digits),
                    });
                }
                '\\' => {
                    let escaped = self.chars.next().ok_or(CodePatternError::TrailingEscape)?;
                    regex.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
                    only_digits = false;
                }
                other => {
                    regex.push_str(&regex::escape(other.encode_utf8(&mut [0; 4])));
                    only_digits = false;
                }
            }
        }

        if in_group {
            return Err(CodePatternError::UnclosedGroup);
        }
        Ok(Sequence {
            regex,
            only_digits: only_digits.then_some(digits),
        })
    }
}
