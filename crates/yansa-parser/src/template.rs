//! Pattern template maintenance.
//!
//! Every token whose kind has no named marker owns one `{tokenK}`
//! placeholder in [`ParseResult::pattern`], numbered contiguously from 0 in
//! token order. Stages never touch the pattern directly: they describe what
//! happens to individual tokens and [`rewrite`] renumbers everything in one
//! step.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::TemplateError;
use crate::model::{ParseResult, Token};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{token(\d+)\}").expect("placeholder regex is valid"));

/// What a token turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub tokens: Vec<Token>,
    /// Literal text written between the placeholders of `tokens`.
    pub joiner: &'static str,
}

impl Replacement {
    pub fn new(tokens: Vec<Token>, joiner: &'static str) -> Self {
        Self { tokens, joiner }
    }

    /// One token in place of one token.
    pub fn single(token: Token) -> Self {
        Self {
            tokens: vec![token],
            joiner: "",
        }
    }
}

/// Per-token edits keyed by token index.
pub type Edits = BTreeMap<usize, Replacement>;

/// Applies `edits` to the token list and rewrites the pattern to match.
///
/// Replacement tokens with a named marker render as that marker, every other
/// token renders as a numbered placeholder. Numbering restarts at 0 so the
/// indices after a split shift by the number of extra parts.
pub fn rewrite(mut result: ParseResult, mut edits: Edits) -> ParseResult {
    if edits.is_empty() {
        return result;
    }

    let old_tokens = std::mem::take(&mut result.tokens);
    let mut tokens = Vec::with_capacity(old_tokens.len() + edits.len());
    // Rendered text for each old numbered slot.
    let mut slots: Vec<String> = Vec::new();
    let mut next = 0usize;

    for (index, token) in old_tokens.into_iter().enumerate() {
        let numbered = token.kind.is_numbered();
        let rendered = match edits.remove(&index) {
            Some(replacement) => {
                let parts: Vec<String> = replacement
                    .tokens
                    .iter()
                    .map(|t| render(t, &mut next))
                    .collect();
                tokens.extend(replacement.tokens);
                parts.join(replacement.joiner)
            }
            None => {
                let rendered = render(&token, &mut next);
                tokens.push(token);
                rendered
            }
        };
        if numbered {
            slots.push(rendered);
        }
    }

    result.pattern = PLACEHOLDER
        .replace_all(&result.pattern, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|k| slots.get(k).cloned())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();
    result.tokens = tokens;
    result
}

fn render(token: &Token, next: &mut usize) -> String {
    match token.kind.marker() {
        Some(marker) => marker.to_string(),
        None => {
            let placeholder = format!("{{token{next}}}");
            *next += 1;
            placeholder
        }
    }
}

/// Checks that the pattern mirrors the token list.
pub fn verify(result: &ParseResult) -> Result<(), TemplateError> {
    let indices: Vec<usize> = PLACEHOLDER
        .captures_iter(&result.pattern)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    let tokens = result.numbered_len();
    if indices.len() != tokens {
        return Err(TemplateError::Count {
            placeholders: indices.len(),
            tokens,
        });
    }

    for (expected, found) in indices.into_iter().enumerate() {
        if found != expected {
            return Err(TemplateError::OutOfOrder { expected, found });
        }
    }
    Ok(())
}
