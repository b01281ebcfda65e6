//! Studio name matching.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{ParseResult, Token, TokenKind};
use crate::rules::Rules;
use crate::template::{self, Edits, Replacement};

/// Shortest key the substring fallback will look for.
const MIN_SUBSTRING_KEY: usize = 3;
/// Shortest half the dash fallback will look up.
const MIN_DASH_HALF: usize = 2;

#[derive(Debug, Clone)]
struct StudioKey {
    canonical: String,
    exact_only: bool,
}

/// Recognizes studio names, aliases and abbreviations.
///
/// Three passes run in order and each only runs while no studio is known:
/// a whole-token lookup, a split on an unspaced hyphen and a
/// longest-key substring search.
#[derive(Debug, Clone, Default)]
pub struct StudioMatcher {
    keys: HashMap<String, StudioKey>,
    overrides: HashMap<String, String>,
    /// `(key, canonical)`, longest key first, then alphabetical.
    substring_keys: Vec<(String, String)>,
}

impl StudioMatcher {
    pub fn new(rules: &Rules) -> Self {
        let mut keys = HashMap::new();
        for entry in &rules.studios {
            let canonical = entry.canonical_name.trim();
            if canonical.is_empty() {
                continue;
            }
            let names = std::iter::once(canonical)
                .chain(entry.aliases.iter().map(String::as_str))
                .chain(entry.abbr.iter().map(String::as_str));
            for name in names {
                keys.entry(name.trim().to_lowercase()).or_insert_with(|| StudioKey {
                    canonical: canonical.to_string(),
                    exact_only: entry.exact_only,
                });
            }
        }

        let overrides = rules
            .studio_aliases
            .iter()
            .map(|(key, canonical)| (key.trim().to_lowercase(), canonical.trim().to_string()))
            .filter(|(key, canonical)| !key.is_empty() && !canonical.is_empty())
            .collect();

        let mut substring_keys: Vec<(String, String)> = keys
            .iter()
            .filter(|(key, studio)| !studio.exact_only && key.chars().count() >= MIN_SUBSTRING_KEY)
            .map(|(key, studio)| (key.clone(), studio.canonical.clone()))
            .collect();
        substring_keys.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            keys,
            overrides,
            substring_keys,
        }
    }

    pub fn process(&self, result: ParseResult) -> ParseResult {
        if result.studio.is_some() {
            return result;
        }
        let result = self.exact(result);
        if result.studio.is_some() {
            return result;
        }
        let result = self.dash_fallback(result);
        if result.studio.is_some() {
            return result;
        }
        self.substring_fallback(result)
    }

    fn lookup(&self, value: &str) -> Option<&str> {
        self.keys
            .get(&value.trim().to_lowercase())
            .map(|studio| studio.canonical.as_str())
    }

    fn exact(&self, mut result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();
        for (index, token) in result.tokens.iter().enumerate() {
            if !token.is_generic() {
                continue;
            }
            let key = token.value.trim().to_lowercase();
            let canonical = self
                .overrides
                .get(&key)
                .map(String::as_str)
                .or_else(|| self.lookup(&key));
            if let Some(canonical) = canonical {
                debug!(value = %token.value, studio = canonical, "Matched studio");
                result.studio.get_or_insert_with(|| canonical.to_string());
                edits.insert(
                    index,
                    Replacement::single(Token::new(canonical, TokenKind::Studio, token.position)),
                );
            }
        }
        template::rewrite(result, edits)
    }

    fn dash_fallback(&self, mut result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();
        for (index, token) in result.tokens.iter().enumerate() {
            if token.kind != TokenKind::Text {
                continue;
            }
            let Some((left, right)) = split_on_inner_hyphen(&token.value) else {
                continue;
            };
            let right_position = token.position + left.len() + 1;

            let parts = if let Some(studio) = self.half(left) {
                result.studio = Some(studio.to_string());
                vec![
                    Token::new(studio, TokenKind::Studio, token.position),
                    Token::new(right, TokenKind::Text, right_position),
                ]
            } else if let Some(studio) = self.half(right) {
                result.studio = Some(studio.to_string());
                vec![
                    Token::new(left, TokenKind::Text, token.position),
                    Token::new(studio, TokenKind::Studio, right_position),
                ]
            } else {
                continue;
            };

            debug!(value = %token.value, studio = ?result.studio, "Matched studio on hyphen split");
            edits.insert(index, Replacement::new(parts, "-"));
            break;
        }
        template::rewrite(result, edits)
    }

    fn half(&self, half: &str) -> Option<&str> {
        if half.chars().count() < MIN_DASH_HALF {
            return None;
        }
        self.lookup(half)
    }

    fn substring_fallback(&self, mut result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();
        for (index, token) in result.tokens.iter().enumerate() {
            if token.kind != TokenKind::Text {
                continue;
            }
            let lowered = Lowered::new(&token.value);
            let Some((range, canonical)) = self
                .substring_keys
                .iter()
                .find_map(|(key, canonical)| lowered.find(key).map(|range| (range, canonical)))
            else {
                continue;
            };

            let value = token.value.as_str();
            let mut parts = Vec::with_capacity(3);
            if let Some((prefix, offset)) = trimmed_with_offset(&value[..range.start]) {
                parts.push(Token::new(prefix, TokenKind::Text, token.position + offset));
            }
            parts.push(Token::new(
                canonical.as_str(),
                TokenKind::Studio,
                token.position + range.start,
            ));
            if let Some((suffix, offset)) = trimmed_with_offset(&value[range.end..]) {
                parts.push(Token::new(
                    suffix,
                    TokenKind::Text,
                    token.position + range.end + offset,
                ));
            }

            debug!(value = %token.value, studio = %canonical, "Matched studio inside token");
            result.studio = Some(canonical.clone());
            edits.insert(index, Replacement::new(parts, ""));
            break;
        }
        template::rewrite(result, edits)
    }
}

/// Splits on the first `-` when it sits between two non-whitespace
/// characters.
fn split_on_inner_hyphen(value: &str) -> Option<(&str, &str)> {
    let at = value.find('-')?;
    let (left, rest) = value.split_at(at);
    let right = &rest[1..];
    let before = left.chars().next_back()?;
    let after = right.chars().next()?;
    if before.is_whitespace() || after.is_whitespace() {
        return None;
    }
    Some((left, right))
}

fn trimmed_with_offset(part: &str) -> Option<(&str, usize)> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some((trimmed, part.len() - part.trim_start().len()))
}

/// Lower-cased copy of a value that maps match offsets back to the
/// original, whose byte lengths may differ.
struct Lowered {
    text: String,
    /// Original byte offset for every byte of `text`, plus the end.
    origin: Vec<usize>,
}

impl Lowered {
    fn new(value: &str) -> Self {
        let mut text = String::with_capacity(value.len());
        let mut origin = Vec::with_capacity(value.len() + 1);
        for (offset, ch) in value.char_indices() {
            for lower in ch.to_lowercase() {
                text.push(lower);
                origin.extend(std::iter::repeat(offset).take(lower.len_utf8()));
            }
        }
        origin.push(value.len());
        Self { text, origin }
    }

    fn find(&self, key: &str) -> Option<std::ops::Range<usize>> {
        let start = self.text.find(key)?;
        let end = start + key.len();
        Some(self.origin[start]..self.origin[end])
    }
}
