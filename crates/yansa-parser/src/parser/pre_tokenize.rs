//! Cleaning of the raw filename before tokenization.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use crate::config::ParserConfig;
use crate::html::decode_entities;
use crate::model::{Confidence, RemovedToken};
use crate::rules::Rules;
use crate::trimmer::Trimmer;

static DOUBLE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*-\s*").expect("double dash regex is valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Typographic characters folded to plain ASCII.
const PUNCTUATION: &[(char, &str)] = &[
    ('\u{201c}', "\""),
    ('\u{201d}', "\""),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2026}', "..."),
    ('\u{a0}', " "),
    ('\u{200b}', ""),
    ('\u{200e}', ""),
    ('\u{200f}', ""),
];

/// Output of [`PreTokenizer::process`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreTokenized {
    pub original: String,
    pub cleaned: String,
    pub removed: Vec<RemovedToken>,
}

impl PreTokenized {
    /// Wraps an already clean string.
    pub fn unchanged(cleaned: &str) -> Self {
        Self {
            original: cleaned.to_string(),
            cleaned: cleaned.to_string(),
            removed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct EarlyMarker {
    marker: String,
    category: String,
    confidence: Confidence,
}

/// Normalizes a raw filename into the string the tokenizer works on.
#[derive(Debug, Clone)]
pub struct PreTokenizer {
    markers: Vec<EarlyMarker>,
    trimmer: Trimmer,
    replace_with_dash: Vec<String>,
    extensions: HashSet<String>,
    decode_html_entities: bool,
    strip_extensions: bool,
}

impl PreTokenizer {
    pub fn new(rules: &Rules, config: &ParserConfig) -> Self {
        let dict = &rules.dictionary;
        let kinds = [
            ("resolution", &dict.resolution_markers, Confidence::RESOLUTION),
            ("quality", &dict.quality_markers, Confidence::QUALITY),
            ("source", &dict.source_markers, Confidence::SOURCE),
            ("format", &dict.format_markers, Confidence::FORMAT),
            ("misc", &dict.misc_markers, Confidence::MISC),
        ];
        let markers = kinds
            .into_iter()
            .flat_map(|(kind, markers, confidence)| {
                markers
                    .iter()
                    .filter(|m| !m.is_empty())
                    .map(move |marker| EarlyMarker {
                        marker: marker.clone(),
                        category: format!("{kind}_{marker}"),
                        confidence,
                    })
            })
            .collect();

        Self {
            markers,
            trimmer: Trimmer::new(dict.trimming_strings.iter().cloned()),
            replace_with_dash: dict
                .replace_with_dash
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
            extensions: dict
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            decode_html_entities: config.decode_html_entities,
            strip_extensions: config.strip_extensions,
        }
    }

    pub fn process(&self, filename: &str) -> PreTokenized {
        let mut removed = Vec::new();
        let mut cleaned = basename(filename).to_string();

        for marker in &self.markers {
            cleaned = remove_marker(&cleaned, marker, &mut removed);
        }
        cleaned = self.trimmer.trim(&cleaned).to_string();

        cleaned = self.normalize(&cleaned);
        cleaned = self.replace_with_dash(cleaned);

        let (without_underscores, flagged) = handle_underscores(&cleaned);
        if flagged {
            removed.push(RemovedToken::review_flag());
        }
        cleaned = without_underscores;

        if self.strip_extensions {
            cleaned = self.strip_extension(&cleaned).to_string();
        }
        cleaned = self.trimmer.trim(&cleaned).to_string();

        trace!(filename, cleaned = %cleaned, removed = removed.len(), "Pre-tokenized");
        PreTokenized {
            original: filename.to_string(),
            cleaned,
            removed,
        }
    }

    /// NFC, entity decoding, punctuation folding.
    fn normalize(&self, text: &str) -> String {
        let composed: String = text.nfc().collect();
        let decoded = if self.decode_html_entities {
            decode_entities(&composed).into_owned()
        } else {
            composed
        };

        let mut folded = String::with_capacity(decoded.len());
        for c in decoded.chars() {
            match PUNCTUATION.iter().find(|(from, _)| *from == c) {
                Some((_, to)) => folded.push_str(to),
                None => folded.push(c),
            }
        }
        folded
    }

    fn replace_with_dash(&self, mut text: String) -> String {
        for literal in &self.replace_with_dash {
            if text.contains(literal.as_str()) {
                text = text.replace(literal.as_str(), " - ");
            }
        }
        let text = DOUBLE_DASH.replace_all(&text, " - ");
        let text = WHITESPACE_RUN.replace_all(&text, " ");
        text.trim().to_string()
    }

    fn strip_extension<'a>(&self, text: &'a str) -> &'a str {
        match text.rfind('.') {
            Some(dot) if dot > 0 && dot + 1 < text.len() => {
                let suffix = text[dot + 1..].to_lowercase();
                if self.extensions.contains(&suffix) {
                    &text[..dot]
                } else {
                    text
                }
            }
            _ => text,
        }
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Removes every boundary-safe occurrence of one marker. Hits are located
/// in `text` as given and removed together.
fn remove_marker(text: &str, marker: &EarlyMarker, removed: &mut Vec<RemovedToken>) -> String {
    let needle = marker.marker.as_str();
    let mut hits = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        if is_boundary(text[..start].chars().next_back()) && is_boundary(text[end..].chars().next()) {
            hits.push(start..end);
            from = end;
        } else {
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if hits.is_empty() {
        return text.trim().to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for hit in hits {
        out.push_str(&text[last..hit.start]);
        removed.push(RemovedToken {
            value: needle.to_string(),
            category: marker.category.clone(),
            position: hit.start,
            confidence: marker.confidence,
        });
        last = hit.end;
    }
    out.push_str(&text[last..]);
    out.trim().to_string()
}

fn is_boundary(neighbour: Option<char>) -> bool {
    !neighbour.is_some_and(|c| c.is_ascii_alphanumeric())
}

/// Deletes underscores that touch whitespace, then turns the remaining
/// free-standing underscores into spaces. Returns whether anything was
/// deleted.
fn handle_underscores(text: &str) -> (String, bool) {
    if !text.contains('_') {
        return (text.to_string(), false);
    }

    let pass = |input: &str, delete: bool| -> String {
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len());
        for (i, &c) in chars.iter().enumerate() {
            if c != '_' {
                out.push(c);
                continue;
            }
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            let after = chars.get(i + 1);
            let touches_space =
                before.is_some_and(|c| c.is_whitespace()) || after.is_some_and(|c| c.is_whitespace());
            match (delete, touches_space) {
                (true, true) => {}
                (true, false) | (false, true) => out.push('_'),
                (false, false) => out.push(' '),
            }
        }
        out
    };

    let first = pass(text, true);
    let deleted = first.len() != text.len();
    (pass(&first, false), deleted)
}
