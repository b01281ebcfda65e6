//! Sequence markers, group label and title.
//!
//! Runs last, over whatever the earlier stages left unclaimed:
//!
//! 1. labeled sequence markers (`Scene 2`, `Pt.3`, `E05` ...) fill
//!    [`ParseResult::sequence`] and split the token around the rightmost one;
//! 2. a lone short number between two wordy tokens is taken as the scene;
//! 3. the first of several remaining wordy tokens becomes the group, the
//!    rest make up the title. With nothing left, a title is synthesized from
//!    the group and sequence number or from the performer names.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::model::{ParseResult, SequenceKind, Token, TokenKind};
use crate::rules::Rules;
use crate::template::{self, Edits, Replacement};
use crate::trimmer::Trimmer;

static SEQUENCE_MARKERS: LazyLock<Vec<(Regex, SequenceKind)>> = LazyLock::new(|| {
    [
        (r"\b(?:scene|sc)\b", SequenceKind::Scene),
        (r"\b(?:part|pt)\b", SequenceKind::Part),
        (r"\b(?:episode|ep)\b", SequenceKind::Episode),
        (r"\b(?:volume|vol)\b", SequenceKind::Volume),
        (r"\b(?:disc|disk|cd)\b", SequenceKind::Disc),
        (r"\bs", SequenceKind::Scene),
        (r"\bp", SequenceKind::Part),
        (r"\be", SequenceKind::Episode),
        (r"\bv", SequenceKind::Volume),
    ]
    .into_iter()
    .map(|(label, kind)| {
        let regex = RegexBuilder::new(&format!(r"{label}[.\s-]?#?\s*(\d+)\b"))
            .case_insensitive(true)
            .build()
            .expect("sequence marker regex is valid");
        (regex, kind)
    })
    .collect()
});

/// Token shaped like a studio code rather than a scene marker.
static CODE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^sc-?\d{4}$").expect("code-like regex is valid"));
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("bare number regex is valid"));
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{2,}\b").expect("word regex is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

const MAX_BARE_SCENE_DIGITS: usize = 3;
const EDGE_PUNCTUATION: [char; 3] = [',', ';', ':'];

#[derive(Debug, Clone)]
struct Marker {
    span: Range<usize>,
    kind: SequenceKind,
    number: u32,
}

/// Final sequence, group and title extraction.
#[derive(Debug, Clone, Default)]
pub struct FinalStageExtractor {
    trimmer: Trimmer,
}

impl FinalStageExtractor {
    pub fn new(rules: &Rules) -> Self {
        Self {
            trimmer: Trimmer::new(rules.dictionary.trimming_strings.iter().cloned()),
        }
    }

    pub fn process(&self, result: ParseResult) -> ParseResult {
        let result = self.labeled_sequences(result);
        let result = self.bare_scene_number(result);
        self.group_and_title(result)
    }

    fn labeled_sequences(&self, mut result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();

        for (index, token) in result.tokens.iter().enumerate() {
            let value = token.value.as_str();
            if !token.is_generic() || value.is_empty() || CODE_LIKE.is_match(value) {
                continue;
            }
            let markers = find_markers(value);
            let Some(primary) = rightmost(&markers) else {
                continue;
            };
            for marker in &markers {
                result.sequence.insert(marker.kind, marker.number);
            }

            let spans: Vec<Range<usize>> = markers.iter().map(|m| m.span.clone()).collect();
            let prefix = self.clean_text(&excise(value, 0..primary.span.start, &spans));
            let suffix = self.clean_text(&excise(value, primary.span.end..value.len(), &spans));
            debug!(
                value,
                kind = %primary.kind,
                number = primary.number,
                prefix = %prefix,
                suffix = %suffix,
                "Found sequence marker"
            );

            let sequence = |value: &str| Token::new(value, TokenKind::Sequence, token.position);
            let same_kind = |value: String| Token::new(value, token.kind, token.position);
            let replacement = match (prefix.is_empty(), suffix.is_empty()) {
                (false, true) if primary.kind.marks_group() && result.group.is_none() => {
                    result.group = Some(prefix);
                    sequence(value)
                }
                (false, true) if primary.kind == SequenceKind::Part => same_kind(prefix),
                (false, true) => Token::new(prefix, TokenKind::Sequence, token.position),
                (true, false) => same_kind(suffix),
                (false, false) => {
                    if primary.kind.marks_group() && result.group.is_none() {
                        result.group = Some(prefix);
                    }
                    same_kind(suffix)
                }
                (true, true) => sequence(value),
            };
            edits.insert(index, Replacement::single(replacement));
        }

        template::rewrite(result, edits)
    }

    fn bare_scene_number(&self, mut result: ParseResult) -> ParseResult {
        if result.sequence.contains_key(&SequenceKind::Scene) {
            return result;
        }

        let candidates: Vec<usize> = result
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_generic() && !t.value.is_empty())
            .map(|(i, _)| i)
            .collect();
        let numeric: Vec<usize> = (0..candidates.len())
            .filter(|&c| BARE_NUMBER.is_match(&result.tokens[candidates[c]].value))
            .collect();

        let [slot] = numeric[..] else {
            return result;
        };
        if slot == 0 || slot + 1 >= candidates.len() {
            return result;
        }
        let wordy = |c: usize| WORD.is_match(&result.tokens[candidates[c]].value);
        if !(wordy(slot - 1) && wordy(slot + 1)) {
            return result;
        }

        let token = &result.tokens[candidates[slot]];
        if token.value.len() > MAX_BARE_SCENE_DIGITS {
            return result;
        }
        let Ok(number) = token.value.parse::<u32>() else {
            return result;
        };
        debug!(value = %token.value, "Inferred scene number");

        let mut edits = Edits::new();
        edits.insert(
            candidates[slot],
            Replacement::single(Token::new(
                token.value.clone(),
                TokenKind::Sequence,
                token.position,
            )),
        );
        result.sequence.insert(SequenceKind::Scene, number);
        template::rewrite(result, edits)
    }

    fn group_and_title(&self, mut result: ParseResult) -> ParseResult {
        let meaningful: Vec<usize> = result
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_generic() && !t.value.is_empty() && WORD.is_match(&t.value))
            .map(|(i, _)| i)
            .collect();

        let mut edits = Edits::new();
        let titles = match meaningful.split_first() {
            Some((&first, rest)) if result.group.is_none() && !rest.is_empty() => {
                let token = &result.tokens[first];
                result.group = Some(self.clean_text(&token.value));
                edits.insert(
                    first,
                    Replacement::single(Token::new(
                        token.value.clone(),
                        TokenKind::Group,
                        token.position,
                    )),
                );
                rest
            }
            _ => &meaningful[..],
        };

        let parts: Vec<String> = titles
            .iter()
            .map(|&i| {
                let token = &result.tokens[i];
                edits.insert(
                    i,
                    Replacement::single(Token::new(
                        token.value.clone(),
                        TokenKind::Title,
                        token.position,
                    )),
                );
                self.clean_text(&token.value)
            })
            .collect();

        let title = self.clean_text(&parts.join(" "));
        result.title = if title.is_empty() {
            self.synthesize_title(&result)
        } else {
            Some(title)
        };
        debug!(group = ?result.group, title = ?result.title, "Finalized title");

        template::rewrite(result, edits)
    }

    fn synthesize_title(&self, result: &ParseResult) -> Option<String> {
        if let Some(group) = &result.group {
            let primary = SequenceKind::PRIORITY
                .iter()
                .find_map(|kind| result.sequence.get(kind));
            if let Some(number) = primary {
                return Some(format!("{group}, Scene {number}"));
            }
        }

        let names: Vec<String> = result
            .performers()
            .iter()
            .map(|name| self.clean_text(name))
            .filter(|name| !name.is_empty())
            .collect();
        match names.as_slice() {
            [] => None,
            [one] => Some(one.clone()),
            [first, second] => Some(format!("{first} & {second}")),
            [init @ .., last] => Some(format!("{} & {last}", init.join(", "))),
        }
    }

    /// Collapses whitespace, applies the trimmer and drops separator
    /// punctuation at either end.
    pub fn clean_text(&self, text: &str) -> String {
        let collapsed = WHITESPACE.replace_all(text, " ");
        let trimmed = self.trimmer.trim(collapsed.trim()).trim();
        trimmed
            .trim_start_matches(EDGE_PUNCTUATION)
            .trim()
            .trim_end_matches(EDGE_PUNCTUATION)
            .trim()
            .to_string()
    }
}

/// Every labeled number in `value`, ordered by position.
fn find_markers(value: &str) -> Vec<Marker> {
    let mut markers: Vec<Marker> = SEQUENCE_MARKERS
        .iter()
        .flat_map(|(regex, kind)| {
            regex.captures_iter(value).filter_map(move |caps| {
                let number = caps.get(1)?.as_str().parse().ok()?;
                Some(Marker {
                    span: caps.get(0)?.range(),
                    kind: *kind,
                    number,
                })
            })
        })
        .collect();
    markers.sort_by_key(|m| (m.span.start, m.span.end));
    markers
}

/// The marker ending furthest right; the leftmost such marker on ties.
fn rightmost(markers: &[Marker]) -> Option<&Marker> {
    markers.iter().reduce(|best, m| {
        if (m.span.end, m.span.start) > (best.span.end, best.span.start) {
            m
        } else {
            best
        }
    })
}

/// The text of `region` with every byte covered by `spans` removed.
/// `spans` must be sorted by start.
fn excise(value: &str, region: Range<usize>, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(region.len());
    let mut cursor = region.start;
    for span in spans {
        let start = span.start.clamp(region.start, region.end);
        let end = span.end.clamp(region.start, region.end);
        if start > cursor {
            out.push_str(&value[cursor..start]);
        }
        cursor = cursor.max(end);
    }
    if cursor < region.end {
        out.push_str(&value[cursor..region.end]);
    }
    out
}
