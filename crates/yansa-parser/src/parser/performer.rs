//! Performer list detection.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::model::{ParseResult, Token, TokenKind};
use crate::rules::Rules;
use crate::template::{self, Edits, Replacement};

const NAME: &str = r"[a-zA-Z]+(?:\s+[a-zA-Z]+)?";
const MIN_NAMES: usize = 2;
const WORD_LEN: std::ops::RangeInclusive<usize> = 2..=20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joiner {
    /// A list ending in `and` or `&`.
    Conjunction,
    Comma,
}

/// The list shapes, tried in order.
static SHAPES: LazyLock<Vec<(Regex, Joiner)>> = LazyLock::new(|| {
    [
        (format!(r"^{NAME}(?:\s*,\s*{NAME})*\s+and\s+{NAME}$"), Joiner::Conjunction),
        (format!(r"^{NAME}(?:\s*,\s*{NAME})*\s*&\s*{NAME}$"), Joiner::Conjunction),
        (format!(r"^{NAME}(?:\s*,\s*{NAME})+$"), Joiner::Comma),
        (format!(r"^{NAME}\s+and\s+{NAME}$"), Joiner::Conjunction),
        (format!(r"^{NAME}\s*&\s*{NAME}$"), Joiner::Conjunction),
        (format!(r"^{NAME}\s*,\s*{NAME}$"), Joiner::Comma),
    ]
    .into_iter()
    .map(|(source, joiner)| {
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .expect("performer regex is valid");
        (regex, joiner)
    })
    .collect()
});

static AND_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").expect("and regex is valid"));
static AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*&\s*").expect("ampersand regex is valid"));
static COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("comma regex is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
static LAST_CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:and|&)\s+").expect("conjunction regex is valid"));
static CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:\band\b|&)\s*").expect("conjunction regex is valid"));
static LIST_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*").expect("list comma regex is valid"));

/// Retypes tokens that read as a list of two or more person names.
#[derive(Debug, Clone, Default)]
pub struct PerformerMatcher {
    stop_words: HashSet<String>,
}

impl PerformerMatcher {
    pub fn new(rules: &Rules) -> Self {
        Self {
            stop_words: rules
                .dictionary
                .non_performer_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn process(&self, result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();
        for (index, token) in result.tokens.iter().enumerate() {
            if !token.is_generic() {
                continue;
            }
            if let Some(performers) = self.match_token(&token.value) {
                debug!(value = %token.value, performers = %performers, "Matched performers");
                edits.insert(
                    index,
                    Replacement::single(Token::new(
                        performers,
                        TokenKind::Performers,
                        token.position,
                    )),
                );
            }
        }
        template::rewrite(result, edits)
    }

    /// Normalized `"A, B, C"` list when `value` is a performer list.
    fn match_token(&self, value: &str) -> Option<String> {
        let normalized = normalize(value);
        let names = self.first_valid(&normalized, &SHAPES)?;
        capitalization_check(value, names.len());
        Some(normalized)
    }

    /// Names from the first shape that both matches `text` and yields a
    /// valid list. A shape whose names fail validation hands over to the
    /// next one.
    fn first_valid(&self, text: &str, shapes: &[(Regex, Joiner)]) -> Option<Vec<String>> {
        for (regex, joiner) in shapes {
            if !regex.is_match(text) {
                continue;
            }
            let names = extract_names(text, *joiner);
            if self.valid(&names) {
                return Some(names);
            }
            trace!(text, ?joiner, ?names, "Rejected performer candidate");
        }
        None
    }

    fn valid(&self, names: &[String]) -> bool {
        names.len() >= MIN_NAMES
            && names.iter().flat_map(|name| name.split_whitespace()).all(|word| {
                !self.stop_words.contains(&word.to_lowercase())
                    && WORD_LEN.contains(&word.chars().count())
            })
    }
}

/// Folds `and`/`&` into commas and tidies spacing.
fn normalize(value: &str) -> String {
    let text = AND_WORD.replace_all(value, ", ");
    let text = AMPERSAND.replace_all(&text, ", ");
    let text = COMMA.replace_all(&text, ", ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim_matches(|c: char| c == ' ' || c == ',').to_string()
}

fn extract_names(value: &str, joiner: Joiner) -> Vec<String> {
    let names: Vec<&str> = match joiner {
        Joiner::Conjunction if value.contains(',') => {
            let mut parts = LAST_CONJUNCTION.splitn(value, 2);
            let head = parts.next().unwrap_or_default();
            let mut names: Vec<&str> = LIST_COMMA.split(head).collect();
            names.extend(parts);
            names
        }
        Joiner::Conjunction => CONJUNCTION.splitn(value, 2).collect(),
        Joiner::Comma => LIST_COMMA.split(value).collect(),
    };
    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Counts title-cased words. The count is logged only; it never rejects a
/// list.
fn capitalization_check(value: &str, names: usize) -> bool {
    let capitalized = value
        .split_whitespace()
        .filter(|word| is_title_case(word))
        .count();
    let required = (names / 2).max(1);
    let passed = capitalized >= required;
    trace!(value, capitalized, required, passed, "Performer capitalization heuristic");
    passed
}

fn is_title_case(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic());
    match letters.next() {
        Some(first) => first.is_uppercase() && letters.all(char::is_lowercase),
        None => false,
    }
}
