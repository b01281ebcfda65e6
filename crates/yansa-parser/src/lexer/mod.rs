//! Logos-based segmentation of cleaned filenames.
//!
//! The cleaned string is cut into bracketed groups and plain runs. Plain
//! runs are further split on dashes that touch whitespace. Every surviving
//! fragment becomes a [`Token`] and a `{tokenK}` placeholder in the pattern;
//! the placeholder keeps the original bracket glyphs and dash separators
//! around it so the pattern reads like the filename.

use std::collections::HashSet;
use std::sync::LazyLock;

use logos::Logos;
use regex::Regex;
use tracing::trace;

use crate::model::{ParseResult, Token, TokenKind};
use crate::parser::PreTokenized;
use crate::rules::Rules;
use crate::trimmer::Trimmer;

/// Dash with whitespace on at least one side.
static DASH_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s-\s|\s-|-\s").expect("dash separator regex is valid"));

const JUNK: &str = "{junk}";

/// Top-level segments of a cleaned filename.
///
/// A group runs from its opening glyph to the first matching closing glyph.
/// Glyphs without a partner produce a lexer error and are dropped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    #[token("[", |lex| close_group(lex, ']'))]
    Bracket,

    #[token("(", |lex| close_group(lex, ')'))]
    Parenthesis,

    #[token("{", |lex| close_group(lex, '}'))]
    Curly,

    /// Text outside any group.
    #[regex(r"[^\[\](){}]+")]
    Plain,
}

fn close_group(lex: &mut logos::Lexer<'_, Segment>, close: char) -> bool {
    match lex.remainder().find(close) {
        Some(offset) => {
            lex.bump(offset + close.len_utf8());
            true
        }
        None => false,
    }
}

impl Segment {
    /// Token kind and wrapping glyphs for group segments.
    fn group(self) -> Option<(TokenKind, &'static str, &'static str)> {
        match self {
            Segment::Bracket => Some((TokenKind::Bracket, "[", "]")),
            Segment::Parenthesis => Some((TokenKind::Parenthesis, "(", ")")),
            Segment::Curly => Some((TokenKind::Curly, "{", "}")),
            Segment::Plain => None,
        }
    }
}

/// Splits `input` into segments with their byte spans. Unmatched glyphs
/// are skipped.
pub fn segments(input: &str) -> impl Iterator<Item = (Segment, std::ops::Range<usize>)> + '_ {
    Segment::lexer(input).spanned().filter_map(|(segment, span)| match segment {
        Ok(segment) => Some((segment, span)),
        Err(()) => {
            trace!(glyph = &input[span], "Dropping unmatched bracket");
            None
        }
    })
}

/// Turns a pre-tokenized filename into tokens and the initial pattern.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    junk: HashSet<String>,
    trimmer: Trimmer,
}

impl Tokenizer {
    pub fn new(rules: &Rules) -> Self {
        Self {
            junk: rules.dictionary.junk_tokens.iter().cloned().collect(),
            trimmer: Trimmer::new(rules.dictionary.trimming_strings.iter().cloned()),
        }
    }

    pub fn tokenize(&self, pre: PreTokenized) -> ParseResult {
        let mut builder = Builder::new(self);
        let cleaned = pre.cleaned.as_str();

        for (segment, span) in segments(cleaned) {
            let text = &cleaned[span.clone()];
            match segment.group() {
                Some((kind, open, close)) => builder.group(text, span.start, kind, open, close),
                None => builder.plain(text, span.start),
            }
        }

        let (tokens, pattern) = builder.finish();
        ParseResult {
            original: pre.original,
            cleaned: pre.cleaned,
            pattern,
            tokens,
            removed: pre.removed,
            ..Default::default()
        }
    }
}

/// Accumulates tokens and pattern text for one tokenize call.
struct Builder<'t> {
    tokenizer: &'t Tokenizer,
    tokens: Vec<Token>,
    pattern: String,
}

impl<'t> Builder<'t> {
    fn new(tokenizer: &'t Tokenizer) -> Self {
        Self {
            tokenizer,
            tokens: Vec::new(),
            pattern: String::new(),
        }
    }

    fn group(&mut self, text: &str, start: usize, kind: TokenKind, open: &str, close: &str) {
        // Glyphs are single-byte.
        let inner = &text[1..text.len() - 1];
        let value = inner.trim();
        if value.is_empty() {
            return;
        }
        let lead = inner.len() - inner.trim_start().len();

        self.pattern.push_str(open);
        self.fragment(value, start + 1 + lead, kind);
        self.pattern.push_str(close);
    }

    fn plain(&mut self, text: &str, start: usize) {
        let mut last = 0;
        for dash in DASH_SEPARATOR.find_iter(text) {
            self.plain_part(&text[last..dash.start()], start + last);
            self.pattern.push_str(dash.as_str());
            last = dash.end();
        }
        self.plain_part(&text[last..], start + last);
    }

    fn plain_part(&mut self, part: &str, start: usize) {
        let value = part.trim();
        if value.is_empty() {
            self.pattern.push_str(part);
            return;
        }
        let lead = &part[..part.len() - part.trim_start().len()];
        let trail = &part[part.trim_end().len()..];

        self.pattern.extend(std::iter::repeat(' ').take(lead.chars().count()));
        self.fragment(value, start + lead.len(), TokenKind::Text);
        self.pattern.extend(std::iter::repeat(' ').take(trail.chars().count()));
    }

    /// Writes the placeholder for `value` and records its token unless it
    /// is junk.
    fn fragment(&mut self, value: &str, position: usize, kind: TokenKind) {
        if self.tokenizer.junk.contains(value) {
            trace!(value, "Dropping junk token");
            self.pattern.push_str(JUNK);
            return;
        }
        self.pattern.push_str(&format!("{{token{}}}", self.tokens.len()));
        let (lead, trimmed) = self.tokenizer.trimmer.trim_offset(value);
        self.tokens.push(Token::new(trimmed, kind, position + lead));
    }

    fn finish(self) -> (Vec<Token>, String) {
        (self.tokens, self.pattern.trim().to_string())
    }
}
