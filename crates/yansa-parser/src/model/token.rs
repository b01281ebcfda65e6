//! Tokens and their kinds.

use serde::{Deserialize, Serialize};

/// Kind of a token.
///
/// The four structural kinds (`Bracket`, `Parenthesis`, `Curly`, `Text`) are
/// produced by the tokenizer and are still unclaimed. Every other kind is
/// assigned by a later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Content of a `[...]` group.
    Bracket,
    /// Content of a `(...)` group.
    Parenthesis,
    /// Content of a `{...}` group.
    Curly,
    /// Plain text outside any group.
    Text,
    /// Normalized ISO-8601 date.
    Date,
    /// Canonical studio name.
    Studio,
    /// Normalized studio code.
    StudioCode,
    /// Comma-separated performer names.
    Performers,
    /// Token that carried a sequence marker.
    Sequence,
    /// Collection label.
    Group,
    /// Part of the title.
    Title,
}

impl TokenKind {
    /// True for the kinds no stage has claimed yet.
    pub fn is_generic(self) -> bool {
        matches!(
            self,
            TokenKind::Bracket | TokenKind::Parenthesis | TokenKind::Curly | TokenKind::Text
        )
    }

    /// Named template marker for claimed kinds that leave the numbered slots.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            TokenKind::Date => Some("{date}"),
            TokenKind::Studio => Some("{studio}"),
            TokenKind::StudioCode => Some("{studio_code}"),
            TokenKind::Performers => Some("{performers}"),
            TokenKind::Title => Some("{title}"),
            TokenKind::Bracket
            | TokenKind::Parenthesis
            | TokenKind::Curly
            | TokenKind::Text
            | TokenKind::Sequence
            | TokenKind::Group => None,
        }
    }

    /// True when the token is written as `{tokenK}` in the pattern.
    pub fn is_numbered(self) -> bool {
        self.marker().is_none()
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Bracket => "bracket",
            TokenKind::Parenthesis => "parenthesis",
            TokenKind::Curly => "curly",
            TokenKind::Text => "text",
            TokenKind::Date => "date",
            TokenKind::Studio => "studio",
            TokenKind::StudioCode => "studio_code",
            TokenKind::Performers => "performers",
            TokenKind::Sequence => "sequence",
            TokenKind::Group => "group",
            TokenKind::Title => "title",
        };
        f.write_str(name)
    }
}

/// A fragment of the cleaned filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Byte offset of the value in the cleaned filename.
    pub position: usize,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind, position: usize) -> Self {
        Self {
            value: value.into(),
            kind,
            position,
        }
    }

    /// Whether this token can still be claimed by a stage.
    pub fn is_generic(&self) -> bool {
        self.kind.is_generic()
    }
}
