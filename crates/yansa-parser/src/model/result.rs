//! The value threaded through every pipeline stage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{RemovedToken, Token, TokenKind};

/// Labeled ordinal found in a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    Scene,
    Part,
    Episode,
    Volume,
    Disc,
}

impl SequenceKind {
    /// Order in which a synthesized title picks its number.
    pub const PRIORITY: [SequenceKind; 5] = [
        SequenceKind::Scene,
        SequenceKind::Episode,
        SequenceKind::Part,
        SequenceKind::Volume,
        SequenceKind::Disc,
    ];

    /// Kinds whose marker at the end of a token usually follows a group label.
    pub fn marks_group(self) -> bool {
        !matches!(self, SequenceKind::Part)
    }
}

impl std::fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceKind::Scene => write!(f, "scene"),
            SequenceKind::Part => write!(f, "part"),
            SequenceKind::Episode => write!(f, "episode"),
            SequenceKind::Volume => write!(f, "volume"),
            SequenceKind::Disc => write!(f, "disc"),
        }
    }
}

/// Everything extracted from one filename.
///
/// `pattern` mirrors `tokens`: each token that still carries a numbered slot
/// appears as `{tokenK}` (K counting those tokens left to right), claimed
/// tokens appear as their named marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Input exactly as given.
    pub original: String,
    /// Basename after pre-tokenization.
    pub cleaned: String,
    pub pattern: String,
    pub tokens: Vec<Token>,
    /// Audit trail of the pre-tokenizer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<RemovedToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_code: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sequence: BTreeMap<SequenceKind, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ParseResult {
    /// Values of all tokens of the given kind, in order.
    pub fn values_of(&self, kind: TokenKind) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(move |t| t.kind == kind)
            .map(|t| t.value.as_str())
    }

    /// Performer names from every performer token.
    pub fn performers(&self) -> Vec<String> {
        self.values_of(TokenKind::Performers)
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Number of tokens still written as `{tokenK}`.
    pub fn numbered_len(&self) -> usize {
        self.tokens.iter().filter(|t| t.kind.is_numbered()).count()
    }
}
