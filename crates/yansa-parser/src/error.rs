//! Error types for the rule layer and the template checks.
//!
//! Parsing a filename never fails. Errors only surface when rule tables are
//! read, when a studio-code pattern cannot be compiled, and when a template
//! is verified against its token list.

use crate::rules::Table;

/// Failure to read or decode a rule table.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The table could not be read from its source.
    #[error("failed to read rule table {table}: {source}")]
    Io {
        table: Table,
        #[source]
        source: std::io::Error,
    },

    /// The table was read but is not valid JSON of the expected shape.
    #[error("malformed rule table {table}: {source}")]
    Json {
        table: Table,
        #[source]
        source: serde_json::Error,
    },
}

impl RuleError {
    /// The table this error refers to.
    pub fn table(&self) -> Table {
        match self {
            Self::Io { table, .. } | Self::Json { table, .. } => *table,
        }
    }
}

/// A studio-code pattern that cannot be turned into a regex.
#[derive(Debug, thiserror::Error)]
pub enum CodePatternError {
    #[error("empty code pattern")]
    Empty,

    #[error("code pattern ends with a dangling escape")]
    TrailingEscape,

    #[error("code pattern has an unclosed optional group")]
    UnclosedGroup,

    #[error("invalid code regex: {0}")]
    Regex(#[from] regex::Error),
}

/// A pattern template that no longer mirrors its token list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Placeholder count differs from the number of numbered tokens.
    #[error("pattern has {placeholders} numbered placeholders but {tokens} tokens carry a numbered slot")]
    Count { placeholders: usize, tokens: usize },

    /// Placeholder indices are not `0..n` in left-to-right order.
    #[error("placeholder {{token{found}}} appears where {{token{expected}}} was expected")]
    OutOfOrder { expected: usize, found: usize },
}

/// Result type alias for the rule layer.
pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_display() {
        let err = RuleError::Io {
            table: Table::Studios,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read rule table studios.json: missing"
        );
        assert_eq!(err.table(), Table::Studios);
    }

    #[test]
    fn test_rule_error_json() {
        let source = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = RuleError::Json {
            table: Table::DateFormats,
            source,
        };
        assert!(err.to_string().starts_with("malformed rule table date_formats.json"));
    }

    #[test]
    fn test_template_error_display() {
        let err = TemplateError::OutOfOrder {
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "placeholder {token2} appears where {token1} was expected"
        );

        let err = TemplateError::Count {
            placeholders: 1,
            tokens: 2,
        };
        assert!(err.to_string().contains("1 numbered placeholders"));
    }

    #[test]
    fn test_code_pattern_error_from_regex() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let err = CodePatternError::from(regex_err);
        assert!(matches!(err, CodePatternError::Regex(_)));
    }
}
