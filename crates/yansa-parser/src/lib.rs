//! # yansa-parser
//!
//! Extracts studio, release date, studio code, performers, sequence numbers,
//! group and title from unstructured media filenames.
//!
//! A filename is cleaned, cut into tokens, and then handed through a chain
//! of stages. Each stage claims the tokens it recognizes and rewrites the
//! pattern template that mirrors the token list, so the result always shows
//! which part of the filename became which field.
//!
//! ## Quick Start
//!
//! ```
//! use yansa_parser::parse;
//!
//! let result = parse("[Crunchboy] 23 cm entre les jambes (movie).mp4", None);
//!
//! assert_eq!(result.studio.as_deref(), Some("Crunchboy"));
//! assert_eq!(result.title.as_deref(), Some("23 cm entre les jambes"));
//! assert_eq!(result.pattern, "[{studio}] {title}");
//! ```
//!
//! ## Custom rule tables
//!
//! ```no_run
//! use yansa_parser::{Parser, Rules};
//! use yansa_parser::config::ParserConfig;
//! use yansa_parser::rules::DirectoryRules;
//!
//! let rules = Rules::load(&DirectoryRules::new("/etc/yansa/rules"));
//! let parser = Parser::new(&rules, ParserConfig::builder().strip_extensions(false).build());
//! let result = parser.parse("Sean Cody - sc1234 - Jake.mp4", Some("Sean Cody"));
//! ```

pub mod config;
pub mod error;
pub mod html;
pub mod lexer;
pub mod model;
pub mod rules;
pub mod template;

mod parser;
mod trimmer;

use std::sync::LazyLock;

pub use error::{CodePatternError, RuleError, TemplateError};
pub use lexer::Tokenizer;
pub use model::{Confidence, ParseResult, RemovedToken, SequenceKind, Token, TokenKind};
pub use parser::{
    code_pattern, normalize_code, DateExtractor, FinalStageExtractor, Parser, PerformerMatcher,
    PreTokenized, PreTokenizer, Stage, StudioCodeFinder, StudioMatcher,
};
pub use rules::Rules;
pub use trimmer::Trimmer;

static DEFAULT_PARSER: LazyLock<Parser> = LazyLock::new(Parser::default);

/// Parses a filename with the bundled rule tables and default settings.
///
/// `existing_studio` is the studio already known for the file, if any. It
/// is only used when the filename does not name a studio itself.
///
/// ```
/// use yansa_parser::parse;
///
/// let result = parse("John Smith & Jane Doe", None);
/// assert_eq!(result.performers(), vec!["John Smith", "Jane Doe"]);
/// assert_eq!(result.title.as_deref(), Some("John Smith & Jane Doe"));
/// ```
pub fn parse(filename: &str, existing_studio: Option<&str>) -> ParseResult {
    DEFAULT_PARSER.parse(filename, existing_studio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uses_bundled_rules() {
        let result = parse("Active Duty - Scene Title", None);
        assert_eq!(result.studio.as_deref(), Some("Active Duty"));
        assert_eq!(result.pattern, "{studio} - {title}");
    }

    #[test]
    fn test_parse_empty() {
        let result = parse("", None);
        assert_eq!(result.pattern, "");
        assert!(result.tokens.is_empty());
        assert!(result.title.is_none());
    }

    #[test]
    fn test_parse_from_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || parse(&format!("Title {i} - Scene {i}"), None)))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            assert_eq!(result.sequence.get(&SequenceKind::Scene), Some(&(i as u32)));
        }
    }
}
