//! The extraction pipeline.
//!
//! ```text
//! filename -> PreTokenizer -> Tokenizer -> DateExtractor -> StudioMatcher
//!          -> (existing studio) -> StudioCodeFinder -> PerformerMatcher
//!          -> FinalStageExtractor -> ParseResult
//! ```
//!
//! Every stage after the tokenizer takes a [`ParseResult`] by value and
//! returns the next one.

pub mod code_pattern;
mod date;
mod final_stage;
mod performer;
mod pre_tokenize;
mod studio;
mod studio_code;

pub use date::DateExtractor;
pub use final_stage::FinalStageExtractor;
pub use performer::PerformerMatcher;
pub use pre_tokenize::{PreTokenized, PreTokenizer};
pub use studio::StudioMatcher;
pub use studio_code::{normalize_code, StudioCodeFinder};

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::ParserConfig;
use crate::lexer::Tokenizer;
use crate::model::ParseResult;
use crate::rules::Rules;

/// Pipeline stages that produce a [`ParseResult`], in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Tokenize,
    Dates,
    Studios,
    StudioCodes,
    Performers,
    Final,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Tokenize,
        Stage::Dates,
        Stage::Studios,
        Stage::StudioCodes,
        Stage::Performers,
        Stage::Final,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Tokenize => "tokenize",
            Stage::Dates => "dates",
            Stage::Studios => "studios",
            Stage::StudioCodes => "studio_codes",
            Stage::Performers => "performers",
            Stage::Final => "final",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A configured filename parser.
///
/// All stages are built once from the rule tables. The parser holds no
/// mutable state and can be shared between threads.
///
/// ```
/// use yansa_parser::{Parser, Rules};
/// use yansa_parser::config::ParserConfig;
///
/// let parser = Parser::new(&Rules::bundled(), ParserConfig::default());
/// let result = parser.parse("Active Duty - Scene Title.mp4", None);
/// assert_eq!(result.studio.as_deref(), Some("Active Duty"));
/// assert_eq!(result.title.as_deref(), Some("Scene Title"));
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    pre_tokenizer: PreTokenizer,
    tokenizer: Tokenizer,
    dates: DateExtractor,
    studios: StudioMatcher,
    studio_codes: StudioCodeFinder,
    performers: PerformerMatcher,
    final_stage: FinalStageExtractor,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(&Rules::bundled(), ParserConfig::default())
    }
}

impl Parser {
    pub fn new(rules: &Rules, config: ParserConfig) -> Self {
        Self {
            pre_tokenizer: PreTokenizer::new(rules, &config),
            tokenizer: Tokenizer::new(rules),
            dates: DateExtractor::new(rules),
            studios: StudioMatcher::new(rules),
            studio_codes: StudioCodeFinder::new(rules),
            performers: PerformerMatcher::new(rules),
            final_stage: FinalStageExtractor::new(rules),
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one filename.
    ///
    /// `existing_studio` is used when the filename itself names no studio.
    /// It lets studio-code rules that require a studio fire.
    pub fn parse(&self, filename: &str, existing_studio: Option<&str>) -> ParseResult {
        self.run(filename, existing_studio, |_, _| {})
    }

    /// Parses one filename and returns the result after every stage.
    pub fn stages(
        &self,
        filename: &str,
        existing_studio: Option<&str>,
    ) -> Vec<(Stage, ParseResult)> {
        let mut snapshots = Vec::with_capacity(Stage::ALL.len());
        self.run(filename, existing_studio, |stage, result| {
            snapshots.push((stage, result.clone()));
        });
        snapshots
    }

    fn run(
        &self,
        filename: &str,
        existing_studio: Option<&str>,
        mut observe: impl FnMut(Stage, &ParseResult),
    ) -> ParseResult {
        let pre = self.pre_tokenizer.process(filename);

        let result = self.tokenizer.tokenize(pre);
        observe(Stage::Tokenize, &result);

        let result = self.dates.process(result);
        observe(Stage::Dates, &result);

        let mut result = self.studios.process(result);
        observe(Stage::Studios, &result);

        if result.studio.is_none() {
            if let Some(studio) = existing_studio.filter(|s| !self.config.is_unknown_studio(s)) {
                debug!(studio, "Using existing studio");
                result.studio = Some(studio.trim().to_string());
            }
        }

        let result = self.studio_codes.process(result);
        observe(Stage::StudioCodes, &result);

        let result = self.performers.process(result);
        observe(Stage::Performers, &result);

        let result = self.final_stage.process(result);
        observe(Stage::Final, &result);

        debug!(
            filename,
            pattern = %result.pattern,
            studio = ?result.studio,
            title = ?result.title,
            "Parsed filename"
        );
        result
    }
}
