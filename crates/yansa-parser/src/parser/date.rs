//! Date extraction.

use std::collections::HashMap;

use regex::{Captures, Regex, RegexBuilder};
use tracing::{debug, trace, warn};

use crate::model::{ParseResult, Token, TokenKind};
use crate::rules::{DateShape, Rules};
use crate::template::{self, Edits, Replacement};

const MONTH_PLACEHOLDER: &str = "MONTH_PATTERN";

/// Finds the first date in each unclaimed token and splits it out as a
/// `date` token holding `YYYY-MM-DD` (or `YYYY` for a bare year).
#[derive(Debug, Clone, Default)]
pub struct DateExtractor {
    patterns: Vec<(Regex, DateShape)>,
    month_names: HashMap<String, String>,
}

impl DateExtractor {
    pub fn new(rules: &Rules) -> Self {
        let formats = &rules.date_formats;
        let mut patterns = Vec::with_capacity(formats.patterns.len());
        for pattern in &formats.patterns {
            if pattern.regex.trim().is_empty() {
                continue;
            }
            let source = pattern.regex.replace(MONTH_PLACEHOLDER, &formats.month_pattern);
            match RegexBuilder::new(&source).case_insensitive(true).build() {
                Ok(regex) => patterns.push((regex, pattern.shape)),
                Err(err) => warn!(regex = %pattern.regex, error = %err, "Skipping invalid date pattern"),
            }
        }

        Self {
            patterns,
            month_names: formats
                .month_names
                .iter()
                .map(|(name, number)| (name.trim().to_lowercase(), number.trim().to_string()))
                .collect(),
        }
    }

    pub fn process(&self, mut result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();

        for (index, token) in result.tokens.iter().enumerate() {
            if !token.is_generic() {
                continue;
            }
            let Some((caps, shape)) = self.first_match(&token.value) else {
                continue;
            };
            let Some(date) = self.normalize(&caps, shape) else {
                trace!(value = %token.value, ?shape, "Date candidate failed to normalize");
                continue;
            };
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            debug!(value = %token.value, date = %date, "Extracted date");

            if result.date.is_none() {
                result.date = Some(date.clone());
            }
            edits.insert(index, split(token, whole, date));
        }

        template::rewrite(result, edits)
    }

    /// The first rule whose regex matches anywhere wins.
    fn first_match<'v>(&self, value: &'v str) -> Option<(Captures<'v>, DateShape)> {
        self.patterns
            .iter()
            .find_map(|(regex, shape)| regex.captures(value).map(|caps| (caps, *shape)))
    }

    fn normalize(&self, caps: &Captures<'_>, shape: DateShape) -> Option<String> {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());
        match shape {
            DateShape::Iso | DateShape::Compact | DateShape::UsDate => Some(format!(
                "{}-{}-{}",
                group("year")?,
                pad(group("month")?),
                pad(group("day")?)
            )),
            DateShape::DayMonthYear
            | DateShape::MonthDayYear
            | DateShape::ParenthesizedMonthDayYear
            | DateShape::CompactMonthName => {
                let month = self.month_number(group("month_name")?)?;
                Some(format!("{}-{}-{}", group("year")?, month, pad(group("day")?)))
            }
            DateShape::Year => group("year").map(str::to_string),
            DateShape::Unknown => None,
        }
    }

    fn month_number(&self, name: &str) -> Option<String> {
        self.month_names
            .get(&name.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .map(|n| pad(n))
    }
}

fn pad(number: &str) -> String {
    format!("{number:0>2}")
}

/// Splits `token` into leading remainder, date and trailing remainder.
fn split(token: &Token, date_range: std::ops::Range<usize>, date: String) -> Replacement {
    let value = token.value.as_str();
    let before = value[..date_range.start].trim();
    let after = value[date_range.end..].trim();

    let mut parts = Vec::with_capacity(3);
    if !before.is_empty() {
        parts.push(Token::new(before, token.kind, token.position));
    }
    parts.push(Token::new(date, TokenKind::Date, token.position + date_range.start));
    if !after.is_empty() {
        parts.push(Token::new(after, token.kind, token.position + date_range.end));
    }
    Replacement::new(parts, " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Tokenizer;
    use crate::parser::PreTokenized;

    fn run(rules: &Rules, cleaned: &str) -> ParseResult {
        let tokens = Tokenizer::new(rules).tokenize(PreTokenized::unchanged(cleaned));
        DateExtractor::new(rules).process(tokens)
    }

    fn first_date(cleaned: &str) -> Option<String> {
        run(&Rules::bundled(), cleaned)
            .tokens
            .into_iter()
            .find(|t| t.kind == TokenKind::Date)
            .map(|t| t.value)
    }

    #[test]
    fn test_leading_compact_date() {
        let result = run(&Rules::bundled(), "20200101 Happy times");
        assert_eq!(result.pattern, "{date} {token0}");
        assert_eq!(result.date.as_deref(), Some("2020-01-01"));
        assert_eq!(result.tokens[0].value, "2020-01-01");
        assert_eq!(result.tokens[1].value, "Happy times");
        assert_eq!(result.tokens[1].position, 8);
        assert!(template::verify(&result).is_ok());
    }

    #[test]
    fn test_date_shapes() {
        assert_eq!(first_date("2020-01-15 Happy times").as_deref(), Some("2020-01-15"));
        assert_eq!(first_date("Scene (Dec 25, 2020)").as_deref(), Some("2020-12-25"));
        assert_eq!(first_date("01-05-2019 Sample").as_deref(), Some("2019-01-05"));
        assert_eq!(first_date("15 January 2021 Something").as_deref(), Some("2021-01-15"));
        assert_eq!(first_date("20200102 Title").as_deref(), Some("2020-01-02"));
        assert_eq!(first_date("Party 2019.7.4 Night").as_deref(), Some("2019-07-04"));
        assert_eq!(first_date("Live March 3rd, 2018").as_deref(), Some("2018-03-03"));
        assert_eq!(first_date("Pride 2019").as_deref(), Some("2019"));
        assert_eq!(first_date("No date here"), None);
    }

    #[test]
    fn test_middle_date_shifts_indices() {
        let result = run(&Rules::bundled(), "[Studio] Before 2020-05-06 After - Tail");
        assert_eq!(
            result.pattern,
            "[{token0}] {token1} {date} {token2} - {token3}"
        );
        assert!(template::verify(&result).is_ok());
    }

    #[test]
    fn test_first_date_recorded() {
        let result = run(&Rules::bundled(), "2019-01-01 - 2020-02-02");
        assert_eq!(result.date.as_deref(), Some("2019-01-01"));
        assert_eq!(result.pattern, "{date} - {date}");
    }

    #[test]
    fn test_failed_normalization_discards_candidate() {
        let mut rules = Rules::bundled();
        rules.date_formats.month_names.clear();
        let result = run(&rules, "Dec 25, 2020");
        assert!(result.date.is_none());
        assert_eq!(result.pattern, "{token0}");
        assert_eq!(result.tokens[0].kind, TokenKind::Text);
    }

    #[test]
    fn test_invalid_regex_skipped() {
        let mut rules = Rules::bundled();
        rules.date_formats.patterns.insert(
            0,
            crate::rules::DatePattern {
                regex: "(unclosed".into(),
                shape: DateShape::Year,
            },
        );
        let extractor = DateExtractor::new(&rules);
        assert_eq!(extractor.patterns.len(), rules.date_formats.patterns.len() - 1);
    }

    #[test]
    fn test_claimed_tokens_ignored() {
        let result = ParseResult {
            pattern: "{studio}".into(),
            tokens: vec![Token::new("2020", TokenKind::Studio, 0)],
            ..Default::default()
        };
        let out = DateExtractor::new(&Rules::bundled()).process(result.clone());
        assert_eq!(out, result);
    }
}
