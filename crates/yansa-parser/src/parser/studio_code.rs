//! Studio-specific code extraction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::code_pattern;
use crate::model::{ParseResult, Token, TokenKind};
use crate::rules::{NormalizeFlags, Rules, StudioRelationship};
use crate::template::{self, Edits, Replacement};

static NUMERIC_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3,5})\s+(\d{2})$").expect("numeric pair regex is valid"));
static PREFIX_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+[-_\s]*").expect("prefix regex is valid"));

#[derive(Debug, Clone)]
struct CompiledRule {
    studio: Option<String>,
    relationship: StudioRelationship,
    normalize: NormalizeFlags,
    code_group: usize,
    patterns: Vec<Regex>,
}

impl CompiledRule {
    fn active(&self, current: Option<&str>) -> bool {
        match (self.relationship, self.studio.as_deref()) {
            (StudioRelationship::Requires, Some(owner)) => {
                current.is_some_and(|studio| studio.trim().eq_ignore_ascii_case(owner))
            }
            // An ownerless rule still needs some studio to be known.
            (StudioRelationship::Requires, None) => {
                current.is_some_and(|studio| !studio.trim().is_empty())
            }
            (StudioRelationship::CanSet, _) => true,
        }
    }
}

/// A code found in one token.
struct Found<'r> {
    rule: &'r CompiledRule,
    code: String,
    /// Byte offset in the token value where the remainder starts.
    remainder: Option<(usize, String)>,
}

/// Matches studio-code rules against whole tokens.
#[derive(Debug, Clone, Default)]
pub struct StudioCodeFinder {
    rules: Vec<CompiledRule>,
}

impl StudioCodeFinder {
    pub fn new(rules: &Rules) -> Self {
        let compiled = rules
            .studio_codes
            .iter()
            .filter_map(|rule| {
                let patterns: Vec<Regex> = rule
                    .code_patterns
                    .iter()
                    .filter_map(|pattern| match code_pattern::compile(pattern, rule.allow_suffix) {
                        Ok(regex) => Some(regex),
                        Err(err) => {
                            warn!(pattern = %pattern, error = %err, "Skipping invalid code pattern");
                            None
                        }
                    })
                    .collect();
                (!patterns.is_empty()).then(|| CompiledRule {
                    studio: rule
                        .studio
                        .as_deref()
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                    relationship: rule.studio_relationship,
                    normalize: rule.normalize,
                    code_group: rule.code_group(),
                    patterns,
                })
            })
            .collect();

        Self { rules: compiled }
    }

    pub fn process(&self, mut result: ParseResult) -> ParseResult {
        let mut edits = Edits::new();

        for (index, token) in result.tokens.iter().enumerate() {
            if !token.is_generic() {
                continue;
            }
            let Some(found) = self.find(token, result.studio.as_deref()) else {
                continue;
            };
            debug!(value = %token.value, code = %found.code, "Extracted studio code");

            if result.studio.is_none() {
                if let Some(studio) = &found.rule.studio {
                    result.studio = Some(studio.clone());
                }
            }
            result.studio_code.get_or_insert_with(|| found.code.clone());

            let mut parts = vec![Token::new(found.code, TokenKind::StudioCode, token.position)];
            if let Some((offset, rest)) = found.remainder {
                parts.push(Token::new(rest, TokenKind::Text, token.position + offset));
            }
            edits.insert(index, Replacement::new(parts, " "));
        }

        template::rewrite(result, edits)
    }

    fn find<'r>(&'r self, token: &Token, current: Option<&str>) -> Option<Found<'r>> {
        let value = token.value.trim();
        let lead = token.value.len() - token.value.trim_start().len();

        for rule in self.rules.iter().filter(|rule| rule.active(current)) {
            for regex in &rule.patterns {
                let Some(caps) = regex.captures(value) else {
                    continue;
                };
                let Some(code_match) = caps.get(rule.code_group).or_else(|| caps.get(0)) else {
                    continue;
                };
                let raw = code_match.as_str();
                let normalized = normalize_code(raw, &rule.normalize);
                let code = if normalized.is_empty() {
                    raw.to_string()
                } else {
                    normalized
                };

                let tail = &value[code_match.end()..];
                let rest = tail.trim_start_matches(|c: char| !c.is_alphanumeric());
                let remainder = (!rest.trim().is_empty()).then(|| {
                    let offset = lead + code_match.end() + (tail.len() - rest.len());
                    (offset, rest.trim().to_string())
                });

                return Some(Found {
                    rule,
                    code,
                    remainder,
                });
            }
        }
        None
    }
}

/// Applies the enabled normalization steps in order.
pub fn normalize_code(raw: &str, flags: &NormalizeFlags) -> String {
    let mut code = raw.trim().to_string();

    if flags.normalize_numeric_pair {
        if let Some(caps) = NUMERIC_PAIR.captures(&code) {
            return format!("{:0>5}{}", &caps[1], &caps[2]);
        }
    }
    if flags.strip_prefix_letters {
        code = PREFIX_LETTERS.replace(&code, "").into_owned();
    }
    if flags.replace_underscores_with_dash {
        code = code.replace(['_', ' '], "-");
    }
    if flags.digits_only {
        code.retain(|c| c.is_ascii_digit());
    }
    if flags.strip_leading_zeros {
        let stripped = code.trim_start_matches('0');
        code = if stripped.is_empty() && !code.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        };
    }
    if flags.uppercase {
        code = code.to_uppercase();
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Tokenizer;
    use crate::parser::PreTokenized;

    fn run(cleaned: &str, studio: Option<&str>) -> ParseResult {
        let rules = Rules::bundled();
        let mut tokens = Tokenizer::new(&rules).tokenize(PreTokenized::unchanged(cleaned));
        tokens.studio = studio.map(str::to_string);
        let result = StudioCodeFinder::new(&rules).process(tokens);
        assert!(template::verify(&result).is_ok(), "{}", result.pattern);
        result
    }

    #[test]
    fn test_numeric_pair_with_remainder() {
        let result = run(
            "8492 02 Glory Hole Breeders, Scene #02 (Devil, Tom Ryan)",
            Some("Scary Fuckers"),
        );
        assert_eq!(result.studio_code.as_deref(), Some("0849202"));
        assert_eq!(result.pattern, "{studio_code} {token0} ({token1})");
        assert_eq!(result.tokens[1].value, "Glory Hole Breeders, Scene #02");
        assert_eq!(result.tokens[1].kind, TokenKind::Text);
        assert_eq!(result.tokens[1].position, 8);
    }

    #[test]
    fn test_requires_rule_inactive_without_studio() {
        let result = run("8492 02 Glory Hole", None);
        assert!(result.studio_code.is_none());
        assert_eq!(result.pattern, "{token0}");

        let result = run("8492 02 Glory Hole", Some("Sean Cody"));
        assert!(result.studio_code.is_none());
    }

    #[test]
    fn test_bracket_remainder_is_text() {
        let result = run("[sc0412 Jake Bold]", Some("Sean Cody"));
        assert_eq!(result.studio_code.as_deref(), Some("0412"));
        assert_eq!(result.pattern, "[{studio_code} {token0}]");
        assert_eq!(result.tokens[0].kind, TokenKind::StudioCode);
        assert_eq!(result.tokens[1].value, "Jake Bold");
        assert_eq!(result.tokens[1].kind, TokenKind::Text);
        assert_eq!(result.tokens[1].position, 8);
    }

    #[test]
    fn test_ownerless_requires_rule_needs_a_studio() {
        let mut rules = Rules::default();
        rules.studio_codes = vec![crate::rules::StudioCodeRule {
            studio_relationship: StudioRelationship::Requires,
            code_patterns: vec!["AB####".into()],
            ..Default::default()
        }];
        let finder = StudioCodeFinder::new(&rules);
        let tokenize = |studio: Option<&str>| {
            let mut tokens = Tokenizer::new(&rules).tokenize(PreTokenized::unchanged("AB1234"));
            tokens.studio = studio.map(str::to_string);
            finder.process(tokens)
        };

        assert!(tokenize(None).studio_code.is_none());
        assert!(tokenize(Some("  ")).studio_code.is_none());

        let result = tokenize(Some("Anyone"));
        assert_eq!(result.studio_code.as_deref(), Some("AB1234"));
        assert_eq!(result.studio.as_deref(), Some("Anyone"));
    }

    #[test]
    fn test_requires_rule_case_insensitive() {
        let result = run("sc-0412 - Jake", Some("sean cody"));
        assert_eq!(result.studio_code.as_deref(), Some("0412"));
        assert_eq!(result.pattern, "{studio_code} - {token0}");
    }

    #[test]
    fn test_can_set_rule_sets_studio() {
        let result = run("[ad1234] Some Title", None);
        assert_eq!(result.studio_code.as_deref(), Some("AD1234"));
        assert_eq!(result.studio.as_deref(), Some("Active Duty"));
        assert_eq!(result.pattern, "[{studio_code}] {token0}");
    }

    #[test]
    fn test_can_set_keeps_existing_studio() {
        let result = run("AD1234", Some("Someone Else"));
        assert_eq!(result.studio.as_deref(), Some("Someone Else"));
        assert_eq!(result.studio_code.as_deref(), Some("AD1234"));
    }

    #[test]
    fn test_first_code_recorded() {
        let result = run("AD1234 - AD5678", None);
        assert_eq!(result.studio_code.as_deref(), Some("AD1234"));
        assert_eq!(result.pattern, "{studio_code} - {studio_code}");
    }

    #[test]
    fn test_no_partial_match() {
        let result = run("AD123 Title", None);
        assert!(result.studio_code.is_none());
    }

    #[test]
    fn test_normalize_steps() {
        let flags = NormalizeFlags {
            strip_prefix_letters: true,
            digits_only: true,
            ..Default::default()
        };
        assert_eq!(normalize_code("SC-0412", &flags), "0412");

        let flags = NormalizeFlags {
            strip_leading_zeros: true,
            ..Default::default()
        };
        assert_eq!(normalize_code("00412", &flags), "412");
        assert_eq!(normalize_code("000", &flags), "0");

        let flags = NormalizeFlags {
            replace_underscores_with_dash: true,
            uppercase: true,
            ..Default::default()
        };
        assert_eq!(normalize_code("ab_12 c", &flags), "AB-12-C");

        let flags = NormalizeFlags {
            normalize_numeric_pair: true,
            uppercase: true,
            ..Default::default()
        };
        assert_eq!(normalize_code("849 02", &flags), "0084902");
    }

    #[test]
    fn test_empty_normalized_code_falls_back_to_raw() {
        let mut rules = Rules::default();
        rules.studio_codes = vec![crate::rules::StudioCodeRule {
            code_patterns: vec!["re:[a-z]+".into()],
            normalize: NormalizeFlags {
                digits_only: true,
                ..Default::default()
            },
            ..Default::default()
        }];
        let tokens = Tokenizer::new(&rules).tokenize(PreTokenized::unchanged("abc"));
        let result = StudioCodeFinder::new(&rules).process(tokens);
        assert_eq!(result.studio_code.as_deref(), Some("abc"));
        assert!(result.studio.is_none());
    }

    #[test]
    fn test_invalid_patterns_skipped() {
        let mut rules = Rules::default();
        rules.studio_codes = vec![crate::rules::StudioCodeRule {
            code_patterns: vec!["AB(##".into(), "".into()],
            ..Default::default()
        }];
        assert!(StudioCodeFinder::new(&rules).rules.is_empty());
    }
}
