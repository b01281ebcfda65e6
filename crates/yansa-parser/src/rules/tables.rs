//! Serde shapes of the rule tables.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Contents of `parser-dictionary.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserDictionary {
    #[serde(default)]
    pub trimming_strings: Vec<String>,
    #[serde(default)]
    pub replace_with_dash: Vec<String>,
    #[serde(default)]
    pub junk_tokens: Vec<String>,
    /// Known file extensions, without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub resolution_markers: Vec<String>,
    #[serde(default)]
    pub quality_markers: Vec<String>,
    #[serde(default)]
    pub source_markers: Vec<String>,
    #[serde(default)]
    pub format_markers: Vec<String>,
    #[serde(default)]
    pub misc_markers: Vec<String>,
    /// Words that rule out a performer list.
    #[serde(default)]
    pub non_performer_words: Vec<String>,
}

impl ParserDictionary {
    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        [
            &self.trimming_strings,
            &self.replace_with_dash,
            &self.junk_tokens,
            &self.extensions,
            &self.resolution_markers,
            &self.quality_markers,
            &self.source_markers,
            &self.format_markers,
            &self.misc_markers,
            &self.non_performer_words,
        ]
        .iter()
        .map(|v| v.len())
        .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One row of `studios.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioEntry {
    pub canonical_name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub abbr: Vec<String>,
    /// Keys of this studio never match as a substring.
    #[serde(default)]
    pub exact_only: bool,
}

/// How a studio-code rule relates to the studio already known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum StudioRelationship {
    /// Only active when the current studio equals the rule's studio, or,
    /// for a rule without one, when any studio is known.
    Requires,
    /// Always active; may set the studio when none is known.
    #[default]
    CanSet,
}

impl From<Option<String>> for StudioRelationship {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "requires" => StudioRelationship::Requires,
            _ => StudioRelationship::CanSet,
        }
    }
}

/// Normalization steps applied to a captured code, in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeFlags {
    /// `"NNN NN"` becomes the left part padded to five digits plus the right.
    pub normalize_numeric_pair: bool,
    pub strip_prefix_letters: bool,
    pub replace_underscores_with_dash: bool,
    pub digits_only: bool,
    pub strip_leading_zeros: bool,
    pub uppercase: bool,
}

/// One row of `studio_codes.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioCodeRule {
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub studio_relationship: StudioRelationship,
    #[serde(default)]
    pub allow_suffix: bool,
    #[serde(default)]
    pub normalize: NormalizeFlags,
    #[serde(default, deserialize_with = "one_or_many")]
    pub code_patterns: Vec<String>,
    /// Capture group holding the code. Defaults to 1 with `allow_suffix`,
    /// 0 otherwise.
    #[serde(default)]
    pub code_group: Option<usize>,
}

impl StudioCodeRule {
    pub fn code_group(&self) -> usize {
        self.code_group
            .unwrap_or(if self.allow_suffix { 1 } else { 0 })
    }
}

/// Contents of `date_formats.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateFormats {
    /// Substituted for the literal `MONTH_PATTERN` in every regex.
    #[serde(default)]
    pub month_pattern: String,
    /// Lower-case month name to month number.
    #[serde(default)]
    pub month_names: HashMap<String, String>,
    #[serde(default)]
    pub patterns: Vec<DatePattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePattern {
    pub regex: String,
    #[serde(rename = "type", default)]
    pub shape: DateShape,
}

/// Which named groups a date regex provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateShape {
    /// `year`, `month`, `day`.
    Iso,
    Compact,
    UsDate,
    /// `day`, `month_name`, `year`.
    DayMonthYear,
    MonthDayYear,
    ParenthesizedMonthDayYear,
    CompactMonthName,
    /// `year` only.
    Year,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
    Null(()),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    };
    Ok(values
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studio_entry_accepts_string_or_list() {
        let entry: StudioEntry = serde_json::from_str(
            r#"{"canonical_name": "Active Duty", "abbr": "AD", "aliases": ["ActiveDuty", ""]}"#,
        )
        .unwrap();
        assert_eq!(entry.abbr, vec!["AD"]);
        assert_eq!(entry.aliases, vec!["ActiveDuty"]);
        assert!(!entry.exact_only);

        let entry: StudioEntry =
            serde_json::from_str(r#"{"canonical_name": "X", "aliases": null}"#).unwrap();
        assert!(entry.aliases.is_empty());
    }

    #[test]
    fn test_relationship_defaults_to_can_set() {
        let rule: StudioCodeRule =
            serde_json::from_str(r#"{"studio_relationship": " Requires ", "code_patterns": "AD####"}"#)
                .unwrap();
        assert_eq!(rule.studio_relationship, StudioRelationship::Requires);
        assert_eq!(rule.code_patterns, vec!["AD####"]);

        let rule: StudioCodeRule =
            serde_json::from_str(r#"{"studio_relationship": "sometimes"}"#).unwrap();
        assert_eq!(rule.studio_relationship, StudioRelationship::CanSet);

        let rule: StudioCodeRule = serde_json::from_str("{}").unwrap();
        assert_eq!(rule.studio_relationship, StudioRelationship::CanSet);
    }

    #[test]
    fn test_code_group_default() {
        let mut rule = StudioCodeRule::default();
        assert_eq!(rule.code_group(), 0);
        rule.allow_suffix = true;
        assert_eq!(rule.code_group(), 1);
        rule.code_group = Some(2);
        assert_eq!(rule.code_group(), 2);
    }

    #[test]
    fn test_unknown_date_shape() {
        let pattern: DatePattern =
            serde_json::from_str(r#"{"regex": "x", "type": "lunar"}"#).unwrap();
        assert_eq!(pattern.shape, DateShape::Unknown);

        let pattern: DatePattern =
            serde_json::from_str(r#"{"regex": "x", "type": "us_date"}"#).unwrap();
        assert_eq!(pattern.shape, DateShape::UsDate);
    }

    #[test]
    fn test_dictionary_missing_sections() {
        let dict: ParserDictionary =
            serde_json::from_str(r#"{"junk_tokens": ["x"]}"#).unwrap();
        assert_eq!(dict.junk_tokens, vec!["x"]);
        assert!(dict.extensions.is_empty());
        assert_eq!(dict.len(), 1);
    }
}
