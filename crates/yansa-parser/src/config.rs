//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Placeholder studio value that callers pass when the studio is not known.
pub const DEFAULT_UNKNOWN_STUDIO: &str = "unknown";

/// Configuration for the parser.
///
/// Use the builder pattern to create a configuration:
///
/// ```
/// use yansa_parser::config::ParserConfig;
///
/// let config = ParserConfig::builder()
///     .strip_extensions(false)
///     .unknown_studio("n/a")
///     .build();
/// assert!(config.decode_html_entities);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Whether to decode `&amp;`-style references during normalization.
    /// Default: true
    pub decode_html_entities: bool,

    /// Whether to remove a trailing known file extension.
    /// Default: true
    pub strip_extensions: bool,

    /// Existing-studio value treated as "no studio". Compared
    /// case-insensitively after trimming.
    /// Default: "unknown"
    pub unknown_studio: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            decode_html_entities: true,
            strip_extensions: true,
            unknown_studio: DEFAULT_UNKNOWN_STUDIO.to_string(),
        }
    }
}

impl ParserConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }

    /// True when `studio` carries no information: blank or the configured
    /// placeholder.
    pub fn is_unknown_studio(&self, studio: &str) -> bool {
        let studio = studio.trim();
        studio.is_empty() || studio.eq_ignore_ascii_case(self.unknown_studio.trim())
    }
}

/// Builder for `ParserConfig`.
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    decode_html_entities: Option<bool>,
    strip_extensions: Option<bool>,
    unknown_studio: Option<String>,
}

impl ParserConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether HTML character references are decoded.
    pub fn decode_html_entities(mut self, enabled: bool) -> Self {
        self.decode_html_entities = Some(enabled);
        self
    }

    /// Set whether known file extensions are stripped.
    pub fn strip_extensions(mut self, enabled: bool) -> Self {
        self.strip_extensions = Some(enabled);
        self
    }

    /// Set the placeholder used for an unknown existing studio.
    pub fn unknown_studio(mut self, value: impl Into<String>) -> Self {
        self.unknown_studio = Some(value.into());
        self
    }

    pub fn build(self) -> ParserConfig {
        let defaults = ParserConfig::default();
        ParserConfig {
            decode_html_entities: self
                .decode_html_entities
                .unwrap_or(defaults.decode_html_entities),
            strip_extensions: self.strip_extensions.unwrap_or(defaults.strip_extensions),
            unknown_studio: self.unknown_studio.unwrap_or(defaults.unknown_studio),
        }
    }
}
