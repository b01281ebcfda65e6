use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use yansa_parser::config::ParserConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Directory holding the JSON rule tables. The bundled tables are used
    /// when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Worker threads for batch parsing (0 = one per core)
    #[serde(default)]
    pub threads: usize,
}
