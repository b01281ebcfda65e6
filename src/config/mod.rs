mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use yansa_parser::rules::DirectoryRules;
use yansa_parser::{Parser, Rules};

/// Default config locations, in lookup order
pub const DEFAULT_PATHS: [&str; 3] = [
    "./yansa.toml",
    "~/.config/yansa/config.toml",
    "/etc/yansa/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(dir) = config.rules.dir.take() {
        config.rules.dir = Some(expand_path(&dir));
    }

    validate_config(&config)?;

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.parser.unknown_studio.trim().is_empty() {
        anyhow::bail!("parser.unknown_studio cannot be empty");
    }

    if let Some(dir) = &config.rules.dir {
        if !dir.is_dir() {
            anyhow::bail!("Rules directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}

impl Config {
    /// Rule tables from `[rules] dir`, or the bundled ones. Tables that fail
    /// to load are replaced by empty ones.
    pub fn load_rules(&self) -> Rules {
        match &self.rules.dir {
            Some(dir) => {
                tracing::info!("Loading rule tables from {:?}", dir);
                Rules::load(&DirectoryRules::new(dir))
            }
            None => Rules::bundled(),
        }
    }

    pub fn build_parser(&self) -> Parser {
        Parser::new(&self.load_rules(), self.parser.clone())
    }
}
