//! Rule tables and the sources they are read from.
//!
//! The parser never reads files itself. Every stage is built from a
//! [`Rules`] value, which in turn is loaded through a [`RuleSource`]:
//! either the tables compiled into the crate ([`BundledRules`]) or a
//! directory of JSON files ([`DirectoryRules`]).

mod tables;

pub use tables::{
    DateFormats, DatePattern, DateShape, NormalizeFlags, ParserDictionary, StudioCodeRule,
    StudioEntry, StudioRelationship,
};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Result, RuleError};

/// The rule tables, by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ParserDictionary,
    Studios,
    StudioAliases,
    StudioCodes,
    DateFormats,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::ParserDictionary,
        Table::Studios,
        Table::StudioAliases,
        Table::StudioCodes,
        Table::DateFormats,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Table::ParserDictionary => "parser-dictionary.json",
            Table::Studios => "studios.json",
            Table::StudioAliases => "studio_aliases.json",
            Table::StudioCodes => "studio_codes.json",
            Table::DateFormats => "date_formats.json",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Read-only access to raw rule tables.
pub trait RuleSource {
    /// Returns the JSON text of `table`.
    fn read_table(&self, table: Table) -> Result<String>;
}

/// Tables shipped inside the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledRules;

impl RuleSource for BundledRules {
    fn read_table(&self, table: Table) -> Result<String> {
        let text = match table {
            Table::ParserDictionary => include_str!("../../dictionaries/parser-dictionary.json"),
            Table::Studios => include_str!("../../dictionaries/studios.json"),
            Table::StudioAliases => include_str!("../../dictionaries/studio_aliases.json"),
            Table::StudioCodes => include_str!("../../dictionaries/studio_codes.json"),
            Table::DateFormats => include_str!("../../dictionaries/date_formats.json"),
        };
        Ok(text.to_string())
    }
}

/// Tables read from `<dir>/<file name>`.
#[derive(Debug, Clone)]
pub struct DirectoryRules {
    dir: PathBuf,
}

impl DirectoryRules {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RuleSource for DirectoryRules {
    fn read_table(&self, table: Table) -> Result<String> {
        let path = self.dir.join(table.file_name());
        std::fs::read_to_string(&path).map_err(|source| RuleError::Io { table, source })
    }
}

/// Every rule table, decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    pub dictionary: ParserDictionary,
    pub studios: Vec<StudioEntry>,
    /// Override key to canonical studio name. Always matched exactly.
    pub studio_aliases: HashMap<String, String>,
    pub studio_codes: Vec<StudioCodeRule>,
    pub date_formats: DateFormats,
}

impl Rules {
    /// Loads every table, replacing any table that fails with its empty
    /// default. Each failure is logged once.
    pub fn load(source: &dyn RuleSource) -> Self {
        Self {
            dictionary: load_or_default(source, Table::ParserDictionary),
            studios: load_or_default(source, Table::Studios),
            studio_aliases: load_or_default(source, Table::StudioAliases),
            studio_codes: load_or_default(source, Table::StudioCodes),
            date_formats: load_or_default(source, Table::DateFormats),
        }
    }

    /// Loads every table, failing on the first one that cannot be read or
    /// decoded.
    pub fn try_load(source: &dyn RuleSource) -> Result<Self> {
        Ok(Self {
            dictionary: load_table(source, Table::ParserDictionary)?,
            studios: load_table(source, Table::Studios)?,
            studio_aliases: load_table(source, Table::StudioAliases)?,
            studio_codes: load_table(source, Table::StudioCodes)?,
            date_formats: load_table(source, Table::DateFormats)?,
        })
    }

    /// The tables compiled into the crate.
    pub fn bundled() -> Self {
        Self::load(&BundledRules)
    }

    /// Number of entries in each table.
    pub fn counts(&self) -> Vec<(Table, usize)> {
        vec![
            (Table::ParserDictionary, self.dictionary.len()),
            (Table::Studios, self.studios.len()),
            (Table::StudioAliases, self.studio_aliases.len()),
            (Table::StudioCodes, self.studio_codes.len()),
            (Table::DateFormats, self.date_formats.patterns.len()),
        ]
    }
}

fn load_table<T: DeserializeOwned>(source: &dyn RuleSource, table: Table) -> Result<T> {
    let text = source.read_table(table)?;
    let value = serde_json::from_str(&text).map_err(|source| RuleError::Json { table, source })?;
    debug!(table = %table, "Loaded rule table");
    Ok(value)
}

fn load_or_default<T: DeserializeOwned + Default>(source: &dyn RuleSource, table: Table) -> T {
    load_table(source, table).unwrap_or_else(|err| {
        warn!(table = %table, error = %err, "Rule table unavailable, continuing without it");
        T::default()
    })
}
