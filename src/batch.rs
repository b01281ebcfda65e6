//! Parallel parsing of filename lists.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::BufRead;
use yansa_parser::{ParseResult, Parser};

/// Reads newline-separated filenames. Blank lines are skipped and line
/// endings are dropped; other whitespace is kept.
pub fn read_names(reader: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read filename list")?;
        let line = line.trim_end_matches('\r');
        if !line.trim().is_empty() {
            names.push(line.to_string());
        }
    }
    Ok(names)
}

/// Parses many filenames with one shared [`Parser`].
pub struct BatchParser {
    parser: Parser,
    pool: rayon::ThreadPool,
}

impl BatchParser {
    /// `threads` of 0 lets rayon pick one worker per core.
    pub fn new(parser: Parser, threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("yansa-batch-{i}"))
            .build()
            .context("Failed to build batch thread pool")?;
        tracing::debug!("Batch pool ready with {} threads", pool.current_num_threads());
        Ok(Self { parser, pool })
    }

    /// Results come back in input order.
    pub fn parse_all(&self, names: &[String], existing_studio: Option<&str>) -> Vec<ParseResult> {
        let parser = &self.parser;
        self.pool.install(|| {
            names
                .par_iter()
                .map(|name| parser.parse(name, existing_studio))
                .collect()
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}
