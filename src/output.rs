//! Text rendering for parse results.

use std::fmt::Write;
use yansa_parser::{ParseResult, Stage};

/// Human-readable summary. Only fields that were found are listed.
pub fn summary(result: &ParseResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {}", result.original);
    let _ = writeln!(out, "Pattern: {}", result.pattern);

    let fields = [
        ("Studio", &result.studio),
        ("Studio code", &result.studio_code),
        ("Date", &result.date),
        ("Group", &result.group),
        ("Title", &result.title),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "{}: {}", label, value);
        }
    }

    let performers = result.performers();
    if !performers.is_empty() {
        let _ = writeln!(out, "Performers: {}", performers.join(", "));
    }

    if !result.sequence.is_empty() {
        let sequence: Vec<String> = result
            .sequence
            .iter()
            .map(|(kind, n)| format!("{} {}", kind, n))
            .collect();
        let _ = writeln!(out, "Sequence: {}", sequence.join(", "));
    }

    if !result.removed.is_empty() {
        let _ = writeln!(out, "Removed:");
        for removed in &result.removed {
            let _ = writeln!(
                out,
                "  {} ({}) at {}",
                removed.value, removed.category, removed.position
            );
        }
    }

    out
}

/// One block per pipeline stage: the pattern, then every token.
pub fn trace(original: &str, stages: &[(Stage, ParseResult)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "File: {}", original);
    if let Some((_, first)) = stages.first() {
        let _ = writeln!(out, "Cleaned: {}", first.cleaned);
    }

    for (stage, result) in stages {
        let _ = writeln!(out, "\n[{}] {}", stage, result.pattern);
        for (i, token) in result.tokens.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<12} {:?} @{}",
                i, token.kind, token.value, token.position
            );
        }
    }

    out
}
