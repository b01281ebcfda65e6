//! Yansa - media filename metadata extraction
//!
//! This library crate exposes the command-line layer for integration testing.
//! The parsing itself lives in `yansa-parser`.

pub mod batch;
pub mod config;
pub mod output;
