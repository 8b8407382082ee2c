//! Line classifier: turns config text into a [`ConfDocument`]
//!
//! The scan is a single forward pass. The only state carried between lines
//! is the name of the section opened by the most recent `[name]` header.

use std::fs;
use std::path::Path;

use super::document::ConfDocument;
use super::error::{ConfError, Result};

/// What to do with a content line that appears before the first header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    /// Fail with [`ConfError::OrphanLine`]
    #[default]
    Reject,
    /// Drop the line and log a warning
    Discard,
}

/// Parser settings
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub orphans: OrphanPolicy,
}

impl ParseOptions {
    /// Options that discard orphan lines instead of failing
    pub fn lenient() -> Self {
        Self {
            orphans: OrphanPolicy::Discard,
        }
    }
}

/// How one line is routed
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header(&'a str),
    Assignment(&'a str, &'a str),
    Raw(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
        return Line::Header(&line[1..line.len() - 1]);
    }
    match line.split_once('=') {
        Some((key, value)) => Line::Assignment(key.trim(), value.trim()),
        None => Line::Raw(line),
    }
}

/// Blank lines and whole-line comments may precede the first header
fn is_preamble(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Parse config text with default options
pub fn parse_str(text: &str) -> Result<ConfDocument> {
    parse_with(text, ParseOptions::default())
}

/// Parse config text
pub fn parse_with(text: &str, options: ParseOptions) -> Result<ConfDocument> {
    let mut doc = ConfDocument::new();
    let mut current: Option<&str> = None;

    for (index, line) in text.lines().enumerate() {
        match (classify(line), current) {
            (Line::Header(name), _) => {
                doc.section_mut(name);
                current = Some(name);
            }
            (Line::Assignment(key, value), Some(section)) => {
                doc.set(section, key, value);
            }
            (Line::Raw(raw), Some(section)) => {
                doc.section_mut(section).push_raw(raw.to_string());
            }
            (_, None) if is_preamble(line) => {}
            (_, None) => match options.orphans {
                OrphanPolicy::Reject => {
                    return Err(ConfError::OrphanLine {
                        line: index + 1,
                        text: line.to_string(),
                    });
                }
                OrphanPolicy::Discard => {
                    tracing::warn!("Ignoring line {} outside any section: {:?}", index + 1, line);
                }
            },
        }
    }

    Ok(doc)
}

/// Read and parse a config file with default options
pub fn parse(path: &Path) -> Result<ConfDocument> {
    parse_file_with(path, ParseOptions::default())
}

/// Read and parse a config file
pub fn parse_file_with(path: &Path, options: ParseOptions) -> Result<ConfDocument> {
    let text = fs::read_to_string(path).map_err(|e| ConfError::io(path, e))?;
    let doc = parse_with(&text, options)?;
    tracing::debug!(
        "Parsed {} ({} sections)",
        path.display(),
        doc.sections().count()
    );
    Ok(doc)
}
