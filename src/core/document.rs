//! In-memory model of a DOSBox config file
//!
//! Every section carries two independent halves: an insertion-ordered
//! `key = value` map and an ordered list of raw lines that were not
//! assignments. Both halves live in one [`Section`] so that creating or
//! removing a section always affects them together.

use indexmap::IndexMap;

use super::error::{ConfError, Result};

/// One `[name]` block of a config document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Structured entries in insertion order
    entries: IndexMap<String, String>,
    /// Lines without `=`, stored verbatim
    raw: Vec<String>,
}

impl Section {
    /// Iterate over `(key, value)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw lines in stored order
    pub fn raw_lines(&self) -> &[String] {
        &self.raw
    }

    /// Whether the section has at least one structured entry
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Whether the section holds neither entries nor raw lines
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.raw.is_empty()
    }

    pub(crate) fn push_raw(&mut self, line: String) {
        self.raw.push(line);
    }
}

/// Raw section content, accepted either as one block of text or as lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    Text(String),
    Lines(Vec<String>),
}

impl RawContent {
    fn into_lines(self) -> Vec<String> {
        match self {
            RawContent::Text(text) => text.lines().map(str::to_string).collect(),
            RawContent::Lines(lines) => lines,
        }
    }
}

impl From<&str> for RawContent {
    fn from(text: &str) -> Self {
        RawContent::Text(text.to_string())
    }
}

impl From<String> for RawContent {
    fn from(text: String) -> Self {
        RawContent::Text(text)
    }
}

impl From<Vec<String>> for RawContent {
    fn from(lines: Vec<String>) -> Self {
        RawContent::Lines(lines)
    }
}

impl From<&[&str]> for RawContent {
    fn from(lines: &[&str]) -> Self {
        RawContent::Lines(lines.iter().map(|l| l.to_string()).collect())
    }
}

/// A parsed config file: sections in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfDocument {
    sections: IndexMap<String, Section>,
}

/// Keys are case-insensitive in DOSBox; they are stored lower-cased.
fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

impl ConfDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the document has no sections at all
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section names in first-seen order
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Read access to one section
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Get or create a section, keeping first-seen order
    pub(crate) fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Remove a section with all its entries and raw lines. Absent sections are ignored.
    pub fn remove_section(&mut self, name: &str) {
        if self.sections.shift_remove(name).is_some() {
            tracing::debug!("Removed section [{}]", name);
        }
    }

    /// Drop every section that holds neither entries nor raw lines
    pub fn remove_empty_sections(&mut self) {
        self.sections.retain(|name, section| {
            let keep = !section.is_empty();
            if !keep {
                tracing::debug!("Dropping empty section [{}]", name);
            }
            keep
        });
    }

    /// Stored text for `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .entries
            .get(&normalize_key(key))
            .map(String::as_str)
    }

    /// Read a value as a boolean (`true`/`false`, any case)
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(section, key) else {
            return Ok(None);
        };
        if value.eq_ignore_ascii_case("true") {
            Ok(Some(true))
        } else if value.eq_ignore_ascii_case("false") {
            Ok(Some(false))
        } else {
            Err(ConfError::coercion(section, key, value, "boolean"))
        }
    }

    /// Read a value as a base-10 signed integer
    pub fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.get(section, key) else {
            return Ok(None);
        };
        value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ConfError::coercion(section, key, value, "integer"))
    }

    /// Insert or replace a value. New keys are appended; existing keys keep their position.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.section_mut(section)
            .entries
            .insert(normalize_key(key), value.into());
    }

    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set(section, key, if value { "true" } else { "false" });
    }

    pub fn set_int(&mut self, section: &str, key: &str, value: i64) {
        self.set(section, key, value.to_string());
    }

    /// Remove one key, returning its previous value
    pub fn remove_key(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections
            .get_mut(section)?
            .entries
            .shift_remove(&normalize_key(key))
    }

    /// Raw lines of a section joined with `\n`; empty when there are none
    pub fn get_raw(&self, section: &str) -> String {
        self.sections
            .get(section)
            .map(|s| s.raw.join("\n"))
            .unwrap_or_default()
    }

    /// Replace the raw lines of a section, leaving its entries alone
    pub fn set_raw(&mut self, section: &str, content: impl Into<RawContent>) {
        self.section_mut(section).raw = content.into().into_lines();
    }
}
