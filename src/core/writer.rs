//! Serializer: renders a [`ConfDocument`] back to config text
//!
//! Structured sections come first, each as a header followed by its
//! `key = value` lines. Raw lines are only written for the sections selected
//! by [`RawSections`]; by default that is the `[autoexec]` boot script alone,
//! and raw lines captured under any other section stay in memory only.
//!
//! Values are written as-is, so they must be single-line: a `\n` or `\r`
//! inside a value would split it on the next read. `settings::apply` rejects
//! such values before they reach the document.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::document::{ConfDocument, Section};
use super::error::{ConfError, Result};

/// The boot script section whose raw lines survive a write
pub const AUTOEXEC: &str = "autoexec";

/// Which sections get their raw lines written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSections {
    /// Only the named section
    Designated(String),
    /// Every section holding raw lines, in document order
    All,
}

impl Default for RawSections {
    fn default() -> Self {
        RawSections::Designated(AUTOEXEC.to_string())
    }
}

/// Serializer settings
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub raw_sections: RawSections,
}

fn write_raw_block(out: &mut String, name: &str, section: &Section) {
    if section.raw_lines().is_empty() {
        return;
    }
    let _ = write!(out, "\n[{}]\n", name);
    for line in section.raw_lines() {
        out.push_str(line);
        out.push('\n');
    }
}

/// Render a document to text
pub fn render(doc: &ConfDocument, options: &WriteOptions) -> String {
    let mut out = String::new();

    for name in doc.sections() {
        let Some(section) = doc.section(name) else {
            continue;
        };
        if !section.has_entries() {
            continue;
        }
        let _ = writeln!(out, "[{}]", name);
        for (key, value) in section.entries() {
            let _ = writeln!(out, "{} = {}", key, value);
        }
        out.push('\n');
    }

    match &options.raw_sections {
        RawSections::Designated(name) => {
            if let Some(section) = doc.section(name) {
                write_raw_block(&mut out, name, section);
            }
        }
        RawSections::All => {
            for name in doc.sections() {
                if let Some(section) = doc.section(name) {
                    write_raw_block(&mut out, name, section);
                }
            }
        }
    }

    out
}

/// Write a document to `path` with default options
pub fn write(doc: &ConfDocument, path: &Path) -> Result<()> {
    write_with(doc, path, &WriteOptions::default())
}

/// Write a document to `path`, replacing any existing file
pub fn write_with(doc: &ConfDocument, path: &Path, options: &WriteOptions) -> Result<()> {
    fs::write(path, render(doc, options)).map_err(|e| ConfError::io(path, e))?;
    tracing::info!("Saved config to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_str;

    #[test]
    fn test_render_example() {
        let doc = parse_str("[sdl]\nfullscreen = false\n[autoexec]\nmount c .\nc:\ngame.exe\n").unwrap();
        assert_eq!(
            render(&doc, &WriteOptions::default()),
            "[sdl]\nfullscreen = false\n\n\n[autoexec]\nmount c .\nc:\ngame.exe\n"
        );
    }

    #[test]
    fn test_sections_without_keys_are_skipped() {
        let mut doc = ConfDocument::new();
        doc.section_mut("serial");
        doc.set("dos", "xms", "true");
        doc.set("ipx", "ipx", "false");
        assert_eq!(
            render(&doc, &WriteOptions::default()),
            "[dos]\nxms = true\n\n[ipx]\nipx = false\n\n"
        );
    }

    #[test]
    fn test_empty_value_keeps_separator() {
        let mut doc = ConfDocument::new();
        doc.set("sdl", "mapperfile", "");
        assert_eq!(render(&doc, &WriteOptions::default()), "[sdl]\nmapperfile = \n\n");
    }

    #[test]
    fn test_mixed_autoexec_writes_keys_then_lines() {
        let doc = parse_str("[autoexec]\nhello world\na = 1\n").unwrap();
        assert_eq!(
            render(&doc, &WriteOptions::default()),
            "[autoexec]\na = 1\n\n\n[autoexec]\nhello world\n"
        );
    }

    #[test]
    fn test_raw_lines_of_other_sections_are_not_written() {
        let doc = parse_str("[cpu]\ncore = auto\n# a comment line\n").unwrap();
        let text = render(&doc, &WriteOptions::default());
        assert_eq!(text, "[cpu]\ncore = auto\n\n");
        assert_eq!(doc.get_raw("cpu"), "# a comment line");
    }

    #[test]
    fn test_all_raw_sections_when_requested() {
        let doc = parse_str("[cpu]\ncore = auto\n# cpu notes\n[autoexec]\nc:\n").unwrap();
        let options = WriteOptions {
            raw_sections: RawSections::All,
        };
        assert_eq!(
            render(&doc, &options),
            "[cpu]\ncore = auto\n\n\n[cpu]\n# cpu notes\n\n[autoexec]\nc:\n"
        );
    }

    #[test]
    fn test_designated_section_other_than_autoexec() {
        let doc = parse_str("[config]\nrem boot options\n[autoexec]\nc:\n").unwrap();
        let options = WriteOptions {
            raw_sections: RawSections::Designated("config".into()),
        };
        assert_eq!(render(&doc, &options), "\n[config]\nrem boot options\n");
    }

    #[test]
    fn test_empty_autoexec_is_omitted() {
        let doc = parse_str("[sdl]\noutput = opengl\n[autoexec]\n").unwrap();
        assert_eq!(render(&doc, &WriteOptions::default()), "[sdl]\noutput = opengl\n\n");
    }

    #[test]
    fn test_structured_round_trip() {
        let mut doc = ConfDocument::new();
        doc.set("sdl", "fullscreen", "false");
        doc.set("sdl", "output", "opengl");
        doc.set("cpu", "cycles", "fixed 5000, cycles=5000");
        doc.set("cpu", "core", "");

        let once = parse_str(&render(&doc, &WriteOptions::default())).unwrap();
        let twice = parse_str(&render(&once, &WriteOptions::default())).unwrap();
        for parsed in [&once, &twice] {
            for name in ["sdl", "cpu"] {
                let expected: Vec<_> = doc.section(name).unwrap().entries().collect();
                let actual: Vec<_> = parsed.section(name).unwrap().entries().collect();
                assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn test_autoexec_passthrough() {
        let lines = ["@echo off", "", "  mount c /games/keen  ", "c:", "cd keen", "keen4e.exe", ""];
        let text = format!("[autoexec]\n{}\n", lines.join("\n"));
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.get_raw("autoexec"), lines.join("\n"));

        let reparsed = parse_str(&render(&doc, &WriteOptions::default())).unwrap();
        assert_eq!(reparsed.get_raw("autoexec"), lines.join("\n"));
    }

    #[test]
    fn test_write_and_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keen.conf");
        let mut doc = ConfDocument::new();
        doc.set_bool("sdl", "fullscreen", true);
        doc.set_raw("autoexec", "mount c .\nc:");

        write(&doc, &path).unwrap();
        let reread = crate::core::parser::parse(&path).unwrap();
        assert_eq!(reread.get_bool("sdl", "fullscreen").unwrap(), Some(true));
        assert_eq!(reread.get_raw("autoexec"), "mount c .\nc:");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/game.conf");
        let err = write(&ConfDocument::new(), &path).unwrap_err();
        assert!(matches!(err, ConfError::Io { .. }));
    }
}
