//! Known DOSBox settings and typed access to them
//!
//! The parser stores every value as text and knows nothing about DOSBox. This
//! table is the layer on top that says which keys the editor exposes, which
//! type each one has and which values it suggests.

use serde::Serialize;

use super::document::ConfDocument;
use super::error::{ConfError, Result};
use super::writer::AUTOEXEC;

/// Type of a known setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    Text,
    /// Free-form lines stored as the raw content of the section
    Script,
}

/// A setting the editor knows about
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnownKey {
    pub section: &'static str,
    pub key: &'static str,
    pub kind: ValueKind,
    /// Suggested values; empty means anything goes
    #[serde(skip_serializing_if = "no_choices")]
    pub choices: &'static [&'static str],
}

fn no_choices(choices: &&[&str]) -> bool {
    choices.is_empty()
}

const fn key(section: &'static str, key: &'static str, kind: ValueKind) -> KnownKey {
    KnownKey {
        section,
        key,
        kind,
        choices: &[],
    }
}

const fn pick(section: &'static str, key: &'static str, choices: &'static [&'static str]) -> KnownKey {
    KnownKey {
        section,
        key,
        kind: ValueKind::Text,
        choices,
    }
}

const RESOLUTIONS: &[&str] = &["original", "640x480", "800x600", "1024x768", "1280x720", "1920x1024"];
const SERIAL_MODES: &[&str] = &["dummy", "modem", "nullmodem", "directserial", "disabled"];

/// Every setting the editor exposes, grouped by section
pub const KNOWN_KEYS: &[KnownKey] = &[
    key("sdl", "fullscreen", ValueKind::Bool),
    key("sdl", "fulldouble", ValueKind::Bool),
    pick("sdl", "fullresolution", RESOLUTIONS),
    pick("sdl", "windowresolution", RESOLUTIONS),
    pick("sdl", "output", &["surface", "overlay", "opengl", "ddraw"]),
    key("sdl", "autolock", ValueKind::Bool),
    key("sdl", "sensitivity", ValueKind::Int),
    key("sdl", "waitonerror", ValueKind::Bool),
    pick("sdl", "priority", &["higher,normal", "lowest,lowest", "normal,normal", "highest,higher"]),
    key("sdl", "mapperfile", ValueKind::Text),
    key("sdl", "usescancodes", ValueKind::Bool),
    key("dosbox", "language", ValueKind::Text),
    pick(
        "dosbox",
        "machine",
        &[
            "hercules", "cga", "tandy", "pcjr", "ega", "vgaonly", "svga_s3", "svga_et3000",
            "svga_et4000", "svga_paradise", "vesa_nofb", "vesa_oldvbe",
        ],
    ),
    key("dosbox", "captures", ValueKind::Text),
    key("dosbox", "memsize", ValueKind::Int),
    key("render", "frameskip", ValueKind::Int),
    key("render", "aspect", ValueKind::Bool),
    pick(
        "render",
        "scaler",
        &[
            "none", "normal2x", "normal3x", "tv2x", "tv3x", "rgb3x", "rgb2x", "scan2x", "scan3x",
            "advmame2x", "advmame3x", "advinterp2x", "advinterp3x", "2xsai", "super2xsai",
            "supereagle", "hq2x", "hq3x",
        ],
    ),
    pick("cpu", "core", &["simple", "normal", "dynamic", "auto"]),
    pick("cpu", "cputype", &["auto", "386", "486_slow", "pentium_slow", "386_prefetch"]),
    pick(
        "cpu",
        "cycles",
        &["fixed 5000", "max", "max limit 50000", "max 50%", "auto", "auto 5000 50% limit 50000"],
    ),
    key("cpu", "cycleup", ValueKind::Int),
    key("cpu", "cycledown", ValueKind::Int),
    pick("serial", "serial1", SERIAL_MODES),
    pick("serial", "serial2", SERIAL_MODES),
    pick("serial", "serial3", SERIAL_MODES),
    pick("serial", "serial4", SERIAL_MODES),
    key("dos", "xms", ValueKind::Bool),
    key("dos", "ems", ValueKind::Bool),
    key("dos", "umb", ValueKind::Bool),
    pick("dos", "keyboardlayout", &["auto", "none"]),
    key("ipx", "ipx", ValueKind::Bool),
    key(AUTOEXEC, AUTOEXEC, ValueKind::Script),
];

/// Find the table entry for a key
pub fn lookup(section: &str, key: &str) -> Option<&'static KnownKey> {
    KNOWN_KEYS
        .iter()
        .find(|k| k.section == section && k.key.eq_ignore_ascii_case(key))
}

/// A typed setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(n) => write!(f, "{}", n),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

/// Read one known setting, coercing it to its declared type
pub fn read(doc: &ConfDocument, known: &KnownKey) -> Result<Option<SettingValue>> {
    Ok(match known.kind {
        ValueKind::Bool => doc.get_bool(known.section, known.key)?.map(SettingValue::Bool),
        ValueKind::Int => doc.get_int(known.section, known.key)?.map(SettingValue::Int),
        ValueKind::Text => doc
            .get(known.section, known.key)
            .map(|v| SettingValue::Text(v.to_string())),
        ValueKind::Script => doc
            .has_section(known.section)
            .then(|| SettingValue::Text(doc.get_raw(known.section))),
    })
}

/// One row of a [`snapshot`]
#[derive(Debug, Clone, Serialize)]
pub struct SettingRow {
    #[serde(flatten)]
    pub known: KnownKey,
    pub value: Option<SettingValue>,
}

/// Read every known setting of a document
pub fn snapshot(doc: &ConfDocument) -> Result<Vec<SettingRow>> {
    KNOWN_KEYS
        .iter()
        .map(|known| -> Result<SettingRow> {
            Ok(SettingRow {
                known: *known,
                value: read(doc, known)?,
            })
        })
        .collect()
}

/// Write a batch of `(section, key, value)` updates, then drop empty sections
///
/// Empty values are skipped. Only the boot script may span several lines.
/// Values for known keys must match the declared type; values outside the
/// suggested choices are accepted with a warning.
/// Keys that are not in the table are stored as plain text.
pub fn apply<'a, I>(doc: &mut ConfDocument, updates: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    for (section, key, value) in updates {
        if value.is_empty() {
            tracing::debug!("Skipping empty value for [{}] {}", section, key);
            continue;
        }
        let known = lookup(section, key);
        let is_script = known.is_some_and(|k| k.kind == ValueKind::Script);
        if !is_script && value.contains(['\n', '\r']) {
            return Err(ConfError::coercion(section, key, value, "single-line value"));
        }
        let Some(known) = known else {
            doc.set(section, key, value);
            continue;
        };
        match known.kind {
            ValueKind::Bool => {
                let flag = if value.eq_ignore_ascii_case("true") {
                    true
                } else if value.eq_ignore_ascii_case("false") {
                    false
                } else {
                    return Err(ConfError::coercion(section, key, value, "boolean"));
                };
                doc.set_bool(section, known.key, flag);
            }
            ValueKind::Int => {
                let number = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ConfError::coercion(section, key, value, "integer"))?;
                doc.set_int(section, known.key, number);
            }
            ValueKind::Text => {
                if !known.choices.is_empty() && !known.choices.contains(&value) {
                    tracing::warn!(
                        "[{}] {} = {:?} is not one of the suggested values {:?}",
                        section,
                        key,
                        value,
                        known.choices
                    );
                }
                doc.set(section, known.key, value);
            }
            ValueKind::Script => doc.set_raw(section, value),
        }
    }
    doc.remove_empty_sections();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_str;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("sdl", "fullscreen").unwrap().kind, ValueKind::Bool);
        assert_eq!(lookup("sdl", "FullScreen").unwrap().key, "fullscreen");
        assert!(lookup("dosbox", "fullscreen").is_none());
        assert_eq!(lookup("autoexec", "autoexec").unwrap().kind, ValueKind::Script);
    }

    #[test]
    fn test_snapshot_reads_typed_values() {
        let doc = parse_str(
            "[sdl]\nfullscreen = false\nsensitivity = 100\noutput = opengl\n[autoexec]\nmount c .\nc:\n",
        )
        .unwrap();
        let rows = snapshot(&doc).unwrap();
        let value = |section: &str, key: &str| {
            rows.iter()
                .find(|r| r.known.section == section && r.known.key == key)
                .and_then(|r| r.value.clone())
        };

        assert_eq!(value("sdl", "fullscreen"), Some(SettingValue::Bool(false)));
        assert_eq!(value("sdl", "sensitivity"), Some(SettingValue::Int(100)));
        assert_eq!(value("sdl", "output"), Some(SettingValue::Text("opengl".into())));
        assert_eq!(value("cpu", "core"), None);
        assert_eq!(value("autoexec", "autoexec"), Some(SettingValue::Text("mount c .\nc:".into())));
    }

    #[test]
    fn test_snapshot_reports_bad_values() {
        let doc = parse_str("[dos]\nxms = yes\n").unwrap();
        assert!(matches!(snapshot(&doc), Err(ConfError::Coercion { .. })));
    }

    #[test]
    fn test_apply_updates() {
        let mut doc = parse_str("[sdl]\nfullscreen = false\n[serial]\n[autoexec]\nc:\n").unwrap();
        apply(
            &mut doc,
            [
                ("sdl", "fullscreen", "TRUE"),
                ("dosbox", "memsize", "32"),
                ("cpu", "cycles", "fixed 3000"),
                ("dos", "keyboardlayout", ""),
                ("autoexec", "autoexec", "mount c ~/games\nc:\nkeen4e"),
                ("midi", "mpu401", "intelligent"),
            ],
        )
        .unwrap();

        assert_eq!(doc.get("sdl", "fullscreen"), Some("true"));
        assert_eq!(doc.get("dosbox", "memsize"), Some("32"));
        assert_eq!(doc.get("cpu", "cycles"), Some("fixed 3000"));
        assert!(!doc.has_section("dos"));
        assert!(!doc.has_section("serial"));
        assert_eq!(doc.get_raw("autoexec"), "mount c ~/games\nc:\nkeen4e");
        assert_eq!(doc.get("midi", "mpu401"), Some("intelligent"));
    }

    #[test]
    fn test_apply_rejects_mistyped_values() {
        let mut doc = ConfDocument::new();
        let err = apply(&mut doc, [("render", "frameskip", "lots")]).unwrap_err();
        assert!(matches!(err, ConfError::Coercion { expected: "integer", .. }));
    }

    #[test]
    fn test_apply_rejects_multi_line_values() {
        let mut doc = ConfDocument::new();
        let err = apply(&mut doc, [("sdl", "mapperfile", "x\n[autoexec]\nformat c:")]).unwrap_err();
        assert!(matches!(err, ConfError::Coercion { expected: "single-line value", .. }));

        let err = apply(&mut doc, [("midi", "config", "a\rb")]).unwrap_err();
        assert!(matches!(err, ConfError::Coercion { .. }));
        assert!(!doc.has_section("sdl"));
        assert!(!doc.has_section("autoexec"));

        apply(&mut doc, [("autoexec", "autoexec", "mount c .\nc:")]).unwrap();
        assert_eq!(doc.get_raw("autoexec"), "mount c .\nc:");
    }

    #[test]
    fn test_setting_value_display() {
        assert_eq!(SettingValue::Bool(true).to_string(), "true");
        assert_eq!(SettingValue::Int(-5).to_string(), "-5");
        assert_eq!(SettingValue::Text("max".into()).to_string(), "max");
    }
}
