//! Dosconf - DOSBox configuration editor
//!
//! Reads and writes DOSBox `.conf` files, keeping the `[autoexec]` boot
//! script verbatim, and keeps a small library of games and their configs.

pub mod app;
pub mod core;

pub use crate::core::document::{ConfDocument, RawContent, Section};
pub use crate::core::error::{ConfError, Result};
pub use crate::core::parser::{parse, parse_str, parse_with, OrphanPolicy, ParseOptions};
pub use crate::core::writer::{render, write, write_with, RawSections, WriteOptions, AUTOEXEC};
