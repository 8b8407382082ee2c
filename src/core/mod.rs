//! Config document model, parser, writer, and the launcher's supporting state

pub mod config;
pub mod document;
pub mod error;
pub mod library;
pub mod parser;
pub mod settings;
pub mod writer;
