//! # text-forge – HTML paragraphs → styled text runs
//!
//! This crate turns paragraph-level HTML into layout instructions: an
//! optional list marker plus an ordered sequence of text runs, each with a
//! fully cascaded text style. The pipeline stages are:
//!
//! 1. **Parse** – HTML string → arena DOM tree ([`dom`])
//! 2. **Collect** – split the tree into line runs ([`pipeline`])
//! 3. **Style** – cascade tag defaults and inline styles ([`style`])
//! 4. **Compose** – list marker + flattened runs per paragraph ([`paragraph`])
//!
//! The result is handed to a layout engine through the [`layout_config`]
//! boundary.

pub mod dom;
pub mod layout_config;
pub mod paragraph;
pub mod pipeline;
pub mod style;
pub mod templates;

// Re-exports for convenience
pub use layout_config::{Container, DocumentLayout, ParagraphLayout, TextRun};
pub use paragraph::{ListMarker, ParagraphComposer};
pub use pipeline::{compose_document, compose_html, PipelineConfig};
pub use style::{StyleDefaults, TextStyle};

/// Error type for the fallible edges: style tables, JSON, file I/O.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
