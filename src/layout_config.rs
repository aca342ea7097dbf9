//! Layout config – the boundary between paragraph composition and whatever
//! layout engine arranges the result on a page.
//!
//! Composition talks to a [`Container`]; [`ParagraphLayout`] is the plain
//! serialisable implementation used by the pipeline and the CLI.

use serde::{Deserialize, Serialize};

use crate::style::TextStyle;
use crate::Result;

/// Minimum width of the list marker cell, in layout units.
pub const MARKER_MIN_WIDTH: f32 = 26.0;

/// A leaf output unit: literal text (or a line break) plus its resolved style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Line breaks travel as a run holding a single newline.
    pub fn line_break(style: TextStyle) -> Self {
        Self::new("\n", style)
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Auto-width cell holding a list bullet or ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerCell {
    pub text: String,
    pub min_width: f32,
    pub align: HorizontalAlign,
}

impl MarkerCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            min_width: MARKER_MIN_WIDTH,
            align: HorizontalAlign::Center,
        }
    }
}

/// Layout surface a paragraph is composed into.
pub trait Container {
    /// Split horizontally into an auto-sized item holding `marker` and a
    /// relative-sized remainder, returning the remainder.
    fn row(&mut self, marker: MarkerCell) -> &mut dyn Container;

    /// Accept styled runs, in order.
    fn text(&mut self, runs: Vec<TextRun>);
}

/// One composed paragraph: optional marker cell plus the runs that fill the
/// rest of the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphLayout {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub marker: Option<MarkerCell>,
    pub runs: Vec<TextRun>,
}

impl ParagraphLayout {
    /// Nothing was composed: no marker, no runs.
    pub fn is_empty(&self) -> bool {
        self.marker.is_none() && self.runs.is_empty()
    }

    /// Run texts joined, line breaks included.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl Container for ParagraphLayout {
    fn row(&mut self, marker: MarkerCell) -> &mut dyn Container {
        self.marker = Some(marker);
        self
    }

    fn text(&mut self, runs: Vec<TextRun>) {
        self.runs.extend(runs);
    }
}

/// Every composed paragraph of a document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    pub paragraphs: Vec<ParagraphLayout>,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            paragraphs: Vec::new(),
        }
    }
}

impl DocumentLayout {
    fn default_title() -> String {
        "text-forge output".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
