//! Style resolver – maps tag defaults and inline `style=""` declarations to a
//! flat [`TextStyle`], then cascades it down the ancestor chain.
//!
//! Resolution is a pure fold: every node on the path from the root to the
//! target contributes one layer (its tag default with its own declarations
//! applied), and layers are merged root-first so the nearest node wins.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dom::{Document, ElementData, NodeId};
use crate::Result;

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

/// 8-bit RGB colour, written out as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rgb\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)").expect("valid rgb() pattern")
});

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase, zero-padded `#RRGGBB`.
    pub fn to_hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            3 => Some(Self {
                r: u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?,
                g: u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?,
                b: u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?,
            }),
            _ => None,
        }
    }

    /// Finds an `rgb(r, g, b)` call anywhere in `value`. Channels outside
    /// 0-255 reject the whole colour.
    pub fn from_rgb_function(value: &str) -> Option<Self> {
        let caps = RGB_FUNCTION.captures(value)?;
        Some(Self {
            r: caps[1].parse().ok()?,
            g: caps[2].parse().ok()?,
            b: caps[3].parse().ok()?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour '{raw}'")))
    }
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

// ---------------------------------------------------------------------------
// Text style
// ---------------------------------------------------------------------------

/// Typographic style of a text run. Every field is "unset" by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgb>,
    pub underline: bool,
    pub strikethrough: bool,
}

impl TextStyle {
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn with_strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_font_size(mut self, pt: f32) -> Self {
        self.font_size_pt = Some(pt);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_background_color(mut self, color: Rgb) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Field-wise override: whatever `overrides` sets replaces `self`,
    /// everything it leaves unset falls through.
    pub fn merge(&self, overrides: &TextStyle) -> TextStyle {
        TextStyle {
            bold: self.bold || overrides.bold,
            italic: self.italic || overrides.italic,
            font_family: overrides
                .font_family
                .clone()
                .or_else(|| self.font_family.clone()),
            font_size_pt: overrides.font_size_pt.or(self.font_size_pt),
            color: overrides.color.or(self.color),
            background_color: overrides.background_color.or(self.background_color),
            underline: self.underline || overrides.underline,
            strikethrough: self.strikethrough || overrides.strikethrough,
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == TextStyle::default()
    }
}

// ---------------------------------------------------------------------------
// Tag defaults
// ---------------------------------------------------------------------------

/// Baseline style per lowercase tag name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct StyleDefaults {
    styles: HashMap<String, TextStyle>,
}

impl StyleDefaults {
    /// An empty table: every tag starts unstyled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table for the usual phrasing and heading tags.
    pub fn standard() -> Self {
        let heading = |pt: f32| TextStyle::default().with_font_size(pt).with_bold();
        let mut table = Self::new();
        table.insert("h1", heading(32.0));
        table.insert("h2", heading(28.0));
        table.insert("h3", heading(24.0));
        table.insert("h4", heading(20.0));
        table.insert("h5", heading(16.0));
        table.insert("h6", heading(12.0));
        for tag in ["b", "strong"] {
            table.insert(tag, TextStyle::default().with_bold());
        }
        for tag in ["i", "em"] {
            table.insert(tag, TextStyle::default().with_italic());
        }
        table.insert("u", TextStyle::default().with_underline());
        for tag in ["s", "strike", "del"] {
            table.insert(tag, TextStyle::default().with_strikethrough());
        }
        table.insert("small", TextStyle::default().with_font_size(10.0));
        table.insert(
            "a",
            TextStyle::default()
                .with_underline()
                .with_color(Rgb::new(0x00, 0x00, 0xFF)),
        );
        for tag in ["code", "pre"] {
            table.insert(tag, TextStyle::default().with_font_family("courier"));
        }
        table
    }

    /// Load a `{ "tag": { ...TextStyle } }` table from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, TextStyle> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (tag, style) in raw {
            table.insert(&tag, style);
        }
        Ok(table)
    }

    pub fn insert(&mut self, tag: &str, style: TextStyle) {
        self.styles.insert(tag.to_ascii_lowercase(), style);
    }

    /// Exact match on an already-lowercased tag name.
    pub fn get(&self, tag: &str) -> Option<&TextStyle> {
        self.styles.get(tag)
    }

    /// Overlay `other` onto this table; its entries replace ours.
    pub fn extend(&mut self, other: StyleDefaults) {
        self.styles.extend(other.styles);
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Inline style parsing
// ---------------------------------------------------------------------------

/// `style` attribute split into lowercase `property -> value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    values: HashMap<String, String>,
}

impl Declarations {
    /// Pairs that do not split on `:` into exactly two non-empty parts are
    /// dropped. Later duplicates win.
    pub fn parse(style_attr: &str) -> Self {
        let lowered = style_attr.to_lowercase();
        let mut values = HashMap::new();
        for decl in lowered.split(';').filter(|d| !d.trim().is_empty()) {
            let parts: Vec<&str> = decl
                .split(':')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            if let [prop, value] = parts.as_slice() {
                values.insert(prop.to_string(), value.to_string());
            } else {
                log::trace!("dropping malformed declaration '{}'", decl.trim());
            }
        }
        Self { values }
    }

    /// The value for `prop`, or `""` when it was not declared.
    pub fn get(&self, prop: &str) -> &str {
        self.values.get(prop).map_or("", |v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

const FONT_SIZE_KEYWORDS: [(&str, f32); 7] = [
    ("x-small", 7.0),
    ("medium", 13.0),
    ("large", 14.0),
    ("larger", 16.0),
    ("x-large", 18.0),
    ("xx-large", 24.0),
    ("xxx-large", 48.0),
];

pub fn font_size_keyword(keyword: &str) -> Option<f32> {
    FONT_SIZE_KEYWORDS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|&(_, pt)| pt)
}

/// Whole point sizes (signed, as written) parse directly, otherwise the
/// keyword table applies.
pub fn parse_font_size(value: &str) -> Option<f32> {
    match value.parse::<i32>() {
        Ok(pt) => Some(pt as f32),
        Err(_) => font_size_keyword(value),
    }
}

/// Apply declarations on top of `style`, one field per property.
pub fn apply_declarations(style: &mut TextStyle, decls: &Declarations) {
    if decls.get("font-weight") == "bold" {
        style.bold = true;
    }
    if decls.get("font-style") == "italic" {
        style.italic = true;
    }

    let family = decls.get("font-family");
    if !family.is_empty() {
        style.font_family = Some(family.to_string());
    }

    if let Some(color) = Rgb::from_rgb_function(decls.get("color")) {
        style.color = Some(color);
    }
    if let Some(color) = Rgb::from_rgb_function(decls.get("background-color")) {
        style.background_color = Some(color);
    }

    let decoration = decls.get("text-decoration-line");
    if decoration == "underline" {
        style.underline = true;
    }
    if decoration == "line-through" {
        style.strikethrough = true;
    }

    if let Some(pt) = parse_font_size(decls.get("font-size")) {
        style.font_size_pt = Some(pt);
    }
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

/// Style a node contributes by itself: its tag default with its own inline
/// declarations applied. Text nodes and the root contribute nothing.
pub fn own_style(doc: &Document, id: NodeId, defaults: &StyleDefaults) -> TextStyle {
    let tag = doc.tag_name(id).to_ascii_lowercase();
    let mut style = defaults.get(&tag).cloned().unwrap_or_default();
    if let Some(attr) = doc.element(id).and_then(ElementData::inline_style) {
        apply_declarations(&mut style, &Declarations::parse(attr));
    }
    style
}

/// One layer per node from the root down to `id`, root first.
pub fn style_layers(doc: &Document, id: NodeId, defaults: &StyleDefaults) -> Vec<TextStyle> {
    let mut layers: Vec<TextStyle> = doc
        .ancestors(id)
        .map(|node| own_style(doc, node, defaults))
        .collect();
    layers.reverse();
    layers
}

/// Effective style of `id`: every ancestor's layer, nearest node winning.
pub fn resolve_style(doc: &Document, id: NodeId, defaults: &StyleDefaults) -> TextStyle {
    style_layers(doc, id, defaults)
        .iter()
        .fold(TextStyle::default(), |base, layer| base.merge(layer))
}
