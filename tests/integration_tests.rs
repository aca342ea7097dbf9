//! Integration tests for the text-forge pipeline.
//!
//! These tests validate:
//! - List markers for ordered, unordered, nested, and orphan items
//! - Style cascade from tag defaults, inline declarations, and ancestors
//! - Boundary whitespace trimming without touching the input tree
//! - JSON output of composed documents

use std::collections::HashMap;

use text_forge::dom::{parse_html, Document, Tag};
use text_forge::layout_config::{Container, DocumentLayout, MarkerCell, ParagraphLayout, TextRun};
use text_forge::paragraph::{ListMarker, ParagraphComposer};
use text_forge::pipeline::{collect_line_runs, compose_document, compose_html, PipelineConfig};
use text_forge::style::{resolve_style, rgb_to_hex, Rgb, StyleDefaults, TextStyle};
use text_forge::templates;

// =====================================================================
// Helper
// =====================================================================

fn texts(paragraph: &ParagraphLayout) -> Vec<&str> {
    paragraph.runs.iter().map(|r| r.text.as_str()).collect()
}

fn marker_text(paragraph: &ParagraphLayout) -> Option<&str> {
    paragraph.marker.as_ref().map(|m| m.text.as_str())
}

/// Records calls in order so tests can check that the row split comes
/// before the text.
#[derive(Default)]
struct RecordingContainer {
    calls: Vec<String>,
}

impl Container for RecordingContainer {
    fn row(&mut self, marker: MarkerCell) -> &mut dyn Container {
        self.calls.push(format!("row({})", marker.text));
        self
    }

    fn text(&mut self, runs: Vec<TextRun>) {
        self.calls.push(format!("text({})", runs.len()));
    }
}

// =====================================================================
// List markers
// =====================================================================

#[test]
fn report_lists_get_markers() {
    let layout = compose_html(templates::report_template());
    let markers: Vec<Option<&str>> = layout.paragraphs.iter().map(marker_text).collect();
    let bullets = markers.iter().filter(|m| **m == Some("\u{2022}  ")).count();
    assert_eq!(bullets, 3);
    for n in 1..=3 {
        let prefix = format!("{n}. ");
        assert!(
            markers.contains(&Some(prefix.as_str())),
            "missing ordinal {prefix:?} in {markers:?}"
        );
    }
}

#[test]
fn nested_lists_compose_in_document_order() {
    let layout = compose_html(templates::nested_lists_template());
    let summary: Vec<(Option<&str>, String)> = layout
        .paragraphs
        .iter()
        .map(|p| (marker_text(p), p.plain_text()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some("1. "), "First step".to_string()),
            (Some("2. "), "Second step".to_string()),
            (Some("\u{2022}  "), "Detail one".to_string()),
            (Some("\u{2022}  "), "Detail two".to_string()),
            (Some("3. "), "Third step in a paragraph".to_string()),
        ]
    );
    // "one" keeps the <i> default on top of the list item's cascade.
    assert!(layout.paragraphs[2].runs[1].style.italic);
}

#[test]
fn marker_row_is_split_before_text() {
    let doc = parse_html("<ol><li>a</li><li>b</li></ol>");
    let ol = doc.children(doc.root())[0];
    let second = doc.children(ol)[1];
    let defaults = StyleDefaults::standard();
    let mut container = RecordingContainer::default();
    ParagraphComposer::new(&doc, doc.children(second).to_vec(), &defaults).compose(&mut container);
    assert_eq!(container.calls, vec!["row(2. )", "text(1)"]);
}

#[test]
fn plain_paragraph_has_no_row() {
    let doc = parse_html("<p>plain</p>");
    let p = doc.children(doc.root())[0];
    let defaults = StyleDefaults::standard();
    let composer = ParagraphComposer::new(&doc, doc.children(p).to_vec(), &defaults);
    assert_eq!(composer.marker(), Some(ListMarker::None));
    let mut container = RecordingContainer::default();
    composer.compose(&mut container);
    assert_eq!(container.calls, vec!["text(1)"]);
}

#[test]
fn hand_built_tree_composes() {
    let mut doc = Document::new();
    let root = doc.root();
    let ul = doc.append_element(root, Tag::Ul, HashMap::new());
    let li = doc.append_element(ul, Tag::Li, HashMap::new());
    let mut attrs = HashMap::new();
    attrs.insert("style".to_string(), "font-style: italic".to_string());
    let span = doc.append_element(li, Tag::Span, attrs);
    doc.append_text(span, "  styled  ");

    let defaults = StyleDefaults::new();
    let mut layout = ParagraphLayout::default();
    ParagraphComposer::new(&doc, vec![span], &defaults).compose(&mut layout);
    assert_eq!(marker_text(&layout), Some("\u{2022}  "));
    assert_eq!(texts(&layout), vec!["styled"]);
    assert!(layout.runs[0].style.italic);
}

// =====================================================================
// Style cascade
// =====================================================================

#[test]
fn hello_world_runs() {
    let layout = compose_html("<p>Hello <b>World</b><br/>Next</p>");
    assert_eq!(layout.paragraphs.len(), 1);
    let para = &layout.paragraphs[0];
    assert_eq!(texts(para), vec!["Hello ", "World", "\n", "Next"]);
    assert!(para.runs[0].style.is_unset());
    assert_eq!(para.runs[1].style, TextStyle::default().with_bold());
    assert!(para.runs[2].style.is_unset());
    assert!(para.runs[3].style.is_unset());
}

#[test]
fn inline_declarations_resolve() {
    let html = r#"<div style="font-style: italic"><p><span style="font-weight:bold;font-size:20;color:rgb(1,2,3)">x</span></p></div>"#;
    let layout = compose_html(html);
    let style = &layout.paragraphs[0].runs[0].style;
    assert!(style.bold);
    assert_eq!(style.font_size_pt, Some(20.0));
    assert_eq!(style.color, Some(Rgb::new(1, 2, 3)));
    // From the ancestor chain.
    assert!(style.italic);
    assert!(!style.underline);
}

#[test]
fn every_supported_declaration() {
    let layout = compose_html(templates::inline_styles_template());
    assert_eq!(layout.paragraphs.len(), 1);
    let para = &layout.paragraphs[0];
    assert_eq!(
        para.plain_text(),
        "bold italic red highlight underline struck twenty huge"
    );

    let by_text: HashMap<&str, &TextStyle> = para
        .runs
        .iter()
        .map(|r| (r.text.as_str(), &r.style))
        .collect();
    assert!(by_text["bold"].bold);
    assert!(by_text["italic"].italic);
    assert_eq!(by_text["red"].color.map(Rgb::to_hex).as_deref(), Some("#FF0010"));
    assert_eq!(by_text["highlight"].background_color, Some(Rgb::new(255, 255, 0)));
    assert!(by_text["underline"].underline);
    assert!(by_text["struck"].strikethrough);
    assert_eq!(by_text["twenty"].font_size_pt, Some(20.0));
    assert_eq!(by_text["huge"].font_size_pt, Some(24.0));
    // Declared values are lowercased before use.
    assert_eq!(by_text["bold"].font_family.as_deref(), Some("georgia"));
}

#[test]
fn resolution_equals_parent_merged_with_own_layer() {
    let html = r#"<p style="color: rgb(0,0,255)"><u style="font-size: larger"><b>deep</b></u></p>"#;
    let doc = parse_html(html);
    let defaults = StyleDefaults::standard();
    let p = doc.children(doc.root())[0];
    let u = doc.children(p)[0];
    let b = doc.children(u)[0];

    let resolved = resolve_style(&doc, b, &defaults);
    let parent = resolve_style(&doc, u, &defaults);
    assert_eq!(resolved, parent.merge(&TextStyle::default().with_bold()));
    assert!(resolved.underline);
    assert_eq!(resolved.font_size_pt, Some(16.0));
    assert_eq!(resolved.color, Some(Rgb::new(0, 0, 255)));
}

#[test]
fn malformed_styles_never_fail() {
    let html = r#"<p style="color: rgb(1,2); font-size: huge; : ; font-weight: 600; garbage">ok</p>"#;
    let layout = compose_html(html);
    assert_eq!(layout.paragraphs.len(), 1);
    assert!(layout.paragraphs[0].runs[0].style.is_unset());
}

#[test]
fn hex_formatting() {
    assert_eq!(rgb_to_hex(255, 0, 16), "#FF0010");
    assert_eq!(rgb_to_hex(0, 0, 0), "#000000");
}

// =====================================================================
// Boundary trimming and pipeline
// =====================================================================

#[test]
fn boundary_trim_leaves_tree_untouched() {
    let doc = parse_html("<p> Hi there </p>");
    let p = doc.children(doc.root())[0];
    let defaults = StyleDefaults::standard();
    let runs = ParagraphComposer::new(&doc, doc.children(p).to_vec(), &defaults).runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Hi there");
    assert_eq!(doc.text(doc.children(p)[0]), Some(" Hi there "));
}

#[test]
fn report_paragraph_text_is_normalised() {
    let layout = compose_html(templates::report_template());
    let summary = layout
        .paragraphs
        .iter()
        .find(|p| p.plain_text().starts_with("Revenue"))
        .expect("summary paragraph");
    assert_eq!(
        summary.plain_text(),
        "Revenue grew by 23% year-over-year, reaching $4.2M for the quarter, with notable wins in the enterprise segment."
    );
    let small = layout.paragraphs.last().unwrap();
    assert_eq!(
        texts(small),
        vec![
            "This document is confidential.",
            "\n",
            "Do not distribute without authorization."
        ]
    );
    assert!(small.runs.iter().all(|r| r.style.font_size_pt == Some(7.0)));
}

#[test]
fn report_paragraph_count() {
    // h1, p, h2, p, h2, 3 × li, h2, 3 × li, p
    let layout = compose_html(templates::report_template());
    assert_eq!(layout.paragraphs.len(), 13);
    assert_eq!(layout.paragraphs[0].plain_text(), "Quarterly Report");
    assert_eq!(layout.paragraphs[0].runs[0].style.font_size_pt, Some(32.0));
}

#[test]
fn whitespace_between_blocks_is_not_a_run() {
    let doc = parse_html("<div>\n  <p>a</p>\n  <p>b</p>\n</div>");
    assert_eq!(collect_line_runs(&doc, doc.root()).len(), 2);
}

#[test]
fn custom_style_table_from_json() {
    let overrides = StyleDefaults::from_json(
        r##"{ "P": { "font_family": "Times", "color": "#112233" } }"##,
    )
    .unwrap();
    let mut config = PipelineConfig::with_style_overrides(overrides);
    config.title = "Custom".to_string();
    let layout = compose_document("<p>x <b>y</b></p>", &config);
    assert_eq!(layout.title, "Custom");
    let y = &layout.paragraphs[0].runs[1].style;
    assert!(y.bold);
    assert_eq!(y.font_family.as_deref(), Some("Times"));
    assert_eq!(y.color, Some(Rgb::new(0x11, 0x22, 0x33)));
}

#[test]
fn layout_json_round_trip() {
    let layout = compose_html(templates::nested_lists_template());
    let json = layout.to_json();
    assert!(json.contains("\"text\": \"1. \""), "{json}");
    let back = DocumentLayout::from_json(&json).unwrap();
    assert_eq!(back.paragraphs, layout.paragraphs);
}

#[test]
fn empty_input_yields_empty_document() {
    assert!(compose_html("").paragraphs.is_empty());
    assert!(compose_html("   \n  ").paragraphs.is_empty());
}

#[test]
fn deeply_nested_markup_composes() {
    let depth = 20_000;
    let html = format!(
        "{}<p>{}<i>deep</i>{}</p>{}",
        "<div>".repeat(depth),
        "<span>".repeat(depth),
        "</span>".repeat(depth),
        "</div>".repeat(depth),
    );
    let layout = compose_html(&html);
    assert_eq!(layout.paragraphs.len(), 1);
    assert_eq!(texts(&layout.paragraphs[0]), vec!["deep"]);
    assert!(layout.paragraphs[0].runs[0].style.italic);
}
