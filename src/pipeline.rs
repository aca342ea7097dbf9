//! Pipeline – ties together parsing, line-run collection, and paragraph
//! composition into a single function call.

use crate::dom::{parse_html, Document, NodeId};
use crate::layout_config::{DocumentLayout, ParagraphLayout};
use crate::paragraph::ParagraphComposer;
use crate::style::StyleDefaults;

/// Configuration for the composition pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Title recorded in the output (default: "text-forge output").
    pub title: String,
    /// Tag default styles (default: [`StyleDefaults::standard`]).
    pub styles: StyleDefaults,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "text-forge output".to_string(),
            styles: StyleDefaults::standard(),
        }
    }
}

impl PipelineConfig {
    /// Standard table with `overrides` layered on top.
    pub fn with_style_overrides(overrides: StyleDefaults) -> Self {
        let mut config = Self::default();
        config.styles.extend(overrides);
        config
    }
}

/// Split the subtree under `root` into line runs: maximal sequences of
/// consecutive non-block siblings. Block children start a new run and are
/// descended into. Runs with no visible content are skipped.
pub fn collect_line_runs(doc: &Document, root: NodeId) -> Vec<Vec<NodeId>> {
    let mut runs = Vec::new();
    collect_into(doc, root, &mut runs);
    runs
}

/// A block being scanned: the next child to look at and the inline
/// siblings gathered since the last flush.
struct Frame {
    block: NodeId,
    next: usize,
    pending: Vec<NodeId>,
}

impl Frame {
    fn new(block: NodeId) -> Self {
        Self {
            block,
            next: 0,
            pending: Vec::new(),
        }
    }
}

fn collect_into(doc: &Document, node: NodeId, runs: &mut Vec<Vec<NodeId>>) {
    let mut stack = vec![Frame::new(node)];
    while let Some(frame) = stack.last_mut() {
        let Some(&child) = doc.children(frame.block).get(frame.next) else {
            flush(doc, &mut frame.pending, runs);
            stack.pop();
            continue;
        };
        frame.next += 1;
        if doc.tag(child).is_some_and(|t| t.is_hidden()) {
            continue;
        }
        if doc.is_block(child) {
            flush(doc, &mut frame.pending, runs);
            stack.push(Frame::new(child));
        } else {
            frame.pending.push(child);
        }
    }
}

fn flush(doc: &Document, pending: &mut Vec<NodeId>, runs: &mut Vec<Vec<NodeId>>) {
    let visible = pending
        .iter()
        .any(|&id| !doc.text_content(id).trim().is_empty() || has_line_break(doc, id));
    if visible {
        runs.push(std::mem::take(pending));
    } else {
        if !pending.is_empty() {
            log::trace!("skipping whitespace-only run of {} nodes", pending.len());
        }
        pending.clear();
    }
}

fn has_line_break(doc: &Document, id: NodeId) -> bool {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        if doc.is_line_break(current) {
            return true;
        }
        stack.extend(doc.children(current));
    }
    false
}

/// Compose every line run of an already parsed document.
pub fn compose_parsed(doc: &Document, config: &PipelineConfig) -> DocumentLayout {
    let mut layout = DocumentLayout {
        title: config.title.clone(),
        paragraphs: Vec::new(),
    };

    for run in collect_line_runs(doc, doc.body()) {
        let mut paragraph = ParagraphLayout::default();
        ParagraphComposer::new(doc, run, &config.styles).compose(&mut paragraph);
        if !paragraph.is_empty() {
            layout.paragraphs.push(paragraph);
        }
    }

    log::debug!("composed {} paragraphs", layout.paragraphs.len());
    layout
}

/// Full pipeline: HTML string → composed paragraphs.
pub fn compose_document(html: &str, config: &PipelineConfig) -> DocumentLayout {
    let doc = parse_html(html);
    compose_parsed(&doc, config)
}

/// Convenience: compose with the default config.
pub fn compose_html(html: &str) -> DocumentLayout {
    compose_document(html, &PipelineConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_basic() {
        let layout = compose_html("<h1>Hello</h1><p>World</p>");
        assert_eq!(layout.paragraphs.len(), 2);
        assert_eq!(layout.paragraphs[0].plain_text(), "Hello");
        assert!(layout.paragraphs[0].runs[0].style.bold);
        assert_eq!(layout.paragraphs[1].plain_text(), "World");
    }

    #[test]
    fn mixed_block_content_splits_runs() {
        let doc = parse_html("<div>intro <b>bold</b><p>para</p>outro</div>");
        let runs = collect_line_runs(&doc, doc.root());
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].len(), 2);
        let texts: Vec<String> = runs
            .iter()
            .map(|r| r.iter().map(|&id| doc.text_content(id)).collect())
            .collect();
        assert_eq!(texts, vec!["intro bold", "para", "outro"]);
    }

    #[test]
    fn head_content_is_skipped() {
        let html = "<html><head><title>T</title></head><body><p>x</p></body></html>";
        let layout = compose_html(html);
        assert_eq!(layout.paragraphs.len(), 1);
        assert_eq!(layout.paragraphs[0].plain_text(), "x");
    }

    #[test]
    fn bare_inline_fragment_yields_nothing() {
        let layout = compose_html("<span>no block here</span>");
        assert!(layout.paragraphs.is_empty());
    }

    #[test]
    fn overrides_replace_standard_entries() {
        let mut overrides = StyleDefaults::new();
        overrides.insert("b", crate::style::TextStyle::default().with_italic());
        let config = PipelineConfig::with_style_overrides(overrides);
        let layout = compose_document("<p><b>x</b></p>", &config);
        let style = &layout.paragraphs[0].runs[0].style;
        assert!(style.italic);
        assert!(!style.bold);
    }
}
