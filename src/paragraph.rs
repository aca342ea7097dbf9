//! Paragraph composition – turns one run of inline nodes into a list marker
//! and a sequence of styled [`TextRun`]s.
//!
//! The caller hands over the nodes making up one visual paragraph. The first
//! node decides the list context: the nearest enclosing `<li>` (unless a list
//! container is hit first), otherwise the nearest block. Runs are emitted
//! depth-first, each carrying the style cascaded over its full ancestor chain.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId, NodeKind, Tag};
use crate::layout_config::{Container, MarkerCell, TextRun};
use crate::style::{resolve_style, StyleDefaults};

pub const BULLET: &str = "\u{2022}  ";

/// Prefix drawn in front of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListMarker {
    None,
    Bullet,
    /// 1-based position among the item's list-item siblings.
    Ordinal(u32),
}

impl ListMarker {
    pub fn prefix(&self) -> Option<String> {
        match self {
            ListMarker::None => None,
            ListMarker::Bullet => Some(BULLET.to_string()),
            ListMarker::Ordinal(n) => Some(format!("{n}. ")),
        }
    }
}

// ---------------------------------------------------------------------------
// List context
// ---------------------------------------------------------------------------

/// Nearest list item at or above `node`. A list container reached first
/// means the node sits directly in a list, not in an item.
pub fn find_enclosing_list_item(doc: &Document, node: NodeId) -> Option<NodeId> {
    for id in doc.ancestors(node) {
        if doc.is_list(id) {
            return None;
        }
        if doc.is_list_item(id) {
            return Some(id);
        }
    }
    None
}

/// Nearest block-level element at or above `node`.
pub fn find_enclosing_block(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.ancestors(node).find(|&id| doc.is_block(id))
}

/// Nearest list container strictly above `item`.
pub fn find_enclosing_list(doc: &Document, item: NodeId) -> Option<NodeId> {
    doc.ancestors(item).skip(1).find(|&id| doc.is_list(id))
}

/// 1 + the number of list items preceding `item` under the same parent.
pub fn ordinal_position(doc: &Document, item: NodeId) -> u32 {
    let Some(parent) = doc.parent(item) else {
        return 1;
    };
    let preceding = doc
        .children(parent)
        .iter()
        .take_while(|&&sibling| sibling != item)
        .filter(|&&sibling| doc.is_list_item(sibling))
        .count();
    preceding as u32 + 1
}

/// Marker for a paragraph whose context node is `context`.
///
/// Only list items get a marker. An item under `<ul>` gets a bullet; any
/// other item is numbered by position, including one with no list above it.
pub fn list_marker(doc: &Document, context: NodeId) -> ListMarker {
    if !doc.is_list_item(context) {
        return ListMarker::None;
    }
    match find_enclosing_list(doc, context).and_then(|list| doc.tag(list)) {
        Some(Tag::Ul) => ListMarker::Bullet,
        _ => ListMarker::Ordinal(ordinal_position(doc, context)),
    }
}

// ---------------------------------------------------------------------------
// Inline flattening
// ---------------------------------------------------------------------------

/// Depth-first runs for `node`, appended to `out`.
pub fn emit_runs(doc: &Document, node: NodeId, defaults: &StyleDefaults, out: &mut Vec<TextRun>) {
    // Children go on in reverse so they pop in document order.
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        match &doc.node(current).kind {
            NodeKind::Text(text) => {
                out.push(TextRun::new(text.clone(), resolve_style(doc, current, defaults)));
            }
            _ if doc.is_line_break(current) => {
                out.push(TextRun::line_break(resolve_style(doc, current, defaults)));
            }
            _ => stack.extend(doc.children(current).iter().rev()),
        }
    }
}

/// Trims the outer edges of a run list: leading whitespace of the first
/// node's runs and trailing whitespace of the last node's runs. Trimming
/// carries into the next run only while a run trims to nothing, and stops at
/// a line break.
pub fn normalize_boundary_text(first: &mut [TextRun], last: &mut [TextRun]) {
    for run in first.iter_mut() {
        if run.is_line_break() {
            break;
        }
        run.text = run.text.trim_start().to_string();
        if !run.text.is_empty() {
            break;
        }
    }
    for run in last.iter_mut().rev() {
        if run.is_line_break() {
            break;
        }
        run.text = run.text.trim_end().to_string();
        if !run.text.is_empty() {
            break;
        }
    }
}

/// Flatten `nodes` into runs with boundary whitespace trimmed. The tree is
/// left untouched; runs emptied by trimming are dropped.
pub fn flatten_runs(doc: &Document, nodes: &[NodeId], defaults: &StyleDefaults) -> Vec<TextRun> {
    let mut groups: Vec<Vec<TextRun>> = nodes
        .iter()
        .map(|&node| {
            let mut runs = Vec::new();
            emit_runs(doc, node, defaults, &mut runs);
            runs
        })
        .collect();

    match groups.as_mut_slice() {
        [] => {}
        [only] => trim_single(only),
        [first, .., last] => normalize_boundary_text(first, last),
    }

    groups
        .into_iter()
        .flatten()
        .filter(|run| !run.text.is_empty())
        .collect()
}

/// Both edges live in one group; trim them one at a time.
fn trim_single(runs: &mut [TextRun]) {
    normalize_boundary_text(runs, &mut []);
    normalize_boundary_text(&mut [], runs);
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Composes one paragraph's inline nodes into a [`Container`].
pub struct ParagraphComposer<'a> {
    doc: &'a Document,
    defaults: &'a StyleDefaults,
    line_nodes: Vec<NodeId>,
}

impl<'a> ParagraphComposer<'a> {
    pub fn new(doc: &'a Document, line_nodes: Vec<NodeId>, defaults: &'a StyleDefaults) -> Self {
        Self {
            doc,
            defaults,
            line_nodes,
        }
    }

    /// List item or block that owns this paragraph, if any.
    pub fn context(&self) -> Option<NodeId> {
        let first = *self.line_nodes.first()?;
        find_enclosing_list_item(self.doc, first).or_else(|| find_enclosing_block(self.doc, first))
    }

    /// `None` when the paragraph has no context and composes to nothing.
    pub fn marker(&self) -> Option<ListMarker> {
        self.context().map(|ctx| list_marker(self.doc, ctx))
    }

    pub fn runs(&self) -> Vec<TextRun> {
        flatten_runs(self.doc, &self.line_nodes, self.defaults)
    }

    /// Write the marker cell (if any) and the runs into `container`.
    pub fn compose(&self, container: &mut dyn Container) {
        if self.line_nodes.is_empty() {
            log::debug!("empty line run; nothing to compose");
            return;
        }
        let Some(marker) = self.marker() else {
            log::trace!(
                "no list item or block above node {}; skipping",
                self.line_nodes[0].index()
            );
            return;
        };

        let runs = self.runs();
        log::debug!("composing {} runs with marker {:?}", runs.len(), marker);
        match marker.prefix() {
            Some(prefix) => container.row(MarkerCell::new(prefix)).text(runs),
            None => container.text(runs),
        }
    }
}
