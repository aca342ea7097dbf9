//! HTML parser – converts an HTML string into an arena-backed DOM tree.
//!
//! Nodes live in a flat vector owned by [`Document`]; parents and children
//! are plain [`NodeId`] indices, so walking up the tree is an index hop.
//!
//! We support a controlled subset of elements:
//! - Block: div, p, h1-h6, ul, ol, li, table, tr, td, th, blockquote, pre, ...
//! - Inline: span, a, b, strong, i, em, u, s, del, small, code, br
//! - Styling via the `style` attribute

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// Index of a node inside its owning [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The synthetic document root.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// The tag name of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Html,
    Head,
    Body,
    Div,
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    Table,
    Tr,
    Td,
    Th,
    Blockquote,
    Pre,
    Section,
    Article,
    Header,
    Footer,
    Span,
    A,
    B,
    Strong,
    I,
    Em,
    U,
    S,
    Del,
    Small,
    Code,
    Br,
    Hr,
    Img,
    /// Catch-all for unknown tags – kept and treated as inline.
    Unknown(String),
}

impl Tag {
    pub fn from_name(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "html" => Tag::Html,
            "head" => Tag::Head,
            "body" => Tag::Body,
            "div" => Tag::Div,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "h5" => Tag::H5,
            "h6" => Tag::H6,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "table" => Tag::Table,
            "tr" => Tag::Tr,
            "td" => Tag::Td,
            "th" => Tag::Th,
            "blockquote" => Tag::Blockquote,
            "pre" => Tag::Pre,
            "section" => Tag::Section,
            "article" => Tag::Article,
            "header" => Tag::Header,
            "footer" => Tag::Footer,
            "span" => Tag::Span,
            "a" => Tag::A,
            "b" => Tag::B,
            "strong" => Tag::Strong,
            "i" => Tag::I,
            "em" => Tag::Em,
            "u" => Tag::U,
            "s" => Tag::S,
            "del" => Tag::Del,
            "small" => Tag::Small,
            "code" => Tag::Code,
            "br" => Tag::Br,
            "hr" => Tag::Hr,
            "img" => Tag::Img,
            other => Tag::Unknown(other.to_string()),
        }
    }

    /// Lowercase tag name, the key used for style-default lookups.
    pub fn name(&self) -> &str {
        match self {
            Tag::Html => "html",
            Tag::Head => "head",
            Tag::Body => "body",
            Tag::Div => "div",
            Tag::P => "p",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Table => "table",
            Tag::Tr => "tr",
            Tag::Td => "td",
            Tag::Th => "th",
            Tag::Blockquote => "blockquote",
            Tag::Pre => "pre",
            Tag::Section => "section",
            Tag::Article => "article",
            Tag::Header => "header",
            Tag::Footer => "footer",
            Tag::Span => "span",
            Tag::A => "a",
            Tag::B => "b",
            Tag::Strong => "strong",
            Tag::I => "i",
            Tag::Em => "em",
            Tag::U => "u",
            Tag::S => "s",
            Tag::Del => "del",
            Tag::Small => "small",
            Tag::Code => "code",
            Tag::Br => "br",
            Tag::Hr => "hr",
            Tag::Img => "img",
            Tag::Unknown(name) => name,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Tag::Html
                | Tag::Body
                | Tag::Div
                | Tag::P
                | Tag::H1
                | Tag::H2
                | Tag::H3
                | Tag::H4
                | Tag::H5
                | Tag::H6
                | Tag::Ul
                | Tag::Ol
                | Tag::Li
                | Tag::Table
                | Tag::Tr
                | Tag::Td
                | Tag::Th
                | Tag::Blockquote
                | Tag::Pre
                | Tag::Section
                | Tag::Article
                | Tag::Header
                | Tag::Footer
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Tag::Ul | Tag::Ol)
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, Tag::Li)
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, Tag::Br)
    }

    /// Elements that never have children or a closing tag.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Br | Tag::Hr | Tag::Img)
    }

    /// Elements whose content never reaches the page.
    pub fn is_hidden(&self) -> bool {
        match self {
            Tag::Head => true,
            Tag::Unknown(name) => matches!(name.as_str(), "script" | "style" | "title"),
            _ => false,
        }
    }
}

/// Tag and attributes of an element node.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
}

impl ElementData {
    pub fn inline_style(&self) -> Option<&str> {
        self.attributes.get("style").map(|s| s.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

/// A node in our DOM tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Owner of every node of one parsed tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: Tag,
        attributes: HashMap<String, String>,
    ) -> NodeId {
        self.push(parent, NodeKind::Element(ElementData { tag, attributes }))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        self.element(id).map(|e| &e.tag)
    }

    /// Lowercase tag name, or `#text` / `#document` for non-elements.
    pub fn tag_name(&self, id: NodeId) -> &str {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => e.tag.name(),
            NodeKind::Text(_) => "#text",
            NodeKind::Document => "#document",
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.attributes.get(name))
            .map(|v| v.as_str())
    }

    /// Literal content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.nodes[current.0].kind {
                NodeKind::Text(t) => out.push_str(t),
                _ => stack.extend(self.children(current).iter().rev()),
            }
        }
    }

    /// Walks from `id` up to the root, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(Tag::is_block)
    }

    pub fn is_list(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(Tag::is_list)
    }

    pub fn is_list_item(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(Tag::is_list_item)
    }

    pub fn is_line_break(&self, id: NodeId) -> bool {
        self.tag(id).is_some_and(Tag::is_line_break)
    }

    /// The `<body>` element, or the root if there is none.
    pub fn body(&self) -> NodeId {
        self.find_first(self.root(), &Tag::Body)
            .unwrap_or_else(|| self.root())
    }

    /// First element with `tag` in document order below `from`.
    pub fn find_first(&self, from: NodeId, tag: &Tag) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.tag(current) == Some(tag) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev());
        }
        None
    }
}

/// Iterator returned by [`Document::ancestors`].
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

// ---------------------------------------------------------------------------
// Parser – single pass over HTML with a stack of open elements
// ---------------------------------------------------------------------------

/// Parse an HTML string into a [`Document`].
///
/// The hand-written parser handles the controlled subset. Any closing tag
/// closes the innermost open element, so templates are expected to be
/// well-formed; a closing tag with nothing open is skipped. Nesting depth is
/// bounded only by memory. Whitespace runs in text collapse to one space; gaps that are
/// only whitespace are dropped where no text can render (root, lists,
/// tables, rows) and kept as word separators everywhere else.
pub fn parse_html(html: &str) -> Document {
    let mut parser = Parser::new(html);
    parser.parse_document();
    parser.doc
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    doc: Document,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            doc: Document::new(),
        }
    }

    fn parse_document(&mut self) {
        let mut open = vec![self.doc.root()];
        while !self.eof() {
            let parent = open.last().copied().unwrap_or(NodeId::ROOT);
            if self.starts_with("</") {
                self.parse_closing_tag();
                // The root is never closed.
                if open.len() > 1 {
                    open.pop();
                }
                continue;
            }
            if let Some(id) = self.parse_node(parent) {
                open.push(id);
            }
        }
    }

    /// Parses one node under `parent`. Returns the element if it stays open
    /// for children.
    fn parse_node(&mut self, parent: NodeId) -> Option<NodeId> {
        if self.starts_with("<!--") {
            self.skip_comment();
            return None;
        }
        if self.starts_with("<!") || self.starts_with("<?") {
            // Doctype / processing instruction
            while !self.eof() && !self.starts_with(">") {
                self.advance(1);
            }
            if !self.eof() {
                self.advance(1);
            }
            return None;
        }
        if self.starts_with("<") {
            self.parse_element(parent)
        } else {
            self.parse_text(parent);
            None
        }
    }

    fn parse_text(&mut self, parent: NodeId) {
        let start = self.pos;
        while !self.eof() && !self.starts_with("<") {
            self.advance(1);
        }
        let text = collapse_whitespace(&decode_entities(&self.input[start..self.pos]));
        // Indentation between list items, table rows, or top-level tags.
        if text.trim().is_empty() && self.holds_no_text(parent) {
            return;
        }
        self.doc.append_text(parent, text);
    }

    fn holds_no_text(&self, parent: NodeId) -> bool {
        match self.doc.tag(parent) {
            None => true,
            Some(tag) => tag.is_list() || matches!(tag, Tag::Html | Tag::Table | Tag::Tr),
        }
    }

    fn parse_element(&mut self, parent: NodeId) -> Option<NodeId> {
        self.advance(1); // '<'
        let tag = Tag::from_name(&self.parse_name());

        let mut attributes = HashMap::new();
        loop {
            self.skip_whitespace();
            if self.eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            let before = self.pos;
            let (key, value) = self.parse_attribute();
            if key.is_empty() {
                // Stray character inside the tag
                if self.pos == before {
                    self.advance(1);
                }
                continue;
            }
            attributes.insert(key.to_ascii_lowercase(), value);
        }

        let void = tag.is_void();
        let id = self.doc.append_element(parent, tag, attributes);

        if self.starts_with("/>") {
            self.advance(2);
            return None;
        }
        if self.starts_with(">") {
            self.advance(1);
        }
        (!void).then_some(id)
    }

    fn parse_closing_tag(&mut self) {
        self.advance(2); // '</'
        self.parse_name();
        self.skip_whitespace();
        if self.starts_with(">") {
            self.advance(1);
        }
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ':' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_attribute(&mut self) -> (String, String) {
        let key = self.parse_name();
        self.skip_whitespace();
        if !self.starts_with("=") {
            return (key, String::new());
        }
        self.advance(1);
        self.skip_whitespace();
        let value = self.parse_attr_value();
        (key, value)
    }

    fn parse_attr_value(&mut self) -> String {
        for quote in ["\"", "'"] {
            if self.starts_with(quote) {
                self.advance(1);
                let start = self.pos;
                while !self.eof() && !self.starts_with(quote) {
                    self.advance(1);
                }
                let val = decode_entities(&self.input[start..self.pos]);
                if !self.eof() {
                    self.advance(1);
                }
                return val;
            }
        }
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_whitespace() || c == '>' || c == '/' {
                break;
            }
            self.advance(1);
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance(1);
        }
    }

    fn skip_comment(&mut self) {
        self.advance(4); // <!--
        while !self.eof() && !self.starts_with("-->") {
            self.advance(1);
        }
        if !self.eof() {
            self.advance(3);
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self, n: usize) {
        // Characters, not bytes.
        for _ in 0..n {
            if let Some(c) = self.current_char() {
                self.pos += c.len_utf8();
            }
        }
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", "\u{00A0}")
        .replace("&amp;", "&")
}

/// Collapses runs of ASCII whitespace to one space. Non-breaking spaces survive.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_gap = false;
    for c in s.chars() {
        if c.is_ascii_whitespace() {
            if !in_gap {
                out.push(' ');
            }
            in_gap = true;
        } else {
            out.push(c);
            in_gap = false;
        }
    }
    out
}
