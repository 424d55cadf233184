//! Arena-backed concrete syntax tree.
//!
//! This is the format-exact side of the document: every byte of the
//! original source is recoverable from it. Nodes live in a contiguous
//! arena owned by [`Ast`] and are referenced by [`AstId`], a newtype over
//! `NonZeroU32`, so `Option<AstId>` costs nothing extra. Handle equality
//! is node identity, which is what the object model's reconciliation
//! algorithm matches on.
//!
//! Each node carries a kind, an ordered child list, an ordered attribute
//! container (meaningful for tag-syntax elements; it may legitimately hold
//! several entries with the same case-insensitive name) and an optional
//! formatting token stream ([`RtData`]). The tree is produced by an
//! external parser and is append/replace-only afterwards: the splice
//! operations defined here are the only writers, and each one keeps the
//! token stream's slot-count invariant intact.

mod rtd;

pub mod printer;

pub use rtd::RtData;

use std::num::NonZeroU32;

#[cfg(test)]
mod tests;

/// A typed index into the syntax tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct AstId(NonZeroU32);

impl AstId {
    fn from_index(index: usize) -> Self {
        debug_assert!(index > 0);
        match NonZeroU32::new(index as u32) {
            Some(raw) => Self(raw),
            None => unreachable!("arena index 0 is a placeholder"),
        }
    }

    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Node kind and semantic payload of a syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstKind {
    /// Root of a parsed page
    Document,
    /// Native wiki paragraph; children are its content, including the
    /// blank-line markers that encode the gap attributes
    Paragraph,
    /// Native wiki horizontal rule
    HorizontalRule,
    /// Element written in tag syntax
    XmlElement { name: String, self_closing: bool },
    /// One concrete attribute entry; children are the source spelling of
    /// the name followed by the value tokens
    XmlAttribute { name: String },
    /// Verbatim text run
    Text(String),
    /// One blank-line marker, storing its literal bytes
    Newline(String),
    /// Comment body (without delimiters)
    Comment(String),
}

impl AstKind {
    pub fn is_attribute(&self) -> bool {
        matches!(self, AstKind::XmlAttribute { .. })
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, AstKind::Newline(_))
    }
}

#[derive(Debug, Clone)]
struct AstData {
    kind: AstKind,
    attrs: Vec<AstId>,
    children: Vec<AstId>,
    rtd: Option<RtData>,
}

impl AstData {
    fn new(kind: AstKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            children: Vec::new(),
            rtd: None,
        }
    }
}

/// The syntax tree arena.
///
/// Dropping the arena frees every node; detaching a node from its parent
/// container merely makes it unreachable.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<AstData>,
}

impl Ast {
    pub fn new() -> Self {
        // index 0 is a placeholder so that AstId can be non-zero
        Self {
            nodes: vec![AstData::new(AstKind::Document)],
        }
    }

    fn alloc(&mut self, data: AstData) -> AstId {
        self.nodes.push(data);
        AstId::from_index(self.nodes.len() - 1)
    }

    fn data(&self, id: AstId) -> &AstData {
        &self.nodes[id.as_index()]
    }

    fn data_mut(&mut self, id: AstId) -> &mut AstData {
        &mut self.nodes[id.as_index()]
    }

    // =========================================================================
    // Construction

    pub fn text(&mut self, content: &str) -> AstId {
        self.alloc(AstData::new(AstKind::Text(content.to_string())))
    }

    pub fn newline(&mut self) -> AstId {
        self.alloc(AstData::new(AstKind::Newline("\n".to_string())))
    }

    pub fn comment(&mut self, text: &str) -> AstId {
        self.alloc(AstData::new(AstKind::Comment(text.to_string())))
    }

    pub fn paragraph(&mut self, children: Vec<AstId>) -> AstId {
        let mut data = AstData::new(AstKind::Paragraph);
        data.children = children;
        self.alloc(data)
    }

    pub fn horizontal_rule(&mut self) -> AstId {
        let mut data = AstData::new(AstKind::HorizontalRule);
        data.rtd = Some(RtData::new(vec!["----"]));
        self.alloc(data)
    }

    pub fn document(&mut self, children: Vec<AstId>) -> AstId {
        let mut data = AstData::new(AstKind::Document);
        data.children = children;
        self.alloc(data)
    }

    pub fn xml_element(
        &mut self,
        name: &str,
        self_closing: bool,
        attrs: Vec<AstId>,
        children: Vec<AstId>,
    ) -> AstId {
        let mut data = AstData::new(AstKind::XmlElement {
            name: name.to_string(),
            self_closing,
        });
        data.attrs = attrs;
        data.children = children;
        self.alloc(data)
    }

    /// Create a concrete attribute entry with canonical quoting.
    ///
    /// The children are the source spelling of the name and one value
    /// token; the stream supplies the leading space, the `="` separator
    /// and the closing quote.
    pub fn xml_attribute(&mut self, name: &str, value: &str) -> AstId {
        let name_node = self.text(name);
        let value_node = self.text(value);
        let mut data = AstData::new(AstKind::XmlAttribute {
            name: name.to_string(),
        });
        data.children = vec![name_node, value_node];
        data.rtd = Some(RtData::new(vec![" ", "=\"", "\""]));
        self.alloc(data)
    }

    // =========================================================================
    // Access

    pub fn kind(&self, id: AstId) -> &AstKind {
        &self.data(id).kind
    }

    pub fn children(&self, id: AstId) -> &[AstId] {
        &self.data(id).children
    }

    pub fn attr_entries(&self, id: AstId) -> &[AstId] {
        &self.data(id).attrs
    }

    pub fn rtd(&self, id: AstId) -> Option<&RtData> {
        self.data(id).rtd.as_ref()
    }

    pub fn set_rtd(&mut self, id: AstId, rtd: RtData) {
        self.data_mut(id).rtd = Some(rtd);
    }

    /// Semantic name of an attribute entry, `None` for other kinds.
    pub fn attribute_name(&self, id: AstId) -> Option<&str> {
        match &self.data(id).kind {
            AstKind::XmlAttribute { name } => Some(name),
            _ => None,
        }
    }

    /// Value of an attribute entry: its value tokens joined, skipping the
    /// name-spelling child.
    pub fn attribute_value(&self, id: AstId) -> Option<String> {
        if !self.data(id).kind.is_attribute() {
            return None;
        }
        let mut value = String::new();
        for child in self.data(id).children.iter().skip(1) {
            if let AstKind::Text(content) = &self.data(*child).kind {
                value.push_str(content);
            }
        }
        Some(value)
    }

    // =========================================================================
    // Child splices: the only writers of child lists, each maintaining the
    // token stream's slot-count invariant

    pub fn push_child(&mut self, parent: AstId, child: AstId) {
        let data = self.data_mut(parent);
        data.children.push(child);
        let gap = data.children.len() - 1;
        if let Some(rtd) = &mut data.rtd {
            rtd.insert_gap(gap);
        }
    }

    pub fn insert_child(&mut self, parent: AstId, index: usize, child: AstId) {
        let data = self.data_mut(parent);
        data.children.insert(index, child);
        if let Some(rtd) = &mut data.rtd {
            rtd.insert_gap(index);
        }
    }

    pub fn remove_child(&mut self, parent: AstId, index: usize) -> AstId {
        let data = self.data_mut(parent);
        let removed = data.children.remove(index);
        if let Some(rtd) = &mut data.rtd {
            rtd.remove_gap(index);
        }
        removed
    }

    pub fn truncate_children(&mut self, parent: AstId, len: usize) {
        let data = self.data_mut(parent);
        if len >= data.children.len() {
            return;
        }
        data.children.truncate(len);
        if let Some(rtd) = &mut data.rtd {
            rtd.resize_for(len);
        }
    }

    // =========================================================================
    // Attribute container splices, restricted to the synchronization
    // engine; entries carry their own separators, so no stream bookkeeping

    pub(crate) fn push_attr_entry(&mut self, parent: AstId, entry: AstId) {
        self.data_mut(parent).attrs.push(entry);
    }

    pub(crate) fn remove_attr_entry(&mut self, parent: AstId, index: usize) -> AstId {
        self.data_mut(parent).attrs.remove(index)
    }

    pub(crate) fn replace_attr_entry(&mut self, parent: AstId, index: usize, entry: AstId) -> AstId {
        std::mem::replace(&mut self.data_mut(parent).attrs[index], entry)
    }

    /// Carry the formatting token stream of one node over to another,
    /// re-fitted to the receiver's child count.
    pub(crate) fn carry_rtd(&mut self, from: AstId, to: AstId) {
        let Some(mut rtd) = self.data(from).rtd.clone() else {
            return;
        };
        rtd.resize_for(self.data(to).children.len());
        self.data_mut(to).rtd = Some(rtd);
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
