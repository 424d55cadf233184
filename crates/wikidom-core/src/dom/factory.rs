//! Construction of the object model from a parsed syntax tree.
//!
//! Pure-formatting tokens (newline markers and whitespace-only text)
//! stay in the syntax tree; the object model only sees semantic content.
//! When a concrete attribute container carries several entries with the
//! same case-insensitive name, the last one wins: the object model node is
//! identity-linked to it, and the stale earlier entries are left in place
//! untouched so an unedited document still serializes byte-for-byte.

use super::attributes::AttributeManager;
use super::{AttrData, ChildList, Dom, ElementData, ElementTag, NodeData, NodeId, Payload};
use crate::ast::{Ast, AstId, AstKind};
use crate::text;
use tracing::trace;

impl Dom {
    /// Wrap a parsed syntax tree into an object model document.
    ///
    /// `root` is normally the tree's document node; passing a single
    /// element wraps it under a fresh document node instead.
    pub fn from_ast(ast: Ast, root: AstId) -> Self {
        let is_document = matches!(ast.kind(root), AstKind::Document);
        let mut dom = Self {
            nodes: vec![NodeData::placeholder()],
            ast,
            root: NodeId::from_index(1),
        };
        let doc = dom.alloc(
            Payload::Document {
                children: ChildList::default(),
                attrs: AttributeManager::Inert,
            },
            Some(root),
        );
        debug_assert_eq!(doc, dom.root);
        if is_document {
            for child in dom.ast.children(root).to_vec() {
                dom.wrap_into(child, doc);
            }
        } else {
            dom.wrap_into(root, doc);
        }
        dom
    }

    fn wrap_into(&mut self, ast_id: AstId, parent: NodeId) {
        if let Some(node) = self.wrap(ast_id) {
            self.attach_child(parent, node);
        }
    }

    /// Build the object model node for one syntax subtree; `None` for
    /// pure-formatting tokens.
    fn wrap(&mut self, ast_id: AstId) -> Option<NodeId> {
        let kind = self.ast.kind(ast_id).clone();
        match kind {
            AstKind::Text(content) => {
                if text::is_whitespace(&content) {
                    None
                } else {
                    Some(self.alloc(Payload::Text(content), Some(ast_id)))
                }
            }
            AstKind::Newline(_) => None,
            AstKind::Comment(body) => Some(self.alloc(Payload::Comment(body), Some(ast_id))),
            AstKind::Paragraph => {
                let node = self.wrap_element(ElementTag::Paragraph, ast_id);
                Some(node)
            }
            AstKind::HorizontalRule => {
                let node = self.wrap_element(ElementTag::HorizontalRule, ast_id);
                Some(node)
            }
            AstKind::XmlElement { name, .. } => {
                let tag = if text::names_equal(&name, "p") {
                    ElementTag::Paragraph
                } else if text::names_equal(&name, "hr") {
                    ElementTag::HorizontalRule
                } else {
                    ElementTag::Xml(name)
                };
                let node = self.wrap_element(tag, ast_id);
                self.wrap_attributes(ast_id, node);
                Some(node)
            }
            // attribute entries are wrapped by their element, and a nested
            // document has no object model meaning
            AstKind::XmlAttribute { .. } | AstKind::Document => None,
        }
    }

    fn wrap_element(&mut self, tag: ElementTag, ast_id: AstId) -> NodeId {
        let node = self.alloc(
            Payload::Element(ElementData {
                tag,
                children: ChildList::default(),
                attrs: AttributeManager::active(),
            }),
            Some(ast_id),
        );
        for child in self.ast.children(ast_id).to_vec() {
            self.wrap_into(child, node);
        }
        node
    }

    /// Build the attribute chain: one node per distinct case-insensitive
    /// name, linked to the last container entry carrying that name, in
    /// first-occurrence order.
    fn wrap_attributes(&mut self, ast_id: AstId, elem: NodeId) {
        let mut winners: Vec<(String, AstId)> = Vec::new();
        for entry in self.ast.attr_entries(ast_id).to_vec() {
            let Some(name) = self.ast.attribute_name(entry) else {
                continue;
            };
            let lower = name.to_ascii_lowercase();
            match winners.iter_mut().find(|(n, _)| *n == lower) {
                Some(slot) => {
                    trace!(name = %lower, "duplicate concrete attribute entry; last wins");
                    slot.1 = entry;
                }
                None => winners.push((lower, entry)),
            }
        }
        for (_, entry) in winners {
            let name = match self.ast.attribute_name(entry) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let value = self.ast.attribute_value(entry).unwrap_or_default();
            let attr = self.alloc(Payload::Attribute(AttrData { name, value }), Some(entry));
            self.append_attribute(elem, attr);
        }
    }

    /// Append a fresh attribute node at the tail of the chain.
    fn append_attribute(&mut self, elem: NodeId, attr: NodeId) {
        let mut tail = None;
        let mut cursor = self.first_attr(elem);
        while let Some(id) = cursor {
            tail = Some(id);
            cursor = self.node(id).next;
        }
        {
            let data = self.node_mut(attr);
            data.parent = Some(elem);
            data.prev = tail;
            data.next = None;
        }
        match tail {
            Some(prev) => self.node_mut(prev).next = Some(attr),
            None => self.set_first_attr(elem, Some(attr)),
        }
    }
}
