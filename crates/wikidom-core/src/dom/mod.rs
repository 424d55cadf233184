//! The mutable, semantically typed document object model.
//!
//! Object model nodes live in an arena owned by [`Dom`], referenced by
//! [`NodeId`] handles; parent and sibling links are `Option<NodeId>`, so
//! navigation is O(1) and unlinking never rescans the tree. The `Dom` also
//! owns the concrete [`Ast`] it was built from: one document, one owner,
//! one writer. Every mutation that touches both trees goes through the
//! attribute synchronization routines in this module tree; nothing else is
//! allowed to write to a concrete attribute container.

mod backbone;
mod factory;

pub mod attributes;
pub mod descriptors;
pub mod elements;
pub mod siblings;

#[cfg(test)]
mod tests;

use self::attributes::AttributeManager;
use crate::ast::{Ast, AstId, AstKind};
use crate::result::Result;
use std::num::NonZeroU32;

/// A typed index into the object model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
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

/// Type tag of an object model node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
    Attribute,
}

/// Element kind; determines the attribute descriptors in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementTag {
    Paragraph,
    HorizontalRule,
    /// Any other tag-syntax element
    Xml(String),
}

impl ElementTag {
    pub fn name(&self) -> &str {
        match self {
            ElementTag::Paragraph => "p",
            ElementTag::HorizontalRule => "hr",
            ElementTag::Xml(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChildList {
    pub first: Option<NodeId>,
    pub last: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub tag: ElementTag,
    pub children: ChildList,
    pub attrs: AttributeManager,
}

#[derive(Debug, Clone)]
pub(crate) struct AttrData {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Document {
        children: ChildList,
        attrs: AttributeManager,
    },
    Element(ElementData),
    Text(String),
    Comment(String),
    Attribute(AttrData),
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub payload: Payload,
    /// Associated concrete syntax node; absent on freshly constructed,
    /// still-detached nodes
    pub ast: Option<AstId>,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

impl NodeData {
    fn new(payload: Payload, ast: Option<AstId>) -> Self {
        Self {
            payload,
            ast,
            parent: None,
            prev: None,
            next: None,
        }
    }

    fn placeholder() -> Self {
        Self::new(
            Payload::Document {
                children: ChildList::default(),
                attrs: AttributeManager::Inert,
            },
            None,
        )
    }
}

/// One document: the object model arena plus the syntax tree it mirrors.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<NodeData>,
    ast: Ast,
    root: NodeId,
}

impl Dom {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut ast = Ast::new();
        let doc_ast = ast.document(Vec::new());
        let mut nodes = vec![NodeData::placeholder()];
        nodes.push(NodeData::new(
            Payload::Document {
                children: ChildList::default(),
                attrs: AttributeManager::Inert,
            },
            Some(doc_ast),
        ));
        Self {
            nodes,
            ast,
            root: NodeId::from_index(1),
        }
    }

    /// The document root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to the underlying syntax tree.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub(crate) fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    pub(crate) fn alloc(&mut self, payload: Payload, ast: Option<AstId>) -> NodeId {
        self.nodes.push(NodeData::new(payload, ast));
        NodeId::from_index(self.nodes.len() - 1)
    }

    // =========================================================================
    // Construction of fresh, unlinked nodes

    /// Create a detached text node with a backing syntax node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        let ast = self.ast.text(content);
        self.alloc(Payload::Text(content.to_string()), Some(ast))
    }

    /// Create a detached comment node with a backing syntax node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        let ast = self.ast.comment(text);
        self.alloc(Payload::Comment(text.to_string()), Some(ast))
    }

    /// Create a detached element with an empty backing syntax node.
    pub fn create_element(&mut self, tag: ElementTag) -> NodeId {
        let ast = match &tag {
            ElementTag::Paragraph => self.ast.paragraph(Vec::new()),
            ElementTag::HorizontalRule => self.ast.horizontal_rule(),
            ElementTag::Xml(name) => {
                let name = name.clone();
                self.ast.xml_element(&name, false, Vec::new(), Vec::new())
            }
        };
        self.alloc(
            Payload::Element(ElementData {
                tag,
                children: ChildList::default(),
                attrs: AttributeManager::active(),
            }),
            Some(ast),
        )
    }

    /// Create a detached attribute node.
    ///
    /// The node has no concrete counterpart until it is committed to an
    /// element whose syntax node carries an attribute container.
    pub fn create_attribute(&mut self, name: &str, value: &str) -> Result<NodeId> {
        if !crate::text::is_valid_name(name) {
            return Err(crate::error::DomError::invalid_argument(format!(
                "`{name}` is not a valid attribute name"
            )));
        }
        Ok(self.alloc_attribute_node(name, value))
    }

    pub(crate) fn alloc_attribute_node(&mut self, name: &str, value: &str) -> NodeId {
        self.alloc(
            Payload::Attribute(AttrData {
                name: name.to_string(),
                value: value.to_string(),
            }),
            None,
        )
    }

    // =========================================================================
    // Cross-tree plumbing

    /// The concrete attribute container of an element, if its syntax node
    /// carries one. Native wiki constructs have none; their attributes
    /// live purely in the object model.
    pub(crate) fn concrete_attr_container(&self, elem: NodeId) -> Option<AstId> {
        let ast_id = self.node(elem).ast?;
        match self.ast.kind(ast_id) {
            AstKind::XmlElement { .. } => Some(ast_id),
            _ => None,
        }
    }

    pub(crate) fn child_list_mut(&mut self, id: NodeId) -> Option<&mut ChildList> {
        match &mut self.node_mut(id).payload {
            Payload::Document { children, .. } => Some(children),
            Payload::Element(e) => Some(&mut e.children),
            _ => None,
        }
    }

    /// Append `child` to `parent`'s child list. The child must be
    /// detached; list heads are kept consistent here.
    pub(crate) fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(child).parent.is_none());
        let prev = self.last_child(parent);
        {
            let data = self.node_mut(child);
            data.parent = Some(parent);
            data.prev = prev;
            data.next = None;
        }
        if let Some(p) = prev {
            self.node_mut(p).next = Some(child);
        }
        if let Some(list) = self.child_list_mut(parent) {
            if list.first.is_none() {
                list.first = Some(child);
            }
            list.last = Some(child);
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
