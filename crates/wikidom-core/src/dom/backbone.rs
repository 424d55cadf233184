//! Shared node behavior: navigation, linking discipline, cloning and the
//! generic escaped serializer.
//!
//! Linking only rewires the three parties' pointers; the head pointers of
//! whichever list the node joins (an element's child list or attribute
//! chain) stay with the list owner and are maintained by the operation
//! that performs the splice.

use super::{Dom, ElementTag, NodeId, NodeKind, Payload};
use crate::error::DomError;
use crate::result::Result;
use crate::text;

impl Dom {
    // =========================================================================
    // Navigation

    pub fn node_kind(&self, id: NodeId) -> NodeKind {
        match &self.node(id).payload {
            Payload::Document { .. } => NodeKind::Document,
            Payload::Element(_) => NodeKind::Element,
            Payload::Text(_) => NodeKind::Text,
            Payload::Comment(_) => NodeKind::Comment,
            Payload::Attribute(_) => NodeKind::Attribute,
        }
    }

    pub fn node_name(&self, id: NodeId) -> &str {
        match &self.node(id).payload {
            Payload::Document { .. } => "#document",
            Payload::Element(e) => e.tag.name(),
            Payload::Text(_) => "#text",
            Payload::Comment(_) => "#comment",
            Payload::Attribute(a) => &a.name,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    /// A node is linked iff it has a parent.
    pub fn is_linked(&self, id: NodeId) -> bool {
        self.node(id).parent.is_some()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        match &self.node(id).payload {
            Payload::Document { children, .. } => children.first,
            Payload::Element(e) => e.children.first,
            _ => None,
        }
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        match &self.node(id).payload {
            Payload::Document { children, .. } => children.last,
            Payload::Element(e) => e.children.last,
            _ => None,
        }
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// Text content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Value of an attribute or comment node.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).payload {
            Payload::Attribute(a) => Some(&a.value),
            Payload::Comment(text) => Some(text),
            _ => None,
        }
    }

    pub fn element_tag(&self, id: NodeId) -> Option<&ElementTag> {
        match &self.node(id).payload {
            Payload::Element(e) => Some(&e.tag),
            _ => None,
        }
    }

    /// The concrete syntax node this object model node reflects, if any.
    pub fn ast_node(&self, id: NodeId) -> Option<crate::ast::AstId> {
        self.node(id).ast
    }

    // =========================================================================
    // Linking discipline

    /// Splice `node` between `prev` and `next` under `parent`.
    ///
    /// Fails without touching any chain if the node is already linked
    /// somewhere or if the neighbors do not form a consistent chain.
    pub fn link(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    ) -> Result<()> {
        if self.is_linked(node) {
            return Err(DomError::illegal_state(
                "node is still attached to another part of the document",
            ));
        }
        if let Some(p) = prev {
            if self.node(p).next != next {
                return Err(DomError::illegal_state("sibling chain inconsistent"));
            }
        }
        if let Some(n) = next {
            if self.node(n).prev != prev {
                return Err(DomError::illegal_state("sibling chain inconsistent"));
            }
        }
        {
            let data = self.node_mut(node);
            data.parent = parent;
            data.prev = prev;
            data.next = next;
        }
        if let Some(p) = prev {
            self.node_mut(p).next = Some(node);
        }
        if let Some(n) = next {
            self.node_mut(n).prev = Some(node);
        }
        Ok(())
    }

    /// Detach `node` from its chain, stitching its former neighbors
    /// together. Safe to call on an already-detached node.
    pub fn unlink(&mut self, node: NodeId) {
        let (prev, next) = {
            let data = self.node_mut(node);
            let links = (data.prev, data.next);
            data.parent = None;
            data.prev = None;
            data.next = None;
            links
        };
        if let Some(p) = prev {
            self.node_mut(p).next = next;
        }
        if let Some(n) = next {
            self.node_mut(n).prev = prev;
        }
    }

    // =========================================================================
    // Cloning

    /// Shallow structural copy: same payload, cleared relationships, empty
    /// child list and attribute chain. The concrete-node reference is
    /// carried over as-is; duplicating children is the caller's concern.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let ast = self.node(id).ast;
        let payload = match &self.node(id).payload {
            Payload::Document { attrs, .. } => Payload::Document {
                children: super::ChildList::default(),
                attrs: attrs.reset(),
            },
            Payload::Element(e) => Payload::Element(super::ElementData {
                tag: e.tag.clone(),
                children: super::ChildList::default(),
                attrs: e.attrs.reset(),
            }),
            other => other.clone(),
        };
        self.alloc(payload, ast)
    }

    // =========================================================================
    // Generic serialization

    /// Escaped, self-contained rendering by type-tag dispatch.
    ///
    /// This is the fallback for generic tooling; it does not consult the
    /// formatting token streams. Exact-source output comes from
    /// [`crate::ast::printer`] instead.
    pub fn serialize(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(node, &mut out);
        out
    }

    fn serialize_into(&self, node: NodeId, out: &mut String) {
        match &self.node(node).payload {
            Payload::Attribute(a) => {
                out.push_str(&a.name);
                out.push_str("=\"");
                out.push_str(&text::escape_html(&a.value));
                out.push('"');
            }
            Payload::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Payload::Text(content) => out.push_str(&text::escape_html(content)),
            Payload::Document { .. } => {
                for child in self.child_nodes(node).iter() {
                    self.serialize_into(child, out);
                }
            }
            Payload::Element(e) => {
                out.push('<');
                out.push_str(e.tag.name());
                for attr in self.attributes(node).iter() {
                    out.push(' ');
                    self.serialize_into(attr, out);
                }
                if self.has_child_nodes(node) {
                    out.push('>');
                    for child in self.child_nodes(node).iter() {
                        self.serialize_into(child, out);
                    }
                    out.push_str("</");
                    out.push_str(e.tag.name());
                    out.push('>');
                } else {
                    out.push_str(" />");
                }
            }
        }
    }
}
