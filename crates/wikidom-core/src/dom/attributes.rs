//! Attribute management and object-model ↔ syntax-tree reconciliation.
//!
//! Every element owns one attribute manager. The inert variant backs
//! attribute-less node kinds: reads come back empty, writes fail with an
//! unsupported-operation error. The active variant holds the head of the
//! element's attribute chain and implements the replacement algorithm that
//! keeps the chain consistent with the concrete attribute container, a
//! container that is allowed to carry stale duplicates, while the object
//! model never is. By convention the object model reflects the **last**
//! container entry with a given case-insensitive name.
//!
//! The routines in this file are the only writers of concrete attribute
//! containers reachable from the object model. A scan that cannot find the
//! entry it is entitled to expect is an unrecoverable invariant violation
//! and panics rather than leaving a silently corrupted document behind.

use super::descriptors::{self, AttributeDescriptor};
use super::siblings::Siblings;
use super::{Dom, ElementTag, NodeId, Payload};
use crate::ast::AstId;
use crate::error::DomError;
use crate::result::Result;
use crate::text;
use tracing::{debug, trace};

const OUT_OF_SYNC: &str = "object model and syntax tree out of sync";

/// Per-element attribute bookkeeping.
#[derive(Debug, Clone)]
pub(crate) enum AttributeManager {
    /// For node kinds that never carry attributes
    Inert,
    /// Head of the attribute chain, in document order
    Active { first: Option<NodeId> },
}

impl AttributeManager {
    pub(crate) fn active() -> Self {
        AttributeManager::Active { first: None }
    }

    /// An empty manager of the same variant, for cloned nodes.
    pub(crate) fn reset(&self) -> Self {
        match self {
            AttributeManager::Inert => AttributeManager::Inert,
            AttributeManager::Active { .. } => AttributeManager::active(),
        }
    }
}

impl Dom {
    fn manager(&self, id: NodeId) -> Option<&AttributeManager> {
        match &self.node(id).payload {
            Payload::Document { attrs, .. } => Some(attrs),
            Payload::Element(e) => Some(&e.attrs),
            _ => None,
        }
    }

    pub(crate) fn first_attr(&self, id: NodeId) -> Option<NodeId> {
        match self.manager(id) {
            Some(AttributeManager::Active { first }) => *first,
            _ => None,
        }
    }

    pub(crate) fn set_first_attr(&mut self, id: NodeId, value: Option<NodeId>) {
        let mgr = match &mut self.node_mut(id).payload {
            Payload::Document { attrs, .. } => attrs,
            Payload::Element(e) => &mut e.attrs,
            _ => return,
        };
        if let AttributeManager::Active { first } = mgr {
            *first = value;
        }
    }

    /// Element tag for a write operation, or the appropriate capability
    /// error for node kinds that cannot be written to.
    fn writable_tag(&self, elem: NodeId) -> Result<ElementTag> {
        match &self.node(elem).payload {
            Payload::Element(e) => Ok(e.tag.clone()),
            Payload::Document { .. } => Err(DomError::unsupported(
                "cannot modify attributes of an attribute-less node",
            )),
            _ => Err(DomError::unsupported(
                "this node kind does not support attributes",
            )),
        }
    }

    // =========================================================================
    // Reads

    /// Lazy view over an element's attribute chain (empty for kinds
    /// without attributes).
    pub fn attributes(&self, elem: NodeId) -> Siblings<'_> {
        Siblings::new(self, self.first_attr(elem))
    }

    /// The attribute node matching `name` case-insensitively, if any.
    pub fn attribute_node(&self, elem: NodeId, name: &str) -> Option<NodeId> {
        let mut cursor = self.first_attr(elem);
        while let Some(id) = cursor {
            if let Payload::Attribute(a) = &self.node(id).payload {
                if text::names_equal(&a.name, name) {
                    return Some(id);
                }
            }
            cursor = self.next_sibling(id);
        }
        None
    }

    /// The value of the attribute matching `name` case-insensitively.
    ///
    /// Derived attributes are computed from the adjacent structure on every
    /// call; they are never stored in the chain.
    pub fn attribute(&self, elem: NodeId, name: &str) -> Option<String> {
        let tag = match &self.node(elem).payload {
            Payload::Element(e) => Some(e.tag.clone()),
            _ => None,
        };
        if let Some(tag) = tag {
            let desc = descriptors::lookup(&tag, name);
            if desc.is_derived() {
                return desc.derived_value(self, elem);
            }
        }
        let attr = self.attribute_node(elem, name)?;
        match &self.node(attr).payload {
            Payload::Attribute(a) => Some(a.value.clone()),
            _ => None,
        }
    }

    // =========================================================================
    // Writes

    /// Set, replace or (with `None`) remove an attribute by name, running
    /// the full descriptor pipeline: normalization, verification, commit,
    /// post-commit action. Validation failures surface before any
    /// mutation.
    pub fn set_attribute(
        &mut self,
        elem: NodeId,
        name: &str,
        value: Option<&str>,
    ) -> Result<Option<NodeId>> {
        let tag = self.writable_tag(elem)?;
        if !text::is_valid_name(name) {
            return Err(DomError::invalid_argument(format!(
                "`{name}` is not a valid attribute name"
            )));
        }
        let desc = descriptors::lookup(&tag, name);
        let Some(raw) = value else {
            return self.remove_via_descriptor(elem, name, desc);
        };
        let normalized = desc.normalization().apply(raw);
        match desc.verify_and_convert(elem, normalized)? {
            // a value that normalizes to the attribute's implicit default
            // means "attribute absent", not "present with default"
            None => self.remove_via_descriptor(elem, name, desc),
            Some(converted) => {
                debug!(name, value = %converted, "set attribute");
                let old_value = self.attribute(elem, name);
                if desc.is_derived() {
                    desc.custom_action(self, elem, old_value.as_deref(), Some(&converted));
                    return Ok(None);
                }
                let attr = self.alloc_attribute_node(name, &converted);
                let container = if desc.sync_to_ast() {
                    self.concrete_attr_container(elem)
                } else {
                    None
                };
                let old = self.set_attribute_node_in(elem, attr, container)?;
                desc.custom_action(self, elem, old_value.as_deref(), Some(&converted));
                Ok(old)
            }
        }
    }

    /// Remove an attribute by name. Removing a name that is not present is
    /// a no-op, not an error, also on the inert manager.
    pub fn remove_attribute(&mut self, elem: NodeId, name: &str) -> Result<Option<NodeId>> {
        match &self.node(elem).payload {
            Payload::Element(e) => {
                let tag = e.tag.clone();
                let desc = descriptors::lookup(&tag, name);
                self.remove_via_descriptor(elem, name, desc)
            }
            Payload::Document { .. } => Ok(None),
            _ => Err(DomError::unsupported(
                "this node kind does not support attributes",
            )),
        }
    }

    /// Remove a specific attribute node after checking it actually belongs
    /// to `elem`.
    pub fn remove_attribute_node(&mut self, elem: NodeId, attr: NodeId) -> Result<()> {
        self.writable_tag(elem)?;
        if !matches!(self.node(attr).payload, Payload::Attribute(_)) {
            return Err(DomError::invalid_argument("node is not an attribute node"));
        }
        if self.node(attr).parent != Some(elem) {
            return Err(DomError::invalid_argument(
                "given node is not an attribute of this element",
            ));
        }
        let container = self.concrete_attr_container(elem);
        self.detach_attribute(elem, attr, container);
        Ok(())
    }

    /// Commit a detached attribute node, replacing any same-name attribute.
    /// Returns the replaced node, if one existed.
    pub fn set_attribute_node(&mut self, elem: NodeId, attr: NodeId) -> Result<Option<NodeId>> {
        let tag = self.writable_tag(elem)?;
        // derived attributes never enter the chain; hand the value to the
        // name-based pipeline instead
        if let Payload::Attribute(a) = &self.node(attr).payload {
            let desc = descriptors::lookup(&tag, &a.name);
            if desc.is_derived() {
                let (name, value) = (a.name.clone(), a.value.clone());
                return self.set_attribute(elem, &name, Some(&value));
            }
        }
        let container = self.concrete_attr_container(elem);
        self.set_attribute_node_in(elem, attr, container)
    }

    // =========================================================================
    // Manager internals

    fn remove_via_descriptor(
        &mut self,
        elem: NodeId,
        name: &str,
        desc: AttributeDescriptor,
    ) -> Result<Option<NodeId>> {
        if !desc.is_removable() {
            return Err(DomError::invalid_argument(format!(
                "attribute `{name}` cannot be removed"
            )));
        }
        let old_value = self.attribute(elem, name);
        if desc.is_derived() {
            desc.custom_action(self, elem, old_value.as_deref(), None);
            return Ok(None);
        }
        let Some(old) = self.attribute_node(elem, name) else {
            return Ok(None);
        };
        debug!(name, "remove attribute");
        let container = if desc.sync_to_ast() {
            self.concrete_attr_container(elem)
        } else {
            None
        };
        self.detach_attribute(elem, old, container);
        desc.custom_action(self, elem, old_value.as_deref(), None);
        Ok(Some(old))
    }

    fn set_attribute_node_in(
        &mut self,
        elem: NodeId,
        attr: NodeId,
        container: Option<AstId>,
    ) -> Result<Option<NodeId>> {
        let name = match &self.node(attr).payload {
            Payload::Attribute(a) => a.name.clone(),
            _ => return Err(DomError::invalid_argument("node is not an attribute node")),
        };
        if self.is_linked(attr) {
            return Err(DomError::illegal_state(
                "attribute is still attached to another node",
            ));
        }
        let old = self.attribute_node(elem, &name);
        self.replace_attribute(elem, old, attr, container)?;
        Ok(old)
    }

    /// Unlink `remove` from the chain, then purge every same-name entry
    /// from the concrete container, checking that exactly one of the
    /// purged entries was the one this node was identity-linked to.
    fn detach_attribute(&mut self, elem: NodeId, remove: NodeId, container: Option<AstId>) {
        if self.first_attr(elem) == Some(remove) {
            let next = self.node(remove).next;
            self.set_first_attr(elem, next);
        }
        self.unlink(remove);

        let Some(container) = container else {
            return;
        };
        let name = match &self.node(remove).payload {
            Payload::Attribute(a) => a.name.clone(),
            _ => return,
        };
        let target = self.node(remove).ast;

        let mut identity_hits = 0usize;
        let mut index = 0;
        while index < self.ast.attr_entries(container).len() {
            let entry = self.ast.attr_entries(container)[index];
            // the container may hold garbage nodes of other kinds
            let Some(entry_name) = self.ast.attribute_name(entry) else {
                index += 1;
                continue;
            };
            if text::names_equal(entry_name, &name) {
                trace!(?entry, index, "purging concrete attribute entry");
                self.ast_mut().remove_attr_entry(container, index);
                if Some(entry) == target {
                    identity_hits += 1;
                }
                continue;
            }
            index += 1;
        }
        if identity_hits != 1 {
            panic!("{OUT_OF_SYNC}");
        }
    }

    /// The replacement algorithm: splice `new` into the chain where `old`
    /// sat (or at the tail), then reconcile the concrete container.
    fn replace_attribute(
        &mut self,
        elem: NodeId,
        old: Option<NodeId>,
        new: NodeId,
        container: Option<AstId>,
    ) -> Result<()> {
        // splice into the object model chain
        let (prev, next, old_was_first) = match old {
            Some(o) => {
                let prev = self.node(o).prev;
                let next = self.node(o).next;
                let was_first = self.first_attr(elem) == Some(o);
                self.unlink(o);
                (prev, next, was_first)
            }
            None => {
                let mut tail = self.first_attr(elem);
                while let Some(id) = tail {
                    match self.node(id).next {
                        Some(next) => tail = Some(next),
                        None => break,
                    }
                }
                (tail, None, false)
            }
        };
        self.link(new, Some(elem), prev, next)?;
        if self.first_attr(elem).is_none() || old_was_first {
            self.set_first_attr(elem, Some(new));
        }

        let Some(container) = container else {
            // no concrete container: the attribute lives purely in the
            // object model
            return Ok(());
        };

        let (name, value) = match &self.node(new).payload {
            Payload::Attribute(a) => (a.name.clone(), a.value.clone()),
            _ => return Ok(()),
        };
        let new_ast = match self.node(new).ast {
            Some(id) => id,
            None => {
                let entry = self.ast_mut().xml_attribute(&name, &value);
                self.node_mut(new).ast = Some(entry);
                entry
            }
        };
        let old_ast = old.and_then(|o| self.node(o).ast);

        // the container may hold several entries with this name; the one
        // the object model refers to comes last, everything else is stale
        let mut replaced = false;
        let mut index = 0;
        while index < self.ast.attr_entries(container).len() {
            let entry = self.ast.attr_entries(container)[index];
            let Some(entry_name) = self.ast.attribute_name(entry) else {
                index += 1;
                continue;
            };
            if text::names_equal(entry_name, &name) {
                if Some(entry) == old_ast {
                    self.ast_mut().replace_attr_entry(container, index, new_ast);
                    self.ast_mut().carry_rtd(entry, new_ast);
                    replaced = true;
                    break;
                }
                trace!(?entry, index, "deleting stale duplicate entry");
                self.ast_mut().remove_attr_entry(container, index);
                continue;
            }
            index += 1;
        }

        if !replaced {
            if old.is_some() {
                panic!("{OUT_OF_SYNC}");
            }
            self.ast_mut().push_attr_entry(container, new_ast);
        }
        Ok(())
    }
}
