//! Horizontal rule elements.

use crate::dom::descriptors::{HorizAlign, Length};
use crate::dom::{Dom, ElementTag, NodeId};
use crate::result::Result;
use crate::text;

/// Typed handle to a horizontal rule element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizontalRule {
    node: NodeId,
}

impl HorizontalRule {
    /// Wrap `node` if it is a horizontal rule element.
    pub fn cast(dom: &Dom, node: NodeId) -> Option<Self> {
        match dom.element_tag(node) {
            Some(ElementTag::HorizontalRule) => Some(Self { node }),
            Some(ElementTag::Xml(name)) if text::names_equal(name, "hr") => Some(Self { node }),
            _ => None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn align(&self, dom: &Dom) -> Option<HorizAlign> {
        dom.attribute(self.node, "align")
            .and_then(|v| v.parse().ok())
    }

    /// Only left, center and right are meaningful for a rule; the
    /// descriptor rejects anything else.
    pub fn set_align(&self, dom: &mut Dom, align: Option<HorizAlign>) -> Result<()> {
        dom.set_attribute(self.node, "align", align.map(|a| a.as_str()))
            .map(|_| ())
    }

    pub fn noshade(&self, dom: &Dom) -> bool {
        dom.attribute(self.node, "noshade").is_some()
    }

    pub fn set_noshade(&self, dom: &mut Dom, noshade: bool) -> Result<()> {
        let value = if noshade { Some("noshade") } else { None };
        dom.set_attribute(self.node, "noshade", value).map(|_| ())
    }

    pub fn size(&self, dom: &Dom) -> Option<u32> {
        dom.attribute(self.node, "size")
            .and_then(|v| v.trim().parse().ok())
    }

    pub fn set_size(&self, dom: &mut Dom, size: Option<u32>) -> Result<()> {
        let value = size.map(|s| s.to_string());
        dom.set_attribute(self.node, "size", value.as_deref())
            .map(|_| ())
    }

    pub fn width(&self, dom: &Dom) -> Option<Length> {
        dom.attribute(self.node, "width")
            .and_then(|v| v.parse().ok())
    }

    pub fn set_width(&self, dom: &mut Dom, width: Option<Length>) -> Result<()> {
        let value = width.map(|w| w.to_string());
        dom.set_attribute(self.node, "width", value.as_deref())
            .map(|_| ())
    }
}
