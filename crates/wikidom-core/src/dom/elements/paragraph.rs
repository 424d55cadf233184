//! Paragraph elements and their structural gap attributes.
//!
//! A paragraph's `topgap` and `bottomgap` have no stored value anywhere:
//! the number of blank lines around the paragraph is encoded as a run of
//! newline markers in its concrete child container. Reading a gap scans
//! that region; writing rewrites it. The trailing region needs one marker
//! more than the requested gap, because the paragraph's own last line is
//! terminated by a newline that separates it from the element boundary.

use crate::ast::AstKind;
use crate::dom::descriptors::HorizAlign;
use crate::dom::{Dom, ElementTag, NodeId};
use crate::result::Result;
use crate::text;
use tracing::debug;

/// Typed handle to a paragraph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph {
    node: NodeId,
}

impl Paragraph {
    /// Wrap `node` if it is a paragraph element.
    pub fn cast(dom: &Dom, node: NodeId) -> Option<Self> {
        match dom.element_tag(node) {
            Some(ElementTag::Paragraph) => Some(Self { node }),
            Some(ElementTag::Xml(name)) if text::names_equal(name, "p") => Some(Self { node }),
            _ => None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Blank lines before the paragraph content, re-derived from the
    /// marker run on every call.
    pub fn top_gap(&self, dom: &Dom) -> u32 {
        top_gap_in_ast(dom, self.node)
    }

    pub fn set_top_gap(&self, dom: &mut Dom, lines: u32) -> Result<()> {
        dom.set_attribute(self.node, "topgap", Some(&lines.to_string()))
            .map(|_| ())
    }

    /// Blank lines after the paragraph content.
    pub fn bottom_gap(&self, dom: &Dom) -> u32 {
        bottom_gap_in_ast(dom, self.node)
    }

    pub fn set_bottom_gap(&self, dom: &mut Dom, lines: u32) -> Result<()> {
        dom.set_attribute(self.node, "bottomgap", Some(&lines.to_string()))
            .map(|_| ())
    }

    pub fn align(&self, dom: &Dom) -> Option<HorizAlign> {
        dom.attribute(self.node, "align")
            .and_then(|v| v.parse().ok())
    }

    pub fn set_align(&self, dom: &mut Dom, align: Option<HorizAlign>) -> Result<()> {
        dom.set_attribute(self.node, "align", align.map(|a| a.as_str()))
            .map(|_| ())
    }
}

/// Count the newline markers leading the paragraph's concrete content,
/// skipping pure-whitespace text and stopping at the first content token.
pub(crate) fn top_gap_in_ast(dom: &Dom, node: NodeId) -> u32 {
    let Some(container) = dom.ast_node(node) else {
        return 0;
    };
    let ast = dom.ast();
    let mut lines = 0;
    for child in ast.children(container) {
        match ast.kind(*child) {
            AstKind::Text(content) if text::is_whitespace(content) => {}
            AstKind::Newline(_) => lines += 1,
            _ => break,
        }
    }
    lines
}

/// Count the trailing newline markers, discounting the one that merely
/// terminates the paragraph's last line.
pub(crate) fn bottom_gap_in_ast(dom: &Dom, node: NodeId) -> u32 {
    let Some(container) = dom.ast_node(node) else {
        return 0;
    };
    let ast = dom.ast();
    let mut markers: u32 = 0;
    for child in ast.children(container).iter().rev() {
        match ast.kind(*child) {
            AstKind::Text(content) if text::is_whitespace(content) => {}
            AstKind::Newline(_) => markers += 1,
            _ => break,
        }
    }
    markers.saturating_sub(1)
}

/// Rewrite the leading marker run to exactly `lines` markers.
pub(crate) fn set_top_gap_in_ast(dom: &mut Dom, node: NodeId, lines: u32) {
    let Some(container) = dom.ast_node(node) else {
        return;
    };
    debug!(lines, "rewriting leading gap markers");

    // scan forward past whitespace, consuming up to `lines` markers
    let mut kept: u32 = 0;
    let mut index = 0;
    while index < dom.ast().children(container).len() {
        let child = dom.ast().children(container)[index];
        match dom.ast().kind(child) {
            AstKind::Text(content) if text::is_whitespace(content) => index += 1,
            AstKind::Newline(_) => {
                if kept >= lines {
                    break;
                }
                kept += 1;
                index += 1;
            }
            _ => break,
        }
    }

    if kept < lines {
        // index sits at the first content token (or the end of the list)
        for _ in kept..lines {
            let marker = dom.ast_mut().newline();
            dom.ast_mut().insert_child(container, index, marker);
            index += 1;
        }
    } else {
        remove_region_forward(dom, container, index);
    }
}

/// Rewrite the trailing marker run. One extra marker represents the
/// separator before the element boundary itself.
pub(crate) fn set_bottom_gap_in_ast(dom: &mut Dom, node: NodeId, lines: u32) {
    let Some(container) = dom.ast_node(node) else {
        return;
    };
    debug!(lines, "rewriting trailing gap markers");
    let wanted = lines + 1;

    // scan backward past whitespace, consuming up to `wanted` markers
    let mut kept: u32 = 0;
    let mut end = dom.ast().children(container).len();
    while end > 0 {
        let child = dom.ast().children(container)[end - 1];
        match dom.ast().kind(child) {
            AstKind::Text(content) if text::is_whitespace(content) => end -= 1,
            AstKind::Newline(_) => {
                if kept >= wanted {
                    break;
                }
                kept += 1;
                end -= 1;
            }
            _ => break,
        }
    }

    if kept < wanted {
        // end sits just past the last content token
        for _ in kept..wanted {
            let marker = dom.ast_mut().newline();
            dom.ast_mut().insert_child(container, end, marker);
        }
    } else {
        remove_region_backward(dom, container, end);
    }
}

/// Delete surplus markers and now-redundant whitespace from `index` up to
/// the next content token.
fn remove_region_forward(dom: &mut Dom, container: crate::ast::AstId, index: usize) {
    while index < dom.ast().children(container).len() {
        let child = dom.ast().children(container)[index];
        match dom.ast().kind(child) {
            AstKind::Text(content) if text::is_whitespace(content) => {
                dom.ast_mut().remove_child(container, index);
            }
            AstKind::Newline(_) => {
                dom.ast_mut().remove_child(container, index);
            }
            _ => break,
        }
    }
}

/// Backward variant: delete from just before `end` down to the previous
/// content token.
fn remove_region_backward(dom: &mut Dom, container: crate::ast::AstId, mut end: usize) {
    while end > 0 {
        let child = dom.ast().children(container)[end - 1];
        match dom.ast().kind(child) {
            AstKind::Text(content) if text::is_whitespace(content) => {
                dom.ast_mut().remove_child(container, end - 1);
                end -= 1;
            }
            AstKind::Newline(_) => {
                dom.ast_mut().remove_child(container, end - 1);
                end -= 1;
            }
            _ => break,
        }
    }
}
