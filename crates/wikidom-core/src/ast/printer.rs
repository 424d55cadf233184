//! Exact-source rendering of the syntax tree.
//!
//! When a node carries a formatting token stream the output is its slots
//! interleaved with its children; otherwise a per-kind canonical rendering
//! is used. A tree that came out of the parser and was never edited
//! reproduces its source byte-for-byte.

use super::{Ast, AstId, AstKind};

/// Render the subtree rooted at `node` back to source text.
pub fn source_text(ast: &Ast, node: AstId) -> String {
    let mut out = String::new();
    print_node(ast, node, &mut out);
    out
}

fn print_node(ast: &Ast, id: AstId, out: &mut String) {
    match ast.kind(id) {
        AstKind::Text(content) => out.push_str(content),
        AstKind::Newline(literal) => out.push_str(literal),
        AstKind::Comment(text) => match ast.rtd(id) {
            Some(rtd) => out.push_str(rtd.slot(0)),
            None => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        },
        AstKind::Document | AstKind::Paragraph => print_children(ast, id, out),
        AstKind::HorizontalRule => match ast.rtd(id) {
            Some(rtd) => out.push_str(rtd.slot(0)),
            None => out.push_str("----"),
        },
        AstKind::XmlAttribute { name } => match ast.rtd(id) {
            Some(_) => print_children(ast, id, out),
            None => {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                for child in ast.children(id).iter().skip(1) {
                    print_node(ast, *child, out);
                }
                out.push('"');
            }
        },
        AstKind::XmlElement { name, self_closing } => {
            out.push('<');
            out.push_str(name);
            for entry in ast.attr_entries(id) {
                print_node(ast, *entry, out);
            }
            if ast.rtd(id).is_some() {
                print_children(ast, id, out);
            } else if ast.children(id).is_empty() && *self_closing {
                out.push_str(" />");
            } else {
                out.push('>');
                for child in ast.children(id) {
                    print_node(ast, *child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

/// Children interleaved with the stream's slots (empty slots when there is
/// no stream).
fn print_children(ast: &Ast, id: AstId, out: &mut String) {
    let children = ast.children(id);
    match ast.rtd(id) {
        Some(rtd) => {
            for (i, child) in children.iter().enumerate() {
                out.push_str(rtd.slot(i));
                print_node(ast, *child, out);
            }
            out.push_str(rtd.slot(children.len()));
        }
        None => {
            for child in children {
                print_node(ast, *child, out);
            }
        }
    }
}
