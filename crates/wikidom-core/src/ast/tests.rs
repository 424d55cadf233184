//! Tests for syntax tree construction, splicing and exact-source printing

use super::printer::source_text;
use super::{Ast, AstKind, RtData};

#[test]
fn attribute_entry_prints_with_canonical_quoting() {
    let mut ast = Ast::new();
    let attr = ast.xml_attribute("id", "a");
    assert_eq!(source_text(&ast, attr), " id=\"a\"");
    assert_eq!(ast.attribute_name(attr), Some("id"));
    assert_eq!(ast.attribute_value(attr), Some("a".to_string()));
}

#[test]
fn attribute_entry_preserves_source_spacing() {
    let mut ast = Ast::new();
    let attr = ast.xml_attribute("id", "a");
    ast.set_rtd(attr, RtData::new(vec![" ", " = \"", "\""]));
    assert_eq!(source_text(&ast, attr), " id = \"a\"");
}

#[test]
fn xml_element_round_trips() {
    let mut ast = Ast::new();
    let id = ast.xml_attribute("id", "a");
    let class = ast.xml_attribute("class", "wide");
    let body = ast.text("Hello");
    let p = ast.xml_element("p", false, vec![id, class], vec![body]);
    assert_eq!(source_text(&ast, p), "<p id=\"a\" class=\"wide\">Hello</p>");
}

#[test]
fn self_closing_element_round_trips() {
    let mut ast = Ast::new();
    let align = ast.xml_attribute("align", "center");
    let hr = ast.xml_element("hr", true, vec![align], Vec::new());
    assert_eq!(source_text(&ast, hr), "<hr align=\"center\" />");
}

#[test]
fn native_paragraph_round_trips_with_gap_markers() {
    let mut ast = Ast::new();
    let children = vec![ast.newline(), ast.newline(), ast.text("Hi"), ast.newline()];
    let p = ast.paragraph(children);
    let root = ast.document(vec![p]);
    assert_eq!(source_text(&ast, root), "\n\nHi\n");
}

#[test]
fn horizontal_rule_keeps_its_source_form() {
    let mut ast = Ast::new();
    let hr = ast.horizontal_rule();
    assert_eq!(source_text(&ast, hr), "----");
}

#[test]
fn comment_prints_delimited() {
    let mut ast = Ast::new();
    let c = ast.comment(" note ");
    assert_eq!(source_text(&ast, c), "<!-- note -->");
}

#[test]
fn element_stream_interleaves_body_children() {
    let mut ast = Ast::new();
    let body = ast.text("x");
    let p = ast.xml_element("p", false, Vec::new(), vec![body]);
    ast.set_rtd(p, RtData::new(vec![">\n  ", "\n</p>"]));
    assert_eq!(source_text(&ast, p), "<p>\n  x\n</p>");
}

#[test]
fn child_splices_maintain_the_stream_invariant() {
    let mut ast = Ast::new();
    let a = ast.text("a");
    let b = ast.text("b");
    let p = ast.paragraph(vec![a, b]);
    ast.set_rtd(p, RtData::new(vec!["<", "|", ">"]));

    let c = ast.text("c");
    ast.insert_child(p, 1, c);
    assert_eq!(ast.rtd(p).map(RtData::slot_count), Some(4));
    assert_eq!(source_text(&ast, p), "<ac|b>");

    ast.remove_child(p, 1);
    assert_eq!(ast.rtd(p).map(RtData::slot_count), Some(3));
    assert_eq!(source_text(&ast, p), "<a|b>");

    let d = ast.text("d");
    ast.push_child(p, d);
    assert_eq!(ast.rtd(p).map(RtData::slot_count), Some(4));

    ast.truncate_children(p, 1);
    assert_eq!(ast.children(p).len(), 1);
    assert_eq!(ast.rtd(p).map(RtData::slot_count), Some(2));
}

#[test]
fn carried_stream_is_refitted_to_the_receiver() {
    let mut ast = Ast::new();
    let from = ast.xml_attribute("id", "a");
    ast.set_rtd(from, RtData::new(vec![" ", " = \"", "\""]));
    let to = ast.xml_attribute("id", "b");
    ast.carry_rtd(from, to);
    assert_eq!(ast.rtd(to), Some(&RtData::new(vec![" ", " = \"", "\""])));
    assert_eq!(source_text(&ast, to), " id = \"b\"");
}

#[test]
fn newline_markers_know_their_kind() {
    let mut ast = Ast::new();
    let nl = ast.newline();
    assert!(ast.kind(nl).is_newline());
    assert!(matches!(ast.kind(nl), AstKind::Newline(l) if l == "\n"));
}
