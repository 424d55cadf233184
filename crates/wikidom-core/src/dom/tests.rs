//! Tests for the object model: linking discipline, attribute
//! synchronization, duplicate reconciliation and the derived gap
//! attributes

use super::elements::{HorizontalRule, Paragraph};
use super::*;
use crate::ast::Ast;
use crate::ast::printer::source_text;
use crate::dom::descriptors::{HorizAlign, Length, LengthUnit};
use crate::error::ErrorKind;

/// `<p id="a" id="b">Hello</p>`: a container with a stale duplicate that
/// the object model resolves to the last entry.
fn doc_with_duplicate_ids() -> (Dom, NodeId) {
    let mut ast = Ast::new();
    let id_a = ast.xml_attribute("id", "a");
    let id_b = ast.xml_attribute("id", "b");
    let body = ast.text("Hello");
    let p = ast.xml_element("p", false, vec![id_a, id_b], vec![body]);
    let root = ast.document(vec![p]);
    let dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).expect("paragraph element");
    (dom, elem)
}

// =========================================================================
// Round-trip and factory behavior

#[test]
fn unedited_document_serializes_byte_identical() {
    let mut ast = Ast::new();
    let children = vec![ast.newline(), ast.text("Hi"), ast.newline()];
    let p = ast.paragraph(children);
    let hr = ast.horizontal_rule();
    let root = ast.document(vec![p, hr]);
    let dom = Dom::from_ast(ast, root);
    assert_eq!(source_text(dom.ast(), root), "\nHi\n----");
}

#[test]
fn wrapping_preserves_stale_duplicates_in_the_container() {
    let (dom, elem) = doc_with_duplicate_ids();
    let container = dom.ast_node(elem).expect("concrete element");
    assert_eq!(dom.ast().attr_entries(container).len(), 2);
    assert_eq!(
        source_text(dom.ast(), dom.ast_node(dom.root()).unwrap()),
        "<p id=\"a\" id=\"b\">Hello</p>"
    );
}

#[test]
fn object_model_resolves_to_the_last_duplicate() {
    let (dom, elem) = doc_with_duplicate_ids();
    assert_eq!(dom.attribute(elem, "id"), Some("b".to_string()));
    assert_eq!(dom.attributes(elem).len(), 1);
    let attr = dom.attribute_node(elem, "id").expect("attribute node");
    let container = dom.ast_node(elem).unwrap();
    let last_entry = dom.ast().attr_entries(container)[1];
    assert_eq!(dom.ast_node(attr), Some(last_entry));
}

#[test]
fn factory_skips_pure_formatting_tokens() {
    let mut ast = Ast::new();
    let children = vec![ast.newline(), ast.text("  "), ast.text("Hi"), ast.newline()];
    let p = ast.paragraph(children);
    let root = ast.document(vec![p]);
    let dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();
    let wom_children = dom.child_nodes(elem);
    assert_eq!(wom_children.len(), 1);
    let only = wom_children.iter().next().unwrap();
    assert_eq!(dom.text(only), Some("Hi"));
}

// =========================================================================
// Attribute lookup and removal

#[test]
fn attribute_lookup_is_case_insensitive() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p, "Class", Some("x")).unwrap();
    assert_eq!(dom.attribute(p, "class"), Some("x".to_string()));
    assert_eq!(dom.attribute(p, "CLASS"), Some("x".to_string()));
    // stored with creation casing
    let node = dom.attribute_node(p, "class").unwrap();
    assert_eq!(dom.node_name(node), "Class");
}

#[test]
fn removing_a_missing_attribute_is_a_noop() {
    let (mut dom, elem) = doc_with_duplicate_ids();
    let removed = dom.remove_attribute(elem, "nonexistent").unwrap();
    assert!(removed.is_none());
    assert_eq!(dom.attributes(elem).len(), 1);
    let container = dom.ast_node(elem).unwrap();
    assert_eq!(dom.ast().attr_entries(container).len(), 2);
}

#[test]
fn removal_purges_every_duplicate_entry() {
    let (mut dom, elem) = doc_with_duplicate_ids();
    let removed = dom.remove_attribute(elem, "ID").unwrap();
    assert!(removed.is_some());
    assert_eq!(dom.attribute(elem, "id"), None);
    assert_eq!(dom.attributes(elem).len(), 0);
    let root_ast = dom.ast_node(dom.root()).unwrap();
    assert_eq!(source_text(dom.ast(), root_ast), "<p>Hello</p>");
}

#[test]
fn remove_attribute_node_checks_ownership() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    let other = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p, "class", Some("x")).unwrap();
    let attr = dom.attribute_node(p, "class").unwrap();
    let err = dom.remove_attribute_node(other, attr).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    // still attached where it was
    assert_eq!(dom.parent(attr), Some(p));
}

// =========================================================================
// The replacement algorithm

#[test]
fn set_reconciles_duplicates_down_to_one_entry() {
    let (mut dom, elem) = doc_with_duplicate_ids();
    let replaced = dom.set_attribute(elem, "id", Some("c")).unwrap();
    assert!(replaced.is_some());

    let container = dom.ast_node(elem).unwrap();
    assert_eq!(dom.ast().attr_entries(container).len(), 1);
    let entry = dom.ast().attr_entries(container)[0];
    assert_eq!(dom.ast().attribute_value(entry), Some("c".to_string()));

    assert_eq!(dom.attribute(elem, "id"), Some("c".to_string()));
    let root_ast = dom.ast_node(dom.root()).unwrap();
    assert_eq!(source_text(dom.ast(), root_ast), "<p id=\"c\">Hello</p>");
}

#[test]
fn replacement_keeps_the_surviving_entry_in_place() {
    let mut ast = Ast::new();
    let id_a = ast.xml_attribute("id", "a");
    let class = ast.xml_attribute("class", "wide");
    let id_b = ast.xml_attribute("id", "b");
    let body = ast.text("Hello");
    let p = ast.xml_element("p", false, vec![id_a, class, id_b], vec![body]);
    let root = ast.document(vec![p]);
    let mut dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();

    dom.set_attribute(elem, "id", Some("c")).unwrap();
    let root_ast = dom.ast_node(dom.root()).unwrap();
    assert_eq!(
        source_text(dom.ast(), root_ast),
        "<p class=\"wide\" id=\"c\">Hello</p>"
    );
}

#[test]
fn replacement_carries_source_formatting_over() {
    let mut ast = Ast::new();
    let id = ast.xml_attribute("id", "a");
    ast.set_rtd(id, crate::ast::RtData::new(vec![" ", " = \"", "\""]));
    let body = ast.text("Hello");
    let p = ast.xml_element("p", false, vec![id], vec![body]);
    let root = ast.document(vec![p]);
    let mut dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();

    dom.set_attribute(elem, "id", Some("c")).unwrap();
    let root_ast = dom.ast_node(dom.root()).unwrap();
    assert_eq!(source_text(dom.ast(), root_ast), "<p id = \"c\">Hello</p>");
}

#[test]
fn set_materializes_a_concrete_entry_on_tag_syntax_elements() {
    let mut dom = Dom::new();
    let div = dom.create_element(ElementTag::Xml("div".to_string()));
    dom.set_attribute(div, "id", Some("x")).unwrap();
    let container = dom.ast_node(div).unwrap();
    assert_eq!(dom.ast().attr_entries(container).len(), 1);
    assert_eq!(source_text(dom.ast(), container), "<div id=\"x\"></div>");
}

#[test]
fn set_on_native_elements_stays_detached_from_the_syntax_tree() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p, "class", Some("x")).unwrap();
    let attr = dom.attribute_node(p, "class").unwrap();
    assert_eq!(dom.ast_node(attr), None);
    assert_eq!(dom.attribute(p, "class"), Some("x".to_string()));
}

#[test]
fn set_with_none_removes() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p, "class", Some("x")).unwrap();
    let removed = dom.set_attribute(p, "class", None).unwrap();
    assert!(removed.is_some());
    assert_eq!(dom.attribute(p, "class"), None);
}

#[test]
fn setting_a_new_name_with_different_casing_keeps_it() {
    let (mut dom, elem) = doc_with_duplicate_ids();
    dom.set_attribute(elem, "ID", Some("x")).unwrap();
    let node = dom.attribute_node(elem, "id").unwrap();
    assert_eq!(dom.node_name(node), "ID");
}

#[test]
fn set_attribute_node_rejects_a_node_linked_elsewhere() {
    let mut dom = Dom::new();
    let p1 = dom.create_element(ElementTag::Paragraph);
    let p2 = dom.create_element(ElementTag::Paragraph);
    let attr = dom.create_attribute("class", "x").unwrap();
    dom.set_attribute_node(p1, attr).unwrap();
    let err = dom.set_attribute_node(p2, attr).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalState);
    assert_eq!(dom.parent(attr), Some(p1));
}

#[test]
fn set_attribute_node_rejects_non_attribute_nodes() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    let stray = dom.create_text("not an attribute");
    let err = dom.set_attribute_node(p, stray).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
#[should_panic(expected = "object model and syntax tree out of sync")]
fn desynced_container_aborts_on_removal() {
    let (mut dom, elem) = doc_with_duplicate_ids();
    // sabotage: drop the identity-linked entry behind the engine's back
    let container = dom.ast_node(elem).unwrap();
    dom.ast_mut().remove_attr_entry(container, 1);
    let _ = dom.remove_attribute(elem, "id");
}

// =========================================================================
// Capability checks

#[test]
fn the_document_node_rejects_attribute_writes() {
    let mut dom = Dom::new();
    let root = dom.root();
    let err = dom.set_attribute(root, "id", Some("x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    // removal of nothing is a no-op, not an error
    assert!(dom.remove_attribute(root, "id").unwrap().is_none());
    assert_eq!(dom.attributes(root).len(), 0);
}

#[test]
fn text_nodes_support_no_attributes_at_all() {
    let mut dom = Dom::new();
    let t = dom.create_text("x");
    assert_eq!(dom.attribute(t, "id"), None);
    let err = dom.set_attribute(t, "id", Some("x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    let err = dom.remove_attribute(t, "id").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

// =========================================================================
// Descriptor pipeline

#[test]
fn enum_attributes_are_canonicalized() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p, "align", Some("CENTER")).unwrap();
    assert_eq!(dom.attribute(p, "align"), Some("center".to_string()));
    let para = Paragraph::cast(&dom, p).unwrap();
    assert_eq!(para.align(&dom), Some(HorizAlign::Center));
}

#[test]
fn enum_attributes_reject_unknown_values() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    let err = dom.set_attribute(p, "align", Some("diagonal")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(dom.attribute(p, "align"), None);
}

#[test]
fn rule_align_is_stricter_than_paragraph_align() {
    let mut dom = Dom::new();
    let hr = dom.create_element(ElementTag::HorizontalRule);
    let err = dom.set_attribute(hr, "align", Some("justify")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn known_attribute_values_get_non_cdata_normalization() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p, "class", Some("  a \t b  ")).unwrap();
    assert_eq!(dom.attribute(p, "class"), Some("a b".to_string()));
}

#[test]
fn unknown_attribute_values_get_cdata_normalization() {
    let mut dom = Dom::new();
    let div = dom.create_element(ElementTag::Xml("div".to_string()));
    dom.set_attribute(div, "data-x", Some(" a\nb ")).unwrap();
    assert_eq!(dom.attribute(div, "data-x"), Some(" a b ".to_string()));
}

#[test]
fn attribute_names_must_be_identifiers() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    let err = dom.set_attribute(p, "1bad", Some("x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(dom.create_attribute("no spaces", "x").is_err());
}

#[test]
fn horizontal_rule_typed_accessors() {
    let mut dom = Dom::new();
    let node = dom.create_element(ElementTag::HorizontalRule);
    let hr = HorizontalRule::cast(&dom, node).unwrap();

    hr.set_noshade(&mut dom, true).unwrap();
    assert!(hr.noshade(&dom));

    hr.set_size(&mut dom, Some(5)).unwrap();
    assert_eq!(hr.size(&dom), Some(5));

    let width = Length {
        value: 50,
        unit: LengthUnit::Percent,
    };
    hr.set_width(&mut dom, Some(width)).unwrap();
    assert_eq!(hr.width(&dom), Some(width));
    assert_eq!(dom.attribute(node, "width"), Some("50%".to_string()));

    hr.set_noshade(&mut dom, false).unwrap();
    assert!(!hr.noshade(&dom));
}

// =========================================================================
// Derived gap attributes

#[test]
fn top_gap_round_trips_through_the_marker_run() {
    let mut ast = Ast::new();
    let body = ast.text("Hi");
    let p_ast = ast.paragraph(vec![body]);
    let root = ast.document(vec![p_ast]);
    let mut dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();
    let para = Paragraph::cast(&dom, elem).unwrap();

    para.set_top_gap(&mut dom, 3).unwrap();
    assert_eq!(para.top_gap(&dom), 3);
    let leading: Vec<_> = dom.ast().children(p_ast).iter().take(3).copied().collect();
    assert!(leading.iter().all(|c| dom.ast().kind(*c).is_newline()));
    assert_eq!(source_text(dom.ast(), root), "\n\n\nHi");

    para.set_top_gap(&mut dom, 1).unwrap();
    assert_eq!(para.top_gap(&dom), 1);
    assert_eq!(source_text(dom.ast(), root), "\nHi");

    para.set_top_gap(&mut dom, 0).unwrap();
    assert_eq!(para.top_gap(&dom), 0);
    assert_eq!(source_text(dom.ast(), root), "Hi");
}

#[test]
fn bottom_gap_accounts_for_the_boundary_marker() {
    let mut ast = Ast::new();
    let body = ast.text("Hi");
    let p_ast = ast.paragraph(vec![body]);
    let root = ast.document(vec![p_ast]);
    let mut dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();
    let para = Paragraph::cast(&dom, elem).unwrap();

    para.set_bottom_gap(&mut dom, 2).unwrap();
    assert_eq!(para.bottom_gap(&dom), 2);
    // two blank lines plus the newline terminating the paragraph itself
    assert_eq!(source_text(dom.ast(), root), "Hi\n\n\n");

    para.set_bottom_gap(&mut dom, 0).unwrap();
    assert_eq!(para.bottom_gap(&dom), 0);
    assert_eq!(source_text(dom.ast(), root), "Hi\n");
}

#[test]
fn gap_values_are_never_stored_in_the_chain() {
    let mut ast = Ast::new();
    let body = ast.text("Hi");
    let p_ast = ast.paragraph(vec![body]);
    let root = ast.document(vec![p_ast]);
    let mut dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();

    dom.set_attribute(elem, "topgap", Some("2")).unwrap();
    assert_eq!(dom.attribute(elem, "topgap"), Some("2".to_string()));
    assert!(dom.attribute_node(elem, "topgap").is_none());
    assert_eq!(dom.attributes(elem).len(), 0);

    dom.set_attribute(elem, "topgap", Some("0")).unwrap();
    assert_eq!(dom.attribute(elem, "topgap"), None);
}

#[test]
fn gap_markers_survive_alongside_whitespace_padding() {
    let mut ast = Ast::new();
    let children = vec![
        ast.newline(),
        ast.text("  "),
        ast.newline(),
        ast.text("Hi"),
    ];
    let p_ast = ast.paragraph(children);
    let root = ast.document(vec![p_ast]);
    let mut dom = Dom::from_ast(ast, root);
    let elem = dom.first_child(dom.root()).unwrap();
    let para = Paragraph::cast(&dom, elem).unwrap();

    assert_eq!(para.top_gap(&dom), 2);
    para.set_top_gap(&mut dom, 0).unwrap();
    assert_eq!(para.top_gap(&dom), 0);
    // markers and whitespace padding are both gone
    assert_eq!(source_text(dom.ast(), root), "Hi");
}

#[test]
fn gap_values_outside_the_range_are_rejected() {
    let mut dom = Dom::new();
    let p = dom.create_element(ElementTag::Paragraph);
    let err = dom.set_attribute(p, "topgap", Some("70000")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = dom.set_attribute(p, "bottomgap", Some("many")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

// =========================================================================
// Linking discipline and sibling views

#[test]
fn linking_a_linked_node_fails_and_leaves_chains_alone() {
    let mut dom = Dom::new();
    let root = dom.root();
    let a = dom.create_text("a");
    let b = dom.create_text("b");
    dom.attach_child(root, a);
    dom.attach_child(root, b);

    let p = dom.create_element(ElementTag::Paragraph);
    let c = dom.create_text("c");
    dom.attach_child(p, c);

    let err = dom.link(c, Some(root), Some(a), Some(b)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalState);
    assert_eq!(dom.next_sibling(a), Some(b));
    assert_eq!(dom.prev_sibling(b), Some(a));
    assert_eq!(dom.parent(c), Some(p));
}

#[test]
fn linking_into_an_inconsistent_chain_fails() {
    let mut dom = Dom::new();
    let root = dom.root();
    let a = dom.create_text("a");
    let b = dom.create_text("b");
    dom.attach_child(root, a);
    dom.attach_child(root, b);

    let d = dom.create_text("d");
    // a.next is b, not None; the caller's view of the chain is stale
    let err = dom.link(d, Some(root), Some(a), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalState);
    assert!(!dom.is_linked(d));
    assert_eq!(dom.next_sibling(a), Some(b));
}

#[test]
fn unlink_restitches_the_chain_and_allows_relinking() {
    let mut dom = Dom::new();
    let root = dom.root();
    let a = dom.create_text("a");
    let b = dom.create_text("b");
    let c = dom.create_text("c");
    dom.attach_child(root, a);
    dom.attach_child(root, b);
    dom.attach_child(root, c);

    dom.unlink(b);
    assert!(!dom.is_linked(b));
    assert_eq!(dom.next_sibling(a), Some(c));
    assert_eq!(dom.prev_sibling(c), Some(a));

    dom.link(b, Some(root), Some(c), None).unwrap();
    let order: Vec<_> = dom.child_nodes(root).iter().collect();
    assert_eq!(order, vec![a, c, b]);
}

#[test]
fn sibling_view_counts_and_iterates_in_chain_order() {
    let mut dom = Dom::new();
    let root = dom.root();
    let a = dom.create_text("a");
    let b = dom.create_text("b");
    let c = dom.create_text("c");
    dom.attach_child(root, a);
    dom.attach_child(root, b);
    dom.attach_child(root, c);

    let view = dom.child_nodes(root);
    assert_eq!(view.len(), 3);
    assert!(!view.is_empty());
    assert!(view.contains(b));
    assert_eq!(view.iter().len(), 3);
    let order: Vec<_> = view.iter().collect();
    assert_eq!(order, vec![a, b, c]);

    let empty = dom.child_nodes(a);
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
}

// =========================================================================
// Cloning and generic serialization

#[test]
fn clones_start_life_unlinked_and_bare() {
    let mut dom = Dom::new();
    let root = dom.root();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.attach_child(root, p);
    dom.set_attribute(p, "class", Some("x")).unwrap();
    let t = dom.create_text("body");
    dom.attach_child(p, t);

    let copy = dom.clone_node(p);
    assert!(!dom.is_linked(copy));
    assert_eq!(dom.node_kind(copy), NodeKind::Element);
    assert_eq!(dom.attributes(copy).len(), 0);
    assert!(!dom.has_child_nodes(copy));
    // the original is untouched
    assert_eq!(dom.attributes(p).len(), 1);
    assert!(dom.has_child_nodes(p));
}

#[test]
fn cloned_attributes_can_be_committed_elsewhere() {
    let mut dom = Dom::new();
    let p1 = dom.create_element(ElementTag::Paragraph);
    let p2 = dom.create_element(ElementTag::Paragraph);
    dom.set_attribute(p1, "class", Some("x")).unwrap();
    let attr = dom.attribute_node(p1, "class").unwrap();

    let copy = dom.clone_node(attr);
    assert!(!dom.is_linked(copy));
    dom.set_attribute_node(p2, copy).unwrap();
    assert_eq!(dom.attribute(p2, "class"), Some("x".to_string()));
}

#[test]
fn generic_serializer_escapes_and_nests() {
    let mut dom = Dom::new();
    let root = dom.root();
    let p = dom.create_element(ElementTag::Paragraph);
    dom.attach_child(root, p);
    dom.set_attribute(p, "class", Some("wide")).unwrap();
    let t = dom.create_text("Hello & goodbye");
    dom.attach_child(p, t);

    insta::assert_snapshot!(dom.serialize(p), @r#"<p class="wide">Hello &amp; goodbye</p>"#);
    insta::assert_snapshot!(dom.serialize(root), @r#"<p class="wide">Hello &amp; goodbye</p>"#);
}

#[test]
fn generic_serializer_renders_childless_elements_self_closing() {
    let mut dom = Dom::new();
    let node = dom.create_element(ElementTag::HorizontalRule);
    let hr = HorizontalRule::cast(&dom, node).unwrap();
    hr.set_noshade(&mut dom, true).unwrap();
    insta::assert_snapshot!(dom.serialize(node), @r#"<hr noshade="noshade" />"#);
}

#[test]
fn generic_serializer_renders_comments_and_attributes() {
    let mut dom = Dom::new();
    let c = dom.create_comment(" note ");
    assert_eq!(dom.serialize(c), "<!-- note -->");
    let attr = dom.create_attribute("title", "a \"quote\"").unwrap();
    assert_eq!(dom.serialize(attr), "title=\"a &quot;quote&quot;\"");
}

#[test]
fn node_names_follow_their_kind() {
    let mut dom = Dom::new();
    assert_eq!(dom.node_name(dom.root()), "#document");
    let p = dom.create_element(ElementTag::Paragraph);
    assert_eq!(dom.node_name(p), "p");
    let t = dom.create_text("x");
    assert_eq!(dom.node_name(t), "#text");
    let c = dom.create_comment("x");
    assert_eq!(dom.node_name(c), "#comment");
    assert_eq!(dom.node_kind(p), NodeKind::Element);
    assert_eq!(dom.node_kind(dom.root()), NodeKind::Document);
}
