//! Thin helpers over the `markup5ever_rcdom` tree.

use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse `html` inside a wrapping `<div>` so body-level rules apply to all of it.
/// The wrapper is left unclosed: an unterminated raw-text element such as
/// `<plaintext>` would otherwise take its end tag as text.
///
/// The returned dom must outlive every handle taken from it: dropping an
/// `RcDom` empties the children of all its nodes.
pub(crate) fn parse_wrapped(html: &str) -> RcDom {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(format!("<div>{html}"));
    inline_template_contents(&dom.document);
    dom
}

/// Move each `<template>`'s content fragment into its children, where the
/// serializer and text helpers look.
fn inline_template_contents(node: &Handle) {
    let fragment = match &node.data {
        NodeData::Element {
            template_contents, ..
        } => template_contents.borrow_mut().take(),
        _ => None,
    };
    if let Some(fragment) = fragment {
        let moved = std::mem::take(&mut *fragment.children.borrow_mut());
        for child in &moved {
            child.parent.set(Some(Rc::downgrade(node)));
        }
        node.children.borrow_mut().extend(moved);
    }
    for child in node.children.borrow().iter() {
        inline_template_contents(child);
    }
}

/// Children of the wrapping root, followed by anything a stray closing tag
/// pushed out of it.
pub(crate) fn top_level_nodes(dom: &RcDom) -> Vec<Handle> {
    let Some(body) = find_body(&dom.document) else {
        return Vec::new();
    };
    let mut nodes = Vec::new();
    for (i, child) in body.children.borrow().iter().enumerate() {
        if i == 0 && tag_name(child) == Some("div") {
            nodes.extend(child.children.borrow().iter().cloned());
        } else {
            nodes.push(child.clone());
        }
    }
    nodes
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = first_child_named(document, "html")?;
    first_child_named(&html, "body")
}

fn first_child_named(node: &Handle, tag: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| tag_name(child) == Some(tag))
        .cloned()
}

/// Lowercase local name of an element node.
pub(crate) fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub(crate) fn is_element(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

pub(crate) fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub(crate) fn attr_names(node: &Handle) -> Vec<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| attr.name.local.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn text_of(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Whitespace-only text and markup that carries no content.
pub(crate) fn is_ignorable(node: &Handle) -> bool {
    match &node.data {
        NodeData::Text { contents } => contents.borrow().trim().is_empty(),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            true
        }
        _ => false,
    }
}

pub(crate) fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| tag_name(child).is_some())
        .cloned()
        .collect()
}

pub(crate) fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().iter().cloned().collect()
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Descendants named `tag`, in document order, not including `node`.
pub(crate) fn descendants_named(node: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_named(node, tag, &mut found);
    found
}

fn collect_named(node: &Handle, tag: &str, found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if is_element(child, tag) {
            found.push(child.clone());
        }
        collect_named(child, tag, found);
    }
}

pub(crate) fn first_descendant_named(node: &Handle, tag: &str) -> Option<Handle> {
    descendants_named(node, tag).into_iter().next()
}

/// `td` cells that belong to `table` itself, not to tables nested in it.
pub(crate) fn own_cells(table: &Handle) -> Vec<Handle> {
    let mut cells = Vec::new();
    for child in element_children(table) {
        match tag_name(&child) {
            Some("tbody" | "thead" | "tfoot") => {
                for row in element_children(&child) {
                    collect_row_cells(&row, &mut cells);
                }
            }
            Some("tr") => collect_row_cells(&child, &mut cells),
            _ => {}
        }
    }
    cells
}

fn collect_row_cells(row: &Handle, cells: &mut Vec<Handle>) {
    if !is_element(row, "tr") {
        return;
    }
    cells.extend(
        element_children(row)
            .into_iter()
            .filter(|cell| is_element(cell, "td")),
    );
}

/// The node's markup, itself included.
pub(crate) fn outer_html(node: &Handle) -> String {
    serialize_node(node, TraversalScope::IncludeNode)
}

/// The markup of the node's children.
pub(crate) fn inner_html(node: &Handle) -> String {
    serialize_node(node, TraversalScope::ChildrenOnly(None))
}

fn serialize_node(node: &Handle, scope: TraversalScope) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(node.clone());
    if let Err(e) = serialize(&mut output, &serializable, opts) {
        tracing::warn!(error = %e, "failed to serialize html node");
    }
    String::from_utf8_lossy(&output).into_owned()
}
