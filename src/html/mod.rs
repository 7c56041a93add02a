//! HTML side of the split: extraction, dedenting, serialization and preview.

mod dedent;
mod extractor;
pub mod preview;
mod serialize;

pub use dedent::dedent;
pub use extractor::{CSS_SEPARATOR, Extraction, JS_SEPARATOR, extract};
pub use serialize::{MarkupWriter, outer_html};

use ego_tree::NodeId;
use html5ever::{Attribute, LocalName, QualName, namespace_url, ns};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

/// A detached HTML element node with the given attributes, in order.
pub(crate) fn html_element(name: &str, attrs: &[(&str, &str)]) -> Node {
    let attrs = attrs
        .iter()
        .map(|(key, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*key)),
            value: (*value).into(),
        })
        .collect();
    Node::Element(Element::new(
        QualName::new(None, ns!(html), LocalName::from(name)),
        attrs,
    ))
}

/// First child element of `parent` named `name`.
pub(crate) fn find_child_element(doc: &Html, parent: NodeId, name: &str) -> Option<NodeId> {
    doc.tree
        .get(parent)?
        .children()
        .find(|child| child.value().as_element().is_some_and(|e| e.name() == name))
        .map(|child| child.id())
}

/// Elements of `doc` in document order, not descending into `<template>`
/// contents. Those belong to an inert fragment, not to the page.
pub(crate) fn page_elements(doc: &Html) -> Vec<ElementRef<'_>> {
    let mut found = Vec::new();
    let mut stack = vec![doc.tree.root()];
    while let Some(node) = stack.pop() {
        if let Some(element) = ElementRef::wrap(node) {
            found.push(element);
            if element.value().name() == "template" {
                continue;
            }
        }
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }
    found
}
