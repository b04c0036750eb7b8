//! Text normalisation.
//!
//! Adjacent text siblings become a single text node in the parsed shell, so
//! the compiler has to see them as one node too. Empty text is dropped.

use super::{Element, Node};

/// Merge adjacent text siblings and drop empty text, recursively.
pub fn normalize(nodes: &[Node]) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut text = String::new();
    for node in nodes {
        match node {
            Node::Text { value } => text.push_str(value),
            Node::Element(e) => {
                flush_text(&mut out, &mut text);
                out.push(Node::Element(normalize_element(e)));
            }
            Node::Expr { .. } => {
                flush_text(&mut out, &mut text);
                out.push(node.clone());
            }
        }
    }
    flush_text(&mut out, &mut text);
    out
}

/// Normalize one template root. Only an element root changes: its
/// descendants are normalized, while text and placeholder roots each compile
/// on their own and are kept as given.
pub fn normalize_root(node: &Node) -> Node {
    match node {
        Node::Element(e) => Node::Element(normalize_element(e)),
        _ => node.clone(),
    }
}

fn normalize_element(e: &Element) -> Element {
    Element {
        tag: e.tag.clone(),
        properties: e.properties.clone(),
        children: normalize(&e.children),
    }
}

fn flush_text(out: &mut Vec<Node>, text: &mut String) {
    if !text.is_empty() {
        out.push(Node::Text {
            value: std::mem::take(text),
        });
    }
}
