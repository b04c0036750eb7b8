//! Static shell: the constant markup of a block, cloned by the runtime.

use crate::ir::{Element, Node, PropertyKind, PropertyValue};

use super::error::CompileError;

/// Anchor comment separating two text nodes that would otherwise merge
/// when the shell is parsed.
pub const TEXT_ANCHOR: &str = "<!>";

const VOID_ELEMENTS: &[&str] = &[
    "audio", "video", "embed", "input", "param", "source", "textarea", "track", "area", "base",
    "link", "meta", "br", "col", "hr", "img", "wbr",
];

/// Elements emitted without a closing tag; they can't have children.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Serialized shell of a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shell {
    /// A single element without static attributes or children: the runtime
    /// can create it directly instead of cloning parsed markup.
    Tag(String),
    /// Markup chunks, concatenated by the runtime before parsing.
    Chunks(Vec<String>),
}

impl Shell {
    /// Full markup of the shell.
    pub fn markup(&self) -> String {
        match self {
            Shell::Tag(tag) if is_void_element(tag) => format!("<{}>", tag),
            Shell::Tag(tag) => format!("<{}></{}>", tag, tag),
            Shell::Chunks(chunks) => chunks.concat(),
        }
    }
}

pub(crate) fn emit_static_shell(root: &Element) -> Result<Shell, CompileError> {
    let mut chunks = Vec::new();
    let mut path = Vec::new();
    emit(&mut chunks, &mut path, root)?;
    if chunks.len() <= 3 && chunks.get(1).map(String::as_str) == Some(">") {
        return Ok(Shell::Tag(root.tag.clone()));
    }
    Ok(Shell::Chunks(chunks))
}

fn emit<'a>(
    chunks: &mut Vec<String>,
    path: &mut Vec<&'a str>,
    element: &'a Element,
) -> Result<(), CompileError> {
    path.push(&element.tag);
    chunks.push(format!("<{}", element.tag));

    let mut style = String::new();
    for prop in &element.properties {
        match (prop.kind, &prop.value) {
            (PropertyKind::Attribute, PropertyValue::String(v)) if prop.key == "style" => {
                append_style(&mut style, v);
            }
            (PropertyKind::Attribute, PropertyValue::String(v)) => {
                chunks.push(format!(" {}=\"{}\"", prop.key, v));
            }
            (PropertyKind::Attribute, PropertyValue::Bool(true)) if prop.key != "style" => {
                chunks.push(format!(" {}", prop.key));
            }
            (PropertyKind::Style, PropertyValue::String(v)) => {
                append_style(&mut style, &format!("{}:{}", prop.key, v));
            }
            _ => {}
        }
    }
    if !style.is_empty() {
        chunks.push(format!(" style=\"{}\"", style));
    }
    chunks.push(">".to_string());

    if is_void_element(&element.tag) {
        if !element.children.is_empty() {
            return Err(CompileError::void_children(path));
        }
        path.pop();
        return Ok(());
    }

    // bit 0: last visited was text, bit 1: a placeholder followed it
    let mut state = 0u8;
    for child in &element.children {
        match child {
            Node::Element(e) => {
                emit(chunks, path, e)?;
                state = 0;
            }
            Node::Text { value } => {
                if state & 3 == 3 {
                    chunks.push(TEXT_ANCHOR.to_string());
                }
                state = 1;
                chunks.push(value.clone());
            }
            Node::Expr { .. } => state |= 2,
        }
    }

    chunks.push(format!("</{}>", element.tag));
    path.pop();
    Ok(())
}

fn append_style(style: &mut String, declaration: &str) {
    if !style.is_empty() {
        style.push(';');
    }
    style.push_str(declaration);
}
