//! Input tree handed to the compiler by the template parser.
//!
//! The tree is a read-only description of one template: nested elements,
//! literal text and dynamic placeholders. Placeholder identifiers are chosen
//! by the caller and need not be dense; the compiler assigns its own dense
//! expression indices per block.

pub mod normalize;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use normalize::{normalize, normalize_root};

// ─── Placeholders ──────────────────────────────────────────────────

/// Caller-chosen identifier of a dynamic value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(pub u32);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

// ─── Template ──────────────────────────────────────────────────────

/// Namespace the template block is created in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Html,
    Svg,
}

impl TemplateKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" | "htm" => Some(TemplateKind::Html),
            "svg" => Some(TemplateKind::Svg),
            _ => None,
        }
    }
}

/// A parsed template: its namespace and the list of top-level roots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub kind: TemplateKind,
    pub children: Vec<Node>,
}

impl Template {
    pub fn html(children: Vec<Node>) -> Self {
        Self {
            kind: TemplateKind::Html,
            children,
        }
    }

    pub fn svg(children: Vec<Node>) -> Self {
        Self {
            kind: TemplateKind::Svg,
            children,
        }
    }
}

// ─── Nodes ─────────────────────────────────────────────────────────

/// A node of the input tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text { value: String },
    Expr { value: ExprId },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn expr(id: u32) -> Self {
        Node::Expr { value: ExprId(id) }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_expr(&self) -> bool {
        matches!(self, Node::Expr { .. })
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

/// An element with its properties and children in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of properties bound to a placeholder.
    pub fn dynamic_property_count(&self) -> usize {
        self.properties.iter().filter(|p| p.is_dynamic()).count()
    }
}

// ─── Properties ────────────────────────────────────────────────────

/// Where a property value ends up on the element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// `setAttribute` / markup attribute.
    Attribute,
    /// Inline style declaration.
    Style,
    /// Element property, diffed against the previous value.
    Value,
    /// Element property, diffed against the live DOM value.
    #[serde(rename = "domvalue")]
    DomValue,
    /// Event listener.
    Event,
    /// Directive invoked with the element.
    Directive,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Attribute => "attribute",
            PropertyKind::Style => "style",
            PropertyKind::Value => "value",
            PropertyKind::DomValue => "domvalue",
            PropertyKind::Event => "event",
            PropertyKind::Directive => "directive",
        };
        f.write_str(name)
    }
}

/// Literal or placeholder value of a property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    Expr(ExprId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub kind: PropertyKind,
    #[serde(default)]
    pub key: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(kind: PropertyKind, key: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            kind,
            key: key.into(),
            value,
        }
    }

    pub fn attribute(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self::new(PropertyKind::Attribute, key, value.into())
    }

    pub fn style(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self::new(PropertyKind::Style, key, value.into())
    }

    pub fn value(key: impl Into<String>, id: u32) -> Self {
        Self::new(PropertyKind::Value, key, PropertyValue::Expr(ExprId(id)))
    }

    pub fn dom_value(key: impl Into<String>, id: u32) -> Self {
        Self::new(PropertyKind::DomValue, key, PropertyValue::Expr(ExprId(id)))
    }

    pub fn event(key: impl Into<String>, id: u32) -> Self {
        Self::new(PropertyKind::Event, key, PropertyValue::Expr(ExprId(id)))
    }

    pub fn directive(id: u32) -> Self {
        Self::new(PropertyKind::Directive, "", PropertyValue::Expr(ExprId(id)))
    }

    /// Placeholder bound to this property, if it is dynamic.
    pub fn expr(&self) -> Option<ExprId> {
        match self.value {
            PropertyValue::Expr(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.expr().is_some()
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<ExprId> for PropertyValue {
    fn from(id: ExprId) -> Self {
        PropertyValue::Expr(id)
    }
}
