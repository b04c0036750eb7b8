//! Scratch tree carrying per-node expression counts and sibling flags.

use crate::ir::{Element, ExprId, Node};

/// Annotated node. Borrows the input node it describes and lives only for
/// the duration of one root's compilation.
#[derive(Debug)]
pub(crate) struct SNode<'a> {
    pub node: &'a Node,
    /// State slot; 0 until assigned (slot 0 itself belongs to the root).
    pub slot: u32,
    pub children: Vec<SNode<'a>>,
    /// Dynamic properties of this element.
    pub props_exprs: u32,
    /// Placeholders among the direct children of this element.
    pub children_exprs: u32,
    pub flags: u8,
}

impl<'a> SNode<'a> {
    /// The node or its subtree has dynamic content.
    pub const HAS_EXPRESSIONS: u8 = 1;
    /// A later sibling is a placeholder or contains one.
    pub const HAS_NEXT_EXPRESSIONS: u8 = 1 << 1;
    /// A later sibling is a DOM node (element or text).
    pub const HAS_NEXT_DOM_NODE: u8 = 1 << 2;

    /// Annotate the element `node` (which must be `Node::Element`) and its
    /// subtree.
    pub fn build(node: &'a Node) -> Self {
        Self::build_with_flags(node, 0)
    }

    fn build_with_flags(node: &'a Node, flags: u8) -> Self {
        match node {
            Node::Element(e) => Self::build_element(node, e, flags),
            Node::Text { .. } => Self::leaf(node, flags),
            Node::Expr { .. } => Self::leaf(node, flags | Self::HAS_EXPRESSIONS),
        }
    }

    fn leaf(node: &'a Node, flags: u8) -> Self {
        SNode {
            node,
            slot: 0,
            children: Vec::new(),
            props_exprs: 0,
            children_exprs: 0,
            flags,
        }
    }

    fn build_element(node: &'a Node, element: &'a Element, mut flags: u8) -> Self {
        let props_exprs = element.dynamic_property_count() as u32;
        let mut children_exprs = 0;

        // Right to left, so each child sees what follows it.
        let mut siblings = 0;
        let mut children = Vec::with_capacity(element.children.len());
        for child in element.children.iter().rev() {
            let snode = match child {
                Node::Element(_) => {
                    let snode = Self::build_with_flags(child, siblings);
                    if snode.has_expressions() {
                        flags |= Self::HAS_EXPRESSIONS;
                        siblings |= Self::HAS_NEXT_EXPRESSIONS;
                    }
                    siblings |= Self::HAS_NEXT_DOM_NODE;
                    snode
                }
                Node::Expr { .. } => {
                    siblings |= Self::HAS_NEXT_EXPRESSIONS;
                    children_exprs += 1;
                    Self::build_with_flags(child, siblings)
                }
                Node::Text { .. } => {
                    let snode = Self::build_with_flags(child, siblings);
                    siblings |= Self::HAS_NEXT_DOM_NODE;
                    snode
                }
            };
            children.push(snode);
        }
        children.reverse();

        if props_exprs > 0 || children_exprs > 0 {
            flags |= Self::HAS_EXPRESSIONS;
        }

        SNode {
            node,
            slot: 0,
            children,
            props_exprs,
            children_exprs,
            flags,
        }
    }

    pub fn has_expressions(&self) -> bool {
        self.flags & Self::HAS_EXPRESSIONS != 0
    }

    /// Nothing left to visit after this node: no later dynamic content, or
    /// no later DOM node the runtime could reach.
    pub fn is_last_of_interest(&self) -> bool {
        let both = Self::HAS_NEXT_EXPRESSIONS | Self::HAS_NEXT_DOM_NODE;
        self.flags & both != both
    }

    /// Directly targeted by prop or child ops.
    pub fn is_patched(&self) -> bool {
        self.props_exprs > 0 || self.children_exprs > 0
    }

    pub fn element(&self) -> Option<&'a Element> {
        self.node.as_element()
    }

    pub fn expr_id(&self) -> Option<ExprId> {
        match self.node {
            Node::Expr { value } => Some(*value),
            _ => None,
        }
    }
}
