//! State slot allocation.

use crate::ir::Node;

use super::annotate::SNode;

/// Assign state slots depth-first, left to right. Returns the number of
/// slots in use, counting the root's implicit slot 0.
pub(crate) fn assign_state_slots(root: &mut SNode<'_>) -> usize {
    assign(root, 1) as usize
}

fn assign(node: &mut SNode<'_>, mut next: u32) -> u32 {
    let mut prev_expr = false;
    for child in node.children.iter_mut() {
        match child.node {
            Node::Element(_) => {
                if prev_expr || child.is_patched() {
                    child.slot = next;
                    next += 1;
                }
                prev_expr = false;
                next = assign(child, next);
            }
            Node::Text { .. } => {
                if prev_expr {
                    child.slot = next;
                    next += 1;
                }
                prev_expr = false;
            }
            Node::Expr { .. } => prev_expr = true,
        }
    }
    next
}
