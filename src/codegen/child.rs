//! Child ops: dynamic children linked in right to left.

use super::annotate::SNode;
use super::exprs::ExprMap;
use super::opcode::ChildOp;

pub(crate) fn emit_child_ops(root: &SNode<'_>, exprs: &ExprMap) -> Vec<ChildOp> {
    let mut ops = Vec::new();
    emit(&mut ops, root, true, exprs);
    ops
}

fn emit(ops: &mut Vec<ChildOp>, node: &SNode<'_>, is_root: bool, exprs: &ExprMap) {
    if node.children_exprs > 0 {
        if !is_root {
            ops.push(ChildOp::SetParent(node.slot));
        }
        // Sibling to the right of the current child.
        let mut next: Option<&SNode<'_>> = None;
        for child in node.children.iter().rev() {
            if let Some(index) = child.expr_id().and_then(|id| exprs.index_of(id)) {
                if let Some(anchor) = next.filter(|n| !n.node.is_expr()) {
                    ops.push(ChildOp::SetNext(anchor.slot));
                }
                ops.push(ChildOp::Child(index));
            }
            next = Some(child);
        }
    }

    for child in node.children.iter().rev() {
        if child.element().is_some() {
            emit(ops, child, false, exprs);
        }
    }
}
