//! State ops: the walk that captures slot references from the cloned shell.
//!
//! The emitted ops follow the DOM nodes of the parsed shell one to one,
//! including the anchor comments inserted between text nodes. A level stops
//! as soon as nothing after the current node needs to be reached.

use crate::ir::Node;

use super::annotate::SNode;
use super::opcode::StateOp;

const PREV_TEXT: u8 = 1;
const PREV_EXPR: u8 = 1 << 1;

pub(crate) fn emit_state_ops(root: &SNode<'_>) -> Vec<StateOp> {
    let mut ops = Vec::new();
    emit(&mut ops, root);
    ops
}

fn emit(ops: &mut Vec<StateOp>, node: &SNode<'_>) {
    let mut state = 0u8;
    for child in &node.children {
        match child.node {
            Node::Element(_) => {
                let save = state & PREV_EXPR != 0 || child.is_patched();
                let index = ops.len();
                ops.push(if save { StateOp::Save } else { StateOp::Next });

                if child.has_expressions() {
                    emit(ops, child);
                    let len = (ops.len() - (index + 1)) as u32;
                    if len > 0 {
                        ops[index] = StateOp::Enter { save, len };
                    }
                }
                if child.is_last_of_interest() {
                    if ops[index] == StateOp::Next {
                        ops.pop();
                    }
                    break;
                }
                state = 0;
            }
            Node::Text { .. } => {
                if state & (PREV_TEXT | PREV_EXPR) == PREV_TEXT | PREV_EXPR {
                    ops.push(StateOp::Remove);
                } else if state & PREV_EXPR != 0 {
                    ops.push(StateOp::Save);
                } else if child.is_last_of_interest() {
                    break;
                } else {
                    ops.push(StateOp::Next);
                }
                state = PREV_TEXT;
            }
            Node::Expr { .. } => state |= PREV_EXPR,
        }
    }
}
