//! Template block compiler.
//!
//! An element root goes through:
//!
//! 1. expression indexing (`exprs`) and the expression capacity check,
//! 2. static shell emission (`shell`), which rejects void elements with
//!    children,
//! 3. annotation (`annotate`) and state slot allocation (`slots`),
//! 4. three independent emitters over the annotated tree: state ops
//!    (`state`), prop ops + data table (`props`) and child ops (`child`).
//!
//! Each root is compiled independently; nothing is shared between roots.

mod annotate;
mod child;
pub mod error;
mod exprs;
pub mod opcode;
mod props;
pub mod shell;
mod slots;
mod state;

use tracing::{debug, trace};

use crate::artifact::{TemplateBlock, TemplateFlags, TemplateNode};
use crate::ir::{Element, Node, TemplateKind};

use self::annotate::SNode;
use self::exprs::ExprMap;

pub use self::error::{Capacity, CompileError, ErrorKind, MAX_CHILD_SLOTS, MAX_EXPRESSIONS, MAX_STATE_SLOTS};
pub use self::shell::{is_void_element, Shell, TEXT_ANCHOR};

/// Compile one root of a template.
pub fn compile_root(node: &Node, kind: TemplateKind) -> Result<TemplateNode, CompileError> {
    match node {
        Node::Element(element) => compile_block(node, element, kind).map(TemplateNode::Block),
        Node::Text { value } => Ok(TemplateNode::Text(value.clone())),
        Node::Expr { value } => Ok(TemplateNode::Expr(*value)),
    }
}

/// `node` is the `Node::Element` wrapping `element`.
fn compile_block(
    node: &Node,
    element: &Element,
    kind: TemplateKind,
) -> Result<TemplateBlock, CompileError> {
    let exprs = ExprMap::build(element);
    if !Capacity::Expressions.fits(exprs.len()) {
        return Err(CompileError::capacity(
            Capacity::Expressions,
            exprs.len(),
            &element.tag,
        ));
    }
    trace!(tag = %element.tag, exprs = exprs.len(), "indexed expressions");

    let shell = shell::emit_static_shell(element)?;

    let mut root = SNode::build(node);
    let state_slots = slots::assign_state_slots(&mut root);
    if !Capacity::StateSlots.fits(state_slots) {
        return Err(CompileError::capacity(
            Capacity::StateSlots,
            state_slots,
            &element.tag,
        ));
    }

    let state = state::emit_state_ops(&root);
    let (props, data) = props::emit_prop_ops(&root, &exprs);
    let child = child::emit_child_ops(&root, &exprs);
    debug_assert_eq!(opcode::count_state_slots(&state), state_slots);

    let child_slots = opcode::count_child_slots(&child);
    if !Capacity::ChildSlots.fits(child_slots) {
        return Err(CompileError::capacity(
            Capacity::ChildSlots,
            child_slots,
            &element.tag,
        ));
    }

    debug!(
        tag = %element.tag,
        state_slots,
        child_slots,
        state_ops = state.len(),
        prop_ops = props.len(),
        child_ops = child.len(),
        "compiled template block"
    );

    Ok(TemplateBlock {
        flags: TemplateFlags::new(state_slots, child_slots, kind == TemplateKind::Svg),
        shell,
        props,
        child,
        state,
        data,
        exprs: exprs.ids(),
    })
}
