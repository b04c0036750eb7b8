//! Instruction streams of a template block.
//!
//! Each stream is built as typed ops and packed into `u32` words only when
//! the artifact is encoded. The bit layouts below are the contract with the
//! runtime interpreter; the `*_SHIFT` and tag constants are public so that
//! interpreters can read encoded streams directly.

use std::fmt;

// ─── Template flags ────────────────────────────────────────────────

pub mod template_flags {
    /// `child_slots = (flags >> CHILDREN_SIZE_SHIFT) & MASK6`
    pub const CHILDREN_SIZE_SHIFT: u32 = 6;
    /// Template is created in the SVG namespace.
    pub const SVG: u32 = 1 << 12;
    pub const MASK6: u32 = (1 << 6) - 1;
}

// ─── State ops ─────────────────────────────────────────────────────

pub mod state_op {
    /// Save the current node into the next state slot.
    pub const SAVE: u32 = 0b001;
    /// Enter (non-zero offset) or remove an anchor comment (zero offset).
    pub const ENTER_OR_REMOVE: u32 = 0b010;
    /// `offset = op >> OFFSET_SHIFT`
    pub const OFFSET_SHIFT: u32 = 3;
}

/// One step of the runtime's walk over the cloned shell.
///
/// After every op except the last of a level the cursor advances to the
/// next sibling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateOp {
    /// Skip the current node.
    Next,
    /// Save the current node.
    Save,
    /// Optionally save the current node, then interpret the following `len`
    /// ops against its first child.
    Enter { save: bool, len: u32 },
    /// The current node is an anchor comment: remove it and save the text
    /// node that follows.
    Remove,
}

impl StateOp {
    pub fn encode(self) -> u32 {
        match self {
            StateOp::Next => 0,
            StateOp::Save => state_op::SAVE,
            StateOp::Enter { save, len } => {
                let op = state_op::ENTER_OR_REMOVE | (len << state_op::OFFSET_SHIFT);
                if save {
                    op | state_op::SAVE
                } else {
                    op
                }
            }
            StateOp::Remove => state_op::ENTER_OR_REMOVE,
        }
    }

    pub fn decode(op: u32) -> Self {
        let save = op & state_op::SAVE != 0;
        if op & state_op::ENTER_OR_REMOVE != 0 {
            let len = op >> state_op::OFFSET_SHIFT;
            if len == 0 {
                StateOp::Remove
            } else {
                StateOp::Enter { save, len }
            }
        } else if save {
            StateOp::Save
        } else {
            StateOp::Next
        }
    }

    /// Whether interpreting this op fills a state slot.
    pub fn occupies_slot(self) -> bool {
        matches!(
            self,
            StateOp::Save | StateOp::Remove | StateOp::Enter { save: true, .. }
        )
    }
}

impl fmt::Display for StateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateOp::Next => write!(f, "next"),
            StateOp::Save => write!(f, "save"),
            StateOp::Enter { save: true, len } => write!(f, "save+enter {}", len),
            StateOp::Enter { save: false, len } => write!(f, "enter {}", len),
            StateOp::Remove => write!(f, "remove"),
        }
    }
}

// ─── Prop ops ──────────────────────────────────────────────────────

pub mod prop_op {
    pub const SET_NODE: u32 = 0;
    pub const COMMON: u32 = 1;
    pub const ATTRIBUTE: u32 = 2;
    pub const PROPERTY: u32 = 3;
    pub const DIFF_DOM_PROPERTY: u32 = 4;
    pub const STYLE: u32 = 5;
    pub const EVENT: u32 = 6;
    pub const DIRECTIVE: u32 = 7;
    /// `type = op & TYPE_MASK`
    pub const TYPE_MASK: u32 = 0b111;
    /// `input = (op >> INPUT_SHIFT) & MASK6`
    pub const INPUT_SHIFT: u32 = 3;
    /// `data = op >> DATA_SHIFT`
    pub const DATA_SHIFT: u32 = 9;
    pub const MASK6: u32 = (1 << 6) - 1;
}

/// Properties with a dedicated fast path in the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommonProp {
    ClassName = 0,
    TextContent = 1,
    InnerHtml = 2,
}

impl CommonProp {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(CommonProp::ClassName),
            1 => Some(CommonProp::TextContent),
            2 => Some(CommonProp::InnerHtml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CommonProp::ClassName => "className",
            CommonProp::TextContent => "textContent",
            CommonProp::InnerHtml => "innerHTML",
        }
    }
}

/// A property update. `key` is an index into the block's data table and
/// `input` an expression index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropOp {
    /// Following ops target the node in this state slot.
    SetNode(u32),
    Common { prop: CommonProp, input: u32 },
    Attribute { key: u32, input: u32 },
    Property { key: u32, input: u32 },
    DiffDomProperty { key: u32, input: u32 },
    Style { key: u32, input: u32 },
    Event { key: u32, input: u32 },
    Directive { input: u32 },
}

impl PropOp {
    pub fn encode(self) -> u32 {
        use prop_op::*;
        let pack = |ty: u32, data: u32, input: u32| ty | (input << INPUT_SHIFT) | (data << DATA_SHIFT);
        match self {
            PropOp::SetNode(slot) => SET_NODE | (slot << DATA_SHIFT),
            PropOp::Common { prop, input } => pack(COMMON, prop as u32, input),
            PropOp::Attribute { key, input } => pack(ATTRIBUTE, key, input),
            PropOp::Property { key, input } => pack(PROPERTY, key, input),
            PropOp::DiffDomProperty { key, input } => pack(DIFF_DOM_PROPERTY, key, input),
            PropOp::Style { key, input } => pack(STYLE, key, input),
            PropOp::Event { key, input } => pack(EVENT, key, input),
            PropOp::Directive { input } => pack(DIRECTIVE, 0, input),
        }
    }

    /// Returns `None` for a `Common` op with an unknown property code.
    pub fn decode(op: u32) -> Option<Self> {
        use prop_op::*;
        let data = op >> DATA_SHIFT;
        let input = (op >> INPUT_SHIFT) & MASK6;
        let decoded = match op & TYPE_MASK {
            SET_NODE => PropOp::SetNode(data),
            COMMON => PropOp::Common {
                prop: CommonProp::from_code(data)?,
                input,
            },
            ATTRIBUTE => PropOp::Attribute { key: data, input },
            PROPERTY => PropOp::Property { key: data, input },
            DIFF_DOM_PROPERTY => PropOp::DiffDomProperty { key: data, input },
            STYLE => PropOp::Style { key: data, input },
            EVENT => PropOp::Event { key: data, input },
            _ => PropOp::Directive { input },
        };
        Some(decoded)
    }
}

impl fmt::Display for PropOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropOp::SetNode(slot) => write!(f, "set_node @{}", slot),
            PropOp::Common { prop, input } => write!(f, "{} #{}", prop.name(), input),
            PropOp::Attribute { key, input } => write!(f, "attr [{}] #{}", key, input),
            PropOp::Property { key, input } => write!(f, "prop [{}] #{}", key, input),
            PropOp::DiffDomProperty { key, input } => write!(f, "dom_prop [{}] #{}", key, input),
            PropOp::Style { key, input } => write!(f, "style [{}] #{}", key, input),
            PropOp::Event { key, input } => write!(f, "event [{}] #{}", key, input),
            PropOp::Directive { input } => write!(f, "directive #{}", input),
        }
    }
}

// ─── Child ops ─────────────────────────────────────────────────────

pub mod child_op {
    pub const CHILD: u32 = 0b00;
    pub const SET_NEXT: u32 = 0b01;
    pub const SET_PARENT: u32 = 0b11;
    /// `type = op & TYPE`
    pub const TYPE: u32 = 0b11;
    /// `value = op >> VALUE_SHIFT`
    pub const VALUE_SHIFT: u32 = 2;
}

/// Dynamic child insertion, interpreted right to left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildOp {
    /// Mount the value of this expression index before the current anchor.
    Child(u32),
    /// The node in this state slot becomes the insertion anchor.
    SetNext(u32),
    /// The element in this state slot becomes the parent; anchor is reset.
    SetParent(u32),
}

impl ChildOp {
    pub fn encode(self) -> u32 {
        use child_op::*;
        match self {
            ChildOp::Child(input) => CHILD | (input << VALUE_SHIFT),
            ChildOp::SetNext(slot) => SET_NEXT | (slot << VALUE_SHIFT),
            ChildOp::SetParent(slot) => SET_PARENT | (slot << VALUE_SHIFT),
        }
    }

    /// Returns `None` for the unused type tag `0b10`.
    pub fn decode(op: u32) -> Option<Self> {
        use child_op::*;
        let value = op >> VALUE_SHIFT;
        match op & TYPE {
            CHILD => Some(ChildOp::Child(value)),
            SET_NEXT => Some(ChildOp::SetNext(value)),
            SET_PARENT => Some(ChildOp::SetParent(value)),
            _ => None,
        }
    }
}

impl fmt::Display for ChildOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildOp::Child(input) => write!(f, "child #{}", input),
            ChildOp::SetNext(slot) => write!(f, "set_next @{}", slot),
            ChildOp::SetParent(slot) => write!(f, "set_parent @{}", slot),
        }
    }
}

// ─── Counting ──────────────────────────────────────────────────────

/// Slots filled while interpreting `ops`, including the implicit root slot.
pub fn count_state_slots(ops: &[StateOp]) -> usize {
    1 + ops.iter().filter(|op| op.occupies_slot()).count()
}

pub fn count_child_slots(ops: &[ChildOp]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, ChildOp::Child(_)))
        .count()
}
