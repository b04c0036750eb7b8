use std::fmt;

use crate::diagnostic::Diagnostic;

/// Capacity of the 6-bit fields of the encoded streams. Expression indices
/// run below `MAX_EXPRESSIONS`. Slot counts are packed as-is into the block
/// flags, so a block must use fewer than `MAX_STATE_SLOTS` and
/// `MAX_CHILD_SLOTS`.
pub const MAX_EXPRESSIONS: usize = 64;
pub const MAX_STATE_SLOTS: usize = 64;
pub const MAX_CHILD_SLOTS: usize = 64;

/// Fixed-capacity resource of a template block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    Expressions,
    StateSlots,
    ChildSlots,
}

impl Capacity {
    pub fn limit(self) -> usize {
        match self {
            Capacity::Expressions => MAX_EXPRESSIONS,
            Capacity::StateSlots => MAX_STATE_SLOTS,
            Capacity::ChildSlots => MAX_CHILD_SLOTS,
        }
    }

    /// Whether `count` fits the field that packs it.
    pub fn fits(self, count: usize) -> bool {
        match self {
            Capacity::Expressions => count <= MAX_EXPRESSIONS,
            Capacity::StateSlots | Capacity::ChildSlots => count < self.limit(),
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Capacity::Expressions => "expressions",
            Capacity::StateSlots => "state slots",
            Capacity::ChildSlots => "child slots",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A fixed-width counter of the block overflowed.
    CapacityExceeded { resource: Capacity, count: usize },
    /// A void element was given children.
    VoidElementChildren { tag: String },
}

/// Compilation of one root failed; no artifact is produced for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    /// Index of the offending root in the template.
    pub root: usize,
    /// Tags from the root element down to the offending element.
    pub element_path: Vec<String>,
    pub kind: ErrorKind,
}

impl CompileError {
    pub(crate) fn capacity(resource: Capacity, count: usize, root_tag: &str) -> Self {
        Self {
            root: 0,
            element_path: vec![root_tag.to_string()],
            kind: ErrorKind::CapacityExceeded { resource, count },
        }
    }

    pub(crate) fn void_children(path: &[&str]) -> Self {
        Self {
            root: 0,
            element_path: path.iter().map(|t| t.to_string()).collect(),
            kind: ErrorKind::VoidElementChildren {
                tag: path.last().copied().unwrap_or_default().to_string(),
            },
        }
    }

    pub(crate) fn at_root(mut self, root: usize) -> Self {
        self.root = root;
        self
    }

    pub fn is_capacity_error(&self) -> bool {
        matches!(self.kind, ErrorKind::CapacityExceeded { .. })
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let location = format!(
            "in root #{} at <{}>",
            self.root,
            self.element_path.join("> <")
        );
        let diag = Diagnostic::error(self.to_string()).with_note(location);
        match &self.kind {
            ErrorKind::CapacityExceeded { resource, count } => diag.with_help(format!(
                "found {} {}; split the template into smaller blocks",
                count,
                resource.noun()
            )),
            ErrorKind::VoidElementChildren { tag } => {
                diag.with_help(format!("remove the children of <{}>", tag))
            }
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::CapacityExceeded { resource, .. } => write!(
                f,
                "exceeded maximum number ({}) of {} per template block",
                resource.limit(),
                resource.noun()
            ),
            ErrorKind::VoidElementChildren { tag } => {
                write!(f, "void element '{}' shouldn't have any children", tag)
            }
        }
    }
}

impl std::error::Error for CompileError {}
