//! Compilation artifacts: one immutable node per template root.
//!
//! Blocks keep typed instruction streams; `encode` packs them into the
//! numeric form consumed by the runtime and written by `tplc build`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codegen::opcode::{template_flags, ChildOp, PropOp, StateOp};
use crate::ir::ExprId;

pub use crate::codegen::shell::Shell;

// ─── Flags ─────────────────────────────────────────────────────────

/// Packed block header: state slot count, child slot count, SVG bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemplateFlags(pub u32);

impl TemplateFlags {
    pub fn new(state_slots: usize, child_slots: usize, svg: bool) -> Self {
        debug_assert!(state_slots <= template_flags::MASK6 as usize);
        debug_assert!(child_slots <= template_flags::MASK6 as usize);
        let mut bits = state_slots as u32 | ((child_slots as u32) << template_flags::CHILDREN_SIZE_SHIFT);
        if svg {
            bits |= template_flags::SVG;
        }
        TemplateFlags(bits)
    }

    /// Number of state slots including the root.
    pub fn state_slots(self) -> usize {
        (self.0 & template_flags::MASK6) as usize
    }

    pub fn child_slots(self) -> usize {
        ((self.0 >> template_flags::CHILDREN_SIZE_SHIFT) & template_flags::MASK6) as usize
    }

    pub fn is_svg(self) -> bool {
        self.0 & template_flags::SVG != 0
    }
}

// ─── Artifact ──────────────────────────────────────────────────────

/// Output of compiling one template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateArtifact {
    pub roots: Vec<TemplateNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TemplateNode {
    /// Compiled element root.
    Block(TemplateBlock),
    /// Literal text root.
    Text(String),
    /// Bare placeholder root.
    Expr(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateBlock {
    pub flags: TemplateFlags,
    pub shell: Shell,
    pub props: Vec<PropOp>,
    pub child: Vec<ChildOp>,
    pub state: Vec<StateOp>,
    /// Keys referenced by prop ops.
    pub data: Vec<String>,
    /// Placeholder occupying each expression index.
    pub exprs: Vec<ExprId>,
}

impl TemplateArtifact {
    pub fn encode(&self) -> EncodedArtifact {
        EncodedArtifact {
            roots: self.roots.iter().map(TemplateNode::encode).collect(),
        }
    }

    /// Blocks of the artifact, in root order.
    pub fn blocks(&self) -> impl Iterator<Item = &TemplateBlock> {
        self.roots.iter().filter_map(|r| match r {
            TemplateNode::Block(b) => Some(b),
            _ => None,
        })
    }
}

impl TemplateNode {
    pub fn encode(&self) -> EncodedNode {
        match self {
            TemplateNode::Block(b) => EncodedNode::Block(b.encode()),
            TemplateNode::Text(value) => EncodedNode::Text {
                value: value.clone(),
            },
            TemplateNode::Expr(id) => EncodedNode::Expr { value: id.0 },
        }
    }
}

impl TemplateBlock {
    pub fn encode(&self) -> EncodedBlock {
        EncodedBlock {
            flags: self.flags.0,
            template: match &self.shell {
                Shell::Tag(tag) => EncodedShell::Tag(tag.clone()),
                Shell::Chunks(chunks) => EncodedShell::Chunks(chunks.clone()),
            },
            props: self.props.iter().map(|op| op.encode()).collect(),
            child: self.child.iter().map(|op| op.encode()).collect(),
            state: self.state.iter().map(|op| op.encode()).collect(),
            data: self.data.clone(),
            exprs: self.exprs.iter().map(|id| id.0).collect(),
        }
    }
}

// ─── Encoded form ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedArtifact {
    pub roots: Vec<EncodedNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EncodedNode {
    Block(EncodedBlock),
    Text { value: String },
    Expr { value: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedShell {
    Tag(String),
    Chunks(Vec<String>),
}

/// Block with bit-packed instruction streams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedBlock {
    pub flags: u32,
    pub template: EncodedShell,
    pub props: Vec<u32>,
    pub child: Vec<u32>,
    pub state: Vec<u32>,
    pub data: Vec<String>,
    pub exprs: Vec<u32>,
}

impl EncodedBlock {
    /// BLAKE3 digest over every field of the block. Identical blocks
    /// (same shell, streams, data and placeholders) hash identically.
    pub fn content_hash(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.flags.to_le_bytes());
        match &self.template {
            EncodedShell::Tag(tag) => {
                hasher.update(&[0]);
                hash_str(&mut hasher, tag);
            }
            EncodedShell::Chunks(chunks) => {
                hasher.update(&[1]);
                hash_strs(&mut hasher, chunks);
            }
        }
        hash_words(&mut hasher, &self.props);
        hash_words(&mut hasher, &self.child);
        hash_words(&mut hasher, &self.state);
        hash_strs(&mut hasher, &self.data);
        hash_words(&mut hasher, &self.exprs);
        hasher.finalize()
    }
}

fn hash_words(hasher: &mut blake3::Hasher, words: &[u32]) {
    hasher.update(&(words.len() as u64).to_le_bytes());
    for w in words {
        hasher.update(&w.to_le_bytes());
    }
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_strs(hasher: &mut blake3::Hasher, strs: &[String]) {
    hasher.update(&(strs.len() as u64).to_le_bytes());
    for s in strs {
        hash_str(hasher, s);
    }
}

// ─── Display ───────────────────────────────────────────────────────

impl fmt::Display for TemplateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateNode::Block(b) => write!(f, "{}", b),
            TemplateNode::Text(value) => writeln!(f, "text {:?}", value),
            TemplateNode::Expr(id) => writeln!(f, "expr {}", id),
        }
    }
}

impl fmt::Display for TemplateBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "block state_slots={} child_slots={}{}",
            self.flags.state_slots(),
            self.flags.child_slots(),
            if self.flags.is_svg() { " svg" } else { "" }
        )?;
        match &self.shell {
            Shell::Tag(tag) => writeln!(f, "  shell <{}>", tag)?,
            Shell::Chunks(chunks) => writeln!(f, "  shell {:?}", chunks)?,
        }
        if !self.exprs.is_empty() {
            let exprs: Vec<String> = self
                .exprs
                .iter()
                .enumerate()
                .map(|(i, id)| format!("#{}={}", i, id))
                .collect();
            writeln!(f, "  exprs {}", exprs.join(" "))?;
        }
        if !self.data.is_empty() {
            let data: Vec<String> = self
                .data
                .iter()
                .enumerate()
                .map(|(i, key)| format!("[{}]={}", i, key))
                .collect();
            writeln!(f, "  data {}", data.join(" "))?;
        }
        write_stream(f, "state", &self.state)?;
        write_stream(f, "props", &self.props)?;
        write_stream(f, "child", &self.child)
    }
}

fn write_stream<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, ops: &[T]) -> fmt::Result {
    if ops.is_empty() {
        return Ok(());
    }
    writeln!(f, "  {}:", name)?;
    for (i, op) in ops.iter().enumerate() {
        writeln!(f, "    {:>3}  {}", i, op)?;
    }
    Ok(())
}
