pub mod api;
pub mod artifact;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod ir;
pub mod span;

// `tplc::project` for the CLI
pub use config::project;

// Public API: `tplc::compile()` etc.
pub use api::*;
pub use artifact::{EncodedArtifact, TemplateArtifact, TemplateBlock, TemplateNode};
pub use codegen::{CompileError, ErrorKind};
