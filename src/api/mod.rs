use std::borrow::Cow;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::artifact::TemplateArtifact;
use crate::codegen::{self, CompileError};
use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::ir::{normalize::normalize_root, Template, TemplateKind};
use crate::span::Span;


/// Options controlling template compilation.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Merge adjacent text nodes and drop empty ones before compiling.
    /// The state walk assumes normalized input, so only turn this off for
    /// templates that are already normalized.
    pub normalize: bool,
    /// Overrides the kind declared by the template.
    pub kind: Option<TemplateKind>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            kind: None,
        }
    }
}

impl CompileOptions {
    /// Options that compile every template as SVG.
    pub fn svg() -> Self {
        Self {
            kind: Some(TemplateKind::Svg),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: Option<TemplateKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

// ─── In-memory templates ───────────────────────────────────────────

/// Compile a template with default options.
pub fn compile_template(template: &Template) -> Result<TemplateArtifact, CompileError> {
    compile_template_with_options(template, &CompileOptions::default())
}

/// Compile every root of `template`. Stops at the first root that fails.
pub fn compile_template_with_options(
    template: &Template,
    options: &CompileOptions,
) -> Result<TemplateArtifact, CompileError> {
    let kind = options.kind.unwrap_or(template.kind);

    let roots = template
        .children
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let node = if options.normalize {
                Cow::Owned(normalize_root(node))
            } else {
                Cow::Borrowed(node)
            };
            codegen::compile_root(&node, kind).map_err(|e| e.at_root(i))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(roots = roots.len(), kind = ?kind, "compiled template");
    Ok(TemplateArtifact { roots })
}

// ─── JSON sources ──────────────────────────────────────────────────

/// Parse a template from its JSON form.
pub fn parse_template(source: &str) -> Result<Template, Diagnostic> {
    serde_json::from_str(source).map_err(|e| {
        let span = Span::at_line_col(source, e.line(), e.column());
        Diagnostic::error(format!("invalid template: {}", e))
            .with_span(span)
            .with_help("see `tplc init` for an example template".to_string())
    })
}

/// Compile a JSON template source with default options.
pub fn compile(source: &str, filename: &str) -> Result<TemplateArtifact, Vec<Diagnostic>> {
    compile_with_options(source, filename, &CompileOptions::default())
}

/// Compile a JSON template source. Diagnostics are rendered to stderr
/// before being returned.
pub fn compile_with_options(
    source: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<TemplateArtifact, Vec<Diagnostic>> {
    compile_source(source, options).map_err(|errors| {
        render_diagnostics(&errors, filename, source);
        errors
    })
}

fn compile_source(source: &str, options: &CompileOptions) -> Result<TemplateArtifact, Vec<Diagnostic>> {
    parse_template(source)
        .and_then(|template| {
            compile_template_with_options(&template, options).map_err(|e| e.to_diagnostic())
        })
        .map_err(|diag| vec![diag])
}

// ─── Files ─────────────────────────────────────────────────────────

/// One template file compiled by `compile_files`.
#[derive(Debug)]
pub struct CompiledFile {
    pub path: PathBuf,
    /// Source text; empty when the file could not be read.
    pub source: String,
    pub result: Result<TemplateArtifact, Vec<Diagnostic>>,
}

impl CompiledFile {
    fn load(path: &Path, options: &CompileOptions) -> Self {
        match std::fs::read_to_string(path) {
            Ok(source) => {
                info!(path = %path.display(), "compiling template");
                let result = compile_source(&source, options);
                CompiledFile {
                    path: path.to_path_buf(),
                    source,
                    result,
                }
            }
            Err(e) => CompiledFile {
                path: path.to_path_buf(),
                source: String::new(),
                result: Err(vec![Diagnostic::error(format!(
                    "cannot read '{}': {}",
                    path.display(),
                    e
                ))]),
            },
        }
    }

    /// Render the diagnostics of a failed compile to stderr.
    pub fn render_diagnostics(&self) {
        if let Err(errors) = &self.result {
            render_diagnostics(errors, &self.path.display().to_string(), &self.source);
        }
    }
}

/// Read and compile a template file. Diagnostics are rendered to stderr.
pub fn compile_file(path: &Path, options: &CompileOptions) -> Result<TemplateArtifact, Vec<Diagnostic>> {
    let file = CompiledFile::load(path, options);
    file.render_diagnostics();
    file.result
}

/// Compile several template files in parallel. Results keep input order and
/// nothing is rendered; callers report diagnostics with
/// `CompiledFile::render_diagnostics`.
pub fn compile_files(paths: &[PathBuf], options: &CompileOptions) -> Vec<CompiledFile> {
    paths
        .par_iter()
        .map(|path| CompiledFile::load(path, options))
        .collect()
}
