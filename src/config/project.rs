use std::path::{Path, PathBuf};

use crate::api::CompileOptions;
use crate::diagnostic::Diagnostic;
use crate::ir::TemplateKind;

/// File name searched for by `Project::find`.
pub const PROJECT_FILE: &str = "tplc.toml";

/// Minimal project configuration from tplc.toml.
#[derive(Clone, Debug)]
pub struct Project {
    pub name: String,
    pub version: String,
    /// Template files, resolved against `root_dir`.
    pub entries: Vec<PathBuf>,
    /// Directory for compiled artifacts; next to each input when unset.
    pub output: Option<PathBuf>,
    pub root_dir: PathBuf,
    /// Kind forced on every template of the project.
    pub kind: Option<TemplateKind>,
    /// `[compile] normalize`, on unless set to `false`.
    pub normalize: bool,
}

/// Parse a minimal TOML string array: `["a", "b", "c"]` → `vec!["a", "b", "c"]`.
fn parse_string_array(s: &str) -> Vec<String> {
    let s = s.trim();
    if !s.starts_with('[') || !s.ends_with(']') {
        return Vec::new();
    }
    let inner = &s[1..s.len() - 1];
    inner
        .split(',')
        .map(|part| part.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Diagnostic> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Diagnostic::error(format!(
            "'{}' in {} must be true or false, found '{}'",
            key, PROJECT_FILE, value
        ))),
    }
}

impl Project {
    /// Load project from a tplc.toml file.
    pub fn load(toml_path: &Path) -> Result<Project, Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            Diagnostic::error(format!("cannot read '{}': {}", toml_path.display(), e))
        })?;

        let root_dir = toml_path.parent().unwrap_or(Path::new(".")).to_path_buf();

        // Section-aware minimal TOML parsing
        let mut name = String::new();
        let mut version = String::new();
        let mut entries: Vec<String> = Vec::new();
        let mut output: Option<String> = None;
        let mut kind: Option<TemplateKind> = None;
        let mut normalize = true;
        let mut current_section = String::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('#') || trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim();

            match current_section.as_str() {
                "project" => match key {
                    // `entry` takes a single path or an array of paths
                    "entry" if value.starts_with('[') => entries = parse_string_array(value),
                    "entry" => entries = vec![value.trim_matches('"').to_string()],
                    "name" => name = value.trim_matches('"').to_string(),
                    "version" => version = value.trim_matches('"').to_string(),
                    "output" => output = Some(value.trim_matches('"').to_string()),
                    "kind" => {
                        let value = value.trim_matches('"');
                        kind = Some(TemplateKind::from_name(value).ok_or_else(|| {
                            Diagnostic::error(format!(
                                "unknown template kind '{}' in {}",
                                value, PROJECT_FILE
                            ))
                            .with_help("expected \"html\" or \"svg\"".to_string())
                        })?);
                    }
                    _ => {}
                },
                "compile" if key == "normalize" => normalize = parse_bool(key, value)?,
                _ => {}
            }
        }

        if name.is_empty() {
            return Err(Diagnostic::error(format!(
                "missing 'name' in {}",
                PROJECT_FILE
            )));
        }

        if entries.is_empty() {
            entries.push("template.json".to_string());
        }

        Ok(Project {
            name,
            version,
            entries: entries.iter().map(|e| root_dir.join(e)).collect(),
            output: output.map(|o| root_dir.join(o)),
            root_dir,
            kind,
            normalize,
        })
    }

    /// Try to find a tplc.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(PROJECT_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Compile options declared by the project.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_kind(self.kind)
            .with_normalize(self.normalize)
    }

    /// Where the artifact for `input` is written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let file = artifact_file_name(input);
        match &self.output {
            Some(dir) => dir.join(file),
            None => input.with_file_name(file),
        }
    }
}

/// `card.json` → `card.tpl.json`
pub fn artifact_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    format!("{}.tpl.json", stem)
}
