pub mod build;
pub mod check;
pub mod dump;
pub mod init;

use std::path::{Path, PathBuf};
use std::process;

use tplc::project::{Project, PROJECT_FILE};
use tplc::CompileOptions;

/// Resolved input: template files and optional project.
pub struct ResolvedInput {
    pub entries: Vec<PathBuf>,
    pub project: Option<Project>,
}

fn load_project(toml_path: &Path) -> Project {
    match Project::load(toml_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}", e.message);
            process::exit(1);
        }
    }
}

/// Resolve an input path (template file or project directory) to the
/// template files to compile and the project they belong to.
pub fn resolve_input(input: &Path) -> ResolvedInput {
    if input.is_dir() {
        let toml_path = input.join(PROJECT_FILE);
        if !toml_path.exists() {
            eprintln!("error: no {} found in '{}'", PROJECT_FILE, input.display());
            process::exit(1);
        }
        let project = load_project(&toml_path);
        return ResolvedInput {
            entries: project.entries.clone(),
            project: Some(project),
        };
    }

    if !input.extension().is_some_and(|e| e == "json") {
        eprintln!("error: input must be a .json template or project directory");
        process::exit(1);
    }

    // A single file still picks up the settings of an enclosing project.
    let project = Project::find(input.parent().unwrap_or(Path::new("."))).map(|p| load_project(&p));
    ResolvedInput {
        entries: vec![input.to_path_buf()],
        project,
    }
}

/// Project settings first, then command-line overrides.
pub fn resolve_options(svg: bool, no_normalize: bool, project: Option<&Project>) -> CompileOptions {
    let mut options = project.map(Project::compile_options).unwrap_or_default();
    if svg {
        options.kind = Some(tplc::ir::TemplateKind::Svg);
    }
    if no_normalize {
        options.normalize = false;
    }
    options
}
