use std::path::PathBuf;
use std::process;

use clap::Args;
use tplc::project::artifact_file_name;

use super::{resolve_input, resolve_options};

#[derive(Args)]
pub struct BuildArgs {
    /// Input .json template or directory with tplc.toml
    pub input: PathBuf,
    /// Output file (default: <input>.tpl.json); single template only
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Compile as SVG regardless of the declared kind
    #[arg(long)]
    pub svg: bool,
    /// Skip text normalization (input must already be normalized)
    #[arg(long)]
    pub no_normalize: bool,
}

pub fn cmd_build(args: BuildArgs) {
    let BuildArgs {
        input,
        output,
        svg,
        no_normalize,
    } = args;
    let ri = resolve_input(&input);
    let options = resolve_options(svg, no_normalize, ri.project.as_ref());

    if output.is_some() && ri.entries.len() > 1 {
        eprintln!("error: --output requires a single template input");
        process::exit(1);
    }

    let mut failed = false;
    for file in tplc::compile_files(&ri.entries, &options) {
        file.render_diagnostics();
        let (path, artifact) = match file.result {
            Ok(a) => (file.path, a),
            Err(_) => {
                failed = true;
                continue;
            }
        };

        let out_path = match (&output, &ri.project) {
            (Some(o), _) => o.clone(),
            (None, Some(proj)) => proj.output_path(&path),
            (None, None) => path.with_file_name(artifact_file_name(&path)),
        };

        let encoded = artifact.encode();
        let json = match serde_json::to_string_pretty(&encoded) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("error: cannot serialize '{}': {}", path.display(), e);
                process::exit(1);
            }
        };

        if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("error: cannot create directory '{}': {}", dir.display(), e);
                process::exit(1);
            }
        }
        if let Err(e) = std::fs::write(&out_path, json) {
            eprintln!("error: cannot write '{}': {}", out_path.display(), e);
            process::exit(1);
        }
        eprintln!(
            "Compiled {} -> {} ({} roots)",
            path.display(),
            out_path.display(),
            artifact.roots.len()
        );
    }

    if failed {
        process::exit(1);
    }
}
