use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{resolve_input, resolve_options};

#[derive(Args)]
pub struct CheckArgs {
    /// Input .json template or directory with tplc.toml
    pub input: PathBuf,
    /// Compile as SVG regardless of the declared kind
    #[arg(long)]
    pub svg: bool,
    /// Skip text normalization (input must already be normalized)
    #[arg(long)]
    pub no_normalize: bool,
}

pub fn cmd_check(args: CheckArgs) {
    let ri = resolve_input(&args.input);
    let options = resolve_options(args.svg, args.no_normalize, ri.project.as_ref());

    let mut failed = false;
    for file in tplc::compile_files(&ri.entries, &options) {
        file.render_diagnostics();
        match &file.result {
            Ok(artifact) => eprintln!(
                "OK: {} ({} roots, {} blocks)",
                file.path.display(),
                artifact.roots.len(),
                artifact.blocks().count()
            ),
            Err(_) => failed = true,
        }
    }

    if failed {
        process::exit(1);
    }
}
