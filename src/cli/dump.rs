use std::path::PathBuf;
use std::process;

use clap::Args;
use tplc::TemplateNode;

use super::{resolve_input, resolve_options};

#[derive(Args)]
pub struct DumpArgs {
    /// Input .json template or directory with tplc.toml
    pub input: PathBuf,
    /// Compile as SVG regardless of the declared kind
    #[arg(long)]
    pub svg: bool,
    /// Skip text normalization (input must already be normalized)
    #[arg(long)]
    pub no_normalize: bool,
    /// Show full 256-bit block hashes instead of short form
    #[arg(long)]
    pub full: bool,
}

pub fn cmd_dump(args: DumpArgs) {
    let ri = resolve_input(&args.input);
    let options = resolve_options(args.svg, args.no_normalize, ri.project.as_ref());

    let mut failed = false;
    for file in tplc::compile_files(&ri.entries, &options) {
        file.render_diagnostics();
        let artifact = match &file.result {
            Ok(a) => a,
            Err(_) => {
                failed = true;
                continue;
            }
        };

        println!("; {}", file.path.display());
        for (i, root) in artifact.roots.iter().enumerate() {
            match root {
                TemplateNode::Block(block) => {
                    let hash = block.encode().content_hash().to_hex();
                    let hash = if args.full { &hash[..] } else { &hash[..16] };
                    println!("root #{} {}", i, hash);
                }
                _ => println!("root #{}", i),
            }
            print!("{}", root);
        }
    }

    if failed {
        process::exit(1);
    }
}
