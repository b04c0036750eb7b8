use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::build::BuildArgs;
use cli::check::CheckArgs;
use cli::dump::DumpArgs;

#[derive(Parser)]
#[command(
    name = "tplc",
    version,
    about = "Compiles DOM templates into instantiation programs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new template project
    Init {
        /// Project name (defaults to current directory name)
        name: Option<String>,
    },
    /// Compile templates to artifacts (<input>.tpl.json)
    Build(BuildArgs),
    /// Compile templates and report errors without writing anything
    Check(CheckArgs),
    /// Print the compiled instruction streams of a template
    Dump(DumpArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TPLC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init { name } => cli::init::cmd_init(name),
        Command::Build(args) => cli::build::cmd_build(args),
        Command::Check(args) => cli::check::cmd_check(args),
        Command::Dump(args) => cli::dump::cmd_dump(args),
    }
}
