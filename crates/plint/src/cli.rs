use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::args::GlobalArgs;
use crate::commands::Command;
use crate::commands::PlintCommand;

/// The main CLI structure that defines the command-line interface
#[derive(Parser)]
#[command(name = "plint")]
#[command(version, about = "Lint Pug templates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: PlintCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    init_tracing(&cli.args.global);

    let exit = cli.command.execute(&cli.args)?;
    Ok(exit.process())
}

fn init_tracing(global: &GlobalArgs) {
    let level = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
