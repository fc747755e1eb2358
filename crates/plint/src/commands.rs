mod check;

use anyhow::Result;
use clap::Subcommand;

use crate::args::Args;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &Args) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum PlintCommand {
    /// Check Pug files for problems
    Check(self::check::Check),
}

impl Command for PlintCommand {
    fn execute(&self, args: &Args) -> Result<Exit> {
        match self {
            PlintCommand::Check(cmd) => cmd.execute(args),
        }
    }
}
