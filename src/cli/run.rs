use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{clean::clean, extract::extract, init::init, wrap::wrap},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler. `serve` is handled by the binary before this is reached.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Wrap(cmd)) => wrap(cmd),
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Clean(cmd)) => clean(cmd),
        Some(Command::Init) => init(),
        Some(Command::Serve) => bail!("Serve command should be handled before run()"),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
