//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `wrap`: Wrap hardcoded text in `t()` and inject translation bindings
//! - `extract`: Collect translation keys into locale files or a CSV sheet
//! - `clean`: Remove unused or untranslated keys from locale files
//! - `init`: Write a default configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{Framework, Mode, ParserType};
use crate::extract::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Wrap(cmd)) => cmd.args.common.verbose,
            Some(Command::Extract(cmd)) => cmd.args.common.verbose,
            Some(Command::Clean(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Common arguments shared by `wrap` and `extract`.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root; the config file is looked up from here (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Source file glob (overrides config file)
    #[arg(short = 'p', long)]
    pub pattern: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct WrapArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would change without writing files
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Translation binding to inject (overrides config file)
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Target framework (overrides config file)
    #[arg(long, value_enum)]
    pub framework: Option<Framework>,

    /// Parser backend (overrides config file)
    #[arg(long, value_enum)]
    pub parser: Option<ParserType>,

    /// Module the translation hook is imported from (overrides config file)
    #[arg(long)]
    pub import_source: Option<String>,
}

#[derive(Debug, Args)]
pub struct WrapCommand {
    #[command(flatten)]
    pub args: WrapArgs,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Rebuild locale files from the extracted keys, dropping existing entries
    #[arg(long)]
    pub force: bool,

    /// Print what would be written without touching the filesystem
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Output directory (overrides `localesDir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Parser)]
pub struct CleanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would be removed without touching the filesystem
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Overwrite locale files without keeping a timestamped backup
    #[arg(long)]
    pub no_backup: bool,

    /// Locale directory (overrides `localesDir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CleanCommand {
    #[command(flatten)]
    pub args: CleanArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wrap hardcoded text in t() calls and inject translation bindings
    Wrap(WrapCommand),
    /// Extract translation keys from t() calls into locale files
    Extract(ExtractCommand),
    /// Remove keys no longer used in code, or without a valid default-language value
    Clean(CleanCommand),
    /// Initialize a new i18nexus.config.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
