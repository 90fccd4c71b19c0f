use anyhow::Result;

use super::super::args::ExtractCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::print_extraction;
use super::helper::load_project;
use crate::extract::{
    KeyExtractor,
    output::{OutputOptions, write_outputs},
};

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let args = cmd.args;
    let project = load_project(&args.common)?;
    let config = &project.config;

    let extraction = KeyExtractor::new(config, &project.root).extract()?;
    let output_dir = match args.output {
        Some(dir) => dir,
        None => project.root.join(&config.locales_dir),
    };
    let options = OutputOptions {
        format: args.format,
        languages: config.languages.clone(),
        default_language: config.default_language.clone(),
        output_dir,
        force: args.force,
        dry_run: args.dry_run,
    };

    let files = write_outputs(&extraction.keys, &options)?;
    print_extraction(&extraction, &files, args.common.verbose);

    Ok(ExitStatus::Success)
}
