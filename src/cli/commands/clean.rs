use anyhow::Result;

use super::super::args::CleanCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::{print_clean, print_clean_blocked};
use super::helper::load_project;
use crate::extract::{
    KeyExtractor,
    clean::{CleanOptions, clean_locales},
};

pub fn clean(cmd: CleanCommand) -> Result<ExitStatus> {
    let args = cmd.args;
    let project = load_project(&args.common)?;
    let config = &project.config;

    let extraction = KeyExtractor::new(config, &project.root).extract()?;
    // Keys used only in an unscanned file would look unused.
    if !args.dry_run && extraction.scan_failures() > 0 {
        print_clean_blocked(&extraction);
        return Ok(ExitStatus::Failure);
    }

    let options = CleanOptions {
        languages: config.languages.clone(),
        default_language: config.default_language.clone(),
        locales_dir: match args.output {
            Some(dir) => dir,
            None => project.root.join(&config.locales_dir),
        },
        dry_run: args.dry_run,
        backup: !args.no_backup,
    };
    let report = clean_locales(&extraction.keys, &options)?;
    print_clean(&extraction, &report, args.common.verbose);

    Ok(ExitStatus::Success)
}
