use anyhow::{Context, Result};

use super::super::args::WrapCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::print_wrap_result;
use super::helper::load_project;
use crate::config::CONFIG_FILE_NAME;
use crate::wrapper::TranslationWrapper;

pub fn wrap(cmd: WrapCommand) -> Result<ExitStatus> {
    let args = cmd.args;
    let mut project = load_project(&args.common)?;
    if !project.from_file {
        log::info!("no {} found, using defaults", CONFIG_FILE_NAME);
    }

    let config = &mut project.config;
    config.dry_run |= args.dry_run;
    if let Some(mode) = args.mode {
        config.mode = Some(mode);
    }
    if let Some(framework) = args.framework {
        config.framework = Some(framework);
    }
    if let Some(parser) = args.parser {
        config.parser_type = parser;
    }
    if let Some(source) = args.import_source {
        config.translation_import_source = source;
    }
    config.validate()?;

    let wrapper = TranslationWrapper::new(config.to_transform_config(&project.root))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(wrapper.run())?;

    for failed in result.issues.iter().filter(|i| i.is_file_failure()) {
        log::debug!("skipped {}", failed.file_path());
    }
    print_wrap_result(&result, args.common.verbose);

    Ok(ExitStatus::Success)
}
