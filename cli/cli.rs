mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands, OutputTargetOpts, ProjectConfigOpts};
use textpack_core::{AppError, Config, OutputFormat, UnreadablePolicy};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;
    let verbose = cli_args.verbose;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet, verbose) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::WalkDir(_)) => 2,
        Some(AppError::UnreadableFile { .. }) => 2,
        Some(AppError::Git(_)) => 3,
        Some(AppError::Prompt(_)) => 4,
        Some(AppError::PathNotFound { .. }) => 5,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(AppError::YamlError(_)) => 6,
        Some(AppError::XmlSerialize(_)) => 6,
        Some(AppError::EmptyResult { .. }) => 7,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool, verbose: u8) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Files(args) => {
                log::debug!("Executing 'files' command...");
                commands::files::handle_files_command(args, commands::files::SOURCE, quiet, verbose)?;
            }
            Commands::Docs(args) => {
                log::debug!("Executing 'docs' command...");
                commands::files::handle_files_command(args, commands::files::DOCS, quiet, verbose)?;
            }
            Commands::Diff(args) => {
                log::debug!("Executing 'diff' command...");
                commands::diff::handle_diff_command(args, quiet, verbose)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args)?;
            }
        },
    }
    Ok(())
}

fn merge_config_with_cli_overrides(
    mut config: Config,
    project_opts: &ProjectConfigOpts,
    output_opts: &OutputTargetOpts,
) -> Result<Config> {
    log::trace!("Applying CLI overrides to config...");

    if let Some(title) = &project_opts.title {
        config.general.title = Some(title.clone());
    }
    if project_opts.disable_gitignore {
        config.ignore.use_gitignore = false;
    }
    if project_opts.fail_on_unreadable {
        config.collect.unreadable = UnreadablePolicy::Fail;
    }

    if let Some(format) = &output_opts.format {
        config.output.format = format
            .parse::<OutputFormat>()
            .context("Invalid --format value")?;
    }
    if output_opts.minify {
        config.output.json_pretty = false;
    }
    if let Some(outfile) = &output_opts.outfile {
        config.output.outfile = Some(outfile.clone());
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    Ok(config)
}

/// Loads the config file for `project_root` (if any) and applies the
/// command-line overrides on top.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
    output_opts: &OutputTargetOpts,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        project_opts.context_file.as_ref(),
        project_opts.disable_context_file,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let mut config = merge_config_with_cli_overrides(config, project_opts, output_opts)?;
    config.general.title = Some(config.get_effective_title(project_root));
    Ok(config)
}
