use crate::cli_args::DiffArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use log;
use textpack_core::{ChangeReport, Config, collect_repo_changes, render_changes};

pub fn handle_diff_command(args: DiffArgs, quiet: bool, verbose: u8) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.path.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, &args.project_config, &args.output)
        .context("Failed to load configuration")?;

    let changes = collect_repo_changes(&project_root, &config.change_options())
        .context("Failed to collect repository changes")?;

    let title = config.get_effective_title(&project_root);
    let report = ChangeReport::build(title, changes, config.output.include_timestamp);
    if report.is_empty() {
        if !quiet {
            println!("{} No uncommitted changes found; nothing written.", "ℹ".blue());
        }
        return Ok(());
    }

    let rendered = render_changes(&report, config.output.format, config.output.json_pretty)
        .context("Failed to render change report")?;

    let target = output::resolve_target(&config, &args.output)?;
    output::emit(&rendered, &target, "Change report", quiet)?;

    if verbose >= 1 && !quiet {
        output::print_changes_table(report.changes.values());
    }
    Ok(())
}
