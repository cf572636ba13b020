use crate::cli_args::CollectArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use log;
use textpack_core::{
    AutoConfirm, Config, ConfirmSource, Document, IgnoreOracle, NoVcs, RulePreset, TerminalPrompt,
    VcsContext, collect_file_tree, render_document,
};

/// What a collecting command selects by default.
#[derive(Debug, Clone, Copy)]
pub struct CollectKind {
    pub label: &'static str,
    pub preset: RulePreset,
    pub default_extensions: &'static [&'static str],
}

pub const SOURCE: CollectKind = CollectKind {
    label: "Source bundle",
    preset: RulePreset::Source,
    default_extensions: &[".py"],
};

pub const DOCS: CollectKind = CollectKind {
    label: "Docs bundle",
    preset: RulePreset::Docs,
    default_extensions: &[".md"],
};

pub fn handle_files_command(
    args: CollectArgs,
    kind: CollectKind,
    quiet: bool,
    verbose: u8,
) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.path.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(&project_root, &args.project_config, &args.output)
        .context("Failed to load configuration")?;
    if !args.extensions.is_empty() {
        config.collect.extensions = Some(args.extensions.clone());
    }
    if args.yes {
        config.collect.yes = true;
    }

    let options = config.collect_options(kind.preset, kind.default_extensions);
    log::debug!(
        "Collecting {:?} with {} ignore rule(s)",
        options.extensions,
        options.rules.prefixes().len()
    );

    let vcs = if config.ignore.use_gitignore {
        VcsContext::discover(&project_root)
    } else {
        VcsContext::none()
    };
    let oracle: &dyn IgnoreOracle = if vcs.has_repository() { &vcs } else { &NoVcs };
    let confirmer: &dyn ConfirmSource = if options.auto_confirm {
        &AutoConfirm
    } else {
        &TerminalPrompt
    };

    if !options.auto_confirm && !quiet {
        println!("{}", "Select files and folders to include:".bold());
    }

    let records = collect_file_tree(&project_root, &options, confirmer, oracle)
        .context("Nothing written")?;

    let title = config.get_effective_title(&project_root);
    let document = Document::build(title, records, config.output.include_timestamp);
    let rendered = render_document(&document, config.output.format, config.output.json_pretty)
        .context("Failed to render document")?;

    let target = output::resolve_target(&config, &args.output)?;
    output::emit(&rendered, &target, kind.label, quiet)?;

    if verbose >= 1 && !quiet {
        output::print_files_table(&document.files);
    }
    Ok(())
}
