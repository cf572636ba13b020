use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        help = "Folder to collect from (default: $PROJECT_ROOT or current dir).",
        value_name = "PATH"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .textpack/textpack.toml).",
        value_name = "CONTEXT_FILE",
        conflicts_with = "disable_context_file",
        help_heading = "Project Setup"
    )]
    pub context_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "context_file",
        help_heading = "Project Setup"
    )]
    pub disable_context_file: bool,

    #[arg(
        long,
        help = "Title written into the artifact (overrides config/dir name).",
        value_name = "TITLE",
        help_heading = "Project Setup"
    )]
    pub title: Option<String>,

    #[arg(
        long,
        help = "Do not consult .gitignore files.",
        help_heading = "Selection"
    )]
    pub disable_gitignore: bool,

    #[arg(
        long,
        help = "Abort on files that are not valid UTF-8 instead of skipping them.",
        help_heading = "Selection"
    )]
    pub fail_on_unreadable: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputTargetOpts {
    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["xml", "json", "yaml"], help_heading = "Output")]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Write the artifact to this file (default: ./<dir name>.<ext>).",
        value_name = "OUTFILE",
        conflicts_with = "stdout",
        help_heading = "Output"
    )]
    pub outfile: Option<PathBuf>,

    #[arg(
        long,
        help = "Print the artifact to stdout instead of writing a file.",
        help_heading = "Output"
    )]
    pub stdout: bool,

    #[arg(
        long,
        help = "Minify JSON output.",
        help_heading = "Output"
    )]
    pub minify: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "textpack",
    author,
    version,
    about = "Bundle selected text files or pending git changes into one document.",
    long_about = "textpack walks a folder, asks which sub-folders and files to include \n(or takes everything with -y), and writes their contents as a single \nXML, JSON or YAML document. The diff command does the same for files \nwith uncommitted changes in a git repository.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  textpack files -y\n  textpack files ./src -e .rs -e .toml -o context.xml\n  textpack docs --stdout\n  textpack diff -f json",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "f",
        about = "Collect source files (default extension: .py)."
    )]
    Files(CollectArgs),

    #[command(about = "Collect documentation files (default extension: .md).")]
    Docs(CollectArgs),

    #[command(
        visible_alias = "d",
        about = "Collect files with uncommitted changes, with their diffs."
    )]
    Diff(DiffArgs),

    #[command(about = "Print shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    #[command(flatten)]
    pub project_config: ProjectConfigOpts,

    #[command(flatten)]
    pub output: OutputTargetOpts,

    #[arg(
        short = 'e',
        long = "extension",
        help = "File extension to include (repeatable, e.g. -e .rs -e .toml).",
        value_name = "EXT",
        action = clap::ArgAction::Append,
        help_heading = "Selection"
    )]
    pub extensions: Vec<String>,

    #[arg(
        short = 'y',
        long,
        help = "Include everything without asking.",
        help_heading = "Selection"
    )]
    pub yes: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    #[command(flatten)]
    pub project_config: ProjectConfigOpts,

    #[command(flatten)]
    pub output: OutputTargetOpts,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
}
