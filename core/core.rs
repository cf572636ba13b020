pub mod changes;
pub mod config;
pub mod confirm;
pub mod context;
pub mod diff;
pub mod error;
pub mod gather;
pub mod ignore_rules;
pub mod output_formats;
pub mod text;
pub mod tree;
pub mod vcs;

pub use changes::{
    ChangeOptions, FileChangeRecord, collect_changes, collect_context_changes, collect_repo_changes,
};
pub use config::{Config, RulePreset};
pub use confirm::{AutoConfirm, ConfirmSource, InteractionPolicy, TerminalPrompt};
pub use context::{ChangeReport, Document};
pub use diff::{DiffSection, segment};
pub use error::{AppError, Result};
pub use gather::{CollectOptions, Collector, collect_file_tree};
pub use ignore_rules::{IgnoreMatcher, IgnoreRuleSet};
pub use output_formats::{OutputFormat, render_changes, render_document};
pub use text::{TextProbe, UnreadablePolicy};
pub use tree::{FileTree, FlatFileRecord, TreeEntry, flatten};
pub use vcs::{ChangeSource, IgnoreOracle, NoVcs, VcsContext};
