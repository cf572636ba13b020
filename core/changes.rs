use crate::diff::{self, DiffSection};
use crate::error::Result;
use crate::ignore_rules::{IgnoreMatcher, IgnoreRuleSet};
use crate::text::{self, TextProbe, UnreadablePolicy};
use crate::vcs::{ChangeSource, IgnoreOracle, NoVcs, VcsContext};
use indexmap::IndexMap;
use log;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChangeRecord {
    pub path: String,
    /// Content before the change (the index version), not the working tree.
    pub full_file: String,
    pub diff_sections: Vec<DiffSection>,
}

#[derive(Debug, Clone)]
pub struct ChangeOptions {
    pub rules: IgnoreRuleSet,
    pub unreadable: UnreadablePolicy,
    pub use_gitignore: bool,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            rules: IgnoreRuleSet::source_defaults(),
            unreadable: UnreadablePolicy::default(),
            use_gitignore: true,
        }
    }
}

/// Builds one record per modified, non-ignored, text file reported by
/// `source`, keyed by its '/'-joined repository path.
pub fn collect_changes(
    source: &dyn ChangeSource,
    matcher: &IgnoreMatcher<'_>,
    unreadable: UnreadablePolicy,
) -> Result<IndexMap<String, FileChangeRecord>> {
    let mut changes = IndexMap::new();
    let Some(workdir) = source.workdir() else {
        log::debug!("No working tree available; no changes to collect.");
        return Ok(changes);
    };

    for rel_path in source.modified_paths()? {
        let key = to_key(&rel_path);

        if matcher.should_ignore_relative(&rel_path) {
            log::debug!("Skipping ignored change: {}", key);
            continue;
        }

        let Some(prior) = source.prior_blob(&rel_path)? else {
            log::debug!("Skipping change without prior version: {}", key);
            continue;
        };

        let on_disk = workdir.join(&rel_path);
        if !on_disk.exists() {
            log::debug!("Skipping change with no working-tree file: {}", key);
            continue;
        }
        match text::probe_text(&on_disk) {
            Ok(TextProbe::Text(_)) => {}
            Ok(TextProbe::Binary) => {
                unreadable.handle(&on_disk)?;
                continue;
            }
            Err(e) => {
                unreadable.handle_error(e)?;
                continue;
            }
        }
        let full_file = match text::probe_bytes(prior) {
            TextProbe::Text(content) => content,
            TextProbe::Binary => {
                unreadable.handle(&on_disk)?;
                continue;
            }
        };

        let diff_text = source.raw_diff(&rel_path)?;
        let diff_sections = diff::segment(&diff_text);
        log::trace!("{}: {} diff section(s)", key, diff_sections.len());

        changes.insert(
            key.clone(),
            FileChangeRecord {
                path: key,
                full_file,
                diff_sections,
            },
        );
    }

    log::info!("Collected {} changed file(s).", changes.len());
    Ok(changes)
}

/// Opens the repository containing `root` (if any) and collects its pending
/// changes. Outside a repository this returns an empty mapping.
pub fn collect_repo_changes(
    root: &Path,
    options: &ChangeOptions,
) -> Result<IndexMap<String, FileChangeRecord>> {
    let vcs = VcsContext::discover(root);
    if !vcs.has_repository() {
        log::info!("{} is not inside a git repository.", root.display());
    }
    collect_context_changes(&vcs, options)
}

/// Same as `collect_repo_changes` for an already opened context.
pub fn collect_context_changes(
    vcs: &VcsContext,
    options: &ChangeOptions,
) -> Result<IndexMap<String, FileChangeRecord>> {
    if !vcs.has_repository() {
        return Ok(IndexMap::new());
    }
    let oracle: &dyn IgnoreOracle = if options.use_gitignore { vcs } else { &NoVcs };
    let matcher = IgnoreMatcher::new(&options.rules, oracle);
    collect_changes(vcs, &matcher, options.unreadable)
}

fn to_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
