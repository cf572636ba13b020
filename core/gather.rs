use crate::confirm::{ConfirmSource, InteractionPolicy};
use crate::error::{AppError, Result};
use crate::ignore_rules::{IgnoreMatcher, IgnoreRuleSet};
use crate::text::{self, TextProbe, UnreadablePolicy};
use crate::tree::{self, FileTree, FlatFileRecord, TreeEntry};
use crate::vcs::IgnoreOracle;
use log;
use std::path::Path;
use walkdir::WalkDir;

/// Everything a collection run needs besides the confirmation source and the
/// VCS oracle.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Suffixes such as `.py`; a file is a candidate when its name ends with
    /// any of them.
    pub extensions: Vec<String>,
    pub rules: IgnoreRuleSet,
    pub unreadable: UnreadablePolicy,
    /// Answer yes to every prompt without asking.
    pub auto_confirm: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".py".to_string()],
            rules: IgnoreRuleSet::source_defaults(),
            unreadable: UnreadablePolicy::default(),
            auto_confirm: false,
        }
    }
}

pub struct Collector<'a> {
    base: &'a Path,
    extensions: &'a [String],
    matcher: &'a IgnoreMatcher<'a>,
    policy: &'a InteractionPolicy<'a>,
    unreadable: UnreadablePolicy,
}

impl<'a> Collector<'a> {
    pub fn new(
        base: &'a Path,
        extensions: &'a [String],
        matcher: &'a IgnoreMatcher<'a>,
        policy: &'a InteractionPolicy<'a>,
        unreadable: UnreadablePolicy,
    ) -> Self {
        Self {
            base,
            extensions,
            matcher,
            policy,
            unreadable,
        }
    }

    /// Walks `root` one level at a time, in file-name order.
    ///
    /// `blanket` is this branch's accept-everything flag. Escalating inside a
    /// folder only changes the value handed to that folder's recursive call.
    pub fn collect(&self, root: &Path, blanket: bool) -> Result<FileTree> {
        let mut result = FileTree::new();

        let listing = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in listing {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.unreadable.handle_error(e.into())?;
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if self.matcher.should_ignore(&name, path) {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                let prompt = format!("📁 {}?", self.display_relative(path));
                if !self.policy.confirm(&prompt, blanket)? {
                    log::debug!("Folder declined: {}", path.display());
                    continue;
                }
                let subtree_blanket = self.policy.escalate(blanket)?;
                let children = self.collect(path, subtree_blanket)?;
                log::trace!("Folder {} yielded {} entries", name, children.len());
                result.insert(name, TreeEntry::Dir(children));
            } else if file_type.is_file() && self.matches_extension(&name) {
                let prompt = format!("\t📄 {}?", name);
                if !self.policy.confirm(&prompt, blanket)? {
                    log::debug!("File declined: {}", path.display());
                    continue;
                }
                match text::probe_text(path) {
                    Ok(TextProbe::Text(content)) => {
                        log::trace!("Collected {} ({} bytes)", path.display(), content.len());
                        result.insert(name, TreeEntry::File(content));
                    }
                    Ok(TextProbe::Binary) => self.unreadable.handle(path)?,
                    Err(e) => self.unreadable.handle_error(e)?,
                }
            }
        }

        Ok(result)
    }

    fn matches_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn display_relative(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, self.base)
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .into_owned()
    }
}

/// Collects and flattens every selected file under `root`.
///
/// Fails with `PathNotFound` when `root` is not a directory and with
/// `EmptyResult` when nothing was selected, so callers can refuse to write an
/// empty artifact.
pub fn collect_file_tree(
    root: &Path,
    options: &CollectOptions,
    confirmer: &dyn ConfirmSource,
    oracle: &dyn IgnoreOracle,
) -> Result<Vec<FlatFileRecord>> {
    if !root.is_dir() {
        return Err(AppError::PathNotFound {
            path: root.to_path_buf(),
        });
    }
    if options.extensions.is_empty() {
        return Err(AppError::InvalidArgument(
            "At least one file extension is required.".to_string(),
        ));
    }
    log::info!(
        "Collecting {:?} files under {}",
        options.extensions,
        root.display()
    );

    let matcher = IgnoreMatcher::new(&options.rules, oracle);
    let policy = InteractionPolicy::new(confirmer, options.auto_confirm);
    let collector = Collector::new(
        root,
        &options.extensions,
        &matcher,
        &policy,
        options.unreadable,
    );

    let file_tree = collector.collect(root, false)?;
    let records = tree::flatten(&file_tree);
    log::info!("Collected {} file(s).", records.len());

    if records.is_empty() {
        return Err(AppError::EmptyResult {
            root: root.to_path_buf(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AutoConfirm;
    use crate::vcs::NoVcs;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn auto_options(extensions: &[&str]) -> CollectOptions {
        CollectOptions {
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            auto_confirm: true,
            ..CollectOptions::default()
        }
    }

    fn names(records: &[FlatFileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_keeps_empty_folders_in_tree() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", b"a");
        write(dir.path(), "docs/readme.txt", b"nope");

        let rules = IgnoreRuleSet::source_defaults();
        let matcher = IgnoreMatcher::new(&rules, &NoVcs);
        let policy = InteractionPolicy::new(&AutoConfirm, true);
        let extensions = vec![".py".to_string()];
        let collector = Collector::new(
            dir.path(),
            &extensions,
            &matcher,
            &policy,
            UnreadablePolicy::Skip,
        );

        let tree = collector.collect(dir.path(), false).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("docs"), Some(&TreeEntry::Dir(FileTree::new())));
        assert_eq!(tree.get("a.py"), Some(&TreeEntry::File("a".to_string())));
    }

    #[test]
    fn test_multiple_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", b"a");
        write(dir.path(), "b.md", b"b");
        write(dir.path(), "c.rs", b"c");

        let records =
            collect_file_tree(dir.path(), &auto_options(&[".py", ".md"]), &AutoConfirm, &NoVcs)
                .unwrap();
        assert_eq!(names(&records), vec!["a.py", "b.md"]);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_file_tree(
            &dir.path().join("nope"),
            &auto_options(&[".py"]),
            &AutoConfirm,
            &NoVcs,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::PathNotFound { .. }));
    }

    #[test]
    fn test_nothing_matched_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", b"x");
        let err = collect_file_tree(dir.path(), &auto_options(&[".py"]), &AutoConfirm, &NoVcs)
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyResult { .. }));
    }

    #[test]
    fn test_binary_file_policy() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", b"print()");
        write(dir.path(), "blob.py", &[0xff, 0xfe, 0xfd]);

        let records =
            collect_file_tree(dir.path(), &auto_options(&[".py"]), &AutoConfirm, &NoVcs).unwrap();
        assert_eq!(names(&records), vec!["a.py"]);

        let strict = CollectOptions {
            unreadable: UnreadablePolicy::Fail,
            ..auto_options(&[".py"])
        };
        let err = collect_file_tree(dir.path(), &strict, &AutoConfirm, &NoVcs).unwrap_err();
        assert!(matches!(err, AppError::UnreadableFile { .. }));
    }

    #[test]
    fn test_unlistable_folder_follows_policy() {
        let dir = tempfile::tempdir().unwrap();
        let rules = IgnoreRuleSet::source_defaults();
        let matcher = IgnoreMatcher::new(&rules, &NoVcs);
        let policy = InteractionPolicy::new(&AutoConfirm, true);
        let extensions = vec![".py".to_string()];
        // A folder removed between listing its parent and descending into it.
        let vanished = dir.path().join("vanished");

        let lenient = Collector::new(
            dir.path(),
            &extensions,
            &matcher,
            &policy,
            UnreadablePolicy::Skip,
        );
        assert!(lenient.collect(&vanished, false).unwrap().is_empty());

        let strict = Collector::new(
            dir.path(),
            &extensions,
            &matcher,
            &policy,
            UnreadablePolicy::Fail,
        );
        let err = strict.collect(&vanished, false).unwrap_err();
        assert!(matches!(err, AppError::WalkDir(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_locked_folder_does_not_abort_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", b"a");
        write(dir.path(), "locked/b.py", b"b");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users read through mode bits; nothing to check then.
        let enforced = fs::read_dir(&locked).is_err();

        let result = collect_file_tree(dir.path(), &auto_options(&[".py"]), &AutoConfirm, &NoVcs);
        let strict = CollectOptions {
            unreadable: UnreadablePolicy::Fail,
            ..auto_options(&[".py"])
        };
        let strict_result = collect_file_tree(dir.path(), &strict, &AutoConfirm, &NoVcs);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert_eq!(names(&result.unwrap()), vec!["a.py"]);
            assert!(matches!(strict_result, Err(AppError::WalkDir(_))));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "real/a.py", b"a");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real/a.py"), dir.path().join("b.py"))
            .unwrap();

        let records =
            collect_file_tree(dir.path(), &auto_options(&[".py"]), &AutoConfirm, &NoVcs).unwrap();
        assert_eq!(names(&records), vec!["real/a.py"]);
    }
}
