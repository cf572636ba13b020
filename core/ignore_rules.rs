use crate::vcs::IgnoreOracle;
use log;
use once_cell::sync::Lazy;
use std::path::{Component, Path};

static SOURCE_PREFIXES: Lazy<Vec<String>> = Lazy::new(|| {
    [".", "_", "release/", "venv/", "dist/", "build/", "__pycache__"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

static DOCS_PREFIXES: Lazy<Vec<String>> = Lazy::new(|| {
    [
        ".",
        "_",
        "CONTRIBUTING.md",
        "CODE_OF_CONDUCT.md",
        "SECURITY.md",
        "HISTORY.md",
        "LICENSE.md",
        "release/",
        "tests",
        "venv/",
        "dist/",
        "build/",
        "__pycache__",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// Literal name prefixes that exclude an entry from collection.
///
/// An entry matches a rule when its name starts with the rule, or equals the
/// rule once a trailing `/` is dropped (so `venv/` also covers a directory
/// named `venv`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    prefixes: Vec<String>,
}

impl IgnoreRuleSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Rules for collecting source files.
    pub fn source_defaults() -> Self {
        Self::new(SOURCE_PREFIXES.iter().cloned())
    }

    /// Rules for collecting documentation; also drops boilerplate markdown.
    pub fn docs_defaults() -> Self {
        Self::new(DOCS_PREFIXES.iter().cloned())
    }

    pub fn with_prefixes<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prefix in extra {
            let prefix = prefix.into();
            if !prefix.is_empty() && !self.prefixes.contains(&prefix) {
                self.prefixes.push(prefix);
            }
        }
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.prefixes.iter().any(|rule| {
            name.starts_with(rule.as_str()) || name == rule.trim_end_matches('/')
        })
    }
}

pub struct IgnoreMatcher<'a> {
    rules: &'a IgnoreRuleSet,
    oracle: &'a dyn IgnoreOracle,
}

impl<'a> IgnoreMatcher<'a> {
    pub fn new(rules: &'a IgnoreRuleSet, oracle: &'a dyn IgnoreOracle) -> Self {
        Self { rules, oracle }
    }

    /// `name` is the entry's own file name; `path` is handed to the VCS
    /// oracle.
    pub fn should_ignore(&self, name: &str, path: &Path) -> bool {
        if self.rules.matches_name(name) {
            log::trace!("Ignored by name rule: {}", path.display());
            return true;
        }
        if self.oracle.is_ignored(path) {
            log::trace!("Ignored by VCS rules: {}", path.display());
            return true;
        }
        false
    }

    /// Variant for repository-relative paths: every component must pass the
    /// name rules, matching what a walk from the root would have skipped.
    pub fn should_ignore_relative(&self, path: &Path) -> bool {
        let component_hit = path.components().any(|c| match c {
            Component::Normal(name) => self.rules.matches_name(&name.to_string_lossy()),
            _ => false,
        });
        if component_hit {
            log::trace!("Ignored by name rule: {}", path.display());
            return true;
        }
        self.oracle.is_ignored(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::NoVcs;

    struct DenyAll;
    impl IgnoreOracle for DenyAll {
        fn is_ignored(&self, _path: &Path) -> bool {
            true
        }
    }

    fn ignored(rules: &IgnoreRuleSet, name: &str) -> bool {
        IgnoreMatcher::new(rules, &NoVcs).should_ignore(name, Path::new(name))
    }

    #[test]
    fn test_source_defaults() {
        let rules = IgnoreRuleSet::source_defaults();
        assert!(ignored(&rules, ".git"));
        assert!(ignored(&rules, ".hidden.py"));
        assert!(ignored(&rules, "_private.py"));
        assert!(ignored(&rules, "__pycache__"));
        assert!(ignored(&rules, "venv"));
        assert!(ignored(&rules, "dist"));
        assert!(ignored(&rules, "build"));
        assert!(ignored(&rules, "release"));
        assert!(!ignored(&rules, "builder.py"));
        assert!(!ignored(&rules, "main.py"));
        assert!(!ignored(&rules, "LICENSE.md"));
    }

    #[test]
    fn test_docs_defaults() {
        let rules = IgnoreRuleSet::docs_defaults();
        assert!(ignored(&rules, "LICENSE.md"));
        assert!(ignored(&rules, "CONTRIBUTING.md"));
        assert!(ignored(&rules, "tests"));
        assert!(!ignored(&rules, "README.md"));
        assert!(!ignored(&rules, "guide.md"));
    }

    #[test]
    fn test_oracle_is_consulted() {
        let rules = IgnoreRuleSet::new(Vec::<String>::new());
        let matcher = IgnoreMatcher::new(&rules, &DenyAll);
        assert!(matcher.should_ignore("main.py", Path::new("main.py")));
    }

    #[test]
    fn test_relative_path_checks_every_component() {
        let rules = IgnoreRuleSet::source_defaults();
        let matcher = IgnoreMatcher::new(&rules, &NoVcs);
        assert!(matcher.should_ignore_relative(Path::new("pkg/__pycache__/mod.py")));
        assert!(matcher.should_ignore_relative(Path::new("_vendor/lib.py")));
        assert!(!matcher.should_ignore_relative(Path::new("pkg/mod.py")));
    }

    #[test]
    fn test_with_prefixes_only_adds() {
        let base = IgnoreRuleSet::source_defaults();
        let extended = base.clone().with_prefixes(["docs", "docs"]);
        assert_eq!(extended.prefixes().len(), base.prefixes().len() + 1);
        for name in ["a.py", "docs", ".x", "docs_old"] {
            if ignored(&base, name) {
                assert!(ignored(&extended, name));
            }
        }
        assert!(ignored(&extended, "docs_old"));
    }
}
