//! Git access for ignore checks and pending-change queries.
//!
//! A `VcsContext` is built once per invocation and handed to whatever needs
//! it. When the root is not inside a repository every query degrades to an
//! empty/false answer instead of failing.

use crate::error::Result;
use git2::{DiffFormat, DiffOptions, Repository, RepositoryOpenFlags};
use log;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Answers whether a path is excluded by version-control ignore rules.
pub trait IgnoreOracle {
    fn is_ignored(&self, path: &Path) -> bool;
}

/// Read-only view of the uncommitted changes in a working tree.
///
/// Paths passed to and returned from these methods are relative to
/// `workdir()`.
pub trait ChangeSource {
    fn workdir(&self) -> Option<&Path>;
    fn modified_paths(&self) -> Result<Vec<PathBuf>>;
    fn prior_blob(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    fn raw_diff(&self, path: &Path) -> Result<String>;
}

/// Oracle used when ignore files should not be consulted at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl IgnoreOracle for NoVcs {
    fn is_ignored(&self, _path: &Path) -> bool {
        false
    }
}

pub struct VcsContext {
    repo: Option<Repository>,
    workdir: Option<PathBuf>,
}

impl std::fmt::Debug for VcsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcsContext")
            .field("workdir", &self.workdir)
            .finish()
    }
}

impl VcsContext {
    pub fn discover(root: &Path) -> Self {
        Self::discover_bounded(root, std::iter::empty::<&Path>())
    }

    /// Like `discover`, but the upward search stops before entering any of
    /// `ceilings`.
    pub fn discover_bounded<I, P>(root: &Path, ceilings: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<OsStr>,
    {
        match Repository::open_ext(root, RepositoryOpenFlags::empty(), ceilings) {
            Ok(repo) => {
                let workdir = repo
                    .workdir()
                    .map(|w| w.canonicalize().unwrap_or_else(|_| w.to_path_buf()));
                if workdir.is_none() {
                    log::debug!("Repository at {} is bare; ignoring it", root.display());
                    return Self::none();
                }
                log::debug!(
                    "Using git repository at {}",
                    workdir.as_deref().unwrap_or(root).display()
                );
                Self {
                    repo: Some(repo),
                    workdir,
                }
            }
            Err(e) => {
                log::debug!("No git repository found for {}: {}", root.display(), e);
                Self::none()
            }
        }
    }

    pub fn none() -> Self {
        Self {
            repo: None,
            workdir: None,
        }
    }

    pub fn has_repository(&self) -> bool {
        self.repo.is_some()
    }

    fn relative_to_workdir(&self, path: &Path) -> Option<PathBuf> {
        let workdir = self.workdir.as_deref()?;
        if path.is_relative() {
            return Some(path.to_path_buf());
        }
        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        absolute.strip_prefix(workdir).ok().map(Path::to_path_buf)
    }
}

impl IgnoreOracle for VcsContext {
    fn is_ignored(&self, path: &Path) -> bool {
        let Some(repo) = self.repo.as_ref() else {
            return false;
        };
        let Some(relative) = self.relative_to_workdir(path) else {
            log::trace!("Path outside repository workdir: {}", path.display());
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        // Git never treats tracked content as ignored.
        match is_tracked(repo, &relative) {
            Ok(true) => return false,
            Ok(false) => {}
            Err(e) => log::warn!("Could not read index for {}: {}", relative.display(), e),
        }
        match repo.is_path_ignored(&relative) {
            Ok(ignored) => ignored,
            Err(e) => {
                log::warn!("Could not check ignore status of {}: {}", relative.display(), e);
                false
            }
        }
    }
}

/// True when `relative` is in the index, or is a directory holding any
/// indexed file.
fn is_tracked(repo: &Repository, relative: &Path) -> Result<bool> {
    let index = repo.index()?;
    if index.get_path(relative, 0).is_some() {
        return Ok(true);
    }
    let mut prefix = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    prefix.push('/');
    Ok(index.iter().any(|entry| entry.path.starts_with(prefix.as_bytes())))
}

impl ChangeSource for VcsContext {
    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    fn modified_paths(&self) -> Result<Vec<PathBuf>> {
        let Some(repo) = self.repo.as_ref() else {
            return Ok(Vec::new());
        };
        let diff = repo.diff_index_to_workdir(None, None)?;
        let paths: Vec<PathBuf> = diff
            .deltas()
            .filter_map(|delta| delta.old_file().path().map(Path::to_path_buf))
            .collect();
        log::debug!("{} path(s) differ between index and working tree", paths.len());
        Ok(paths)
    }

    fn prior_blob(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let Some(repo) = self.repo.as_ref() else {
            return Ok(None);
        };
        let index = repo.index()?;
        let Some(entry) = index.get_path(path, 0) else {
            return Ok(None);
        };
        if entry.id.is_zero() {
            return Ok(None);
        }
        let blob = repo.find_blob(entry.id)?;
        Ok(Some(blob.content().to_vec()))
    }

    fn raw_diff(&self, path: &Path) -> Result<String> {
        let Some(repo) = self.repo.as_ref() else {
            return Ok(String::new());
        };
        let mut opts = DiffOptions::new();
        opts.pathspec(path).disable_pathspec_match(true);
        let diff = repo.diff_index_to_workdir(None, Some(&mut opts))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            // Content/addition/deletion lines carry their marker only in origin().
            if let origin @ ('+' | '-' | ' ') = line.origin() {
                text.push(origin);
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;
        Ok(text)
    }
}
