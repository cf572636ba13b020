use crate::changes::ChangeOptions;
use crate::error::{AppError, Result};
use crate::gather::CollectOptions;
use crate::ignore_rules::IgnoreRuleSet;
use crate::output_formats::OutputFormat;
use crate::text::UnreadablePolicy;
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".textpack";
pub const DEFAULT_CONFIG_FILENAME: &str = "textpack.toml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CollectConfig {
    /// Overrides the command's default extensions when set.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default = "default_false")]
    pub yes: bool,
    #[serde(default)]
    pub unreadable: UnreadablePolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    #[serde(default = "default_true")]
    pub use_gitignore: bool,
    /// Extra name prefixes added to the built-in rules.
    #[serde(default)]
    pub prefixes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_true")]
    pub json_pretty: bool,
    #[serde(default = "default_false")]
    pub include_timestamp: bool,
    #[serde(default)]
    pub outfile: Option<PathBuf>,
}

/// Which built-in ignore rules a command starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePreset {
    Source,
    Docs,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            extensions: None,
            yes: default_false(),
            unreadable: UnreadablePolicy::default(),
        }
    }
}
impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            use_gitignore: default_true(),
            prefixes: Vec::new(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            json_pretty: default_true(),
            include_timestamp: default_false(),
            outfile: None,
        }
    }
}

impl Config {
    /// Resolves the root to collect from: CLI argument, then `PROJECT_ROOT`,
    /// then the current directory. A missing path is `PathNotFound`.
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        let resolved = path_to_resolve
            .canonicalize()
            .map_err(|_| AppError::PathNotFound {
                path: path_to_resolve.clone(),
            })?;
        if !resolved.is_dir() {
            return Err(AppError::InvalidArgument(format!(
                "'{}' is not a directory",
                resolved.display()
            )));
        }
        Ok(resolved)
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                let path = if path.is_absolute() || path.components().count() > 1 {
                    path
                } else {
                    project_root.join(DEFAULT_CONFIG_DIR).join(path)
                };
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = project_root
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Config>(content).map_err(|e| AppError::TomlParse(e.to_string()))
    }

    pub fn get_effective_title(&self, project_root: &Path) -> String {
        self.general
            .title
            .clone()
            .unwrap_or_else(|| crate::context::default_title(project_root))
    }

    pub fn ignore_rules(&self, preset: RulePreset) -> IgnoreRuleSet {
        let base = match preset {
            RulePreset::Source => IgnoreRuleSet::source_defaults(),
            RulePreset::Docs => IgnoreRuleSet::docs_defaults(),
        };
        base.with_prefixes(self.ignore.prefixes.iter().cloned())
    }

    pub fn collect_options(&self, preset: RulePreset, default_extensions: &[&str]) -> CollectOptions {
        let extensions = match &self.collect.extensions {
            Some(exts) if !exts.is_empty() => exts.clone(),
            _ => default_extensions.iter().map(|s| s.to_string()).collect(),
        };
        CollectOptions {
            extensions,
            rules: self.ignore_rules(preset),
            unreadable: self.collect.unreadable,
            auto_confirm: self.collect.yes,
        }
    }

    pub fn change_options(&self) -> ChangeOptions {
        ChangeOptions {
            rules: self.ignore_rules(RulePreset::Source),
            unreadable: self.collect.unreadable,
            use_gitignore: self.ignore.use_gitignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            [general]
            title = "My Docs"

            [collect]
            extensions = [".md", ".rst"]
            yes = true
            unreadable = "fail"

            [ignore]
            use_gitignore = false
            prefixes = ["drafts"]

            [output]
            format = "json"
            include_timestamp = true
            "#,
        )
        .unwrap();

        assert_eq!(config.general.title.as_deref(), Some("My Docs"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.json_pretty);

        let options = config.collect_options(RulePreset::Docs, &[".md"]);
        assert_eq!(options.extensions, vec![".md", ".rst"]);
        assert!(options.auto_confirm);
        assert_eq!(options.unreadable, UnreadablePolicy::Fail);
        assert!(options.rules.matches_name("drafts"));
        assert!(options.rules.matches_name("LICENSE.md"));
        assert!(!config.change_options().use_gitignore);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        let options = config.collect_options(RulePreset::Source, &[".py"]);
        assert_eq!(options.extensions, vec![".py"]);
        assert!(!options.auto_confirm);
        assert_eq!(options.unreadable, UnreadablePolicy::Skip);
        assert_eq!(config.get_effective_title(Path::new("/x/proj")), "proj");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml("[collect]\nextension = [\".py\"]\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn test_resolve_config_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::resolve_config_path(dir.path(), None, false)
            .unwrap()
            .is_none());

        let config_dir = dir.path().join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(DEFAULT_CONFIG_FILENAME), "").unwrap();
        fs::write(config_dir.join("docs.toml"), "[collect]\nyes = true\n").unwrap();

        let found = Config::resolve_config_path(dir.path(), None, false).unwrap();
        assert_eq!(found, Some(config_dir.join(DEFAULT_CONFIG_FILENAME)));
        assert!(Config::resolve_config_path(dir.path(), None, true)
            .unwrap()
            .is_none());

        let named = Config::resolve_config_path(dir.path(), Some(&"docs.toml".to_string()), false)
            .unwrap()
            .unwrap();
        assert!(Config::load_from_path(&named).unwrap().collect.yes);

        let missing = Config::resolve_config_path(dir.path(), Some(&"nope.toml".to_string()), false);
        assert!(matches!(missing, Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_root_is_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = Config::determine_project_root(Some(&missing)).unwrap_err();
        assert!(matches!(err, AppError::PathNotFound { .. }));
    }
}
