//! # Msctl Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads `msctl.toml`, the project configuration that says where the env
//! files live, where the framework descriptor and module directories are, and
//! which modules exist (the module registry). The directory containing
//! `msctl.toml` is the project root; relative paths resolve against it.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project `msctl.toml`, from `--project <DIR>` / `MSCTL_PROJECT_DIR`, or
//!    the nearest one in the current directory or its ancestors (the search
//!    stops at a directory containing `.git`).
//! 2. User `~/.config/msctl/config.toml` (platform equivalent elsewhere).
//! 3. Default values defined in the code.
//!
//! A `[files]` value from the project wins whenever it differs from the
//! built-in default. The project's `[[modules]]` list replaces the user's
//! when it is non-empty.
//!
//! ## Example
//!
//! ```toml
//! [files]
//! env_file = ".env"
//! example_file = ".env.example"
//! state_file = ".msctl/enabled.json"
//! framework_descriptor = "settings.json"
//! modules_dir = "microservices"
//!
//! [[modules]]
//! name = "auth"
//! key = "auth"
//! settings_file = "settings.json"
//!
//! [[modules]]
//! name = "health"
//! key = "health"   # no settings_file: declares no variables
//! ```
//!
use crate::core::error::{MsctlError, Result};
use crate::engine::pipeline::{Project, ProjectLayout};
use crate::engine::registry::{ModuleDescriptor, Registry};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::{env, fs};
use tracing::{debug, info, warn};

pub const PROJECT_CONFIG_FILENAME: &str = "msctl.toml";

/// Top-level structure of `msctl.toml` and of the user config file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
    /// The module registry.
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
}

/// Locations of the files msctl reads and writes. Relative to the project root
/// unless absolute; `~` is expanded.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Primary runtime env file.
    #[serde(default = "default_env_file")]
    pub env_file: String,
    /// Generated example env file.
    #[serde(default = "default_example_file")]
    pub example_file: String,
    /// Persisted enabled-module list.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// The framework (base layer) descriptor.
    #[serde(default = "default_framework_descriptor")]
    pub framework_descriptor: String,
    /// Directory holding one sub-directory per module key.
    #[serde(default = "default_modules_dir")]
    pub modules_dir: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            example_file: default_example_file(),
            state_file: default_state_file(),
            framework_descriptor: default_framework_descriptor(),
            modules_dir: default_modules_dir(),
        }
    }
}

fn default_env_file() -> String {
    ".env".to_string()
}
fn default_example_file() -> String {
    ".env.example".to_string()
}
fn default_state_file() -> String {
    ".msctl/enabled.json".to_string()
}
fn default_framework_descriptor() -> String {
    "settings.json".to_string()
}
fn default_modules_dir() -> String {
    "microservices".to_string()
}

/// Loads, merges and validates configuration, and resolves it into a `Project`.
///
/// `project_dir` comes from `--project` / `MSCTL_PROJECT_DIR`; without it the
/// current directory and its ancestors are searched.
///
/// # Errors
///
/// Returns an `Err` if no `msctl.toml` can be found, if either config file
/// cannot be read or parsed, or if the merged configuration is invalid.
pub fn load_project(project_dir: Option<&Path>) -> Result<Project> {
    let config_path = locate_project_config(project_dir)?;
    let user_config = load_user_config()?;
    load_project_from(&config_path, user_config)
}

/// Path of the project's `msctl.toml`.
fn locate_project_config(project_dir: Option<&Path>) -> Result<PathBuf> {
    match project_dir {
        Some(dir) => {
            let path = dir.join(PROJECT_CONFIG_FILENAME);
            if !path.is_file() {
                return Err(anyhow!(MsctlError::Config(format!(
                    "No {} found in project directory '{}'.",
                    PROJECT_CONFIG_FILENAME,
                    dir.display()
                ))));
            }
            Ok(path)
        }
        None => {
            let current_dir = env::current_dir().context("Failed to get current directory")?;
            find_project_config_from(&current_dir).ok_or_else(|| {
                anyhow!(MsctlError::Config(format!(
                    "No {} found in '{}' or any parent directory. Use --project to point at the project root.",
                    PROJECT_CONFIG_FILENAME,
                    current_dir.display()
                )))
            })
        }
    }
}

/// Builds the project rooted at `config_path`'s directory, layering the
/// project config over `user_config`.
fn load_project_from(config_path: &Path, user_config: Option<Config>) -> Result<Project> {
    let root = config_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Project config path has no parent directory"))?;

    info!("Loading project configuration from: {}", config_path.display());
    let project_config = load_config_from_path(config_path)?;
    // Project values override user values, which override defaults.
    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(build_project(merged, &root))
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("com", "Msctl", "msctl") else {
        warn!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!("User configuration file not found at {}", config_path.display());
        Ok(None)
    }
}

/// Walks up from `start` looking for `msctl.toml`, stopping at a `.git` directory.
fn find_project_config_from(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                dir.display()
            );
            return None;
        }
    }
    None
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Config) -> Config {
    let defaults = FilesConfig::default();
    let pick = |project: String, user: String, default: &str| {
        if project != default {
            project
        } else {
            user
        }
    };
    Config {
        files: FilesConfig {
            env_file: pick(project.files.env_file, user.files.env_file, &defaults.env_file),
            example_file: pick(
                project.files.example_file,
                user.files.example_file,
                &defaults.example_file,
            ),
            state_file: pick(
                project.files.state_file,
                user.files.state_file,
                &defaults.state_file,
            ),
            framework_descriptor: pick(
                project.files.framework_descriptor,
                user.files.framework_descriptor,
                &defaults.framework_descriptor,
            ),
            modules_dir: pick(
                project.files.modules_dir,
                user.files.modules_dir,
                &defaults.modules_dir,
            ),
        },
        modules: if !project.modules.is_empty() {
            project.modules
        } else {
            user.modules
        },
    }
}

fn validate_config(config: &Config) -> Result<()> {
    let files = &config.files;
    for (field, value) in [
        ("env_file", &files.env_file),
        ("example_file", &files.example_file),
        ("state_file", &files.state_file),
        ("framework_descriptor", &files.framework_descriptor),
        ("modules_dir", &files.modules_dir),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!(MsctlError::Config(format!(
                "files.{} cannot be empty.",
                field
            ))));
        }
    }
    if files.env_file == files.example_file {
        return Err(anyhow!(MsctlError::Config(format!(
            "files.env_file and files.example_file must differ (both '{}').",
            files.env_file
        ))));
    }

    let mut seen = HashSet::new();
    for module in &config.modules {
        if module.name.trim().is_empty() {
            return Err(anyhow!(MsctlError::Config(
                "Module entries must have a non-empty name.".to_string()
            )));
        }
        if !seen.insert(module.name.as_str()) {
            return Err(anyhow!(MsctlError::Config(format!(
                "Module '{}' is declared more than once.",
                module.name
            ))));
        }
        let key = Path::new(&module.key);
        if module.key.trim().is_empty()
            || key.is_absolute()
            || key.components().any(|c| c == Component::ParentDir)
        {
            return Err(anyhow!(MsctlError::Config(format!(
                "Module '{}' has an invalid key '{}': expected a relative directory name.",
                module.name, module.key
            ))));
        }
        if module
            .settings_file
            .as_ref()
            .is_some_and(|f| f.trim().is_empty())
        {
            return Err(anyhow!(MsctlError::Config(format!(
                "Module '{}' has an empty settings_file; omit the field instead.",
                module.name
            ))));
        }
    }
    debug!("Configuration validation successful.");
    Ok(())
}

/// Expands `~` and anchors relative paths at the project root.
fn resolve_path(root: &Path, value: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(value).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

fn build_project(config: Config, root: &Path) -> Project {
    let files = &config.files;
    let layout = ProjectLayout {
        root: root.to_path_buf(),
        env_file: resolve_path(root, &files.env_file),
        example_file: resolve_path(root, &files.example_file),
        state_file: resolve_path(root, &files.state_file),
        base_descriptor: resolve_path(root, &files.framework_descriptor),
    };
    let modules_dir = resolve_path(root, &files.modules_dir);
    debug!("Resolved project layout: {:?}", layout);
    Project {
        layout,
        registry: Registry::new(modules_dir, config.modules),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn module(name: &str, key: &str) -> ModuleDescriptor {
        ModuleDescriptor {
            name: name.to_string(),
            key: key.to_string(),
            settings_file: Some("settings.json".to_string()),
        }
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [files]
            env_file = "config/.env"
            modules_dir = "services"

            [[modules]]
            name = "auth"
            key = "auth-service"
            settings_file = "settings.json"

            [[modules]]
            name = "health"
            key = "health"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.files.env_file, "config/.env");
        assert_eq!(config.files.modules_dir, "services");
        assert_eq!(config.files.example_file, default_example_file()); // Default
        assert_eq!(config.modules.len(), 2);
        assert_eq!(config.modules[0].key, "auth-service");
        assert_eq!(config.modules[1].settings_file, None);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[files]\nenv = \".env\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_non_default_project_values() {
        let user = Config {
            files: FilesConfig {
                state_file: "~/.msctl-state.json".into(),
                env_file: ".env.user".into(),
                ..Default::default()
            },
            modules: vec![module("user-only", "user-only")],
        };
        let project = Config {
            files: FilesConfig {
                env_file: ".env.local".into(),
                ..Default::default()
            },
            modules: vec![],
        };
        let merged = merge_configs(user, project);
        assert_eq!(merged.files.env_file, ".env.local");
        assert_eq!(merged.files.state_file, "~/.msctl-state.json");
        assert_eq!(merged.files.example_file, default_example_file());
        assert_eq!(merged.modules[0].name, "user-only");
    }

    #[test]
    fn test_resolve_path_expansion() {
        let root = Path::new("/work/app");
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(resolve_path(root, ".env"), PathBuf::from("/work/app/.env"));
        assert_eq!(resolve_path(root, "/etc/app.env"), PathBuf::from("/etc/app.env"));
        assert_eq!(resolve_path(root, "~/state.json"), home_dir.join("state.json"));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let config = Config {
            modules: vec![module("auth", "a"), module("auth", "b")],
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("declared more than once"));
    }

    #[test]
    fn test_validate_rejects_escaping_key() {
        let config = Config {
            modules: vec![module("auth", "../outside")],
            ..Default::default()
        };
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("invalid key"));
    }

    #[test]
    fn test_validate_rejects_same_env_and_example_file() {
        let config = Config {
            files: FilesConfig {
                example_file: ".env".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let nested = temp_dir.path().join("microservices/auth/src");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(
            find_project_config_from(&nested),
            Some(temp_dir.path().join(PROJECT_CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        assert_eq!(find_project_config_from(&repo), None);
    }

    #[test]
    fn test_load_project_resolves_layout() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[[modules]]\nname = \"auth\"\nkey = \"auth\"\nsettings_file = \"settings.json\"\n",
        )
        .unwrap();
        let project =
            load_project_from(&temp_dir.path().join(PROJECT_CONFIG_FILENAME), None).unwrap();
        assert_eq!(project.layout.root, temp_dir.path());
        assert_eq!(project.layout.env_file, temp_dir.path().join(".env"));
        assert_eq!(
            project.layout.state_file,
            temp_dir.path().join(".msctl/enabled.json")
        );
        assert_eq!(
            project.registry.modules_dir(),
            temp_dir.path().join("microservices")
        );
        assert!(project.registry.contains("auth"));
    }

    #[test]
    fn test_load_project_layers_user_files_under_project() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join(PROJECT_CONFIG_FILENAME);
        fs::write(&config_path, "[files]\nexample_file = \"env.sample\"\n").unwrap();
        let user = Config {
            files: FilesConfig {
                env_file: ".env.local".to_string(),
                example_file: "user.sample".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let project = load_project_from(&config_path, Some(user)).unwrap();
        assert_eq!(project.layout.env_file, temp_dir.path().join(".env.local"));
        assert_eq!(project.layout.example_file, temp_dir.path().join("env.sample"));
    }

    #[test]
    fn test_load_project_missing_config() {
        let temp_dir = tempdir().unwrap();
        let err = locate_project_config(Some(temp_dir.path())).unwrap_err();
        assert!(err.to_string().contains("No msctl.toml found"));
    }
}
