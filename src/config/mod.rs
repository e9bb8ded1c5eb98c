//! Persistent settings: the projects root and the template registry.
//!
//! Settings are kept in an INI file with a single `Settings` section:
//!
//! ```ini
//! [Settings]
//! main_project_directory = /home/me/Projects
//! templates = python:main.py,readme:README.md
//! ```
//!
//! Files written by older tools may name the section `settings` or the
//! registry key `Templates`; both are accepted.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini, ParseOption, Properties, WriteOption};
use thiserror::Error;

pub use templates::TemplateRegistry;

const APP_NAME: &str = "project-ledger";
const CONFIG_FILE: &str = "config.ini";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "PROJECT_LEDGER_CONFIG";

const SECTION: &str = "Settings";
const LEGACY_SECTION: &str = "settings";
const ROOT_KEY: &str = "main_project_directory";
const TEMPLATES_KEYS: [&str; 2] = ["templates", "Templates"];
const TEMPLATES_DIR_KEY: &str = "templates_directory";
const TEMPLATES_DIR: &str = "templates";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no templates are registered in the config file")]
    MissingTemplates,

    #[error("malformed template entry '{0}', expected name:file")]
    MalformedTemplates(String),

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Loaded settings file.
///
/// Reads happen once in [`Config::load_or_init`]; every mutation is persisted
/// immediately.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    ini: Ini,
}

impl Config {
    /// Location of the settings file: `$PROJECT_LEDGER_CONFIG` if set,
    /// otherwise `config.ini` in the platform config directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the settings file at `path`, creating it with a default projects
    /// root if it is missing. A file without the settings section gets one.
    pub fn load_or_init(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();

        if !path.exists() {
            let mut config = Self {
                path,
                ini: Ini::new(),
            };
            config.set_root_path(&default_root())?;
            tracing::info!("Created config file at {}", config.path.display());
            return Ok(config);
        }

        let ini = Ini::load_from_file_opt(&path, parse_options())
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let mut config = Self { path, ini };

        if config.settings().and_then(|s| s.get(ROOT_KEY)).is_none() {
            tracing::info!(
                "Config file {} has no projects root, using default",
                config.path.display()
            );
            config.set_root_path(&default_root())?;
        }

        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory under which projects are created and searched.
    pub fn root_path(&self) -> PathBuf {
        self.settings()
            .and_then(|s| s.get(ROOT_KEY))
            .map(PathBuf::from)
            .unwrap_or_else(default_root)
    }

    /// Replace the projects root and persist the file.
    pub fn set_root_path(&mut self, root: &Path) -> Result<(), ConfigError> {
        let section = self.section_name();
        self.ini
            .with_section(Some(section))
            .set(ROOT_KEY, root.to_string_lossy());
        self.save()
    }

    /// Parse the template registry.
    pub fn templates(&self) -> Result<TemplateRegistry, ConfigError> {
        let raw = self
            .settings()
            .and_then(|s| TEMPLATES_KEYS.iter().find_map(|key| s.get(key)))
            .ok_or(ConfigError::MissingTemplates)?;
        TemplateRegistry::parse(raw)
    }

    /// Directory holding the files named by the template registry.
    pub fn templates_dir(&self) -> PathBuf {
        if let Some(dir) = self.settings().and_then(|s| s.get(TEMPLATES_DIR_KEY)) {
            return PathBuf::from(dir);
        }
        self.path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(TEMPLATES_DIR)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        self.ini
            .write_to_file_opt(&self.path, write_options())
            .map_err(write_err)?;
        tracing::debug!("Saved config file {}", self.path.display());
        Ok(())
    }

    fn section_name(&self) -> &'static str {
        if self.ini.section(Some(SECTION)).is_none()
            && self.ini.section(Some(LEGACY_SECTION)).is_some()
        {
            LEGACY_SECTION
        } else {
            SECTION
        }
    }

    fn settings(&self) -> Option<&Properties> {
        self.ini.section(Some(self.section_name()))
    }
}

/// `~/Projects`, or `./Projects` when there is no home directory.
pub fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Projects")
}

// Windows paths carry backslashes, so no escape processing either way.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

fn write_options() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        ..Default::default()
    }
}
