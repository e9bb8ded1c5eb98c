use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError, TemplateRegistry};

/// Template files available for copying into new projects.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    dir: PathBuf,
    registry: TemplateRegistry,
}

/// Result of copying one requested template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateStatus {
    /// Copied to this path.
    Copied(PathBuf),
    /// Not in the registry.
    Unknown,
    /// Registered, but the copy failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOutcome {
    pub name: String,
    pub status: TemplateStatus,
}

impl fmt::Display for TemplateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            TemplateStatus::Copied(_) => write!(f, "{} template successfully created", self.name),
            TemplateStatus::Unknown => write!(
                f,
                "Template '{}' does not exist in the configuration",
                self.name
            ),
            TemplateStatus::Failed(reason) => {
                write!(f, "Template '{}' could not be copied: {}", self.name, reason)
            }
        }
    }
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>, registry: TemplateRegistry) -> Self {
        Self {
            dir: dir.into(),
            registry,
        }
    }

    /// The library described by `config`, or `None` if it registers no
    /// templates. A malformed registry is an error.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ConfigError> {
        match config.templates() {
            Ok(registry) => Ok(Some(Self::new(config.templates_dir(), registry))),
            Err(ConfigError::MissingTemplates) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Copy template `name` into `dest_dir`, keeping its file name.
    pub fn copy_into(&self, name: &str, dest_dir: &Path) -> TemplateOutcome {
        let status = match self.registry.get(name) {
            None => TemplateStatus::Unknown,
            Some(file) => self.copy_file(file, dest_dir),
        };
        TemplateOutcome {
            name: name.to_string(),
            status,
        }
    }

    fn copy_file(&self, file: &str, dest_dir: &Path) -> TemplateStatus {
        let source = self.dir.join(file);
        let Some(file_name) = source.file_name() else {
            return TemplateStatus::Failed(format!("'{}' is not a file name", file));
        };
        let target = dest_dir.join(file_name);

        match fs::copy(&source, &target) {
            Ok(_) => TemplateStatus::Copied(target),
            Err(e) => TemplateStatus::Failed(format!("{}: {}", source.display(), e)),
        }
    }
}
