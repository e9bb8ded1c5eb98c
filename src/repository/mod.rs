//! Project directories and their `details.json` sidecars.
//!
//! Nothing is cached: every operation lists or reads the filesystem afresh.

mod sidecar;
mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::models::*;

pub use templates::{TemplateLibrary, TemplateOutcome, TemplateStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid project name '{0}'")]
    InvalidName(String),

    #[error("project '{name}' already exists at {}", .path.display())]
    AlreadyExists { name: String, path: PathBuf },

    #[error("project directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("details.json not found for project '{0}'")]
    DetailsNotFound(String),

    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("malformed details file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RepoError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A newly created project.
#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub path: PathBuf,
    pub details: ProjectDetails,
    /// One entry per requested template, in request order.
    pub templates: Vec<TemplateOutcome>,
}

/// What [`ProjectRepository::fetch_project`] found.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedDetails {
    Record(ProjectDetails),
    Field(Value),
    KeyNotFound(String),
}

#[derive(Debug)]
pub struct ProjectRepository {
    root: PathBuf,
    templates: Option<TemplateLibrary>,
}

impl ProjectRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            templates: None,
        }
    }

    /// Repository over the configured root, without templates.
    ///
    /// The template registry is not parsed, so a malformed one does not get
    /// in the way of search, update or fetch.
    pub fn open(config: &Config) -> Self {
        Self::new(config.root_path())
    }

    /// Repository over the configured root, with the configured templates.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            templates: TemplateLibrary::from_config(config)?,
            ..Self::open(config)
        })
    }

    pub fn with_templates(mut self, library: TemplateLibrary) -> Self {
        self.templates = Some(library);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templates(&self) -> Option<&TemplateLibrary> {
        self.templates.as_ref()
    }

    // ============================================================
    // Create
    // ============================================================

    /// Create a project directory with a fresh `details.json`.
    ///
    /// A project of the same name under the configured root is rejected even
    /// when `input.root` points elsewhere. An existing directory at the target
    /// is reused and its sidecar overwritten.
    pub fn create_project(&self, input: CreateProjectInput) -> Result<CreatedProject, RepoError> {
        validate_name(&input.name)?;

        let existing = self.root.join(&input.name);
        if existing.exists() {
            return Err(RepoError::AlreadyExists {
                name: input.name,
                path: existing,
            });
        }

        let library = match (&self.templates, input.templates.is_empty()) {
            (_, true) => None,
            (Some(library), false) => Some(library),
            (None, false) => return Err(ConfigError::MissingTemplates.into()),
        };

        let location = input.root.as_deref().unwrap_or(&self.root).join(&input.name);
        fs::create_dir_all(&location).map_err(|e| RepoError::io(&location, e))?;

        let mut details = ProjectDetails::new(&input.name, Local::now().date_naive());
        details.technologies = input.technologies;
        details.summary = input.summary.unwrap_or_default();
        if let Some(difficulty) = input.difficulty {
            details.difficulty = difficulty;
        }
        details.tags = input.tags;

        sidecar::write(&location.join(DETAILS_FILE), &details)?;

        let templates = match library {
            Some(library) => input
                .templates
                .iter()
                .map(|name| {
                    let outcome = library.copy_into(name, &location);
                    if !matches!(outcome.status, TemplateStatus::Copied(_)) {
                        tracing::warn!("{}", outcome);
                    }
                    outcome
                })
                .collect(),
            None => Vec::new(),
        };

        tracing::info!("Created project {} at {}", details.name, location.display());

        Ok(CreatedProject {
            path: location,
            details,
            templates,
        })
    }

    // ============================================================
    // Search
    // ============================================================

    /// Names of the project directories matching `query`, in listing order.
    ///
    /// Directories without `details.json` are not projects and are skipped,
    /// as are sidecars that cannot be read.
    pub fn search_projects(&self, query: &SearchQuery) -> Result<SearchResults, RepoError> {
        let root = query.root.as_deref().unwrap_or(&self.root);
        let entries = fs::read_dir(root).map_err(|e| RepoError::io(root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RepoError::io(root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!("Skipping non UTF-8 directory {}", path.display());
                continue;
            };

            let details_path = path.join(DETAILS_FILE);
            if !details_path.is_file() {
                continue;
            }

            let details = match sidecar::read(&details_path) {
                Ok(details) => details,
                Err(e) => {
                    tracing::warn!("Skipping project {}: {}", name, e);
                    continue;
                }
            };

            if query.matches(&name, &details) {
                names.push(name);
            }
        }

        tracing::debug!(
            "Search in {} matched {} project(s)",
            root.display(),
            names.len()
        );
        Ok(SearchResults::new(names))
    }

    // ============================================================
    // Update
    // ============================================================

    /// Merge `input` into a project's stored details and write them back.
    pub fn update_project(&self, input: UpdateProjectInput) -> Result<ProjectDetails, RepoError> {
        validate_name(&input.name)?;

        let dir = input.root.as_deref().unwrap_or(&self.root).join(&input.name);
        if !dir.is_dir() {
            return Err(RepoError::DirectoryNotFound(input.name));
        }

        let path = dir.join(DETAILS_FILE);
        if !path.is_file() {
            return Err(RepoError::DetailsNotFound(input.name));
        }

        let mut details = sidecar::read(&path)?;
        details.add_technologies(input.technologies);
        details.add_tags(input.tags);
        if let Some(summary) = input.summary.filter(|s| !s.is_empty()) {
            details.summary = summary;
        }
        if let Some(difficulty) = input.difficulty.filter(|s| !s.is_empty()) {
            details.difficulty = difficulty;
        }
        details.schema_version = SCHEMA_VERSION;

        sidecar::write(&path, &details)?;
        tracing::info!("Updated project {}", input.name);

        Ok(details)
    }

    // ============================================================
    // Fetch
    // ============================================================

    /// A project's details, or the single field named `key`.
    ///
    /// Keys are the sidecar's JSON keys, e.g. `Summary` or `Date Created On`.
    /// A key absent from the file is not found, even one with a default.
    pub fn fetch_project(&self, name: &str, key: Option<&str>) -> Result<FetchedDetails, RepoError> {
        validate_name(name)?;

        let path = self.root.join(name).join(DETAILS_FILE);
        if !path.is_file() {
            return Err(RepoError::DetailsNotFound(name.to_string()));
        }

        let mut object = sidecar::read_object(&path)?;

        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Ok(FetchedDetails::Record(sidecar::into_details(&path, object)?));
        };

        Ok(match object.remove(key) {
            Some(field) => FetchedDetails::Field(field),
            None => FetchedDetails::KeyNotFound(key.to_string()),
        })
    }
}

/// Project names are single path components.
fn validate_name(name: &str) -> Result<(), RepoError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);

    if invalid {
        return Err(RepoError::InvalidName(name.to_string()));
    }
    Ok(())
}
