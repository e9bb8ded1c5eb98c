use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the sidecar file that marks a directory as a project.
pub const DETAILS_FILE: &str = "details.json";

/// Difficulty recorded when none is given at creation.
pub const DEFAULT_DIFFICULTY: &str = "Undefined";

/// Current sidecar schema. Files without a version are treated as `0`.
pub const SCHEMA_VERSION: u32 = 1;

/// Format of `Date Created On`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metadata stored in a project's `details.json`.
///
/// JSON key spellings are fixed by existing files, including `Diffculty`.
/// Keys this struct does not know are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(rename = "Project Name", default)]
    pub name: String,
    /// `YYYY-MM-DD`. Kept as text so hand-edited values survive a rewrite.
    #[serde(rename = "Date Created On", default)]
    pub created_on: String,
    #[serde(rename = "Technologies", default)]
    pub technologies: Vec<String>,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "Diffculty", default)]
    pub difficulty: String,
    #[serde(rename = "Tags", default)]
    pub tags: Vec<String>,
    #[serde(rename = "Schema Version", default)]
    pub schema_version: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectDetails {
    /// A fresh record for a project created on `created_on`.
    pub fn new(name: impl Into<String>, created_on: NaiveDate) -> Self {
        Self {
            name: name.into(),
            created_on: created_on.format(DATE_FORMAT).to_string(),
            technologies: Vec::new(),
            summary: String::new(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            tags: Vec::new(),
            schema_version: SCHEMA_VERSION,
            extra: Map::new(),
        }
    }

    /// Creation date, if the stored text parses.
    pub fn created_on_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.created_on, DATE_FORMAT).ok()
    }

    pub fn add_technologies(&mut self, technologies: impl IntoIterator<Item = String>) {
        merge_unique(&mut self.technologies, technologies);
    }

    pub fn add_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        merge_unique(&mut self.tags, tags);
    }
}

/// Union `additions` into `values`, leaving them de-duplicated and sorted.
/// An empty `additions` leaves `values` untouched.
fn merge_unique(values: &mut Vec<String>, additions: impl IntoIterator<Item = String>) {
    let mut additions = additions.into_iter().peekable();
    if additions.peek().is_none() {
        return;
    }
    let merged: BTreeSet<String> = values.drain(..).chain(additions).collect();
    *values = merged.into_iter().collect();
}

/// Input for creating a new project.
#[derive(Debug, Clone, Default)]
pub struct CreateProjectInput {
    pub name: String,
    pub technologies: Vec<String>,
    pub summary: Option<String>,
    /// Create the project under this directory instead of the configured root.
    pub root: Option<PathBuf>,
    /// Defaults to `Undefined` if not specified.
    pub difficulty: Option<String>,
    pub tags: Vec<String>,
    /// Template names to copy into the new directory.
    pub templates: Vec<String>,
}

impl CreateProjectInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Input for updating an existing project. Lists are merged into the stored
/// ones; `summary` and `difficulty` replace the stored values when present.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    pub name: String,
    pub technologies: Vec<String>,
    /// An empty summary leaves the stored one in place.
    pub summary: Option<String>,
    /// Look the project up under this directory instead of the configured root.
    pub root: Option<PathBuf>,
    pub difficulty: Option<String>,
    pub tags: Vec<String>,
}

impl UpdateProjectInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
