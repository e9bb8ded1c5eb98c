//! Reading and writing `details.json`.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::RepoError;
use crate::models::{ProjectDetails, SCHEMA_VERSION};

const VERSION_KEY: &str = "Schema Version";

struct Migration {
    version: u32,
    name: &'static str,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "difficulty_key",
    apply: fold_difficulty_key,
}];

/// Older update code stored difficulty under `Difficulty` next to the
/// `Diffculty` key written at creation. The update is the newer value.
fn fold_difficulty_key(object: &mut Map<String, Value>) {
    if let Some(difficulty) = object.remove("Difficulty") {
        object.insert("Diffculty".to_string(), difficulty);
    }
}

/// Bring a raw sidecar object up to [`SCHEMA_VERSION`]. Returns the version
/// it started at.
fn migrate(object: &mut Map<String, Value>) -> u32 {
    let from = object
        .get(VERSION_KEY)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        tracing::debug!(
            "Applying sidecar migration {}: {}",
            migration.version,
            migration.name
        );
        (migration.apply)(object);
        object.insert(VERSION_KEY.to_string(), Value::from(migration.version));
    }

    from
}

/// Read and migrate the sidecar at `path` as a raw JSON object.
///
/// Only keys present in the file (or added by a migration) are in the map.
pub fn read_object(path: &Path) -> Result<Map<String, Value>, RepoError> {
    let content = fs::read_to_string(path).map_err(|e| RepoError::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| RepoError::json(path, e))?;

    let Value::Object(mut object) = value else {
        return Err(RepoError::NotAnObject(path.to_path_buf()));
    };

    let from = migrate(&mut object);
    if from < SCHEMA_VERSION {
        tracing::debug!(
            "Read {} at schema {}, migrated to {}",
            path.display(),
            from,
            SCHEMA_VERSION
        );
    }

    Ok(object)
}

/// Read and migrate the sidecar at `path`.
pub fn read(path: &Path) -> Result<ProjectDetails, RepoError> {
    into_details(path, read_object(path)?)
}

pub fn into_details(path: &Path, object: Map<String, Value>) -> Result<ProjectDetails, RepoError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| RepoError::json(path, e))
}

/// Replace the sidecar at `path` with `details`.
///
/// The record is written to a temporary file beside `path` and renamed over
/// it, so readers never observe a partial file.
pub fn write(path: &Path, details: &ProjectDetails) -> Result<(), RepoError> {
    let dir = path
        .parent()
        .ok_or_else(|| RepoError::io(path, std::io::ErrorKind::InvalidInput.into()))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| RepoError::io(dir, e))?;
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut file, PrettyFormatter::with_indent(b"    "));
    details
        .serialize(&mut serializer)
        .map_err(|e| RepoError::json(path, e))?;

    file.persist(path)
        .map_err(|e| RepoError::io(path, e.error))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
