use std::collections::BTreeMap;

use super::ConfigError;

/// Named template files, parsed from the `templates` setting.
///
/// The setting is a comma-separated list of `name:file` pairs, e.g.
/// `python:main.py,readme:README.md`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, String>,
}

impl TemplateRegistry {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();

        for entry in raw.split(',') {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            match parts.as_slice() {
                [name, file] if !name.is_empty() && !file.is_empty() => {
                    entries.insert(name.to_string(), file.to_string());
                }
                _ => return Err(ConfigError::MalformedTemplates(entry.trim().to_string())),
            }
        }

        Ok(Self { entries })
    }

    /// File name registered for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
