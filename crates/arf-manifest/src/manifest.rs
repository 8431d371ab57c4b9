use crate::backup::write_with_backup;
use crate::errors::ManifestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// The framework's `plugins.json`: registered bundle paths relative to the
/// framework root, plus whatever other top-level keys the file carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    #[serde(default)]
    pub plugins: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginManifest {
    /// A fresh manifest with the standard header keys.
    pub fn new_default() -> Self {
        let year = chrono::Local::now().format("%Y");
        let mut extra = Map::new();
        extra.insert(
            "_comment".to_string(),
            Value::String(format!(
                "Copyright (c) {} {{author_name}} - Licensed under the MIT License. See LICENSE file for details.",
                year
            )),
        );
        extra.insert("version".to_string(), Value::String("1.0.0".to_string()));
        extra.insert(
            "description".to_string(),
            Value::String("Manifest of available agentic-rules plugins".to_string()),
        );
        Self {
            plugins: Vec::new(),
            extra,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| ManifestError::parse(path, e))?;
        debug!(
            "Loaded manifest {} with {} plugins",
            path.display(),
            manifest.plugins.len()
        );
        Ok(manifest)
    }

    /// Load the manifest, or start a new one when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ManifestError> {
        match Self::load_from_path(path) {
            Err(ManifestError::NotFound(_)) => Ok(Self::new_default()),
            other => other,
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ManifestError> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        write_with_backup(path, &content)?;
        debug!("Manifest written to {}", path.display());
        Ok(())
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.plugins.iter().any(|p| p == entry)
    }

    /// Register an entry. The list is kept sorted and free of duplicates.
    /// Returns false if the entry was already present.
    pub fn add_plugin(&mut self, entry: &str) -> bool {
        let added = !self.contains(entry);
        if added {
            self.plugins.push(entry.to_string());
        }
        self.plugins.sort();
        self.plugins.dedup();
        added
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_plugin_sorted_and_deduplicated() {
        let mut manifest = PluginManifest::default();
        assert!(manifest.add_plugin("modules/zeta"));
        assert!(manifest.add_plugin("modules/alpha"));
        assert!(!manifest.add_plugin("modules/zeta"));
        assert_eq!(manifest.plugins, vec!["modules/alpha", "modules/zeta"]);
    }

    #[test]
    fn test_unknown_keys_survive_rewrite() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("plugins.json");
        fs::write(
            &path,
            r#"{"_comment": "keep me", "version": "2.0", "plugins": ["memory-rules"], "owner": {"team": "x"}}"#,
        )?;

        let mut manifest = PluginManifest::load_from_path(&path)?;
        manifest.add_plugin("modules/new-one");
        manifest.save_to_path(&path)?;

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(raw["_comment"], "keep me");
        assert_eq!(raw["version"], "2.0");
        assert_eq!(raw["owner"]["team"], "x");
        assert_eq!(
            raw["plugins"],
            serde_json::json!(["memory-rules", "modules/new-one"])
        );
        assert!(dir.path().join("plugins.json.backup").exists());
        Ok(())
    }

    #[test]
    fn test_missing_manifest_reports_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("plugins.json");
        assert!(matches!(
            PluginManifest::load_from_path(&path),
            Err(ManifestError::NotFound(_))
        ));

        let fresh = PluginManifest::load_or_default(&path)?;
        assert!(fresh.is_empty());
        assert_eq!(fresh.extra["version"], "1.0.0");
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("plugins.json");
        fs::write(&path, "{ plugins: ")?;
        assert!(matches!(
            PluginManifest::load_or_default(&path),
            Err(ManifestError::Parse { .. })
        ));
        Ok(())
    }
}
