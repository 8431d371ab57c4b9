//! Runtime defaults of a bundle (`settings.json`) and dotted-key updates.

use crate::backup::write_with_backup;
use crate::errors::ManifestError;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Root keys that never count as plugin settings.
const RESERVED_KEYS: &[&str] = &["_metadata", "version"];

pub fn load_settings(path: &Path) -> Result<Value, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ManifestError::parse(path, e))
}

/// Pretty JSON with a trailing newline, previous version kept as backup.
pub fn save_json(path: &Path, value: &Value) -> Result<(), ManifestError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_with_backup(path, &content)?;
    Ok(())
}

/// Set `a.b.c` inside `doc`, creating intermediate objects as needed.
/// A non-object value in the way is replaced by an object.
pub fn set_dotted(doc: &mut Value, key: &str, value: Value) {
    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(last) = parts.pop() else {
        return;
    };

    let mut current = doc;
    for part in parts {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        current = map
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert(last.to_string(), value);
    }
}

pub fn get_dotted<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(doc, |current, part| current.get(part))
}

/// Apply a map of dotted keys to a settings document.
pub fn apply_settings(doc: &mut Value, updates: &Map<String, Value>) {
    for (key, value) in updates {
        set_dotted(doc, key, value.clone());
    }
}

/// Read, update and write back a bundle's `settings.json` (created when absent).
pub fn update_settings_file(path: &Path, updates: &Map<String, Value>) -> Result<(), ManifestError> {
    if updates.is_empty() {
        return Ok(());
    }
    let mut doc = match load_settings(path) {
        Ok(doc) => doc,
        Err(ManifestError::NotFound(_)) => Value::Object(Map::new()),
        Err(e) => return Err(e),
    };
    apply_settings(&mut doc, updates);
    save_json(path, &doc)
}

/// The defaults published for a plugin: its own section merged with the
/// remaining root keys other than metadata.
pub fn default_settings(doc: &Value, plugin_key: &str) -> Map<String, Value> {
    let Some(root) = doc.as_object() else {
        return Map::new();
    };

    let mut defaults = root
        .get(plugin_key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    for (key, value) in root {
        if key == plugin_key || RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        defaults.insert(key.clone(), value.clone());
    }

    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_set_dotted_creates_intermediates() {
        let mut doc = json!({"memory_rules": {"enabled": false}});
        set_dotted(&mut doc, "memory_rules.advanced.performance_mode", json!("fast"));
        set_dotted(&mut doc, "memory_rules.enabled", json!(true));
        assert_eq!(
            doc,
            json!({"memory_rules": {"enabled": true, "advanced": {"performance_mode": "fast"}}})
        );
        assert_eq!(
            get_dotted(&doc, "memory_rules.advanced.performance_mode"),
            Some(&json!("fast"))
        );
    }

    #[test]
    fn test_set_dotted_replaces_scalar_in_path() {
        let mut doc = json!({"a": 1});
        set_dotted(&mut doc, "a.b", json!(2));
        assert_eq!(doc, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_default_settings_merges_root_keys() {
        let doc = json!({
            "_metadata": {"license": "MIT"},
            "version": "1.0.0",
            "memory_rules": {"enabled": true, "config": {"max_entries": 100}},
            "shared": {"debug": false}
        });
        let defaults = default_settings(&doc, "memory_rules");
        assert_eq!(
            Value::Object(defaults),
            json!({"enabled": true, "config": {"max_entries": 100}, "shared": {"debug": false}})
        );
    }

    #[test]
    fn test_update_settings_file_backs_up() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"x": {"enabled": false}}"#)?;

        let mut updates = Map::new();
        updates.insert("x.enabled".to_string(), json!(true));
        update_settings_file(&path, &updates)?;

        assert_eq!(load_settings(&path)?, json!({"x": {"enabled": true}}));
        assert!(dir.path().join("settings.json.backup").exists());
        Ok(())
    }
}
