use crate::errors::ManifestError;
use crate::settings::{default_settings, load_settings};
use crate::setup::PluginSetup;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETUP_FILE: &str = "setup.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const README_FILE: &str = "README.md";
pub const RULES_PREFIX: &str = "RULES.md.";

/// `RULES.md.<lang>`
pub fn rule_file_name(lang: &str) -> String {
    format!("{}{}", RULES_PREFIX, lang)
}

/// Language code of a rule document file name, if it is one.
pub fn rule_language(file_name: &str) -> Option<&str> {
    let lang = file_name.strip_prefix(RULES_PREFIX)?;
    let valid = (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_lowercase());
    valid.then_some(lang)
}

/// Rule document languages present in a directory, sorted.
pub fn rule_languages_in(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut langs: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| {
            e.file_name()
                .to_str()
                .and_then(rule_language)
                .map(str::to_string)
        })
        .collect();
    langs.sort();
    langs
}

/// Read `RULES.md.<lang>` from a directory; `Ok(None)` when absent.
pub fn read_rule_in(dir: &Path, lang: &str) -> Result<Option<String>, ManifestError> {
    let path = dir.join(rule_file_name(lang));
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

/// One plugin directory as registered in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginBundle {
    entry: String,
    dir: PathBuf,
}

impl PluginBundle {
    pub fn new(root: &Path, entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
            dir: root.join(entry),
        }
    }

    /// Manifest entry, e.g. `modules/memory-rules`.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Last path segment of the entry.
    pub fn id(&self) -> &str {
        self.entry
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.entry)
    }

    /// Settings section name: identifier with hyphens turned into underscores.
    pub fn key(&self) -> String {
        self.id().replace('-', "_")
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    pub fn languages(&self) -> Vec<String> {
        rule_languages_in(&self.dir)
    }

    /// Directory exists and holds at least one rule document.
    pub fn is_activatable(&self) -> bool {
        self.exists() && !self.languages().is_empty()
    }

    /// Activatable and has a `settings.json`; usable as a clone source.
    pub fn is_complete(&self) -> bool {
        self.is_activatable() && self.settings_path().is_file()
    }

    pub fn setup_path(&self) -> PathBuf {
        self.dir.join(SETUP_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn rule_path(&self, lang: &str) -> PathBuf {
        self.dir.join(rule_file_name(lang))
    }

    pub fn read_setup(&self) -> Result<PluginSetup, ManifestError> {
        let path = self.setup_path();
        if !path.is_file() {
            return Err(ManifestError::NotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| ManifestError::parse(path, e))
    }

    pub fn read_rule(&self, lang: &str) -> Result<Option<String>, ManifestError> {
        read_rule_in(&self.dir, lang)
    }

    pub fn read_settings(&self) -> Result<Value, ManifestError> {
        load_settings(&self.settings_path())
    }

    /// Published defaults; empty when `settings.json` is missing.
    pub fn default_settings(&self) -> Result<Map<String, Value>, ManifestError> {
        match self.read_settings() {
            Ok(doc) => Ok(default_settings(&doc, &self.key())),
            Err(ManifestError::NotFound(_)) => Ok(Map::new()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rule_language_parsing() {
        assert_eq!(rule_language("RULES.md.en"), Some("en"));
        assert_eq!(rule_language("RULES.md.fil"), Some("fil"));
        assert_eq!(rule_language("RULES.md.template"), None);
        assert_eq!(rule_language("RULES.md.en.backup"), None);
        assert_eq!(rule_language("README.md"), None);
    }

    #[test]
    fn test_key_uses_basename() {
        let bundle = PluginBundle::new(Path::new("/fw"), "modules/memory-rules");
        assert_eq!(bundle.id(), "memory-rules");
        assert_eq!(bundle.key(), "memory_rules");

        let flat = PluginBundle::new(Path::new("/fw"), "rag-rules");
        assert_eq!(flat.key(), "rag_rules");
    }

    #[test]
    fn test_languages_and_activatable() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let plugin = dir.path().join("modules").join("x");
        fs::create_dir_all(&plugin)?;
        let bundle = PluginBundle::new(dir.path(), "modules/x");
        assert!(!bundle.is_activatable());

        fs::write(plugin.join("RULES.md.ja"), "ja")?;
        fs::write(plugin.join("RULES.md.en"), "en")?;
        fs::write(plugin.join("RULES.md.en.backup"), "old")?;
        assert_eq!(bundle.languages(), vec!["en", "ja"]);
        assert!(bundle.is_activatable());
        assert!(!bundle.is_complete());

        fs::write(plugin.join("settings.json"), r#"{"x": {"enabled": true}, "version": "1"}"#)?;
        assert!(bundle.is_complete());
        assert_eq!(
            Value::Object(bundle.default_settings()?),
            serde_json::json!({"enabled": true})
        );
        assert_eq!(bundle.read_rule("ja")?.as_deref(), Some("ja"));
        assert_eq!(bundle.read_rule("de")?, None);
        Ok(())
    }

    #[test]
    fn test_read_setup_missing_and_invalid() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let bundle = PluginBundle::new(dir.path(), "p");
        assert!(matches!(bundle.read_setup(), Err(ManifestError::NotFound(_))));

        fs::create_dir_all(dir.path().join("p"))?;
        fs::write(dir.path().join("p").join("setup.json"), "{")?;
        assert!(matches!(bundle.read_setup(), Err(ManifestError::Parse { .. })));
        Ok(())
    }
}
