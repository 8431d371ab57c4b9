use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "arf.toml";
const POINTER_FILE_NAME: &str = ".arf_config_path";

/// User-level settings for the `arf` binary, stored as TOML.
///
/// Every field is optional; unset values fall back to the framework's
/// own `global-settings.json` or to built-in defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_tag_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_local_templates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_cache_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<String>,
}

/// Keys accepted by `arf config set`, in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "root",
    "template-version",
    "template-tag-format",
    "github-repo",
    "prefer-local-templates",
    "template-cache-enabled",
    "cache-path",
];

impl ToolConfig {
    pub fn path() -> Result<PathBuf, ConfigError> {
        // Explicit override for tests and isolated runs.
        if let Ok(env_path) = std::env::var("ARF_CONFIG") {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let default = default_config_dir()?.join(CONFIG_FILE_NAME);

        // A pointer file next to the default config may redirect to another location.
        if let Some(parent) = default.parent() {
            let pointer = parent.join(POINTER_FILE_NAME);
            if let Ok(contents) = fs::read_to_string(&pointer) {
                let trimmed = contents.trim();
                if !trimmed.is_empty() {
                    return Ok(PathBuf::from(trimmed));
                }
            }
        }

        Ok(default)
    }

    /// Pointer file that redirects the config location (`arf config path <new>`).
    pub fn pointer_path() -> Result<PathBuf, ConfigError> {
        Ok(default_config_dir()?.join(POINTER_FILE_NAME))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "root" => self.root.clone(),
            "template-version" => self.template_version.clone(),
            "template-tag-format" => self.template_tag_format.clone(),
            "github-repo" => self.github_repo.clone(),
            "prefer-local-templates" => self.prefer_local_templates.map(|b| b.to_string()),
            "template-cache-enabled" => self.template_cache_enabled.map(|b| b.to_string()),
            "cache-path" => self.cache_path.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "root" => self.root = Some(value),
            "template-version" => self.template_version = Some(value),
            "template-tag-format" => self.template_tag_format = Some(value),
            "github-repo" => self.github_repo = Some(value),
            "prefer-local-templates" => {
                self.prefer_local_templates = Some(parse_bool(key, &value)?);
            }
            "template-cache-enabled" => {
                self.template_cache_enabled = Some(parse_bool(key, &value)?);
            }
            "cache-path" => self.cache_path = Some(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Directory holding cached downloads (`~/.cache/arf` unless overridden).
    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.cache_path {
            return Ok(PathBuf::from(path));
        }

        #[cfg(not(target_os = "windows"))]
        let dir = dirs::home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join(".cache")
            .join("arf");

        #[cfg(target_os = "windows")]
        let dir = dirs::cache_dir().ok_or(ConfigError::NoHomeDir)?.join("arf");

        Ok(dir)
    }
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    #[cfg(not(target_os = "windows"))]
    let dir = dirs::home_dir()
        .ok_or(ConfigError::NoHomeDir)?
        .join(".config")
        .join("arf");

    #[cfg(target_os = "windows")]
    let dir = dirs::config_dir()
        .ok_or(ConfigError::NoHomeDir)?
        .join("arf");

    Ok(dir)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get_roundtrip() -> Result<(), ConfigError> {
        let mut config = ToolConfig::default();
        assert!(config.is_empty());

        config.set("template-version", "2.0.0".to_string())?;
        config.set("prefer-local-templates", "no".to_string())?;

        assert_eq!(config.get("template-version").as_deref(), Some("2.0.0"));
        assert_eq!(config.get("prefer-local-templates").as_deref(), Some("false"));
        assert!(!config.is_empty());
        Ok(())
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_bool() {
        let mut config = ToolConfig::default();
        assert!(matches!(
            config.set("uv-path", "x".to_string()),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("template-cache-enabled", "maybe".to_string()),
            Err(ConfigError::InvalidBool { .. })
        ));
    }

    #[test]
    fn test_save_and_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("arf.toml");

        let mut config = ToolConfig::default();
        config.set("root", "/srv/rules".to_string())?;
        config.set("template-cache-enabled", "true".to_string())?;
        config.save_to(&path)?;

        let loaded = ToolConfig::load_from(&path)?;
        assert_eq!(loaded, config);

        let values = loaded.values_iter();
        assert_eq!(values[0], ("root", "/srv/rules".to_string()));
        assert_eq!(values.len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_default() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let loaded = ToolConfig::load_from(&dir.path().join("absent.toml"))?;
        assert!(loaded.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_invalid_toml_reports_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("arf.toml");
        fs::write(&path, "root = [unterminated")?;
        assert!(matches!(
            ToolConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_cache_dir_override() -> Result<(), ConfigError> {
        let config = ToolConfig {
            cache_path: Some("/tmp/arf-cache".to_string()),
            ..ToolConfig::default()
        };
        assert_eq!(config.cache_dir()?, PathBuf::from("/tmp/arf-cache"));
        Ok(())
    }
}
