//! Template acquisition settings for plugin scaffolding.
//!
//! The framework ships its own defaults in `settings/global-settings.json`
//! under `agentic_rules_framework.scaffold_config`; the user's `arf.toml`
//! takes precedence over those.

use crate::tool::ToolConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_TEMPLATE_VERSION: &str = "1.0.0";
pub const DEFAULT_TAG_FORMAT: &str = "Template_{version}";
pub const DEFAULT_GITHUB_REPO: &str = "https://github.com/paupawsan/agentic-rules";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    pub template_version: String,
    pub template_tag_format: String,
    pub github_repo: String,
    pub prefer_local_templates: bool,
    pub template_cache_enabled: bool,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            template_version: DEFAULT_TEMPLATE_VERSION.to_string(),
            template_tag_format: DEFAULT_TAG_FORMAT.to_string(),
            github_repo: DEFAULT_GITHUB_REPO.to_string(),
            prefer_local_templates: true,
            template_cache_enabled: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialScaffoldConfig {
    template_version: Option<String>,
    template_tag_format: Option<String>,
    github_repo: Option<String>,
    prefer_local_templates: Option<bool>,
    template_cache_enabled: Option<bool>,
}

impl ScaffoldConfig {
    /// Read the framework's scaffold settings, falling back to defaults.
    ///
    /// A missing file silently yields defaults; an unreadable or malformed
    /// file is reported as a warning and also yields defaults.
    pub fn load(global_settings: &Path) -> Self {
        if !global_settings.exists() {
            return Self::default();
        }

        match read_partial(global_settings) {
            Ok(partial) => Self::default().merged(partial),
            Err(e) => {
                tracing::warn!(
                    "Could not read scaffold config from {}: {}",
                    global_settings.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn merged(mut self, partial: PartialScaffoldConfig) -> Self {
        if let Some(v) = partial.template_version {
            self.template_version = v;
        }
        if let Some(v) = partial.template_tag_format {
            self.template_tag_format = v;
        }
        if let Some(v) = partial.github_repo {
            self.github_repo = v;
        }
        if let Some(v) = partial.prefer_local_templates {
            self.prefer_local_templates = v;
        }
        if let Some(v) = partial.template_cache_enabled {
            self.template_cache_enabled = v;
        }
        self
    }

    /// Apply values explicitly set in the user's tool config.
    pub fn with_overrides(self, tool: &ToolConfig) -> Self {
        self.merged(PartialScaffoldConfig {
            template_version: tool.template_version.clone(),
            template_tag_format: tool.template_tag_format.clone(),
            github_repo: tool.github_repo.clone(),
            prefer_local_templates: tool.prefer_local_templates,
            template_cache_enabled: tool.template_cache_enabled,
        })
    }

    /// The git tag holding the templates, e.g. `Template_1.0.0`.
    pub fn tag_name(&self) -> String {
        self.template_tag_format
            .replace("{version}", &self.template_version)
    }
}

fn read_partial(path: &Path) -> Result<PartialScaffoldConfig, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| e.to_string())?;

    let Some(section) = value
        .get("agentic_rules_framework")
        .and_then(|v| v.get("scaffold_config"))
    else {
        return Ok(PartialScaffoldConfig::default());
    };

    serde_json::from_value(section.clone()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_file_missing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let config = ScaffoldConfig::load(&dir.path().join("global-settings.json"));
        assert_eq!(config, ScaffoldConfig::default());
        assert_eq!(config.tag_name(), "Template_1.0.0");
        Ok(())
    }

    #[test]
    fn test_partial_section_merges_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("global-settings.json");
        fs::write(
            &path,
            r#"{"agentic_rules_framework": {"scaffold_config": {
                "template_version": "2.1.0",
                "prefer_local_templates": false
            }}}"#,
        )?;

        let config = ScaffoldConfig::load(&path);
        assert_eq!(config.template_version, "2.1.0");
        assert!(!config.prefer_local_templates);
        assert!(config.template_cache_enabled);
        assert_eq!(config.github_repo, DEFAULT_GITHUB_REPO);
        assert_eq!(config.tag_name(), "Template_2.1.0");
        Ok(())
    }

    #[test]
    fn test_malformed_file_yields_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("global-settings.json");
        fs::write(&path, "{ not json")?;
        assert_eq!(ScaffoldConfig::load(&path), ScaffoldConfig::default());
        Ok(())
    }

    #[test]
    fn test_tool_config_overrides_framework_values() {
        let tool = ToolConfig {
            template_version: Some("3.0.0".to_string()),
            template_tag_format: Some("templates-v{version}".to_string()),
            ..ToolConfig::default()
        };
        let config = ScaffoldConfig::default().with_overrides(&tool);
        assert_eq!(config.tag_name(), "templates-v3.0.0");
        assert!(config.prefer_local_templates);
    }
}
