//! Aggregate configuration consumed by `setup.html`.
//!
//! Built from the manifest by folding over every registered bundle. A bundle
//! that cannot be read is skipped with a warning; the build only fails when
//! the manifest itself is unusable or no bundle loads at all.

use crate::backup::write_with_backup;
use crate::bundle::{read_rule_in, PluginBundle};
use crate::errors::ManifestError;
use crate::manifest::PluginManifest;
use arf_lang::{language_superset, LanguageTable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const WEB_CONFIG_VERSION: &str = "0.1.0";
pub const WEB_CONFIG_DESCRIPTION: &str = "Static web configuration generated from setup.json files";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebConfig {
    pub version: String,
    pub description: String,
    pub ui_language: String,
    pub agent_language: String,
    pub plugins: IndexMap<String, PluginConfig>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub root_templates: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub localization: Map<String, Value>,
    pub mandatory_config: Vec<Value>,
    pub optional_config: Vec<Value>,
    pub default_settings: Map<String, Value>,
    pub templates: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPlugin {
    pub entry: String,
    pub reason: String,
}

/// What the fold tolerated: skipped bundles and missing rule documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub skipped: Vec<SkippedPlugin>,
    /// Plugin entry -> languages without a rule document.
    pub missing_templates: IndexMap<String, Vec<String>>,
    pub missing_root_templates: Vec<String>,
}

impl WebConfig {
    pub fn empty(default_language: &str) -> Self {
        Self {
            version: WEB_CONFIG_VERSION.to_string(),
            description: WEB_CONFIG_DESCRIPTION.to_string(),
            ui_language: default_language.to_string(),
            agent_language: default_language.to_string(),
            plugins: IndexMap::new(),
            root_templates: IndexMap::new(),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ManifestError> {
        let mut content = self.to_pretty_json()?;
        content.push('\n');
        write_with_backup(path, &content)?;
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ManifestError::parse(path, e))
    }
}

pub struct WebConfigBuilder<'a> {
    root: &'a Path,
    ui_languages: Vec<String>,
    languages: Vec<String>,
}

impl<'a> WebConfigBuilder<'a> {
    /// `ui_languages` come from `localization.json`; rule documents are looked
    /// up for those plus every code in the language table.
    pub fn new(root: &'a Path, ui_languages: Vec<String>, table: &LanguageTable) -> Self {
        let languages = language_superset(table, &ui_languages);
        Self {
            root,
            ui_languages,
            languages,
        }
    }

    pub fn build(&self, manifest_path: &Path) -> Result<(WebConfig, BuildReport), ManifestError> {
        let manifest = PluginManifest::load_from_path(manifest_path)?;
        if manifest.is_empty() {
            return Err(ManifestError::Empty(manifest_path.to_path_buf()));
        }
        info!(
            "Found {} plugins: {}",
            manifest.plugins.len(),
            manifest.plugins.join(", ")
        );

        let default_language = self
            .ui_languages
            .first()
            .map_or("en", String::as_str);
        let mut config = WebConfig::empty(default_language);
        let mut report = BuildReport::default();

        for entry in &manifest.plugins {
            let bundle = PluginBundle::new(self.root, entry);
            match self.load_plugin(&bundle, &mut report) {
                Ok(plugin) => {
                    info!("Loaded {}", entry);
                    config.plugins.insert(entry.clone(), plugin);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", entry, e);
                    report.skipped.push(SkippedPlugin {
                        entry: entry.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if config.plugins.is_empty() {
            return Err(ManifestError::NoPluginsLoaded);
        }

        for lang in &self.languages {
            match read_rule_in(self.root, lang) {
                Ok(Some(text)) => {
                    config.root_templates.insert(lang.clone(), text);
                }
                Ok(None) => report.missing_root_templates.push(lang.clone()),
                Err(e) => {
                    warn!("Could not read root template RULES.md.{}: {}", lang, e);
                    report.missing_root_templates.push(lang.clone());
                }
            }
        }

        Ok((config, report))
    }

    fn load_plugin(
        &self,
        bundle: &PluginBundle,
        report: &mut BuildReport,
    ) -> Result<PluginConfig, ManifestError> {
        let setup = bundle.read_setup()?;

        let mut templates = IndexMap::new();
        let mut missing = Vec::new();
        for lang in &self.languages {
            match bundle.read_rule(lang) {
                Ok(Some(text)) => {
                    templates.insert(lang.clone(), text);
                }
                Ok(None) => missing.push(lang.clone()),
                Err(e) => {
                    warn!("Could not read {}: {}", bundle.rule_path(lang).display(), e);
                    missing.push(lang.clone());
                }
            }
        }
        if !missing.is_empty() {
            debug!(
                "{}: no rule document for {} language(s)",
                bundle.entry(),
                missing.len()
            );
            report
                .missing_templates
                .insert(bundle.entry().to_string(), missing);
        }

        let default_settings = match bundle.default_settings() {
            Ok(defaults) => defaults,
            Err(e) => {
                warn!("Ignoring settings of {}: {}", bundle.entry(), e);
                Map::new()
            }
        };

        let (display_name, description) = setup.display_identity(bundle.entry());

        Ok(PluginConfig {
            name: bundle.entry().to_string(),
            display_name,
            description,
            localization: setup.localization,
            mandatory_config: setup.mandatory_config,
            optional_config: setup.optional_config,
            default_settings,
            templates,
        })
    }
}
