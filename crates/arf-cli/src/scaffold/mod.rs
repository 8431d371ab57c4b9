//! Plugin bundle generation.
//!
//! A request is validated into a [`PluginPlan`] before anything is written.
//! Generation then writes into a fresh `modules/<id>` directory that is
//! removed again if any step fails, and finally registers the bundle in
//! `plugins.json`.

pub mod clone;
pub mod generate;
pub mod validate;

use crate::interrupt::{CleanupScope, Interrupt, Interrupted};
use crate::templates::TemplateError;
use arf_config::FrameworkLayout;
use arf_lang::{LanguageError, LanguageTable};
use arf_logger as logger;
use arf_manifest::bundle::{rule_file_name, README_FILE, SETTINGS_FILE, SETUP_FILE};
use arf_manifest::settings::{get_dotted, set_dotted};
use arf_manifest::{ManifestError, PluginBundle, PluginManifest};
use generate::{plugin_variables, PluginVariables, TemplateSet};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validate::{title_case, validate_identifier};

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Invalid plugin identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("Plugin directory '{0}' already exists")]
    AlreadyExists(String),

    #[error("A description is required unless a template plugin is used")]
    MissingDescription,

    #[error("At least one language is required")]
    NoLanguages,

    #[error("Template plugin '{0}' not found (needs settings.json and a RULES.md.* file under modules/)")]
    UnknownTemplatePlugin(String),

    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error("Generated {file} is not valid JSON: {source}")]
    InvalidJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the user asked for, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginRequest {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Canonical language codes.
    pub languages: Vec<String>,
    pub enabled: bool,
    /// Identifier of an existing plugin to clone.
    pub template: Option<String>,
}

/// A validated request with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPlan {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub languages: Vec<String>,
    pub enabled: bool,
    pub template: Option<PluginBundle>,
}

impl PluginPlan {
    pub fn key(&self) -> String {
        self.name.replace('-', "_")
    }

    pub fn entry(&self) -> String {
        FrameworkLayout::plugin_entry(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub entry: String,
    pub dir: PathBuf,
    pub files: Vec<String>,
    /// Whether the manifest now lists the bundle.
    pub registered: bool,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct Scaffolder<'a> {
    layout: &'a FrameworkLayout,
    table: &'a LanguageTable,
    interrupt: Interrupt,
}

impl<'a> Scaffolder<'a> {
    pub fn new(layout: &'a FrameworkLayout, table: &'a LanguageTable) -> Self {
        Self {
            layout,
            table,
            interrupt: Interrupt::global(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Validate a request. Nothing on disk is touched.
    pub fn plan(&self, request: &PluginRequest) -> Result<PluginPlan, ScaffoldError> {
        let name = request.name.trim();
        validate_identifier(name)?;
        if self.layout.plugin_dir(name).exists() {
            return Err(ScaffoldError::AlreadyExists(FrameworkLayout::plugin_entry(
                name,
            )));
        }

        let display_name = non_empty(request.display_name.as_deref());
        let description = non_empty(request.description.as_deref());

        if let Some(template) = non_empty(request.template.as_deref()) {
            return self.plan_clone(name, &template, display_name, description, request.enabled);
        }

        let description = description.ok_or(ScaffoldError::MissingDescription)?;
        if request.languages.is_empty() {
            return Err(ScaffoldError::NoLanguages);
        }
        let invalid: Vec<String> = request
            .languages
            .iter()
            .filter(|lang| !self.table.contains(lang))
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Err(LanguageError::Unknown {
                invalid,
                valid: self.table.codes().map(str::to_string).collect(),
            }
            .into());
        }

        Ok(PluginPlan {
            name: name.to_string(),
            display_name: display_name.unwrap_or_else(|| title_case(name)),
            description,
            languages: request.languages.clone(),
            enabled: request.enabled,
            template: None,
        })
    }

    fn plan_clone(
        &self,
        name: &str,
        template: &str,
        display_name: Option<String>,
        description: Option<String>,
        enabled: bool,
    ) -> Result<PluginPlan, ScaffoldError> {
        let bundle = PluginBundle::new(self.layout.root(), &FrameworkLayout::plugin_entry(template));
        if !bundle.is_complete() {
            return Err(ScaffoldError::UnknownTemplatePlugin(template.to_string()));
        }

        let english = match bundle.read_setup() {
            Ok(setup) => setup.localization.get("en").cloned(),
            Err(ManifestError::NotFound(_)) => None,
            Err(e) => {
                logger::warn(&format!("Could not read template setup.json: {}", e));
                None
            }
        };
        let english_field = |field: &str| {
            english
                .as_ref()
                .and_then(|en| en.get(field))
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(PluginPlan {
            name: name.to_string(),
            display_name: display_name
                .or_else(|| english_field("plugin_name"))
                .unwrap_or_else(|| title_case(name)),
            description: description
                .or_else(|| english_field("description"))
                .unwrap_or_default(),
            languages: bundle.languages(),
            enabled,
            template: Some(bundle),
        })
    }

    /// Write the bundle from `templates` and register it.
    pub fn generate(
        &self,
        plan: &PluginPlan,
        templates: &Path,
    ) -> Result<ScaffoldOutcome, ScaffoldError> {
        let dir = self.layout.plugin_dir(&plan.name);
        let mut guard = BundleGuard::create(&dir, self.interrupt.clone())?;
        let vars = plugin_variables(plan, self.table);
        let set = TemplateSet::new(templates);

        match &plan.template {
            Some(template) => {
                logger::info(&format!("Using '{}' as template", template.id()));
                clone::write_clone(plan, template, &vars, &set, &mut guard)?;
            }
            None => write_generic(plan, &vars, &set, &mut guard)?,
        }

        guard.checkpoint()?;
        let files = guard.commit();
        let entry = plan.entry();
        let registered = match register(&self.layout.manifest_path(), &entry) {
            Ok(added) => {
                if added {
                    logger::info(&format!("Added {} to plugins.json", entry));
                }
                true
            }
            Err(e) => {
                logger::warn(&format!(
                    "Could not update plugins.json: {}. Add \"{}\" manually.",
                    e, entry
                ));
                false
            }
        };

        Ok(ScaffoldOutcome {
            entry,
            dir,
            files,
            registered,
        })
    }
}

fn write_generic(
    plan: &PluginPlan,
    vars: &PluginVariables<'_>,
    set: &TemplateSet<'_>,
    guard: &mut BundleGuard,
) -> Result<(), ScaffoldError> {
    for lang in &plan.languages {
        let content = set.rules(&vars.for_language(lang), lang)?;
        guard.write(&rule_file_name(lang), &content)?;
    }

    let settings = set.settings(vars, plan)?;
    guard.write(SETTINGS_FILE, &settings_with_enabled(settings, plan)?)?;

    let setup = set.setup(vars, plan)?;
    ensure_json(SETUP_FILE, &setup)?;
    guard.write(SETUP_FILE, &setup)?;

    guard.write(README_FILE, &set.readme(vars, plan)?)?;
    Ok(())
}

pub(crate) fn ensure_json(file: &str, content: &str) -> Result<Value, ScaffoldError> {
    serde_json::from_str(content).map_err(|source| ScaffoldError::InvalidJson {
        file: file.to_string(),
        source,
    })
}

/// Make `<key>.enabled` match the request when the template hard-codes it.
fn settings_with_enabled(content: String, plan: &PluginPlan) -> Result<String, ScaffoldError> {
    let mut doc = ensure_json(SETTINGS_FILE, &content)?;
    let dotted = format!("{}.enabled", plan.key());
    match get_dotted(&doc, &dotted) {
        Some(Value::Bool(current)) if *current != plan.enabled => {
            set_dotted(&mut doc, &dotted, Value::Bool(plan.enabled));
            let mut content =
                serde_json::to_string_pretty(&doc).map_err(ScaffoldError::Serialize)?;
            content.push('\n');
            Ok(content)
        }
        _ => Ok(content),
    }
}

/// Append `entry` to the manifest, creating it when absent.
fn register(manifest_path: &Path, entry: &str) -> Result<bool, ManifestError> {
    let mut manifest = PluginManifest::load_or_default(manifest_path)?;
    let added = manifest.add_plugin(entry);
    if added || !manifest_path.exists() {
        manifest.save_to_path(manifest_path)?;
    }
    Ok(added)
}

/// Owns a bundle directory under construction; removes it on drop unless
/// committed. Every write first checks for Ctrl+C.
pub(crate) struct BundleGuard {
    dir: PathBuf,
    files: Vec<String>,
    committed: bool,
    interrupt: Interrupt,
    _scope: CleanupScope,
}

impl BundleGuard {
    fn create(dir: &Path, interrupt: Interrupt) -> Result<Self, ScaffoldError> {
        let scope = CleanupScope::enter();
        fs::create_dir_all(dir).map_err(|source| ScaffoldError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            files: Vec::new(),
            committed: false,
            interrupt,
            _scope: scope,
        })
    }

    fn checkpoint(&self) -> Result<(), ScaffoldError> {
        self.interrupt.check().map_err(ScaffoldError::from)
    }

    pub(crate) fn write(&mut self, name: &str, content: &str) -> Result<(), ScaffoldError> {
        self.checkpoint()?;
        let path = self.dir.join(name);
        fs::write(&path, content).map_err(|source| ScaffoldError::Write { path, source })?;
        logger::step(&format!("Generated {}", name));
        self.files.push(name.to_string());
        Ok(())
    }

    pub(crate) fn copy(&mut self, from: &Path, name: &str) -> Result<(), ScaffoldError> {
        self.checkpoint()?;
        let path = self.dir.join(name);
        fs::copy(from, &path).map_err(|source| ScaffoldError::Write { path, source })?;
        logger::step(&format!("Copied {}", name));
        self.files.push(name.to_string());
        Ok(())
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    fn commit(mut self) -> Vec<String> {
        self.committed = true;
        std::mem::take(&mut self.files)
    }
}

impl Drop for BundleGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => logger::warn(&format!(
                "Removed partially generated {}",
                self.dir.display()
            )),
            Err(e) => logger::error(&format!(
                "Could not remove partially generated {}: {}",
                self.dir.display(),
                e
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request(name: &str) -> PluginRequest {
        PluginRequest {
            name: name.to_string(),
            display_name: None,
            description: Some("Remembers things".to_string()),
            languages: vec!["en".to_string(), "ja".to_string()],
            enabled: true,
            template: None,
        }
    }

    fn templates(dir: &Path) -> Result<(), io::Error> {
        fs::create_dir_all(dir.join("rules"))?;
        fs::create_dir_all(dir.join("scaffold"))?;
        fs::write(
            dir.join("rules/RULES.md.template"),
            "# {{display_name}} ({{language_name}})\n",
        )?;
        fs::write(
            dir.join("scaffold/settings.json.template"),
            "{\n  \"version\": \"1.0.0\",\n  \"{{plugin_key}}\": {\"enabled\": true}\n}\n",
        )?;
        Ok(())
    }

    #[test]
    fn test_generic_bundle_and_registration() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        let tpl = TempDir::new()?;
        templates(tpl.path())?;
        let layout = FrameworkLayout::new(root.path());
        let table = LanguageTable::builtin();
        let scaffolder = Scaffolder::new(&layout, &table);

        let mut req = request("memory-rules");
        req.enabled = false;
        let plan = scaffolder.plan(&req)?;
        assert_eq!(plan.display_name, "Memory Rules");

        let outcome = scaffolder.generate(&plan, tpl.path())?;
        assert_eq!(
            outcome.files,
            vec!["RULES.md.en", "RULES.md.ja", "settings.json", "setup.json", "README.md"]
        );
        assert!(outcome.registered);

        let dir = root.path().join("modules/memory-rules");
        assert_eq!(
            fs::read_to_string(dir.join("RULES.md.ja"))?,
            "# Memory Rules (Japanese)\n"
        );
        let settings: Value = serde_json::from_str(&fs::read_to_string(dir.join("settings.json"))?)?;
        assert_eq!(settings["memory_rules"]["enabled"], false);

        let manifest = PluginManifest::load_from_path(&layout.manifest_path())?;
        assert_eq!(manifest.plugins, vec!["modules/memory-rules"]);
        Ok(())
    }

    #[test]
    fn test_invalid_requests_touch_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        let layout = FrameworkLayout::new(root.path());
        let table = LanguageTable::builtin();
        let scaffolder = Scaffolder::new(&layout, &table);

        for name in ["", "Bad", "-x", "a--b"] {
            assert!(matches!(
                scaffolder.plan(&request(name)),
                Err(ScaffoldError::InvalidIdentifier { .. })
            ));
        }

        let mut no_desc = request("ok");
        no_desc.description = Some("  ".to_string());
        assert!(matches!(
            scaffolder.plan(&no_desc),
            Err(ScaffoldError::MissingDescription)
        ));

        let mut bad_lang = request("ok");
        bad_lang.languages = vec!["en".to_string(), "xx".to_string()];
        assert!(matches!(
            scaffolder.plan(&bad_lang),
            Err(ScaffoldError::Language(_))
        ));

        fs::create_dir_all(root.path().join("modules/taken"))?;
        assert!(matches!(
            scaffolder.plan(&request("taken")),
            Err(ScaffoldError::AlreadyExists(_))
        ));

        assert!(!layout.manifest_path().exists());
        Ok(())
    }

    #[test]
    fn test_failure_removes_partial_bundle() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        let empty_templates = TempDir::new()?;
        let layout = FrameworkLayout::new(root.path());
        let table = LanguageTable::builtin();
        let scaffolder = Scaffolder::new(&layout, &table);

        let plan = scaffolder.plan(&request("memory-rules"))?;
        let err = scaffolder.generate(&plan, empty_templates.path());
        assert!(matches!(err, Err(ScaffoldError::Template(_))));
        assert!(!root.path().join("modules/memory-rules").exists());
        assert!(!layout.manifest_path().exists());
        Ok(())
    }

    #[test]
    fn test_unknown_template_plugin() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        let layout = FrameworkLayout::new(root.path());
        let table = LanguageTable::builtin();
        let mut req = request("copy");
        req.template = Some("missing".to_string());
        assert!(matches!(
            Scaffolder::new(&layout, &table).plan(&req),
            Err(ScaffoldError::UnknownTemplatePlugin(_))
        ));
        Ok(())
    }

    #[test]
    fn test_interrupt_removes_partial_bundle() -> Result<(), Box<dyn std::error::Error>> {
        let root = TempDir::new()?;
        let tpl = TempDir::new()?;
        templates(tpl.path())?;
        let layout = FrameworkLayout::new(root.path());
        let table = LanguageTable::builtin();
        let interrupt = Interrupt::new();
        let scaffolder = Scaffolder::new(&layout, &table).with_interrupt(interrupt.clone());

        let plan = scaffolder.plan(&request("memory-rules"))?;
        interrupt.trigger();
        let err = scaffolder.generate(&plan, tpl.path());
        assert!(matches!(err, Err(ScaffoldError::Interrupted(_))));
        assert!(!root.path().join("modules/memory-rules").exists());
        assert!(!layout.manifest_path().exists());
        Ok(())
    }
}
