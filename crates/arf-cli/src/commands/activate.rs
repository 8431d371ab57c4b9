//! Non-interactive rule activation: writes the agent integration file at the
//! framework root and in every selected rule bundle, optionally applying
//! settings from an exported configuration.

use crate::common::Context;
use crate::errors::CliError;
use arf_config::FrameworkLayout;
use arf_logger as logger;
use arf_manifest::backup::{backup_and_remove, backup_file, write_with_backup};
use arf_manifest::bundle::rule_languages_in;
use arf_manifest::settings::update_settings_file;
use arf_manifest::{ConfigKind, PluginBundle, PluginManifest};
use clap::{Args, ValueEnum};
use colored::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Agent integration file flavours.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationFile {
    #[default]
    #[value(name = "AGENTS.md")]
    Agents,
    #[value(name = "GEMINI.md")]
    Gemini,
    #[value(name = "CLAUDE.md")]
    Claude,
}

impl IntegrationFile {
    pub const ALL: [IntegrationFile; 3] = [
        IntegrationFile::Agents,
        IntegrationFile::Gemini,
        IntegrationFile::Claude,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            IntegrationFile::Agents => "AGENTS.md",
            IntegrationFile::Gemini => "GEMINI.md",
            IntegrationFile::Claude => "CLAUDE.md",
        }
    }

    /// Exact file name match, `.MD` accepted.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.variants().iter().any(|v| v == name))
    }

    fn variants(self) -> [String; 2] {
        let name = self.file_name();
        [name.to_string(), name.replace(".md", ".MD")]
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ActivateArgs {
    /// Comma-separated rule plugins to activate, or "all" (default: the
    /// exported selection, else all)
    #[arg(long)]
    pub rules: Option<String>,

    /// Language of the rule documents to install
    #[arg(long)]
    pub agent_lang: Option<String>,

    /// Integration file to generate
    #[arg(long, value_enum)]
    pub file_type: Option<IntegrationFile>,

    /// Configuration exported from setup.html
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Apply the recommended option of every choice setting
    #[arg(long)]
    pub recommended: bool,
}

/// Configuration file exported by the setup page.
#[derive(Debug, Default, Deserialize)]
pub struct ExportedConfig {
    #[serde(rename = "_metadata")]
    pub metadata: Map<String, Value>,
    pub agent_language: Option<String>,
    pub agent_file_type: Option<String>,
    #[serde(default)]
    pub selected_rules: HashMap<String, RuleSelection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RuleSelection {
    pub language: Option<String>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl ExportedConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CliError::Usage(format!(
                "Invalid configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        if let Some(exported_from) = config.metadata.get("exported_from").and_then(Value::as_str) {
            logger::info(&format!("Configuration exported from {}", exported_from));
        }
        Ok(config)
    }

    /// Selection keyed by manifest entry or by plugin identifier.
    fn selection(&self, bundle: &PluginBundle) -> Option<&RuleSelection> {
        self.selected_rules
            .get(bundle.entry())
            .or_else(|| self.selected_rules.get(bundle.id()))
    }
}

/// Bundles with at least one rule document: from the manifest, else every
/// subdirectory of the root that has one. Sorted by entry.
pub fn detect_rules(layout: &FrameworkLayout) -> Vec<PluginBundle> {
    let root = layout.root();
    let mut rules: Vec<PluginBundle> = match PluginManifest::load_from_path(&layout.manifest_path()) {
        Ok(manifest) => manifest
            .plugins
            .iter()
            .map(|entry| PluginBundle::new(root, entry))
            .filter(PluginBundle::is_activatable)
            .collect(),
        Err(e) => {
            logger::warn(&format!("{}. Falling back to directory scanning", e));
            scan_root(root)
        }
    };
    rules.sort_by(|a, b| a.entry().cmp(b.entry()));
    rules
}

fn scan_root(root: &Path) -> Vec<PluginBundle> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .map(|name| PluginBundle::new(root, &name))
        .filter(PluginBundle::is_activatable)
        .collect()
}

/// Back up and delete integration files other than `keep` in `dir`.
pub fn remove_other_integration_files(
    dir: &Path,
    keep: IntegrationFile,
) -> Vec<Result<PathBuf, (PathBuf, std::io::Error)>> {
    let mut results = Vec::new();
    for kind in IntegrationFile::ALL.into_iter().filter(|k| *k != keep) {
        for name in kind.variants() {
            let path = dir.join(&name);
            if !path.is_file() {
                continue;
            }
            results.push(match backup_and_remove(&path) {
                Ok(_) => Ok(path),
                Err(e) => Err((path, e)),
            });
        }
    }
    results
}

/// Language of the rule document to install: the rule's own choice, then the
/// global language, then the first available one.
pub fn template_language(bundle: &PluginBundle, rule_lang: Option<&str>, global: &str) -> Option<String> {
    let available = bundle.languages();
    rule_lang
        .into_iter()
        .chain(std::iter::once(global))
        .find(|lang| available.iter().any(|a| a == lang))
        .map(str::to_string)
        .or_else(|| available.first().cloned())
}

/// Settings written for one rule: recommended choices first, exported
/// values on top.
pub fn settings_updates(
    bundle: &PluginBundle,
    recommended: bool,
    selection: Option<&RuleSelection>,
) -> Map<String, Value> {
    let mut updates = Map::new();
    if recommended {
        match bundle.read_setup() {
            Ok(setup) => {
                for entry in setup.entries() {
                    if entry.kind != Some(ConfigKind::Choice) {
                        continue;
                    }
                    if let Some(option) = entry.recommended_option() {
                        updates.extend(option.settings.clone());
                    }
                }
            }
            Err(e) => logger::debug(&format!("{}: no recommended settings ({})", bundle.entry(), e)),
        }
    }
    if let Some(selection) = selection {
        updates.extend(selection.settings.clone());
    }
    updates
}

pub fn handle_activate(ctx: &Context, args: &ActivateArgs) -> Result<(), CliError> {
    let layout = &ctx.layout;
    let available = detect_rules(layout);
    if available.is_empty() {
        return Err(CliError::Usage(format!(
            "No rule plugins found in {}",
            layout.root().display()
        )));
    }
    logger::debug(&format!("Found {} rule plugin(s)", available.len()));

    let exported = args.config.as_deref().map(ExportedConfig::load).transpose()?;

    let agent_lang = match args
        .agent_lang
        .as_deref()
        .or_else(|| exported.as_ref().and_then(|c| c.agent_language.as_deref()))
    {
        Some(lang) => single_language(ctx, lang)?,
        None => "en".to_string(),
    };

    let file_type = match (args.file_type, exported.as_ref().and_then(|c| c.agent_file_type.as_deref())) {
        (Some(kind), _) => kind,
        (None, Some(name)) => IntegrationFile::from_file_name(name)
            .ok_or_else(|| CliError::Usage(format!("Unknown agent file type '{}'", name)))?,
        (None, None) => IntegrationFile::default(),
    };

    let selected = select_rules(&available, args.rules.as_deref(), exported.as_ref())?;
    if selected.is_empty() {
        logger::warn("No rules selected");
        return Ok(());
    }

    logger::step(&format!(
        "Activating {} as {} ({})",
        selected.iter().map(|b| b.id()).collect::<Vec<_>>().join(", "),
        file_type.file_name(),
        agent_lang
    ));

    write_root_file(layout.root(), &agent_lang, file_type)
        .map_err(|e| CliError::Activation(vec![format!("root {}: {}", file_type.file_name(), e)]))?;

    let mut failures = Vec::new();
    let mut activated = Vec::new();
    for bundle in &selected {
        let selection = exported.as_ref().and_then(|c| c.selection(bundle));
        match activate_rule(bundle, selection, &agent_lang, file_type, args.recommended) {
            Ok(lang) => activated.push((bundle.entry().to_string(), lang)),
            Err(message) => {
                logger::error(&format!("{}: {}", bundle.entry(), message));
                failures.push(format!("{}: {}", bundle.entry(), message));
            }
        }
    }

    if !arf_logger::is_quiet() && !activated.is_empty() {
        println!("{}", "Activated:".bold().green());
        for (entry, lang) in &activated {
            println!("  {} {} ({})", "✓".green(), entry, lang);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Activation(failures))
    }
}

fn single_language(ctx: &Context, input: &str) -> Result<String, CliError> {
    let mut languages = ctx.languages.resolve_strict(input)?;
    if languages.len() != 1 {
        return Err(CliError::Usage(format!(
            "Expected a single agent language, got '{}'",
            input
        )));
    }
    Ok(languages.remove(0))
}

fn select_rules(
    available: &[PluginBundle],
    requested: Option<&str>,
    exported: Option<&ExportedConfig>,
) -> Result<Vec<PluginBundle>, CliError> {
    let names: Vec<String> = match requested {
        Some(list) if list.trim().eq_ignore_ascii_case("all") => return Ok(available.to_vec()),
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => match exported {
            Some(config) if !config.selected_rules.is_empty() => {
                config.selected_rules.keys().cloned().collect()
            }
            _ => return Ok(available.to_vec()),
        },
    };

    let unknown: Vec<&str> = names
        .iter()
        .filter(|name| !available.iter().any(|b| b.entry() == *name || b.id() == *name))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(CliError::Usage(format!(
            "Unknown rule(s): {}. Available: {}",
            unknown.join(", "),
            available.iter().map(|b| b.id()).collect::<Vec<_>>().join(", ")
        )));
    }

    Ok(available
        .iter()
        .filter(|b| names.iter().any(|n| b.entry() == n || b.id() == n))
        .cloned()
        .collect())
}

fn write_root_file(root: &Path, lang: &str, file_type: IntegrationFile) -> std::io::Result<()> {
    for result in remove_other_integration_files(root, file_type) {
        match result {
            Ok(path) => logger::info(&format!("Removed {} (backed up)", path.display())),
            Err((path, e)) => logger::warn(&format!("Could not remove {}: {}", path.display(), e)),
        }
    }

    let root_langs = rule_languages_in(root);
    let template = [lang, "en"]
        .into_iter()
        .find(|l| root_langs.iter().any(|a| a == l))
        .map(|l| fs::read_to_string(root.join(format!("RULES.md.{}", l))))
        .transpose()?;
    let content = match template {
        Some(content) => content,
        None => {
            logger::debug("No root RULES.md template, using the built-in one");
            builtin_root_template(file_type)
        }
    };

    write_with_backup(&root.join(file_type.file_name()), &content)?;
    logger::success(&format!("Generated root {}", file_type.file_name()));
    Ok(())
}

fn activate_rule(
    bundle: &PluginBundle,
    selection: Option<&RuleSelection>,
    global_lang: &str,
    file_type: IntegrationFile,
    recommended: bool,
) -> Result<String, String> {
    for result in remove_other_integration_files(bundle.dir(), file_type) {
        if let Err((path, e)) = result {
            logger::warn(&format!("Could not remove {}: {}", path.display(), e));
        }
    }

    let rule_lang = selection.and_then(|s| s.language.as_deref());
    let lang = template_language(bundle, rule_lang, global_lang)
        .ok_or_else(|| format!("no RULES.md.* template in {}", bundle.dir().display()))?;
    let requested = rule_lang.unwrap_or(global_lang);
    if lang != requested {
        logger::warn(&format!(
            "{}: {} template not available, using {}",
            bundle.id(),
            requested,
            lang
        ));
    }

    let target = bundle.dir().join(file_type.file_name());
    backup_file(&target).map_err(|e| e.to_string())?;
    fs::copy(bundle.rule_path(&lang), &target).map_err(|e| e.to_string())?;

    let updates = settings_updates(bundle, recommended, selection);
    if !updates.is_empty() {
        update_settings_file(&bundle.settings_path(), &updates).map_err(|e| e.to_string())?;
        logger::debug(&format!("{}: {} setting(s) saved", bundle.id(), updates.len()));
    }
    Ok(lang)
}

fn builtin_root_template(file_type: IntegrationFile) -> String {
    format!(
        r#"# Agentic Rules Framework Integration

Agents load rule files only after the user has activated them as `{file}`.

## Rules
Each activated rule plugin directory contains its own `{file}`. Load it only
when the plugin's `enabled` setting in its `settings.json` is true.

## Responsibilities
- Respect user settings and report when a rule is disabled.
- Keep the framework out of the user's project code.
"#,
        file = file_type.file_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn rule(root: &Path, name: &str, langs: &[&str]) -> Result<(), std::io::Error> {
        let dir = root.join("modules").join(name);
        fs::create_dir_all(&dir)?;
        for lang in langs {
            fs::write(dir.join(format!("RULES.md.{}", lang)), format!("{} {}", name, lang))?;
        }
        Ok(())
    }

    fn framework(root: &Path) -> Result<(), std::io::Error> {
        rule(root, "memory-rules", &["en", "ja"])?;
        rule(root, "rag-rules", &["id"])?;
        rule(root, "empty-rules", &[])?;
        fs::write(
            root.join("plugins.json"),
            r#"{"plugins": ["modules/rag-rules", "modules/memory-rules", "modules/empty-rules"]}"#,
        )?;
        fs::write(
            root.join("modules/memory-rules/setup.json"),
            json!({
                "mandatory_config": [{
                    "name": "memory_rules_enable",
                    "type": "choice",
                    "settings_key": "memory_rules.enabled",
                    "options": [
                        {"name": "enable", "recommended": true, "settings": {"memory_rules.enabled": true}},
                        {"name": "disable", "settings": {"memory_rules.enabled": false}}
                    ]
                }]
            })
            .to_string(),
        )?;
        fs::write(
            root.join("modules/memory-rules/settings.json"),
            r#"{"memory_rules": {"enabled": false}}"#,
        )?;
        Ok(())
    }

    #[test]
    fn test_detect_rules_from_manifest() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        framework(dir.path())?;
        let rules = detect_rules(&FrameworkLayout::new(dir.path()));
        let entries: Vec<_> = rules.iter().map(|b| b.entry().to_string()).collect();
        assert_eq!(entries, vec!["modules/memory-rules", "modules/rag-rules"]);
        Ok(())
    }

    #[test]
    fn test_detect_rules_scans_root_without_manifest() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("b-rules"))?;
        fs::write(dir.path().join("b-rules/RULES.md.en"), "b")?;
        fs::create_dir_all(dir.path().join("a-rules"))?;
        fs::write(dir.path().join("a-rules/RULES.md.ja"), "a")?;
        fs::create_dir_all(dir.path().join("docs"))?;

        let rules = detect_rules(&FrameworkLayout::new(dir.path()));
        let entries: Vec<_> = rules.iter().map(|b| b.entry().to_string()).collect();
        assert_eq!(entries, vec!["a-rules", "b-rules"]);
        Ok(())
    }

    #[test]
    fn test_template_language_fallback_chain() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        rule(dir.path(), "memory-rules", &["ja", "en"])?;
        let bundle = PluginBundle::new(dir.path(), "modules/memory-rules");

        assert_eq!(template_language(&bundle, Some("ja"), "en").as_deref(), Some("ja"));
        assert_eq!(template_language(&bundle, Some("de"), "ja").as_deref(), Some("ja"));
        assert_eq!(template_language(&bundle, None, "fr").as_deref(), Some("en"));
        Ok(())
    }

    #[test]
    fn test_activate_writes_integration_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let root = dir.path();
        framework(root)?;
        fs::write(root.join("RULES.md.ja"), "root ja")?;
        fs::write(root.join("GEMINI.md"), "old")?;
        fs::write(root.join("modules/memory-rules/AGENTS.md"), "previous")?;

        let args = ActivateArgs {
            agent_lang: Some("japanese".to_string()),
            recommended: true,
            ..Default::default()
        };
        handle_activate(&Context::for_root(root), &args)?;

        assert_eq!(fs::read_to_string(root.join("AGENTS.md"))?, "root ja");
        assert!(!root.join("GEMINI.md").exists());
        assert_eq!(fs::read_to_string(root.join("GEMINI.md.backup"))?, "old");

        let memory = root.join("modules/memory-rules");
        assert_eq!(fs::read_to_string(memory.join("AGENTS.md"))?, "memory-rules ja");
        assert_eq!(fs::read_to_string(memory.join("AGENTS.md.backup"))?, "previous");
        let settings: Value = serde_json::from_str(&fs::read_to_string(memory.join("settings.json"))?)?;
        assert_eq!(settings["memory_rules"]["enabled"], json!(true));

        assert_eq!(
            fs::read_to_string(root.join("modules/rag-rules/AGENTS.md"))?,
            "rag-rules id"
        );
        Ok(())
    }

    #[test]
    fn test_activate_with_exported_config() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let root = dir.path();
        framework(root)?;
        let exported = root.join("export.json");
        fs::write(
            &exported,
            json!({
                "_metadata": {"exported_from": "setup.html"},
                "agent_language": "en",
                "agent_file_type": "CLAUDE.md",
                "selected_rules": {
                    "modules/memory-rules": {
                        "language": "ja",
                        "settings": {"memory_rules.advanced.performance_mode": "fast"}
                    }
                }
            })
            .to_string(),
        )?;

        let args = ActivateArgs {
            config: Some(exported),
            ..Default::default()
        };
        handle_activate(&Context::for_root(root), &args)?;

        let memory = root.join("modules/memory-rules");
        assert_eq!(fs::read_to_string(memory.join("CLAUDE.md"))?, "memory-rules ja");
        assert!(!root.join("modules/rag-rules/CLAUDE.md").exists());
        let settings: Value = serde_json::from_str(&fs::read_to_string(memory.join("settings.json"))?)?;
        assert_eq!(settings["memory_rules"]["advanced"]["performance_mode"], json!("fast"));
        assert_eq!(settings["memory_rules"]["enabled"], json!(false));
        assert!(fs::read_to_string(root.join("CLAUDE.md"))?.contains("`CLAUDE.md`"));
        Ok(())
    }

    #[test]
    fn test_exported_config_requires_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("export.json");
        fs::write(&path, r#"{"agent_language": "en"}"#)?;
        assert!(matches!(ExportedConfig::load(&path), Err(CliError::Usage(_))));
        Ok(())
    }

    #[test]
    fn test_unknown_rule_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        framework(dir.path())?;
        let args = ActivateArgs {
            rules: Some("memory-rules,nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            handle_activate(&Context::for_root(dir.path()), &args),
            Err(CliError::Usage(_))
        ));
        assert!(!dir.path().join("AGENTS.md").exists());
        Ok(())
    }

    #[test]
    fn test_integration_file_names() {
        assert_eq!(IntegrationFile::from_file_name("CLAUDE.MD"), Some(IntegrationFile::Claude));
        assert_eq!(IntegrationFile::from_file_name("README.md"), None);
    }
}
