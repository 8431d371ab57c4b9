//! File contents of a new bundle, rendered from the template tree with
//! built-in fallbacks for the scaffold documents.

use super::validate::pascal_case;
use super::{PluginPlan, ScaffoldError};
use crate::templates::render::unresolved_placeholders;
use crate::templates::{TemplateError, Variables};
use arf_lang::LanguageTable;
use arf_logger as logger;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

pub const AUTHOR_PLACEHOLDER: &str = "{author_name}";

/// The `templates/` tree of a checkout.
pub struct TemplateSet<'a> {
    dir: &'a Path,
}

impl<'a> TemplateSet<'a> {
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    fn existing(&self, relative: &str) -> Option<PathBuf> {
        let path = self.dir.join(relative);
        path.is_file().then_some(path)
    }

    /// `rules/RULES.md.<lang>`, else `rules/RULES.md.template`.
    pub fn rules(&self, vars: &Variables, lang: &str) -> Result<String, ScaffoldError> {
        let path = self
            .existing(&format!("rules/RULES.md.{}", lang))
            .or_else(|| self.existing("rules/RULES.md.template"))
            .ok_or_else(|| TemplateError::Missing {
                what: format!("rule document for language '{}'", lang),
                dir: self.dir.join("rules"),
            })?;
        Ok(checked(vars.render_file(&path)?, &path))
    }

    pub fn settings(
        &self,
        vars: &PluginVariables<'_>,
        plan: &PluginPlan,
    ) -> Result<String, ScaffoldError> {
        match self.existing("scaffold/settings.json.template") {
            Some(path) => Ok(checked(vars.render_file(&path)?, &path)),
            None => {
                logger::warn("Settings template not found, using built-in settings.json");
                pretty(&fallback_settings(plan, vars))
            }
        }
    }

    pub fn setup(
        &self,
        vars: &PluginVariables<'_>,
        plan: &PluginPlan,
    ) -> Result<String, ScaffoldError> {
        match self.existing("scaffold/setup.json.template") {
            Some(path) => Ok(checked(vars.render_file(&path)?, &path)),
            None => {
                logger::warn("Setup template not found, using built-in setup.json");
                let localization = localization(plan, vars.table());
                pretty(&fallback_setup(plan, vars, localization))
            }
        }
    }

    /// `scaffold/README.<primary>.md`, else `scaffold/README.md.template`.
    pub fn readme(
        &self,
        vars: &PluginVariables<'_>,
        plan: &PluginPlan,
    ) -> Result<String, ScaffoldError> {
        let primary = plan.languages.first().map_or("en", String::as_str);
        let template = self
            .existing(&format!("scaffold/README.{}.md", primary))
            .or_else(|| self.existing("scaffold/README.md.template"));
        match template {
            Some(path) => Ok(checked(vars.render_file(&path)?, &path)),
            None => {
                logger::warn(&format!(
                    "README template not found for {}, using built-in README.md",
                    primary
                ));
                Ok(fallback_readme(plan, vars))
            }
        }
    }
}

fn checked(content: String, path: &Path) -> String {
    let unresolved = unresolved_placeholders(&content);
    if !unresolved.is_empty() {
        logger::warn(&format!(
            "{} leaves placeholders unresolved: {}",
            path.display(),
            unresolved.join(", ")
        ));
    }
    content
}

fn pretty(value: &Value) -> Result<String, ScaffoldError> {
    let mut content = serde_json::to_string_pretty(value).map_err(ScaffoldError::Serialize)?;
    content.push('\n');
    Ok(content)
}

/// Per-language `plugin_name`/`description`; non-English names carry the
/// language's native name.
pub fn localization(plan: &PluginPlan, table: &LanguageTable) -> Map<String, Value> {
    plan.languages
        .iter()
        .map(|lang| {
            let name = if lang == "en" {
                plan.display_name.clone()
            } else {
                let native = table.native_name(lang).unwrap_or("English");
                format!("{} ({})", plan.display_name, native)
            };
            (
                lang.clone(),
                json!({"plugin_name": name, "description": plan.description}),
            )
        })
        .collect()
}

/// Variables shared by every template of one plugin.
pub fn plugin_variables<'t>(plan: &PluginPlan, table: &'t LanguageTable) -> PluginVariables<'t> {
    let now = chrono::Local::now();
    let localization_json =
        serde_json::to_string_pretty(&Value::Object(localization(plan, table)))
            .unwrap_or_else(|_| "{}".to_string());

    let vars = Variables::new()
        .with("plugin_name", plan.name.clone())
        .with("plugin_key", plan.key())
        .with("plugin_name_kebab", plan.name.replace('-', " "))
        .with("display_name", plan.display_name.clone())
        .with("description", plan.description.clone())
        .with("pascal_case_name", pascal_case(&plan.name))
        .with("author_name", AUTHOR_PLACEHOLDER)
        .with("current_year", now.format("%Y").to_string())
        .with(
            "creation_timestamp",
            now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        )
        .with("enabled_by_default", plan.enabled.to_string())
        .with("localization", localization_json);

    PluginVariables { vars, table }
}

/// [`Variables`] bound to the language table used for `language_name`.
pub struct PluginVariables<'t> {
    vars: Variables,
    table: &'t LanguageTable,
}

impl PluginVariables<'_> {
    pub fn table(&self) -> &LanguageTable {
        self.table
    }

    /// Variables for one rule document language.
    pub fn for_language(&self, lang: &str) -> Variables {
        let name = self
            .table
            .english_name(lang)
            .map_or_else(|| format!("Language ({})", lang.to_uppercase()), str::to_string);
        self.vars.clone().with("language_name", name)
    }

    pub(crate) fn value(&self, key: &str) -> &str {
        self.vars.get(key).unwrap_or_default()
    }
}

impl std::ops::Deref for PluginVariables<'_> {
    type Target = Variables;

    fn deref(&self) -> &Variables {
        &self.vars
    }
}

pub fn fallback_settings(plan: &PluginPlan, vars: &PluginVariables<'_>) -> Value {
    let timestamp = vars.value("creation_timestamp");
    let mut root = Map::new();
    root.insert(
        "_metadata".to_string(),
        json!({
            "license": "MIT",
            "copyright": format!("Copyright (c) {} {}", vars.value("current_year"), AUTHOR_PLACEHOLDER),
            "license_file": "LICENSE",
            "created": timestamp,
            "last_modified": timestamp
        }),
    );
    root.insert("version".to_string(), json!("1.0.0"));
    root.insert(
        plan.key(),
        json!({
            "enabled": plan.enabled,
            "config": {
                "example_setting": "example_value",
                "max_entries": 100,
                "cleanup_days": 90
            },
            "advanced": {
                "debug_mode": false,
                "performance_mode": "balanced"
            }
        }),
    );
    Value::Object(root)
}

fn per_language(languages: &[String], entry: &Value) -> Value {
    Value::Object(
        languages
            .iter()
            .map(|lang| (lang.clone(), entry.clone()))
            .collect(),
    )
}

pub fn fallback_setup(
    plan: &PluginPlan,
    vars: &PluginVariables<'_>,
    localization: Map<String, Value>,
) -> Value {
    let key = plan.key();
    let display = &plan.display_name;
    let langs = &plan.languages;

    let enable_choice = json!({
        "name": format!("{}_enable", plan.name),
        "type": "choice",
        "localization": per_language(langs, &json!({
            "title": format!("Enable {}", display),
            "description": format!("Enable or disable {} functionality", display)
        })),
        "options": [
            {
                "name": "enable",
                "localization": per_language(langs, &json!({"description": format!("Enable {}", display)})),
                "recommended": true,
                "settings": {format!("{}.enabled", key): true}
            },
            {
                "name": "disable",
                "localization": per_language(langs, &json!({"description": format!("Disable {}", display)})),
                "settings": {format!("{}.enabled", key): false}
            }
        ],
        "settings_key": format!("{}.enabled", key),
        "required": true
    });

    let performance_mode = json!({
        "name": "performance_mode",
        "type": "choice",
        "localization": per_language(langs, &json!({
            "title": "Performance Mode",
            "description": "Choose performance optimization mode"
        })),
        "options": [
            {
                "name": "balanced",
                "localization": per_language(langs, &json!({"description": "Balanced performance and features"})),
                "recommended": true,
                "settings": {format!("{}.advanced.performance_mode", key): "balanced"}
            },
            {
                "name": "fast",
                "localization": per_language(langs, &json!({"description": "Optimized for speed"})),
                "settings": {format!("{}.advanced.performance_mode", key): "fast"}
            }
        ]
    });

    json!({
        "_comment": format!(
            "Copyright (c) {} {} - Licensed under the MIT License. See LICENSE file for details.",
            vars.value("current_year"),
            AUTHOR_PLACEHOLDER
        ),
        "localization": localization,
        "mandatory_config": [enable_choice],
        "optional_config": [performance_mode]
    })
}

pub fn fallback_readme(plan: &PluginPlan, vars: &PluginVariables<'_>) -> String {
    let name = &plan.name;
    let key = plan.key();
    let spaced = vars.value("plugin_name_kebab");
    let pascal = vars.value("pascal_case_name");
    let rule_files: String = plan
        .languages
        .iter()
        .map(|lang| format!("├── RULES.md.{:<12} # Rule template ({})\n", lang, lang))
        .collect();

    format!(
        r#"# {display}

{description}

## Overview

A plugin for the Agentic Rules Framework that provides {spaced} functionality for AI agents.

## Installation

1. The plugin lives in `modules/{name}/` and is registered in `plugins.json`
2. Run `arf publish` to update the setup page configuration
3. Activate the plugin with `arf activate --rules {name}` or through `setup.html`

## Configuration

### Basic Settings (`settings.json`)

```json
{{
  "{key}": {{
    "enabled": {enabled},
    "config": {{
      "example_setting": "example_value",
      "max_entries": 100,
      "cleanup_days": 90
    }},
    "advanced": {{
      "debug_mode": false,
      "performance_mode": "balanced"
    }}
  }}
}}
```

- `enabled`: Enable/disable the plugin
- `config.max_entries`: Maximum number of entries to maintain
- `config.cleanup_days`: Days to retain data before cleanup
- `advanced.debug_mode`: Enable debug logging
- `advanced.performance_mode`: Performance optimization mode

## Rule Algorithms

### {pascal} Initialization Process
- Initializes the {spaced} system
- Validates configuration

### {pascal} Main Process
- Processes user interactions
- Applies {spaced} logic

### {pascal} Cleanup Process
- Performs periodic cleanup
- Requires user consent

## File Structure

```
{name}/
├── README.md              # This documentation
{rule_files}├── settings.json          # Default settings
└── setup.json             # Setup page configuration
```

## Troubleshooting

- Ensure at least one `RULES.md.*` file exists
- Verify `plugins.json` includes `modules/{name}`
- Check `settings.json` syntax

## License

Copyright (c) {year} {author}

Licensed under the MIT License. See LICENSE file for details.
"#,
        display = plan.display_name,
        description = plan.description,
        enabled = plan.enabled,
        year = vars.value("current_year"),
        author = AUTHOR_PLACEHOLDER,
    )
}
