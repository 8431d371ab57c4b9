//! Bundles created from an existing plugin.

use super::generate::{localization, PluginVariables, TemplateSet};
use super::{ensure_json, BundleGuard, PluginPlan, ScaffoldError};
use arf_manifest::backup::is_backup;
use arf_manifest::bundle::{rule_language, README_FILE, SETTINGS_FILE, SETUP_FILE};
use arf_manifest::PluginBundle;
use serde_json::{Map, Value};
use std::fs;

pub(super) fn write_clone(
    plan: &PluginPlan,
    template: &PluginBundle,
    vars: &PluginVariables<'_>,
    set: &TemplateSet<'_>,
    guard: &mut BundleGuard,
) -> Result<(), ScaffoldError> {
    let renames = [
        (template.id().to_string(), plan.name.clone()),
        (template.key(), plan.key()),
    ];
    let timestamp = vars.value("creation_timestamp").to_string();

    let mut files: Vec<_> = fs::read_dir(template.dir())
        .map_err(|source| ScaffoldError::Write {
            path: template.dir().to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && !is_backup(p))
        .collect();
    files.sort();

    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };

        if let Some(lang) = rule_language(&name) {
            let content = set.rules(&vars.for_language(lang), lang)?;
            guard.write(&name, &content)?;
        } else if name == SETTINGS_FILE {
            let content = fs::read_to_string(&path).map_err(|source| ScaffoldError::Write {
                path: path.clone(),
                source,
            })?;
            let doc = ensure_json(SETTINGS_FILE, &content)?;
            let cloned = clone_settings(doc, &renames[1].0, &plan.key(), plan.enabled, &timestamp);
            guard.write(&name, &pretty(&cloned)?)?;
        } else if name == SETUP_FILE {
            let content = fs::read_to_string(&path).map_err(|source| ScaffoldError::Write {
                path: path.clone(),
                source,
            })?;
            let doc = ensure_json(SETUP_FILE, &content)?;
            let cloned = clone_setup(doc, &renames, localization(plan, vars.table()));
            guard.write(&name, &pretty(&cloned)?)?;
        } else if name == README_FILE {
            guard.write(&name, &set.readme(vars, plan)?)?;
        } else {
            guard.copy(&path, &name)?;
        }
    }

    // A template without these still yields a publishable bundle.
    if !guard.has(SETUP_FILE) {
        guard.write(SETUP_FILE, &set.setup(vars, plan)?)?;
    }
    if !guard.has(README_FILE) {
        guard.write(README_FILE, &set.readme(vars, plan)?)?;
    }
    Ok(())
}

fn pretty(value: &Value) -> Result<String, ScaffoldError> {
    let mut content = serde_json::to_string_pretty(value).map_err(ScaffoldError::Serialize)?;
    content.push('\n');
    Ok(content)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Replace `old` with `new` where it is not part of a longer word.
fn replace_token(text: &str, old: &str, new: &str) -> String {
    if old.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (idx, _) in text.match_indices(old) {
        if idx < last {
            continue;
        }
        let before = text[..idx].chars().next_back();
        let after = text[idx + old.len()..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            continue;
        }
        out.push_str(&text[last..idx]);
        out.push_str(new);
        last = idx + old.len();
    }
    out.push_str(&text[last..]);
    out
}

fn rename_all(text: &str, renames: &[(String, String)]) -> String {
    renames
        .iter()
        .fold(text.to_string(), |acc, (old, new)| replace_token(&acc, old, new))
}

fn substitute(value: Value, renames: &[(String, String)]) -> Value {
    match value {
        Value::String(s) => Value::String(rename_all(&s, renames)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| substitute(v, renames))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (rename_all(&k, renames), substitute(v, renames)))
                .collect(),
        ),
        other => other,
    }
}

/// Template `setup.json` with identifiers renamed and the top-level
/// localization replaced.
pub fn clone_setup(
    doc: Value,
    renames: &[(String, String)],
    localization: Map<String, Value>,
) -> Value {
    let mut cloned = substitute(doc, renames);
    if let Value::Object(map) = &mut cloned {
        map.insert("localization".to_string(), Value::Object(localization));
    }
    cloned
}

/// Template `settings.json` with its plugin section renamed, `enabled` set
/// and the metadata timestamps refreshed.
pub fn clone_settings(
    doc: Value,
    old_key: &str,
    new_key: &str,
    enabled: bool,
    timestamp: &str,
) -> Value {
    let Value::Object(root) = doc else {
        return doc;
    };

    let mut out: Map<String, Value> = root
        .into_iter()
        .map(|(k, v)| if k == old_key { (new_key.to_string(), v) } else { (k, v) })
        .collect();

    if let Some(section) = out.get_mut(new_key).and_then(Value::as_object_mut) {
        section.insert("enabled".to_string(), Value::Bool(enabled));
    }

    let metadata = out
        .entry("_metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(metadata) = metadata.as_object_mut() {
        metadata.insert("created".to_string(), Value::String(timestamp.to_string()));
        metadata.insert(
            "last_modified".to_string(),
            Value::String(timestamp.to_string()),
        );
    }

    Value::Object(out)
}
