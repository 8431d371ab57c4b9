//! `{{key}}` placeholder substitution.

use super::TemplateError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static PLACEHOLDER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").ok());

/// Ordered set of template variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: Vec<(&'static str, String)>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Literal substring replacement of every `{{key}}`; unknown
    /// placeholders are left as they are.
    pub fn render(&self, template: &str) -> String {
        self.values
            .iter()
            .fold(template.to_string(), |content, (key, value)| {
                content.replace(&format!("{{{{{}}}}}", key), value)
            })
    }

    pub fn render_file(&self, path: &Path) -> Result<String, TemplateError> {
        let template = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.render(&template))
    }
}

/// Names of `{{...}}` placeholders still present in rendered text.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return Vec::new();
    };
    let mut names: Vec<String> = Vec::new();
    for caps in re.captures_iter(text) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
