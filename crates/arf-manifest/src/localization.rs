use crate::errors::ManifestError;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const COMMENT_KEY: &str = "_comment";

/// The UI string table (`localization.json`), keyed by language code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalizationTable {
    document: Map<String, Value>,
}

impl LocalizationTable {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let document = serde_json::from_str(&content).map_err(|e| ManifestError::parse(path, e))?;
        Ok(Self { document })
    }

    /// Language codes in document order, without the `_comment` key.
    pub fn languages(&self) -> Vec<String> {
        self.document
            .keys()
            .filter(|k| k.as_str() != COMMENT_KEY)
            .cloned()
            .collect()
    }

    /// The whole document, `_comment` included.
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }
}

/// UI languages from `localization.json`, `["en"]` when the file is absent,
/// unreadable or lists none.
pub fn ui_languages(path: &Path) -> Vec<String> {
    let languages = match LocalizationTable::load(path) {
        Ok(table) => table.languages(),
        Err(ManifestError::NotFound(_)) => Vec::new(),
        Err(e) => {
            tracing::warn!("Could not load localization table: {}", e);
            Vec::new()
        }
    };
    if languages.is_empty() {
        vec!["en".to_string()]
    } else {
        languages
    }
}
