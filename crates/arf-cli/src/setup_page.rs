//! In-memory editor for the generated regions of `setup.html`.
//!
//! Edits are collected on a [`SetupPage`] and written with one
//! [`SetupPage::save`]; a failed splice leaves the file untouched.

use crate::splice::{splice, splice_within_element, SpliceError};
use arf_lang::{option_block, LanguageTable};
use arf_manifest::backup::write_with_backup;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STATIC_CONFIG_START: &str = "  // ---AUTO GENERATED STATICWEBCONFIG START---";
pub const STATIC_CONFIG_END: &str = "  // ---AUTO GENERATED STATICWEBCONFIG END---";
pub const LOCALIZATION_START: &str = "    // ---AUTO GENERATED LOCALIZATION START---";
pub const LOCALIZATION_END: &str = "    // ---AUTO GENERATED LOCALIZATION END---";
pub const OPTIONS_START: &str = "<!-- AUTO GENERATED CONTENT START -->";
pub const OPTIONS_END: &str = "<!-- AUTO GENERATED CONTENT END -->";
pub const UI_LANGUAGE_SELECT: &str = "<select id=\"ui-language\"";
pub const AGENT_LANGUAGE_SELECT: &str = "<select id=\"agent-language\"";
pub const SELECT_CLOSE: &str = "</select>";

#[derive(Error, Debug)]
pub enum PageError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{source} in {}", .path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: SpliceError,
    },

    #[error("Failed to serialize embedded JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Pretty JSON that is safe inside an inline `<script>`: `</` becomes `<\/`,
/// which still parses to the same string.
fn script_json<T: Serialize>(value: &T) -> Result<String, PageError> {
    Ok(serde_json::to_string_pretty(value)?.replace("</", "<\\/"))
}

pub struct SetupPage {
    path: PathBuf,
    content: String,
    changed: bool,
}

impl SetupPage {
    pub fn load(path: &Path) -> Result<Self, PageError> {
        if !path.is_file() {
            return Err(PageError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| PageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            content,
            changed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    fn apply(&mut self, result: Result<String, SpliceError>) -> Result<(), PageError> {
        let spliced = result.map_err(|source| PageError::Marker {
            path: self.path.clone(),
            source,
        })?;
        if spliced != self.content {
            self.content = spliced;
            self.changed = true;
        }
        Ok(())
    }

    /// Replace the `staticWebConfig` constant with `config` as pretty JSON.
    pub fn embed_config<T: Serialize>(&mut self, config: &T) -> Result<(), PageError> {
        let json = script_json(config)?;
        let content = format!("\n  const staticWebConfig = {};\n", json);
        let result = splice(
            &self.content,
            STATIC_CONFIG_START,
            STATIC_CONFIG_END,
            &content,
            0,
        );
        self.apply(result)
    }

    /// Replace the `localization` constant with `table` as pretty JSON.
    pub fn embed_localization<T: Serialize>(&mut self, table: &T) -> Result<(), PageError> {
        let json = script_json(table)?;
        let content = format!("\n  const localization = {};\n", json);
        let result = splice(
            &self.content,
            LOCALIZATION_START,
            LOCALIZATION_END,
            &content,
            0,
        );
        self.apply(result)
    }

    /// Regenerate the option lists of both language pickers.
    pub fn set_language_options<S: AsRef<str>>(
        &mut self,
        table: &LanguageTable,
        ui: &[S],
        agent: &[S],
    ) -> Result<(), PageError> {
        for (select, codes) in [(UI_LANGUAGE_SELECT, ui), (AGENT_LANGUAGE_SELECT, agent)] {
            let result = splice_within_element(
                &self.content,
                select,
                SELECT_CLOSE,
                OPTIONS_START,
                OPTIONS_END,
                &option_block(table, codes),
            );
            self.apply(result)?;
        }
        Ok(())
    }

    /// Factory state: empty embedded objects and English-only pickers.
    pub fn reset(&mut self, table: &LanguageTable) -> Result<(), PageError> {
        let empty = serde_json::Map::new();
        self.embed_config(&empty)?;
        self.embed_localization(&empty)?;
        self.set_language_options(table, &["en"], &["en"])
    }

    /// Write the page back, keeping the previous version as a backup.
    /// Returns `false` when nothing changed and no write happened.
    pub fn save(&self) -> Result<bool, PageError> {
        if !self.changed {
            return Ok(false);
        }
        write_with_backup(&self.path, &self.content).map_err(|source| PageError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(true)
    }
}
