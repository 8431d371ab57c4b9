//! Top-level error type for arf commands.
//!
//! Each library error keeps its own message so every failure class prints
//! a distinct line before the process exits with status 1.

use crate::scaffold::ScaffoldError;
use crate::setup_page::PageError;
use crate::splice::SpliceError;
use crate::templates::TemplateError;
use arf_config::ConfigError;
use arf_lang::LanguageError;
use arf_manifest::ManifestError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    #[error(transparent)]
    Splice(#[from] SpliceError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Activation failed for {} rule(s): {}", .0.len(), .0.join("; "))]
    Activation(Vec<String>),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Server(format!("{:#}", e))
    }
}
