//! Template acquisition and rendering for plugin scaffolding.

pub mod archive;
pub mod render;
pub mod resolver;

pub use render::Variables;
pub use resolver::{TemplateCheckout, TemplateResolver, TemplateSource};

use crate::interrupt::Interrupted;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Templates for tag '{tag}' are unavailable. Local checkout: {local}. Download: {remote}")]
    Unavailable {
        tag: String,
        local: String,
        remote: String,
    },

    #[error("Templates directory {} does not exist", .0.display())]
    NotADirectory(PathBuf),

    #[error("No {what} template found in {}", .dir.display())]
    Missing { what: String, dir: PathBuf },

    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Refusing to download templates over a non-HTTPS URL: {0}")]
    InsecureUrl(String),

    #[error("Network failure downloading {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Failed to unpack template archive: {0}")]
    Unpack(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
