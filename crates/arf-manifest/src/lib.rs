//! Framework file handling for the arf CLI.
//!
//! Covers the plugin manifest (`plugins.json`), individual plugin bundles
//! (`setup.json`, `settings.json`, `RULES.md.<lang>`), the UI localization
//! table and the aggregate `web-config.json` embedded into `setup.html`.
//! Every overwrite keeps the previous content as a `.backup` sibling.

pub mod backup;
pub mod bundle;
pub mod errors;
pub mod localization;
pub mod manifest;
pub mod settings;
pub mod setup;
pub mod web_config;

pub use bundle::PluginBundle;
pub use errors::ManifestError;
pub use localization::{ui_languages, LocalizationTable};
pub use manifest::PluginManifest;
pub use setup::{ConfigEntry, ConfigKind, ConfigOption, PluginSetup};
pub use web_config::{BuildReport, PluginConfig, WebConfig, WebConfigBuilder};
