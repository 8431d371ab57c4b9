//! Configuration for the arf CLI: the user's `arf.toml`, the framework's
//! scaffold settings, and the framework directory layout.

pub mod error;
pub mod layout;
pub mod scaffold;
pub mod tool;

pub use error::ConfigError;
pub use layout::{git_executable, FrameworkLayout};
pub use scaffold::ScaffoldConfig;
pub use tool::{ToolConfig, CONFIG_KEYS};
