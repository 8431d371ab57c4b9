use crate::errors::CliError;
use crate::GlobalOpts;
use arf_config::{ConfigError, ToolConfig, CONFIG_KEYS};
use arf_logger as logger;
use clap::Subcommand;
use colored::*;
use std::fs;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
    /// Get or set the path to the config file.
    /// If `new_path` is provided, later runs read the config from that file.
    /// If omitted, the current configuration file path is printed.
    Path {
        /// Optional new config path to set
        new_path: Option<String>,
    },
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<(), CliError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = ToolConfig::load()?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = ToolConfig::load()?;
            config.set(&key, value.clone()).map_err(|e| match e {
                ConfigError::UnknownKey(_) => CliError::Usage(format!(
                    "Unknown config key: {}. Supported keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )),
                other => other.into(),
            })?;
            let path = config.save()?;
            logger::debug(&format!("Config written to {}", path.display()));
            logger::success(&format!("Set {} = {}", key, value));
            Ok(())
        }
        ConfigAction::Path { new_path } => {
            let pointer_path = ToolConfig::pointer_path()?;
            match new_path {
                Some(p) => {
                    if let Some(parent) = pointer_path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&pointer_path, p.as_bytes())?;
                    logger::success(&format!("Config path set to {}", p));
                }
                None => {
                    let config_path = ToolConfig::path()?;
                    println!("{}", config_path.display());

                    if let Ok(contents) = fs::read_to_string(&pointer_path) {
                        let trimmed = contents.trim();
                        if !trimmed.is_empty() && std::env::var_os("ARF_CONFIG").is_some() {
                            println!("{} {}", "pointer-ignored".yellow(), trimmed);
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

