//! Common types and utilities shared across commands

use crate::errors::CliError;
use arf_config::{FrameworkLayout, ScaffoldConfig, ToolConfig};
use arf_lang::LanguageTable;
use arf_logger as logger;
use clap::Parser;
use std::path::PathBuf;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Framework root (default: $ARF_ROOT, the configured root, or the current directory)"
    )]
    pub root: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Everything a framework command needs: user config, resolved layout and
/// the language table.
pub struct Context {
    pub opts: GlobalOpts,
    pub tool: ToolConfig,
    pub layout: FrameworkLayout,
    pub languages: LanguageTable,
}

impl Context {
    pub fn load(opts: &GlobalOpts, languages: LanguageTable) -> Result<Self, CliError> {
        let tool = ToolConfig::load().unwrap_or_else(|e| {
            logger::warn(&format!("Failed to load config, using defaults: {}", e));
            ToolConfig::default()
        });
        let layout = FrameworkLayout::discover(opts.root.as_deref(), tool.root.as_deref())?;
        logger::debug(&format!("Framework root: {}", layout.root().display()));

        Ok(Self {
            opts: opts.clone(),
            tool,
            layout,
            languages,
        })
    }

    /// Framework scaffold settings with the user's overrides applied.
    pub fn scaffold_config(&self) -> ScaffoldConfig {
        ScaffoldConfig::load(&self.layout.global_settings()).with_overrides(&self.tool)
    }

    /// Tool cache directory, if one can be determined.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.tool
            .cache_dir()
            .map_err(|e| logger::debug(&format!("No cache directory: {}", e)))
            .ok()
    }

    #[cfg(test)]
    pub(crate) fn for_root(root: &std::path::Path) -> Self {
        Self {
            opts: GlobalOpts::default(),
            tool: ToolConfig::default(),
            layout: FrameworkLayout::new(root),
            languages: LanguageTable::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_overrides_verbose() {
        let opts = GlobalOpts {
            quiet: true,
            verbose: 2,
            root: None,
        };
        assert_eq!(opts.verbosity_level(), 0);

        let opts = GlobalOpts {
            quiet: false,
            verbose: 1,
            root: None,
        };
        assert_eq!(opts.verbosity_level(), 1);
    }
}
