use crate::common::Context;
use crate::errors::CliError;
use arf_manifest::{ManifestError, PluginBundle, PluginManifest};
use colored::*;

/// Health of a registered bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStatus {
    /// Rules, settings and setup all present.
    Ready,
    /// Rules present but settings or setup missing.
    Partial,
    /// No rule documents.
    NoRules,
    /// Registered but the directory is gone.
    Missing,
}

impl BundleStatus {
    pub fn of(bundle: &PluginBundle) -> Self {
        if !bundle.exists() {
            BundleStatus::Missing
        } else if !bundle.is_activatable() {
            BundleStatus::NoRules
        } else if bundle.is_complete() && bundle.setup_path().is_file() {
            BundleStatus::Ready
        } else {
            BundleStatus::Partial
        }
    }

    fn label(self) -> ColoredString {
        match self {
            BundleStatus::Ready => "ok".green(),
            BundleStatus::Partial => "incomplete".yellow(),
            BundleStatus::NoRules => "no rules".yellow(),
            BundleStatus::Missing => "missing".red(),
        }
    }
}

pub struct PluginListing {
    pub entry: String,
    pub display_name: String,
    pub description: String,
    pub languages: Vec<String>,
    pub status: BundleStatus,
}

pub fn collect(ctx: &Context) -> Result<Vec<PluginListing>, CliError> {
    let manifest = PluginManifest::load_from_path(&ctx.layout.manifest_path())?;
    let root = ctx.layout.root();

    Ok(manifest
        .plugins
        .iter()
        .map(|entry| {
            let bundle = PluginBundle::new(root, entry);
            let (display_name, description) = match bundle.read_setup() {
                Ok(setup) => setup.display_identity(bundle.id()),
                Err(ManifestError::NotFound(_)) => (bundle.id().to_string(), String::new()),
                Err(e) => {
                    arf_logger::debug(&format!("{}: {}", entry, e));
                    (bundle.id().to_string(), String::new())
                }
            };
            PluginListing {
                entry: entry.clone(),
                display_name,
                description,
                languages: bundle.languages(),
                status: BundleStatus::of(&bundle),
            }
        })
        .collect())
}

pub fn handle_list(ctx: &Context) -> Result<(), CliError> {
    let listings = collect(ctx)?;
    if listings.is_empty() {
        println!("{}", "No plugins registered.".yellow());
        return Ok(());
    }

    println!("{}", "Plugins:".bold().green());
    for listing in &listings {
        let languages = if listing.languages.is_empty() {
            "-".to_string()
        } else {
            listing.languages.join(", ")
        };
        println!(
            "  {} {} ({}) [{}] {}",
            "•".cyan(),
            listing.display_name.bold(),
            listing.entry,
            languages,
            listing.status.label()
        );
        if ctx.opts.verbosity_level() > 0 && !listing.description.is_empty() {
            println!("      {}", listing.description.dimmed());
        }
    }
    Ok(())
}
