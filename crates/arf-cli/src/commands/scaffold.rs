use crate::common::Context;
use crate::errors::CliError;
use crate::prompt::Prompt;
use crate::scaffold::validate::{title_case, validate_identifier};
use crate::scaffold::{PluginPlan, PluginRequest, ScaffoldOutcome, Scaffolder};
use crate::templates::{TemplateCheckout, TemplateResolver, TemplateSource};
use arf_config::FrameworkLayout;
use arf_lang::LanguageTable;
use arf_logger as logger;
use clap::Args;
use colored::*;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct ScaffoldArgs {
    /// Plugin name in kebab-case (e.g. my-awesome-plugin)
    #[arg(long)]
    pub name: Option<String>,

    /// Human-readable display name
    #[arg(long)]
    pub display: Option<String>,

    /// Plugin description (optional with --template)
    #[arg(long)]
    pub description: Option<String>,

    /// Comma-separated language codes, names or aliases (default: en)
    #[arg(long)]
    pub langs: Option<String>,

    /// Existing plugin to use as template (e.g. memory-rules)
    #[arg(long)]
    pub template: Option<String>,

    /// Do not enable the plugin by default
    #[arg(long)]
    pub no_enable: bool,

    /// Use this template directory instead of the tagged templates
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl ScaffoldArgs {
    /// No plugin flags given: run the wizard. `--templates` alone does not count.
    pub fn is_interactive(&self) -> bool {
        self.name.is_none()
            && self.display.is_none()
            && self.description.is_none()
            && self.langs.is_none()
            && self.template.is_none()
            && !self.no_enable
    }

    /// Build a request from command-line flags.
    pub fn to_request(&self, table: &LanguageTable) -> Result<PluginRequest, CliError> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| CliError::Usage("--name is required for command-line mode".to_string()))?;
        let languages = match &self.langs {
            Some(langs) if self.template.is_none() => table.resolve_strict(langs)?,
            Some(_) => {
                logger::warn("--langs is ignored with --template; the template's languages are used");
                Vec::new()
            }
            None if self.template.is_none() => vec!["en".to_string()],
            None => Vec::new(),
        };
        Ok(PluginRequest {
            name,
            display_name: self.display.clone(),
            description: self.description.clone(),
            languages,
            enabled: !self.no_enable,
            template: self.template.clone(),
        })
    }
}

pub fn handle_scaffold(ctx: &Context, args: &ScaffoldArgs) -> Result<(), CliError> {
    let scaffolder = Scaffolder::new(&ctx.layout, &ctx.languages);

    let plan = if args.is_interactive() {
        let mut prompt = Prompt::stdio();
        let request = wizard(&mut prompt, &ctx.layout, &ctx.languages)?;
        scaffolder.plan(&request)?
    } else {
        scaffolder.plan(&args.to_request(&ctx.languages)?)?
    };

    match &plan.template {
        Some(template) => logger::step(&format!(
            "Creating plugin scaffold for '{}' from template '{}'",
            plan.name,
            template.id()
        )),
        None => logger::step(&format!("Creating plugin scaffold for '{}'", plan.name)),
    }

    let checkout = acquire_templates(ctx, args.templates.as_deref())?;
    let outcome = scaffolder.generate(&plan, checkout.templates_dir())?;
    drop(checkout);

    print_summary(&plan, &outcome);
    Ok(())
}

fn acquire_templates(ctx: &Context, explicit: Option<&Path>) -> Result<TemplateCheckout, CliError> {
    if let Some(dir) = explicit {
        return Ok(TemplateCheckout::from_dir(dir)?);
    }

    let config = ctx.scaffold_config();
    let resolver = TemplateResolver::new(ctx.layout.root(), &config, ctx.cache_dir());
    let checkout = resolver.resolve()?;
    match checkout.source() {
        TemplateSource::LocalTag(tag) => logger::info(&format!("Using local tag '{}'", tag)),
        TemplateSource::Archive(url) => logger::info(&format!("Templates downloaded from {}", url)),
        TemplateSource::Directory(dir) => logger::info(&format!("Using templates in {}", dir.display())),
    }
    Ok(checkout)
}

/// Interactive questions; every answer is validated before moving on.
pub fn wizard<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    layout: &FrameworkLayout,
    table: &LanguageTable,
) -> Result<PluginRequest, CliError> {
    prompt.say(&format!("{}", "Agentic Rules Framework - Plugin Scaffold Generator".bold()))?;

    let name = prompt.ask_until(
        "Plugin name (kebab-case, e.g. 'my-awesome-plugin')",
        None,
        |answer| {
            validate_identifier(answer).map_err(|e| e.to_string())?;
            if layout.plugin_dir(answer).exists() {
                return Err(format!(
                    "Plugin '{}' already exists",
                    FrameworkLayout::plugin_entry(answer)
                ));
            }
            Ok(answer.to_string())
        },
    )?;

    let default_display = title_case(&name);
    let display_name = prompt.ask("Display name", Some(&default_display))?;

    let description = prompt.ask_until("Plugin description", None, |answer| {
        if answer.is_empty() {
            Err("Description cannot be empty".to_string())
        } else {
            Ok(answer.to_string())
        }
    })?;

    let supported: Vec<&str> = table
        .iter()
        .filter(|l| l.supported)
        .map(|l| l.code)
        .collect();
    prompt.say(&format!(
        "Rule templates ship for: {}. Any other ISO code, English name or native name is accepted.",
        supported.join(", ")
    ))?;
    let languages = prompt.ask_until("Languages (comma-separated)", Some("en"), |answer| {
        table.resolve_strict(answer).map_err(|e| e.to_string())
    })?;

    let enabled = prompt.confirm("Enable by default?", true)?;

    prompt.say("")?;
    prompt.say(&format!("{}", "Plugin Summary:".bold()))?;
    prompt.say(&format!("  Name: {}", name))?;
    prompt.say(&format!("  Display: {}", display_name))?;
    prompt.say(&format!("  Description: {}", description))?;
    prompt.say(&format!("  Languages: {}", languages.join(", ").to_uppercase()))?;
    prompt.say(&format!("  Enabled by default: {}", enabled))?;

    if !prompt.confirm("Create plugin scaffold?", false)? {
        return Err(CliError::Cancelled);
    }

    Ok(PluginRequest {
        name,
        display_name: Some(display_name),
        description: Some(description),
        languages,
        enabled,
        template: None,
    })
}

fn print_summary(plan: &PluginPlan, outcome: &ScaffoldOutcome) {
    logger::success("Plugin scaffold created");
    if arf_logger::is_quiet() {
        return;
    }
    println!("  {} {}", "Location:".bold(), outcome.dir.display());
    println!("  {} {}", "Files:".bold(), outcome.files.join(", "));
    println!(
        "  {} {}",
        "Languages:".bold(),
        plan.languages.join(", ").to_uppercase()
    );
    println!("  {} {}", "Enabled by default:".bold(), plan.enabled);
    if !outcome.registered {
        println!(
            "  {} add \"{}\" to plugins.json by hand",
            "!".yellow().bold(),
            outcome.entry
        );
    }
    println!();
    println!("{}", "Next steps:".bold().green());
    println!("  1. Customize the rules in RULES.md.* files");
    println!("  2. Adjust defaults in settings.json");
    println!("  3. Update localization in setup.json if needed");
    println!("  4. Run 'arf publish' to refresh the setup page");
    println!("  5. Run 'arf activate' or 'arf serve' to try it");
}
