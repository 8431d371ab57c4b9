use crate::common::Context;
use crate::errors::CliError;
use crate::setup_page::SetupPage;
use arf_lang::language_superset;
use arf_logger as logger;
use arf_manifest::{ui_languages, BuildReport, WebConfig, WebConfigBuilder};
use colored::Colorize;

/// Rebuild `web-config.json` from the manifest and embed it, together with
/// the language pickers, into `setup.html`.
pub fn handle_publish(ctx: &Context) -> Result<(), CliError> {
    let layout = &ctx.layout;
    let manifest_path = layout.manifest_path();
    if !manifest_path.exists() {
        return Err(arf_manifest::ManifestError::NotFound(manifest_path).into());
    }

    let ui = ui_languages(&layout.localization());
    logger::debug(&format!("UI languages: {}", ui.join(", ")));

    let builder = WebConfigBuilder::new(layout.root(), ui.clone(), &ctx.languages);
    logger::spinner_start("Loading plugins");
    let built = builder.build(&manifest_path);
    logger::spinner_stop();
    let (config, report) = built?;
    report_gaps(&report, &ui);

    // Splice in memory first so a broken page leaves every file untouched.
    let page_path = layout.setup_page();
    let page = if page_path.is_file() {
        let mut page = SetupPage::load(&page_path)?;
        page.embed_config(&config)?;
        let agent = language_superset(&ctx.languages, &ui);
        page.set_language_options(&ctx.languages, &ui, &agent)?;
        Some(page)
    } else {
        logger::warn(&format!(
            "{} not found, only web-config.json is written",
            page_path.display()
        ));
        None
    };

    let web_config_path = layout.web_config();
    config.save_to_path(&web_config_path)?;
    logger::success(&format!("Generated {}", web_config_path.display()));

    if let Some(page) = page {
        if page.save()? {
            logger::success(&format!("Embedded configuration in {}", page.path().display()));
        } else {
            logger::info(&format!("{} already up to date", page.path().display()));
        }
    }

    print_summary(&config, &report);
    Ok(())
}

fn report_gaps(report: &BuildReport, ui: &[String]) {
    for skipped in &report.skipped {
        logger::warn(&format!("Skipped {}: {}", skipped.entry, skipped.reason));
    }
    for (entry, langs) in &report.missing_templates {
        logger::debug(&format!("{}: no RULES.md for {}", entry, langs.join(", ")));
    }
    for lang in &report.missing_root_templates {
        if ui.contains(lang) {
            logger::warn(&format!("Root template RULES.md.{} not found", lang));
        } else {
            logger::step(&format!("Root template RULES.md.{} not found", lang));
        }
    }
}

fn print_summary(config: &WebConfig, report: &BuildReport) {
    if arf_logger::is_quiet() {
        return;
    }
    println!("{}", "Plugin Summary:".bold().green());
    for (entry, plugin) in &config.plugins {
        println!(
            "  {} {} ({}) [{}]",
            "•".cyan(),
            plugin.display_name,
            entry,
            plugin.templates.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    if !report.skipped.is_empty() {
        println!(
            "  {} {} plugin(s) skipped",
            "!".yellow().bold(),
            report.skipped.len()
        );
    }
    if !config.root_templates.is_empty() {
        println!(
            "  {} root templates: {}",
            "•".cyan(),
            config.root_templates.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }
}
