use crate::common::Context;
use crate::errors::CliError;
use crate::setup_page::SetupPage;
use arf_lang::language_superset;
use arf_logger as logger;
use arf_manifest::LocalizationTable;

/// Embed `localization.json` into `setup.html` and regenerate the language
/// pickers, or with `reset` put the page back to its factory state.
pub fn handle_localize(ctx: &Context, reset: bool) -> Result<(), CliError> {
    let layout = &ctx.layout;
    let mut page = SetupPage::load(&layout.setup_page())?;

    if reset {
        page.reset(&ctx.languages)?;
        save(&page)?;
        logger::success("Factory reset: emptied localization and staticWebConfig, language options reset to English");
        return Ok(());
    }

    let table = LocalizationTable::load(&layout.localization())?;
    let mut ui = table.languages();
    if ui.is_empty() {
        logger::warn("localization.json lists no languages, falling back to English");
        ui.push("en".to_string());
    }
    let agent = language_superset(&ctx.languages, &ui);

    page.embed_localization(table.document())?;
    page.set_language_options(&ctx.languages, &ui, &agent)?;
    save(&page)?;
    logger::success(&format!(
        "Updated localization ({}) and language options in {}",
        ui.join(", "),
        page.path().display()
    ));
    Ok(())
}

fn save(page: &SetupPage) -> Result<(), CliError> {
    if !page.save()? {
        logger::info(&format!("{} already up to date", page.path().display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_page::tests::PAGE;
    use crate::setup_page::PageError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_localize_embeds_table_and_options() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("setup.html"), PAGE)?;
        fs::write(
            dir.path().join("localization.json"),
            r#"{"_comment": "c", "en": {"title": "Setup"}, "ja": {"title": "設定"}}"#,
        )?;

        handle_localize(&Context::for_root(dir.path()), false)?;
        let page = fs::read_to_string(dir.path().join("setup.html"))?;
        assert!(page.contains("const localization = {\n  \"_comment\": \"c\",\n  \"en\": {\n    \"title\": \"Setup\"\n  },"));
        assert!(page.contains("\"title\": \"設定\""));
        assert!(page.contains("<option value=\"ja\">🇯🇵 日本語</option>"));
        Ok(())
    }

    #[test]
    fn test_localize_missing_marker_fails_without_writing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let broken = PAGE.replace("<!-- AUTO GENERATED CONTENT END -->", "");
        fs::write(dir.path().join("setup.html"), &broken)?;
        fs::write(dir.path().join("localization.json"), r#"{"en": {}}"#)?;

        let err = handle_localize(&Context::for_root(dir.path()), false);
        assert!(matches!(err, Err(CliError::Page(PageError::Marker { .. }))));
        assert_eq!(fs::read_to_string(dir.path().join("setup.html"))?, broken);
        Ok(())
    }

    #[test]
    fn test_reset_needs_no_localization_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let filled = PAGE.replace("const localization = {};", "const localization = {\"en\": {}};");
        fs::write(dir.path().join("setup.html"), &filled)?;

        handle_localize(&Context::for_root(dir.path()), true)?;
        let page = fs::read_to_string(dir.path().join("setup.html"))?;
        assert!(page.contains("\n  const localization = {};\n"));
        assert!(dir.path().join("setup.html.backup").exists());
        Ok(())
    }
}
