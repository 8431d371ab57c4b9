use crate::errors::CliError;
use arf_lang::LanguageTable;
use colored::*;

/// Print the built-in language table.
pub fn handle_languages(table: &LanguageTable, json: bool) -> Result<(), CliError> {
    if json {
        let languages: Vec<_> = table.iter().collect();
        let rendered = serde_json::to_string_pretty(&languages)
            .map_err(|e| CliError::Usage(format!("Failed to render languages: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", "Languages:".bold().green());
    for language in table.iter() {
        let marker = if language.supported {
            "templates".green()
        } else {
            "validation only".dimmed()
        };
        println!(
            "  {} {:<4} {:<12} {:<14} {}",
            language.flag,
            language.code.cyan(),
            language.name,
            language.native,
            marker
        );
    }
    println!(
        "{} languages. Names, native names and common aliases are accepted wherever a code is.",
        table.len()
    );
    Ok(())
}
