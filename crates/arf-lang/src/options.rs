//! HTML `<option>` rendering for the language pickers in `setup.html`.

use crate::table::LanguageTable;

/// One `<option>` element per code, newline separated.
pub fn render_options<S: AsRef<str>>(table: &LanguageTable, codes: &[S]) -> String {
    codes
        .iter()
        .map(|code| {
            let code = code.as_ref();
            format!(
                "<option value=\"{}\">{}</option>",
                code,
                table.display_name(code)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Option list framed by newlines, ready to splice between content markers.
pub fn option_block<S: AsRef<str>>(table: &LanguageTable, codes: &[S]) -> String {
    format!("\n{}\n", render_options(table, codes))
}

/// The given languages followed by every other code in the table.
pub fn language_superset<S: AsRef<str>>(table: &LanguageTable, first: &[S]) -> Vec<String> {
    let mut all: Vec<String> = Vec::with_capacity(first.len() + table.len());
    let mut push = |code: &str| {
        if !all.iter().any(|c| c == code) {
            all.push(code.to_string());
        }
    };
    first.iter().for_each(|code| push(code.as_ref()));
    table.codes().for_each(&mut push);
    all
}
