use super::ScaffoldError;

/// Check the kebab-case identifier rules. Existence of the target directory
/// is checked separately against the framework layout.
pub fn validate_identifier(name: &str) -> Result<(), ScaffoldError> {
    let invalid = |reason: &str| ScaffoldError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("plugin name cannot be empty"));
    }
    if !name.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
        return Err(invalid(
            "must be kebab-case (lowercase letters and hyphens only)",
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("cannot start or end with a hyphen"));
    }
    if name.contains("--") {
        return Err(invalid("cannot contain consecutive hyphens"));
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `memory-rules` -> `Memory Rules`
pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `memory-rules` -> `MemoryRules`
pub fn pascal_case(name: &str) -> String {
    name.split('-').map(capitalize).collect()
}
