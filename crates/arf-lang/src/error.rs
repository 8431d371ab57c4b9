use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("Unknown language(s): {}. Valid codes: {}", invalid.join(", "), valid.join(", "))]
    Unknown {
        invalid: Vec<String>,
        valid: Vec<String>,
    },
}
