use crate::data::{Language, ALIASES, LANGUAGES};
use crate::error::LanguageError;
use std::collections::HashMap;

/// Outcome of normalizing a comma-separated language list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical codes, deduplicated, in first-seen order.
    pub languages: Vec<String>,
    /// Tokens that matched neither a code nor an alias, in input order.
    pub invalid: Vec<String>,
}

impl Resolution {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Immutable index over the built-in language data.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    languages: Vec<Language>,
    by_code: HashMap<&'static str, usize>,
    aliases: HashMap<String, &'static str>,
}

impl LanguageTable {
    pub fn builtin() -> Self {
        Self::from_parts(LANGUAGES, ALIASES)
    }

    fn from_parts(languages: &[Language], aliases: &[(&str, &'static str)]) -> Self {
        let mut ordered = Vec::with_capacity(languages.len());
        let mut by_code = HashMap::with_capacity(languages.len());
        for language in languages {
            if by_code.contains_key(language.code) {
                continue;
            }
            by_code.insert(language.code, ordered.len());
            ordered.push(*language);
        }

        let mut alias_map = HashMap::with_capacity(aliases.len());
        for (alias, code) in aliases {
            if by_code.contains_key(code) {
                alias_map.entry(alias.to_lowercase()).or_insert(*code);
            }
        }

        Self {
            languages: ordered,
            by_code,
            aliases: alias_map,
        }
    }

    pub fn get(&self, code: &str) -> Option<&Language> {
        self.by_code.get(code).map(|&i| &self.languages[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// All languages in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.languages.iter().map(|l| l.code)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Map a single token (code or alias, any case) to its canonical code.
    pub fn canonical(&self, token: &str) -> Option<&'static str> {
        let lowered = token.trim().to_lowercase();
        if let Some(&i) = self.by_code.get(lowered.as_str()) {
            return Some(self.languages[i].code);
        }
        self.aliases.get(&lowered).copied()
    }

    /// Normalize a comma-separated list of codes or aliases.
    ///
    /// Empty input resolves to `["en"]`.
    pub fn resolve(&self, input: &str) -> Resolution {
        let mut resolution = Resolution::default();

        for token in input
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
        {
            match self.canonical(&token) {
                Some(code) => {
                    if !resolution.languages.iter().any(|c| c == code) {
                        resolution.languages.push(code.to_string());
                    }
                }
                None => resolution.invalid.push(token),
            }
        }

        if resolution.languages.is_empty() && resolution.invalid.is_empty() {
            resolution.languages.push("en".to_string());
        }

        resolution
    }

    /// Like [`resolve`](Self::resolve), but rejects the whole list if any
    /// token is unknown.
    pub fn resolve_strict(&self, input: &str) -> Result<Vec<String>, LanguageError> {
        let resolution = self.resolve(input);
        if resolution.is_valid() {
            Ok(resolution.languages)
        } else {
            Err(LanguageError::Unknown {
                invalid: resolution.invalid,
                valid: self.codes().map(str::to_string).collect(),
            })
        }
    }

    /// Display name used in option lists: flag and native name, or
    /// `CODE (code)` for codes outside the table.
    pub fn display_name(&self, code: &str) -> String {
        match self.get(code) {
            Some(language) => format!("{} {}", language.flag, language.native),
            None => format!("{} ({})", code.to_uppercase(), code),
        }
    }

    pub fn native_name(&self, code: &str) -> Option<&'static str> {
        self.get(code).map(|l| l.native)
    }

    pub fn english_name(&self, code: &str) -> Option<&'static str> {
        self.get(code).map(|l| l.name)
    }
}
