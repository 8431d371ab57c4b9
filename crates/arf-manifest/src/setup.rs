//! The declarative configuration schema of a bundle (`setup.json`).
//!
//! Config entries are kept as raw JSON so they can be republished without
//! reordering or dropping keys; [`ConfigEntry`] offers a typed view where
//! code needs to act on them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSetup {
    #[serde(default)]
    pub localization: Map<String, Value>,

    #[serde(default)]
    pub mandatory_config: Vec<Value>,

    #[serde(default)]
    pub optional_config: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Path,
    Choice,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigEntry {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<ConfigKind>,
    #[serde(default)]
    pub options: Vec<ConfigOption>,
    pub settings_key: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigOption {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl ConfigEntry {
    pub fn recommended_option(&self) -> Option<&ConfigOption> {
        self.options.iter().find(|o| o.recommended)
    }
}

impl PluginSetup {
    /// Typed view of mandatory then optional entries; malformed entries are
    /// skipped.
    pub fn entries(&self) -> Vec<ConfigEntry> {
        self.mandatory_config
            .iter()
            .chain(self.optional_config.iter())
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    }

    fn localized_field(&self, lang: &str, field: &str) -> Option<&str> {
        self.localization
            .get(lang)
            .and_then(|l| l.get(field))
            .and_then(Value::as_str)
    }

    /// Display name and description for listing a plugin.
    ///
    /// English wins when it has a non-empty name; otherwise the first
    /// localization entry in document order; otherwise the identifier.
    pub fn display_identity(&self, fallback_name: &str) -> (String, String) {
        if let Some(name) = self.localized_field("en", "plugin_name").filter(|n| !n.is_empty()) {
            let description = self.localized_field("en", "description").unwrap_or_default();
            return (name.to_string(), description.to_string());
        }

        if let Some((_, first)) = self.localization.iter().next() {
            let name = first
                .get("plugin_name")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .unwrap_or(fallback_name);
            let description = first
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return (name.to_string(), description.to_string());
        }

        (fallback_name.to_string(), String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup(value: Value) -> Result<PluginSetup, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_display_identity_prefers_english() -> Result<(), serde_json::Error> {
        let s = setup(json!({
            "localization": {
                "ja": {"plugin_name": "メモリ", "description": "記憶"},
                "en": {"plugin_name": "Memory", "description": "Remembers"}
            }
        }))?;
        assert_eq!(
            s.display_identity("memory-rules"),
            ("Memory".to_string(), "Remembers".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_display_identity_falls_back_to_first_entry() -> Result<(), serde_json::Error> {
        let s = setup(json!({
            "localization": {
                "ja": {"plugin_name": "メモリ"},
                "id": {"plugin_name": "Memori"}
            }
        }))?;
        assert_eq!(s.display_identity("memory-rules").0, "メモリ");
        Ok(())
    }

    #[test]
    fn test_display_identity_empty_english_name_is_skipped() -> Result<(), serde_json::Error> {
        let s = setup(json!({
            "localization": {
                "en": {"plugin_name": ""},
                "ja": {"plugin_name": "メモリ"}
            }
        }))?;
        // "en" is also the first entry, and its name is empty
        assert_eq!(s.display_identity("memory-rules").0, "memory-rules");
        Ok(())
    }

    #[test]
    fn test_display_identity_without_localization() {
        let s = PluginSetup::default();
        assert_eq!(
            s.display_identity("raw-id"),
            ("raw-id".to_string(), String::new())
        );
    }

    #[test]
    fn test_entries_typed_view() -> Result<(), serde_json::Error> {
        let s = setup(json!({
            "mandatory_config": [{
                "name": "x_enable",
                "type": "choice",
                "options": [
                    {"name": "enable", "recommended": true, "settings": {"x.enabled": true}},
                    {"name": "disable", "settings": {"x.enabled": false}}
                ],
                "settings_key": "x.enabled",
                "required": true
            }],
            "optional_config": [{"name": "memory_path", "type": "path", "settings_key": "x.path"}]
        }))?;

        let entries = s.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, Some(ConfigKind::Choice));
        assert_eq!(
            entries[0].recommended_option().map(|o| o.name.as_str()),
            Some("enable")
        );
        assert_eq!(entries[1].kind, Some(ConfigKind::Path));
        assert!(entries[1].recommended_option().is_none());
        Ok(())
    }

    #[test]
    fn test_raw_entries_round_trip_unchanged() -> Result<(), serde_json::Error> {
        let raw = json!({
            "_comment": "c",
            "localization": {"en": {"plugin_name": "X"}},
            "mandatory_config": [{"zeta": 1, "alpha": 2, "type": "weird"}],
            "optional_config": []
        });
        let s = setup(raw.clone())?;
        assert_eq!(serde_json::to_value(&s)?, raw);
        Ok(())
    }
}
