//! Theme registry configuration.

use std::collections::HashSet;

use serde::Deserialize;

use crate::ConfigError;

/// Optional illustration shown alongside a theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeImage {
    pub src: String,
    #[serde(default)]
    pub height: String,
}

/// One theme as declared in the registry block. Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeDescriptor {
    pub key: String,
    #[serde(default)]
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub image: Option<ThemeImage>,
}

/// Ordered theme catalog, keyed by `key`.
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    entries: Vec<ThemeDescriptor>,
}

impl ThemeCatalog {
    pub fn get(&self, key: &str) -> Option<&ThemeDescriptor> {
        self.entries.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|d| d.key.as_str())
    }

    /// Persisted selection if still configured, else the first theme.
    pub fn choose_initial(&self, saved: Option<&str>) -> Option<&str> {
        saved
            .filter(|k| self.contains(k))
            .or_else(|| self.first_key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeDescriptor> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the theme registry block. Invalid entries are dropped; the second
/// tuple element holds one reason string per drop.
pub fn parse_themes(raw: &str) -> Result<(ThemeCatalog, Vec<String>), ConfigError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (i, value) in values.into_iter().enumerate() {
        let mut desc: ThemeDescriptor = match serde_json::from_value(value) {
            Ok(d) => d,
            Err(e) => {
                warnings.push(format!("theme entry {i} dropped: {e}"));
                continue;
            }
        };
        if desc.key.is_empty() {
            warnings.push(format!("theme entry {i} dropped: empty key"));
            continue;
        }
        if desc.href.is_empty() {
            warnings.push(format!("theme entry {i} ({}) dropped: empty href", desc.key));
            continue;
        }
        if !seen.insert(desc.key.clone()) {
            warnings.push(format!("theme entry {i} ({}) dropped: duplicate key", desc.key));
            continue;
        }
        if desc.label.is_empty() {
            desc.label = desc.key.clone();
        }
        entries.push(desc);
    }

    Ok((ThemeCatalog { entries }, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordered_catalog() {
        let raw = r#"[
            {"key": "default", "href": "css/theme.default.css"},
            {"key": "nord-dark", "label": "Nord", "href": "css/theme.nord-dark.css",
             "image": {"src": "img/nord.png", "height": "120px"}}
        ]"#;
        let (catalog, warnings) = parse_themes(raw).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(catalog.first_key(), Some("default"));
        let nord = catalog.get("nord-dark").unwrap();
        assert_eq!(nord.label, "Nord");
        assert_eq!(nord.image.as_ref().unwrap().height, "120px");
        // label falls back to the key
        assert_eq!(catalog.get("default").unwrap().label, "default");
    }

    #[test]
    fn drops_duplicates_and_incomplete_entries() {
        let raw = r#"[
            {"key": "a", "href": "a.css"},
            {"key": "a", "href": "other.css"},
            {"key": "", "href": "x.css"},
            {"key": "b", "href": ""},
            {"label": "no key at all"}
        ]"#;
        let (catalog, warnings) = parse_themes(raw).unwrap();
        assert_eq!(catalog.iter().count(), 1);
        assert_eq!(warnings.len(), 4);
        assert_eq!(catalog.get("a").unwrap().href, "a.css");
    }

    #[test]
    fn initial_choice_validates_saved_value() {
        let raw = r#"[{"key": "a", "href": "a.css"}, {"key": "b", "href": "b.css"}]"#;
        let (catalog, _) = parse_themes(raw).unwrap();
        assert_eq!(catalog.choose_initial(Some("b")), Some("b"));
        assert_eq!(catalog.choose_initial(Some("gone")), Some("a"));
        assert_eq!(catalog.choose_initial(None), Some("a"));
    }

    #[test]
    fn top_level_must_be_an_array() {
        assert!(parse_themes(r#"{"key": "a"}"#).is_err());
    }
}
