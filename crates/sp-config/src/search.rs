//! Search-engine configuration.

use crate::ConfigError;

pub const DEFAULT_ENGINE: &str = "google";

/// Ordered engine list: key → query-URL prefix.
#[derive(Debug, Clone)]
pub struct SearchEngines {
    entries: Vec<(String, String)>,
}

impl SearchEngines {
    /// Parse the engine block (`{ "<key>": "<query-url-prefix>" }`),
    /// preserving author order.
    pub fn parse(raw: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let map = value.as_object().ok_or(ConfigError::Shape("object of engines"))?;

        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        for (key, prefix) in map {
            match prefix.as_str().filter(|p| !p.is_empty()) {
                Some(p) => entries.push((key.clone(), p.to_owned())),
                None => warnings.push(format!("search engine {key} dropped: empty prefix")),
            }
        }
        Ok((Self { entries }, warnings))
    }

    /// Substitute used when the block is missing or unparseable.
    pub fn builtin_fallback() -> Self {
        Self {
            entries: vec![
                ("google".to_owned(), "https://www.google.com/search?q=".to_owned()),
                ("yandex".to_owned(), "https://yandex.com/search/?text=".to_owned()),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persisted preference if still configured, else the documented
    /// default engine, else the first configured engine.
    pub fn choose(&self, saved: Option<&str>) -> Option<&str> {
        saved
            .filter(|k| self.contains(k))
            .or_else(|| self.contains(DEFAULT_ENGINE).then_some(DEFAULT_ENGINE))
            .or_else(|| self.entries.first().map(|(k, _)| k.as_str()))
    }
}

/// Engine keys render as title-cased labels: `duck-duck-go` → `Duck Duck Go`.
pub fn title_case_key(key: &str) -> String {
    key.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_author_order() {
        let raw = r#"{"kagi": "https://kagi.com/search?q=", "google": "https://www.google.com/search?q="}"#;
        let (engines, warnings) = SearchEngines::parse(raw).unwrap();
        assert!(warnings.is_empty());
        let keys: Vec<_> = engines.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["kagi", "google"]);
    }

    #[test]
    fn preference_validation_falls_back_to_default() {
        let raw = r#"{"google": "https://www.google.com/search?q=", "kagi": "https://kagi.com/search?q="}"#;
        let (engines, _) = SearchEngines::parse(raw).unwrap();
        assert_eq!(engines.choose(Some("kagi")), Some("kagi"));
        assert_eq!(engines.choose(Some("gone")), Some(DEFAULT_ENGINE));
        assert_eq!(engines.choose(None), Some(DEFAULT_ENGINE));

        let (no_default, _) =
            SearchEngines::parse(r#"{"kagi": "https://kagi.com/search?q="}"#).unwrap();
        assert_eq!(no_default.choose(None), Some("kagi"));
    }

    #[test]
    fn empty_prefixes_are_dropped() {
        let (engines, warnings) = SearchEngines::parse(r#"{"broken": "", "ok": "https://x/?q="}"#).unwrap();
        assert!(engines.contains("ok"));
        assert!(!engines.contains("broken"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn title_cases_engine_keys() {
        assert_eq!(title_case_key("duck-duck-go"), "Duck Duck Go");
        assert_eq!(title_case_key("google"), "Google");
    }
}
