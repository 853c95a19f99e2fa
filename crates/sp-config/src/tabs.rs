//! Bookmark tab configuration.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer};

use crate::ConfigError;
use crate::density::DensitySpec;

/// A single bookmark link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Row,
    #[default]
    Column,
}

/// One tab as declared in the bookmark block. Read-only after parse.
#[derive(Debug, Clone, Deserialize)]
pub struct TabEntry {
    #[serde(rename = "tab", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, deserialize_with = "positive_int")]
    pub columns: Option<u32>,
    #[serde(default)]
    pub density: Option<DensitySpec>,
}

impl TabEntry {
    /// Configured column count when it is a positive integer, else the
    /// per-layout default.
    pub fn effective_columns(&self) -> u32 {
        match self.columns {
            Some(n) => n,
            None => match self.layout {
                Layout::Row => 3,
                Layout::Column => 4,
            },
        }
    }

    pub fn title(&self) -> &str {
        if self.label.is_empty() { &self.id } else { &self.label }
    }
}

/// Tab ids may be written as JSON strings or numbers.
fn id_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("tab id must be a string or number")),
    }
}

/// Anything that is not a positive integer reads as absent.
fn positive_int<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .filter(|n| *n > 0)
        .map(|n| n as u32))
}

/// Parse the bookmark block. Tabs with duplicate ids and links with neither
/// name nor url are dropped with a reason.
pub fn parse_tabs(raw: &str) -> Result<(Vec<TabEntry>, Vec<String>), ConfigError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let mut entries: Vec<TabEntry> = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (i, value) in values.into_iter().enumerate() {
        let mut entry: TabEntry = match serde_json::from_value(value) {
            Ok(t) => t,
            Err(e) => {
                warnings.push(format!("tab entry {i} dropped: {e}"));
                continue;
            }
        };
        if entry.id.is_empty() {
            warnings.push(format!("tab entry {i} dropped: empty id"));
            continue;
        }
        if !seen.insert(entry.id.clone()) {
            warnings.push(format!("tab entry {i} ({}) dropped: duplicate id", entry.id));
            continue;
        }
        let before = entry.links.len();
        entry.links.retain(|l| !l.name.is_empty() || !l.url.is_empty());
        if entry.links.len() != before {
            warnings.push(format!(
                "tab {}: dropped {} empty link(s)",
                entry.id,
                before - entry.links.len()
            ));
        }
        entries.push(entry);
    }

    Ok((entries, warnings))
}

/// Persisted tab id if still configured, else the first configured tab.
pub fn choose_initial_tab<'a>(entries: &'a [TabEntry], saved: Option<&str>) -> Option<&'a str> {
    saved
        .and_then(|s| entries.iter().find(|t| t.id == s))
        .or_else(|| entries.first())
        .map(|t| t.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tabs_with_numeric_and_string_ids() {
        let raw = r#"[
            {"tab": 1, "label": "Work", "links": [{"name": "Mail", "url": "https://mail.example"}]},
            {"tab": "media", "layout": "row", "columns": 2, "links": []}
        ]"#;
        let (tabs, warnings) = parse_tabs(raw).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(tabs[0].id, "1");
        assert_eq!(tabs[0].title(), "Work");
        assert_eq!(tabs[1].id, "media");
        assert_eq!(tabs[1].layout, Layout::Row);
        assert_eq!(tabs[1].effective_columns(), 2);
    }

    #[test]
    fn column_defaults_follow_layout() {
        let raw = r#"[
            {"tab": "a", "layout": "row"},
            {"tab": "b"},
            {"tab": "c", "columns": -2},
            {"tab": "d", "columns": 0}
        ]"#;
        let (tabs, _) = parse_tabs(raw).unwrap();
        assert_eq!(tabs[0].effective_columns(), 3);
        assert_eq!(tabs[1].effective_columns(), 4);
        // invalid column values fall back instead of dropping the tab
        assert_eq!(tabs[2].effective_columns(), 4);
        assert_eq!(tabs[3].effective_columns(), 4);
    }

    #[test]
    fn duplicate_ids_and_empty_links_are_dropped() {
        let raw = r#"[
            {"tab": "1", "links": [{"name": "", "url": ""}, {"name": "Docs", "url": "https://docs.example"}]},
            {"tab": "1", "label": "shadow"}
        ]"#;
        let (tabs, warnings) = parse_tabs(raw).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].links.len(), 1);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn initial_tab_falls_back_to_first() {
        let raw = r#"[{"tab": "1"}, {"tab": "2"}]"#;
        let (tabs, _) = parse_tabs(raw).unwrap();
        assert_eq!(choose_initial_tab(&tabs, Some("2")), Some("2"));
        assert_eq!(choose_initial_tab(&tabs, Some("9")), Some("1"));
        assert_eq!(choose_initial_tab(&tabs, None), Some("1"));
        assert_eq!(choose_initial_tab(&[], None), None);
    }
}
