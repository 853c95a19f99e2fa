//! Time-zone clock configuration.

use crate::ConfigError;

/// One configured clock: zone id, display label, IANA tz identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSpec {
    pub id: String,
    pub label: String,
    pub tz: String,
}

/// Parse the zone block (`{ "<id>": {"label": "...", "tz": "..."} }`),
/// preserving author order. Entries without a tz are dropped with a reason.
pub fn parse_zones(raw: &str) -> Result<(Vec<ClockSpec>, Vec<String>), ConfigError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let map = value.as_object().ok_or(ConfigError::Shape("object of zones"))?;

    let mut zones = Vec::new();
    let mut warnings = Vec::new();
    for (id, entry) in map {
        let tz = entry
            .get("tz")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if tz.is_empty() {
            warnings.push(format!("zone {id} dropped: missing tz identifier"));
            continue;
        }
        let label = entry
            .get("label")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(id.as_str());
        zones.push(ClockSpec {
            id: id.clone(),
            label: label.to_owned(),
            tz: tz.to_owned(),
        });
    }
    Ok((zones, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_author_order_and_labels() {
        let raw = r#"{
            "tokyo": {"label": "Tokyo", "tz": "Asia/Tokyo"},
            "berlin": {"tz": "Europe/Berlin"},
            "broken": {"label": "No Zone"}
        }"#;
        let (zones, warnings) = parse_zones(raw).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, "tokyo");
        assert_eq!(zones[1].id, "berlin");
        assert_eq!(zones[1].label, "berlin");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn rejects_non_object_blocks() {
        assert!(parse_zones(r#"["Asia/Tokyo"]"#).is_err());
    }
}
