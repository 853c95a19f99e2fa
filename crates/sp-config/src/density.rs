//! Bookmark grid density presets and resolution.

use std::collections::HashMap;

use serde::Deserialize;

use crate::ConfigError;

const DEFAULT_CELL_MIN: &str = "150px";
const DEFAULT_GAP: &str = "10px";

/// Density as written in configuration: a preset name, a raw CSS length,
/// or an explicit object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DensitySpec {
    Name(String),
    Explicit {
        #[serde(rename = "cellMin", default)]
        cell_min: Option<String>,
        #[serde(default)]
        gap: Option<String>,
    },
}

/// Density after resolution: the two values applied to the link grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDensity {
    pub cell_min: String,
    pub gap: String,
}

impl ResolvedDensity {
    fn new(cell_min: &str, gap: &str) -> Self {
        Self { cell_min: cell_min.to_owned(), gap: gap.to_owned() }
    }
}

/// Named presets; built-ins can be overridden or extended by a config block.
#[derive(Debug, Clone)]
pub struct DensityPresets {
    map: HashMap<String, ResolvedDensity>,
}

impl Default for DensityPresets {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DensityPresets {
    pub fn builtin() -> Self {
        let mut map = HashMap::new();
        map.insert("compact".to_owned(), ResolvedDensity::new("110px", "6px"));
        map.insert("cozy".to_owned(), ResolvedDensity::new(DEFAULT_CELL_MIN, DEFAULT_GAP));
        map.insert("roomy".to_owned(), ResolvedDensity::new("190px", "16px"));
        Self { map }
    }

    /// Built-ins merged with the optional override block
    /// (`{ "<name>": {"cellMin": "...", "gap": "..."} }`).
    pub fn with_overrides(raw: &str) -> Result<(Self, Vec<String>), ConfigError> {
        #[derive(Deserialize)]
        struct RawPreset {
            #[serde(rename = "cellMin", default)]
            cell_min: Option<String>,
            #[serde(default)]
            gap: Option<String>,
        }

        let mut presets = Self::builtin();
        let mut warnings = Vec::new();
        let overrides: HashMap<String, serde_json::Value> = serde_json::from_str(raw)?;
        for (name, value) in overrides {
            match serde_json::from_value::<RawPreset>(value) {
                Ok(p) => {
                    presets.map.insert(
                        name,
                        ResolvedDensity {
                            cell_min: p.cell_min.unwrap_or_else(|| DEFAULT_CELL_MIN.to_owned()),
                            gap: p.gap.unwrap_or_else(|| DEFAULT_GAP.to_owned()),
                        },
                    );
                }
                Err(e) => warnings.push(format!("density preset {name} ignored: {e}")),
            }
        }
        Ok((presets, warnings))
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedDensity> {
        self.map.get(name)
    }
}

fn looks_like_length(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.')
}

/// Resolve a tab's density. Precedence: explicit object fields, then named
/// preset, then raw CSS length (paired with the default gap). `None` means
/// the caller clears the density attributes.
pub fn resolve_density(
    spec: Option<&DensitySpec>,
    presets: &DensityPresets,
) -> Option<ResolvedDensity> {
    match spec? {
        DensitySpec::Explicit { cell_min, gap } => Some(ResolvedDensity {
            cell_min: cell_min.clone().unwrap_or_else(|| DEFAULT_CELL_MIN.to_owned()),
            gap: gap.clone().unwrap_or_else(|| DEFAULT_GAP.to_owned()),
        }),
        DensitySpec::Name(name) => presets.get(name).cloned().or_else(|| {
            looks_like_length(name)
                .then(|| ResolvedDensity::new(name, DEFAULT_GAP))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(raw: &str) -> DensitySpec {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn explicit_object_wins_and_fills_missing_fields() {
        let presets = DensityPresets::builtin();
        let d = resolve_density(Some(&spec(r#"{"cellMin": "8rem", "gap": "4px"}"#)), &presets);
        assert_eq!(d, Some(ResolvedDensity::new("8rem", "4px")));
        let partial = resolve_density(Some(&spec(r#"{"gap": "2px"}"#)), &presets).unwrap();
        assert_eq!(partial.cell_min, DEFAULT_CELL_MIN);
        assert_eq!(partial.gap, "2px");
    }

    #[test]
    fn named_preset_resolves_before_raw_length() {
        let presets = DensityPresets::builtin();
        let d = resolve_density(Some(&spec(r#""compact""#)), &presets).unwrap();
        assert_eq!(d.cell_min, "110px");
        let raw = resolve_density(Some(&spec(r#""9rem""#)), &presets).unwrap();
        assert_eq!(raw.cell_min, "9rem");
        assert_eq!(raw.gap, DEFAULT_GAP);
    }

    #[test]
    fn unresolvable_specs_clear() {
        let presets = DensityPresets::builtin();
        assert_eq!(resolve_density(Some(&spec(r#""airy""#)), &presets), None);
        assert_eq!(resolve_density(None, &presets), None);
    }

    #[test]
    fn overrides_extend_and_replace_builtins() {
        let raw = r#"{"compact": {"cellMin": "100px", "gap": "4px"}, "vast": {"cellMin": "240px"}}"#;
        let (presets, warnings) = DensityPresets::with_overrides(raw).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(presets.get("compact").unwrap().cell_min, "100px");
        assert_eq!(presets.get("vast").unwrap().gap, DEFAULT_GAP);
        assert!(presets.get("roomy").is_some());
    }
}
