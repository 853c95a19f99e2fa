//! Startup configuration: embedded JSON blocks parsed once.
//!
//! Every block is optional. A missing or structurally broken block
//! substitutes its documented default so startup never blocks; per-entry
//! drop reasons from `sp-config` are logged here.

use gloo_console::warn;
use sp_config::{ClockSpec, DensityPresets, SearchEngines, TabEntry, ThemeCatalog};

use crate::dom;

pub const THEMES_BLOCK: &str = "themes-config";
pub const BOOKMARKS_BLOCK: &str = "bookmark-data";
pub const ZONES_BLOCK: &str = "timezone-config";
pub const ENGINES_BLOCK: &str = "search-engines-config";
pub const PRESETS_BLOCK: &str = "density-presets";

/// Everything the components are seeded with.
pub struct StartupConfig {
    pub themes: ThemeCatalog,
    pub tabs: Vec<TabEntry>,
    pub zones: Vec<ClockSpec>,
    pub engines: SearchEngines,
    pub presets: DensityPresets,
}

pub fn load() -> StartupConfig {
    let themes = match dom::config_text(THEMES_BLOCK) {
        Some(raw) => match sp_config::parse_themes(&raw) {
            Ok((catalog, warnings)) => {
                log_warnings(THEMES_BLOCK, &warnings);
                catalog
            }
            Err(e) => {
                warn!(format!("{THEMES_BLOCK}: {e}; theme switching disabled"));
                ThemeCatalog::default()
            }
        },
        None => {
            warn!(format!("{THEMES_BLOCK} block missing; theme switching disabled"));
            ThemeCatalog::default()
        }
    };

    let tabs = match dom::config_text(BOOKMARKS_BLOCK) {
        Some(raw) => match sp_config::parse_tabs(&raw) {
            Ok((tabs, warnings)) => {
                log_warnings(BOOKMARKS_BLOCK, &warnings);
                tabs
            }
            Err(e) => {
                warn!(format!("{BOOKMARKS_BLOCK}: {e}; no bookmark tabs"));
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let zones = match dom::config_text(ZONES_BLOCK) {
        Some(raw) => match sp_config::parse_zones(&raw) {
            Ok((zones, warnings)) => {
                log_warnings(ZONES_BLOCK, &warnings);
                zones
            }
            Err(e) => {
                warn!(format!("{ZONES_BLOCK}: {e}; no zone clocks"));
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let engines = match dom::config_text(ENGINES_BLOCK) {
        Some(raw) => match SearchEngines::parse(&raw) {
            Ok((engines, warnings)) if !engines.is_empty() => {
                log_warnings(ENGINES_BLOCK, &warnings);
                engines
            }
            Ok(_) | Err(_) => {
                warn!(format!("{ENGINES_BLOCK}: unusable; using built-in engines"));
                SearchEngines::builtin_fallback()
            }
        },
        None => SearchEngines::builtin_fallback(),
    };

    let presets = match dom::config_text(PRESETS_BLOCK) {
        Some(raw) => match DensityPresets::with_overrides(&raw) {
            Ok((presets, warnings)) => {
                log_warnings(PRESETS_BLOCK, &warnings);
                presets
            }
            Err(e) => {
                warn!(format!("{PRESETS_BLOCK}: {e}; using built-in presets"));
                DensityPresets::builtin()
            }
        },
        None => DensityPresets::builtin(),
    };

    StartupConfig { themes, tabs, zones, engines, presets }
}

fn log_warnings(block: &str, warnings: &[String]) {
    for w in warnings {
        warn!(format!("{block}: {w}"));
    }
}
