//! Start-page configuration records and parse-boundary validation.
//!
//! Every configuration block the page embeds (theme registry, bookmark
//! tabs, time zones, density presets, search engines) gets a typed record
//! here. Parsing is lenient per entry: a malformed entry is dropped and a
//! human-readable reason is returned alongside the surviving entries, so
//! callers can log the reasons without this crate knowing how to log.

use thiserror::Error;

mod clocks;
mod density;
mod search;
mod tabs;
mod themes;

pub use clocks::{ClockSpec, parse_zones};
pub use density::{DensityPresets, DensitySpec, ResolvedDensity, resolve_density};
pub use search::{DEFAULT_ENGINE, SearchEngines, title_case_key};
pub use tabs::{Layout, Link, TabEntry, choose_initial_tab, parse_tabs};
pub use themes::{ThemeCatalog, ThemeDescriptor, ThemeImage, parse_themes};

/// A configuration block failed structural validation as a whole.
///
/// Per-entry problems are not errors; they surface as warning strings next
/// to the parsed value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("wrong shape: expected {0}")]
    Shape(&'static str),
}
