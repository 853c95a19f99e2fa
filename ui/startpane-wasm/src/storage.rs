//! Persisted selection state.
//!
//! Three string-valued keys, each written by exactly one component:
//! the theme switcher, the tab controller, and the search prompt. Reads
//! happen at startup and are validated against the parsed configuration
//! by the owning component.

use gloo_storage::{LocalStorage, Storage};

pub const THEME_KEY: &str = "theme";
pub const TAB_KEY: &str = "activeTab";
pub const SEARCH_ENGINE_KEY: &str = "preferredSearchEngine";

/// Read a persisted value; absent or unreadable reads as `None`.
pub fn get(key: &str) -> Option<String> {
    LocalStorage::get(key).ok()
}

/// Best-effort write; storage failures (quota, privacy modes) are ignored.
pub fn set(key: &str, value: &str) {
    let _ = LocalStorage::set(key, value);
}
