//! DOM access helpers and the element set resolved at startup.
//!
//! Mirrors the page contract: required mount points fail `bind()`, purely
//! decorative ones are `Option` and their features degrade to no-ops.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    doc().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let nl = doc().query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let nl = parent.query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

/// Inline style of an element (every element we style is an HTML element).
pub fn style(el: &Element) -> web_sys::CssStyleDeclaration {
    el.unchecked_ref::<HtmlElement>().style()
}

/// Computed value of a (custom) CSS property on `el`, trimmed.
pub fn computed_value(el: &Element, prop: &str) -> String {
    window()
        .get_computed_style(el)
        .ok()
        .flatten()
        .and_then(|s| s.get_property_value(prop).ok())
        .map(|v| v.trim().to_owned())
        .unwrap_or_default()
}

/// Text content of an embedded JSON configuration block.
pub fn config_text(id: &str) -> Option<String> {
    by_id(id)
        .and_then(|el| el.text_content())
        .filter(|s| !s.trim().is_empty())
}

/// Start-page inputs never want browser assistance.
pub fn normalize_inputs() {
    for el in query_all("input") {
        for (attr, value) in [
            ("autocomplete", "off"),
            ("spellcheck", "false"),
            ("autocorrect", "off"),
            ("autocapitalize", "off"),
        ] {
            let _ = el.set_attribute(attr, value);
        }
    }
}

// ── Elements struct ──

/// All DOM references the enhancer uses, resolved once at startup.
/// Clone-friendly (inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    /// `<html>`: carries the theme marker class and published tokens.
    pub root: HtmlElement,

    // Tabs
    pub tab_buttons: Option<Element>,
    pub tab_links: Option<Element>,

    // Theme dropdown
    pub theme_dropdown: Option<Element>,
    pub theme_trigger: Option<HtmlElement>,
    pub theme_menu: Option<Element>,
    pub theme_image: Option<HtmlImageElement>,

    // Search prompt
    pub search_dropdown: Option<Element>,
    pub search_trigger: Option<HtmlElement>,
    pub search_menu: Option<Element>,
    pub search_input: Option<HtmlInputElement>,

    // Clocks
    pub clock_container: Option<Element>,
    pub time_text: Option<Element>,
    pub date_text: Option<Element>,
}

impl Elements {
    /// Resolve all DOM references. Call once after the document is ready.
    pub fn bind() -> Result<Elements, JsValue> {
        let root = doc()
            .document_element()
            .ok_or_else(|| JsValue::from_str("missing document element"))?
            .dyn_into::<HtmlElement>()?;

        let theme_dropdown = by_id("theme-dropdown");
        let theme_trigger = theme_dropdown
            .as_ref()
            .and_then(|d| d.query_selector(".trigger").ok().flatten())
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        let theme_menu = theme_dropdown
            .as_ref()
            .and_then(|d| d.query_selector(".menu").ok().flatten());

        Ok(Elements {
            root,
            tab_buttons: by_id("tab-buttons"),
            tab_links: by_id("tab-links"),
            theme_dropdown,
            theme_trigger,
            theme_menu,
            theme_image: by_id_typed("theme-image"),
            search_dropdown: by_id("search-prompt-dropdown"),
            search_trigger: by_id_typed("search-prompt-trigger"),
            search_menu: by_id("search-prompt-menu"),
            search_input: by_id_typed("search-prompt-input"),
            clock_container: query(".clock-container"),
            time_text: by_id("time"),
            date_text: by_id("date"),
        })
    }
}
