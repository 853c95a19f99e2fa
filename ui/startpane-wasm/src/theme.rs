//! Theme switching.
//!
//! Applies the `theme-<key>` marker class, loads each theme's stylesheet
//! at most once, and derives neumorphic shading from the theme's base
//! surface color. Later switches always win over earlier in-flight
//! stylesheet loads: every accepted switch takes a fresh generation
//! number, and a load completion whose generation is no longer current
//! drops its side effects.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use gloo_console::{debug, error};
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlLinkElement;

use sp_config::ThemeCatalog;

use crate::{App, clock, dom, storage, tabs};

const THEME_PREFIX: &str = "theme-";

// ── State machine ──

/// Mutable switcher state. Kept free of DOM types so the transitions stay
/// host-testable; side effects live in the free functions below.
#[derive(Debug, Default)]
pub struct ThemeState {
    current: Option<String>,
    generation: u64,
    loaded: HashSet<String>,
}

impl ThemeState {
    /// Accept a switch to `key`, returning the generation that tags it.
    /// Re-selecting the current theme returns `None`.
    pub fn begin_switch(&mut self, key: &str) -> Option<u64> {
        if self.current.as_deref() == Some(key) {
            return None;
        }
        self.current = Some(key.to_owned());
        self.generation += 1;
        Some(self.generation)
    }

    /// Whether a completion tagged `generation` still speaks for the
    /// current theme.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Stylesheets stay loaded for the page lifetime; the set only grows.
    pub fn mark_loaded(&mut self, key: &str) {
        self.loaded.insert(key.to_owned());
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.loaded.contains(key)
    }
}

/// Theme switcher: immutable catalog plus mutable state and the in-flight
/// stylesheet loads (shared so concurrent switches await the same load).
pub struct ThemeSwitcher {
    pub catalog: ThemeCatalog,
    state: RefCell<ThemeState>,
    inflight: RefCell<HashMap<String, Promise>>,
}

impl ThemeSwitcher {
    pub fn new(catalog: ThemeCatalog) -> Self {
        Self {
            catalog,
            state: RefCell::new(ThemeState::default()),
            inflight: RefCell::new(HashMap::new()),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.state.borrow().current().map(str::to_owned)
    }
}

// ── Init & switching ──

/// Build the dropdown and apply the persisted (or first) theme.
pub fn init(app: &Rc<App>) {
    build_dropdown(app);
    let saved = storage::get(storage::THEME_KEY);
    let initial = app
        .theme
        .catalog
        .choose_initial(saved.as_deref())
        .map(str::to_owned);
    if let Some(key) = initial {
        set_theme(app, &key);
    }
}

/// Switch to `key`. Unknown keys and re-selection of the current theme are
/// no-ops. Marker class, persistence, and dropdown label update
/// synchronously; everything derived from the stylesheet's computed values
/// follows asynchronously once the sheet is in.
pub fn set_theme(app: &Rc<App>, key: &str) {
    if !app.theme.catalog.contains(key) {
        return;
    }
    let Some(generation) = app.theme.state.borrow_mut().begin_switch(key) else {
        return;
    };

    let classes = rewrite_marker_classes(&app.els.root.class_name(), key);
    app.els.root.set_class_name(&classes);
    storage::set(storage::THEME_KEY, key);
    update_dropdown_selection(app, key);

    let app = app.clone();
    let key = key.to_owned();
    wasm_bindgen_futures::spawn_local(async move {
        match ensure_sheet(&app, &key).await {
            Ok(()) => {
                if app.theme.state.borrow().is_current(generation) {
                    publish_style_change(&app, &key);
                }
            }
            Err(err) => error!(format!("stylesheet for theme {key} failed to load"), err),
        }
    });
}

/// Keep every non-theme class, then append the one marker for `key`.
fn rewrite_marker_classes(existing: &str, key: &str) -> String {
    let marker = format!("{THEME_PREFIX}{key}");
    let mut kept: Vec<&str> = existing
        .split_whitespace()
        .filter(|c| !c.starts_with(THEME_PREFIX))
        .collect();
    kept.push(&marker);
    kept.join(" ")
}

// ── Stylesheet loading ──

/// Resolve once the theme's stylesheet is in the document. Loads are
/// memoized per key; concurrent callers share one in-flight promise.
async fn ensure_sheet(app: &Rc<App>, key: &str) -> Result<(), JsValue> {
    if app.theme.state.borrow().is_loaded(key) {
        return Ok(());
    }

    let pending = app.theme.inflight.borrow().get(key).cloned();
    let promise = match pending {
        Some(p) => p,
        None => {
            let href = match app.theme.catalog.get(key) {
                Some(d) => d.href.clone(),
                None => return Ok(()),
            };
            let p = start_sheet_load(&href)?;
            app.theme.inflight.borrow_mut().insert(key.to_owned(), p.clone());
            p
        }
    };

    let result = JsFuture::from(promise).await;
    app.theme.inflight.borrow_mut().remove(key);
    match result {
        Ok(_) => {
            app.theme.state.borrow_mut().mark_loaded(key);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Append a `<link rel="stylesheet">` and expose its load/error events as
/// a promise.
fn start_sheet_load(href: &str) -> Result<Promise, JsValue> {
    let link: HtmlLinkElement = dom::document().create_element("link")?.unchecked_into();
    link.set_rel("stylesheet");
    link.set_href(href);

    let promise = Promise::new(&mut |resolve, reject| {
        let on_load = Closure::once(move |_: web_sys::Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let on_error = Closure::once(move |e: web_sys::Event| {
            let _ = reject.call1(&JsValue::NULL, &e);
        });
        link.set_onload(Some(on_load.as_ref().unchecked_ref()));
        link.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_load.forget();
        on_error.forget();
    });

    let head = dom::document()
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?;
    head.append_child(&link)?;
    Ok(promise)
}

// ── Non-stale completion side effects ──

/// Everything that depends on the new stylesheet's computed values:
/// neumorphic tokens, the theme illustration, the clock style cache, and
/// the active tab's layout/density.
fn publish_style_change(app: &Rc<App>, key: &str) {
    apply_neumorph(app);
    apply_illustration(app, key);
    app.clocks.invalidate_style_cache();
    tabs::reapply(app);
    clock::redraw(app);
}

/// Derive the neumorphic quadruple from the computed `--bg` and publish it
/// as custom properties on the root element.
fn apply_neumorph(app: &Rc<App>) {
    let base = dom::computed_value(&app.els.root, "--bg");
    if base.is_empty() {
        debug!("no --bg token; skipping neumorph derivation");
        return;
    }
    let tokens = sp_color::neumorph(&base);
    let style = app.els.root.style();
    let _ = style.set_property("--neu-grad-dark", &tokens.grad_dark);
    let _ = style.set_property("--neu-grad-light", &tokens.grad_light);
    let _ = style.set_property("--neu-shadow-dark", &tokens.shadow_dark);
    let _ = style.set_property("--neu-shadow-lite", &tokens.shadow_lite);
}

fn apply_illustration(app: &Rc<App>, key: &str) {
    let Some(img) = &app.els.theme_image else { return };
    let Some(image) = app.theme.catalog.get(key).and_then(|d| d.image.as_ref()) else {
        return;
    };
    img.set_src(&image.src);
    if !image.height.is_empty() {
        let _ = img.style().set_property("height", &image.height);
    }
}

// ── Dropdown ──

/// Build menu items from the catalog; each selects its theme and closes
/// the menu.
fn build_dropdown(app: &Rc<App>) {
    let Some(menu) = &app.els.theme_menu else { return };
    menu.set_inner_html("");
    for desc in app.theme.catalog.iter() {
        let btn: web_sys::HtmlButtonElement = dom::create_element("button").unchecked_into();
        btn.set_type("button");
        btn.set_class_name("menu-item");
        btn.set_text_content(Some(&desc.label));
        let _ = btn.set_attribute("data-value", &desc.key);
        let _ = btn.set_attribute("role", "option");
        let _ = btn.set_attribute("aria-selected", "false");

        let app2 = app.clone();
        let key = desc.key.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            e.prevent_default();
            set_theme(&app2, &key);
            close_dropdown(&app2.els);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();

        let _ = menu.append_child(&btn);
    }
}

/// Reflect the current theme on the trigger label and the menu items.
fn update_dropdown_selection(app: &Rc<App>, key: &str) {
    if let Some(trigger) = &app.els.theme_trigger {
        let label = app
            .theme
            .catalog
            .get(key)
            .map(|d| d.label.clone())
            .unwrap_or_else(|| key.to_owned());
        match trigger.query_selector(".label").ok().flatten() {
            Some(label_el) => dom::set_text(&label_el, &label),
            None => dom::set_text(trigger, &label),
        }
    }
    if let Some(menu) = &app.els.theme_menu {
        for item in dom::query_all_within(menu, ".menu-item") {
            let is = item.get_attribute("data-value").as_deref() == Some(key);
            dom::toggle_class(&item, "active", is);
            let _ = item.set_attribute("aria-selected", if is { "true" } else { "false" });
        }
    }
}

pub fn toggle_dropdown(els: &dom::Elements) {
    let Some(dropdown) = &els.theme_dropdown else { return };
    if dom::has_class(dropdown, "open") {
        close_dropdown(els);
    } else {
        open_dropdown(els);
    }
}

fn open_dropdown(els: &dom::Elements) {
    let Some(dropdown) = &els.theme_dropdown else { return };
    dom::add_class(dropdown, "open");
    if let Some(trigger) = &els.theme_trigger {
        let _ = trigger.set_attribute("aria-expanded", "true");
    }
}

pub fn close_dropdown(els: &dom::Elements) {
    let Some(dropdown) = &els.theme_dropdown else { return };
    dom::remove_class(dropdown, "open");
    if let Some(trigger) = &els.theme_trigger {
        let _ = trigger.set_attribute("aria-expanded", "false");
    }
}

/// Close when a click lands outside the dropdown subtree.
pub fn close_if_outside(els: &dom::Elements, target: Option<&web_sys::Node>) {
    let Some(dropdown) = &els.theme_dropdown else { return };
    if !dom::has_class(dropdown, "open") {
        return;
    }
    if let Some(t) = target {
        if dropdown.contains(Some(t)) {
            return;
        }
    }
    close_dropdown(els);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_is_idempotent() {
        let mut st = ThemeState::default();
        assert!(st.begin_switch("nord-dark").is_some());
        assert!(st.begin_switch("nord-dark").is_none());
        assert_eq!(st.current(), Some("nord-dark"));
    }

    #[test]
    fn later_switches_invalidate_earlier_generations() {
        let mut st = ThemeState::default();
        let a = st.begin_switch("a").unwrap();
        let b = st.begin_switch("b").unwrap();
        assert!(!st.is_current(a));
        assert!(st.is_current(b));

        // switching back takes a fresh generation; b's completion is stale
        let a2 = st.begin_switch("a").unwrap();
        assert!(!st.is_current(b));
        assert!(st.is_current(a2));
    }

    #[test]
    fn loaded_set_grows_monotonically() {
        let mut st = ThemeState::default();
        assert!(!st.is_loaded("a"));
        st.mark_loaded("a");
        st.mark_loaded("a");
        assert!(st.is_loaded("a"));
    }

    #[test]
    fn marker_rewrite_keeps_exactly_one_theme_class() {
        assert_eq!(rewrite_marker_classes("", "nord-dark"), "theme-nord-dark");
        assert_eq!(
            rewrite_marker_classes("js theme-default wide", "nord-dark"),
            "js wide theme-nord-dark"
        );
        let twice = rewrite_marker_classes(
            &rewrite_marker_classes("base", "gruvbox"),
            "gruvbox",
        );
        assert_eq!(twice, "base theme-gruvbox");
    }
}
