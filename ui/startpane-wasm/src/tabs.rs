//! Bookmark tab controller.
//!
//! Tracks the active tab over the configured entries, renders the tab
//! strip, and rebuilds the link panel for the active tab only. Selection
//! persists across reloads and arrow keys cycle with wrap-around.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use sp_config::{DensityPresets, Layout, TabEntry, resolve_density};

use crate::{App, dom, storage};

// ── State machine ──

/// Active-tab pointer over the configured id list. Kept free of DOM types;
/// rendering happens in the free functions below.
#[derive(Debug, Default)]
pub struct TabState {
    ids: Vec<String>,
    active: Option<String>,
}

impl TabState {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids, active: None }
    }

    /// Pick the initial tab: the persisted id if still configured, else
    /// the first configured tab.
    pub fn init(&mut self, saved: Option<&str>) -> Option<String> {
        let initial = saved
            .filter(|s| self.ids.iter().any(|id| id == s))
            .map(str::to_owned)
            .or_else(|| self.ids.first().cloned());
        self.active = initial.clone();
        initial
    }

    /// Move the pointer. Unknown ids and the already-active id are no-ops.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.active.as_deref() == Some(id) || !self.ids.iter().any(|t| t == id) {
            return false;
        }
        self.active = Some(id.to_owned());
        true
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Id `step` positions away from the active tab, wrapping at both
    /// ends.
    pub fn cycle(&self, step: i32) -> Option<&str> {
        if self.ids.is_empty() {
            return None;
        }
        let len = self.ids.len() as i32;
        let idx = self
            .active()
            .and_then(|a| self.ids.iter().position(|id| id == a))
            .unwrap_or(0) as i32;
        let next = (idx + step).rem_euclid(len) as usize;
        self.ids.get(next).map(String::as_str)
    }
}

/// Tab controller: parsed entries, density presets, and the activation
/// pointer.
pub struct TabController {
    entries: Vec<TabEntry>,
    presets: DensityPresets,
    state: RefCell<TabState>,
}

impl TabController {
    pub fn new(entries: Vec<TabEntry>, presets: DensityPresets) -> Self {
        let ids = entries.iter().map(|t| t.id.clone()).collect();
        Self {
            entries,
            presets,
            state: RefCell::new(TabState::new(ids)),
        }
    }

    fn entry(&self, id: &str) -> Option<&TabEntry> {
        self.entries.iter().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<String> {
        self.state.borrow().active().map(str::to_owned)
    }
}

// ── Activation ──

/// Render the tab strip and activate the persisted (or first) tab.
pub fn init(app: &Rc<App>) {
    render_buttons(app);
    let saved = storage::get(storage::TAB_KEY);
    let initial = app.tabs.state.borrow_mut().init(saved.as_deref());
    if let Some(id) = initial {
        apply_active(app, &id);
    }
}

/// Activate `id`; no-op when unknown or already active.
pub fn activate(app: &Rc<App>, id: &str) {
    if app.tabs.state.borrow_mut().activate(id) {
        apply_active(app, id);
    }
}

/// Re-run the active tab's side effects (layout may have changed) without
/// moving the pointer.
pub fn reapply(app: &Rc<App>) {
    if let Some(id) = app.tabs.active() {
        apply_active(app, &id);
    }
}

/// Cycle left/right from the active tab and move focus along.
pub fn cycle(app: &Rc<App>, step: i32) {
    let next = app.tabs.state.borrow().cycle(step).map(str::to_owned);
    if let Some(id) = next {
        activate(app, &id);
        focus_button(app, &id);
    }
}

// ── Rendering ──

fn render_buttons(app: &Rc<App>) {
    let Some(container) = &app.els.tab_buttons else { return };
    container.set_inner_html("");
    let frag = dom::document().create_document_fragment();
    for entry in &app.tabs.entries {
        let btn: web_sys::HtmlButtonElement = dom::create_element("button").unchecked_into();
        btn.set_type("button");
        let _ = btn.set_attribute("data-tab-btn", &entry.id);
        let _ = btn.set_attribute("role", "tab");
        let _ = btn.set_attribute("aria-selected", "false");
        btn.set_text_content(Some(entry.title()));

        let app2 = app.clone();
        let id = entry.id.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            activate(&app2, &id);
            focus_button(&app2, &id);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();

        let _ = frag.append_child(&btn);
    }
    let _ = container.append_child(&frag);
}

fn find_button(app: &Rc<App>, id: &str) -> Option<web_sys::Element> {
    let container = app.els.tab_buttons.as_ref()?;
    dom::query_all_within(container, "[data-tab-btn]")
        .into_iter()
        .find(|b| b.get_attribute("data-tab-btn").as_deref() == Some(id))
}

fn focus_button(app: &Rc<App>, id: &str) {
    if let Some(btn) = find_button(app, id) {
        let _ = btn.unchecked_into::<web_sys::HtmlElement>().focus();
    }
}

/// All side effects of an active tab: persistence, button state, layout
/// and density on the panel, freshly built links for this tab only.
fn apply_active(app: &Rc<App>, id: &str) {
    storage::set(storage::TAB_KEY, id);
    let _ = app.els.root.set_attribute("data-active-tab", id);

    if let Some(container) = &app.els.tab_buttons {
        for btn in dom::query_all_within(container, "[data-tab-btn]") {
            let is = btn.get_attribute("data-tab-btn").as_deref() == Some(id);
            dom::toggle_class(&btn, "is-active", is);
            let _ = btn.set_attribute("aria-selected", if is { "true" } else { "false" });
        }
    }

    let Some(entry) = app.tabs.entry(id) else { return };
    let Some(panel) = &app.els.tab_links else { return };

    dom::add_class(panel, "links");
    dom::toggle_class(panel, "layout-row", entry.layout == Layout::Row);
    dom::toggle_class(panel, "layout-column", entry.layout == Layout::Column);

    let style = dom::style(panel);
    let _ = style.set_property("--col-count", &entry.effective_columns().to_string());
    match resolve_density(entry.density.as_ref(), &app.tabs.presets) {
        Some(d) => {
            let _ = style.set_property("--cell-min", &d.cell_min);
            let _ = style.set_property("--gap", &d.gap);
        }
        None => {
            let _ = style.remove_property("--cell-min");
            let _ = style.remove_property("--gap");
        }
    }

    render_links(panel, entry);
}

/// Build the active tab's anchors; inactive tabs keep nothing in the
/// document.
fn render_links(panel: &web_sys::Element, entry: &TabEntry) {
    panel.set_inner_html("");
    let frag = dom::document().create_document_fragment();
    for link in &entry.links {
        let a: web_sys::HtmlAnchorElement = dom::create_element("a").unchecked_into();
        a.set_href(if link.url.is_empty() { "#" } else { &link.url });
        a.set_target("_blank");
        a.set_rel("noopener noreferrer");
        let _ = a.set_attribute("data-tab", &entry.id);
        a.set_class_name("is-visible");
        let text = if link.name.is_empty() { &link.url } else { &link.name };
        a.set_text_content(Some(text));
        let _ = frag.append_child(&a);
    }
    let _ = panel.append_child(&frag);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ids: &[&str]) -> TabState {
        TabState::new(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn init_prefers_valid_persisted_tab() {
        let mut st = state(&["1", "2", "3"]);
        assert_eq!(st.init(Some("2")).as_deref(), Some("2"));

        let mut st = state(&["1", "2", "3"]);
        assert_eq!(st.init(Some("9")).as_deref(), Some("1"));

        let mut st = state(&[]);
        assert_eq!(st.init(None), None);
    }

    #[test]
    fn unknown_and_reentrant_activation_are_noops() {
        let mut st = state(&["1", "2"]);
        st.init(None);
        assert!(!st.activate("9"));
        assert_eq!(st.active(), Some("1"));
        assert!(!st.activate("1"));
        assert!(st.activate("2"));
        assert_eq!(st.active(), Some("2"));
    }

    #[test]
    fn cycling_wraps_at_both_ends() {
        let mut st = state(&["1", "2", "3"]);
        st.init(None);
        assert!(st.activate("3"));
        assert_eq!(st.cycle(1), Some("1"));
        assert!(st.activate("1"));
        assert_eq!(st.cycle(-1), Some("3"));
    }

    #[test]
    fn cycling_without_tabs_is_none() {
        let st = state(&[]);
        assert_eq!(st.cycle(1), None);
    }
}
