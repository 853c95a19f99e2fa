//! Search prompt: engine choice dropdown and query submission.
//!
//! The engine list comes from configuration; the chosen engine persists
//! and queries open in a new browsing context.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use sp_config::{SearchEngines, title_case_key};

use crate::{App, dom, storage};

/// Engine catalog plus the currently selected key.
pub struct SearchPrompt {
    engines: SearchEngines,
    current: RefCell<Option<String>>,
}

impl SearchPrompt {
    pub fn new(engines: SearchEngines) -> Self {
        Self { engines, current: RefCell::new(None) }
    }

    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}

/// Build the engine menu and restore the persisted preference.
pub fn init(app: &Rc<App>) {
    build_menu(app);
    let saved = storage::get(storage::SEARCH_ENGINE_KEY);
    let initial = app
        .search
        .engines
        .choose(saved.as_deref())
        .map(str::to_owned);
    if let Some(engine) = initial {
        *app.search.current.borrow_mut() = Some(engine.clone());
        update_trigger(app, &engine);
    }
}

fn build_menu(app: &Rc<App>) {
    let Some(menu) = &app.els.search_menu else { return };
    menu.set_inner_html("");
    for (key, _) in app.search.engines.iter() {
        let btn: web_sys::HtmlButtonElement = dom::create_element("button").unchecked_into();
        btn.set_type("button");
        btn.set_class_name("search-engine-item");
        btn.set_text_content(Some(&title_case_key(key)));
        let _ = btn.set_attribute("data-value", key);

        let app2 = app.clone();
        let key = key.to_owned();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            select_engine(&app2, &key);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();

        let _ = menu.append_child(&btn);
    }
}

/// Persist and reflect an engine choice, then hand focus back to the
/// input.
fn select_engine(app: &Rc<App>, key: &str) {
    *app.search.current.borrow_mut() = Some(key.to_owned());
    storage::set(storage::SEARCH_ENGINE_KEY, key);
    update_trigger(app, key);
    if let Some(dropdown) = &app.els.search_dropdown {
        dom::remove_class(dropdown, "open");
    }
    if let Some(input) = &app.els.search_input {
        let _ = input.focus();
    }
}

fn update_trigger(app: &Rc<App>, key: &str) {
    if let Some(trigger) = &app.els.search_trigger {
        dom::set_text(trigger, &title_case_key(key));
    }
    if let Some(menu) = &app.els.search_menu {
        for item in dom::query_all_within(menu, ".search-engine-item") {
            let is = item.get_attribute("data-value").as_deref() == Some(key);
            dom::toggle_class(&item, "active", is);
        }
    }
}

/// Open the query against the selected engine in a new browsing context;
/// an empty query just refocuses the input.
pub fn submit(app: &Rc<App>) {
    let Some(input) = &app.els.search_input else { return };
    let query = input.value().trim().to_owned();
    if query.is_empty() {
        let _ = input.focus();
        return;
    }
    let current = app.search.current();
    let Some(prefix) = current.as_deref().and_then(|k| app.search.engines.get(k)) else {
        return;
    };
    let url = format!("{prefix}{}", js_sys::encode_uri_component(&query));
    let _ = dom::window().open_with_url_and_target(&url, "_blank");
    input.set_value("");
}
