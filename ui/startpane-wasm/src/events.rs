//! Event wiring.
//!
//! Static listeners attach once at startup. Dynamic elements (tab
//! buttons, dropdown items) bind their own click handlers at render time
//! in their modules.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::{App, dom, search, tabs, theme};

const RESIZE_DEBOUNCE_MS: u32 = 100;

/// Bind all static listeners. Call once after init.
pub fn bind_events(app: &Rc<App>) {
    bind_theme_dropdown(app);
    bind_search_prompt(app);
    bind_tab_keys(app);
    bind_outside_click(app);
    observe_panel_resize(app);
}

fn bind_theme_dropdown(app: &Rc<App>) {
    let Some(trigger) = &app.els.theme_trigger else { return };
    let app2 = app.clone();
    let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
        e.stop_propagation();
        theme::toggle_dropdown(&app2.els);
    }) as Box<dyn FnMut(_)>);
    trigger
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

fn bind_search_prompt(app: &Rc<App>) {
    if let Some(trigger) = &app.els.search_trigger {
        let app2 = app.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            e.stop_propagation();
            if let Some(dropdown) = &app2.els.search_dropdown {
                let _ = dropdown.class_list().toggle("open");
            }
        }) as Box<dyn FnMut(_)>);
        trigger
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    if let Some(input) = &app.els.search_input {
        let app2 = app.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                search::submit(&app2);
            }
        }) as Box<dyn FnMut(_)>);
        input
            .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Arrow keys cycle through the tab strip with wrap-around.
fn bind_tab_keys(app: &Rc<App>) {
    let Some(container) = &app.els.tab_buttons else { return };
    let app2 = app.clone();
    let cb = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
        let step = match e.key().as_str() {
            "ArrowRight" => 1,
            "ArrowLeft" => -1,
            _ => return,
        };
        e.prevent_default();
        tabs::cycle(&app2, step);
    }) as Box<dyn FnMut(_)>);
    container
        .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

/// One document-level listener closes any open dropdown when the click
/// target is not inside its subtree.
fn bind_outside_click(app: &Rc<App>) {
    let app2 = app.clone();
    let cb = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
        let target = e.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
        theme::close_if_outside(&app2.els, target.as_ref());
        if let Some(dropdown) = &app2.els.search_dropdown {
            let outside = target
                .as_ref()
                .map(|t| !dropdown.contains(Some(t)))
                .unwrap_or(true);
            if outside {
                dom::remove_class(dropdown, "open");
            }
        }
    }) as Box<dyn FnMut(_)>);
    dom::document()
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

/// Re-apply the active tab when the panel container resizes (debounced),
/// keeping the rendered layout consistent without moving the selection.
fn observe_panel_resize(app: &Rc<App>) {
    let Some(panel) = &app.els.tab_links else { return };

    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let app2 = app.clone();
    let cb = Closure::wrap(Box::new(
        move |_entries: js_sys::Array, _observer: web_sys::ResizeObserver| {
            let app3 = app2.clone();
            let timeout = Timeout::new(RESIZE_DEBOUNCE_MS, move || tabs::reapply(&app3));
            // replacing a pending timeout drops (cancels) it
            *pending.borrow_mut() = Some(timeout);
        },
    ) as Box<dyn FnMut(_, _)>);

    if let Ok(observer) = web_sys::ResizeObserver::new(cb.as_ref().unchecked_ref()) {
        observer.observe(panel);
        // observation lasts the page lifetime
        std::mem::forget(observer);
    }
    cb.forget();
}
