//! StartPane page enhancer.
//!
//! Wires theme switching, the bookmark tab panel, and the zone clocks to
//! the host page. Configuration is read once from embedded JSON blocks;
//! each subsystem owns its state inside the shared [`App`] context.

pub mod clock;
pub mod config;
pub mod dom;
pub mod events;
pub mod search;
pub mod storage;
pub mod tabs;
pub mod theme;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Shared context: resolved elements plus one owned state object per
/// component, passed by reference into every handler.
pub struct App {
    pub els: dom::Elements,
    pub theme: theme::ThemeSwitcher,
    pub tabs: tabs::TabController,
    pub clocks: clock::ClockEngine,
    pub search: search::SearchPrompt,
}

/// WASM entry point – called automatically when the module is
/// instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init()
}

/// Main initialisation sequence. Order matters: configuration parses
/// before any component touches it, and the theme marker applies before
/// its stylesheet load even starts.
fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let cfg = config::load();
    dom::normalize_inputs();

    let app = Rc::new(App {
        theme: theme::ThemeSwitcher::new(cfg.themes),
        tabs: tabs::TabController::new(cfg.tabs, cfg.presets),
        clocks: clock::ClockEngine::new(&els, &cfg.zones),
        search: search::SearchPrompt::new(cfg.engines),
        els,
    });

    theme::init(&app);
    search::init(&app);
    tabs::init(&app);
    clock::start(&app);
    events::bind_events(&app);

    Ok(())
}
