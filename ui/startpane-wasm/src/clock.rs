//! Analog zone clocks and the digital time/date readout.
//!
//! Each configured zone gets a canvas redrawn from zone-aware formatted
//! wall-clock time. Colors come from computed theme tokens through a
//! small cache; the theme switcher invalidates it after a successful
//! switch, and a draw with unresolved tokens skips the frame instead of
//! painting defaults. Scheduling runs a short per-frame priming burst,
//! then settles into one redraw per second aligned to the second
//! boundary.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use gloo_console::warn;
use gloo_timers::callback::Timeout;
use js_sys::{Array, Intl, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use sp_config::ClockSpec;

use crate::{App, dom};

pub const FACE_SIZE: u32 = 90;
const PRIME_MAX_FRAMES: u32 = 10;
const PRIME_MAX_MS: f64 = 450.0;

// ── Geometry ──

/// Hand angle for `unit` of `max`, zero pointing straight up:
/// `2π·unit/max − π/2`.
fn hand_angle(unit: f64, max: f64) -> f64 {
    2.0 * PI * unit / max - PI / 2.0
}

/// Fractional hand positions: the minute hand carries seconds and the
/// hour hand carries minutes, so neither jumps on the tick.
fn smooth_units(hour: u32, minute: u32, second: u32) -> (f64, f64) {
    let minutes = minute as f64 + second as f64 / 60.0;
    let hours = (hour % 12) as f64 + minutes / 60.0;
    (hours, minutes)
}

/// Delay until the next wall-clock second boundary.
fn tick_delay_ms(now_ms: f64) -> u32 {
    (1000.0 - (now_ms % 1000.0)) as u32
}

// ── Zone time ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub is_pm: bool,
}

fn formatter_options(tz: &str) -> Object {
    let opts = Object::new();
    let _ = Reflect::set(&opts, &"timeZone".into(), &tz.into());
    let _ = Reflect::set(&opts, &"hour12".into(), &JsValue::FALSE);
    for field in ["hour", "minute", "second"] {
        let _ = Reflect::set(&opts, &field.into(), &"2-digit".into());
    }
    opts
}

/// Zone-aware formatter; `None` (with a warning) when the platform
/// rejects the tz identifier.
fn zone_formatter(tz: &str) -> Option<Intl::DateTimeFormat> {
    let intl = Reflect::get(&js_sys::global(), &"Intl".into()).ok()?;
    let ctor: js_sys::Function = Reflect::get(&intl, &"DateTimeFormat".into())
        .ok()?
        .dyn_into()
        .ok()?;
    let locales = Array::of1(&"en-GB".into());
    let args = Array::of2(&locales, &formatter_options(tz));
    match Reflect::construct(&ctor, &args) {
        Ok(fmt) => Some(fmt.unchecked_into()),
        Err(_) => {
            warn!(format!("clock dropped: invalid time zone {tz}"));
            None
        }
    }
}

/// Formatter for the digital readout in the user's own locale and zone.
fn local_formatter(time_of_day: bool) -> Intl::DateTimeFormat {
    let opts = Object::new();
    if time_of_day {
        let _ = Reflect::set(&opts, &"hour".into(), &"2-digit".into());
        let _ = Reflect::set(&opts, &"minute".into(), &"2-digit".into());
        let _ = Reflect::set(&opts, &"hour12".into(), &JsValue::TRUE);
    } else {
        let _ = Reflect::set(&opts, &"weekday".into(), &"short".into());
        let _ = Reflect::set(&opts, &"year".into(), &"numeric".into());
        let _ = Reflect::set(&opts, &"month".into(), &"short".into());
        let _ = Reflect::set(&opts, &"day".into(), &"numeric".into());
    }
    Intl::DateTimeFormat::new(&Array::new(), &opts)
}

/// Current wall-clock time in the formatter's zone.
fn zoned_time(fmt: &Intl::DateTimeFormat) -> ZonedTime {
    let parts = fmt.format_to_parts(&js_sys::Date::new_0());
    let mut t = ZonedTime { hour: 0, minute: 0, second: 0, is_pm: false };
    for part in parts.iter() {
        let kind = Reflect::get(&part, &"type".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let value = Reflect::get(&part, &"value".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let num = value.parse::<u32>().unwrap_or(0);
        match kind.as_str() {
            "hour" => t.hour = num,
            "minute" => t.minute = num,
            "second" => t.second = num,
            _ => {}
        }
    }
    t.is_pm = t.hour >= 12;
    t
}

fn format_now(fmt: &Intl::DateTimeFormat) -> String {
    fmt.format()
        .call1(&JsValue::NULL, &js_sys::Date::new_0())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

// ── Style cache ──

/// Colors pulled from computed theme tokens. Absent until the active
/// stylesheet resolves them.
#[derive(Debug, Clone)]
struct ClockStyle {
    face: String,
    tick: String,
    hand: String,
    sec_am: String,
    sec_pm: String,
}

fn resolve_style(root: &web_sys::Element) -> Option<ClockStyle> {
    let token = |name: &str| dom::computed_value(root, name);
    let face = token("--clock-face");
    let tick = token("--clock-tick");
    let hand = token("--clock-hand");
    if face.is_empty() || tick.is_empty() || hand.is_empty() {
        return None;
    }
    let or_hand = |v: String| if v.is_empty() { hand.clone() } else { v };
    Some(ClockStyle {
        face,
        tick,
        sec_am: or_hand(token("--clock-sec-am")),
        sec_pm: or_hand(token("--clock-sec-pm")),
        hand,
    })
}

// ── Engine ──

struct ClockRuntime {
    ctx: CanvasRenderingContext2d,
    fmt: Intl::DateTimeFormat,
}

/// All clock runtimes plus the shared style cache. Created once at
/// startup, torn down never.
pub struct ClockEngine {
    runtimes: Vec<ClockRuntime>,
    style: RefCell<Option<ClockStyle>>,
    time_fmt: Option<Intl::DateTimeFormat>,
    date_fmt: Option<Intl::DateTimeFormat>,
}

impl ClockEngine {
    /// Build one canvas block per configured zone inside the clock
    /// container. Zones the platform rejects are skipped.
    pub fn new(els: &dom::Elements, zones: &[ClockSpec]) -> Self {
        let mut runtimes = Vec::new();
        if let Some(container) = &els.clock_container {
            for zone in zones {
                let Some(fmt) = zone_formatter(&zone.tz) else { continue };
                match create_clock_block(container, zone) {
                    Ok(ctx) => runtimes.push(ClockRuntime { ctx, fmt }),
                    Err(_) => warn!(format!("clock {} skipped: no 2d canvas context", zone.id)),
                }
            }
        }
        Self {
            runtimes,
            style: RefCell::new(None),
            time_fmt: els.time_text.as_ref().map(|_| local_formatter(true)),
            date_fmt: els.date_text.as_ref().map(|_| local_formatter(false)),
        }
    }

    /// Drop cached colors; the next draw re-reads computed tokens.
    pub fn invalidate_style_cache(&self) {
        *self.style.borrow_mut() = None;
    }
}

fn create_clock_block(
    container: &web_sys::Element,
    zone: &ClockSpec,
) -> Result<CanvasRenderingContext2d, JsValue> {
    let block = dom::create_element("div");
    block.set_class_name("clock-block");

    let canvas: HtmlCanvasElement = dom::create_element("canvas").unchecked_into();
    canvas.set_id(&format!("clock-{}", zone.id));
    canvas.set_width(FACE_SIZE);
    canvas.set_height(FACE_SIZE);

    let caption = dom::create_element("div");
    caption.set_class_name("clock-label");
    caption.set_text_content(Some(&zone.label));

    block.append_child(&canvas)?;
    block.append_child(&caption)?;
    container.append_child(&block)?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok(ctx)
}

// ── Drawing ──

fn draw_hand(
    ctx: &CanvasRenderingContext2d,
    angle: f64,
    len: f64,
    width: f64,
    color: &str,
    r: f64,
) {
    ctx.begin_path();
    ctx.set_line_cap("round");
    ctx.set_line_width(width);
    ctx.set_stroke_style_str(color);
    ctx.move_to(r, r);
    ctx.line_to(r + angle.cos() * len, r + angle.sin() * len);
    ctx.stroke();
}

fn draw_face(ctx: &CanvasRenderingContext2d, style: &ClockStyle, t: ZonedTime) {
    let size = FACE_SIZE as f64;
    let r = size / 2.0;

    ctx.clear_rect(0.0, 0.0, size, size);

    ctx.begin_path();
    let _ = ctx.arc(r, r, r - 1.0, 0.0, PI * 2.0);
    ctx.set_fill_style_str(&style.face);
    ctx.fill();
    ctx.set_stroke_style_str(&style.tick);
    ctx.set_line_width(2.0);
    ctx.stroke();

    for i in 0..12 {
        let a = i as f64 * PI / 6.0;
        ctx.begin_path();
        ctx.move_to(r + a.cos() * (r - 10.0), r + a.sin() * (r - 10.0));
        ctx.line_to(r + a.cos() * (r - 4.0), r + a.sin() * (r - 4.0));
        ctx.stroke();
    }

    let (hours, minutes) = smooth_units(t.hour, t.minute, t.second);
    let sec_color = if t.is_pm { &style.sec_pm } else { &style.sec_am };
    draw_hand(ctx, hand_angle(hours, 12.0), r * 0.5, 4.0, &style.hand, r);
    draw_hand(ctx, hand_angle(minutes, 60.0), r * 0.7, 3.0, &style.hand, r);
    draw_hand(ctx, hand_angle(t.second as f64, 60.0), r * 0.8, 1.0, sec_color, r);
}

/// Redraw every clock. An empty style cache is repopulated first; if the
/// tokens are still unresolved the frame is a deliberate no-op.
fn render_all(app: &Rc<App>) {
    if app.clocks.runtimes.is_empty() {
        return;
    }
    if app.clocks.style.borrow().is_none() {
        *app.clocks.style.borrow_mut() = resolve_style(&app.els.root);
    }
    let style = app.clocks.style.borrow();
    let Some(style) = style.as_ref() else { return };
    for rt in &app.clocks.runtimes {
        draw_face(&rt.ctx, style, zoned_time(&rt.fmt));
    }
}

/// Refresh the digital time/date readout.
fn update_datetime(app: &Rc<App>) {
    if let (Some(el), Some(fmt)) = (&app.els.time_text, &app.clocks.time_fmt) {
        dom::set_text(el, &format_now(fmt));
    }
    if let (Some(el), Some(fmt)) = (&app.els.date_text, &app.clocks.date_fmt) {
        dom::set_text(el, &format_now(fmt));
    }
}

/// One immediate repaint, used after a theme publish so the clocks pick
/// up new colors without waiting for the next tick.
pub fn redraw(app: &Rc<App>) {
    render_all(app);
}

// ── Scheduling ──

/// Run the priming burst, then settle into second-aligned steady ticks.
pub fn start(app: &Rc<App>) {
    update_datetime(app);
    if app.clocks.runtimes.is_empty()
        && app.clocks.time_fmt.is_none()
        && app.clocks.date_fmt.is_none()
    {
        return;
    }

    let raf: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf2 = raf.clone();
    let app2 = app.clone();
    let started = js_sys::Date::now();
    let mut frames = 0u32;
    *raf.borrow_mut() = Some(Closure::new(move || {
        render_all(&app2);
        frames += 1;
        if frames < PRIME_MAX_FRAMES && js_sys::Date::now() - started < PRIME_MAX_MS {
            request_frame(raf2.borrow().as_ref().unwrap());
        } else {
            steady_tick(app2.clone());
        }
    }));
    request_frame(raf.borrow().as_ref().unwrap());
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
    let _ = dom::window().request_animation_frame(cb.as_ref().unchecked_ref());
}

/// One steady-phase tick, rescheduling itself against the next second
/// boundary so the second hand never drifts.
fn steady_tick(app: Rc<App>) {
    render_all(&app);
    update_datetime(&app);
    let delay = tick_delay_ms(js_sys::Date::now());
    Timeout::new(delay, move || steady_tick(app)).forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_oclock_points_right() {
        let (hours, _) = smooth_units(3, 0, 0);
        assert!(hand_angle(hours, 12.0).abs() < 1e-12);
    }

    #[test]
    fn twelve_oclock_points_up() {
        let (hours, _) = smooth_units(12, 0, 0);
        assert!((hand_angle(hours, 12.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn hands_move_smoothly_between_units() {
        let (hours, minutes) = smooth_units(3, 30, 30);
        assert!((minutes - 30.5).abs() < 1e-12);
        assert!((hours - (3.0 + 30.5 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn ticks_align_to_the_second_boundary() {
        assert_eq!(tick_delay_ms(1_234.0), 766);
        assert_eq!(tick_delay_ms(7_000.0), 1000);
    }
}
