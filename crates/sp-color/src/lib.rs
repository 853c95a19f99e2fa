//! Color-space math for theme token derivation.
//!
//! Hex parsing, RGB↔HSL conversion, lightness shifts, and the channelwise
//! scaling used to derive neumorphic shading from a theme's base surface
//! color. All functions are pure; inputs come from configuration, so
//! malformed hex degrades to black rather than erroring.

/// Parse a `#rgb` or `#rrggbb` color into channels in `[0, 255]`.
///
/// Three-digit shorthand expands by digit duplication (`#fa0` → `#ffaa00`).
/// A leading `#` is optional. Unparseable digits read as zero.
pub fn to_channels(hex: &str) -> (u8, u8, u8) {
    let s = hex.trim().trim_start_matches('#');
    let digit = |i: usize| -> u32 {
        s.as_bytes()
            .get(i)
            .and_then(|b| (*b as char).to_digit(16))
            .unwrap_or(0)
    };
    match s.len() {
        3 => (
            (digit(0) * 17) as u8,
            (digit(1) * 17) as u8,
            (digit(2) * 17) as u8,
        ),
        _ => (
            (digit(0) * 16 + digit(1)) as u8,
            (digit(2) * 16 + digit(3)) as u8,
            (digit(4) * 16 + digit(5)) as u8,
        ),
    }
}

/// Format channels as `#rrggbb`, clamping each to `[0, 255]` and rounding.
pub fn to_hex(r: f64, g: f64, b: f64) -> String {
    let clamp = |v: f64| -> u8 { v.round().clamp(0.0, 255.0) as u8 };
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

/// RGB → HSL. Hue in `[0, 360)`, saturation and lightness in percent.
///
/// Standard max/min channel algorithm; the achromatic case yields
/// `h = 0, s = 0`.
pub fn to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s * 100.0, l * 100.0)
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// HSL → RGB, channels as floats in `[0, 255]` (callers round via [`to_hex`]).
pub fn from_hsl(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h / 360.0;
    let s = s / 100.0;
    let l = l / 100.0;

    if s == 0.0 {
        let v = l * 255.0;
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

/// Shift lightness by `delta` percent points, clamping to `[0, 100]`.
pub fn shift_lightness(hex: &str, delta: f64) -> String {
    let (r, g, b) = to_channels(hex);
    let (h, s, l) = to_hsl(r, g, b);
    let (r, g, b) = from_hsl(h, s, (l + delta).clamp(0.0, 100.0));
    to_hex(r, g, b)
}

pub fn lighten(hex: &str, amount: f64) -> String {
    shift_lightness(hex, amount)
}

pub fn darken(hex: &str, amount: f64) -> String {
    shift_lightness(hex, -amount)
}

/// Multiply each channel by `factor`, clamp to 255, truncate.
///
/// Cheaper than a lightness shift; good enough for shadow/highlight tones.
pub fn scale_channelwise(hex: &str, factor: f64) -> String {
    let (r, g, b) = to_channels(hex);
    let scale = |c: u8| -> u8 { (c as f64 * factor).min(255.0) as u8 };
    format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
}

/// The four derived shade values behind neumorphic surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeumorphTokens {
    pub grad_dark: String,
    pub grad_light: String,
    pub shadow_dark: String,
    pub shadow_lite: String,
}

/// Derive the neumorphic token set from a base surface color.
pub fn neumorph(base: &str) -> NeumorphTokens {
    NeumorphTokens {
        grad_dark: scale_channelwise(base, 0.92),
        grad_light: scale_channelwise(base, 1.08),
        shadow_dark: scale_channelwise(base, 0.67),
        shadow_lite: scale_channelwise(base, 1.33),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        assert_eq!(to_channels("#1e90ff"), (0x1e, 0x90, 0xff));
        assert_eq!(to_channels("1e90ff"), (0x1e, 0x90, 0xff));
    }

    #[test]
    fn expands_three_digit_shorthand() {
        assert_eq!(to_channels("#fa0"), (0xff, 0xaa, 0x00));
        assert_eq!(to_channels("#abc"), (0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn hex_formatting_clamps_and_rounds() {
        assert_eq!(to_hex(-4.0, 255.6, 127.5), "#00ff80");
    }

    #[test]
    fn achromatic_hsl() {
        let (h, s, l) = to_hsl(0x80, 0x80, 0x80);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((l - 50.196).abs() < 0.01);
    }

    #[test]
    fn hsl_round_trip_within_one_per_channel() {
        for hex in ["#1e90ff", "#c0ffee", "#123456", "#f9f9f9", "#2e3440"] {
            let (r, g, b) = to_channels(hex);
            let (h, s, l) = to_hsl(r, g, b);
            let (r2, g2, b2) = from_hsl(h, s, l);
            assert!((r as f64 - r2).abs() <= 1.0, "{hex} red drifted");
            assert!((g as f64 - g2).abs() <= 1.0, "{hex} green drifted");
            assert!((b as f64 - b2).abs() <= 1.0, "{hex} blue drifted");
        }
    }

    #[test]
    fn lightness_shift_clamps_at_bounds() {
        assert_eq!(lighten("#ffffff", 20.0), "#ffffff");
        assert_eq!(darken("#000000", 20.0), "#000000");
    }

    #[test]
    fn lighten_raises_lightness() {
        let (r, g, b) = to_channels(&lighten("#404040", 10.0));
        let (_, _, l_before) = to_hsl(0x40, 0x40, 0x40);
        let (_, _, l_after) = to_hsl(r, g, b);
        assert!(l_after > l_before);
    }

    #[test]
    fn scale_is_identity_at_factor_one() {
        assert_eq!(scale_channelwise("#808080", 1.0), "#808080");
    }

    #[test]
    fn scale_clamps_high_factors() {
        assert_eq!(scale_channelwise("#ffffff", 1.33), "#ffffff");
    }

    #[test]
    fn neumorph_quadruple_for_mid_gray() {
        let t = neumorph("#808080");
        assert_eq!(t.grad_dark, "#757575");
        assert_eq!(t.grad_light, "#8a8a8a");
        assert_eq!(t.shadow_dark, "#555555");
        assert_eq!(t.shadow_lite, "#aaaaaa");
    }
}
