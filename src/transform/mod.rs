//! Pure translators from Figma vocabulary into the simplified CSS-flavored
//! schema. Transformers never fail: malformed or absent input maps to `None`.

mod effects;
mod layout;
mod paint;
mod stroke;
mod text;

pub use effects::simplify_effects;
pub use layout::{build_layout, slot_layout};
pub use paint::{hex_color, rgba_string, simplify_fills, simplify_paint};
pub use stroke::simplify_strokes;
pub use text::simplify_text_style;

/// Pixel rounding with a small positive bias so values sitting on a .5
/// boundary after float noise do not flap between neighbors.
pub(crate) fn pixel_round(value: f64) -> f64 {
    (value + 1e-4).round()
}

/// Round to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a number without a trailing `.0` (`1.5` → "1.5", `2.0` → "2").
pub(crate) fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Pixel-round and format as a px length.
pub(crate) fn fmt_px(value: f64) -> String {
    format!("{}px", pixel_round(value) as i64)
}

/// Collapse top/right/bottom/left into the shortest CSS shorthand.
pub(crate) fn css_shorthand(top: f64, right: f64, bottom: f64, left: f64) -> String {
    let (t, r, b, l) = (
        pixel_round(top) as i64,
        pixel_round(right) as i64,
        pixel_round(bottom) as i64,
        pixel_round(left) as i64,
    );
    if t == r && r == b && b == l {
        format!("{t}px")
    } else if t == b && r == l {
        format!("{t}px {r}px")
    } else if r == l {
        format!("{t}px {r}px {b}px")
    } else {
        format!("{t}px {r}px {b}px {l}px")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_round_biases_half_values_up() {
        assert_eq!(pixel_round(4.5), 5.0);
        assert_eq!(pixel_round(4.499999999), 4.0);
        assert_eq!(pixel_round(7.0), 7.0);
    }

    #[test]
    fn fmt_num_trims_integral_values() {
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(2.0), "2");
    }

    #[test]
    fn shorthand_collapses_symmetric_edges() {
        assert_eq!(css_shorthand(8.0, 8.0, 8.0, 8.0), "8px");
        assert_eq!(css_shorthand(8.0, 16.0, 8.0, 16.0), "8px 16px");
        assert_eq!(css_shorthand(8.0, 16.0, 4.0, 16.0), "8px 16px 4px");
        assert_eq!(css_shorthand(1.0, 2.0, 3.0, 4.0), "1px 2px 3px 4px");
    }
}
