//! Type-style translation: line height to em, letter spacing to percent.

use crate::figma::api_types::RawTypeStyle;
use crate::types::TextStyle;

use super::{fmt_num, round2};

/// Translate a raw type style. `None` when nothing usable is present.
pub fn simplify_text_style(style: &RawTypeStyle) -> Option<TextStyle> {
    let line_height = match (style.line_height_px, style.font_size) {
        (Some(px), Some(size)) if size > 0.0 => Some(format!("{}em", fmt_num(round2(px / size)))),
        _ => None,
    };

    let letter_spacing = match (style.letter_spacing, style.font_size) {
        (Some(spacing), Some(size)) if size > 0.0 && spacing != 0.0 => {
            Some(format!("{}%", fmt_num(round2(spacing / size * 100.0))))
        }
        _ => None,
    };

    let result = TextStyle {
        font_family: style.font_family.clone(),
        font_weight: style.font_weight.map(|w| w.round() as u32),
        font_size: style.font_size,
        line_height,
        letter_spacing,
        text_case: style.text_case.clone(),
        text_align_horizontal: style.text_align_horizontal.clone(),
        text_align_vertical: style.text_align_vertical.clone(),
    };

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn style(value: serde_json::Value) -> RawTypeStyle {
        serde_json::from_value(value).expect("style fixture")
    }

    #[test]
    fn line_height_is_expressed_in_em() {
        let result = simplify_text_style(&style(json!({
            "fontFamily": "Inter",
            "fontSize": 16.0,
            "lineHeightPx": 24.0
        })))
        .expect("text style");

        assert_eq!(result.line_height.as_deref(), Some("1.5em"));
        assert_eq!(result.font_family.as_deref(), Some("Inter"));
    }

    #[test]
    fn letter_spacing_is_percent_of_font_size() {
        let result = simplify_text_style(&style(json!({
            "fontSize": 16.0,
            "letterSpacing": 0.8
        })))
        .expect("text style");

        assert_eq!(result.letter_spacing.as_deref(), Some("5%"));
    }

    #[test]
    fn zero_letter_spacing_is_omitted() {
        let result = simplify_text_style(&style(json!({
            "fontSize": 16.0,
            "letterSpacing": 0.0
        })))
        .expect("text style");

        assert!(result.letter_spacing.is_none());
    }

    #[test]
    fn font_weight_rounds_to_integer() {
        let result = simplify_text_style(&style(json!({"fontWeight": 600.0})))
            .expect("text style");
        assert_eq!(result.font_weight, Some(600));
    }

    #[test]
    fn empty_style_maps_to_none() {
        assert!(simplify_text_style(&style(json!({}))).is_none());
    }
}
