//! Paint translation: solid colors, image references, gradients.

use crate::figma::api_types::{RawColor, RawPaint};
use crate::types::{Fill, GradientStop, Point};

use super::round2;

/// Convert an RGBA color (channels 0.0-1.0) to an uppercase hex string.
pub fn hex_color(color: &RawColor) -> String {
    let r = (color.r * 255.0).round() as u32;
    let g = (color.g * 255.0).round() as u32;
    let b = (color.b * 255.0).round() as u32;
    format!("#{:06X}", (r << 16) | (g << 8) | b)
}

/// CSS rgba() string for shadow colors.
pub fn rgba_string(color: &RawColor) -> String {
    let r = (color.r * 255.0).round() as u32;
    let g = (color.g * 255.0).round() as u32;
    let b = (color.b * 255.0).round() as u32;
    format!("rgba({}, {}, {}, {})", r, g, b, super::fmt_num(round2(color.a)))
}

/// Effective opacity of a paint: color alpha times paint opacity, two decimals.
fn paint_opacity(color: &RawColor, paint: &RawPaint) -> f64 {
    round2(color.a * paint.opacity.unwrap_or(1.0))
}

/// Translate a single paint. Invisible and unrecognized paints map to `None`.
pub fn simplify_paint(paint: &RawPaint) -> Option<Fill> {
    if !paint.visible {
        return None;
    }

    match paint.paint_type.as_str() {
        "SOLID" => {
            let color = paint.color.as_ref()?;
            Some(Fill::Solid {
                hex: hex_color(color),
                opacity: paint_opacity(color, paint),
            })
        }
        "IMAGE" => Some(Fill::Image {
            image_ref: paint.image_ref.clone()?,
            scale_mode: paint.scale_mode.clone(),
        }),
        gradient if gradient.starts_with("GRADIENT_") => Some(Fill::Gradient {
            gradient_type: paint.paint_type.clone(),
            handle_positions: paint
                .gradient_handle_positions
                .iter()
                .map(|p| Point { x: p.x, y: p.y })
                .collect(),
            stops: paint
                .gradient_stops
                .iter()
                .map(|stop| GradientStop {
                    position: stop.position,
                    hex: hex_color(&stop.color),
                    opacity: paint_opacity(&stop.color, paint),
                })
                .collect(),
        }),
        _ => None,
    }
}

/// Translate a paint list, keeping only the visible, recognized entries.
pub fn simplify_fills(paints: &[RawPaint]) -> Vec<Fill> {
    paints.iter().filter_map(simplify_paint).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paint(value: serde_json::Value) -> RawPaint {
        serde_json::from_value(value).expect("paint fixture")
    }

    #[test]
    fn solid_paint_produces_uppercase_hex() {
        let fill = simplify_paint(&paint(json!({
            "type": "SOLID",
            "color": {"r": 1.0, "g": 0.498, "b": 0.0, "a": 1.0}
        })))
        .expect("solid fill");

        assert_eq!(
            fill,
            Fill::Solid {
                hex: "#FF7F00".to_string(),
                opacity: 1.0
            }
        );
    }

    #[test]
    fn opacity_multiplies_alpha_and_paint_opacity() {
        let fill = simplify_paint(&paint(json!({
            "type": "SOLID",
            "opacity": 0.5,
            "color": {"r": 0.0, "g": 0.0, "b": 0.0, "a": 0.5}
        })))
        .expect("solid fill");

        match fill {
            Fill::Solid { opacity, .. } => assert_eq!(opacity, 0.25),
            other => panic!("expected solid, got {other:?}"),
        }
    }

    #[test]
    fn invisible_paint_is_dropped() {
        assert!(simplify_paint(&paint(json!({
            "type": "SOLID",
            "visible": false,
            "color": {"r": 0.0, "g": 0.0, "b": 0.0}
        })))
        .is_none());
    }

    #[test]
    fn image_paint_keeps_ref_and_scale_mode() {
        let fill = simplify_paint(&paint(json!({
            "type": "IMAGE",
            "imageRef": "abc123",
            "scaleMode": "FILL"
        })))
        .expect("image fill");

        assert_eq!(
            fill,
            Fill::Image {
                image_ref: "abc123".to_string(),
                scale_mode: Some("FILL".to_string())
            }
        );
    }

    #[test]
    fn image_paint_without_ref_is_dropped() {
        assert!(simplify_paint(&paint(json!({"type": "IMAGE"}))).is_none());
    }

    #[test]
    fn gradient_preserves_type_handles_and_stops() {
        let fill = simplify_paint(&paint(json!({
            "type": "GRADIENT_LINEAR",
            "gradientHandlePositions": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 1.0}],
            "gradientStops": [
                {"position": 0.0, "color": {"r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0}},
                {"position": 1.0, "color": {"r": 0.0, "g": 0.0, "b": 0.0, "a": 0.5}}
            ]
        })))
        .expect("gradient fill");

        match fill {
            Fill::Gradient {
                gradient_type,
                handle_positions,
                stops,
            } => {
                assert_eq!(gradient_type, "GRADIENT_LINEAR");
                assert_eq!(handle_positions.len(), 2);
                assert_eq!(stops[0].hex, "#FFFFFF");
                assert_eq!(stops[1].opacity, 0.5);
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn rgba_string_trims_integral_alpha() {
        let opaque = RawColor {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(rgba_string(&opaque), "rgba(0, 0, 0, 1)");

        let translucent = RawColor {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            a: 0.25,
        };
        assert_eq!(rgba_string(&translucent), "rgba(255, 0, 0, 0.25)");
    }
}
