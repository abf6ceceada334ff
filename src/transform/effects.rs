//! Effect translation: shadows into `box-shadow`, blurs into filters.

use crate::figma::api_types::RawEffect;
use crate::types::Effects;

use super::paint::rgba_string;
use super::pixel_round;

fn shadow_string(effect: &RawEffect, inset: bool) -> String {
    let (ox, oy) = effect
        .offset
        .map(|o| (o.x, o.y))
        .unwrap_or((0.0, 0.0));
    let spread = effect.spread.unwrap_or(0.0);
    let color = effect
        .color
        .as_ref()
        .map(rgba_string)
        .unwrap_or_else(|| "rgba(0, 0, 0, 1)".to_string());

    let core = format!(
        "{}px {}px {}px {}px {}",
        pixel_round(ox) as i64,
        pixel_round(oy) as i64,
        pixel_round(effect.radius) as i64,
        pixel_round(spread) as i64,
        color
    );
    if inset {
        format!("inset {core}")
    } else {
        core
    }
}

/// Translate an effect list. Only visible effects participate; `None` when
/// nothing contributes.
pub fn simplify_effects(effects: &[RawEffect]) -> Option<Effects> {
    let mut shadows = Vec::new();
    let mut filters = Vec::new();
    let mut backdrop_filters = Vec::new();

    for effect in effects.iter().filter(|e| e.visible) {
        match effect.effect_type.as_str() {
            "DROP_SHADOW" => shadows.push(shadow_string(effect, false)),
            "INNER_SHADOW" => shadows.push(shadow_string(effect, true)),
            "LAYER_BLUR" => filters.push(format!("blur({}px)", pixel_round(effect.radius) as i64)),
            "BACKGROUND_BLUR" => {
                backdrop_filters.push(format!("blur({}px)", pixel_round(effect.radius) as i64))
            }
            _ => {}
        }
    }

    let result = Effects {
        box_shadow: (!shadows.is_empty()).then(|| shadows.join(", ")),
        filter: (!filters.is_empty()).then(|| filters.join(" ")),
        backdrop_filter: (!backdrop_filters.is_empty()).then(|| backdrop_filters.join(" ")),
    };

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
