//! Stroke translation: border paints plus weight shorthand.

use crate::figma::api_types::RawNode;
use crate::types::Stroke;

use super::paint::simplify_fills;
use super::{css_shorthand, fmt_px};

/// Translate a node's strokes. `None` when no visible stroke paint exists.
pub fn simplify_strokes(node: &RawNode) -> Option<Stroke> {
    let colors = simplify_fills(&node.strokes);
    if colors.is_empty() {
        return None;
    }

    let stroke_weight = match (&node.individual_stroke_weights, node.stroke_weight) {
        (Some(w), _) => Some(css_shorthand(w.top, w.right, w.bottom, w.left)),
        (None, Some(w)) if w > 0.0 => Some(fmt_px(w)),
        _ => None,
    };

    let stroke_dashes = if node.stroke_dashes.is_empty() {
        None
    } else {
        Some(node.stroke_dashes.clone())
    };

    Some(Stroke {
        colors,
        stroke_weight,
        stroke_dashes,
    })
}
