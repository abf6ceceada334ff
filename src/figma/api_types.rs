//! Raw Figma API response types.
//!
//! Everything except `id`, `name`, and `type` is optional; the upstream
//! schema is large and we only model the attributes the simplifier reads.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

fn default_true() -> bool {
    true
}

fn default_alpha() -> f64 {
    1.0
}

/// A raw node as returned by the files/nodes endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub children: Vec<RawNode>,

    pub opacity: Option<f64>,
    pub characters: Option<String>,
    pub style: Option<RawTypeStyle>,

    #[serde(default)]
    pub fills: Vec<RawPaint>,
    #[serde(default)]
    pub strokes: Vec<RawPaint>,
    pub stroke_weight: Option<f64>,
    pub individual_stroke_weights: Option<RawStrokeWeights>,
    #[serde(default)]
    pub stroke_dashes: Vec<f64>,
    #[serde(default)]
    pub effects: Vec<RawEffect>,

    pub corner_radius: Option<f64>,
    pub rectangle_corner_radii: Option<Vec<f64>>,
    pub absolute_bounding_box: Option<RawBoundingBox>,

    pub layout_mode: Option<String>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub layout_align: Option<String>,
    pub layout_wrap: Option<String>,
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub padding_top: f64,
    #[serde(default)]
    pub padding_right: f64,
    #[serde(default)]
    pub padding_bottom: f64,
    #[serde(default)]
    pub padding_left: f64,
    pub layout_sizing_horizontal: Option<String>,
    pub layout_sizing_vertical: Option<String>,
    #[serde(default)]
    pub layout_grow: f64,
    pub layout_positioning: Option<String>,
    #[serde(default)]
    pub preserve_ratio: bool,
    pub overflow_direction: Option<String>,

    pub component_id: Option<String>,
    #[serde(default)]
    pub component_properties: HashMap<String, RawComponentProperty>,
}

/// Bounding box in absolute canvas coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// RGBA color with channels in the 0.0-1.0 range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawVector {
    pub x: f64,
    pub y: f64,
}

/// A paint entry (solid fill, image fill, or gradient).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub opacity: Option<f64>,
    pub color: Option<RawColor>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
    #[serde(default)]
    pub gradient_handle_positions: Vec<RawVector>,
    #[serde(default)]
    pub gradient_stops: Vec<RawGradientStop>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGradientStop {
    pub position: f64,
    pub color: RawColor,
}

/// Shadow or blur effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    pub color: Option<RawColor>,
    pub offset: Option<RawVector>,
    pub spread: Option<f64>,
}

/// Typography block attached to TEXT nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypeStyle {
    pub font_family: Option<String>,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_case: Option<String>,
    pub text_align_horizontal: Option<String>,
    pub text_align_vertical: Option<String>,
}

/// Per-edge stroke weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStrokeWeights {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponentProperty {
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub property_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponent {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub component_set_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponentSet {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// Response from `GET /v1/files/{key}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFileResponse {
    pub name: Option<String>,
    pub last_modified: Option<String>,
    pub thumbnail_url: Option<String>,
    pub document: RawNode,
    #[serde(default)]
    pub components: HashMap<String, RawComponent>,
    #[serde(default)]
    pub component_sets: HashMap<String, RawComponentSet>,
}

/// Response from `GET /v1/files/{key}/nodes?ids=…`.
///
/// Entries are keyed by node id; a `BTreeMap` keeps multi-node responses in
/// a deterministic order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNodesResponse {
    pub name: Option<String>,
    pub last_modified: Option<String>,
    pub thumbnail_url: Option<String>,
    pub nodes: BTreeMap<String, RawNodeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNodeEntry {
    pub document: RawNode,
    #[serde(default)]
    pub components: HashMap<String, RawComponent>,
    #[serde(default)]
    pub component_sets: HashMap<String, RawComponentSet>,
}

/// Either shape of the upstream response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawResponse {
    Nodes(RawNodesResponse),
    File(RawFileResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_defaults_apply_for_missing_fields() {
        let node: RawNode = serde_json::from_value(json!({
            "id": "1:1",
            "name": "Frame",
            "type": "FRAME"
        }))
        .expect("minimal node");

        assert!(node.visible);
        assert!(node.children.is_empty());
        assert!(node.fills.is_empty());
        assert_eq!(node.padding_top, 0.0);
        assert_eq!(node.layout_grow, 0.0);
    }

    #[test]
    fn response_shape_is_detected_from_keys() {
        let file: RawResponse = serde_json::from_value(json!({
            "name": "Design",
            "document": {"id": "0:0", "name": "Document", "type": "DOCUMENT"}
        }))
        .expect("file shape");
        assert!(matches!(file, RawResponse::File(_)));

        let nodes: RawResponse = serde_json::from_value(json!({
            "name": "Design",
            "nodes": {
                "1:2": {"document": {"id": "1:2", "name": "Frame", "type": "FRAME"}}
            }
        }))
        .expect("nodes shape");
        assert!(matches!(nodes, RawResponse::Nodes(_)));
    }

    #[test]
    fn paint_color_alpha_defaults_to_one() {
        let paint: RawPaint = serde_json::from_value(json!({
            "type": "SOLID",
            "color": {"r": 1.0, "g": 0.0, "b": 0.0}
        }))
        .expect("paint");
        assert_eq!(paint.color.unwrap().a, 1.0);
        assert!(paint.visible);
    }
}
