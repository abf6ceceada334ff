//! Style values in the simplified, CSS-flavored vocabulary.

use serde::{Deserialize, Serialize};

/// A style slot on a node: either an id into `globalVars.styles` or, after
/// low-usage inlining, the literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleSlot {
    Id(String),
    Value(Box<StyleValue>),
}

impl StyleSlot {
    pub fn as_id(&self) -> Option<&str> {
        match self {
            StyleSlot::Id(id) => Some(id),
            StyleSlot::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&StyleValue> {
        match self {
            StyleSlot::Id(_) => None,
            StyleSlot::Value(value) => Some(value),
        }
    }
}

/// Any value that can live in the shared style table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Text(TextStyle),
    Fills(Vec<Fill>),
    Stroke(Stroke),
    Effects(Effects),
    Layout(Layout),
}

/// Typography, with line height in em and letter spacing in percent of the
/// font size.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
}

impl TextStyle {
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.font_weight.is_none()
            && self.font_size.is_none()
            && self.line_height.is_none()
            && self.letter_spacing.is_none()
            && self.text_case.is_none()
            && self.text_align_horizontal.is_none()
            && self.text_align_vertical.is_none()
    }
}

/// A single paint in simplified form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Fill {
    #[serde(rename = "SOLID")]
    Solid { hex: String, opacity: f64 },
    #[serde(rename = "IMAGE", rename_all = "camelCase")]
    Image {
        image_ref: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        scale_mode: Option<String>,
    },
    #[serde(rename = "GRADIENT", rename_all = "camelCase")]
    Gradient {
        gradient_type: String,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        handle_positions: Vec<Point>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub hex: String,
    pub opacity: f64,
}

/// Border paints plus weight as a px length or CSS shorthand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub colors: Vec<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dashes: Option<Vec<f64>>,
}

/// Visual effects flattened into CSS strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.box_shadow.is_none() && self.filter.is_none() && self.backdrop_filter.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    None,
    Row,
    Column,
}

/// Auto-layout translated into flexbox terms. All fields other than `mode`
/// are optional; a `none` layout may still carry sizing and positioning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub mode: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_self: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<Sizing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relative_to_parent: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_scroll: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sizing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}
