//! Auto-layout translation into flexbox terms.

use crate::figma::api_types::RawNode;
use crate::types::{Dimensions, Layout, LayoutMode, Point, Sizing};

use super::{css_shorthand, fmt_px, pixel_round, round2};

fn mode_of(node: &RawNode) -> LayoutMode {
    match node.layout_mode.as_deref() {
        Some("HORIZONTAL") => LayoutMode::Row,
        Some("VERTICAL") => LayoutMode::Column,
        _ => LayoutMode::None,
    }
}

fn is_flow(node: &RawNode) -> bool {
    mode_of(node) != LayoutMode::None
}

fn is_absolute(node: &RawNode) -> bool {
    node.layout_positioning.as_deref() == Some("ABSOLUTE")
}

/// MIN maps to the flex default and is omitted.
fn align_value(raw: &str) -> Option<String> {
    match raw {
        "MAX" => Some("flex-end".to_string()),
        "CENTER" => Some("center".to_string()),
        "SPACE_BETWEEN" => Some("space-between".to_string()),
        "BASELINE" => Some("baseline".to_string()),
        _ => None,
    }
}

fn sizing_value(raw: &str) -> Option<String> {
    match raw {
        "FIXED" => Some("fixed".to_string()),
        "FILL" => Some("fill".to_string()),
        "HUG" => Some("hug".to_string()),
        _ => None,
    }
}

fn counter_axis_fill(child: &RawNode, mode: LayoutMode) -> bool {
    let sizing = match mode {
        LayoutMode::Row => child.layout_sizing_vertical.as_deref(),
        LayoutMode::Column => child.layout_sizing_horizontal.as_deref(),
        LayoutMode::None => None,
    };
    sizing == Some("FILL")
}

/// A node does not grow on an axis when it sits outside any auto-layout flow,
/// or when its sizing on that axis is fixed and it has no layoutGrow.
fn keeps_dimension(node: &RawNode, in_flow: bool, sizing: Option<&str>) -> bool {
    !in_flow || (sizing.unwrap_or("FIXED") == "FIXED" && node.layout_grow == 0.0)
}

/// Build the full semantic layout for a node. Returns `None` when the node
/// carries no layout information at all.
pub fn build_layout(node: &RawNode, parent: Option<&RawNode>) -> Option<Layout> {
    let mode = mode_of(node);

    let justify_content = node
        .primary_axis_align_items
        .as_deref()
        .and_then(align_value);

    let mut align_items = node
        .counter_axis_align_items
        .as_deref()
        .and_then(align_value);

    // Stretch upgrade: all children either absolutely positioned or filling
    // the counter axis.
    if mode != LayoutMode::None
        && !node.children.is_empty()
        && node
            .children
            .iter()
            .all(|c| is_absolute(c) || counter_axis_fill(c, mode))
    {
        align_items = Some("stretch".to_string());
    }

    let align_self = match node.layout_align.as_deref() {
        Some("STRETCH") => Some("stretch".to_string()),
        Some("MAX") => Some("flex-end".to_string()),
        Some("CENTER") => Some("center".to_string()),
        _ => None,
    };

    let wrap = (node.layout_wrap.as_deref() == Some("WRAP")).then_some(true);

    let gap = node
        .item_spacing
        .filter(|spacing| *spacing > 0.0)
        .map(fmt_px);

    let has_padding = [
        node.padding_top,
        node.padding_right,
        node.padding_bottom,
        node.padding_left,
    ]
    .iter()
    .any(|p| *p != 0.0);
    let padding = has_padding.then(|| {
        css_shorthand(
            node.padding_top,
            node.padding_right,
            node.padding_bottom,
            node.padding_left,
        )
    });

    let horizontal = node.layout_sizing_horizontal.as_deref().and_then(sizing_value);
    let vertical = node.layout_sizing_vertical.as_deref().and_then(sizing_value);
    let sizing = (horizontal.is_some() || vertical.is_some()).then(|| Sizing {
        horizontal,
        vertical,
    });

    let in_flow = parent.is_some_and(is_flow) && !is_absolute(node);
    let dimensions = node.absolute_bounding_box.as_ref().and_then(|bb| {
        let width = keeps_dimension(node, in_flow, node.layout_sizing_horizontal.as_deref())
            .then(|| pixel_round(bb.width));
        let height = keeps_dimension(node, in_flow, node.layout_sizing_vertical.as_deref())
            .then(|| pixel_round(bb.height));
        let aspect_ratio = (node.preserve_ratio
            && mode == LayoutMode::Column
            && width.is_some()
            && height.is_some()
            && bb.height > 0.0)
            .then(|| round2(bb.width / bb.height));

        (width.is_some() || height.is_some()).then_some(Dimensions {
            width,
            height,
            aspect_ratio,
        })
    });

    let location_relative_to_parent = match (node.absolute_bounding_box.as_ref(), parent) {
        (Some(bb), Some(p)) if is_absolute(node) || !is_flow(p) => {
            p.absolute_bounding_box.as_ref().map(|pb| Point {
                x: pixel_round(bb.x - pb.x),
                y: pixel_round(bb.y - pb.y),
            })
        }
        _ => None,
    };

    let position = is_absolute(node).then(|| "absolute".to_string());

    let overflow_scroll = match node.overflow_direction.as_deref() {
        Some("HORIZONTAL_SCROLLING") => Some(vec!["x".to_string()]),
        Some("VERTICAL_SCROLLING") => Some(vec!["y".to_string()]),
        Some("HORIZONTAL_AND_VERTICAL_SCROLLING") => {
            Some(vec!["x".to_string(), "y".to_string()])
        }
        _ => None,
    };

    let layout = Layout {
        mode,
        justify_content,
        align_items,
        align_self,
        wrap,
        gap,
        padding,
        sizing,
        dimensions,
        location_relative_to_parent,
        position,
        overflow_scroll,
    };

    (layout != Layout::default()).then_some(layout)
}

/// Reduce a layout to the properties worth sharing through the style table:
/// mode, alignment, gap, padding, and wrap. Positioning and sizing stay out
/// of the interned value. `None` when nothing survives beyond `mode: none`.
pub fn slot_layout(layout: &Layout) -> Option<Layout> {
    let filtered = Layout {
        mode: layout.mode,
        justify_content: layout.justify_content.clone(),
        align_items: layout.align_items.clone(),
        gap: layout.gap.clone(),
        padding: layout.padding.clone(),
        wrap: layout.wrap,
        ..Layout::default()
    };

    if filtered == Layout::default() {
        None
    } else {
        Some(filtered)
    }
}
