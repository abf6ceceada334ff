//! The design-graph simplification engine.
//!
//! [`parse_response`] ingests a raw Figma response (either the full-file
//! shape or the node-endpoint shape) and produces a [`SimplifiedDesign`]:
//! visibility-gated, depth-clamped, style-interned, with intermediate
//! wrappers elided and repetitive table rows collapsed behind a SUMMARY
//! node.

pub mod intern;
pub mod structure;


use std::collections::{BTreeMap, HashMap};

use crate::figma::api_types::{
    RawComponent, RawComponentSet, RawNode, RawResponse,
};
use crate::transform::{
    build_layout, simplify_effects, simplify_fills, simplify_strokes, simplify_text_style,
    slot_layout,
};
use crate::types::{
    ComponentProperty, ComponentSetSummary, ComponentSummary, SimplifiedDesign, SimplifiedNode,
    StyleSlot, StyleValue,
};

use intern::{StyleInterner, StylePrefix};
use structure::{content_signature, is_table_container, TableCounter, MAX_TABLE_ROWS};

/// Per-parse mutable state. Owned by a single [`parse_response`] invocation
/// and released when it returns; nothing is shared across parses.
struct ParseState {
    interner: StyleInterner,
    tables: HashMap<String, TableCounter>,
    summary_seq: u32,
}

impl ParseState {
    fn new() -> Self {
        Self {
            interner: StyleInterner::new(),
            tables: HashMap::new(),
            summary_seq: 0,
        }
    }

    fn next_summary_id(&mut self) -> String {
        self.summary_seq += 1;
        format!("summary_{:06X}", self.summary_seq)
    }
}

/// Entry point: simplify either shape of the upstream response.
pub fn parse_response(raw: &RawResponse, max_depth: Option<usize>) -> SimplifiedDesign {
    let mut state = ParseState::new();
    let mut components: BTreeMap<String, ComponentSummary> = BTreeMap::new();
    let mut component_sets: BTreeMap<String, ComponentSetSummary> = BTreeMap::new();

    let (name, last_modified, thumbnail_url, mut nodes) = match raw {
        RawResponse::File(file) => {
            collect_components(&file.components, &mut components);
            collect_component_sets(&file.component_sets, &mut component_sets);

            let nodes = file
                .document
                .children
                .iter()
                .filter_map(|child| parse_node(child, Some(&file.document), 0, max_depth, &mut state))
                .collect();

            (
                file.name.clone(),
                file.last_modified.clone(),
                file.thumbnail_url.clone(),
                nodes,
            )
        }
        RawResponse::Nodes(response) => {
            let mut nodes = Vec::new();
            let mut fallback_name = None;
            for entry in response.nodes.values() {
                collect_components(&entry.components, &mut components);
                collect_component_sets(&entry.component_sets, &mut component_sets);
                fallback_name.get_or_insert_with(|| entry.document.name.clone());
                if let Some(node) = parse_node(&entry.document, None, 0, max_depth, &mut state) {
                    nodes.push(node);
                }
            }

            (
                response.name.clone().or(fallback_name),
                response.last_modified.clone(),
                response.thumbnail_url.clone(),
                nodes,
            )
        }
    };

    let global_vars = state.interner.finalize(&mut nodes);

    SimplifiedDesign {
        name: name.unwrap_or_else(|| "Untitled".to_string()),
        last_modified,
        thumbnail_url,
        nodes,
        components,
        component_sets,
        global_vars,
    }
}

fn collect_components(
    raw: &HashMap<String, RawComponent>,
    out: &mut BTreeMap<String, ComponentSummary>,
) {
    for (id, component) in raw {
        out.insert(
            id.clone(),
            ComponentSummary {
                id: id.clone(),
                key: component.key.clone(),
                name: component.name.clone(),
                component_set_id: component.component_set_id.clone(),
            },
        );
    }
}

fn collect_component_sets(
    raw: &HashMap<String, RawComponentSet>,
    out: &mut BTreeMap<String, ComponentSetSummary>,
) {
    for (id, set) in raw {
        out.insert(
            id.clone(),
            ComponentSetSummary {
                id: id.clone(),
                key: set.key.clone(),
                name: set.name.clone(),
                description: set.description.clone(),
            },
        );
    }
}

/// Simplify one node. `None` when the node is invisible.
fn parse_node(
    node: &RawNode,
    parent: Option<&RawNode>,
    depth: usize,
    max_depth: Option<usize>,
    state: &mut ParseState,
) -> Option<SimplifiedNode> {
    if !node.visible {
        return None;
    }

    if let Some(limit) = max_depth {
        if depth > limit {
            let mut placeholder = SimplifiedNode::new(
                format!("depth_limit_{}", node.id),
                node.name.clone(),
                "DEPTH_LIMIT",
            );
            placeholder.text = Some(format!(
                "(Depth {depth} exceeds the requested limit; subtree omitted)"
            ));
            return Some(placeholder);
        }
    }

    let mut simplified = SimplifiedNode::new(node.id.clone(), node.name.clone(), node.node_type.clone());

    if node.node_type == "INSTANCE" {
        simplified.component_id = node.component_id.clone();
        simplified.component_properties = normalized_component_properties(node);
    }

    if let Some(style) = node.style.as_ref().and_then(simplify_text_style) {
        simplified.text_style = Some(StyleSlot::Id(
            state.interner.intern(StyleValue::Text(style), StylePrefix::Text),
        ));
    }

    let fills = simplify_fills(&node.fills);
    if !fills.is_empty() {
        simplified.fills = Some(StyleSlot::Id(
            state.interner.intern(StyleValue::Fills(fills), StylePrefix::Fill),
        ));
    }

    if let Some(stroke) = simplify_strokes(node) {
        simplified.strokes = Some(StyleSlot::Id(
            state.interner.intern(StyleValue::Stroke(stroke), StylePrefix::Stroke),
        ));
    }

    if let Some(effects) = simplify_effects(&node.effects) {
        simplified.effects = Some(StyleSlot::Id(
            state.interner.intern(StyleValue::Effects(effects), StylePrefix::Effect),
        ));
    }

    // Only the shareable subset of the layout reaches the interner.
    if let Some(slot) = build_layout(node, parent).as_ref().and_then(slot_layout) {
        simplified.layout = Some(StyleSlot::Id(
            state.interner.intern(StyleValue::Layout(slot), StylePrefix::Layout),
        ));
    }

    if let Some(opacity) = node.opacity.filter(|o| *o != 1.0) {
        simplified.opacity = Some(opacity);
    }
    simplified.border_radius = border_radius(node);

    if let Some(text) = node.characters.as_deref().filter(|t| !t.is_empty()) {
        simplified.text = Some(text.to_string());
    }

    if is_table_container(node) {
        state.tables.insert(node.id.clone(), TableCounter::new());
    }

    simplified.children = parse_children(node, depth, max_depth, state);

    let total_rows = state
        .tables
        .get(&node.id)
        .filter(|counter| counter.dropped() > 0)
        .map(|counter| counter.total_observed());
    if let Some(total) = total_rows {
        let omitted = total - MAX_TABLE_ROWS;
        let mut summary =
            SimplifiedNode::new(state.next_summary_id(), "Repetitive content summary", "SUMMARY");
        summary.text = Some(format!("(Omitted {omitted} similar items)"));
        simplified.children.push(summary);
    }

    if node.node_type == "VECTOR" {
        simplified.node_type = "IMAGE-SVG".to_string();
    }

    Some(simplified)
}

fn parse_children(
    node: &RawNode,
    depth: usize,
    max_depth: Option<usize>,
    state: &mut ParseState,
) -> Vec<SimplifiedNode> {
    let mut children = Vec::new();

    for child in &node.children {
        if !child.visible {
            continue;
        }

        // Row dedup consults the containing table's counter before descent.
        if let Some(counter) = state.tables.get_mut(&node.id) {
            if !counter.admit(&content_signature(child)) {
                continue;
            }
        }

        // Wrapper elision: an INSTANCE with a single grand-child contributes
        // nothing; descend into the grand-child directly.
        let (target, target_parent) = if child.node_type == "INSTANCE" && child.children.len() == 1
        {
            (&child.children[0], child)
        } else {
            (child, node)
        };

        if let Some(simplified) = parse_node(target, Some(target_parent), depth + 1, max_depth, state)
        {
            children.push(simplified);
        }
    }

    children
}

/// Instance properties flattened into ordered name/value/type triples.
fn normalized_component_properties(node: &RawNode) -> Vec<ComponentProperty> {
    let mut properties: Vec<ComponentProperty> = node
        .component_properties
        .iter()
        .map(|(name, prop)| ComponentProperty {
            name: name.clone(),
            value: property_value_string(&prop.value),
            property_type: prop.property_type.clone(),
        })
        .collect();
    properties.sort_by(|a, b| a.name.cmp(&b.name));
    properties
}

fn property_value_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Uniform radius as a single length, per-corner radii as a four-value
/// shorthand.
fn border_radius(node: &RawNode) -> Option<String> {
    use crate::transform::{fmt_px, pixel_round};

    if let Some(radii) = node.rectangle_corner_radii.as_ref().filter(|r| r.len() == 4) {
        let parts: Vec<String> = radii
            .iter()
            .map(|r| format!("{}px", pixel_round(*r) as i64))
            .collect();
        return Some(parts.join(" "));
    }
    node.corner_radius.filter(|r| *r > 0.0).map(fmt_px)
}
